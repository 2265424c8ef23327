//! Builder base: identity, memoized build, error context.

use std::sync::{Arc, OnceLock};

use crate::error::ThingError;
use crate::key::ResourceKey;
use crate::parser_registry::ParserRegistry;
use crate::registry::ThingRegistries;

/// What a builder may consult while building: the host registries filled so
/// far, and every parser (for cross-content builder lookups).
#[derive(Clone, Copy)]
pub struct BuildContext<'a> {
    pub registries: &'a ThingRegistries,
    pub parsers: &'a ParserRegistry,
}

impl<'a> BuildContext<'a> {
    pub fn new(registries: &'a ThingRegistries, parsers: &'a ParserRegistry) -> Self {
        Self {
            registries,
            parsers,
        }
    }
}

/// State shared by every builder: its registry name, fixed at construction,
/// and the cached build result.
#[derive(Debug)]
pub struct BuilderBase<T> {
    registry_name: ResourceKey,
    built: OnceLock<Arc<T>>,
}

impl<T> BuilderBase<T> {
    pub fn new(registry_name: ResourceKey) -> Self {
        Self {
            registry_name,
            built: OnceLock::new(),
        }
    }

    pub fn registry_name(&self) -> &ResourceKey {
        &self.registry_name
    }

    /// The cached result, if the builder was built already.
    pub fn built(&self) -> Option<&Arc<T>> {
        self.built.get()
    }
}

/// Intermediate, mutable representation of one declared thing.
///
/// Every builder memoizes: the first successful [`build`](Self::build)
/// stores its result and later calls return the same `Arc`. A failed build
/// caches nothing.
pub trait ThingBuilder {
    type Output;

    fn base(&self) -> &BuilderBase<Self::Output>;

    /// Name of the content type, used in error reports.
    fn thing_type_display_name(&self) -> &'static str;

    /// Display name of the enclosing builder, for builders declared inside
    /// another thing's document.
    fn contained_in(&self) -> Option<&'static str> {
        None
    }

    fn build_internal(&self, ctx: &BuildContext<'_>) -> Result<Self::Output, ThingError>;

    fn registry_name(&self) -> &ResourceKey {
        self.base().registry_name()
    }

    fn build(&self, ctx: &BuildContext<'_>) -> Result<Arc<Self::Output>, ThingError> {
        if let Some(built) = self.base().built.get() {
            return Ok(Arc::clone(built));
        }
        let output = self
            .build_internal(ctx)
            .map_err(|source| ThingError::Build {
                display_name: self.thing_type_display_name(),
                key: self.registry_name().clone(),
                contained_in: self.contained_in(),
                source: Box::new(source),
            })?;
        Ok(Arc::clone(
            self.base().built.get_or_init(|| Arc::new(output)),
        ))
    }
}

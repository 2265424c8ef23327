//! The parsers taking part in one load, keyed by content type.

use std::any::Any;
use std::fmt;

use serde_json::Value;
use tracing::{debug, info};

use crate::armor_material::ArmorMaterialParser;
use crate::block::BlockParser;
use crate::block_material::BlockMaterialParser;
use crate::creative_tab::CreativeModeTabParser;
use crate::enchantment::EnchantmentParser;
use crate::error::{LoadError, ThingError};
use crate::food::FoodParser;
use crate::item::ItemParser;
use crate::key::ResourceKey;
use crate::parser::ThingParser;
use crate::registry::ThingRegistries;
use crate::shape::ShapeParser;
use crate::tier::TierParser;

/// Object-safe view of a [`ThingParser`].
trait ErasedParser: Send {
    fn thing_type(&self) -> &'static str;

    fn apply_documents(&mut self, documents: Vec<(ResourceKey, Value)>) -> Result<(), LoadError>;

    fn finish(&self, parsers: &ParserRegistry, registries: &mut ThingRegistries)
        -> Result<(), ThingError>;

    fn len(&self) -> usize;

    fn as_any(&self) -> &dyn Any;
}

impl<P: ThingParser> ErasedParser for P {
    fn thing_type(&self) -> &'static str {
        ThingParser::thing_type(self)
    }

    fn apply_documents(&mut self, documents: Vec<(ResourceKey, Value)>) -> Result<(), LoadError> {
        self.apply(documents)
    }

    fn finish(
        &self,
        parsers: &ParserRegistry,
        registries: &mut ThingRegistries,
    ) -> Result<(), ThingError> {
        self.finish_loading(parsers, registries)
    }

    fn len(&self) -> usize {
        self.things().len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Owns one parser per content type, in registration order. Finishing runs
/// in that order, so a content type must be registered after everything its
/// builders look up in the host registries.
#[derive(Default)]
pub struct ParserRegistry {
    parsers: Vec<Box<dyn ErasedParser>>,
    finished: bool,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// All built-in parsers, ordered so that every content type finishes
    /// after the types it depends on.
    pub fn with_default_parsers() -> Self {
        let mut registry = Self::new();
        registry.push(BlockMaterialParser::new());
        registry.push(ShapeParser::new());
        registry.push(TierParser::new());
        registry.push(ArmorMaterialParser::new());
        registry.push(FoodParser::new());
        registry.push(CreativeModeTabParser::new());
        registry.push(EnchantmentParser::new());
        registry.push(BlockParser::new());
        registry.push(ItemParser::new());
        registry
    }

    fn push<P: ThingParser>(&mut self, parser: P) {
        self.parsers.push(Box::new(parser));
    }

    fn find(&self, thing_type: &str) -> Option<usize> {
        self.parsers.iter().position(|p| p.thing_type() == thing_type)
    }

    pub fn register<P: ThingParser>(&mut self, parser: P) -> Result<(), LoadError> {
        let thing_type = ThingParser::thing_type(&parser);
        if self.find(thing_type).is_some() {
            return Err(LoadError::DuplicateParser(thing_type.to_string()));
        }
        debug!(thing_type, "Registered thing parser");
        self.push(parser);
        Ok(())
    }

    /// The registered parser of type `P`, if any.
    pub fn get<P: ThingParser>(&self) -> Option<&P> {
        self.parsers
            .iter()
            .find_map(|p| p.as_any().downcast_ref::<P>())
    }

    pub fn contains(&self, thing_type: &str) -> bool {
        self.find(thing_type).is_some()
    }

    /// Content types in registration order.
    pub fn thing_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.parsers.iter().map(|p| p.thing_type())
    }

    /// Number of builders the parser for `thing_type` holds.
    pub fn builder_count(&self, thing_type: &str) -> Option<usize> {
        self.find(thing_type).map(|i| self.parsers[i].len())
    }

    /// Feed documents to the parser for `thing_type`.
    pub fn apply<I>(&mut self, thing_type: &str, documents: I) -> Result<(), LoadError>
    where
        I: IntoIterator<Item = (ResourceKey, Value)>,
    {
        if self.finished {
            return Err(LoadError::AlreadyFinished);
        }
        let index = self
            .find(thing_type)
            .ok_or_else(|| LoadError::UnknownThingType(thing_type.to_string()))?;
        self.parsers[index].apply_documents(documents.into_iter().collect())
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Build and register everything, one parser after the other. May run
    /// once; a failed finish is not retried either, since the registries
    /// already hold part of the load.
    pub fn finish_loading(&mut self, registries: &mut ThingRegistries) -> Result<(), LoadError> {
        if self.finished {
            return Err(LoadError::AlreadyFinished);
        }
        self.finished = true;

        let this = &*self;
        for parser in &this.parsers {
            let thing_type = parser.thing_type();
            parser
                .finish(this, registries)
                .map_err(|source| LoadError::Finish {
                    thing_type: thing_type.to_string(),
                    source,
                })?;
            info!(thing_type, count = parser.len(), "Finished loading things");
        }
        Ok(())
    }
}

impl fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserRegistry")
            .field("thing_types", &self.thing_types().collect::<Vec<_>>())
            .field("finished", &self.finished)
            .finish()
    }
}

//! Per-content-type parsing: documents in, builders out.

use std::collections::HashMap;
use std::sync::Arc;

use jsonthings_nbt::parse_compound;
use serde_json::Value;
use tracing::debug;

use crate::builder::{BuildContext, ThingBuilder};
use crate::error::{LoadError, ThingError};
use crate::json::{as_object, value_as_int, value_as_str, JsonObject};
use crate::key::ResourceKey;
use crate::parser_registry::ParserRegistry;
use crate::registry::{Registry, ThingRegistries};
use crate::stack::StackContext;

/// The builders one parser produced, in processing order and by name.
#[derive(Debug)]
pub struct BuilderSet<B> {
    thing_type: &'static str,
    builders: Vec<Arc<B>>,
    by_name: HashMap<ResourceKey, Arc<B>>,
}

impl<B: ThingBuilder> BuilderSet<B> {
    pub fn new(thing_type: &'static str) -> Self {
        Self {
            thing_type,
            builders: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Store a builder. A builder for a key that is already present replaces
    /// the old one in place, keeping its position in the list.
    pub fn insert(&mut self, builder: B) -> Arc<B> {
        let builder = Arc::new(builder);
        let key = builder.registry_name().clone();
        match self.by_name.insert(key, Arc::clone(&builder)) {
            Some(old) => {
                if let Some(pos) = self.builders.iter().position(|b| Arc::ptr_eq(b, &old)) {
                    self.builders[pos] = Arc::clone(&builder);
                }
            }
            None => self.builders.push(Arc::clone(&builder)),
        }
        builder
    }

    pub fn builders(&self) -> &[Arc<B>] {
        &self.builders
    }

    pub fn builders_map(&self) -> &HashMap<ResourceKey, Arc<B>> {
        &self.by_name
    }

    pub fn get(&self, key: &ResourceKey) -> Option<&Arc<B>> {
        self.by_name.get(key)
    }

    pub fn get_or_crash(&self, key: &ResourceKey) -> Result<&Arc<B>, ThingError> {
        self.by_name
            .get(key)
            .ok_or_else(|| ThingError::not_found(self.thing_type, key))
    }

    pub fn len(&self) -> usize {
        self.builders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }
}

/// Drives JSON -> builder conversion for one content type.
///
/// `thing_type` doubles as the directory name documents are read from.
pub trait ThingParser: Send + 'static {
    type Builder: ThingBuilder + Send + Sync + 'static;

    fn thing_type(&self) -> &'static str;

    fn things(&self) -> &BuilderSet<Self::Builder>;

    fn things_mut(&mut self) -> &mut BuilderSet<Self::Builder>;

    /// Turn one document into a builder, or explain why it is invalid.
    fn process_thing(
        &self,
        key: &ResourceKey,
        data: &JsonObject,
    ) -> Result<Self::Builder, ThingError>;

    /// Second load phase: build and register. Runs once, after every parser
    /// has applied its documents.
    fn finish_loading(
        &self,
        _parsers: &ParserRegistry,
        _registries: &mut ThingRegistries,
    ) -> Result<(), ThingError> {
        Ok(())
    }

    fn parse_from_element(
        &mut self,
        key: ResourceKey,
        json: &Value,
    ) -> Result<Arc<Self::Builder>, LoadError> {
        let builder = as_object(json)
            .and_then(|data| self.process_thing(&key, data))
            .map_err(|source| LoadError::Parse {
                thing_type: self.thing_type().to_string(),
                key: key.clone(),
                source,
            })?;
        debug!(thing_type = self.thing_type(), %key, "Parsed thing");
        Ok(self.things_mut().insert(builder))
    }

    /// Parse every document in the order given. The first invalid document
    /// aborts the whole batch.
    fn apply<I>(&mut self, documents: I) -> Result<(), LoadError>
    where
        I: IntoIterator<Item = (ResourceKey, Value)>,
        Self: Sized,
    {
        for (key, json) in documents {
            self.parse_from_element(key, &json)?;
        }
        Ok(())
    }

    fn builders(&self) -> &[Arc<Self::Builder>] {
        self.things().builders()
    }

    fn builders_map(&self) -> &HashMap<ResourceKey, Arc<Self::Builder>> {
        self.things().builders_map()
    }

    fn get_or_crash(&self, key: &ResourceKey) -> Result<&Arc<Self::Builder>, ThingError> {
        self.things().get_or_crash(key)
    }
}

/// Build every builder of `set` in list order and register the results into
/// the registry chosen by `target`.
pub fn register_all<B, F>(
    set: &BuilderSet<B>,
    parsers: &ParserRegistry,
    registries: &mut ThingRegistries,
    mut target: F,
) -> Result<(), ThingError>
where
    B: ThingBuilder,
    F: FnMut(&mut ThingRegistries) -> &mut Registry<B::Output>,
{
    for builder in set.builders() {
        let built = builder.build(&BuildContext::new(registries, parsers))?;
        target(registries).register(builder.registry_name().clone(), built)?;
    }
    Ok(())
}

/// Read the optional `count` and `nbt` fields of an item stack object.
///
/// `nbt` may be an embedded object, which is re-serialized and read as SNBT,
/// or an SNBT string.
pub fn parse_stack_context(item: &JsonObject) -> Result<StackContext, ThingError> {
    let mut ctx = StackContext::new(None);

    if let Some(count) = item.get("count") {
        ctx = ctx.with_count(value_as_int("count", count)?);
    }

    if let Some(element) = item.get("nbt") {
        let text = match element {
            Value::Object(_) => element.to_string(),
            Value::String(s) => s.clone(),
            _ => return Err(ThingError::wrong_type("nbt", "an object or a string")),
        };
        ctx = ctx.with_tag(parse_compound(&text)?);
    }

    Ok(ctx)
}

/// Read an event table: each value is one handler key or an array of them.
pub fn parse_events(obj: &JsonObject) -> Result<HashMap<String, Vec<ResourceKey>>, ThingError> {
    let mut map = HashMap::new();
    for (name, value) in obj {
        let handlers = match value {
            Value::String(s) => vec![ResourceKey::parse(s)?],
            Value::Array(items) => items
                .iter()
                .map(|item| value_as_str(name, item).and_then(ResourceKey::parse))
                .collect::<Result<Vec<_>, _>>()?,
            _ => {
                return Err(ThingError::wrong_type(
                    name,
                    "a string or an array of strings",
                ))
            }
        };
        map.insert(name.clone(), handlers);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::BuilderBase;
    use crate::json::get_int;
    use jsonthings_nbt::NbtTag;
    use serde_json::json;

    #[derive(Debug)]
    struct CounterBuilder {
        base: BuilderBase<i32>,
        value: i32,
    }

    impl ThingBuilder for CounterBuilder {
        type Output = i32;

        fn base(&self) -> &BuilderBase<i32> {
            &self.base
        }

        fn thing_type_display_name(&self) -> &'static str {
            "Counter"
        }

        fn build_internal(&self, _ctx: &BuildContext<'_>) -> Result<i32, ThingError> {
            Ok(self.value)
        }
    }

    struct CounterParser {
        things: BuilderSet<CounterBuilder>,
    }

    impl ThingParser for CounterParser {
        type Builder = CounterBuilder;

        fn thing_type(&self) -> &'static str {
            "counter"
        }

        fn things(&self) -> &BuilderSet<CounterBuilder> {
            &self.things
        }

        fn things_mut(&mut self) -> &mut BuilderSet<CounterBuilder> {
            &mut self.things
        }

        fn process_thing(
            &self,
            key: &ResourceKey,
            data: &JsonObject,
        ) -> Result<CounterBuilder, ThingError> {
            Ok(CounterBuilder {
                base: BuilderBase::new(key.clone()),
                value: get_int(data, "value")?,
            })
        }
    }

    fn parser() -> CounterParser {
        CounterParser {
            things: BuilderSet::new("counter"),
        }
    }

    fn key(s: &str) -> ResourceKey {
        ResourceKey::parse(s).unwrap()
    }

    #[test]
    fn apply_keeps_supplied_order() {
        let mut p = parser();
        p.apply(vec![
            (key("t:c"), json!({"value": 3})),
            (key("t:a"), json!({"value": 1})),
            (key("t:b"), json!({"value": 2})),
        ])
        .unwrap();

        let names: Vec<String> = p
            .builders()
            .iter()
            .map(|b| b.registry_name().to_string())
            .collect();
        assert_eq!(names, ["t:c", "t:a", "t:b"]);
        assert_eq!(p.builders_map().len(), 3);
    }

    #[test]
    fn every_builder_carries_its_document_key() {
        let mut p = parser();
        p.apply(vec![(key("t:x"), json!({"value": 9}))]).unwrap();
        let b = p.get_or_crash(&key("t:x")).unwrap();
        assert_eq!(b.registry_name(), &key("t:x"));
        assert!(Arc::ptr_eq(b, &p.builders()[0]));
    }

    #[test]
    fn bad_document_aborts_batch() {
        let mut p = parser();
        let err = p
            .apply(vec![
                (key("t:good"), json!({"value": 1})),
                (key("t:bad"), json!({"value": "nope"})),
                (key("t:never"), json!({"value": 2})),
            ])
            .unwrap_err();

        match err {
            LoadError::Parse {
                thing_type,
                key: k,
                source,
            } => {
                assert_eq!(thing_type, "counter");
                assert_eq!(k, key("t:bad"));
                assert!(matches!(source, ThingError::WrongType { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(p.things().get(&key("t:never")).is_none());
    }

    #[test]
    fn non_object_document_is_a_schema_error() {
        let mut p = parser();
        let err = p.parse_from_element(key("t:arr"), &json!([1, 2])).unwrap_err();
        assert!(matches!(
            err.thing_error(),
            Some(ThingError::WrongType { .. })
        ));
    }

    #[test]
    fn get_or_crash_names_type_and_key() {
        let p = parser();
        let err = p.get_or_crash(&key("t:missing")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "there is no known counter with name t:missing"
        );
    }

    #[test]
    fn redeclared_key_replaces_in_place() {
        let mut p = parser();
        p.apply(vec![
            (key("t:a"), json!({"value": 1})),
            (key("t:b"), json!({"value": 2})),
            (key("t:a"), json!({"value": 3})),
        ])
        .unwrap();
        assert_eq!(p.builders().len(), 2);
        assert_eq!(p.builders()[0].value, 3);
    }

    #[test]
    fn build_is_memoized() {
        let registries = ThingRegistries::new();
        let parsers = ParserRegistry::new();
        let ctx = BuildContext::new(&registries, &parsers);
        let mut p = parser();
        p.apply(vec![(key("t:a"), json!({"value": 4}))]).unwrap();
        let b = &p.builders()[0];
        let first = b.build(&ctx).unwrap();
        let second = b.build(&ctx).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*first, 4);
    }

    #[test]
    fn stack_context_from_embedded_object() {
        let obj = json!({"count": 4, "nbt": {"display": {"Name": "Gem"}, "Damage": 2}});
        let ctx = parse_stack_context(obj.as_object().unwrap()).unwrap();
        assert_eq!(ctx.count(), 4);
        let tag = ctx.tag().unwrap();
        assert_eq!(tag["Damage"], NbtTag::Int(2));
        assert_eq!(
            tag["display"].as_compound().unwrap()["Name"].as_string(),
            Some("Gem")
        );
    }

    #[test]
    fn stack_context_from_snbt_string() {
        let obj = json!({"nbt": "{Unbreakable:1b}"});
        let ctx = parse_stack_context(obj.as_object().unwrap()).unwrap();
        assert_eq!(ctx.count(), 1);
        assert_eq!(ctx.tag().unwrap()["Unbreakable"], NbtTag::Byte(1));
    }

    #[test]
    fn malformed_snbt_is_an_nbt_error() {
        let obj = json!({"nbt": "{Unbreakable:"});
        let err = parse_stack_context(obj.as_object().unwrap()).unwrap_err();
        assert!(matches!(err, ThingError::Nbt(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn events_accept_string_or_array() {
        let obj = json!({"a": "x", "b": ["y", "z"]});
        let events = parse_events(obj.as_object().unwrap()).unwrap();
        assert_eq!(events["a"], vec![key("minecraft:x")]);
        assert_eq!(events["b"], vec![key("minecraft:y"), key("minecraft:z")]);
    }

    #[test]
    fn events_reject_other_shapes() {
        let obj = json!({"a": 5});
        let err = parse_events(obj.as_object().unwrap()).unwrap_err();
        assert!(matches!(err, ThingError::WrongType { field, .. } if field == "a"));
    }
}

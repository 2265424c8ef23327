//! Creative mode tabs (`creative_mode_tab/*.json`).

use serde_json::Value;

use crate::builder::{BuildContext, BuilderBase, ThingBuilder};
use crate::error::ThingError;
use crate::json::{get_key, get_str_opt, JsonObject};
use crate::key::ResourceKey;
use crate::parser::{parse_stack_context, register_all, BuilderSet, ThingParser};
use crate::parser_registry::ParserRegistry;
use crate::registry::ThingRegistries;
use crate::stack::StackContext;

#[derive(Debug, Clone, PartialEq)]
pub struct CreativeModeTab {
    /// Translation key of the tab title.
    pub label: String,
    /// Icon stack. The item is resolved when the tab is first drawn, so it
    /// may name an item declared later in the load.
    pub icon: StackContext,
}

impl CreativeModeTab {
    pub fn default_label(key: &ResourceKey) -> String {
        format!("itemGroup.{}.{}", key.namespace(), key.path().replace('/', "."))
    }
}

#[derive(Debug)]
pub struct CreativeModeTabBuilder {
    base: BuilderBase<CreativeModeTab>,
    label: Option<String>,
    icon: StackContext,
}

impl ThingBuilder for CreativeModeTabBuilder {
    type Output = CreativeModeTab;

    fn base(&self) -> &BuilderBase<CreativeModeTab> {
        &self.base
    }

    fn thing_type_display_name(&self) -> &'static str {
        "Creative Mode Tab"
    }

    fn build_internal(&self, _ctx: &BuildContext<'_>) -> Result<CreativeModeTab, ThingError> {
        Ok(CreativeModeTab {
            label: self
                .label
                .clone()
                .unwrap_or_else(|| CreativeModeTab::default_label(self.registry_name())),
            icon: self.icon.clone(),
        })
    }
}

pub struct CreativeModeTabParser {
    things: BuilderSet<CreativeModeTabBuilder>,
}

impl CreativeModeTabParser {
    pub const THING_TYPE: &'static str = "creative_mode_tab";

    pub fn new() -> Self {
        Self {
            things: BuilderSet::new(Self::THING_TYPE),
        }
    }
}

impl Default for CreativeModeTabParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ThingParser for CreativeModeTabParser {
    type Builder = CreativeModeTabBuilder;

    fn thing_type(&self) -> &'static str {
        Self::THING_TYPE
    }

    fn things(&self) -> &BuilderSet<CreativeModeTabBuilder> {
        &self.things
    }

    fn things_mut(&mut self) -> &mut BuilderSet<CreativeModeTabBuilder> {
        &mut self.things
    }

    fn process_thing(
        &self,
        key: &ResourceKey,
        data: &JsonObject,
    ) -> Result<CreativeModeTabBuilder, ThingError> {
        let icon = match data.get("icon") {
            Some(Value::String(item)) => StackContext::new(Some(ResourceKey::parse(item)?)),
            Some(Value::Object(obj)) => parse_stack_context(obj)?.with_item(get_key(obj, "item")?),
            Some(_) => return Err(ThingError::wrong_type("icon", "an item name or a stack object")),
            None => return Err(ThingError::missing("icon")),
        };

        Ok(CreativeModeTabBuilder {
            base: BuilderBase::new(key.clone()),
            label: get_str_opt(data, "label")?.map(str::to_string),
            icon,
        })
    }

    fn finish_loading(
        &self,
        parsers: &ParserRegistry,
        registries: &mut ThingRegistries,
    ) -> Result<(), ThingError> {
        register_all(&self.things, parsers, registries, |r| &mut r.creative_tabs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonthings_nbt::NbtTag;
    use serde_json::json;

    fn build(data: Value) -> Result<std::sync::Arc<CreativeModeTab>, ThingError> {
        let b = CreativeModeTabParser::new().process_thing(
            &ResourceKey::parse("mymod:gems/main").unwrap(),
            data.as_object().unwrap(),
        )?;
        let registries = ThingRegistries::new();
        let parsers = ParserRegistry::new();
        b.build(&BuildContext::new(&registries, &parsers))
    }

    #[test]
    fn icon_as_item_name() {
        let tab = build(json!({"icon": "mymod:ruby"})).unwrap();
        assert_eq!(tab.icon.item(), Some(&ResourceKey::parse("mymod:ruby").unwrap()));
        assert_eq!(tab.label, "itemGroup.mymod.gems.main");
    }

    #[test]
    fn icon_as_stack_with_tag() {
        let tab = build(json!({
            "label": "My Gems",
            "icon": {"item": "mymod:ruby", "count": 2, "nbt": "{Glint:1b}"}
        }))
        .unwrap();
        assert_eq!(tab.label, "My Gems");
        assert_eq!(tab.icon.count(), 2);
        assert_eq!(tab.icon.tag().unwrap()["Glint"], NbtTag::Byte(1));
    }

    #[test]
    fn icon_is_required() {
        assert!(matches!(build(json!({})), Err(ThingError::MissingField { .. })));
        assert!(matches!(build(json!({"icon": 3})), Err(ThingError::WrongType { .. })));
    }
}

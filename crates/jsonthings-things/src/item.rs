//! Items (`item/*.json`), and the items blocks declare for themselves.
//!
//! ```json
//! {
//!   "type": "sword",
//!   "tier": "mymod:ruby",
//!   "attribute_modifiers": [
//!     { "attribute": "generic.attack_damage", "slot": "mainhand", "amount": 5 }
//!   ],
//!   "creative_menu_stacks": [ { "tabs": ["combat"] } ],
//!   "lore": ["Sharp."]
//! }
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use crate::armor_material::{ArmorMaterial, ArmorSlot};
use crate::block::{Block, BlockParser};
use crate::builder::{BuildContext, BuilderBase, ThingBuilder};
use crate::client::ColorHandler;
use crate::error::ThingError;
use crate::food::FoodProperties;
use crate::json::{
    check_int_range, get_array_opt, get_enum_or, get_float, get_int_opt, get_key, get_key_opt,
    get_object_opt, get_str, get_str_opt, get_string_or_array, named_enum, value_as_object,
    value_as_str, JsonObject, NamedEnum,
};
use crate::key::ResourceKey;
use crate::parser::{parse_events, parse_stack_context, register_all, BuilderSet, ThingParser};
use crate::parser_registry::ParserRegistry;
use crate::registry::ThingRegistries;
use crate::stack::StackContext;
use crate::tier::Tier;

pub const DEFAULT_MAX_STACK_SIZE: i32 = 64;

const DISPLAY_NAME: &str = "Item";

named_enum! {
    pub enum EquipmentSlot {
        Mainhand => "mainhand",
        Offhand => "offhand",
        Head => "head",
        Chest => "chest",
        Legs => "legs",
        Feet => "feet",
    }
}

impl From<ArmorSlot> for EquipmentSlot {
    fn from(slot: ArmorSlot) -> Self {
        match slot {
            ArmorSlot::Head => EquipmentSlot::Head,
            ArmorSlot::Chest => EquipmentSlot::Chest,
            ArmorSlot::Legs => EquipmentSlot::Legs,
            ArmorSlot::Feet => EquipmentSlot::Feet,
        }
    }
}

named_enum! {
    pub enum ItemType {
        Plain => "plain",
        Block => "block",
        Sword => "sword",
        Pickaxe => "pickaxe",
        Axe => "axe",
        Shovel => "shovel",
        Hoe => "hoe",
        Armor => "armor",
    }
}

impl ItemType {
    /// Tool types need a tier.
    pub fn is_tool(self) -> bool {
        matches!(
            self,
            ItemType::Sword | ItemType::Pickaxe | ItemType::Axe | ItemType::Shovel | ItemType::Hoe
        )
    }
}

named_enum! {
    /// Animation played while the item is being used.
    pub enum UseAnim {
        None => "none",
        Eat => "eat",
        Drink => "drink",
        Block => "block",
        Bow => "bow",
        Spear => "spear",
        Crossbow => "crossbow",
        Spyglass => "spyglass",
    }
}

named_enum! {
    /// What happens to the stack when using the item completes.
    pub enum CompletionMode {
        UseItem => "use_item",
        ConsumeItem => "consume_item",
    }
}

named_enum! {
    pub enum Operation {
        Addition => "addition",
        MultiplyBase => "multiply_base",
        MultiplyTotal => "multiply_total",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttributeModifier {
    pub attribute: ResourceKey,
    /// `None` applies in every slot.
    pub slot: Option<EquipmentSlot>,
    pub name: String,
    pub amount: f32,
    pub operation: Operation,
}

/// A stack shown in one or more creative tabs.
#[derive(Debug, Clone, PartialEq)]
pub struct CreativeStack {
    pub stack: StackContext,
    pub tabs: Vec<ResourceKey>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArmorProperties {
    pub material: Arc<ArmorMaterial>,
    pub slot: ArmorSlot,
}

#[derive(Debug, Clone)]
pub struct Item {
    pub item_type: ItemType,
    pub max_stack_size: i32,
    pub max_damage: i32,
    pub tier: Option<Arc<Tier>>,
    pub armor: Option<ArmorProperties>,
    pub block: Option<Arc<Block>>,
    pub food: Option<Arc<FoodProperties>>,
    pub use_action: UseAnim,
    /// Ticks of use before the item finishes.
    pub use_time: i32,
    pub use_finish: CompletionMode,
    pub creative_stacks: Vec<CreativeStack>,
    pub attribute_modifiers: Vec<AttributeModifier>,
    pub lore: Vec<String>,
    pub color_handler: Option<ColorHandler>,
    pub events: HashMap<String, Vec<ResourceKey>>,
    /// Item left behind in crafting grids, e.g. an empty bucket.
    pub container_item: Option<ResourceKey>,
}

impl Item {
    pub fn is_damageable(&self) -> bool {
        self.max_damage > 0
    }

    /// Modifiers that apply while the item sits in `slot`.
    pub fn modifiers_for(&self, slot: EquipmentSlot) -> impl Iterator<Item = &AttributeModifier> {
        self.attribute_modifiers
            .iter()
            .filter(move |m| m.slot.map_or(true, |s| s == slot))
    }
}

#[derive(Debug)]
pub struct ItemBuilder {
    base: BuilderBase<Item>,
    owner: Option<&'static str>,
    item_type: ItemType,
    max_stack_size: Option<i32>,
    max_damage: Option<i32>,
    tier: Option<ResourceKey>,
    armor: Option<(ResourceKey, ArmorSlot)>,
    places_block: Option<ResourceKey>,
    food: Option<ResourceKey>,
    use_action: Option<UseAnim>,
    use_time: Option<i32>,
    use_finish: Option<CompletionMode>,
    creative_stacks: Vec<CreativeStack>,
    attribute_modifiers: Vec<AttributeModifier>,
    lore: Vec<String>,
    color_handler: Option<String>,
    events: HashMap<String, Vec<ResourceKey>>,
    container_item: Option<ResourceKey>,
}

impl ItemBuilder {
    pub fn item_type(&self) -> ItemType {
        self.item_type
    }

    pub fn places_block(&self) -> Option<&ResourceKey> {
        self.places_block.as_ref()
    }

    fn build_block(&self, ctx: &BuildContext<'_>) -> Result<Option<Arc<Block>>, ThingError> {
        let Some(key) = &self.places_block else {
            return Ok(None);
        };
        let blocks = ctx
            .parsers
            .get::<BlockParser>()
            .ok_or_else(|| ThingError::not_found(BlockParser::THING_TYPE, key))?;
        Ok(Some(blocks.get_or_crash(key)?.build(ctx)?))
    }
}

impl ThingBuilder for ItemBuilder {
    type Output = Item;

    fn base(&self) -> &BuilderBase<Item> {
        &self.base
    }

    fn thing_type_display_name(&self) -> &'static str {
        DISPLAY_NAME
    }

    fn contained_in(&self) -> Option<&'static str> {
        self.owner
    }

    fn build_internal(&self, ctx: &BuildContext<'_>) -> Result<Item, ThingError> {
        let registries = ctx.registries;

        let tier = self
            .tier
            .as_ref()
            .map(|k| registries.tiers.get_or_crash(k).cloned())
            .transpose()?;

        let armor = match &self.armor {
            Some((material, slot)) => Some(ArmorProperties {
                material: Arc::clone(registries.armor_materials.get_or_crash(material)?),
                slot: *slot,
            }),
            None => None,
        };

        let food = self
            .food
            .as_ref()
            .map(|k| registries.foods.get_or_crash(k).cloned())
            .transpose()?;

        let block = self.build_block(ctx)?;

        for stack in &self.creative_stacks {
            for tab in &stack.tabs {
                registries.creative_tabs.get_or_crash(tab)?;
            }
        }
        for modifier in &self.attribute_modifiers {
            registries.attributes.get_or_crash(&modifier.attribute)?;
        }

        let max_damage = self
            .max_damage
            .or_else(|| tier.as_ref().map(|t| t.uses))
            .or_else(|| armor.as_ref().map(|a| a.material.durability(a.slot)))
            .unwrap_or(0);

        let max_stack_size = match self.max_stack_size {
            Some(size) if max_damage > 0 && size > 1 => {
                return Err(ThingError::invalid(
                    "max_stack_size",
                    "items with durability cannot stack",
                ))
            }
            Some(size) => size,
            None if max_damage > 0 => 1,
            None => DEFAULT_MAX_STACK_SIZE,
        };

        let use_action = self.use_action.unwrap_or(match &food {
            Some(_) => UseAnim::Eat,
            None => UseAnim::None,
        });
        let use_time = self.use_time.unwrap_or(match &food {
            Some(f) if f.fast_food => 16,
            Some(_) => 32,
            None => 0,
        });
        let use_finish = self.use_finish.unwrap_or(match &food {
            Some(_) => CompletionMode::ConsumeItem,
            None => CompletionMode::UseItem,
        });

        let color_handler = self
            .color_handler
            .as_deref()
            .map(ColorHandler::lookup)
            .transpose()?;

        Ok(Item {
            item_type: self.item_type,
            max_stack_size,
            max_damage,
            tier,
            armor,
            block,
            food,
            use_action,
            use_time,
            use_finish,
            creative_stacks: self.creative_stacks.clone(),
            attribute_modifiers: self.attribute_modifiers.clone(),
            lore: self.lore.clone(),
            color_handler,
            events: self.events.clone(),
            container_item: self.container_item.clone(),
        })
    }
}

pub struct ItemParser {
    things: BuilderSet<ItemBuilder>,
}

impl ItemParser {
    pub const THING_TYPE: &'static str = "item";

    pub fn new() -> Self {
        Self {
            things: BuilderSet::new(Self::THING_TYPE),
        }
    }

    /// Read an item document. `block_owner` is set for the `item` object of a
    /// block document: the item then defaults to placing that block and
    /// reports the block as its container on failure.
    pub fn parse_item(
        key: &ResourceKey,
        data: &JsonObject,
        block_owner: Option<&ResourceKey>,
    ) -> Result<ItemBuilder, ThingError> {
        let default_type = match block_owner {
            Some(_) => ItemType::Block,
            None => ItemType::Plain,
        };
        let item_type = get_enum_or(data, "type", default_type)?;

        let tier = get_key_opt(data, "tier")?;
        if item_type.is_tool() && tier.is_none() {
            return Err(ThingError::missing("tier"));
        }

        let armor = match item_type {
            ItemType::Armor => Some((
                get_key(data, "armor_material")?,
                ArmorSlot::parse_field("armor_slot", get_str(data, "armor_slot")?)?,
            )),
            _ => None,
        };

        let places_block = match (item_type, get_key_opt(data, "places_block")?) {
            (ItemType::Block, Some(block)) => Some(block),
            (ItemType::Block, None) => Some(
                block_owner
                    .cloned()
                    .ok_or_else(|| ThingError::missing("places_block"))?,
            ),
            (_, Some(_)) => {
                return Err(ThingError::invalid(
                    "places_block",
                    "only block items place blocks",
                ))
            }
            (_, None) => None,
        };

        let max_stack_size = get_int_opt(data, "max_stack_size")?
            .map(|n| check_int_range("max_stack_size", n, 1..=DEFAULT_MAX_STACK_SIZE))
            .transpose()?;
        let max_damage = get_int_opt(data, "max_damage")?
            .map(|n| check_int_range("max_damage", n, 0..=i32::MAX))
            .transpose()?;
        let use_time = get_int_opt(data, "use_time")?
            .map(|n| check_int_range("use_time", n, 0..=i32::MAX))
            .transpose()?;

        let use_action = get_str_opt(data, "use_action")?
            .map(|s| UseAnim::parse_field("use_action", s))
            .transpose()?;
        let use_finish = get_str_opt(data, "use_finish")?
            .map(|s| CompletionMode::parse_field("use_finish", s))
            .transpose()?;

        let lore = get_array_opt(data, "lore")?
            .map(|lines| {
                lines
                    .iter()
                    .map(|line| value_as_str("lore", line).map(str::to_string))
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?
            .unwrap_or_default();

        let events = match get_object_opt(data, "events")? {
            Some(obj) => parse_events(obj)?,
            None => HashMap::new(),
        };

        Ok(ItemBuilder {
            base: BuilderBase::new(key.clone()),
            owner: block_owner.map(|_| "Block"),
            item_type,
            max_stack_size,
            max_damage,
            tier,
            armor,
            places_block,
            food: get_key_opt(data, "food")?,
            use_action,
            use_time,
            use_finish,
            creative_stacks: parse_creative_stacks(key, data)?,
            attribute_modifiers: parse_attribute_modifiers(key, data)?,
            lore,
            color_handler: get_str_opt(data, "color_handler")?.map(str::to_string),
            events,
            container_item: get_key_opt(data, "container_item")?,
        })
    }
}

impl Default for ItemParser {
    fn default() -> Self {
        Self::new()
    }
}

/// `group` is shorthand for a single plain stack in one tab.
fn parse_creative_stacks(
    key: &ResourceKey,
    data: &JsonObject,
) -> Result<Vec<CreativeStack>, ThingError> {
    let mut stacks = Vec::new();

    if let Some(group) = get_key_opt(data, "group")? {
        stacks.push(CreativeStack {
            stack: StackContext::new(Some(key.clone())),
            tabs: vec![group],
        });
    }

    if let Some(entries) = get_array_opt(data, "creative_menu_stacks")? {
        for entry in entries {
            let entry = value_as_object("creative_menu_stacks", entry)?;
            let tabs = get_string_or_array(entry, "tabs")?
                .ok_or_else(|| ThingError::missing("tabs"))?
                .into_iter()
                .map(ResourceKey::parse)
                .collect::<Result<Vec<_>, _>>()?;
            if tabs.is_empty() {
                return Err(ThingError::invalid("tabs", "must name at least one tab"));
            }
            stacks.push(CreativeStack {
                stack: parse_stack_context(entry)?.with_item(key.clone()),
                tabs,
            });
        }
    }

    Ok(stacks)
}

fn parse_attribute_modifiers(
    key: &ResourceKey,
    data: &JsonObject,
) -> Result<Vec<AttributeModifier>, ThingError> {
    let Some(entries) = get_array_opt(data, "attribute_modifiers")? else {
        return Ok(Vec::new());
    };

    entries
        .iter()
        .map(|entry| -> Result<AttributeModifier, ThingError> {
            let entry = value_as_object("attribute_modifiers", entry)?;
            Ok(AttributeModifier {
                attribute: get_key(entry, "attribute")?,
                slot: get_str_opt(entry, "slot")?
                    .map(|s| EquipmentSlot::parse_field("slot", s))
                    .transpose()?,
                name: get_str_opt(entry, "name")?
                    .map_or_else(|| format!("{key} modifier"), str::to_string),
                amount: get_float(entry, "amount")?,
                operation: get_enum_or(entry, "operation", Operation::Addition)?,
            })
        })
        .collect()
}

impl ThingParser for ItemParser {
    type Builder = ItemBuilder;

    fn thing_type(&self) -> &'static str {
        Self::THING_TYPE
    }

    fn things(&self) -> &BuilderSet<ItemBuilder> {
        &self.things
    }

    fn things_mut(&mut self) -> &mut BuilderSet<ItemBuilder> {
        &mut self.things
    }

    fn process_thing(&self, key: &ResourceKey, data: &JsonObject) -> Result<ItemBuilder, ThingError> {
        Self::parse_item(key, data, None)
    }

    fn finish_loading(
        &self,
        parsers: &ParserRegistry,
        registries: &mut ThingRegistries,
    ) -> Result<(), ThingError> {
        register_all(&self.things, parsers, registries, |r| &mut r.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn key(s: &str) -> ResourceKey {
        ResourceKey::parse(s).unwrap()
    }

    fn process(data: Value) -> Result<ItemBuilder, ThingError> {
        ItemParser::new().process_thing(&key("mymod:thing"), data.as_object().unwrap())
    }

    fn build_with(
        data: Value,
        registries: &ThingRegistries,
        parsers: &ParserRegistry,
    ) -> Result<Arc<Item>, ThingError> {
        process(data)?.build(&BuildContext::new(registries, parsers))
    }

    fn build(data: Value) -> Result<Arc<Item>, ThingError> {
        build_with(data, &ThingRegistries::vanilla(), &ParserRegistry::new())
    }

    #[test]
    fn plain_item_defaults() {
        let item = build(json!({})).unwrap();
        assert_eq!(item.item_type, ItemType::Plain);
        assert_eq!(item.max_stack_size, 64);
        assert!(!item.is_damageable());
        assert_eq!(item.use_action, UseAnim::None);
        assert_eq!(item.use_finish, CompletionMode::UseItem);
    }

    #[test]
    fn sword_takes_durability_from_tier() {
        let item = build(json!({
            "type": "sword",
            "tier": "iron",
            "attribute_modifiers": [
                {"attribute": "generic.attack_damage", "slot": "mainhand", "amount": 5},
                {"attribute": "generic.luck", "amount": 1, "operation": "multiply_total"}
            ]
        }))
        .unwrap();

        assert_eq!(item.max_damage, 250);
        assert_eq!(item.max_stack_size, 1);
        assert_eq!(item.modifiers_for(EquipmentSlot::Mainhand).count(), 2);
        let offhand: Vec<_> = item.modifiers_for(EquipmentSlot::Offhand).collect();
        assert_eq!(offhand.len(), 1);
        assert_eq!(offhand[0].operation, Operation::MultiplyTotal);
        assert_eq!(offhand[0].name, "mymod:thing modifier");
    }

    #[test]
    fn tool_without_tier_is_rejected() {
        assert!(matches!(
            process(json!({"type": "pickaxe"})),
            Err(ThingError::MissingField { field }) if field == "tier"
        ));
    }

    #[test]
    fn armor_takes_durability_from_material() {
        let item = build(json!({
            "type": "armor",
            "armor_material": "diamond",
            "armor_slot": "chest"
        }))
        .unwrap();
        let armor = item.armor.as_ref().unwrap();
        assert_eq!(armor.slot, ArmorSlot::Chest);
        assert_eq!(item.max_damage, 33 * 16);
        assert_eq!(EquipmentSlot::from(armor.slot), EquipmentSlot::Chest);
    }

    #[test]
    fn food_item_defaults_to_eating() {
        let mut registries = ThingRegistries::vanilla();
        registries
            .foods
            .register(
                key("mymod:berry"),
                Arc::new(FoodProperties {
                    nutrition: 2,
                    saturation_modifier: 0.1,
                    meat: false,
                    can_always_eat: false,
                    fast_food: true,
                    effects: Vec::new(),
                }),
            )
            .unwrap();

        let item = build_with(json!({"food": "mymod:berry"}), &registries, &ParserRegistry::new())
            .unwrap();
        assert_eq!(item.use_action, UseAnim::Eat);
        assert_eq!(item.use_time, 16);
        assert_eq!(item.use_finish, CompletionMode::ConsumeItem);
        assert_eq!(item.food.as_ref().unwrap().nutrition, 2);
    }

    #[test]
    fn damageable_items_cannot_stack() {
        let err = build(json!({"max_damage": 10, "max_stack_size": 16})).unwrap_err();
        assert!(matches!(
            err.root_cause(),
            ThingError::Invalid { field, .. } if field == "max_stack_size"
        ));
        assert!(matches!(
            process(json!({"max_stack_size": 65})),
            Err(ThingError::OutOfRange { .. })
        ));
    }

    #[test]
    fn creative_stacks_resolve_tabs() {
        let item = build(json!({
            "group": "misc",
            "creative_menu_stacks": [{"tabs": ["food", "misc"], "count": 3}]
        }))
        .unwrap();
        assert_eq!(item.creative_stacks.len(), 2);
        let stack = &item.creative_stacks[1];
        assert_eq!(stack.stack.item(), Some(&key("mymod:thing")));
        assert_eq!(stack.stack.count(), 3);
        assert_eq!(stack.tabs, [key("food"), key("misc")]);

        let err = build(json!({"creative_menu_stacks": [{"tabs": "mymod:nowhere"}]})).unwrap_err();
        assert!(matches!(
            err.root_cause(),
            ThingError::NotFound { kind, .. } if kind == "creative mode tab"
        ));
    }

    #[test]
    fn unknown_attribute_fails_at_build() {
        let err = build(json!({
            "attribute_modifiers": [{"attribute": "generic.flight", "amount": 1}]
        }))
        .unwrap_err();
        assert_eq!(err.to_string(), "error building Item mymod:thing");
        assert!(matches!(
            err.root_cause(),
            ThingError::NotFound { kind, .. } if kind == "attribute"
        ));
    }

    #[test]
    fn block_item_resolves_through_block_parser() {
        let registries = ThingRegistries::vanilla();
        let mut parsers = ParserRegistry::new();
        parsers.register(BlockParser::new()).unwrap();
        parsers
            .apply("block", vec![(key("mymod:marble"), json!({"material": "stone"}))])
            .unwrap();

        let item = build_with(
            json!({"type": "block", "places_block": "mymod:marble"}),
            &registries,
            &parsers,
        )
        .unwrap();
        let placed = parsers
            .get::<BlockParser>()
            .unwrap()
            .get_or_crash(&key("mymod:marble"))
            .unwrap()
            .build(&BuildContext::new(&registries, &parsers))
            .unwrap();
        assert!(Arc::ptr_eq(item.block.as_ref().unwrap(), &placed));

        let err = build_with(
            json!({"type": "block", "places_block": "mymod:granite"}),
            &registries,
            &parsers,
        )
        .unwrap_err();
        assert_eq!(
            err.root_cause().to_string(),
            "there is no known block with name mymod:granite"
        );
    }

    #[test]
    fn places_block_only_on_block_items() {
        assert!(matches!(
            process(json!({"places_block": "stone"})),
            Err(ThingError::Invalid { .. })
        ));
        assert!(matches!(
            process(json!({"type": "block"})),
            Err(ThingError::MissingField { .. })
        ));
    }

    #[test]
    fn lore_events_and_color() {
        let item = build(json!({
            "lore": ["Shiny.", "Very shiny."],
            "events": {"use": "mymod:sparkle"},
            "color_handler": "tint_index",
            "container_item": "bucket"
        }))
        .unwrap();
        assert_eq!(item.lore, ["Shiny.", "Very shiny."]);
        assert_eq!(item.events["use"], [key("mymod:sparkle")]);
        assert_eq!(item.color_handler, Some(ColorHandler::TintIndex));
        assert_eq!(item.container_item, Some(key("minecraft:bucket")));
    }
}

//! Enchantments (`enchantment/*.json`).

use crate::builder::{BuildContext, BuilderBase, ThingBuilder};
use crate::error::ThingError;
use crate::json::{
    check_int_range, get_bool_or, get_enum_or, get_int_or, get_string_or_array, named_enum,
    JsonObject, NamedEnum,
};
use crate::item::EquipmentSlot;
use crate::key::ResourceKey;
use crate::parser::{register_all, BuilderSet, ThingParser};
use crate::parser_registry::ParserRegistry;
use crate::registry::ThingRegistries;

named_enum! {
    pub enum Rarity {
        Common => "common",
        Uncommon => "uncommon",
        Rare => "rare",
        VeryRare => "very_rare",
    }
}

impl Rarity {
    /// Relative weight when picking enchantments at random.
    pub fn weight(self) -> i32 {
        match self {
            Rarity::Common => 10,
            Rarity::Uncommon => 5,
            Rarity::Rare => 2,
            Rarity::VeryRare => 1,
        }
    }
}

named_enum! {
    /// Which items an enchantment can be applied to.
    pub enum EnchantmentCategory {
        Armor => "armor",
        ArmorFeet => "armor_feet",
        ArmorLegs => "armor_legs",
        ArmorChest => "armor_chest",
        ArmorHead => "armor_head",
        Weapon => "weapon",
        Digger => "digger",
        FishingRod => "fishing_rod",
        Trident => "trident",
        Breakable => "breakable",
        Bow => "bow",
        Wearable => "wearable",
        Crossbow => "crossbow",
        Vanishable => "vanishable",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enchantment {
    pub rarity: Rarity,
    pub category: EnchantmentCategory,
    pub slots: Vec<EquipmentSlot>,
    pub min_level: i32,
    pub max_level: i32,
    pub base_cost: i32,
    pub per_level_cost: i32,
    pub random_cost: i32,
    pub treasure: bool,
    pub curse: bool,
    pub tradeable: bool,
    pub discoverable: bool,
    pub allow_on_books: bool,
    /// Enchantments this one cannot be combined with.
    pub blacklist: Vec<ResourceKey>,
}

impl Enchantment {
    /// Lowest enchanting power that can roll this enchantment at `level`.
    /// Saturates at `i32::MAX`.
    pub fn min_cost(&self, level: i32) -> i32 {
        level
            .saturating_sub(1)
            .saturating_mul(self.per_level_cost)
            .saturating_add(self.base_cost)
    }

    pub fn max_cost(&self, level: i32) -> i32 {
        self.min_cost(level).saturating_add(self.random_cost)
    }

    pub fn is_compatible_with(&self, other: &ResourceKey) -> bool {
        !self.blacklist.contains(other)
    }
}

#[derive(Debug)]
pub struct EnchantmentBuilder {
    base: BuilderBase<Enchantment>,
    template: Enchantment,
}

impl ThingBuilder for EnchantmentBuilder {
    type Output = Enchantment;

    fn base(&self) -> &BuilderBase<Enchantment> {
        &self.base
    }

    fn thing_type_display_name(&self) -> &'static str {
        "Enchantment"
    }

    fn build_internal(&self, _ctx: &BuildContext<'_>) -> Result<Enchantment, ThingError> {
        Ok(self.template.clone())
    }
}

pub struct EnchantmentParser {
    things: BuilderSet<EnchantmentBuilder>,
}

impl EnchantmentParser {
    pub const THING_TYPE: &'static str = "enchantment";

    pub fn new() -> Self {
        Self {
            things: BuilderSet::new(Self::THING_TYPE),
        }
    }
}

impl Default for EnchantmentParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ThingParser for EnchantmentParser {
    type Builder = EnchantmentBuilder;

    fn thing_type(&self) -> &'static str {
        Self::THING_TYPE
    }

    fn things(&self) -> &BuilderSet<EnchantmentBuilder> {
        &self.things
    }

    fn things_mut(&mut self) -> &mut BuilderSet<EnchantmentBuilder> {
        &mut self.things
    }

    fn process_thing(
        &self,
        key: &ResourceKey,
        data: &JsonObject,
    ) -> Result<EnchantmentBuilder, ThingError> {
        let min_level = check_int_range("min_level", get_int_or(data, "min_level", 1)?, 1..=255)?;
        let max_level = check_int_range("max_level", get_int_or(data, "max_level", 1)?, 1..=255)?;
        if min_level > max_level {
            return Err(ThingError::invalid(
                "max_level",
                format!("must not be lower than min_level ({min_level})"),
            ));
        }

        let slots = get_string_or_array(data, "slots")?
            .unwrap_or_default()
            .into_iter()
            .map(|s| EquipmentSlot::parse_field("slots", s))
            .collect::<Result<Vec<_>, _>>()?;

        let blacklist = get_string_or_array(data, "blacklist")?
            .unwrap_or_default()
            .into_iter()
            .map(|s| ResourceKey::relative(key, s))
            .collect::<Result<Vec<_>, _>>()?;

        let template = Enchantment {
            rarity: get_enum_or(data, "rarity", Rarity::Common)?,
            category: get_enum_or(data, "category", EnchantmentCategory::Breakable)?,
            slots,
            min_level,
            max_level,
            base_cost: check_int_range("base_cost", get_int_or(data, "base_cost", 1)?, 0..=i32::MAX)?,
            per_level_cost: check_int_range(
                "per_level_cost",
                get_int_or(data, "per_level_cost", 10)?,
                0..=i32::MAX,
            )?,
            random_cost: check_int_range("random_cost", get_int_or(data, "random_cost", 5)?, 0..=i32::MAX)?,
            treasure: get_bool_or(data, "treasure", false)?,
            curse: get_bool_or(data, "curse", false)?,
            tradeable: get_bool_or(data, "tradeable", true)?,
            discoverable: get_bool_or(data, "discoverable", true)?,
            allow_on_books: get_bool_or(data, "allow_on_books", true)?,
            blacklist,
        };

        Ok(EnchantmentBuilder {
            base: BuilderBase::new(key.clone()),
            template,
        })
    }

    fn finish_loading(
        &self,
        parsers: &ParserRegistry,
        registries: &mut ThingRegistries,
    ) -> Result<(), ThingError> {
        register_all(&self.things, parsers, registries, |r| &mut r.enchantments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn process(data: Value) -> Result<EnchantmentBuilder, ThingError> {
        EnchantmentParser::new().process_thing(
            &ResourceKey::parse("mymod:frost_edge").unwrap(),
            data.as_object().unwrap(),
        )
    }

    #[test]
    fn parse_enchantment() {
        let b = process(json!({
            "rarity": "rare",
            "category": "weapon",
            "slots": ["mainhand"],
            "max_level": 3,
            "base_cost": 10,
            "per_level_cost": 8,
            "treasure": true,
            "blacklist": ["fire_edge", "minecraft:fire_aspect"]
        }))
        .unwrap();

        let registries = ThingRegistries::new();
        let parsers = ParserRegistry::new();
        let e = b.build(&BuildContext::new(&registries, &parsers)).unwrap();
        assert_eq!(e.rarity, Rarity::Rare);
        assert_eq!(e.category, EnchantmentCategory::Weapon);
        assert_eq!(e.slots, [EquipmentSlot::Mainhand]);
        assert_eq!(e.min_cost(3), 26);
        assert_eq!(e.max_cost(3), 31);
        assert!(e.treasure && e.tradeable);
        assert!(!e.is_compatible_with(&ResourceKey::parse("mymod:fire_edge").unwrap()));
        assert!(!e.is_compatible_with(&ResourceKey::parse("minecraft:fire_aspect").unwrap()));
        assert!(e.is_compatible_with(&ResourceKey::parse("minecraft:sharpness").unwrap()));
    }

    #[test]
    fn level_validation() {
        assert!(matches!(
            process(json!({"max_level": 0})),
            Err(ThingError::OutOfRange { .. })
        ));
        assert!(matches!(
            process(json!({"min_level": 3, "max_level": 2})),
            Err(ThingError::Invalid { .. })
        ));
    }

    #[test]
    fn costs_are_non_negative_and_saturate() {
        assert!(matches!(
            process(json!({"base_cost": -1})),
            Err(ThingError::OutOfRange { field, .. }) if field == "base_cost"
        ));
        assert!(matches!(
            process(json!({"per_level_cost": -5})),
            Err(ThingError::OutOfRange { field, .. }) if field == "per_level_cost"
        ));

        let b = process(json!({
            "max_level": 3,
            "base_cost": i32::MAX,
            "per_level_cost": i32::MAX,
            "random_cost": i32::MAX
        }))
        .unwrap();
        let registries = ThingRegistries::new();
        let parsers = ParserRegistry::new();
        let e = b.build(&BuildContext::new(&registries, &parsers)).unwrap();
        assert_eq!(e.min_cost(1), i32::MAX);
        assert_eq!(e.min_cost(3), i32::MAX);
        assert_eq!(e.max_cost(3), i32::MAX);
    }

    #[test]
    fn unknown_category_and_slot() {
        assert!(matches!(
            process(json!({"category": "hat"})),
            Err(ThingError::InvalidEnum { .. })
        ));
        assert!(matches!(
            process(json!({"slots": "tail"})),
            Err(ThingError::InvalidEnum { .. })
        ));
    }
}

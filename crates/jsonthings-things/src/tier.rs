//! Tool tiers (`tier/*.json`).

use crate::builder::{BuildContext, BuilderBase, ThingBuilder};
use crate::error::ThingError;
use crate::json::{check_int_range, get_float, get_int, get_int_or, get_key_opt, JsonObject};
use crate::key::ResourceKey;
use crate::parser::{register_all, BuilderSet, ThingParser};
use crate::parser_registry::ParserRegistry;
use crate::registry::ThingRegistries;

#[derive(Debug, Clone, PartialEq)]
pub struct Tier {
    pub uses: i32,
    pub speed: f32,
    pub attack_damage_bonus: f32,
    pub level: i32,
    pub enchantment_value: i32,
    /// Item that repairs tools of this tier in an anvil. Resolved lazily,
    /// since it is usually declared by the same pack.
    pub repair_ingredient: Option<ResourceKey>,
}

#[derive(Debug)]
pub struct TierBuilder {
    base: BuilderBase<Tier>,
    uses: i32,
    speed: f32,
    attack_damage_bonus: f32,
    level: i32,
    enchantment_value: i32,
    repair_ingredient: Option<ResourceKey>,
}

impl ThingBuilder for TierBuilder {
    type Output = Tier;

    fn base(&self) -> &BuilderBase<Tier> {
        &self.base
    }

    fn thing_type_display_name(&self) -> &'static str {
        "Tier"
    }

    fn build_internal(&self, _ctx: &BuildContext<'_>) -> Result<Tier, ThingError> {
        Ok(Tier {
            uses: self.uses,
            speed: self.speed,
            attack_damage_bonus: self.attack_damage_bonus,
            level: self.level,
            enchantment_value: self.enchantment_value,
            repair_ingredient: self.repair_ingredient.clone(),
        })
    }
}

pub struct TierParser {
    things: BuilderSet<TierBuilder>,
}

impl TierParser {
    pub const THING_TYPE: &'static str = "tier";

    pub fn new() -> Self {
        Self {
            things: BuilderSet::new(Self::THING_TYPE),
        }
    }
}

impl Default for TierParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ThingParser for TierParser {
    type Builder = TierBuilder;

    fn thing_type(&self) -> &'static str {
        Self::THING_TYPE
    }

    fn things(&self) -> &BuilderSet<TierBuilder> {
        &self.things
    }

    fn things_mut(&mut self) -> &mut BuilderSet<TierBuilder> {
        &mut self.things
    }

    fn process_thing(&self, key: &ResourceKey, data: &JsonObject) -> Result<TierBuilder, ThingError> {
        Ok(TierBuilder {
            base: BuilderBase::new(key.clone()),
            uses: check_int_range("uses", get_int(data, "uses")?, 0..=i32::MAX)?,
            speed: get_float(data, "speed")?,
            attack_damage_bonus: get_float(data, "attack_damage_bonus")?,
            level: check_int_range("level", get_int(data, "level")?, 0..=i32::MAX)?,
            enchantment_value: check_int_range(
                "enchantment_value",
                get_int_or(data, "enchantment_value", 0)?,
                0..=i32::MAX,
            )?,
            repair_ingredient: get_key_opt(data, "repair_ingredient")?,
        })
    }

    fn finish_loading(
        &self,
        parsers: &ParserRegistry,
        registries: &mut ThingRegistries,
    ) -> Result<(), ThingError> {
        register_all(&self.things, parsers, registries, |r| &mut r.tiers)
    }
}

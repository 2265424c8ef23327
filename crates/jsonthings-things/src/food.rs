//! Food properties (`food/*.json`).
//!
//! ```json
//! {
//!   "nutrition": 4,
//!   "saturation": 0.3,
//!   "effects": [ { "effect": "regeneration", "duration": 100, "probability": 0.5 } ]
//! }
//! ```

use std::sync::Arc;

use crate::builder::{BuildContext, BuilderBase, ThingBuilder};
use crate::error::ThingError;
use crate::json::{
    check_float_range, check_int_range, get_array_opt, get_bool_or, get_float_or, get_int,
    value_as_object, JsonObject,
};
use crate::key::ResourceKey;
use crate::mob_effect::{MobEffectInstance, MobEffectInstanceBuilder};
use crate::parser::{register_all, BuilderSet, ThingParser};
use crate::parser_registry::ParserRegistry;
use crate::registry::ThingRegistries;

const DISPLAY_NAME: &str = "Food";

#[derive(Debug, Clone, PartialEq)]
pub struct FoodEffect {
    pub effect: Arc<MobEffectInstance>,
    pub probability: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FoodProperties {
    pub nutrition: i32,
    pub saturation_modifier: f32,
    pub meat: bool,
    pub can_always_eat: bool,
    pub fast_food: bool,
    pub effects: Vec<FoodEffect>,
}

#[derive(Debug)]
pub struct FoodBuilder {
    base: BuilderBase<FoodProperties>,
    nutrition: i32,
    saturation_modifier: f32,
    meat: bool,
    can_always_eat: bool,
    fast_food: bool,
    effects: Vec<(MobEffectInstanceBuilder, f32)>,
}

impl FoodBuilder {
    pub fn effects(&self) -> impl Iterator<Item = &MobEffectInstanceBuilder> {
        self.effects.iter().map(|(b, _)| b)
    }
}

impl ThingBuilder for FoodBuilder {
    type Output = FoodProperties;

    fn base(&self) -> &BuilderBase<FoodProperties> {
        &self.base
    }

    fn thing_type_display_name(&self) -> &'static str {
        DISPLAY_NAME
    }

    fn build_internal(&self, ctx: &BuildContext<'_>) -> Result<FoodProperties, ThingError> {
        let effects = self
            .effects
            .iter()
            .map(|(builder, probability)| -> Result<FoodEffect, ThingError> {
                Ok(FoodEffect {
                    effect: builder.build(ctx)?,
                    probability: *probability,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FoodProperties {
            nutrition: self.nutrition,
            saturation_modifier: self.saturation_modifier,
            meat: self.meat,
            can_always_eat: self.can_always_eat,
            fast_food: self.fast_food,
            effects,
        })
    }
}

pub struct FoodParser {
    things: BuilderSet<FoodBuilder>,
}

impl FoodParser {
    pub const THING_TYPE: &'static str = "food";

    pub fn new() -> Self {
        Self {
            things: BuilderSet::new(Self::THING_TYPE),
        }
    }
}

impl Default for FoodParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ThingParser for FoodParser {
    type Builder = FoodBuilder;

    fn thing_type(&self) -> &'static str {
        Self::THING_TYPE
    }

    fn things(&self) -> &BuilderSet<FoodBuilder> {
        &self.things
    }

    fn things_mut(&mut self) -> &mut BuilderSet<FoodBuilder> {
        &mut self.things
    }

    fn process_thing(&self, key: &ResourceKey, data: &JsonObject) -> Result<FoodBuilder, ThingError> {
        let mut effects = Vec::new();
        if let Some(list) = get_array_opt(data, "effects")? {
            for entry in list {
                let entry = value_as_object("effects", entry)?;
                let probability = check_float_range(
                    "probability",
                    get_float_or(entry, "probability", 1.0)?,
                    0.0..=1.0,
                )?;
                effects.push((MobEffectInstanceBuilder::parse(key, DISPLAY_NAME, entry)?, probability));
            }
        }

        Ok(FoodBuilder {
            base: BuilderBase::new(key.clone()),
            nutrition: check_int_range("nutrition", get_int(data, "nutrition")?, 0..=i32::MAX)?,
            saturation_modifier: get_float_or(data, "saturation", 0.0)?,
            meat: get_bool_or(data, "meat", false)?,
            can_always_eat: get_bool_or(data, "always_eat", false)?,
            fast_food: get_bool_or(data, "fast", false)?,
            effects,
        })
    }

    fn finish_loading(
        &self,
        parsers: &ParserRegistry,
        registries: &mut ThingRegistries,
    ) -> Result<(), ThingError> {
        register_all(&self.things, parsers, registries, |r| &mut r.foods)
    }
}

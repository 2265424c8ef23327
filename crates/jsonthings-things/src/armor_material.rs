//! Armor materials (`armor_material/*.json`).
//!
//! ```json
//! {
//!   "durability_multiplier": 20,
//!   "defense": { "head": 2, "chest": 6, "legs": 5, "feet": 2 },
//!   "enchantment_value": 12,
//!   "equip_sound": "item.armor.equip_iron",
//!   "toughness": 1.0
//! }
//! ```

use crate::builder::{BuildContext, BuilderBase, ThingBuilder};
use crate::error::ThingError;
use crate::json::{
    check_float_range, check_int_range, get_float_or, get_int, get_int_or, get_key_opt,
    get_object, get_object_opt, named_enum, value_as_int, JsonObject, NamedEnum,
};
use crate::key::ResourceKey;
use crate::parser::{register_all, BuilderSet, ThingParser};
use crate::parser_registry::ParserRegistry;
use crate::registry::ThingRegistries;

named_enum! {
    pub enum ArmorSlot {
        Head => "head",
        Chest => "chest",
        Legs => "legs",
        Feet => "feet",
    }
}

impl ArmorSlot {
    pub const ALL: [ArmorSlot; 4] = [ArmorSlot::Head, ArmorSlot::Chest, ArmorSlot::Legs, ArmorSlot::Feet];

    /// Base durability per slot, scaled by a material's multiplier.
    pub fn base_durability(self) -> i32 {
        match self {
            ArmorSlot::Head => 11,
            ArmorSlot::Chest => 16,
            ArmorSlot::Legs => 15,
            ArmorSlot::Feet => 13,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArmorMaterial {
    durability: [i32; 4],
    defense: [i32; 4],
    pub enchantment_value: i32,
    pub equip_sound: ResourceKey,
    pub toughness: f32,
    pub knockback_resistance: f32,
    pub repair_ingredient: Option<ResourceKey>,
}

impl ArmorMaterial {
    pub fn durability(&self, slot: ArmorSlot) -> i32 {
        self.durability[slot.index()]
    }

    pub fn defense(&self, slot: ArmorSlot) -> i32 {
        self.defense[slot.index()]
    }

    /// Vanilla-style material: durability is `multiplier` times the slot base.
    pub(crate) fn with_multiplier(
        multiplier: i32,
        defense: [i32; 4],
        enchantment_value: i32,
        equip_sound: ResourceKey,
        toughness: f32,
        knockback_resistance: f32,
    ) -> Self {
        Self {
            durability: ArmorSlot::ALL.map(|s| s.base_durability() * multiplier),
            defense,
            enchantment_value,
            equip_sound,
            toughness,
            knockback_resistance,
            repair_ingredient: None,
        }
    }
}

#[derive(Debug)]
pub struct ArmorMaterialBuilder {
    base: BuilderBase<ArmorMaterial>,
    durability: [i32; 4],
    defense: [i32; 4],
    enchantment_value: i32,
    equip_sound: ResourceKey,
    toughness: f32,
    knockback_resistance: f32,
    repair_ingredient: Option<ResourceKey>,
}

impl ThingBuilder for ArmorMaterialBuilder {
    type Output = ArmorMaterial;

    fn base(&self) -> &BuilderBase<ArmorMaterial> {
        &self.base
    }

    fn thing_type_display_name(&self) -> &'static str {
        "Armor Material"
    }

    fn build_internal(&self, ctx: &BuildContext<'_>) -> Result<ArmorMaterial, ThingError> {
        ctx.registries.sound_events.get_or_crash(&self.equip_sound)?;
        Ok(ArmorMaterial {
            durability: self.durability,
            defense: self.defense,
            enchantment_value: self.enchantment_value,
            equip_sound: self.equip_sound.clone(),
            toughness: self.toughness,
            knockback_resistance: self.knockback_resistance,
            repair_ingredient: self.repair_ingredient.clone(),
        })
    }
}

pub struct ArmorMaterialParser {
    things: BuilderSet<ArmorMaterialBuilder>,
}

impl ArmorMaterialParser {
    pub const THING_TYPE: &'static str = "armor_material";

    pub fn new() -> Self {
        Self {
            things: BuilderSet::new(Self::THING_TYPE),
        }
    }
}

impl Default for ArmorMaterialParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a `{ "head": n, ... }` table; absent slots are zero, unknown slot
/// names are rejected.
fn parse_slot_table(field: &str, table: &JsonObject) -> Result<[i32; 4], ThingError> {
    let mut out = [0; 4];
    for (name, value) in table {
        let slot = ArmorSlot::parse_field(field, name)?;
        out[slot.index()] = check_int_range(field, value_as_int(field, value)?, 0..=i32::MAX)?;
    }
    Ok(out)
}

impl ThingParser for ArmorMaterialParser {
    type Builder = ArmorMaterialBuilder;

    fn thing_type(&self) -> &'static str {
        Self::THING_TYPE
    }

    fn things(&self) -> &BuilderSet<ArmorMaterialBuilder> {
        &self.things
    }

    fn things_mut(&mut self) -> &mut BuilderSet<ArmorMaterialBuilder> {
        &mut self.things
    }

    fn process_thing(
        &self,
        key: &ResourceKey,
        data: &JsonObject,
    ) -> Result<ArmorMaterialBuilder, ThingError> {
        let durability = match get_object_opt(data, "durability")? {
            Some(table) => parse_slot_table("durability", table)?,
            None => {
                let multiplier = check_int_range(
                    "durability_multiplier",
                    get_int(data, "durability_multiplier")?,
                    1..=i32::MAX / 16,
                )?;
                ArmorSlot::ALL.map(|s| s.base_durability() * multiplier)
            }
        };

        let equip_sound = match get_key_opt(data, "equip_sound")? {
            Some(sound) => sound,
            None => ResourceKey::parse("minecraft:item.armor.equip_generic")?,
        };

        Ok(ArmorMaterialBuilder {
            base: BuilderBase::new(key.clone()),
            durability,
            defense: parse_slot_table("defense", get_object(data, "defense")?)?,
            enchantment_value: check_int_range(
                "enchantment_value",
                get_int_or(data, "enchantment_value", 0)?,
                0..=i32::MAX,
            )?,
            equip_sound,
            toughness: get_float_or(data, "toughness", 0.0)?,
            knockback_resistance: check_float_range(
                "knockback_resistance",
                get_float_or(data, "knockback_resistance", 0.0)?,
                0.0..=1.0,
            )?,
            repair_ingredient: get_key_opt(data, "repair_ingredient")?,
        })
    }

    fn finish_loading(
        &self,
        parsers: &ParserRegistry,
        registries: &mut ThingRegistries,
    ) -> Result<(), ThingError> {
        register_all(&self.things, parsers, registries, |r| &mut r.armor_materials)
    }
}

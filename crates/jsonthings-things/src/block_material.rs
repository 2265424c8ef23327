//! Block materials (`block_material/*.json`).
//!
//! ```json
//! { "color_index": 12, "flammable": true, "push_reaction": "destroy" }
//! ```

use crate::builder::{BuildContext, BuilderBase, ThingBuilder};
use crate::error::ThingError;
use crate::json::{check_int_range, get_bool_or, get_enum_or, get_int, named_enum, JsonObject};
use crate::key::ResourceKey;
use crate::parser::{register_all, BuilderSet, ThingParser};
use crate::parser_registry::ParserRegistry;
use crate::registry::ThingRegistries;

/// Number of entries in the map color palette.
pub const MATERIAL_COLOR_COUNT: i32 = 64;

named_enum! {
    /// What happens to a block of this material when a piston pushes it.
    pub enum PushReaction {
        Normal => "normal",
        Destroy => "destroy",
        Block => "block",
    }
}

/// Immutable material descriptor shared by blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockMaterial {
    pub color_index: u8,
    pub liquid: bool,
    pub solid: bool,
    pub blocks_motion: bool,
    pub solid_blocking: bool,
    pub flammable: bool,
    pub replaceable: bool,
    pub push_reaction: PushReaction,
}

impl BlockMaterial {
    /// A plain solid, non-flammable, pushable material.
    pub const fn solid(color_index: u8) -> Self {
        Self {
            color_index,
            liquid: false,
            solid: true,
            blocks_motion: true,
            solid_blocking: true,
            flammable: false,
            replaceable: false,
            push_reaction: PushReaction::Normal,
        }
    }
}

#[derive(Debug)]
pub struct BlockMaterialBuilder {
    base: BuilderBase<BlockMaterial>,
    material: BlockMaterial,
}

impl BlockMaterialBuilder {
    /// Start a builder; the color index must lie in `[0, 64)`.
    pub fn begin(registry_name: ResourceKey, color_index: i32) -> Result<Self, ThingError> {
        let color_index = check_int_range("color_index", color_index, 0..=MATERIAL_COLOR_COUNT - 1)?;
        Ok(Self {
            base: BuilderBase::new(registry_name),
            material: BlockMaterial::solid(color_index as u8),
        })
    }

    pub fn liquid(mut self) -> Self {
        self.material.liquid = true;
        self
    }

    pub fn flammable(mut self) -> Self {
        self.material.flammable = true;
        self
    }

    pub fn replaceable(mut self) -> Self {
        self.material.replaceable = true;
        self
    }

    pub fn non_solid(mut self) -> Self {
        self.material.solid = false;
        self
    }

    pub fn no_collider(mut self) -> Self {
        self.material.blocks_motion = false;
        self
    }

    pub fn not_solid_blocking(mut self) -> Self {
        self.material.solid_blocking = false;
        self
    }

    pub fn push_reaction(mut self, reaction: PushReaction) -> Self {
        self.material.push_reaction = reaction;
        self
    }
}

impl ThingBuilder for BlockMaterialBuilder {
    type Output = BlockMaterial;

    fn base(&self) -> &BuilderBase<BlockMaterial> {
        &self.base
    }

    fn thing_type_display_name(&self) -> &'static str {
        "Block Material"
    }

    fn build_internal(&self, _ctx: &BuildContext<'_>) -> Result<BlockMaterial, ThingError> {
        Ok(self.material.clone())
    }
}

pub struct BlockMaterialParser {
    things: BuilderSet<BlockMaterialBuilder>,
}

impl BlockMaterialParser {
    pub const THING_TYPE: &'static str = "block_material";

    pub fn new() -> Self {
        Self {
            things: BuilderSet::new(Self::THING_TYPE),
        }
    }
}

impl Default for BlockMaterialParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ThingParser for BlockMaterialParser {
    type Builder = BlockMaterialBuilder;

    fn thing_type(&self) -> &'static str {
        Self::THING_TYPE
    }

    fn things(&self) -> &BuilderSet<BlockMaterialBuilder> {
        &self.things
    }

    fn things_mut(&mut self) -> &mut BuilderSet<BlockMaterialBuilder> {
        &mut self.things
    }

    fn process_thing(
        &self,
        key: &ResourceKey,
        data: &JsonObject,
    ) -> Result<BlockMaterialBuilder, ThingError> {
        let mut builder = BlockMaterialBuilder::begin(key.clone(), get_int(data, "color_index")?)?;

        if get_bool_or(data, "liquid", false)? {
            builder = builder.liquid();
        }
        if get_bool_or(data, "flammable", false)? {
            builder = builder.flammable();
        }
        if get_bool_or(data, "replaceable", false)? {
            builder = builder.replaceable();
        }
        if !get_bool_or(data, "solid", true)? {
            builder = builder.non_solid();
        }
        if !get_bool_or(data, "blocks_motion", true)? {
            builder = builder.no_collider();
        }
        if !get_bool_or(data, "solid_blocking", true)? {
            builder = builder.not_solid_blocking();
        }

        let reaction = get_enum_or(data, "push_reaction", PushReaction::Normal)?;
        Ok(builder.push_reaction(reaction))
    }

    fn finish_loading(
        &self,
        parsers: &ParserRegistry,
        registries: &mut ThingRegistries,
    ) -> Result<(), ThingError> {
        register_all(&self.things, parsers, registries, |r| &mut r.block_materials)
    }
}

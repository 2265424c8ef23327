//! Blocks (`block/*.json`).
//!
//! A block document may carry an `item` object. That declares an item with
//! the block's own key, placing the block by default, and is registered right
//! after the block.

use std::collections::HashMap;
use std::sync::Arc;

use crate::block_material::BlockMaterial;
use crate::builder::{BuildContext, BuilderBase, ThingBuilder};
use crate::client::{ColorHandler, RenderLayer};
use crate::error::ThingError;
use crate::item::{ItemBuilder, ItemParser};
use crate::json::{
    check_float_range, check_int_range, get_bool_or, get_enum_or, get_float_or, get_int_or,
    get_key, get_key_opt, get_object_opt, get_str_opt, get_string_or_array, named_enum,
    JsonObject, NamedEnum,
};
use crate::key::ResourceKey;
use crate::parser::{parse_events, BuilderSet, ThingParser};
use crate::parser_registry::ParserRegistry;
use crate::registry::ThingRegistries;
use crate::shape::Shape;

named_enum! {
    pub enum BlockType {
        Plain => "plain",
        Slab => "slab",
        Stairs => "stairs",
        Wall => "wall",
        Fence => "fence",
        FenceGate => "fence_gate",
        RotatedPillar => "rotated_pillar",
        Directional => "directional",
        HorizontalDirectional => "horizontal_directional",
        Leaves => "leaves",
        Falling => "falling",
    }
}

impl BlockType {
    /// Types whose geometry comes with the type and cannot take a shape.
    pub fn has_fixed_shape(self) -> bool {
        matches!(
            self,
            BlockType::Slab | BlockType::Stairs | BlockType::Wall | BlockType::Fence | BlockType::FenceGate
        )
    }
}

#[derive(Debug, Clone)]
pub struct Block {
    pub block_type: BlockType,
    pub material: Arc<BlockMaterial>,
    /// Negative hardness means unbreakable.
    pub hardness: f32,
    pub resistance: f32,
    pub light_emission: i32,
    pub friction: f32,
    pub requires_tool: bool,
    pub see_through: bool,
    pub render_layers: Vec<RenderLayer>,
    pub color_handler: Option<ColorHandler>,
    pub shape: Option<Arc<Shape>>,
    pub events: HashMap<String, Vec<ResourceKey>>,
}

impl Block {
    pub fn is_unbreakable(&self) -> bool {
        self.hardness < 0.0
    }
}

#[derive(Debug)]
pub struct BlockBuilder {
    base: BuilderBase<Block>,
    block_type: BlockType,
    material: ResourceKey,
    hardness: f32,
    resistance: f32,
    light_emission: i32,
    friction: f32,
    requires_tool: bool,
    see_through: bool,
    render_layers: Vec<RenderLayer>,
    color_handler: Option<String>,
    shape: Option<ResourceKey>,
    events: HashMap<String, Vec<ResourceKey>>,
    item: Option<ItemBuilder>,
}

impl BlockBuilder {
    pub fn block_type(&self) -> BlockType {
        self.block_type
    }

    pub fn render_layers(&self) -> &[RenderLayer] {
        &self.render_layers
    }

    pub fn color_handler(&self) -> Option<&str> {
        self.color_handler.as_deref()
    }

    /// The item declared inside this block's document.
    pub fn item(&self) -> Option<&ItemBuilder> {
        self.item.as_ref()
    }
}

impl ThingBuilder for BlockBuilder {
    type Output = Block;

    fn base(&self) -> &BuilderBase<Block> {
        &self.base
    }

    fn thing_type_display_name(&self) -> &'static str {
        "Block"
    }

    fn build_internal(&self, ctx: &BuildContext<'_>) -> Result<Block, ThingError> {
        let material = Arc::clone(ctx.registries.block_materials.get_or_crash(&self.material)?);
        let shape = self
            .shape
            .as_ref()
            .map(|k| ctx.registries.shapes.get_or_crash(k).cloned())
            .transpose()?;
        let color_handler = self
            .color_handler
            .as_deref()
            .map(ColorHandler::lookup)
            .transpose()?;

        Ok(Block {
            block_type: self.block_type,
            material,
            hardness: self.hardness,
            resistance: self.resistance,
            light_emission: self.light_emission,
            friction: self.friction,
            requires_tool: self.requires_tool,
            see_through: self.see_through,
            render_layers: self.render_layers.clone(),
            color_handler,
            shape,
            events: self.events.clone(),
        })
    }
}

/// `render_layers` (one name or a list) wins over the single `render_layer`.
/// Duplicates are dropped, first occurrence kept.
fn parse_render_layers(
    data: &JsonObject,
    block_type: BlockType,
) -> Result<Vec<RenderLayer>, ThingError> {
    let (field, names) = match get_string_or_array(data, "render_layers")? {
        Some(names) => ("render_layers", names),
        None => ("render_layer", get_str_opt(data, "render_layer")?.into_iter().collect()),
    };

    if names.is_empty() {
        if data.contains_key(field) {
            return Err(ThingError::invalid(field, "must name at least one layer"));
        }
        let default = match block_type {
            BlockType::Leaves => RenderLayer::CutoutMipped,
            _ => RenderLayer::Solid,
        };
        return Ok(vec![default]);
    }

    let mut layers = Vec::with_capacity(names.len());
    for name in names {
        let layer = RenderLayer::parse_field(field, name)?;
        if !layers.contains(&layer) {
            layers.push(layer);
        }
    }
    Ok(layers)
}

pub struct BlockParser {
    things: BuilderSet<BlockBuilder>,
}

impl BlockParser {
    pub const THING_TYPE: &'static str = "block";

    pub fn new() -> Self {
        Self {
            things: BuilderSet::new(Self::THING_TYPE),
        }
    }
}

impl Default for BlockParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ThingParser for BlockParser {
    type Builder = BlockBuilder;

    fn thing_type(&self) -> &'static str {
        Self::THING_TYPE
    }

    fn things(&self) -> &BuilderSet<BlockBuilder> {
        &self.things
    }

    fn things_mut(&mut self) -> &mut BuilderSet<BlockBuilder> {
        &mut self.things
    }

    fn process_thing(&self, key: &ResourceKey, data: &JsonObject) -> Result<BlockBuilder, ThingError> {
        let block_type = get_enum_or(data, "type", BlockType::Plain)?;

        let hardness = check_float_range("hardness", get_float_or(data, "hardness", 0.0)?, -1.0..=f32::MAX)?;
        let resistance = check_float_range(
            "resistance",
            get_float_or(data, "resistance", hardness.max(0.0))?,
            0.0..=f32::MAX,
        )?;

        let shape = get_key_opt(data, "shape")?;
        if shape.is_some() && block_type.has_fixed_shape() {
            return Err(ThingError::invalid(
                "shape",
                format!("{} blocks have a fixed shape", block_type.name()),
            ));
        }

        let events = match get_object_opt(data, "events")? {
            Some(obj) => parse_events(obj)?,
            None => HashMap::new(),
        };

        let item = get_object_opt(data, "item")?
            .map(|obj| ItemParser::parse_item(key, obj, Some(key)))
            .transpose()?;

        Ok(BlockBuilder {
            base: BuilderBase::new(key.clone()),
            block_type,
            material: get_key(data, "material")?,
            hardness,
            resistance,
            light_emission: check_int_range("light_emission", get_int_or(data, "light_emission", 0)?, 0..=15)?,
            friction: check_float_range("friction", get_float_or(data, "friction", 0.6)?, 0.0..=1.0)?,
            requires_tool: get_bool_or(data, "requires_tool", false)?,
            see_through: get_bool_or(data, "see_through", block_type == BlockType::Leaves)?,
            render_layers: parse_render_layers(data, block_type)?,
            color_handler: get_str_opt(data, "color_handler")?.map(str::to_string),
            shape,
            events,
            item,
        })
    }

    fn finish_loading(
        &self,
        parsers: &ParserRegistry,
        registries: &mut ThingRegistries,
    ) -> Result<(), ThingError> {
        for builder in self.things.builders() {
            let ctx = BuildContext::new(registries, parsers);
            let block = builder.build(&ctx)?;
            let item = builder.item.as_ref().map(|item| item.build(&ctx)).transpose()?;

            let key = builder.registry_name();
            registries.blocks.register(key.clone(), block)?;
            if let Some(item) = item {
                registries.items.register(key.clone(), item)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemType;
    use serde_json::{json, Value};

    fn key(s: &str) -> ResourceKey {
        ResourceKey::parse(s).unwrap()
    }

    fn process(data: Value) -> Result<BlockBuilder, ThingError> {
        BlockParser::new().process_thing(&key("mymod:marble"), data.as_object().unwrap())
    }

    fn build(data: Value) -> Result<Arc<Block>, ThingError> {
        let registries = ThingRegistries::vanilla();
        let parsers = ParserRegistry::new();
        process(data)?.build(&BuildContext::new(&registries, &parsers))
    }

    #[test]
    fn plain_block_defaults() {
        let block = build(json!({"material": "stone", "hardness": 1.5})).unwrap();
        assert_eq!(block.block_type, BlockType::Plain);
        assert_eq!(block.resistance, 1.5);
        assert_eq!(block.friction, 0.6);
        assert_eq!(block.render_layers, [RenderLayer::Solid]);
        assert!(!block.see_through && !block.is_unbreakable());
        assert!(block.shape.is_none());
    }

    #[test]
    fn leaves_default_to_cutout_mipped() {
        let block = build(json!({"type": "leaves", "material": "leaves"})).unwrap();
        assert_eq!(block.render_layers, [RenderLayer::CutoutMipped]);
        assert!(block.see_through);
    }

    #[test]
    fn render_layers_keep_order_without_duplicates() {
        let b = process(json!({
            "material": "glass",
            "render_layers": ["translucent", "cutout", "translucent"]
        }))
        .unwrap();
        assert_eq!(b.render_layers(), [RenderLayer::Translucent, RenderLayer::Cutout]);

        let b = process(json!({"material": "glass", "render_layer": "tripwire"})).unwrap();
        assert_eq!(b.render_layers(), [RenderLayer::Tripwire]);

        assert!(matches!(
            process(json!({"material": "glass", "render_layers": []})),
            Err(ThingError::Invalid { .. })
        ));
        assert!(matches!(
            process(json!({"material": "glass", "render_layer": "sparkle"})),
            Err(ThingError::InvalidEnum { .. })
        ));
    }

    #[test]
    fn light_emission_range() {
        assert!(process(json!({"material": "stone", "light_emission": 15})).is_ok());
        assert!(matches!(
            process(json!({"material": "stone", "light_emission": 16})),
            Err(ThingError::OutOfRange { .. })
        ));
    }

    #[test]
    fn unknown_type_and_missing_material() {
        assert!(matches!(
            process(json!({"type": "trapdoor", "material": "stone"})),
            Err(ThingError::InvalidEnum { .. })
        ));
        assert!(matches!(process(json!({})), Err(ThingError::MissingField { .. })));
    }

    #[test]
    fn unknown_material_fails_at_build() {
        let err = build(json!({"material": "mymod:cheese"})).unwrap_err();
        assert_eq!(err.to_string(), "error building Block mymod:marble");
        assert!(matches!(
            err.root_cause(),
            ThingError::NotFound { kind, .. } if kind == "block material"
        ));
    }

    #[test]
    fn slabs_cannot_take_a_shape() {
        assert!(matches!(
            process(json!({"type": "slab", "material": "stone", "shape": "mymod:pebble"})),
            Err(ThingError::Invalid { field, .. }) if field == "shape"
        ));
    }

    #[test]
    fn unknown_color_handler_fails_at_build() {
        let err = build(json!({"material": "stone", "color_handler": "sparkly"})).unwrap_err();
        assert!(matches!(
            err.root_cause(),
            ThingError::UnknownName { kind, name } if kind == "color handler" && name == "sparkly"
        ));
        let block = build(json!({"material": "stone", "color_handler": "grass"})).unwrap();
        assert_eq!(block.color_handler, Some(ColorHandler::Grass));
    }

    #[test]
    fn nested_item_is_registered_after_its_block() {
        let mut registries = ThingRegistries::vanilla();
        let mut parsers = ParserRegistry::new();
        parsers.register(BlockParser::new()).unwrap();
        parsers
            .apply(
                "block",
                vec![(
                    key("mymod:marble"),
                    json!({"material": "stone", "item": {"group": "building_blocks"}}),
                )],
            )
            .unwrap();
        parsers.finish_loading(&mut registries).unwrap();

        let block = registries.blocks.get_or_crash(&key("mymod:marble")).unwrap();
        let item = registries.items.get_or_crash(&key("mymod:marble")).unwrap();
        assert_eq!(item.item_type, ItemType::Block);
        assert!(Arc::ptr_eq(item.block.as_ref().unwrap(), block));
    }

    #[test]
    fn nested_item_errors_name_the_block() {
        let b = process(json!({
            "material": "stone",
            "item": {"color_handler": "sparkly"}
        }))
        .unwrap();
        let registries = ThingRegistries::vanilla();
        let parsers = ParserRegistry::new();
        let err = b.item().unwrap().build(&BuildContext::new(&registries, &parsers)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "error building Item mymod:marble (contained in Block)"
        );
    }
}

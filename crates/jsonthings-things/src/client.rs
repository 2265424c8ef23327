//! Client-side bindings produced after a load.
//!
//! Nothing here talks to a renderer. The bindings are plain data that a
//! client applies once the things are registered.

use crate::block::BlockParser;
use crate::builder::ThingBuilder;
use crate::error::ThingError;
use crate::item::ItemParser;
use crate::json::{named_enum, NamedEnum};
use crate::key::ResourceKey;
use crate::parser::ThingParser;
use crate::parser_registry::ParserRegistry;
use crate::registry::ThingRegistries;

named_enum! {
    pub enum RenderLayer {
        Solid => "solid",
        Cutout => "cutout",
        CutoutMipped => "cutout_mipped",
        Translucent => "translucent",
        Tripwire => "tripwire",
    }
}

named_enum! {
    /// Tint providers a block or item can use.
    pub enum ColorHandler {
        Grass => "grass",
        Foliage => "foliage",
        BirchFoliage => "birch_foliage",
        SpruceFoliage => "spruce_foliage",
        Water => "water",
        Redstone => "redstone",
        TintIndex => "tint_index",
    }
}

impl ColorHandler {
    /// Resolve a handler by name. Unknown names are lookup failures.
    pub fn lookup(name: &str) -> Result<Self, ThingError> {
        match Self::from_name(name) {
            Some(handler) => Ok(handler),
            None => Err(ThingError::unknown_name("color handler", name)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderLayerBinding {
    pub block: ResourceKey,
    pub layers: Vec<RenderLayer>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTarget {
    Block,
    Item,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorBinding {
    pub target: ColorTarget,
    pub key: ResourceKey,
    pub handler: ColorHandler,
}

/// Everything a client needs to hook up after the registries are filled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientBindings {
    pub render_layers: Vec<RenderLayerBinding>,
    pub colors: Vec<ColorBinding>,
}

impl ClientBindings {
    /// Walk the block and item parsers in declaration order. Blocks rendered
    /// only in the solid layer need no binding.
    pub fn collect(
        parsers: &ParserRegistry,
        registries: &ThingRegistries,
    ) -> Result<Self, ThingError> {
        let mut bindings = ClientBindings::default();

        if let Some(blocks) = parsers.get::<BlockParser>() {
            for builder in blocks.builders() {
                let key = builder.registry_name();
                let block = registries.blocks.get_or_crash(key)?;

                if block.render_layers != [RenderLayer::Solid] {
                    bindings.render_layers.push(RenderLayerBinding {
                        block: key.clone(),
                        layers: block.render_layers.clone(),
                    });
                }
                if let Some(handler) = block.color_handler {
                    bindings.colors.push(ColorBinding {
                        target: ColorTarget::Block,
                        key: key.clone(),
                        handler,
                    });
                }
            }
        }

        let mut item_keys: Vec<&ResourceKey> = Vec::new();
        if let Some(blocks) = parsers.get::<BlockParser>() {
            item_keys.extend(
                blocks
                    .builders()
                    .iter()
                    .filter_map(|b| b.item())
                    .map(|item| item.registry_name()),
            );
        }
        if let Some(items) = parsers.get::<ItemParser>() {
            item_keys.extend(items.builders().iter().map(|b| b.registry_name()));
        }

        for key in item_keys {
            let item = registries.items.get_or_crash(key)?;
            if let Some(handler) = item.color_handler {
                bindings.colors.push(ColorBinding {
                    target: ColorTarget::Item,
                    key: key.clone(),
                    handler,
                });
            }
        }

        Ok(bindings)
    }
}

//! Two-phase loading: every pack is parsed on a blocking worker, then the
//! caller finishes the load, building and registering everything.

use std::path::{Path, PathBuf};

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::client::ClientBindings;
use crate::error::LoadError;
use crate::pack::{collect_resources, discover_packs, ThingResources};
use crate::parser_registry::ParserRegistry;
use crate::registry::ThingRegistries;

/// Loads the thing packs of one directory.
#[derive(Debug, Clone)]
pub struct ThingLoader {
    packs_dir: PathBuf,
    disabled: Vec<String>,
}

impl ThingLoader {
    pub fn new(packs_dir: impl Into<PathBuf>) -> Self {
        Self {
            packs_dir: packs_dir.into(),
            disabled: Vec::new(),
        }
    }

    /// Packs (by directory name) to leave out.
    pub fn with_disabled(mut self, disabled: Vec<String>) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn packs_dir(&self) -> &Path {
        &self.packs_dir
    }

    /// Start the parse phase on a blocking worker. Must be called from
    /// within a tokio runtime.
    pub fn begin_loading(&self) -> PendingLoad {
        let dir = self.packs_dir.clone();
        let disabled = self.disabled.clone();
        info!(dir = %dir.display(), "Loading thing packs");
        PendingLoad {
            handle: tokio::task::spawn_blocking(move || parse_packs(&dir, &disabled)),
        }
    }
}

/// Discover and merge the packs in `dir`, then hand each parser its
/// documents.
pub fn parse_packs(dir: &Path, disabled: &[String]) -> Result<ParserRegistry, LoadError> {
    let packs = discover_packs(dir, disabled)?;
    let resources = collect_resources(&packs)?;
    let mut parsers = ParserRegistry::with_default_parsers();
    parse_resources(&mut parsers, resources)?;
    Ok(parsers)
}

/// Feed every parser, in registration order, the documents of its content
/// type. Documents of content types nobody parses are dropped.
pub fn parse_resources(
    parsers: &mut ParserRegistry,
    mut resources: ThingResources,
) -> Result<(), LoadError> {
    let thing_types: Vec<&'static str> = parsers.thing_types().collect();
    for thing_type in thing_types {
        parsers.apply(thing_type, resources.take(thing_type))?;
    }

    for thing_type in resources.thing_types() {
        warn!(thing_type, "No parser for thing type, its documents are ignored");
    }
    Ok(())
}

/// A parse phase in flight. Finishing consumes it, so a load can only be
/// finished once.
#[derive(Debug)]
pub struct PendingLoad {
    handle: JoinHandle<Result<ParserRegistry, LoadError>>,
}

impl PendingLoad {
    /// Whether parsing is done; `finish` will not wait if so.
    pub fn is_parsed(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the parse phase, then build and register every thing into
    /// `registries` on the calling task.
    pub async fn finish(self, registries: &mut ThingRegistries) -> Result<LoadedThings, LoadError> {
        let mut parsers = self
            .handle
            .await
            .map_err(|e| LoadError::Task(e.to_string()))??;

        parsers.finish_loading(registries)?;

        let client = ClientBindings::collect(&parsers, registries).map_err(|source| {
            LoadError::Finish {
                thing_type: "client bindings".to_string(),
                source,
            }
        })?;

        info!(
            blocks = registries.blocks.len(),
            items = registries.items.len(),
            render_layers = client.render_layers.len(),
            colors = client.colors.len(),
            "Thing packs loaded"
        );
        Ok(LoadedThings { parsers, client })
    }
}

/// Outcome of a finished load.
#[derive(Debug)]
pub struct LoadedThings {
    pub parsers: ParserRegistry,
    pub client: ClientBindings,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockType;
    use crate::client::{ColorHandler, ColorTarget, RenderLayer};
    use crate::item::ItemType;
    use crate::key::ResourceKey;
    use crate::pack::testing::{temp_dir, write_pack};
    use std::sync::Arc;

    fn key(s: &str) -> ResourceKey {
        ResourceKey::parse(s).unwrap()
    }

    fn write_gems_pack(dir: &Path) {
        write_pack(
            dir,
            "gems",
            &[
                (
                    "gems/block_material/crystal.json",
                    r#"{"color_index": 20, "solid_blocking": false}"#,
                ),
                (
                    "gems/tier/ruby.json",
                    r#"{"uses": 900, "speed": 7.5, "attack_damage_bonus": 2.5, "level": 3}"#,
                ),
                (
                    "gems/creative_mode_tab/gems.json",
                    r#"{"icon": "gems:ruby_sword"}"#,
                ),
                (
                    "gems/enchantment/shine.json",
                    r#"{"rarity": "rare", "category": "weapon", "max_level": 2}"#,
                ),
                (
                    "gems/block/ruby_block.json",
                    r#"{"material": "gems:crystal", "render_layers": ["cutout", "translucent"],
                        "item": {"group": "gems:gems"}}"#,
                ),
                (
                    "gems/block/ruby_ore.json",
                    r#"{"material": "stone", "hardness": 3}"#,
                ),
                (
                    "gems/block/ruby_glass.json",
                    r#"{"material": "glass", "render_layer": "translucent", "color_handler": "water"}"#,
                ),
                (
                    "gems/item/ruby_sword.json",
                    r#"{"type": "sword", "tier": "gems:ruby", "color_handler": "tint_index"}"#,
                ),
            ],
        );
    }

    #[tokio::test]
    async fn load_packs_end_to_end() {
        let dir = temp_dir();
        write_gems_pack(&dir);

        let pending = ThingLoader::new(&dir).begin_loading();
        let mut registries = ThingRegistries::vanilla();
        let loaded = pending.finish(&mut registries).await.unwrap();

        let block = registries.blocks.get_or_crash(&key("gems:ruby_block")).unwrap();
        assert_eq!(block.block_type, BlockType::Plain);
        assert!(!block.material.solid_blocking);

        let block_item = registries.items.get_or_crash(&key("gems:ruby_block")).unwrap();
        assert_eq!(block_item.item_type, ItemType::Block);
        assert!(Arc::ptr_eq(block_item.block.as_ref().unwrap(), block));

        let sword = registries.items.get_or_crash(&key("gems:ruby_sword")).unwrap();
        assert_eq!(sword.max_damage, 900);

        assert!(registries.enchantments.contains(&key("gems:shine")));
        assert!(registries.creative_tabs.contains(&key("gems:gems")));
        assert_eq!(loaded.parsers.builder_count("block"), Some(3));

        // Documents are parsed in key order: ruby_block, ruby_glass, ruby_ore.
        let bound: Vec<_> = loaded
            .client
            .render_layers
            .iter()
            .map(|b| (b.block.to_string(), b.layers.clone()))
            .collect();
        assert_eq!(
            bound,
            [
                (
                    "gems:ruby_block".to_string(),
                    vec![RenderLayer::Cutout, RenderLayer::Translucent]
                ),
                ("gems:ruby_glass".to_string(), vec![RenderLayer::Translucent]),
            ]
        );

        let colors: Vec<_> = loaded
            .client
            .colors
            .iter()
            .map(|c| (c.target, c.key.to_string(), c.handler))
            .collect();
        assert_eq!(
            colors,
            [
                (ColorTarget::Block, "gems:ruby_glass".to_string(), ColorHandler::Water),
                (ColorTarget::Item, "gems:ruby_sword".to_string(), ColorHandler::TintIndex),
            ]
        );

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn bad_document_fails_the_load() {
        let dir = temp_dir();
        write_pack(
            &dir,
            "broken",
            &[
                ("mymod/block_material/ok.json", r#"{"color_index": 1}"#),
                ("mymod/block_material/bad.json", r#"{"color_index": 64}"#),
            ],
        );

        let mut registries = ThingRegistries::vanilla();
        let err = ThingLoader::new(&dir)
            .begin_loading()
            .finish(&mut registries)
            .await
            .unwrap_err();

        match err {
            LoadError::Parse { thing_type, key: k, .. } => {
                assert_eq!(thing_type, "block_material");
                assert_eq!(k, key("mymod:bad"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!registries.block_materials.contains(&key("mymod:ok")));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn unresolved_reference_fails_while_finishing() {
        let dir = temp_dir();
        write_pack(
            &dir,
            "dangling",
            &[("mymod/item/blade.json", r#"{"type": "sword", "tier": "mymod:mithril"}"#)],
        );

        let mut registries = ThingRegistries::vanilla();
        let err = ThingLoader::new(&dir)
            .begin_loading()
            .finish(&mut registries)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "error while finishing item");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn disabled_and_unknown_content_are_ignored() {
        let dir = temp_dir();
        write_pack(&dir, "off", &[("mymod/tier/bad.json", "{}")]);
        write_pack(&dir, "on", &[("mymod/potion/fizz.json", r#"{"color": 5}"#)]);

        let mut registries = ThingRegistries::vanilla();
        let loaded = ThingLoader::new(&dir)
            .with_disabled(vec!["off".to_string()])
            .begin_loading()
            .finish(&mut registries)
            .await
            .unwrap();
        assert_eq!(loaded.parsers.builder_count("tier"), Some(0));
        assert!(loaded.parsers.is_finished());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn parse_phase_runs_without_runtime() {
        let dir = temp_dir();
        write_pack(&dir, "solo", &[("mymod/shape/slab.json", r#"{"boxes": [[0, 0, 0, 16, 8, 16]]}"#)]);

        let parsers = parse_packs(&dir, &[]).unwrap();
        assert_eq!(parsers.builder_count("shape"), Some(1));
        assert!(!parsers.is_finished());

        std::fs::remove_dir_all(&dir).ok();
    }
}

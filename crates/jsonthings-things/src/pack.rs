//! Thing packs on disk.
//!
//! ```text
//! thingpacks/
//!   gems/
//!     pack.mcmeta
//!     things/mymod/block/ruby_block.json    -> block mymod:ruby_block
//!     things/mymod/item/tools/ruby_pick.json -> item  mymod:tools/ruby_pick
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::LoadError;
use crate::key::ResourceKey;

pub const PACK_META_FILE: &str = "pack.mcmeta";
pub const THINGS_DIR: &str = "things";

/// `pack.mcmeta` structure.
#[derive(Debug, Clone, Deserialize)]
pub struct PackMeta {
    pub pack: PackInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PackInfo {
    #[serde(default)]
    pub description: String,
    pub pack_format: i32,
}

impl PackMeta {
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// A pack directory with readable metadata.
#[derive(Debug, Clone)]
pub struct ThingPack {
    pub name: String,
    pub root: PathBuf,
    pub info: PackInfo,
}

/// One document found in a pack.
#[derive(Debug, Clone)]
pub struct PackDocument {
    pub thing_type: String,
    pub key: ResourceKey,
    pub json: Value,
}

impl ThingPack {
    pub fn open(root: &Path) -> Result<Self, LoadError> {
        let meta_path = root.join(PACK_META_FILE);
        let text = std::fs::read_to_string(&meta_path).map_err(|source| LoadError::Io {
            path: meta_path.clone(),
            source,
        })?;
        let meta = PackMeta::parse(&text).map_err(|e| LoadError::PackMeta {
            path: meta_path,
            reason: e.to_string(),
        })?;

        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            name,
            root: root.to_path_buf(),
            info: meta.pack,
        })
    }

    /// Every document under `things/`, in path order. Files that are not
    /// JSON, or that sit outside a `<namespace>/<thing_type>/` directory, are
    /// skipped with a warning.
    pub fn documents(&self) -> Result<Vec<PackDocument>, LoadError> {
        let things = self.root.join(THINGS_DIR);
        if !things.is_dir() {
            return Ok(Vec::new());
        }

        let mut documents = Vec::new();
        for entry in WalkDir::new(&things).sort_by_file_name() {
            let entry = entry.map_err(|e| LoadError::Io {
                path: e.path().map(Path::to_path_buf).unwrap_or_else(|| things.clone()),
                source: e.into(),
            })?;
            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().map_or(true, |x| x != "json") {
                continue;
            }

            let Some((thing_type, key)) = document_identity(&things, path) else {
                warn!(pack = %self.name, path = %path.display(), "Ignoring misplaced thing file");
                continue;
            };

            let text = match std::fs::read_to_string(path) {
                Ok(text) => text,
                Err(e) => {
                    warn!(pack = %self.name, path = %path.display(), "Failed to read thing file: {e}");
                    continue;
                }
            };
            let json = match serde_json::from_str::<Value>(&text) {
                Ok(json) => json,
                Err(e) => {
                    warn!(pack = %self.name, path = %path.display(), "Skipping malformed JSON: {e}");
                    continue;
                }
            };

            documents.push(PackDocument {
                thing_type,
                key,
                json,
            });
        }
        Ok(documents)
    }
}

/// `<namespace>/<thing_type>/<path>.json` relative to `things/`.
fn document_identity(things: &Path, path: &Path) -> Option<(String, ResourceKey)> {
    let relative = path.strip_prefix(things).ok()?.with_extension("");
    let parts: Vec<&str> = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<_>>()?;
    match parts.as_slice() {
        [namespace, thing_type, rest @ ..] if !rest.is_empty() => {
            let key = ResourceKey::new(*namespace, rest.join("/")).ok()?;
            Some((thing_type.to_string(), key))
        }
        _ => None,
    }
}

/// Find the packs in `dir`, sorted by directory name. Directories without a
/// `pack.mcmeta`, packs named in `disabled`, and packs whose metadata cannot
/// be read are left out.
pub fn discover_packs(dir: &Path, disabled: &[String]) -> Result<Vec<ThingPack>, LoadError> {
    if !dir.is_dir() {
        info!(dir = %dir.display(), "Thing pack directory not found, no packs loaded");
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(dir).map_err(|source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut roots: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_dir() && p.join(PACK_META_FILE).is_file())
        .collect();
    roots.sort();

    let mut packs = Vec::new();
    for root in roots {
        match ThingPack::open(&root) {
            Ok(pack) if disabled.contains(&pack.name) => {
                info!(pack = %pack.name, "Thing pack disabled");
            }
            Ok(pack) => {
                debug!(pack = %pack.name, format = pack.info.pack_format, "Found thing pack");
                packs.push(pack);
            }
            Err(e) => warn!("Failed to open thing pack at {}: {e}", root.display()),
        }
    }
    Ok(packs)
}

/// Documents of all packs merged and grouped by content type.
#[derive(Debug, Default)]
pub struct ThingResources {
    by_type: BTreeMap<String, BTreeMap<ResourceKey, Value>>,
}

impl ThingResources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document, returning the one it overrides.
    pub fn insert(&mut self, thing_type: &str, key: ResourceKey, json: Value) -> Option<Value> {
        self.by_type
            .entry(thing_type.to_string())
            .or_default()
            .insert(key, json)
    }

    pub fn thing_types(&self) -> impl Iterator<Item = &str> {
        self.by_type.keys().map(String::as_str)
    }

    pub fn get(&self, thing_type: &str, key: &ResourceKey) -> Option<&Value> {
        self.by_type.get(thing_type)?.get(key)
    }

    /// Remove and return the documents of one content type, ordered by key.
    pub fn take(&mut self, thing_type: &str) -> Vec<(ResourceKey, Value)> {
        self.by_type
            .remove(thing_type)
            .map(|docs| docs.into_iter().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.by_type.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Merge the documents of `packs`. Later packs override earlier ones.
pub fn collect_resources(packs: &[ThingPack]) -> Result<ThingResources, LoadError> {
    let mut resources = ThingResources::new();
    for pack in packs {
        let documents = pack.documents()?;
        info!(pack = %pack.name, documents = documents.len(), "Read thing pack");
        for doc in documents {
            if resources.insert(&doc.thing_type, doc.key.clone(), doc.json).is_some() {
                debug!(pack = %pack.name, thing_type = %doc.thing_type, key = %doc.key, "Overriding thing");
            }
        }
    }
    Ok(resources)
}

//! Registries that built things are registered into.

use std::collections::HashMap;
use std::sync::Arc;

use crate::armor_material::ArmorMaterial;
use crate::block::Block;
use crate::block_material::BlockMaterial;
use crate::creative_tab::CreativeModeTab;
use crate::enchantment::Enchantment;
use crate::error::ThingError;
use crate::food::FoodProperties;
use crate::item::Item;
use crate::key::ResourceKey;
use crate::shape::Shape;
use crate::tier::Tier;
use crate::vanilla;

/// Insertion-ordered map from resource key to a shared entry.
/// Entries can be added, never replaced or removed.
#[derive(Debug)]
pub struct Registry<T> {
    kind: &'static str,
    entries: Vec<(ResourceKey, Arc<T>)>,
    index: HashMap<ResourceKey, usize>,
}

impl<T> Registry<T> {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// What this registry holds, e.g. `"block material"`.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn register(&mut self, key: ResourceKey, value: Arc<T>) -> Result<(), ThingError> {
        if self.index.contains_key(&key) {
            return Err(ThingError::Duplicate {
                kind: self.kind.to_string(),
                name: key,
            });
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        Ok(())
    }

    pub fn get(&self, key: &ResourceKey) -> Option<&Arc<T>> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn get_or_crash(&self, key: &ResourceKey) -> Result<&Arc<T>, ThingError> {
        self.get(key)
            .ok_or_else(|| ThingError::not_found(self.kind, key))
    }

    pub fn contains(&self, key: &ResourceKey) -> bool {
        self.index.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ResourceKey, &Arc<T>)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Registry<()> {
    /// Register a name-only entry.
    pub(crate) fn register_name(&mut self, key: ResourceKey) -> Result<(), ThingError> {
        self.register(key, Arc::new(()))
    }
}

/// Every registry a load can read from or write to.
///
/// `mob_effects`, `attributes` and `sound_events` are name-only: packs may
/// refer to their entries but never declare new ones.
#[derive(Debug)]
pub struct ThingRegistries {
    pub block_materials: Registry<BlockMaterial>,
    pub shapes: Registry<Shape>,
    pub tiers: Registry<Tier>,
    pub armor_materials: Registry<ArmorMaterial>,
    pub foods: Registry<FoodProperties>,
    pub creative_tabs: Registry<CreativeModeTab>,
    pub enchantments: Registry<Enchantment>,
    pub blocks: Registry<Block>,
    pub items: Registry<Item>,
    pub mob_effects: Registry<()>,
    pub attributes: Registry<()>,
    pub sound_events: Registry<()>,
}

impl ThingRegistries {
    /// Empty registries.
    pub fn new() -> Self {
        Self {
            block_materials: Registry::new("block material"),
            shapes: Registry::new("shape"),
            tiers: Registry::new("tier"),
            armor_materials: Registry::new("armor material"),
            foods: Registry::new("food"),
            creative_tabs: Registry::new("creative mode tab"),
            enchantments: Registry::new("enchantment"),
            blocks: Registry::new("block"),
            items: Registry::new("item"),
            mob_effects: Registry::new("mob effect"),
            attributes: Registry::new("attribute"),
            sound_events: Registry::new("sound event"),
        }
    }

    /// Registries pre-filled with the vanilla entries packs commonly refer to.
    pub fn vanilla() -> Self {
        let mut registries = Self::new();
        vanilla::seed(&mut registries);
        registries
    }
}

impl Default for ThingRegistries {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> ResourceKey {
        ResourceKey::parse(s).unwrap()
    }

    #[test]
    fn register_and_lookup() {
        let mut reg: Registry<u32> = Registry::new("number");
        reg.register(key("t:one"), Arc::new(1)).unwrap();
        reg.register(key("t:two"), Arc::new(2)).unwrap();

        assert_eq!(**reg.get(&key("t:two")).unwrap(), 2);
        assert!(reg.contains(&key("t:one")));
        let order: Vec<_> = reg.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(order, ["t:one", "t:two"]);
    }

    #[test]
    fn duplicate_is_rejected() {
        let mut reg: Registry<u32> = Registry::new("number");
        reg.register(key("t:one"), Arc::new(1)).unwrap();
        let err = reg.register(key("t:one"), Arc::new(5)).unwrap_err();
        assert!(matches!(err, ThingError::Duplicate { .. }));
        assert_eq!(**reg.get(&key("t:one")).unwrap(), 1);
    }

    #[test]
    fn missing_entry_names_kind() {
        let reg: Registry<u32> = Registry::new("number");
        assert_eq!(
            reg.get_or_crash(&key("t:none")).unwrap_err().to_string(),
            "there is no known number with name t:none"
        );
    }

    #[test]
    fn vanilla_is_seeded() {
        let r = ThingRegistries::vanilla();
        assert!(r.block_materials.contains(&key("minecraft:stone")));
        assert!(r.tiers.contains(&key("minecraft:iron")));
        assert!(r.armor_materials.contains(&key("minecraft:diamond")));
        assert!(r.mob_effects.contains(&key("minecraft:regeneration")));
        assert!(r.attributes.contains(&key("minecraft:generic.attack_damage")));
        assert!(r.creative_tabs.contains(&key("minecraft:misc")));
        assert!(r.blocks.is_empty());
        assert!(r.items.is_empty());
    }
}

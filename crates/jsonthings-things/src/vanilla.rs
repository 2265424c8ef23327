//! Vanilla entries that thing packs can refer to without declaring them.

use std::sync::Arc;

use tracing::warn;

use crate::armor_material::ArmorMaterial;
use crate::block_material::{BlockMaterial, PushReaction};
use crate::creative_tab::CreativeModeTab;
use crate::key::ResourceKey;
use crate::registry::{Registry, ThingRegistries};
use crate::stack::StackContext;
use crate::tier::Tier;

const MOB_EFFECTS: &[&str] = &[
    "speed",
    "slowness",
    "haste",
    "mining_fatigue",
    "strength",
    "instant_health",
    "instant_damage",
    "jump_boost",
    "nausea",
    "regeneration",
    "resistance",
    "fire_resistance",
    "water_breathing",
    "invisibility",
    "blindness",
    "night_vision",
    "hunger",
    "weakness",
    "poison",
    "wither",
    "health_boost",
    "absorption",
    "saturation",
    "glowing",
    "levitation",
    "luck",
    "unluck",
    "slow_falling",
];

const ATTRIBUTES: &[&str] = &[
    "generic.max_health",
    "generic.follow_range",
    "generic.knockback_resistance",
    "generic.movement_speed",
    "generic.attack_damage",
    "generic.attack_knockback",
    "generic.attack_speed",
    "generic.armor",
    "generic.armor_toughness",
    "generic.luck",
];

const SOUND_EVENTS: &[&str] = &[
    "item.armor.equip_generic",
    "item.armor.equip_leather",
    "item.armor.equip_chain",
    "item.armor.equip_iron",
    "item.armor.equip_gold",
    "item.armor.equip_diamond",
    "item.armor.equip_netherite",
    "item.armor.equip_turtle",
];

/// Tab name, translation suffix, icon item.
const CREATIVE_TABS: &[(&str, &str, &str)] = &[
    ("building_blocks", "buildingBlocks", "bricks"),
    ("decorations", "decorations", "peony"),
    ("redstone", "redstone", "redstone"),
    ("transportation", "transportation", "powered_rail"),
    ("misc", "misc", "lava_bucket"),
    ("food", "food", "apple"),
    ("tools", "tools", "iron_axe"),
    ("combat", "combat", "golden_sword"),
    ("brewing", "brewing", "potion"),
];

/// Fixed vanilla names never clash or fail to parse; a failure here only
/// means an entry is skipped.
fn add<T>(registry: &mut Registry<T>, name: &str, value: T) {
    let result = ResourceKey::parse(name).and_then(|key| registry.register(key, Arc::new(value)));
    if let Err(err) = result {
        warn!(kind = registry.kind(), name, %err, "Skipping vanilla entry");
    }
}

fn key(name: &str) -> Option<ResourceKey> {
    ResourceKey::parse(name).ok()
}

fn material(color_index: u8, tweak: impl FnOnce(&mut BlockMaterial)) -> BlockMaterial {
    let mut material = BlockMaterial::solid(color_index);
    tweak(&mut material);
    material
}

fn seed_block_materials(r: &mut Registry<BlockMaterial>) {
    add(r, "stone", BlockMaterial::solid(11));
    add(r, "metal", BlockMaterial::solid(6));
    add(r, "glass", BlockMaterial::solid(0));
    add(r, "ice", BlockMaterial::solid(5));
    add(r, "dirt", BlockMaterial::solid(10));
    add(r, "sand", BlockMaterial::solid(2));
    add(r, "wood", material(13, |m| m.flammable = true));
    add(r, "wool", material(3, |m| m.flammable = true));
    add(r, "leaves", material(7, |m| {
        m.flammable = true;
        m.solid_blocking = false;
        m.push_reaction = PushReaction::Destroy;
    }));
    add(r, "plant", material(7, |m| {
        m.solid = false;
        m.blocks_motion = false;
        m.push_reaction = PushReaction::Destroy;
    }));
    add(r, "water", material(12, |m| {
        m.liquid = true;
        m.solid = false;
        m.blocks_motion = false;
        m.replaceable = true;
        m.push_reaction = PushReaction::Destroy;
    }));
}

fn seed_tiers(r: &mut Registry<Tier>) {
    let tiers = [
        ("wood", 0, 59, 2.0, 0.0, 15, "oak_planks"),
        ("stone", 1, 131, 4.0, 1.0, 5, "cobblestone"),
        ("iron", 2, 250, 6.0, 2.0, 14, "iron_ingot"),
        ("diamond", 3, 1561, 8.0, 3.0, 10, "diamond"),
        ("gold", 0, 32, 12.0, 0.0, 22, "gold_ingot"),
        ("netherite", 4, 2031, 9.0, 4.0, 15, "netherite_ingot"),
    ];
    for (name, level, uses, speed, attack_damage_bonus, enchantment_value, repair) in tiers {
        add(
            r,
            name,
            Tier {
                uses,
                speed,
                attack_damage_bonus,
                level,
                enchantment_value,
                repair_ingredient: key(repair),
            },
        );
    }
}

fn seed_armor_materials(r: &mut Registry<ArmorMaterial>) {
    // Defense is head, chest, legs, feet.
    let materials = [
        ("leather", 5, [1, 3, 2, 1], 15, "leather", 0.0, 0.0),
        ("chainmail", 15, [2, 5, 4, 1], 12, "chain", 0.0, 0.0),
        ("iron", 15, [2, 6, 5, 2], 9, "iron", 0.0, 0.0),
        ("gold", 7, [2, 5, 3, 1], 25, "gold", 0.0, 0.0),
        ("diamond", 33, [3, 8, 6, 3], 10, "diamond", 2.0, 0.0),
        ("turtle", 25, [2, 6, 5, 2], 9, "turtle", 0.0, 0.0),
        ("netherite", 37, [3, 8, 6, 3], 15, "netherite", 3.0, 0.1),
    ];
    for (name, multiplier, defense, enchantment_value, sound, toughness, knockback_resistance) in
        materials
    {
        let Some(equip_sound) = key(&format!("item.armor.equip_{sound}")) else {
            continue;
        };
        add(
            r,
            name,
            ArmorMaterial::with_multiplier(
                multiplier,
                defense,
                enchantment_value,
                equip_sound,
                toughness,
                knockback_resistance,
            ),
        );
    }
}

fn seed_creative_tabs(r: &mut Registry<CreativeModeTab>) {
    for &(name, label, icon) in CREATIVE_TABS {
        add(
            r,
            name,
            CreativeModeTab {
                label: format!("itemGroup.{label}"),
                icon: StackContext::new(key(icon)),
            },
        );
    }
}

pub(crate) fn seed(registries: &mut ThingRegistries) {
    seed_block_materials(&mut registries.block_materials);
    seed_tiers(&mut registries.tiers);
    seed_armor_materials(&mut registries.armor_materials);
    seed_creative_tabs(&mut registries.creative_tabs);

    for name in MOB_EFFECTS {
        add(&mut registries.mob_effects, name, ());
    }
    for name in ATTRIBUTES {
        add(&mut registries.attributes, name, ());
    }
    for name in SOUND_EVENTS {
        add(&mut registries.sound_events, name, ());
    }
}

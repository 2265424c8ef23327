//! Mob effect instances declared inside other things (e.g. food effects).

use crate::builder::{BuildContext, BuilderBase, ThingBuilder};
use crate::error::ThingError;
use crate::json::{check_int_range, get_bool_or, get_int_or, get_key, JsonObject};
use crate::key::ResourceKey;

#[derive(Debug, Clone, PartialEq)]
pub struct MobEffectInstance {
    pub effect: ResourceKey,
    /// Duration in ticks.
    pub duration: i32,
    pub amplifier: i32,
    pub ambient: bool,
    pub visible: bool,
    pub show_particles: bool,
    pub show_icon: bool,
}

/// Nested builder; shares its owner's registry name and reports the owner's
/// type when it fails.
#[derive(Debug)]
pub struct MobEffectInstanceBuilder {
    base: BuilderBase<MobEffectInstance>,
    owner: &'static str,
    effect: ResourceKey,
    duration: i32,
    amplifier: i32,
    ambient: bool,
    visible: bool,
    show_particles: bool,
    show_icon: bool,
}

impl MobEffectInstanceBuilder {
    pub fn new(owner_name: ResourceKey, owner: &'static str, effect: ResourceKey) -> Self {
        Self {
            base: BuilderBase::new(owner_name),
            owner,
            effect,
            duration: 0,
            amplifier: 0,
            ambient: false,
            visible: true,
            show_particles: true,
            show_icon: true,
        }
    }

    /// Read `{ "effect": "...", "duration": 200, "amplifier": 1, ... }`.
    pub fn parse(
        owner_name: &ResourceKey,
        owner: &'static str,
        data: &JsonObject,
    ) -> Result<Self, ThingError> {
        let mut builder = Self::new(owner_name.clone(), owner, get_key(data, "effect")?);
        builder.set_duration(check_int_range("duration", get_int_or(data, "duration", 0)?, 0..=i32::MAX)?);
        builder.set_amplifier(check_int_range("amplifier", get_int_or(data, "amplifier", 0)?, 0..=255)?);
        builder.set_ambient(get_bool_or(data, "ambient", false)?);
        builder.set_visible(get_bool_or(data, "visible", true)?);
        builder.set_show_particles(get_bool_or(data, "show_particles", true)?);
        builder.set_show_icon(get_bool_or(data, "show_icon", true)?);
        Ok(builder)
    }

    pub fn effect(&self) -> &ResourceKey {
        &self.effect
    }

    pub fn set_duration(&mut self, duration: i32) {
        self.duration = duration;
    }

    pub fn set_amplifier(&mut self, amplifier: i32) {
        self.amplifier = amplifier;
    }

    pub fn set_ambient(&mut self, ambient: bool) {
        self.ambient = ambient;
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn set_show_particles(&mut self, show_particles: bool) {
        self.show_particles = show_particles;
    }

    pub fn set_show_icon(&mut self, show_icon: bool) {
        self.show_icon = show_icon;
    }
}

impl ThingBuilder for MobEffectInstanceBuilder {
    type Output = MobEffectInstance;

    fn base(&self) -> &BuilderBase<MobEffectInstance> {
        &self.base
    }

    fn thing_type_display_name(&self) -> &'static str {
        "Mob Effect Instance"
    }

    fn contained_in(&self) -> Option<&'static str> {
        Some(self.owner)
    }

    fn build_internal(&self, ctx: &BuildContext<'_>) -> Result<MobEffectInstance, ThingError> {
        ctx.registries.mob_effects.get_or_crash(&self.effect)?;
        Ok(MobEffectInstance {
            effect: self.effect.clone(),
            duration: self.duration,
            amplifier: self.amplifier,
            ambient: self.ambient,
            visible: self.visible,
            show_particles: self.show_particles,
            show_icon: self.show_icon,
        })
    }
}

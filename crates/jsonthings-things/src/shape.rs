//! Collision/outline shapes (`shape/*.json`).
//!
//! Boxes are written in pixel coordinates, `[x1, y1, z1, x2, y2, z2]` with
//! every value in `0..=16`, and stored in block units.

use crate::builder::{BuildContext, BuilderBase, ThingBuilder};
use crate::error::ThingError;
use crate::json::{check_float_range, get_array_opt, value_as_float, JsonObject};
use crate::key::ResourceKey;
use crate::parser::{register_all, BuilderSet, ThingParser};
use crate::parser_registry::ParserRegistry;
use crate::registry::ThingRegistries;

/// An axis-aligned box in block units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl Aabb {
    /// Box from pixel coordinates, as written in documents.
    pub fn from_pixels(coords: [f32; 6]) -> Self {
        let [x1, y1, z1, x2, y2, z2] = coords.map(|c| c / 16.0);
        Self {
            min: [x1.min(x2), y1.min(y2), z1.min(z2)],
            max: [x1.max(x2), y1.max(y2), z1.max(z2)],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub boxes: Vec<Aabb>,
}

impl Shape {
    pub fn full_block() -> Self {
        Self {
            boxes: vec![Aabb {
                min: [0.0; 3],
                max: [1.0; 3],
            }],
        }
    }

    /// Smallest box enclosing every part of the shape.
    pub fn bounds(&self) -> Option<Aabb> {
        let mut boxes = self.boxes.iter();
        let first = *boxes.next()?;
        Some(boxes.fold(first, |acc, b| Aabb {
            min: [0, 1, 2].map(|i| acc.min[i].min(b.min[i])),
            max: [0, 1, 2].map(|i| acc.max[i].max(b.max[i])),
        }))
    }
}

#[derive(Debug)]
pub struct ShapeBuilder {
    base: BuilderBase<Shape>,
    boxes: Vec<Aabb>,
}

impl ShapeBuilder {
    pub fn new(registry_name: ResourceKey) -> Self {
        Self {
            base: BuilderBase::new(registry_name),
            boxes: Vec::new(),
        }
    }

    pub fn add_box(&mut self, aabb: Aabb) {
        self.boxes.push(aabb);
    }
}

impl ThingBuilder for ShapeBuilder {
    type Output = Shape;

    fn base(&self) -> &BuilderBase<Shape> {
        &self.base
    }

    fn thing_type_display_name(&self) -> &'static str {
        "Shape"
    }

    fn build_internal(&self, _ctx: &BuildContext<'_>) -> Result<Shape, ThingError> {
        Ok(Shape {
            boxes: self.boxes.clone(),
        })
    }
}

pub struct ShapeParser {
    things: BuilderSet<ShapeBuilder>,
}

impl ShapeParser {
    pub const THING_TYPE: &'static str = "shape";

    pub fn new() -> Self {
        Self {
            things: BuilderSet::new(Self::THING_TYPE),
        }
    }
}

impl Default for ShapeParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Read one `[x1, y1, z1, x2, y2, z2]` array.
pub(crate) fn parse_box(value: &serde_json::Value) -> Result<Aabb, ThingError> {
    let coords = value
        .as_array()
        .filter(|a| a.len() == 6)
        .ok_or_else(|| ThingError::wrong_type("boxes", "an array of 6 numbers"))?;
    let mut out = [0.0f32; 6];
    for (slot, v) in out.iter_mut().zip(coords) {
        *slot = check_float_range("boxes", value_as_float("boxes", v)?, 0.0..=16.0)?;
    }
    Ok(Aabb::from_pixels(out))
}

impl ThingParser for ShapeParser {
    type Builder = ShapeBuilder;

    fn thing_type(&self) -> &'static str {
        Self::THING_TYPE
    }

    fn things(&self) -> &BuilderSet<ShapeBuilder> {
        &self.things
    }

    fn things_mut(&mut self) -> &mut BuilderSet<ShapeBuilder> {
        &mut self.things
    }

    fn process_thing(&self, key: &ResourceKey, data: &JsonObject) -> Result<ShapeBuilder, ThingError> {
        let boxes = get_array_opt(data, "boxes")?.ok_or_else(|| ThingError::missing("boxes"))?;
        if boxes.is_empty() {
            return Err(ThingError::invalid("boxes", "at least one box is required"));
        }

        let mut builder = ShapeBuilder::new(key.clone());
        for b in boxes {
            builder.add_box(parse_box(b)?);
        }
        Ok(builder)
    }

    fn finish_loading(
        &self,
        parsers: &ParserRegistry,
        registries: &mut ThingRegistries,
    ) -> Result<(), ThingError> {
        register_all(&self.things, parsers, registries, |r| &mut r.shapes)
    }
}

//! Data-driven game content.
//!
//! Thing packs declare blocks, items, enchantments, foods, shapes, tiers and
//! materials as JSON documents. Loading runs in two phases: every document is
//! parsed into a builder, then a finishing pass builds the final values and
//! registers them into [`ThingRegistries`].

pub mod armor_material;
pub mod block;
pub mod block_material;
pub mod builder;
pub mod client;
pub mod creative_tab;
pub mod enchantment;
pub mod error;
pub mod food;
pub mod item;
pub mod json;
pub mod key;
pub mod loader;
pub mod mob_effect;
pub mod pack;
pub mod parser;
pub mod parser_registry;
pub mod registry;
pub mod shape;
pub mod stack;
pub mod tier;
mod vanilla;

pub use builder::{BuildContext, ThingBuilder};
pub use client::ClientBindings;
pub use error::{LoadError, ThingError};
pub use key::ResourceKey;
pub use loader::{LoadedThings, PendingLoad, ThingLoader};
pub use parser::ThingParser;
pub use parser_registry::ParserRegistry;
pub use registry::{Registry, ThingRegistries};
pub use stack::StackContext;

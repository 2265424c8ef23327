//! NBT tag model and SNBT text format.
//!
//! Thing documents carry item tag data either as an embedded JSON object or
//! as an SNBT string; both end up here as an [`NbtCompound`].

pub mod error;
pub mod snbt;
pub mod tag;

pub use error::NbtError;
pub use snbt::{parse_compound, parse_tag};
pub use tag::{compound_to_snbt, NbtCompound, NbtTag};

//! Item stack descriptions used by creative tabs and icons.

use std::fmt;

use jsonthings_nbt::{compound_to_snbt, NbtCompound};

use crate::key::ResourceKey;

/// An item-like reference with a count and optional tag data.
///
/// Immutable; the `with_*` methods return modified copies.
#[derive(Debug, Clone, PartialEq)]
pub struct StackContext {
    item: Option<ResourceKey>,
    count: i32,
    tag: Option<NbtCompound>,
}

impl StackContext {
    pub fn new(item: Option<ResourceKey>) -> Self {
        Self {
            item,
            count: 1,
            tag: None,
        }
    }

    pub fn with_item(&self, item: ResourceKey) -> Self {
        Self {
            item: Some(item),
            ..self.clone()
        }
    }

    pub fn with_count(&self, count: i32) -> Self {
        Self {
            count,
            ..self.clone()
        }
    }

    pub fn with_tag(&self, tag: NbtCompound) -> Self {
        Self {
            tag: Some(tag),
            ..self.clone()
        }
    }

    pub fn item(&self) -> Option<&ResourceKey> {
        self.item.as_ref()
    }

    pub fn count(&self) -> i32 {
        self.count
    }

    pub fn tag(&self) -> Option<&NbtCompound> {
        self.tag.as_ref()
    }
}

impl Default for StackContext {
    fn default() -> Self {
        Self::new(None)
    }
}

impl fmt::Display for StackContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.item {
            Some(item) => write!(f, "{} {item}", self.count)?,
            None => write!(f, "{} <self>", self.count)?,
        }
        if let Some(tag) = &self.tag {
            write!(f, " {}", compound_to_snbt(tag))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonthings_nbt::NbtTag;

    #[test]
    fn with_methods_copy() {
        let base = StackContext::default();
        let counted = base.with_count(16);
        assert_eq!(base.count(), 1);
        assert_eq!(counted.count(), 16);

        let mut tag = NbtCompound::new();
        tag.insert("Damage".into(), NbtTag::Int(3));
        let tagged = counted.with_tag(tag.clone());
        assert!(counted.tag().is_none());
        assert_eq!(tagged.tag(), Some(&tag));
        assert_eq!(tagged.count(), 16);
    }

    #[test]
    fn display() {
        let stack = StackContext::new(Some(ResourceKey::parse("mymod:ruby").unwrap())).with_count(3);
        assert_eq!(stack.to_string(), "3 mymod:ruby");
        assert_eq!(StackContext::default().to_string(), "1 <self>");
    }
}

//! Namespaced resource keys (`namespace:path`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use crate::error::ThingError;

/// Namespace used when a key string has no `:`.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Uniquely names one declared thing, and the registry entry it becomes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceKey {
    namespace: String,
    path: String,
}

impl ResourceKey {
    /// Build a key from its two halves, validating both.
    pub fn new(namespace: impl Into<String>, path: impl Into<String>) -> Result<Self, ThingError> {
        let namespace = namespace.into();
        let path = path.into();
        if namespace.is_empty() || !namespace.chars().all(is_namespace_char) {
            return Err(ThingError::InvalidKey(format!("{namespace}:{path}")));
        }
        if path.is_empty() || !path.chars().all(is_path_char) {
            return Err(ThingError::InvalidKey(format!("{namespace}:{path}")));
        }
        Ok(Self { namespace, path })
    }

    /// Parse `namespace:path`, or a bare `path` in the default namespace.
    pub fn parse(s: &str) -> Result<Self, ThingError> {
        match s.split_once(':') {
            Some((namespace, path)) => Self::new(namespace, path),
            None => Self::new(DEFAULT_NAMESPACE, s),
        }
    }

    /// Resolve `name` against the namespace of `owner` when it carries none.
    ///
    /// `"ruby"` declared inside `mymod:ruby_block` becomes `mymod:ruby`;
    /// `"minecraft:stone"` stays as written.
    pub fn relative(owner: &ResourceKey, name: &str) -> Result<Self, ThingError> {
        if name.contains(':') {
            Self::parse(name)
        } else {
            Self::new(owner.namespace.clone(), name)
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

fn is_namespace_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '_' | '.' | '-')
}

fn is_path_char(c: char) -> bool {
    is_namespace_char(c) || c == '/'
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl FromStr for ResourceKey {
    type Err = ThingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for ResourceKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_namespaced() {
        let key = ResourceKey::parse("mymod:gems/ruby").unwrap();
        assert_eq!(key.namespace(), "mymod");
        assert_eq!(key.path(), "gems/ruby");
        assert_eq!(key.to_string(), "mymod:gems/ruby");
    }

    #[test]
    fn bare_path_uses_default_namespace() {
        let key: ResourceKey = "stone".parse().unwrap();
        assert_eq!(key.namespace(), "minecraft");
        assert_eq!(key.path(), "stone");
    }

    #[test]
    fn relative_keeps_owner_namespace() {
        let owner = ResourceKey::parse("mymod:ruby_block").unwrap();
        assert_eq!(
            ResourceKey::relative(&owner, "ruby").unwrap(),
            ResourceKey::parse("mymod:ruby").unwrap()
        );
        assert_eq!(
            ResourceKey::relative(&owner, "minecraft:stone").unwrap(),
            ResourceKey::parse("minecraft:stone").unwrap()
        );
    }

    #[test]
    fn invalid_keys() {
        assert!(ResourceKey::parse("My Mod:thing").is_err());
        assert!(ResourceKey::parse("mymod:").is_err());
        assert!(ResourceKey::parse(":thing").is_err());
        assert!(ResourceKey::parse("mymod:Thing").is_err());
        assert!(ResourceKey::parse("a:b:c").is_err());
    }

    #[test]
    fn deserialize_from_string() {
        let key: ResourceKey = serde_json::from_str("\"mymod:ruby\"").unwrap();
        assert_eq!(key.path(), "ruby");
        assert!(serde_json::from_str::<ResourceKey>("\"BAD KEY\"").is_err());
    }
}

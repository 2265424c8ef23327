//! NBT tag types.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A compound tag: map of name -> tag.
pub type NbtCompound = HashMap<String, NbtTag>;

/// Represents any NBT value.
#[derive(Debug, Clone, PartialEq)]
pub enum NbtTag {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(Vec<NbtTag>),
    Compound(NbtCompound),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl NbtTag {
    /// Returns the numeric tag type ID (1-12). TAG_End is 0 but not representable here.
    pub fn tag_type_id(&self) -> u8 {
        match self {
            NbtTag::Byte(_) => 1,
            NbtTag::Short(_) => 2,
            NbtTag::Int(_) => 3,
            NbtTag::Long(_) => 4,
            NbtTag::Float(_) => 5,
            NbtTag::Double(_) => 6,
            NbtTag::ByteArray(_) => 7,
            NbtTag::String(_) => 8,
            NbtTag::List(_) => 9,
            NbtTag::Compound(_) => 10,
            NbtTag::IntArray(_) => 11,
            NbtTag::LongArray(_) => 12,
        }
    }

    /// Human-readable tag type name, as used in error messages.
    pub fn tag_type_name(&self) -> &'static str {
        match self {
            NbtTag::Byte(_) => "TAG_Byte",
            NbtTag::Short(_) => "TAG_Short",
            NbtTag::Int(_) => "TAG_Int",
            NbtTag::Long(_) => "TAG_Long",
            NbtTag::Float(_) => "TAG_Float",
            NbtTag::Double(_) => "TAG_Double",
            NbtTag::ByteArray(_) => "TAG_Byte_Array",
            NbtTag::String(_) => "TAG_String",
            NbtTag::List(_) => "TAG_List",
            NbtTag::Compound(_) => "TAG_Compound",
            NbtTag::IntArray(_) => "TAG_Int_Array",
            NbtTag::LongArray(_) => "TAG_Long_Array",
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            NbtTag::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&NbtCompound> {
        match self {
            NbtTag::Compound(v) => Some(v),
            _ => None,
        }
    }
}

/// Writes the tag as SNBT. Compound keys are emitted in sorted order so the
/// output is stable.
impl fmt::Display for NbtTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NbtTag::Byte(v) => write!(f, "{v}b"),
            NbtTag::Short(v) => write!(f, "{v}s"),
            NbtTag::Int(v) => write!(f, "{v}"),
            NbtTag::Long(v) => write!(f, "{v}L"),
            NbtTag::Float(v) => write!(f, "{v}f"),
            NbtTag::Double(v) => write!(f, "{v}d"),
            NbtTag::ByteArray(v) => write_array(f, "B", v.iter().map(|b| format!("{b}B"))),
            NbtTag::String(v) => write_quoted(f, v),
            NbtTag::List(v) => {
                f.write_str("[")?;
                for (i, tag) in v.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{tag}")?;
                }
                f.write_str("]")
            }
            NbtTag::Compound(v) => write_compound(f, v),
            NbtTag::IntArray(v) => write_array(f, "I", v.iter().map(|i| i.to_string())),
            NbtTag::LongArray(v) => write_array(f, "L", v.iter().map(|l| format!("{l}L"))),
        }
    }
}

/// Formats a compound as SNBT.
pub fn compound_to_snbt(compound: &NbtCompound) -> String {
    struct Wrapper<'a>(&'a NbtCompound);
    impl fmt::Display for Wrapper<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write_compound(f, self.0)
        }
    }
    Wrapper(compound).to_string()
}

fn write_compound(f: &mut fmt::Formatter<'_>, compound: &NbtCompound) -> fmt::Result {
    let sorted: BTreeMap<&String, &NbtTag> = compound.iter().collect();
    f.write_str("{")?;
    for (i, (key, tag)) in sorted.into_iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        if !key.is_empty() && key.chars().all(is_unquoted_char) {
            f.write_str(key)?;
        } else {
            write_quoted(f, key)?;
        }
        write!(f, ":{tag}")?;
    }
    f.write_str("}")
}

fn write_array(
    f: &mut fmt::Formatter<'_>,
    prefix: &str,
    items: impl Iterator<Item = String>,
) -> fmt::Result {
    write!(f, "[{prefix};")?;
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        f.write_str(&item)?;
    }
    f.write_str("]")
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        if c == '"' || c == '\\' {
            f.write_str("\\")?;
        }
        write!(f, "{c}")?;
    }
    f.write_str("\"")
}

/// Characters allowed in unquoted SNBT keys and values.
pub(crate) fn is_unquoted_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_type_ids() {
        assert_eq!(NbtTag::Byte(0).tag_type_id(), 1);
        assert_eq!(NbtTag::Int(0).tag_type_id(), 3);
        assert_eq!(NbtTag::String(String::new()).tag_type_id(), 8);
        assert_eq!(NbtTag::Compound(NbtCompound::new()).tag_type_id(), 10);
        assert_eq!(NbtTag::LongArray(vec![]).tag_type_id(), 12);
    }

    #[test]
    fn accessors() {
        let mut c = NbtCompound::new();
        c.insert("n".into(), NbtTag::Int(1));
        assert_eq!(NbtTag::Compound(c.clone()).as_compound(), Some(&c));
        assert_eq!(NbtTag::Int(1).as_compound(), None);
        assert_eq!(NbtTag::String("hello".into()).as_string(), Some("hello"));
        assert_eq!(NbtTag::Int(5).as_string(), None);
    }

    #[test]
    fn display_is_snbt() {
        let mut c = NbtCompound::new();
        c.insert("b".into(), NbtTag::Byte(1));
        c.insert("a".into(), NbtTag::String("say \"hi\"".into()));
        c.insert("with space".into(), NbtTag::IntArray(vec![1, 2]));
        assert_eq!(
            compound_to_snbt(&c),
            r#"{a:"say \"hi\"",b:1b,"with space":[I;1,2]}"#
        );
    }
}

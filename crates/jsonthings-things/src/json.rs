//! Field accessors for raw thing documents.
//!
//! Every accessor names the field it was reading in its error, so a failure
//! can be traced back to the JSON fragment that caused it.
//!
//! Documents are read field by field instead of through `#[derive(Deserialize)]`
//! structs. A derived struct reports a failure as one serde message, while
//! thing errors must be a typed `ThingError` (missing field, wrong type, out of
//! range, unknown enum value) that names the field. Several fields also take
//! more than one shape, such as a string or an array, or an inline object or
//! an SNBT string. Fixed-format files such as `pack.mcmeta` still use serde
//! derive.

use std::ops::RangeInclusive;

use serde_json::Value;

use crate::error::ThingError;
use crate::key::ResourceKey;

pub type JsonObject = serde_json::Map<String, Value>;

/// A closed set of values spelled as lowercase strings in documents.
pub trait NamedEnum: Sized + Copy + 'static {
    const NAMES: &'static [&'static str];

    fn from_name(name: &str) -> Option<Self>;

    fn name(self) -> &'static str;

    /// Look up `value`, failing with an enumeration error for `field`.
    fn parse_field(field: &str, value: &str) -> Result<Self, ThingError> {
        Self::from_name(value).ok_or_else(|| ThingError::InvalidEnum {
            field: field.to_string(),
            value: value.to_string(),
            allowed: Self::NAMES,
        })
    }
}

/// Declares a fieldless enum together with its [`NamedEnum`] spelling table.
macro_rules! named_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        $vis enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $crate::json::NamedEnum for $name {
            const NAMES: &'static [&'static str] = &[$($text),+];

            fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($text => Some(Self::$variant),)+
                    _ => None,
                }
            }

            fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }
    };
}
pub(crate) use named_enum;

/// Require the document root to be an object.
pub fn as_object(value: &Value) -> Result<&JsonObject, ThingError> {
    value
        .as_object()
        .ok_or_else(|| ThingError::wrong_type("<root>", "an object"))
}

fn require<'a>(obj: &'a JsonObject, field: &str) -> Result<&'a Value, ThingError> {
    obj.get(field).ok_or_else(|| ThingError::missing(field))
}

pub fn value_as_int(field: &str, value: &Value) -> Result<i32, ThingError> {
    let v = value
        .as_i64()
        .ok_or_else(|| ThingError::wrong_type(field, "an integer"))?;
    i32::try_from(v).map_err(|_| ThingError::OutOfRange {
        field: field.to_string(),
        value: v as f64,
        min: i32::MIN as f64,
        max: i32::MAX as f64,
    })
}

pub fn value_as_float(field: &str, value: &Value) -> Result<f32, ThingError> {
    value
        .as_f64()
        .map(|v| v as f32)
        .ok_or_else(|| ThingError::wrong_type(field, "a number"))
}

pub fn value_as_str<'a>(field: &str, value: &'a Value) -> Result<&'a str, ThingError> {
    value
        .as_str()
        .ok_or_else(|| ThingError::wrong_type(field, "a string"))
}

pub fn value_as_object<'a>(field: &str, value: &'a Value) -> Result<&'a JsonObject, ThingError> {
    value
        .as_object()
        .ok_or_else(|| ThingError::wrong_type(field, "an object"))
}

pub fn get_int(obj: &JsonObject, field: &str) -> Result<i32, ThingError> {
    value_as_int(field, require(obj, field)?)
}

pub fn get_int_or(obj: &JsonObject, field: &str, default: i32) -> Result<i32, ThingError> {
    obj.get(field)
        .map_or(Ok(default), |v| value_as_int(field, v))
}

pub fn get_int_opt(obj: &JsonObject, field: &str) -> Result<Option<i32>, ThingError> {
    obj.get(field).map(|v| value_as_int(field, v)).transpose()
}

pub fn get_float(obj: &JsonObject, field: &str) -> Result<f32, ThingError> {
    value_as_float(field, require(obj, field)?)
}

pub fn get_float_or(obj: &JsonObject, field: &str, default: f32) -> Result<f32, ThingError> {
    obj.get(field)
        .map_or(Ok(default), |v| value_as_float(field, v))
}

pub fn get_bool_or(obj: &JsonObject, field: &str, default: bool) -> Result<bool, ThingError> {
    obj.get(field).map_or(Ok(default), |v| {
        v.as_bool()
            .ok_or_else(|| ThingError::wrong_type(field, "a boolean"))
    })
}

pub fn get_str<'a>(obj: &'a JsonObject, field: &str) -> Result<&'a str, ThingError> {
    value_as_str(field, require(obj, field)?)
}

pub fn get_str_opt<'a>(obj: &'a JsonObject, field: &str) -> Result<Option<&'a str>, ThingError> {
    obj.get(field).map(|v| value_as_str(field, v)).transpose()
}

pub fn get_object<'a>(obj: &'a JsonObject, field: &str) -> Result<&'a JsonObject, ThingError> {
    value_as_object(field, require(obj, field)?)
}

pub fn get_object_opt<'a>(
    obj: &'a JsonObject,
    field: &str,
) -> Result<Option<&'a JsonObject>, ThingError> {
    obj.get(field).map(|v| value_as_object(field, v)).transpose()
}

pub fn get_array_opt<'a>(
    obj: &'a JsonObject,
    field: &str,
) -> Result<Option<&'a Vec<Value>>, ThingError> {
    obj.get(field)
        .map(|v| {
            v.as_array()
                .ok_or_else(|| ThingError::wrong_type(field, "an array"))
        })
        .transpose()
}

/// Required resource key field.
pub fn get_key(obj: &JsonObject, field: &str) -> Result<ResourceKey, ThingError> {
    ResourceKey::parse(get_str(obj, field)?)
}

pub fn get_key_opt(obj: &JsonObject, field: &str) -> Result<Option<ResourceKey>, ThingError> {
    get_str_opt(obj, field)?
        .map(ResourceKey::parse)
        .transpose()
}

/// Optional enum field, falling back to `default` when absent.
pub fn get_enum_or<T: NamedEnum>(obj: &JsonObject, field: &str, default: T) -> Result<T, ThingError> {
    match get_str_opt(obj, field)? {
        Some(s) => T::parse_field(field, s),
        None => Ok(default),
    }
}

/// A field that may hold either one string or an array of strings.
pub fn get_string_or_array<'a>(
    obj: &'a JsonObject,
    field: &str,
) -> Result<Option<Vec<&'a str>>, ThingError> {
    match obj.get(field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(vec![s.as_str()])),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| value_as_str(field, item))
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(_) => Err(ThingError::wrong_type(
            field,
            "a string or an array of strings",
        )),
    }
}

pub fn check_int_range(
    field: &str,
    value: i32,
    range: RangeInclusive<i32>,
) -> Result<i32, ThingError> {
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(ThingError::OutOfRange {
            field: field.to_string(),
            value: value as f64,
            min: *range.start() as f64,
            max: *range.end() as f64,
        })
    }
}

pub fn check_float_range(
    field: &str,
    value: f32,
    range: RangeInclusive<f32>,
) -> Result<f32, ThingError> {
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(ThingError::OutOfRange {
            field: field.to_string(),
            value: value as f64,
            min: *range.start() as f64,
            max: *range.end() as f64,
        })
    }
}

use crate::Error;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    NULL,
    Int(i64),
    UInt(u64),
    String(String),
    Bytes(Vec<u8>),
    Float(f64),
    Boolean(bool),

    Array(Vec<Value>),

    /// date-time
    DateTime(DateTime<Local>),

    /// json
    Json(serde_json::Value),

    /// uuid
    Uuid(uuid::Uuid),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::NULL)
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn try_into_vec(self) -> Result<Vec<Value>, Error> {
        match self {
            Value::Array(v) => Ok(v),
            _ => Err(Error::type_mismatch()),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::NULL => write!(f, "NULL"),
            Value::Int(value) => write!(f, "{}", value),
            Value::UInt(value) => write!(f, "{}", value),
            Value::String(value) => write!(f, "{}", value),
            Value::Bytes(value) => write!(f, "Bytes (len: {}) <{:02X?}>", value.len(), value),
            Value::Float(value) => write!(f, "{}", value),
            Value::Boolean(value) => write!(f, "{}", if *value { "true" } else { "false" }),
            Value::DateTime(value) => write!(f, "{}", value.format("%Y-%m-%d %H:%M:%S")),
            Value::Array(value) => write!(f, "Array (len: {}) {:?}", value.len(), value),
            Value::Json(value) => write!(f, "{}", value),
            Value::Uuid(value) => write!(f, "{}", value),
        }
    }
}

impl Eq for Value {}
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::NULL, Value::NULL) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::UInt(a), Value::UInt(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::Json(a), Value::Json(b)) => a == b,
            (Value::Uuid(a), Value::Uuid(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            _ => false,
        }
    }
}

macro_rules! from_to_value {
    ($variant:ident, $source:ty) => {
        impl From<$source> for Value {
            #[inline]
            fn from(value: $source) -> Self {
                Value::$variant(value)
            }
        }

        impl From<Option<$source>> for Value {
            #[inline]
            fn from(value: Option<$source>) -> Self {
                match value {
                    None => Value::NULL,
                    Some(value) => Value::$variant(value),
                }
            }
        }

        impl TryFrom<Value> for $source {
            type Error = Error;

            #[inline]
            fn try_from(value: Value) -> Result<Self, Self::Error> {
                match value {
                    Value::$variant(value) => Ok(value),
                    _ => Err(Error::type_mismatch()),
                }
            }
        }
    };
}

// int/uint implementations
macro_rules! from_traits_int_impl {
    ($variant:ident, $target:ty, $($source:ty),*) => {$(
        impl From<$source> for Value {
            #[inline]
            fn from(value: $source) -> Self {
                Value::$variant(value as $target)
            }
        }

        impl From<&$source> for Value {
            #[inline]
            fn from(value: &$source) -> Self {
                Value::$variant(*value as $target)
            }
        }

        impl TryFrom<&Value> for $source {
            type Error = Error;

            #[inline]
            fn try_from(value: &Value) -> Result<Self, Self::Error> {
                match value {
                    Value::Int(value) => Ok(<$source>::try_from(*value)?),
                    Value::UInt(value) => Ok(<$source>::try_from(*value)?),
                    _ => Err(Error::type_mismatch())
                }
            }
        }
    )*}
}

from_traits_int_impl!(Int, i64, i8, i16, i32, i64, isize);
from_traits_int_impl!(UInt, u64, u8, u16, u32, u64, usize);

from_to_value!(String, String);
from_to_value!(Json, serde_json::Value);
from_to_value!(Uuid, uuid::Uuid);
from_to_value!(Boolean, bool);
from_to_value!(Float, f64);

impl<V: Into<Value>> From<Vec<V>> for Value {
    fn from(value: Vec<V>) -> Self {
        Value::Array(value.into_iter().map(|v| v.into()).collect())
    }
}

impl From<&[u8]> for Value {
    #[inline]
    fn from(value: &[u8]) -> Self {
        Value::Bytes(Vec::from(value))
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Value::String(value.into())
    }
}

impl From<Option<&str>> for Value {
    #[inline]
    fn from(value: Option<&str>) -> Self {
        value.map_or(Value::NULL, Value::from)
    }
}

impl From<f32> for Value {
    #[inline]
    fn from(value: f32) -> Self {
        Value::Float(value as f64)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Value {
    #[inline]
    fn from(value: DateTime<Tz>) -> Self {
        Value::DateTime(Local.from_utc_datetime(&value.naive_utc()))
    }
}

impl<Tz: TimeZone> From<&DateTime<Tz>> for Value {
    #[inline]
    fn from(value: &DateTime<Tz>) -> Self {
        Value::DateTime(Local.from_utc_datetime(&value.naive_utc()))
    }
}

/// Naive date-times are interpreted in the local time zone.
impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::DateTime(
            Local
                .from_local_datetime(&value)
                .earliest()
                .unwrap_or_else(|| Local.from_utc_datetime(&value)),
        )
    }
}

impl TryFrom<Value> for DateTime<Utc> {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::DateTime(dt) => Ok(dt.into()),
            Value::String(s) => Ok(NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S")
                .or_else(|_| NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S%.f"))?
                .and_utc()),
            _ => Err(Error::type_mismatch()),
        }
    }
}

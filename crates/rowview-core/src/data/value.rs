use super::{Decimal, Type, ValueObject};

use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    /// Null value
    #[default]
    Null,

    /// Boolean value
    Bool(bool),

    /// Signed 32-bit integer
    I32(i32),

    /// Signed 64-bit integer
    I64(i64),

    /// 64-bit floating point number
    F64(f64),

    /// Fixed-point decimal number
    Decimal(Decimal),

    /// String value
    String(String),

    /// Named fields, produced for structured output
    Object(ValueObject),
}

impl Value {
    pub const fn null() -> Self {
        Self::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub const fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// Returns the type of this value, or `None` for null.
    ///
    /// Objects do not know which model produced them, so they report an
    /// anonymous object type.
    pub fn infer_ty(&self) -> Option<Type> {
        Some(match self {
            Self::Null => return None,
            Self::Bool(_) => Type::Bool,
            Self::I32(_) => Type::I32,
            Self::I64(_) => Type::I64,
            Self::F64(_) => Type::F64,
            Self::Decimal(_) => Type::Decimal,
            Self::String(_) => Type::String,
            Self::Object(_) => Type::Object(String::new()),
        })
    }

    /// Returns `true` if this value can be stored in a field of type `ty`.
    /// Null is accepted by every type; nullability is checked separately.
    pub fn is_a(&self, ty: &Type) -> bool {
        match self {
            Self::Null => true,
            Self::Bool(_) => ty.is_bool(),
            Self::I32(_) => matches!(ty, Type::I32),
            Self::I64(_) => matches!(ty, Type::I64),
            Self::F64(_) => matches!(ty, Type::F64),
            Self::Decimal(_) => matches!(ty, Type::Decimal),
            Self::String(_) => ty.is_string(),
            Self::Object(_) => ty.is_object(),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ValueObject> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    #[track_caller]
    pub fn expect_object(&self) -> &ValueObject {
        match self {
            Self::Object(object) => object,
            _ => panic!("expected object; actual={self:#?}"),
        }
    }

    pub fn into_object(self) -> Option<ValueObject> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Takes the value, leaving null in its place.
    pub fn take(&mut self) -> Value {
        std::mem::take(self)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::I32(v) => write!(f, "{v}"),
            Value::I64(v) => write!(f, "{v}"),
            Value::F64(v) => write!(f, "{v}"),
            Value::Decimal(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "{v:?}"),
            Value::Object(object) => {
                f.write_str("{")?;
                for (i, (name, value)) in object.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name:?}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::I32(v) => serializer.serialize_i32(*v),
            Value::I64(v) => serializer.serialize_i64(*v),
            Value::F64(v) => serializer.serialize_f64(*v),
            Value::Decimal(v) => Serialize::serialize(v, serializer),
            Value::String(v) => serializer.serialize_str(v),
            Value::Object(object) => object.serialize(serializer),
        }
    }
}

impl From<bool> for Value {
    fn from(src: bool) -> Self {
        Self::Bool(src)
    }
}

impl From<Decimal> for Value {
    fn from(src: Decimal) -> Self {
        Self::Decimal(src)
    }
}

impl From<String> for Value {
    fn from(src: String) -> Self {
        Self::String(src)
    }
}

impl From<&String> for Value {
    fn from(src: &String) -> Self {
        Self::String(src.clone())
    }
}

impl From<&str> for Value {
    fn from(src: &str) -> Self {
        Self::String(src.to_string())
    }
}

impl From<ValueObject> for Value {
    fn from(src: ValueObject) -> Self {
        Self::Object(src)
    }
}

impl<T> From<Option<T>> for Value
where
    Self: From<T>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::from(value),
            None => Self::Null,
        }
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// The type of a column or an output field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Type {
    /// Boolean value
    Bool,

    /// Signed 32-bit integer
    I32,

    /// Signed 64-bit integer
    I64,

    /// 64-bit floating point number
    F64,

    /// Fixed-point decimal number
    Decimal,

    /// String type
    String,

    /// An instance of the named output model
    Object(String),
}

impl Type {
    pub fn object(name: impl Into<String>) -> Self {
        Self::Object(name.into())
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool)
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Self::String)
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::I32 | Self::I64 | Self::F64 | Self::Decimal)
    }

    /// Returns `true` for every type except objects.
    pub fn is_scalar(&self) -> bool {
        !self.is_object()
    }

    /// Returns `true` if a value of this type can be stored in `to` without
    /// an explicit conversion rule.
    ///
    /// Only lossless widenings qualify:
    ///
    /// | from  | to                       |
    /// |-------|--------------------------|
    /// | `I32` | `I64`, `F64`, `Decimal`  |
    /// | `I64` | `Decimal`                |
    ///
    /// plus the identity for every type.
    pub fn widens_to(&self, to: &Type) -> bool {
        use Type::*;

        self == to
            || matches!(
                (self, to),
                (I32, I64) | (I32, F64) | (I32, Decimal) | (I64, Decimal)
            )
    }

    /// Returns `true` if a string column may be parsed into this type.
    pub fn is_parse_target(&self) -> bool {
        self.is_bool() || self.is_numeric()
    }

    /// Returns `true` if a checked numeric conversion from this type to `to`
    /// exists. The conversion may still fail for individual values.
    pub fn narrows_to(&self, to: &Type) -> bool {
        self.is_numeric() && to.is_numeric()
    }

    /// Returns `true` if values of this type have a string representation.
    pub fn is_formattable(&self) -> bool {
        self.is_scalar()
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Bool => f.write_str("Bool"),
            Type::I32 => f.write_str("I32"),
            Type::I64 => f.write_str("I64"),
            Type::F64 => f.write_str("F64"),
            Type::Decimal => f.write_str("Decimal"),
            Type::String => f.write_str("String"),
            Type::Object(name) => write!(f, "Object({name})"),
        }
    }
}

impl From<&Self> for Type {
    fn from(value: &Self) -> Self {
        value.clone()
    }
}

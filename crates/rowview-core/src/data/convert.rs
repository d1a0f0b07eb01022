use super::{Decimal, Type, Value};
use crate::{Error, Result};

use std::str::FromStr;

impl Type {
    /// Widens `value` into this type.
    ///
    /// Only the conversions listed by [`Type::widens_to`] are performed.
    /// Null values are passed through.
    pub fn cast(&self, value: Value) -> Result<Value> {
        if value.is_null() || value.is_a(self) {
            return Ok(value);
        }

        Ok(match (value, self) {
            (Value::I32(v), Type::I64) => Value::I64(v.into()),
            (Value::I32(v), Type::F64) => Value::F64(v.into()),
            (Value::I32(v), Type::Decimal) => Value::Decimal(v.into()),
            (Value::I64(v), Type::Decimal) => Value::Decimal(v.into()),
            (value, _) => return Err(Error::type_conversion(value, self.clone())),
        })
    }

    /// Parses a string value into this type.
    ///
    /// Booleans accept `true`/`false` in any letter case. Surrounding
    /// whitespace is not trimmed: `" 30"` does not parse as an integer.
    pub fn parse(&self, value: Value) -> Result<Value> {
        let s = match value {
            Value::Null => return Ok(Value::Null),
            Value::String(ref s) => s.as_str(),
            value => return Err(Error::type_conversion(value, self.clone())),
        };

        let parsed = match self {
            Type::Bool if s.eq_ignore_ascii_case("true") => Ok(Value::Bool(true)),
            Type::Bool if s.eq_ignore_ascii_case("false") => Ok(Value::Bool(false)),
            Type::Bool => Err("not a boolean".to_string()),
            Type::I32 => s.parse::<i32>().map(Value::I32).map_err(|e| e.to_string()),
            Type::I64 => s.parse::<i64>().map(Value::I64).map_err(|e| e.to_string()),
            Type::F64 => s.parse::<f64>().map(Value::F64).map_err(|e| e.to_string()),
            Type::Decimal => Decimal::from_str(s)
                .map(Value::Decimal)
                .map_err(|e| e.to_string()),
            Type::String => return Ok(value),
            Type::Object(_) => Err("objects cannot be parsed".to_string()),
        };

        parsed.map_err(|reason| Error::type_conversion_because(value.clone(), self.clone(), reason))
    }

    /// Converts a numeric value into this numeric type, failing when the
    /// value does not fit exactly (overflow, fractional part, precision loss).
    pub fn narrow(&self, value: Value) -> Result<Value> {
        if value.is_null() {
            return Ok(value);
        }

        match self {
            Type::I32 => i32::try_from(value).map(Value::I32),
            Type::I64 => i64::try_from(value).map(Value::I64),
            Type::F64 => f64::try_from(value).map(Value::F64),
            Type::Decimal => Decimal::try_from(value).map(Value::Decimal),
            _ => Err(Error::type_conversion(value, self.clone())),
        }
    }

    /// Renders a scalar value as a string.
    pub fn format(value: Value) -> Result<Value> {
        Ok(match value {
            Value::Null => Value::Null,
            Value::String(_) => value,
            Value::Bool(v) => Value::String(v.to_string()),
            Value::I32(v) => Value::String(v.to_string()),
            Value::I64(v) => Value::String(v.to_string()),
            Value::F64(v) => Value::String(v.to_string()),
            Value::Decimal(v) => Value::String(v.to_string()),
            value @ Value::Object(_) => return Err(Error::type_conversion(value, Type::String)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widen_i32_to_decimal() {
        assert_eq!(
            Type::Decimal.cast(Value::I32(7)).unwrap(),
            Value::Decimal(Decimal::from(7))
        );
    }

    #[test]
    fn widen_rejects_narrowing() {
        assert!(Type::I32.cast(Value::I64(7)).is_err());
    }

    #[test]
    fn parse_empty_string_fails() {
        let err = Type::I64.parse(Value::from("")).unwrap_err();
        assert!(err.is_type_conversion());
        assert!(err.to_string().starts_with("cannot convert \"\" to I64"));
    }

    #[test]
    fn parse_bool_any_case() {
        assert_eq!(Type::Bool.parse(Value::from("TRUE")).unwrap(), Value::Bool(true));
        assert!(Type::Bool.parse(Value::from("yes")).is_err());
    }

    #[test]
    fn narrow_overflow() {
        assert!(Type::I32.narrow(Value::I64(i64::MAX)).is_err());
        assert_eq!(Type::I32.narrow(Value::I64(12)).unwrap(), Value::I32(12));
    }

    #[test]
    fn format_scalars() {
        assert_eq!(Type::format(Value::I64(30)).unwrap(), Value::from("30"));
        assert_eq!(Type::format(Value::Null).unwrap(), Value::Null);
    }
}

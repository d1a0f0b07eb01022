use super::{Decimal, Type, Value};
use crate::Error;

use rust_decimal::prelude::ToPrimitive;

macro_rules! impl_num {
    (
        $(
            $variant:ident($ty:ty)
        )*
    ) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }

            impl From<&$ty> for Value {
                fn from(value: &$ty) -> Self {
                    Self::$variant(*value)
                }
            }
        )*
    };
}

impl_num! {
    I32(i32)
    I64(i64)
    F64(f64)
}

// Conversions out of `Value` accept any numeric variant whose value fits
// the target exactly; anything else is a type conversion error.

impl TryFrom<Value> for i32 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::I32(val) => Ok(val),
            Value::I64(val) => {
                i32::try_from(val).map_err(|_| out_of_range(Value::I64(val), Type::I32))
            }
            Value::Decimal(val) if val.fract().is_zero() => val
                .to_i32()
                .ok_or_else(|| out_of_range(Value::Decimal(val), Type::I32)),
            Value::F64(val) if val.fract() == 0.0 && val.is_finite() => {
                let narrowed = val as i32;
                if narrowed as f64 == val {
                    Ok(narrowed)
                } else {
                    Err(out_of_range(Value::F64(val), Type::I32))
                }
            }
            value => Err(Error::type_conversion(value, Type::I32)),
        }
    }
}

impl TryFrom<Value> for i64 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::I32(val) => Ok(val.into()),
            Value::I64(val) => Ok(val),
            Value::Decimal(val) if val.fract().is_zero() => val
                .to_i64()
                .ok_or_else(|| out_of_range(Value::Decimal(val), Type::I64)),
            // 2^63 is exactly representable as f64 but not as i64, hence `<`.
            Value::F64(val)
                if val.fract() == 0.0 && val >= i64::MIN as f64 && val < i64::MAX as f64 =>
            {
                Ok(val as i64)
            }
            Value::F64(val) if val.fract() == 0.0 => Err(out_of_range(Value::F64(val), Type::I64)),
            value => Err(Error::type_conversion(value, Type::I64)),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::I32(val) => Ok(val.into()),
            Value::I64(val) => {
                let widened = val as f64;
                // Reject integers that do not survive the round trip.
                if widened as i64 == val && widened != i64::MAX as f64 {
                    Ok(widened)
                } else {
                    Err(Error::type_conversion_because(
                        Value::I64(val),
                        Type::F64,
                        "precision loss",
                    ))
                }
            }
            Value::F64(val) => Ok(val),
            Value::Decimal(val) => val
                .to_f64()
                .ok_or_else(|| out_of_range(Value::Decimal(val), Type::F64)),
            value => Err(Error::type_conversion(value, Type::F64)),
        }
    }
}

impl TryFrom<Value> for Decimal {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::I32(val) => Ok(val.into()),
            Value::I64(val) => Ok(val.into()),
            Value::Decimal(val) => Ok(val),
            Value::F64(val) => Decimal::try_from(val)
                .map_err(|err| Error::type_conversion_because(Value::F64(val), Type::Decimal, err)),
            value => Err(Error::type_conversion(value, Type::Decimal)),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(val) => Ok(val),
            value => Err(Error::type_conversion(value, Type::Bool)),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(val) => Ok(val),
            value => Err(Error::type_conversion(value, Type::String)),
        }
    }
}

fn out_of_range(value: Value, ty: Type) -> Error {
    Error::type_conversion_because(value, ty, "out of range")
}

//! Values produced by rows and transformers, and the types that describe them.

mod convert;

mod num;

mod ty;
pub use ty::Type;

mod value;
pub use value::Value;

mod value_object;
pub use value_object::ValueObject;

pub use rust_decimal::Decimal;

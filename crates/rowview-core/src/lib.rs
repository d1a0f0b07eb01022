#[macro_use]
mod macros;

pub mod data;

mod error;
pub use error::{Error, IntoError};

pub mod row;
pub use row::{Columns, Row, RowSource};

/// A Result type alias that uses rowview's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

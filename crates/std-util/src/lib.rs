pub mod result;
pub mod sync;

pub mod prelude {
    pub use crate::{assert_err, assert_ok, sync::run_concurrently};
}

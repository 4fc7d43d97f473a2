//! Sheet and output validation.

mod validate;

pub use validate::*;

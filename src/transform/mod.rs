//! Sheet transformations.

mod placement;

pub use placement::*;

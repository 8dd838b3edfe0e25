//! Domain models for the medicine lookup system.

mod medicine;
mod selection;

pub use medicine::*;
pub use selection::*;

//! Domain models for the wellnest system.

mod medicine;
mod plan;
mod profile;

pub use medicine::*;
pub use plan::*;
pub use profile::*;

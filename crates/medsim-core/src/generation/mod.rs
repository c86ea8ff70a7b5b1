//! Generation - synthesis of new patients at arrival

mod loader;
mod names;

pub use loader::*;
pub use names::*;

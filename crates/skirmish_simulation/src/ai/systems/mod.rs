//! AI systems (frame step)

pub mod attack;
pub mod decision;
pub mod perception;

// Re-export all systems
pub use attack::*;
pub use decision::*;
pub use perception::*;

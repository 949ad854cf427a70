//! Platform abstraction layer
//!
//! Host-side pieces the simulation is driven through:
//! - Frame time to fixed ticks
//! - Input sampling

pub mod input;
pub mod time;

pub use input::{InputSource, ScriptedInput, clear_one_shots};
pub use time::FrameClock;

//! Application systems
//!
//! The windowed shell around the game session, split out of main.rs so the
//! fixed-step loop can be tested without an event loop.

mod simulation;
mod window;

pub use simulation::{SimulationResult, SimulationSystem};
pub use window::{format_title, WindowError, WindowSystem};

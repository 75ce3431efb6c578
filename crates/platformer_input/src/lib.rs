//! Platformer Input Handling
//!
//! This crate turns winit keyboard events into the per-tick
//! [`TickIntents`](platformer_core::TickIntents) the game consumes.

mod player_input;

pub use player_input::PlayerInput;

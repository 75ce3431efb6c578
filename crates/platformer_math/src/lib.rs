//! 2D Mathematics Library
//!
//! Vector and rectangle types shared by the platformer's physics, level and
//! presentation-facing code.
//!
//! - [`Vec2`] - 2D vector with x, y components (screen space, y grows downward)
//! - [`Rect`] - Axis-aligned rectangle given by min/max corners

mod vec2;
mod rect;

pub use vec2::Vec2;
pub use rect::Rect;

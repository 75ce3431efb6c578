//! Health Platformer - application shell
//!
//! Configuration loading and the systems the binary wires around a
//! [`GameSession`](platformer_core::GameSession).

pub mod config;
pub mod systems;

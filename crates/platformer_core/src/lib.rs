//! Gameplay core for the platformer
//!
//! This crate turns level data into a playable session on top of
//! `platformer_physics`:
//!
//! - [`LevelDefinition`] / [`LevelSet`] - Serializable level data (RON)
//! - [`LevelValidator`] - Checks a definition before it is instantiated
//! - [`LevelModel`] - A level built into the physics world, with spawn and end points
//! - [`PlayerState`] / [`PlayerController`] - Player body, health and movement
//! - [`CollisionTaxonomy`] - Contact rules between the player and level shapes
//! - [`Camera2D`] - Smooth-follow camera for presentation
//! - [`Narrator`] - Optional end-of-level text
//! - [`GameSession`] - The game state machine, driven one tick at a time
//! - [`FrameSnapshot`] - Read-only view of a frame for rendering

mod camera;
mod game;
mod level;
mod level_model;
mod level_validator;
mod narration;
mod player;
mod snapshot;
mod taxonomy;

pub use camera::{Camera2D, CameraTransform};
pub use game::{GameError, GamePhase, GameSession, GameSettings, TickIntents, TickOutcome};
pub use level::{
    ConsumableDef, ConsumableKind, HazardDef, LevelDefinition, LevelLoadError, LevelSaveError,
    LevelSet, PlatformDef,
};
pub use level_model::{derive_spawn_and_end, LevelModel, LevelSettings};
pub use level_validator::{LevelDefinitionError, LevelValidator};
pub use narration::{narrate_or_fallback, LevelReport, NarrationError, Narrator, TemplateNarrator};
pub use player::{HorizontalIntent, IdlePolicy, PlayerController, PlayerSettings, PlayerState};
pub use snapshot::{class_color, FrameSnapshot, PlayerSnapshot, Rgba, ShapeSnapshot};
pub use taxonomy::{rule_for, CollisionTaxonomy, ConsumableEffect, ConsumableEffects, ContactRule};

// Re-export commonly used types for convenience
pub use platformer_math::{Rect, Vec2};
pub use platformer_physics::{
    BodyKey, CollisionClass, PhysicsConfig, PhysicsMaterial, PhysicsWorld, ShapeKey, WorldGeometry,
};

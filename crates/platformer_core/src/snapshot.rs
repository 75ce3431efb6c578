//! Read-only frame data for the renderer

use platformer_math::Vec2;
use platformer_physics::{CollisionClass, ShapeKey, WorldGeometry};

use crate::camera::CameraTransform;
use crate::game::GamePhase;

/// RGBA colour in 0..1
pub type Rgba = [f32; 4];

/// Fill colour for a class of shape
pub fn class_color(class: CollisionClass) -> Rgba {
    match class {
        CollisionClass::Ground => [0.25, 0.25, 0.3, 1.0],
        CollisionClass::Player => [0.2, 0.45, 0.9, 1.0],
        CollisionClass::Hazard => [0.85, 0.15, 0.1, 1.0],
        CollisionClass::HealthyConsumable => [0.2, 0.75, 0.3, 1.0],
        CollisionClass::JunkConsumable => [0.6, 0.45, 0.2, 1.0],
    }
}

/// One shape to draw, in world space
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeSnapshot {
    pub key: ShapeKey,
    pub class: CollisionClass,
    pub geometry: WorldGeometry,
    pub color: Rgba,
}

/// Player readout for the HUD
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    pub position: Vec2,
    pub velocity: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub elapsed: f32,
    pub on_ground: bool,
}

/// Everything the renderer needs for one frame
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSnapshot {
    pub phase: GamePhase,
    pub level_index: usize,
    pub level_name: Option<String>,
    /// `None` outside of a loaded level
    pub player: Option<PlayerSnapshot>,
    pub end_point: Option<Vec2>,
    pub shapes: Vec<ShapeSnapshot>,
    pub camera: CameraTransform,
}

impl FrameSnapshot {
    /// Narration text to show, if the phase carries any
    pub fn narration(&self) -> Option<&str> {
        self.phase.narration()
    }
}

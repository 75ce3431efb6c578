//! Physical material properties for collision response

use serde::{Serialize, Deserialize};

/// Physical material properties for collision response
///
/// Friction is Coulomb friction (tangential impulse limited to
/// `friction * normal impulse`); restitution is bounciness.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhysicsMaterial {
    /// Friction coefficient (0.0 = frictionless)
    pub friction: f32,
    /// Restitution/bounciness (0.0 = no bounce, 1.0 = perfect bounce)
    pub restitution: f32,
}

impl Default for PhysicsMaterial {
    fn default() -> Self {
        Self::PLATFORM
    }
}

impl PhysicsMaterial {
    /// Level geometry: grippy, no bounce
    pub const PLATFORM: Self = Self {
        friction: 0.8,
        restitution: 0.0,
    };

    /// Frictionless, no bounce (used for sensors, where it never matters)
    pub const FRICTIONLESS: Self = Self {
        friction: 0.0,
        restitution: 0.0,
    };

    /// Create a new physics material with custom friction and restitution
    ///
    /// Friction is clamped to be non-negative, restitution to [0.0, 1.0].
    pub fn new(friction: f32, restitution: f32) -> Self {
        Self {
            friction: friction.max(0.0),
            restitution: restitution.clamp(0.0, 1.0),
        }
    }

    /// Combine two materials for collision response
    ///
    /// Geometric mean for friction, maximum for restitution.
    pub fn combine(&self, other: &Self) -> Self {
        Self {
            friction: (self.friction * other.friction).sqrt(),
            restitution: self.restitution.max(other.restitution),
        }
    }
}

//! Contact events raised by the physics world
//!
//! The world reports when two shapes start touching (`begin`) and when they
//! stop touching (`separate`). A listener receives the world mutably so it
//! can react on the spot (remove a pickup, change a velocity); removals made
//! during a step are deferred until the step ends.

use crate::body::BodyKey;
use crate::collision::{CollisionClass, Contact};
use crate::shapes::ShapeKey;
use crate::world::PhysicsWorld;

/// The two shapes involved in a contact event
///
/// `shape_a` always has the smaller key, and `contact.normal` points from
/// shape A toward shape B.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContactPair {
    pub shape_a: ShapeKey,
    pub shape_b: ShapeKey,
    pub body_a: BodyKey,
    pub body_b: BodyKey,
    pub class_a: CollisionClass,
    pub class_b: CollisionClass,
    pub sensor_a: bool,
    pub sensor_b: bool,
    /// Contact as measured on the tick the event was raised
    pub contact: Contact,
}

impl ContactPair {
    /// True if either side is a sensor
    pub fn involves_sensor(&self) -> bool {
        self.sensor_a || self.sensor_b
    }

    /// Look up the side with the given class
    ///
    /// Returns `(body, shape)` of the first side whose class matches.
    pub fn side(&self, class: CollisionClass) -> Option<(BodyKey, ShapeKey)> {
        if self.class_a == class {
            Some((self.body_a, self.shape_a))
        } else if self.class_b == class {
            Some((self.body_b, self.shape_b))
        } else {
            None
        }
    }

    /// The side opposite to the given shape
    pub fn other_side(&self, shape: ShapeKey) -> (BodyKey, ShapeKey, CollisionClass) {
        if self.shape_a == shape {
            (self.body_b, self.shape_b, self.class_b)
        } else {
            (self.body_a, self.shape_a, self.class_a)
        }
    }
}

/// Receives begin/separate events from [`PhysicsWorld::step`]
pub trait ContactListener {
    /// Two shapes started touching
    ///
    /// Return `false` to suppress the physical response for the whole
    /// lifetime of this contact (until it separates).
    fn begin(&mut self, world: &mut PhysicsWorld, pair: &ContactPair) -> bool {
        let _ = (world, pair);
        true
    }

    /// Two shapes stopped touching, or one of them was removed
    fn separate(&mut self, world: &mut PhysicsWorld, pair: &ContactPair) {
        let _ = (world, pair);
    }
}

/// Listener that accepts every contact and ignores events
impl ContactListener for () {}

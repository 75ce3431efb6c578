//! 2D physics simulation for the platformer
//!
//! This crate provides a small fixed-step rigid body simulation:
//! - Collision shapes (segments, convex polygons, circles)
//! - Narrow-phase collision detection (separating axis test)
//! - Begin/separate contact events with sensor shapes
//! - Static and dynamic bodies with gravity, impulses and rotation lock
//! - Deferred removal of bodies/shapes requested while a step is running

pub mod body;
pub mod collision;
pub mod events;
pub mod material;
pub mod shapes;
pub mod world;

// Re-export commonly used types
pub use body::{moment_for_box, moment_for_circle, BodyKey, BodyType, RigidBody2D};
pub use collision::{hull_vs_hull, CollisionClass, CollisionFilter, CollisionLayer, Contact, Hull};
pub use events::{ContactListener, ContactPair};
pub use material::PhysicsMaterial;
pub use shapes::{Circle, Collider, ConvexPolygon, Segment, Shape, ShapeKey, WorldGeometry};
pub use world::{PhysicsConfig, PhysicsWorld};

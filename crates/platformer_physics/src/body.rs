//! Rigid body types for 2D physics simulation

use platformer_math::Vec2;
use slotmap::new_key_type;

// Define generational key type for rigid bodies
new_key_type! {
    /// Key to a rigid body in the physics world
    ///
    /// Uses generational indexing: once a body is removed its key never
    /// resolves again, even if the slot is reused by a later body.
    pub struct BodyKey;
}

/// Whether a body is moved by the simulation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyType {
    /// Immovable, infinite mass (platforms, hazards, consumables, borders)
    Static,
    /// Integrated every step (the player)
    Dynamic,
}

/// Moment of inertia of a solid box about its center
pub fn moment_for_box(mass: f32, width: f32, height: f32) -> f32 {
    mass * (width * width + height * height) / 12.0
}

/// Moment of inertia of a solid disc about its center
pub fn moment_for_circle(mass: f32, radius: f32) -> f32 {
    0.5 * mass * radius * radius
}

/// A 2D rigid body
///
/// Bodies carry no geometry themselves; shapes are attached to them in the
/// [`PhysicsWorld`](crate::PhysicsWorld) by [`BodyKey`].
#[derive(Clone, Debug)]
pub struct RigidBody2D {
    /// Position of the center of mass (world coordinates)
    pub position: Vec2,
    /// Linear velocity (units per second)
    pub velocity: Vec2,
    /// Rotation in radians
    pub angle: f32,
    /// Angular velocity (radians per second)
    pub angular_velocity: f32,
    /// Mass (ignored for static bodies)
    pub mass: f32,
    /// Moment of inertia (ignored for static bodies)
    pub moment: f32,
    /// Whether this body is affected by gravity
    pub affected_by_gravity: bool,
    /// When set, angular velocity is zeroed at the end of every step
    pub rotation_locked: bool,
    body_type: BodyType,
    pending_impulse: Vec2,
    pending_angular_impulse: f32,
    pending_force: Vec2,
}

impl RigidBody2D {
    /// Create a dynamic body with the given mass and moment of inertia
    pub fn new_dynamic(position: Vec2, mass: f32, moment: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            angle: 0.0,
            angular_velocity: 0.0,
            mass,
            moment,
            affected_by_gravity: true,
            rotation_locked: false,
            body_type: BodyType::Dynamic,
            pending_impulse: Vec2::ZERO,
            pending_angular_impulse: 0.0,
            pending_force: Vec2::ZERO,
        }
    }

    /// Create a static body that never moves
    pub fn new_static(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            angle: 0.0,
            angular_velocity: 0.0,
            mass: f32::INFINITY,
            moment: f32::INFINITY,
            affected_by_gravity: false,
            rotation_locked: true,
            body_type: BodyType::Static,
            pending_impulse: Vec2::ZERO,
            pending_angular_impulse: 0.0,
            pending_force: Vec2::ZERO,
        }
    }

    /// Set the velocity of this body
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Set whether this body is affected by gravity
    pub fn with_gravity(mut self, affected: bool) -> Self {
        self.affected_by_gravity = affected && !self.is_static();
        self
    }

    /// Lock rotation (angular velocity is cleared after every step)
    pub fn with_rotation_lock(mut self, locked: bool) -> Self {
        self.rotation_locked = locked;
        self
    }

    pub fn body_type(&self) -> BodyType {
        self.body_type
    }

    pub fn is_static(&self) -> bool {
        self.body_type == BodyType::Static
    }

    /// Inverse mass (zero for static bodies)
    pub fn inverse_mass(&self) -> f32 {
        if self.is_static() || self.mass <= 0.0 {
            0.0
        } else {
            1.0 / self.mass
        }
    }

    /// Inverse moment of inertia (zero for static bodies)
    pub fn inverse_moment(&self) -> f32 {
        if self.is_static() || self.moment <= 0.0 || !self.moment.is_finite() {
            0.0
        } else {
            1.0 / self.moment
        }
    }

    /// Queue an impulse applied at a point given in body-local coordinates
    ///
    /// The impulse takes effect at the start of the next step. An off-center
    /// point also queues the matching angular impulse.
    pub fn apply_impulse_at_local_point(&mut self, impulse: Vec2, local_point: Vec2) {
        if self.is_static() {
            return;
        }
        let r = local_point.rotated(self.angle);
        self.pending_impulse += impulse;
        self.pending_angular_impulse += r.cross(impulse);
    }

    /// Queue a force applied at the center of mass for the next step
    pub fn apply_force(&mut self, force: Vec2) {
        if self.is_static() {
            return;
        }
        self.pending_force += force;
    }

    /// Impulse queued for the next step
    pub fn pending_impulse(&self) -> Vec2 {
        self.pending_impulse
    }

    /// Fold queued impulses and forces into the velocity, then clear them
    pub(crate) fn apply_queued(&mut self, dt: f32) {
        let inv_mass = self.inverse_mass();
        self.velocity += self.pending_impulse * inv_mass + self.pending_force * (inv_mass * dt);
        self.angular_velocity += self.pending_angular_impulse * self.inverse_moment();
        self.pending_impulse = Vec2::ZERO;
        self.pending_angular_impulse = 0.0;
        self.pending_force = Vec2::ZERO;
    }

    /// Apply gravity and advance position (and angle, unless locked) by one step
    pub(crate) fn integrate(&mut self, gravity: Vec2, dt: f32) {
        if self.is_static() {
            return;
        }
        if self.affected_by_gravity {
            self.velocity += gravity * dt;
        }
        self.position += self.velocity * dt;
        if !self.rotation_locked {
            self.angle += self.angular_velocity * dt;
        }
    }

    /// Apply a positional correction (e.g., from collision resolution)
    pub fn apply_correction(&mut self, correction: Vec2) {
        self.position += correction;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_dynamic_body() {
        let body = RigidBody2D::new_dynamic(Vec2::new(100.0, 450.0), 1.0, 600.0);
        assert_eq!(body.position, Vec2::new(100.0, 450.0));
        assert_eq!(body.velocity, Vec2::ZERO);
        assert!(!body.is_static());
        assert!(body.affected_by_gravity);
        assert_eq!(body.inverse_mass(), 1.0);
    }

    #[test]
    fn test_static_body_has_no_inverse_mass() {
        let body = RigidBody2D::new_static(Vec2::ZERO).with_gravity(true);
        assert!(body.is_static());
        assert!(!body.affected_by_gravity);
        assert_eq!(body.inverse_mass(), 0.0);
        assert_eq!(body.inverse_moment(), 0.0);
    }

    #[test]
    fn test_moment_for_box() {
        // 60x60 box of mass 1: (3600 + 3600) / 12
        assert!((moment_for_box(1.0, 60.0, 60.0) - 600.0).abs() < 0.0001);
    }

    #[test]
    fn test_impulse_is_queued_until_applied() {
        let mut body = RigidBody2D::new_dynamic(Vec2::ZERO, 2.0, 10.0);
        body.apply_impulse_at_local_point(Vec2::new(0.0, -500.0), Vec2::ZERO);

        assert_eq!(body.velocity, Vec2::ZERO);
        assert_eq!(body.pending_impulse(), Vec2::new(0.0, -500.0));

        body.apply_queued(1.0 / 60.0);
        assert_eq!(body.velocity, Vec2::new(0.0, -250.0));
        assert_eq!(body.pending_impulse(), Vec2::ZERO);
        assert_eq!(body.angular_velocity, 0.0);
    }

    #[test]
    fn test_off_center_impulse_spins() {
        let mut body = RigidBody2D::new_dynamic(Vec2::ZERO, 1.0, 10.0);
        body.apply_impulse_at_local_point(Vec2::new(0.0, 10.0), Vec2::new(1.0, 0.0));
        body.apply_queued(1.0 / 60.0);
        // r x J = 1 * 10 - 0 * 0 = 10, / moment 10
        assert!((body.angular_velocity - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_static_body_ignores_impulses() {
        let mut body = RigidBody2D::new_static(Vec2::ZERO);
        body.apply_impulse_at_local_point(Vec2::new(5.0, 5.0), Vec2::ZERO);
        body.apply_force(Vec2::new(5.0, 5.0));
        body.apply_queued(1.0);
        body.integrate(Vec2::new(0.0, 900.0), 1.0);
        assert_eq!(body.velocity, Vec2::ZERO);
        assert_eq!(body.position, Vec2::ZERO);
    }

    #[test]
    fn test_integrate_applies_gravity_then_moves() {
        let mut body = RigidBody2D::new_dynamic(Vec2::ZERO, 1.0, 1.0);
        body.integrate(Vec2::new(0.0, 900.0), 0.1);
        assert!((body.velocity.y - 90.0).abs() < 0.0001);
        assert!((body.position.y - 9.0).abs() < 0.0001);
    }

    #[test]
    fn test_rotation_lock_keeps_angle() {
        let mut body = RigidBody2D::new_dynamic(Vec2::ZERO, 1.0, 10.0).with_rotation_lock(true);
        body.angular_velocity = 3.0;
        body.integrate(Vec2::ZERO, 0.5);
        assert_eq!(body.angle, 0.0);
    }
}

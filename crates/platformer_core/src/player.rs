//! Player state and controller
//!
//! [`PlayerState`] holds the gameplay side of the player (health, ground
//! contact, elapsed time) next to the handles of its physics body and shape.
//! [`PlayerController`] turns movement intents into velocity overrides and
//! jump impulses.

use serde::{Serialize, Deserialize};

use platformer_math::Vec2;
use platformer_physics::{
    moment_for_box, BodyKey, Collider, CollisionClass, ConvexPolygon, PhysicsMaterial,
    PhysicsWorld, RigidBody2D, Shape, ShapeKey,
};

/// What happens to horizontal velocity on ticks with no movement intent
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdlePolicy {
    /// Leave x-velocity to the simulation (contact friction only)
    #[default]
    Hold,
    /// Zero x-velocity immediately
    Stop,
}

/// Player tuning
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerSettings {
    /// Box width and height
    pub size: Vec2,
    pub mass: f32,
    pub friction: f32,
    /// Horizontal speed while a direction is held
    pub move_speed: f32,
    /// Magnitude of the upward jump impulse
    pub jump_impulse: f32,
    pub initial_health: f32,
    pub max_health: f32,
    pub idle_policy: IdlePolicy,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            size: Vec2::new(60.0, 60.0),
            mass: 1.0,
            friction: 0.8,
            move_speed: 200.0,
            jump_impulse: 500.0,
            initial_health: 10.0,
            max_health: 100.0,
            idle_policy: IdlePolicy::Hold,
        }
    }
}

/// Gameplay state of the player
///
/// Ground contact is a count of touching ground shapes, maintained by the
/// collision taxonomy; the player is on the ground while it is non-zero.
#[derive(Clone, Debug)]
pub struct PlayerState {
    pub body: BodyKey,
    pub shape: ShapeKey,
    health: f32,
    max_health: f32,
    ground_contacts: u32,
    /// Seconds spent in the current level
    pub elapsed: f32,
}

impl PlayerState {
    /// Create the player body and shape at a position
    pub fn spawn(world: &mut PhysicsWorld, position: Vec2, settings: &PlayerSettings) -> Self {
        let moment = moment_for_box(settings.mass, settings.size.x, settings.size.y);
        let body = world.add_body(
            RigidBody2D::new_dynamic(position, settings.mass, moment).with_rotation_lock(true),
        );
        let shape = world.add_shape(
            Shape::new(
                body,
                Collider::Polygon(ConvexPolygon::rectangle(settings.size.x, settings.size.y)),
                CollisionClass::Player,
            )
            .with_material(PhysicsMaterial::new(settings.friction, 0.0)),
        );
        let max_health = settings.max_health.max(0.0);

        Self {
            body,
            shape,
            health: settings.initial_health.clamp(0.0, max_health),
            max_health,
            ground_contacts: 0,
            elapsed: 0.0,
        }
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    /// Set health, clamped to [0, max_health]
    pub fn set_health(&mut self, health: f32) {
        self.health = health.clamp(0.0, self.max_health);
    }

    /// Add (or subtract) health, clamped to [0, max_health]
    pub fn adjust_health(&mut self, delta: f32) {
        self.set_health(self.health + delta);
    }

    pub fn kill(&mut self) {
        self.health = 0.0;
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    pub fn on_ground(&self) -> bool {
        self.ground_contacts > 0
    }

    pub fn ground_contacts(&self) -> u32 {
        self.ground_contacts
    }

    pub(crate) fn touch_ground(&mut self) {
        self.ground_contacts += 1;
    }

    pub(crate) fn leave_ground(&mut self) {
        self.ground_contacts = self.ground_contacts.saturating_sub(1);
    }

    /// Current player position
    ///
    /// # Panics
    /// If the player body is no longer in the world.
    pub fn position(&self, world: &PhysicsWorld) -> Vec2 {
        match world.get_body(self.body) {
            Some(body) => body.position,
            None => panic!("player body missing from the physics world"),
        }
    }

    /// Current player velocity
    ///
    /// # Panics
    /// If the player body is no longer in the world.
    pub fn velocity(&self, world: &PhysicsWorld) -> Vec2 {
        match world.get_body(self.body) {
            Some(body) => body.velocity,
            None => panic!("player body missing from the physics world"),
        }
    }
}

/// Horizontal movement intent for one tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HorizontalIntent {
    Left,
    #[default]
    None,
    Right,
}

impl HorizontalIntent {
    /// Resolve held keys; left wins when both are held
    pub fn from_held(left: bool, right: bool) -> Self {
        if left {
            HorizontalIntent::Left
        } else if right {
            HorizontalIntent::Right
        } else {
            HorizontalIntent::None
        }
    }

    /// Direction as -1, 0 or 1
    pub fn direction(self) -> f32 {
        match self {
            HorizontalIntent::Left => -1.0,
            HorizontalIntent::None => 0.0,
            HorizontalIntent::Right => 1.0,
        }
    }
}

/// Applies movement intents to the player body
///
/// Horizontal movement overwrites the x-velocity instead of applying a
/// force, so it does not depend on mass or friction.
#[derive(Clone, Debug)]
pub struct PlayerController {
    move_speed: f32,
    jump_impulse: f32,
    idle_policy: IdlePolicy,
}

impl PlayerController {
    pub fn new(settings: &PlayerSettings) -> Self {
        Self {
            move_speed: settings.move_speed,
            jump_impulse: settings.jump_impulse,
            idle_policy: settings.idle_policy,
        }
    }

    pub fn with_idle_policy(mut self, policy: IdlePolicy) -> Self {
        self.idle_policy = policy;
        self
    }

    /// Apply this tick's horizontal intent
    ///
    /// # Panics
    /// If the player body is no longer in the world.
    pub fn set_horizontal_intent(&self, player: &PlayerState, world: &mut PhysicsWorld, intent: HorizontalIntent) {
        let Some(body) = world.get_body_mut(player.body) else {
            panic!("player body missing from the physics world");
        };
        match (intent, self.idle_policy) {
            (HorizontalIntent::None, IdlePolicy::Hold) => {}
            (HorizontalIntent::None, IdlePolicy::Stop) => body.velocity.x = 0.0,
            (direction, _) => body.velocity.x = direction.direction() * self.move_speed,
        }
    }

    /// Queue a jump impulse if the player stands on the ground
    ///
    /// Returns whether the jump happened; jumping in the air is a no-op.
    pub fn jump(&self, player: &PlayerState, world: &mut PhysicsWorld) -> bool {
        if !player.on_ground() {
            return false;
        }
        let impulse = Vec2::new(0.0, -self.jump_impulse);
        if !world.apply_impulse_at_local_point(player.body, impulse, Vec2::ZERO) {
            panic!("player body missing from the physics world");
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn spawn() -> (PhysicsWorld, PlayerState) {
        let mut world = PhysicsWorld::new();
        let player = PlayerState::spawn(&mut world, Vec2::new(100.0, 100.0), &PlayerSettings::default());
        (world, player)
    }

    #[test]
    fn test_spawn_defaults() {
        let (world, player) = spawn();
        assert_eq!(player.health(), 10.0);
        assert_eq!(player.max_health(), 100.0);
        assert!(!player.on_ground());
        assert_eq!(player.position(&world), Vec2::new(100.0, 100.0));

        let body = world.get_body(player.body).unwrap();
        assert!(body.rotation_locked);
        assert!((body.moment - 600.0).abs() < 0.001);
        assert_eq!(world.get_shape(player.shape).unwrap().class, CollisionClass::Player);
    }

    #[test]
    fn test_health_is_clamped() {
        let (_world, mut player) = spawn();
        player.adjust_health(500.0);
        assert_eq!(player.health(), 100.0);
        player.adjust_health(-1000.0);
        assert_eq!(player.health(), 0.0);
        assert!(player.is_dead());
        player.set_health(f32::MAX);
        assert_eq!(player.health(), 100.0);
    }

    #[test]
    fn test_ground_contact_count() {
        let (_world, mut player) = spawn();
        player.touch_ground();
        player.touch_ground();
        player.leave_ground();
        assert!(player.on_ground());
        player.leave_ground();
        assert!(!player.on_ground());
        player.leave_ground();
        assert_eq!(player.ground_contacts(), 0);
    }

    #[test]
    fn test_horizontal_intent_overwrites_velocity() {
        let (mut world, player) = spawn();
        let controller = PlayerController::new(&PlayerSettings::default());
        world.set_velocity(player.body, Vec2::new(999.0, 42.0));

        controller.set_horizontal_intent(&player, &mut world, HorizontalIntent::Left);
        assert_eq!(player.velocity(&world), Vec2::new(-200.0, 42.0));

        controller.set_horizontal_intent(&player, &mut world, HorizontalIntent::Right);
        assert_eq!(player.velocity(&world), Vec2::new(200.0, 42.0));
    }

    #[test]
    fn test_idle_policies() {
        let (mut world, player) = spawn();
        world.set_velocity(player.body, Vec2::new(150.0, 0.0));

        let hold = PlayerController::new(&PlayerSettings::default());
        hold.set_horizontal_intent(&player, &mut world, HorizontalIntent::None);
        assert_eq!(player.velocity(&world).x, 150.0);

        let stop = hold.with_idle_policy(IdlePolicy::Stop);
        stop.set_horizontal_intent(&player, &mut world, HorizontalIntent::None);
        assert_eq!(player.velocity(&world).x, 0.0);
    }

    #[test]
    fn test_left_wins_when_both_held() {
        assert_eq!(HorizontalIntent::from_held(true, true), HorizontalIntent::Left);
        assert_eq!(HorizontalIntent::from_held(false, true), HorizontalIntent::Right);
        assert_eq!(HorizontalIntent::from_held(false, false), HorizontalIntent::None);
    }

    #[test]
    fn test_jump_in_air_is_ignored() {
        let (mut world, player) = spawn();
        let controller = PlayerController::new(&PlayerSettings::default());
        world.step(DT, &mut ());
        let before = player.velocity(&world).y;

        assert!(!controller.jump(&player, &mut world));
        assert_eq!(player.velocity(&world).y, before);
        assert_eq!(world.get_body(player.body).unwrap().pending_impulse(), Vec2::ZERO);
    }

    #[test]
    fn test_jump_on_ground_queues_impulse() {
        let (mut world, mut player) = spawn();
        let controller = PlayerController::new(&PlayerSettings::default());
        player.touch_ground();

        assert!(controller.jump(&player, &mut world));
        assert_eq!(
            world.get_body(player.body).unwrap().pending_impulse(),
            Vec2::new(0.0, -500.0)
        );
    }
}

//! Physics world and simulation

use std::collections::{BTreeMap, BTreeSet};

use platformer_math::{Rect, Vec2};
use slotmap::SlotMap;

use crate::body::{BodyKey, RigidBody2D};
use crate::collision::{hull_vs_hull, Hull};
use crate::events::{ContactListener, ContactPair};
use crate::material::PhysicsMaterial;
use crate::shapes::{Shape, ShapeKey, WorldGeometry};

/// Configuration for the physics simulation
#[derive(Clone, Debug)]
pub struct PhysicsConfig {
    /// Gravity acceleration (screen space, so positive y pulls down)
    pub gravity: Vec2,
    /// Penetration tolerated before positional correction kicks in
    ///
    /// Keeps resting contacts overlapping slightly so they stay reported
    /// every step instead of flickering between begin and separate.
    pub collision_slop: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, 900.0),
            collision_slop: 0.1,
        }
    }
}

impl PhysicsConfig {
    /// Create a new physics config with downward gravity of the given magnitude
    pub fn new(gravity: f32) -> Self {
        Self {
            gravity: Vec2::new(0.0, gravity),
            ..Default::default()
        }
    }

    pub fn with_collision_slop(mut self, slop: f32) -> Self {
        self.collision_slop = slop.max(0.0);
        self
    }
}

/// A contact that has had its `begin` event delivered
#[derive(Clone, Copy, Debug)]
struct ActiveContact {
    pair: ContactPair,
    /// Whether the listener allowed a physical response
    allow: bool,
}

type PairKey = (ShapeKey, ShapeKey);

/// The physics world containing all bodies and shapes
///
/// Bodies and shapes are addressed by generational keys. Removing one while
/// [`step`](PhysicsWorld::step) runs (from a contact callback) takes effect
/// logically at once (lookups fail, no further events) and physically when
/// the step finishes.
pub struct PhysicsWorld {
    /// All rigid bodies in the world (using generational keys)
    bodies: SlotMap<BodyKey, RigidBody2D>,
    /// All shapes, each attached to one body
    shapes: SlotMap<ShapeKey, Shape>,
    /// Touching pairs whose begin event has fired, in key order
    active: BTreeMap<PairKey, ActiveContact>,
    /// True while `step` is running
    stepping: bool,
    /// Removals requested during the current step
    doomed_bodies: BTreeSet<BodyKey>,
    doomed_shapes: BTreeSet<ShapeKey>,
    /// Contacts broken by removals made outside a step; their separate
    /// events go out with the next step
    orphaned: Vec<ContactPair>,
    /// Physics configuration
    pub config: PhysicsConfig,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    /// Create a new physics world with default configuration
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    /// Create a new physics world with custom configuration
    pub fn with_config(config: PhysicsConfig) -> Self {
        Self {
            bodies: SlotMap::with_key(),
            shapes: SlotMap::with_key(),
            active: BTreeMap::new(),
            stepping: false,
            doomed_bodies: BTreeSet::new(),
            doomed_shapes: BTreeSet::new(),
            orphaned: Vec::new(),
            config,
        }
    }

    /// Add a body to the world and return its key
    pub fn add_body(&mut self, body: RigidBody2D) -> BodyKey {
        self.bodies.insert(body)
    }

    /// Attach a shape to a live body and return its key
    ///
    /// # Panics
    /// If the shape's body is not alive.
    pub fn add_shape(&mut self, shape: Shape) -> ShapeKey {
        assert!(
            self.is_body_alive(shape.body),
            "shape attached to a body that is not in the world"
        );
        self.shapes.insert(shape)
    }

    /// Remove a body together with all of its shapes
    ///
    /// Returns `false` if the body was already removed (or removal is
    /// already pending), so repeated removal is a no-op.
    pub fn remove_body(&mut self, key: BodyKey) -> bool {
        if !self.is_body_alive(key) {
            return false;
        }
        if self.stepping {
            self.doomed_bodies.insert(key);
            return true;
        }

        let shape_keys: Vec<ShapeKey> = self
            .shapes
            .iter()
            .filter(|(_, shape)| shape.body == key)
            .map(|(shape_key, _)| shape_key)
            .collect();
        for shape_key in &shape_keys {
            self.shapes.remove(*shape_key);
        }
        self.bodies.remove(key);

        let broken = self.take_contacts(|pair| shape_keys.contains(&pair.shape_a) || shape_keys.contains(&pair.shape_b));
        self.orphaned.extend(broken);
        true
    }

    /// Remove a single shape
    ///
    /// Returns `false` if the shape was already removed.
    pub fn remove_shape(&mut self, key: ShapeKey) -> bool {
        if !self.is_shape_alive(key) {
            return false;
        }
        if self.stepping {
            self.doomed_shapes.insert(key);
            return true;
        }

        self.shapes.remove(key);
        let broken = self.take_contacts(|pair| pair.shape_a == key || pair.shape_b == key);
        self.orphaned.extend(broken);
        true
    }

    /// Remove every body and shape without raising any events
    ///
    /// # Panics
    /// If called from inside a contact callback.
    pub fn clear(&mut self) {
        assert!(!self.stepping, "PhysicsWorld::clear called during a step");
        self.bodies.clear();
        self.shapes.clear();
        self.active.clear();
        self.doomed_bodies.clear();
        self.doomed_shapes.clear();
        self.orphaned.clear();
    }

    /// Whether a body exists and has no removal pending
    pub fn is_body_alive(&self, key: BodyKey) -> bool {
        self.bodies.contains_key(key) && !self.doomed_bodies.contains(&key)
    }

    /// Whether a shape exists, has no removal pending and neither does its body
    pub fn is_shape_alive(&self, key: ShapeKey) -> bool {
        match self.shapes.get(key) {
            Some(shape) => {
                !self.doomed_shapes.contains(&key) && !self.doomed_bodies.contains(&shape.body)
            }
            None => false,
        }
    }

    /// Get an immutable reference to a live body by key
    pub fn get_body(&self, key: BodyKey) -> Option<&RigidBody2D> {
        if self.doomed_bodies.contains(&key) {
            return None;
        }
        self.bodies.get(key)
    }

    /// Get a mutable reference to a live body by key
    pub fn get_body_mut(&mut self, key: BodyKey) -> Option<&mut RigidBody2D> {
        if self.doomed_bodies.contains(&key) {
            return None;
        }
        self.bodies.get_mut(key)
    }

    /// Get a live shape by key
    pub fn get_shape(&self, key: ShapeKey) -> Option<&Shape> {
        if !self.is_shape_alive(key) {
            return None;
        }
        self.shapes.get(key)
    }

    /// World-space geometry of a live shape
    pub fn shape_geometry(&self, key: ShapeKey) -> Option<WorldGeometry> {
        let shape = self.get_shape(key)?;
        let body = self.bodies.get(shape.body)?;
        Some(shape.collider.world_geometry(body.position, body.angle))
    }

    /// Queue an impulse on a body; returns `false` if the body is gone
    pub fn apply_impulse_at_local_point(&mut self, key: BodyKey, impulse: Vec2, local_point: Vec2) -> bool {
        match self.get_body_mut(key) {
            Some(body) => {
                body.apply_impulse_at_local_point(impulse, local_point);
                true
            }
            None => false,
        }
    }

    /// Overwrite a body's velocity; returns `false` if the body is gone
    pub fn set_velocity(&mut self, key: BodyKey, velocity: Vec2) -> bool {
        match self.get_body_mut(key) {
            Some(body) => {
                body.velocity = velocity;
                true
            }
            None => false,
        }
    }

    /// Get the number of live bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len() - self.doomed_bodies.len()
    }

    /// Get the number of live shapes
    pub fn shape_count(&self) -> usize {
        self.shapes.keys().filter(|key| self.is_shape_alive(*key)).count()
    }

    /// Iterate over all live body keys
    pub fn body_keys(&self) -> impl Iterator<Item = BodyKey> + '_ {
        self.bodies.keys().filter(move |key| !self.doomed_bodies.contains(key))
    }

    /// Iterate over all live shapes
    pub fn shapes(&self) -> impl Iterator<Item = (ShapeKey, &Shape)> + '_ {
        self.shapes.iter().filter(move |(key, _)| self.is_shape_alive(*key))
    }

    /// Number of touching pairs whose begin event has been delivered
    pub fn active_contact_count(&self) -> usize {
        self.active.len()
    }

    /// Step the physics simulation forward by dt seconds
    ///
    /// This performs, in order:
    /// 1. Queued impulses/forces are folded into velocities
    /// 2. Gravity and velocity integration
    /// 3. Narrow-phase collision detection
    /// 4. Begin/separate events, with contact response for allowed
    ///    non-sensor contacts
    /// 5. Deferred removals are flushed, rotation-locked bodies lose their
    ///    angular velocity
    ///
    /// # Panics
    /// If called re-entrantly from a contact callback.
    pub fn step<L: ContactListener + ?Sized>(&mut self, dt: f32, listener: &mut L) {
        assert!(!self.stepping, "PhysicsWorld::step called during a step");
        self.stepping = true;

        // Phase 1 + 2: queued impulses, gravity, integration
        let gravity = self.config.gravity;
        for (_key, body) in &mut self.bodies {
            body.apply_queued(dt);
            body.integrate(gravity, dt);
        }

        // Phase 3: narrow phase
        let touching = self.detect_contacts();

        // Phase 4: events and response
        for pair in std::mem::take(&mut self.orphaned) {
            listener.separate(self, &pair);
        }

        let mut current: BTreeSet<PairKey> = BTreeSet::new();
        for (keys, pair) in touching {
            // A callback earlier in this step may have removed either side
            if !self.is_shape_alive(keys.0) || !self.is_shape_alive(keys.1) {
                continue;
            }
            current.insert(keys);

            let known = self.active.get_mut(&keys).map(|active| {
                active.pair.contact = pair.contact;
                active.allow
            });
            let allow = match known {
                Some(allow) => allow,
                None => {
                    let allow = listener.begin(self, &pair);
                    log::trace!("contact begin {:?} / {:?} (allow: {})", pair.class_a, pair.class_b, allow);
                    self.active.insert(keys, ActiveContact { pair, allow });
                    allow
                }
            };

            if allow
                && !pair.involves_sensor()
                && self.is_shape_alive(keys.0)
                && self.is_shape_alive(keys.1)
            {
                self.resolve_contact(&pair);
            }
        }

        // Pairs with a pending removal are separated by the flush instead
        let ended: Vec<PairKey> = self
            .active
            .keys()
            .filter(|keys| {
                !current.contains(*keys) && self.is_shape_alive(keys.0) && self.is_shape_alive(keys.1)
            })
            .copied()
            .collect();
        for keys in ended {
            if let Some(active) = self.active.remove(&keys) {
                log::trace!("contact separate {:?} / {:?}", active.pair.class_a, active.pair.class_b);
                listener.separate(self, &active.pair);
            }
        }

        // Phase 5: deferred removals, rotation lock
        self.stepping = false;
        self.flush_removals(listener);

        for (_key, body) in &mut self.bodies {
            if body.rotation_locked {
                body.angular_velocity = 0.0;
            }
        }
    }

    /// Physically remove everything doomed during the step, raising
    /// separate events for contacts that were still active
    fn flush_removals<L: ContactListener + ?Sized>(&mut self, listener: &mut L) {
        if self.doomed_bodies.is_empty() && self.doomed_shapes.is_empty() {
            return;
        }
        let doomed_bodies = std::mem::take(&mut self.doomed_bodies);
        let doomed_shapes = std::mem::take(&mut self.doomed_shapes);

        let shape_keys: Vec<ShapeKey> = self
            .shapes
            .iter()
            .filter(|(key, shape)| doomed_shapes.contains(key) || doomed_bodies.contains(&shape.body))
            .map(|(key, _)| key)
            .collect();
        for key in &shape_keys {
            self.shapes.remove(*key);
        }
        for key in &doomed_bodies {
            self.bodies.remove(*key);
        }

        let broken = self.take_contacts(|pair| shape_keys.contains(&pair.shape_a) || shape_keys.contains(&pair.shape_b));
        for pair in broken {
            log::trace!("contact separate (removed) {:?} / {:?}", pair.class_a, pair.class_b);
            listener.separate(self, &pair);
        }
    }

    /// Drop active contacts matching a predicate and return their pairs
    fn take_contacts(&mut self, mut matches: impl FnMut(&ContactPair) -> bool) -> Vec<ContactPair> {
        let keys: Vec<PairKey> = self
            .active
            .iter()
            .filter(|(_, active)| matches(&active.pair))
            .map(|(keys, _)| *keys)
            .collect();
        keys.into_iter()
            .filter_map(|keys| self.active.remove(&keys))
            .map(|active| active.pair)
            .collect()
    }

    /// Find every touching pair of shapes where at least one side moves
    fn detect_contacts(&self) -> Vec<(PairKey, ContactPair)> {
        struct Candidate<'a> {
            key: ShapeKey,
            shape: &'a Shape,
            hull: Hull,
            bounds: Rect,
            dynamic: bool,
        }

        let mut candidates: Vec<Candidate> = self
            .shapes
            .iter()
            .filter_map(|(key, shape)| {
                let body = self.bodies.get(shape.body)?;
                let geometry = shape.collider.world_geometry(body.position, body.angle);
                Some(Candidate {
                    key,
                    shape,
                    hull: geometry.to_hull(),
                    bounds: geometry.bounds(),
                    dynamic: !body.is_static(),
                })
            })
            .collect();
        candidates.sort_by_key(|candidate| candidate.key);

        let mut found = Vec::new();
        for (i, a) in candidates.iter().enumerate() {
            for b in &candidates[i + 1..] {
                if !a.dynamic && !b.dynamic {
                    continue;
                }
                if a.shape.body == b.shape.body {
                    continue;
                }
                if !a.shape.filter.collides_with(&b.shape.filter) {
                    continue;
                }
                if !a.bounds.intersects(&b.bounds) {
                    continue;
                }
                if let Some(contact) = hull_vs_hull(&a.hull, &b.hull) {
                    let pair = ContactPair {
                        shape_a: a.key,
                        shape_b: b.key,
                        body_a: a.shape.body,
                        body_b: b.shape.body,
                        class_a: a.shape.class,
                        class_b: b.shape.class,
                        sensor_a: a.shape.sensor,
                        sensor_b: b.shape.sensor,
                        contact,
                    };
                    found.push(((a.key, b.key), pair));
                }
            }
        }
        found
    }

    fn shape_material(&self, key: ShapeKey) -> PhysicsMaterial {
        self.shapes
            .get(key)
            .map(|shape| shape.material)
            .unwrap_or_default()
    }

    /// Push two bodies apart and apply normal + Coulomb friction impulses
    fn resolve_contact(&mut self, pair: &ContactPair) {
        let (inv_a, mut vel_a) = match self.bodies.get(pair.body_a) {
            Some(body) => (body.inverse_mass(), body.velocity),
            None => return,
        };
        let (inv_b, mut vel_b) = match self.bodies.get(pair.body_b) {
            Some(body) => (body.inverse_mass(), body.velocity),
            None => return,
        };
        let inv_sum = inv_a + inv_b;
        if inv_sum <= 0.0 {
            return;
        }

        let material = self
            .shape_material(pair.shape_a)
            .combine(&self.shape_material(pair.shape_b));
        let normal = pair.contact.normal;

        // Positional correction beyond the slop
        let depth = (pair.contact.penetration - self.config.collision_slop).max(0.0);
        let correction = normal * (depth / inv_sum);

        // Normal impulse, only while approaching
        let approach = (vel_b - vel_a).dot(normal);
        if approach < 0.0 {
            let jn = -(1.0 + material.restitution) * approach / inv_sum;
            vel_a -= normal * (jn * inv_a);
            vel_b += normal * (jn * inv_b);

            // Coulomb friction: tangential impulse limited by friction * jn
            let relative = vel_b - vel_a;
            let tangential = relative - normal * relative.dot(normal);
            let slide_speed = tangential.length();
            if slide_speed > 1e-6 {
                let tangent = tangential / slide_speed;
                let jt = (slide_speed / inv_sum).min(material.friction * jn);
                vel_a += tangent * (jt * inv_a);
                vel_b -= tangent * (jt * inv_b);
            }
        }

        if let Some(body) = self.bodies.get_mut(pair.body_a) {
            body.apply_correction(-correction * inv_a);
            body.velocity = vel_a;
        }
        if let Some(body) = self.bodies.get_mut(pair.body_b) {
            body.apply_correction(correction * inv_b);
            body.velocity = vel_b;
        }
    }
}

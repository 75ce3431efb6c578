//! Collision detection for 2D shapes
//!
//! Narrow phase uses the separating axis test on convex hulls with an
//! optional rounding radius, which covers every shape the game uses:
//! thick segments (2 points + radius), polygons (n points) and circles
//! (1 point + radius). Also provides collision classes and layer filtering.

use bitflags::bitflags;
use serde::{Serialize, Deserialize};

use platformer_math::Vec2;

bitflags! {
    /// Collision layers for filtering which shapes are tested against each other
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CollisionLayer: u32 {
        /// Platforms and level borders
        const GROUND = 1 << 0;
        /// The player character
        const PLAYER = 1 << 1;
        /// Instant-death hazards
        const HAZARD = 1 << 2;
        /// Consumables that heal and speed up
        const HEALTHY = 1 << 3;
        /// Consumables that hurt and slow down
        const JUNK = 1 << 4;
        /// All layers
        const ALL = 0xFFFFFFFF;
    }
}

/// Semantic class of a shape, independent of its geometry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CollisionClass {
    Ground,
    Player,
    Hazard,
    HealthyConsumable,
    JunkConsumable,
}

impl CollisionClass {
    /// The layer bit this class lives on
    pub fn layer(self) -> CollisionLayer {
        match self {
            CollisionClass::Ground => CollisionLayer::GROUND,
            CollisionClass::Player => CollisionLayer::PLAYER,
            CollisionClass::Hazard => CollisionLayer::HAZARD,
            CollisionClass::HealthyConsumable => CollisionLayer::HEALTHY,
            CollisionClass::JunkConsumable => CollisionLayer::JUNK,
        }
    }
}

/// Collision filter determining what a shape is tested against
///
/// Two shapes A and B are tested if:
/// - (A.layer & B.mask) != 0, AND
/// - (B.layer & A.mask) != 0
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollisionFilter {
    /// Which layer(s) this shape belongs to
    pub layer: CollisionLayer,
    /// Which layer(s) this shape can collide with
    pub mask: CollisionLayer,
}

impl CollisionFilter {
    pub fn new(layer: CollisionLayer, mask: CollisionLayer) -> Self {
        Self { layer, mask }
    }

    /// Check if this filter allows collision with another filter
    pub fn collides_with(&self, other: &Self) -> bool {
        self.layer.intersects(other.mask) && other.layer.intersects(self.mask)
    }

    /// Default filter for a collision class
    ///
    /// The player meets everything except other players; level shapes only
    /// ever meet the player.
    pub fn for_class(class: CollisionClass) -> Self {
        match class {
            CollisionClass::Player => Self::new(
                CollisionLayer::PLAYER,
                CollisionLayer::ALL & !CollisionLayer::PLAYER,
            ),
            other => Self::new(other.layer(), CollisionLayer::PLAYER),
        }
    }
}

/// Contact information from a collision
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    /// Point of contact (on the surface of the second shape)
    pub point: Vec2,
    /// Unit normal pointing from the first shape toward the second
    pub normal: Vec2,
    /// Penetration depth (positive means overlapping)
    pub penetration: f32,
}

impl Contact {
    pub fn new(point: Vec2, normal: Vec2, penetration: f32) -> Self {
        Self {
            point,
            normal,
            penetration,
        }
    }

    /// Check if this represents an actual collision (positive penetration)
    pub fn is_colliding(&self) -> bool {
        self.penetration > 0.0
    }

    /// The same contact seen from the other shape
    pub fn flipped(&self) -> Self {
        Self::new(self.point, -self.normal, self.penetration)
    }
}

/// World-space convex hull inflated by a radius
///
/// One point is a circle, two points a capsule, three or more a
/// (possibly rounded) polygon.
#[derive(Clone, Debug, PartialEq)]
pub struct Hull {
    pub points: Vec<Vec2>,
    pub radius: f32,
}

impl Hull {
    pub fn new(points: Vec<Vec2>, radius: f32) -> Self {
        Self { points, radius }
    }

    /// Interval covered by the hull when projected on a unit axis
    fn project(&self, axis: Vec2) -> (f32, f32) {
        let (min, max) = self
            .points
            .iter()
            .map(|p| p.dot(axis))
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), d| (lo.min(d), hi.max(d)));
        (min - self.radius, max + self.radius)
    }

    /// Farthest core point along a direction (radius not included)
    fn support(&self, direction: Vec2) -> Vec2 {
        self.points
            .iter()
            .copied()
            .fold(None, |best: Option<Vec2>, p| match best {
                Some(b) if b.dot(direction) >= p.dot(direction) => Some(b),
                _ => Some(p),
            })
            .unwrap_or(Vec2::ZERO)
    }

    /// Candidate separating axes contributed by this hull against `other`
    fn push_axes(&self, other: &Hull, axes: &mut Vec<Vec2>) {
        const MIN_AXIS_LENGTH_SQ: f32 = 1e-12;
        match self.points.len() {
            0 => {}
            1 => {
                // Circle: axis toward the nearest core point of the other hull
                let center = self.points[0];
                let nearest = other.points.iter().copied().min_by(|a, b| {
                    let da = (*a - center).length_squared();
                    let db = (*b - center).length_squared();
                    da.total_cmp(&db)
                });
                if let Some(nearest) = nearest {
                    let axis = nearest - center;
                    if axis.length_squared() > MIN_AXIS_LENGTH_SQ {
                        axes.push(axis.normalized());
                    }
                }
            }
            2 => {
                let edge = self.points[1] - self.points[0];
                if edge.length_squared() > MIN_AXIS_LENGTH_SQ {
                    axes.push(edge.perp().normalized());
                }
            }
            n => {
                for i in 0..n {
                    let edge = self.points[(i + 1) % n] - self.points[i];
                    if edge.length_squared() > MIN_AXIS_LENGTH_SQ {
                        axes.push(edge.perp().normalized());
                    }
                }
            }
        }
    }
}

/// Test two hulls for overlap
///
/// Returns the minimum-translation contact, with the normal pointing from
/// `a` toward `b`, or `None` when a separating axis exists.
pub fn hull_vs_hull(a: &Hull, b: &Hull) -> Option<Contact> {
    let mut axes = Vec::with_capacity(a.points.len() + b.points.len());
    a.push_axes(b, &mut axes);
    b.push_axes(a, &mut axes);

    let mut best: Option<(f32, Vec2)> = None;
    for axis in axes {
        let (a_min, a_max) = a.project(axis);
        let (b_min, b_max) = b.project(axis);

        // Depth needed to push b out along +axis, or along -axis
        let forward = a_max - b_min;
        let backward = b_max - a_min;
        if forward <= 0.0 || backward <= 0.0 {
            return None;
        }

        let (depth, normal) = if forward <= backward {
            (forward, axis)
        } else {
            (backward, -axis)
        };
        if best.map_or(true, |(d, _)| depth < d) {
            best = Some((depth, normal));
        }
    }

    let (penetration, normal) = best?;
    let point = b.support(-normal) - normal * b.radius;
    Some(Contact::new(point, normal, penetration))
}

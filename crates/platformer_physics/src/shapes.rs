//! Collision shapes for 2D physics
//!
//! Geometry is stored in body-local coordinates and transformed into world
//! space by the owning body's position and angle whenever it is tested.

use platformer_math::{Rect, Vec2};
use slotmap::new_key_type;

use crate::body::BodyKey;
use crate::collision::{CollisionClass, CollisionFilter, Hull};
use crate::material::PhysicsMaterial;

new_key_type! {
    /// Key to a shape in the physics world
    pub struct ShapeKey;
}

/// A line segment with thickness (a capsule), used for platforms and borders
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub a: Vec2,
    pub b: Vec2,
    /// Half-thickness
    pub radius: f32,
}

impl Segment {
    pub fn new(a: Vec2, b: Vec2, radius: f32) -> Self {
        Self { a, b, radius }
    }

    pub fn midpoint(&self) -> Vec2 {
        self.a.midpoint(self.b)
    }
}

/// A convex polygon given by its vertices
#[derive(Clone, Debug, PartialEq)]
pub struct ConvexPolygon {
    pub vertices: Vec<Vec2>,
}

impl ConvexPolygon {
    /// Create a polygon from vertices in either winding order
    pub fn new(vertices: Vec<Vec2>) -> Self {
        debug_assert!(vertices.len() >= 3, "a polygon needs at least 3 vertices");
        Self { vertices }
    }

    /// Axis-aligned box centered on the body origin
    pub fn rectangle(width: f32, height: f32) -> Self {
        let hw = width * 0.5;
        let hh = height * 0.5;
        Self::new(vec![
            Vec2::new(-hw, -hh),
            Vec2::new(hw, -hh),
            Vec2::new(hw, hh),
            Vec2::new(-hw, hh),
        ])
    }

    /// Upward-pointing triangle whose base is centered on the body origin
    pub fn triangle(base: f32, height: f32) -> Self {
        let hb = base * 0.5;
        Self::new(vec![
            Vec2::new(-hb, 0.0),
            Vec2::new(hb, 0.0),
            Vec2::new(0.0, -height),
        ])
    }
}

/// A circle, optionally offset from the body origin
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Collider enum for storing different collision shape types
#[derive(Clone, Debug, PartialEq)]
pub enum Collider {
    Segment(Segment),
    Polygon(ConvexPolygon),
    Circle(Circle),
}

/// Collider geometry transformed into world space
#[derive(Clone, Debug, PartialEq)]
pub enum WorldGeometry {
    Segment { a: Vec2, b: Vec2, radius: f32 },
    Polygon { vertices: Vec<Vec2> },
    Circle { center: Vec2, radius: f32 },
}

impl Collider {
    /// Transform the collider into world space for a body pose
    pub fn world_geometry(&self, position: Vec2, angle: f32) -> WorldGeometry {
        let to_world = |p: Vec2| p.rotated(angle) + position;
        match self {
            Collider::Segment(s) => WorldGeometry::Segment {
                a: to_world(s.a),
                b: to_world(s.b),
                radius: s.radius,
            },
            Collider::Polygon(p) => WorldGeometry::Polygon {
                vertices: p.vertices.iter().map(|v| to_world(*v)).collect(),
            },
            Collider::Circle(c) => WorldGeometry::Circle {
                center: to_world(c.center),
                radius: c.radius,
            },
        }
    }

    /// World-space convex hull used by the narrow phase
    pub fn hull(&self, position: Vec2, angle: f32) -> Hull {
        self.world_geometry(position, angle).to_hull()
    }
}

/// A collision shape attached to a body
#[derive(Clone, Debug)]
pub struct Shape {
    /// Owning body
    pub body: BodyKey,
    /// Geometry in body-local coordinates
    pub collider: Collider,
    /// Semantic class used for event dispatch
    pub class: CollisionClass,
    /// Layer/mask filter deciding which shapes are tested against each other
    pub filter: CollisionFilter,
    /// Sensors report begin/separate but never push bodies apart
    pub sensor: bool,
    pub material: PhysicsMaterial,
}

impl Shape {
    /// Create a solid shape of the given class, using the class' default filter
    pub fn new(body: BodyKey, collider: Collider, class: CollisionClass) -> Self {
        Self {
            body,
            collider,
            class,
            filter: CollisionFilter::for_class(class),
            sensor: false,
            material: PhysicsMaterial::default(),
        }
    }

    /// Mark this shape as a sensor
    pub fn with_sensor(mut self, sensor: bool) -> Self {
        self.sensor = sensor;
        self
    }

    pub fn with_material(mut self, material: PhysicsMaterial) -> Self {
        self.material = material;
        self
    }

    pub fn with_filter(mut self, filter: CollisionFilter) -> Self {
        self.filter = filter;
        self
    }
}

impl WorldGeometry {
    /// Axis-aligned bounds (used as a broad-phase reject)
    pub fn bounds(&self) -> Rect {
        match self {
            WorldGeometry::Segment { a, b, radius } => {
                let r = Vec2::new(*radius, *radius);
                Rect::new(a.min_components(*b) - r, a.max_components(*b) + r)
            }
            WorldGeometry::Polygon { vertices } => {
                let first = vertices.first().copied().unwrap_or(Vec2::ZERO);
                let (min, max) = vertices.iter().fold((first, first), |(min, max), v| {
                    (min.min_components(*v), max.max_components(*v))
                });
                Rect::new(min, max)
            }
            WorldGeometry::Circle { center, radius } => {
                Rect::from_center_half_extents(*center, Vec2::new(*radius, *radius))
            }
        }
    }

    /// Convex hull (core points + rounding radius) of this geometry
    pub fn to_hull(&self) -> Hull {
        match self {
            WorldGeometry::Segment { a, b, radius } => Hull::new(vec![*a, *b], *radius),
            WorldGeometry::Polygon { vertices } => Hull::new(vertices.clone(), 0.0),
            WorldGeometry::Circle { center, radius } => Hull::new(vec![*center], *radius),
        }
    }

    /// Representative position (segment midpoint, polygon centroid, circle center)
    pub fn center(&self) -> Vec2 {
        match self {
            WorldGeometry::Segment { a, b, .. } => a.midpoint(*b),
            WorldGeometry::Polygon { vertices } => {
                let sum = vertices.iter().fold(Vec2::ZERO, |acc, v| acc + *v);
                sum / vertices.len().max(1) as f32
            }
            WorldGeometry::Circle { center, .. } => *center,
        }
    }
}

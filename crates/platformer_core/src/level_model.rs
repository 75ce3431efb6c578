//! Level instantiation
//!
//! [`LevelModel::build`] turns a [`LevelDefinition`] into static bodies and
//! shapes inside a [`PhysicsWorld`] and derives the level's spawn and end
//! points from its platforms.

use platformer_math::Vec2;
use platformer_physics::{
    BodyKey, Circle, Collider, CollisionClass, ConvexPolygon, PhysicsMaterial, PhysicsWorld,
    RigidBody2D, Segment, Shape, ShapeKey,
};

use crate::level::{ConsumableKind, LevelDefinition, PlatformDef};
use crate::level_validator::{LevelDefinitionError, LevelValidator};

/// Tuning shared by every level
#[derive(Clone, Debug, PartialEq)]
pub struct LevelSettings {
    /// Spawn point height above the leftmost platform
    pub spawn_clearance: f32,
    /// End point height above the rightmost platform
    pub end_clearance: f32,
    /// The level is complete once the player is closer than this to the end point
    pub completion_radius: f32,
    /// Falling below this y coordinate kills the player
    pub fall_limit: f32,
    /// Half-thickness of platform and border segments
    pub platform_radius: f32,
    pub platform_material: PhysicsMaterial,
}

impl Default for LevelSettings {
    fn default() -> Self {
        Self {
            spawn_clearance: 100.0,
            end_clearance: 20.0,
            completion_radius: 50.0,
            fall_limit: 2000.0,
            platform_radius: 5.0,
            platform_material: PhysicsMaterial::PLATFORM,
        }
    }
}

/// Derive the spawn and end points from a list of platforms
///
/// The spawn point sits `spawn_clearance` above the midpoint of the
/// platform whose first endpoint has the smallest x; the end point sits
/// `end_clearance` above the platform whose first endpoint has the largest
/// x. On ties the first platform in definition order wins, for both ends.
pub fn derive_spawn_and_end(
    platforms: &[PlatformDef],
    spawn_clearance: f32,
    end_clearance: f32,
) -> Result<(Vec2, Vec2), LevelDefinitionError> {
    let first = platforms.first().ok_or(LevelDefinitionError::NoPlatforms)?;

    // Strict comparisons keep the earliest platform on ties
    let (leftmost, rightmost) = platforms.iter().skip(1).fold((first, first), |(lo, hi), p| {
        let lo = if p.start.x < lo.start.x { p } else { lo };
        let hi = if p.start.x > hi.start.x { p } else { hi };
        (lo, hi)
    });

    let spawn = Vec2::new(leftmost.midpoint().x, leftmost.start.y - spawn_clearance);
    let end = Vec2::new(rightmost.midpoint().x, rightmost.start.y - end_clearance);
    Ok((spawn, end))
}

/// A level instantiated in the physics world
#[derive(Clone, Debug)]
pub struct LevelModel {
    pub name: String,
    pub spawn_point: Vec2,
    pub end_point: Vec2,
    /// Static body carrying every platform and border segment
    ground_body: BodyKey,
    platforms: Vec<ShapeKey>,
    borders: Vec<ShapeKey>,
    hazards: Vec<BodyKey>,
    consumables: Vec<(BodyKey, ConsumableKind)>,
}

impl LevelModel {
    /// Check that a definition can be built, without touching any world
    pub fn validate(definition: &LevelDefinition) -> Result<(), LevelDefinitionError> {
        Self::placed_platforms(definition).map(|_| ())
    }

    /// Validated platforms, clamped to the safe area when there is one
    ///
    /// Clamping can collapse a platform lying outside the safe area onto a
    /// single point, so lengths are checked again afterwards.
    fn placed_platforms(definition: &LevelDefinition) -> Result<Vec<PlatformDef>, LevelDefinitionError> {
        LevelValidator::check(definition)?;

        let Some(area) = definition.safe_area else {
            return Ok(definition.platforms.clone());
        };
        let platforms: Vec<PlatformDef> = definition
            .platforms
            .iter()
            .map(|p| PlatformDef::new(area.clamp_point(p.start), area.clamp_point(p.end)))
            .collect();
        match platforms.iter().position(|p| p.length() <= f32::EPSILON) {
            Some(index) => Err(LevelDefinitionError::DegeneratePlatform { index }),
            None => Ok(platforms),
        }
    }

    /// Validate a definition and instantiate it into the world
    ///
    /// On error the world is left untouched.
    pub fn build(
        definition: &LevelDefinition,
        world: &mut PhysicsWorld,
        settings: &LevelSettings,
    ) -> Result<Self, LevelDefinitionError> {
        let platforms = Self::placed_platforms(definition)?;
        let (spawn_point, end_point) =
            derive_spawn_and_end(&platforms, settings.spawn_clearance, settings.end_clearance)?;

        let ground_body = world.add_body(RigidBody2D::new_static(Vec2::ZERO));
        let add_ground = |world: &mut PhysicsWorld, a: Vec2, b: Vec2| {
            world.add_shape(
                Shape::new(
                    ground_body,
                    Collider::Segment(Segment::new(a, b, settings.platform_radius)),
                    CollisionClass::Ground,
                )
                .with_material(settings.platform_material),
            )
        };

        let platform_shapes = platforms
            .iter()
            .map(|p| add_ground(world, p.start, p.end))
            .collect();

        let mut borders = Vec::new();
        if let Some(bounds) = definition.bounds {
            let corners = bounds.corners();
            for i in 0..corners.len() {
                borders.push(add_ground(world, corners[i], corners[(i + 1) % corners.len()]));
            }
        }

        let hazards = definition
            .hazards
            .iter()
            .map(|hazard| {
                let body = world.add_body(RigidBody2D::new_static(hazard.position));
                world.add_shape(
                    Shape::new(
                        body,
                        Collider::Polygon(ConvexPolygon::triangle(hazard.base, hazard.height)),
                        CollisionClass::Hazard,
                    )
                    .with_sensor(true)
                    .with_material(PhysicsMaterial::FRICTIONLESS),
                );
                body
            })
            .collect();

        let consumables = definition
            .consumables
            .iter()
            .map(|consumable| {
                let class = match consumable.kind {
                    ConsumableKind::Healthy => CollisionClass::HealthyConsumable,
                    ConsumableKind::Junk => CollisionClass::JunkConsumable,
                };
                let body = world.add_body(RigidBody2D::new_static(consumable.position));
                world.add_shape(
                    Shape::new(body, Collider::Circle(Circle::new(Vec2::ZERO, consumable.radius)), class)
                        .with_sensor(true)
                        .with_material(PhysicsMaterial::FRICTIONLESS),
                );
                (body, consumable.kind)
            })
            .collect();

        let model = Self {
            name: definition.name.clone(),
            spawn_point,
            end_point,
            ground_body,
            platforms: platform_shapes,
            borders,
            hazards,
            consumables,
        };
        log::info!(
            "Built level '{}': {} platforms, {} hazards, {} consumables, spawn ({:.1}, {:.1}), end ({:.1}, {:.1})",
            model.name,
            model.platforms.len(),
            model.hazards.len(),
            model.consumables.len(),
            spawn_point.x,
            spawn_point.y,
            end_point.x,
            end_point.y,
        );
        Ok(model)
    }

    pub fn ground_body(&self) -> BodyKey {
        self.ground_body
    }

    pub fn platform_shapes(&self) -> &[ShapeKey] {
        &self.platforms
    }

    pub fn border_shapes(&self) -> &[ShapeKey] {
        &self.borders
    }

    pub fn hazard_bodies(&self) -> &[BodyKey] {
        &self.hazards
    }

    pub fn consumable_bodies(&self) -> &[(BodyKey, ConsumableKind)] {
        &self.consumables
    }

    /// Consumables that have not been picked up yet
    pub fn remaining_consumables(&self, world: &PhysicsWorld) -> usize {
        self.consumables
            .iter()
            .filter(|(body, _)| world.is_body_alive(*body))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{HazardDef, LevelSet};
    use platformer_math::Rect;

    fn single_platform() -> LevelDefinition {
        LevelDefinition::new("single").with_platform(Vec2::new(50.0, 800.0), Vec2::new(300.0, 800.0))
    }

    #[test]
    fn test_single_platform_spawn_and_end() {
        let mut world = PhysicsWorld::new();
        let level = LevelModel::build(&single_platform(), &mut world, &LevelSettings::default()).unwrap();
        assert_eq!(level.spawn_point, Vec2::new(175.0, 700.0));
        assert_eq!(level.end_point, Vec2::new(175.0, 780.0));
    }

    #[test]
    fn test_ties_pick_first_platform() {
        let platforms = [
            PlatformDef::new(Vec2::new(50.0, 800.0), Vec2::new(300.0, 800.0)),
            PlatformDef::new(Vec2::new(900.0, 500.0), Vec2::new(1000.0, 500.0)),
            PlatformDef::new(Vec2::new(50.0, 300.0), Vec2::new(100.0, 300.0)),
            PlatformDef::new(Vec2::new(900.0, 100.0), Vec2::new(1200.0, 100.0)),
        ];
        let (spawn, end) = derive_spawn_and_end(&platforms, 100.0, 20.0).unwrap();
        assert_eq!(spawn, Vec2::new(175.0, 700.0));
        assert_eq!(end, Vec2::new(950.0, 480.0));
    }

    #[test]
    fn test_ranking_uses_first_endpoint() {
        // The second platform reaches further left, but only via its end
        let platforms = [
            PlatformDef::new(Vec2::new(100.0, 500.0), Vec2::new(200.0, 500.0)),
            PlatformDef::new(Vec2::new(400.0, 300.0), Vec2::new(0.0, 300.0)),
        ];
        let (spawn, end) = derive_spawn_and_end(&platforms, 100.0, 20.0).unwrap();
        assert_eq!(spawn, Vec2::new(150.0, 400.0));
        assert_eq!(end, Vec2::new(200.0, 280.0));
    }

    #[test]
    fn test_no_platforms_fails_without_touching_world() {
        let mut world = PhysicsWorld::new();
        let result = LevelModel::build(&LevelDefinition::new("empty"), &mut world, &LevelSettings::default());
        assert_eq!(result.unwrap_err(), LevelDefinitionError::NoPlatforms);
        assert_eq!(world.body_count(), 0);
        assert_eq!(world.shape_count(), 0);
    }

    #[test]
    fn test_build_creates_bodies_and_shapes() {
        let definition = single_platform()
            .with_platform(Vec2::new(350.0, 700.0), Vec2::new(600.0, 700.0))
            .with_hazard(HazardDef::new(Vec2::new(500.0, 695.0)))
            .with_consumable(Vec2::new(200.0, 760.0), ConsumableKind::Healthy)
            .with_consumable(Vec2::new(250.0, 760.0), ConsumableKind::Junk)
            .with_bounds(Rect::new(Vec2::ZERO, Vec2::new(1400.0, 900.0)));

        let mut world = PhysicsWorld::new();
        let level = LevelModel::build(&definition, &mut world, &LevelSettings::default()).unwrap();

        // ground + hazard + 2 consumables
        assert_eq!(world.body_count(), 4);
        // 2 platforms + 4 borders + hazard + 2 consumables
        assert_eq!(world.shape_count(), 9);
        assert_eq!(level.platform_shapes().len(), 2);
        assert_eq!(level.border_shapes().len(), 4);
        assert_eq!(level.remaining_consumables(&world), 2);

        for (key, shape) in world.shapes() {
            match shape.class {
                CollisionClass::Ground => {
                    assert!(!shape.sensor);
                    assert_eq!(shape.body, level.ground_body(), "{:?}", key);
                }
                CollisionClass::Player => panic!("level must not create a player"),
                _ => assert!(shape.sensor),
            }
        }
    }

    #[test]
    fn test_safe_area_clamps_platforms() {
        let definition = LevelDefinition::new("clamped")
            .with_platform(Vec2::new(-100.0, 800.0), Vec2::new(300.0, 800.0))
            .with_platform(Vec2::new(1300.0, 950.0), Vec2::new(1600.0, 950.0))
            .with_safe_area(Rect::new(Vec2::ZERO, Vec2::new(1400.0, 900.0)));

        let mut world = PhysicsWorld::new();
        let level = LevelModel::build(&definition, &mut world, &LevelSettings::default()).unwrap();

        assert_eq!(level.spawn_point, Vec2::new(150.0, 700.0));
        assert_eq!(level.end_point, Vec2::new(1350.0, 880.0));
    }

    #[test]
    fn test_platform_collapsed_by_safe_area_is_rejected() {
        let definition = single_platform()
            .with_platform(Vec2::new(1500.0, 950.0), Vec2::new(1600.0, 980.0))
            .with_safe_area(Rect::new(Vec2::ZERO, Vec2::new(1400.0, 900.0)));

        assert_eq!(
            LevelModel::validate(&definition),
            Err(LevelDefinitionError::DegeneratePlatform { index: 1 })
        );
        let mut world = PhysicsWorld::new();
        let result = LevelModel::build(&definition, &mut world, &LevelSettings::default());
        assert_eq!(result.unwrap_err(), LevelDefinitionError::DegeneratePlatform { index: 1 });
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn test_builtin_spawn_and_end_sit_above_platforms() {
        let settings = LevelSettings::default();
        let set = LevelSet::builtin().unwrap();

        for definition in &set.levels {
            let min_x = definition.platforms.iter().map(|p| p.start.x).fold(f32::INFINITY, f32::min);
            let max_x = definition.platforms.iter().map(|p| p.start.x).fold(f32::NEG_INFINITY, f32::max);
            let leftmost = definition.platforms.iter().find(|p| p.start.x == min_x).unwrap();
            let rightmost = definition.platforms.iter().find(|p| p.start.x == max_x).unwrap();

            let mut world = PhysicsWorld::new();
            let level = LevelModel::build(definition, &mut world, &settings).unwrap();

            assert!(level.spawn_point.y < leftmost.start.y, "{}", definition.name);
            assert_eq!(level.spawn_point.y, leftmost.start.y - settings.spawn_clearance);
            assert!(level.end_point.y < rightmost.start.y, "{}", definition.name);
            assert_eq!(level.end_point.y, rightmost.start.y - settings.end_clearance);
        }
    }

    #[test]
    fn test_first_builtin_level_matches_expected_points() {
        let set = LevelSet::builtin().unwrap();
        let mut world = PhysicsWorld::new();
        let level = LevelModel::build(&set.levels[0], &mut world, &LevelSettings::default()).unwrap();
        // Two platforms start at x=50; the lower one comes first
        assert_eq!(level.spawn_point, Vec2::new(175.0, 700.0));
        assert_eq!(level.end_point, Vec2::new(1325.0, 380.0));
    }
}

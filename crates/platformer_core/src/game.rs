//! Game state machine
//!
//! [`GameSession`] owns the physics world and drives the level lifecycle:
//!
//! ```text
//! Menu --start--> Playing --health 0--> Dead --restart--> Playing
//!                    |
//!                    +--reached end--> LevelComplete --delay--> Playing (next level)
//!                                                          \--> Victory --restart--> Menu
//! ```
//!
//! Every level load tears the world down completely and builds it again,
//! player included.

use platformer_math::Vec2;
use platformer_physics::{PhysicsConfig, PhysicsWorld};

use crate::camera::Camera2D;
use crate::level::LevelSet;
use crate::level_model::{LevelModel, LevelSettings};
use crate::level_validator::LevelDefinitionError;
use crate::narration::{narrate_or_fallback, LevelReport, Narrator};
use crate::player::{HorizontalIntent, PlayerController, PlayerSettings, PlayerState};
use crate::snapshot::{class_color, FrameSnapshot, PlayerSnapshot, ShapeSnapshot};
use crate::taxonomy::{CollisionTaxonomy, ConsumableEffects};

/// Lifecycle phase of a session
#[derive(Clone, Debug, PartialEq)]
pub enum GamePhase {
    /// Waiting for a start intent
    Menu,
    Playing,
    /// Health reached zero; waiting for a restart intent
    Dead,
    /// End point reached; the next level loads once `remaining` runs out
    LevelComplete {
        remaining: f32,
        narration: Option<String>,
    },
    /// The last level is done
    Victory { narration: Option<String> },
}

impl GamePhase {
    pub fn name(&self) -> &'static str {
        match self {
            GamePhase::Menu => "Menu",
            GamePhase::Playing => "Playing",
            GamePhase::Dead => "Dead",
            GamePhase::LevelComplete { .. } => "Level Complete",
            GamePhase::Victory { .. } => "Victory",
        }
    }

    pub fn narration(&self) -> Option<&str> {
        match self {
            GamePhase::LevelComplete { narration, .. } | GamePhase::Victory { narration } => {
                narration.as_deref()
            }
            _ => None,
        }
    }
}

/// Logical input for one tick
///
/// `move_left`/`move_right` are held states; everything else is
/// edge-triggered (true only on the tick the key went down).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickIntents {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
    pub restart: bool,
    pub quit: bool,
    /// Debug: skip to the next level
    pub advance_level: bool,
    pub start: bool,
}

impl TickIntents {
    pub fn horizontal(&self) -> HorizontalIntent {
        HorizontalIntent::from_held(self.move_left, self.move_right)
    }
}

/// What the caller should do after a tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Quit,
}

/// Error from the game state machine
#[derive(Debug, Clone, PartialEq)]
pub enum GameError {
    /// The level set is empty
    NoLevels,
    /// Requested level index does not exist
    LevelOutOfRange { index: usize, count: usize },
    /// The level definition failed validation
    InvalidLevel {
        index: usize,
        error: LevelDefinitionError,
    },
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameError::NoLevels => write!(f, "No levels configured"),
            GameError::LevelOutOfRange { index, count } => {
                write!(f, "Level index {} out of range ({} levels)", index, count)
            }
            GameError::InvalidLevel { index, error } => {
                write!(f, "Level {} is invalid: {}", index, error)
            }
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::InvalidLevel { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Everything tunable about a session
#[derive(Clone, Debug)]
pub struct GameSettings {
    pub physics: PhysicsConfig,
    /// Fixed simulation step in seconds
    pub timestep: f32,
    pub player: PlayerSettings,
    pub level: LevelSettings,
    pub consumables: ConsumableEffects,
    /// Seconds spent in LevelComplete before moving on
    pub level_complete_delay: f32,
    pub viewport: Vec2,
    pub camera_half_life: f32,
    /// Shown when the narrator fails
    pub narration_fallback: String,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            timestep: 1.0 / 60.0,
            player: PlayerSettings::default(),
            level: LevelSettings::default(),
            consumables: ConsumableEffects::default(),
            level_complete_delay: 2.0,
            viewport: Vec2::new(1400.0, 900.0),
            camera_half_life: 0.15,
            narration_fallback: "Level complete!".to_string(),
        }
    }
}

/// A play session: physics world, current level, player and phase
pub struct GameSession {
    settings: GameSettings,
    levels: LevelSet,
    world: PhysicsWorld,
    controller: PlayerController,
    camera: Camera2D,
    narrator: Option<Box<dyn Narrator>>,
    phase: GamePhase,
    level_index: usize,
    level: Option<LevelModel>,
    player: Option<PlayerState>,
}

impl GameSession {
    /// Create a session in the Menu phase
    pub fn new(settings: GameSettings, levels: LevelSet) -> Result<Self, GameError> {
        if levels.is_empty() {
            return Err(GameError::NoLevels);
        }
        let world = PhysicsWorld::with_config(settings.physics.clone());
        let controller = PlayerController::new(&settings.player);
        let camera = Camera2D::new(settings.viewport).with_follow_half_life(settings.camera_half_life);

        Ok(Self {
            settings,
            levels,
            world,
            controller,
            camera,
            narrator: None,
            phase: GamePhase::Menu,
            level_index: 0,
            level: None,
            player: None,
        })
    }

    /// Attach a narrator for end-of-level text
    pub fn with_narrator(mut self, narrator: Box<dyn Narrator>) -> Self {
        self.narrator = Some(narrator);
        self
    }

    pub fn phase(&self) -> &GamePhase {
        &self.phase
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn level(&self) -> Option<&LevelModel> {
        self.level.as_ref()
    }

    pub fn player(&self) -> Option<&PlayerState> {
        self.player.as_ref()
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }

    pub fn camera(&self) -> &Camera2D {
        &self.camera
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Start a run from the first level with fresh health
    pub fn start(&mut self) -> Result<(), GameError> {
        log::info!("Starting run ({} levels)", self.levels.len());
        self.load_level_with_health(0, None)
    }

    /// Tear down the world and load a level, entering Playing
    ///
    /// A living player keeps their health into the new level. The definition
    /// is validated first; on error nothing changes.
    pub fn load_level(&mut self, index: usize) -> Result<(), GameError> {
        let carried = self.player.as_ref().filter(|p| !p.is_dead()).map(PlayerState::health);
        self.load_level_with_health(index, carried)
    }

    /// Load a level, spawning the player with `health` or the initial health
    fn load_level_with_health(&mut self, index: usize, health: Option<f32>) -> Result<(), GameError> {
        let count = self.levels.len();
        let definition = self
            .levels
            .get(index)
            .cloned()
            .ok_or(GameError::LevelOutOfRange { index, count })?;
        LevelModel::validate(&definition).map_err(|error| GameError::InvalidLevel { index, error })?;

        self.teardown();
        let level = LevelModel::build(&definition, &mut self.world, &self.settings.level)
            .map_err(|error| GameError::InvalidLevel { index, error })?;
        let mut player = PlayerState::spawn(&mut self.world, level.spawn_point, &self.settings.player);
        if let Some(health) = health {
            player.set_health(health);
        }
        self.camera.snap_to(level.spawn_point);

        log::info!("Loaded level {}/{} '{}'", index + 1, count, level.name);
        self.level_index = index;
        self.level = Some(level);
        self.player = Some(player);
        self.phase = GamePhase::Playing;
        Ok(())
    }

    /// Advance the session by one fixed step
    pub fn tick(&mut self, intents: &TickIntents) -> Result<TickOutcome, GameError> {
        if intents.quit {
            log::info!("Quit requested");
            return Ok(TickOutcome::Quit);
        }
        let dt = self.settings.timestep;

        match self.phase {
            GamePhase::Menu => {
                if intents.start {
                    self.start()?;
                }
            }
            GamePhase::Playing => {
                if intents.advance_level {
                    let next = (self.level_index + 1) % self.levels.len();
                    log::info!("Skipping to level {}", next + 1);
                    self.load_level(next)?;
                } else {
                    self.step_playing(intents, dt);
                }
            }
            GamePhase::Dead => {
                if intents.restart {
                    log::info!("Restarting level {}", self.level_index + 1);
                    self.load_level_with_health(self.level_index, None)?;
                }
            }
            GamePhase::LevelComplete { .. } => self.tick_level_complete(dt)?,
            GamePhase::Victory { .. } => {
                if intents.restart {
                    self.teardown();
                    self.level_index = 0;
                    self.phase = GamePhase::Menu;
                    log::info!("Back to menu");
                }
            }
        }
        Ok(TickOutcome::Continue)
    }

    fn step_playing(&mut self, intents: &TickIntents, dt: f32) {
        let (Some(player), Some(level)) = (self.player.as_mut(), self.level.as_ref()) else {
            panic!("Playing phase without a loaded level");
        };

        self.controller.set_horizontal_intent(player, &mut self.world, intents.horizontal());
        if intents.jump {
            self.controller.jump(player, &mut self.world);
        }

        self.world.step(dt, &mut CollisionTaxonomy::new(player, &self.settings.consumables));
        player.elapsed += dt;

        let position = player.position(&self.world);
        self.camera.follow(position, dt);

        if position.y > self.settings.level.fall_limit && !player.is_dead() {
            log::info!("Player fell out of the level");
            player.kill();
        }

        if player.is_dead() {
            log::info!(
                "Player died on level {} after {:.1}s",
                self.level_index + 1,
                player.elapsed
            );
            self.phase = GamePhase::Dead;
        } else if position.distance(level.end_point) < self.settings.level.completion_radius {
            self.complete_level();
        }
    }

    fn complete_level(&mut self) {
        let Some(player) = self.player.as_ref() else {
            panic!("level completed without a player");
        };
        let report = LevelReport {
            level_index: self.level_index,
            level_name: self.level.as_ref().map(|l| l.name.clone()).unwrap_or_default(),
            final_health: player.health(),
            max_health: player.max_health(),
            elapsed: player.elapsed,
            final_level: self.level_index + 1 >= self.levels.len(),
        };
        log::info!(
            "Level {} complete in {:.1}s with {:.0} health",
            self.level_index + 1,
            report.elapsed,
            report.final_health
        );

        let fallback = &self.settings.narration_fallback;
        let narration = self
            .narrator
            .as_mut()
            .map(|narrator| narrate_or_fallback(narrator.as_mut(), &report, fallback));

        self.phase = GamePhase::LevelComplete {
            remaining: self.settings.level_complete_delay,
            narration,
        };
    }

    fn tick_level_complete(&mut self, dt: f32) -> Result<(), GameError> {
        let done = match &mut self.phase {
            GamePhase::LevelComplete { remaining, .. } => {
                *remaining -= dt;
                *remaining <= 0.0
            }
            _ => false,
        };
        if !done {
            return Ok(());
        }

        if self.level_index + 1 >= self.levels.len() {
            let narration = self.phase.narration().map(str::to_string);
            self.teardown();
            self.phase = GamePhase::Victory { narration };
            log::info!("Run complete");
            Ok(())
        } else {
            self.load_level(self.level_index + 1)
        }
    }

    /// Remove every body and shape; the player goes with them
    fn teardown(&mut self) {
        self.world.clear();
        self.level = None;
        self.player = None;
    }

    /// Read-only view of the current frame for the renderer
    pub fn snapshot(&self) -> FrameSnapshot {
        let player = self.player.as_ref().and_then(|player| {
            let body = self.world.get_body(player.body)?;
            Some(PlayerSnapshot {
                position: body.position,
                velocity: body.velocity,
                health: player.health(),
                max_health: player.max_health(),
                elapsed: player.elapsed,
                on_ground: player.on_ground(),
            })
        });

        let shapes = self
            .world
            .shapes()
            .filter_map(|(key, shape)| {
                Some(ShapeSnapshot {
                    key,
                    class: shape.class,
                    geometry: self.world.shape_geometry(key)?,
                    color: class_color(shape.class),
                })
            })
            .collect();

        FrameSnapshot {
            phase: self.phase.clone(),
            level_index: self.level_index,
            level_name: self.level.as_ref().map(|level| level.name.clone()),
            player,
            end_point: self.level.as_ref().map(|level| level.end_point),
            shapes,
            camera: self.camera.transform(),
        }
    }
}

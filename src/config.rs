//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`PLAT_SECTION__KEY`)
//!
//! Each section converts into the settings struct of the library it tunes.

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::Path;

use platformer_core::{
    ConsumableEffect, ConsumableEffects, GameSettings, IdlePolicy, LevelSettings, PlayerSettings, Vec2,
};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Window configuration
    #[serde(default)]
    pub window: WindowConfig,
    /// Physics configuration
    #[serde(default)]
    pub physics: PhysicsConfig,
    /// Player configuration
    #[serde(default)]
    pub player: PlayerConfig,
    /// Level configuration
    #[serde(default)]
    pub level: LevelConfig,
    /// Consumable effects
    #[serde(default)]
    pub consumables: ConsumablesConfig,
    /// Camera configuration
    #[serde(default)]
    pub camera: CameraConfig,
    /// Narration configuration
    #[serde(default)]
    pub narration: NarrationConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`PLAT_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // Load user config (optional)
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // PLAT_PHYSICS__GRAVITY=500 -> physics.gravity = 500
        figment = figment.merge(Env::prefixed("PLAT_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }

    /// Collect every gameplay section into session settings
    pub fn to_game_settings(&self) -> GameSettings {
        GameSettings {
            physics: self.physics.to_physics_config(),
            timestep: self.physics.timestep,
            player: self.player.to_player_settings(),
            level: self.level.to_level_settings(),
            consumables: self.consumables.to_consumable_effects(),
            level_complete_delay: self.level.complete_delay,
            viewport: Vec2::new(self.camera.viewport[0], self.camera.viewport[1]),
            camera_half_life: self.camera.follow_half_life,
            narration_fallback: self.narration.fallback.clone(),
        }
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Start in fullscreen mode
    pub fullscreen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Health Platformer".to_string(),
            width: 1400,
            height: 900,
            fullscreen: false,
        }
    }
}

/// Physics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward gravity in pixels per second squared
    pub gravity: f32,
    /// Fixed simulation step in seconds
    pub timestep: f32,
    /// Most simulation steps run for a single frame
    pub max_substeps: u32,
    /// Penetration tolerated before positional correction
    pub collision_slop: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 900.0,
            timestep: 1.0 / 60.0,
            max_substeps: 5,
            collision_slop: 0.1,
        }
    }
}

impl PhysicsConfig {
    pub fn to_physics_config(&self) -> platformer_physics::PhysicsConfig {
        platformer_physics::PhysicsConfig::new(self.gravity).with_collision_slop(self.collision_slop)
    }
}

/// Player configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Box size [width, height]
    pub size: [f32; 2],
    pub mass: f32,
    pub friction: f32,
    /// Horizontal speed while a direction is held
    pub move_speed: f32,
    pub jump_impulse: f32,
    pub initial_health: f32,
    pub max_health: f32,
    /// "hold" keeps x-velocity without input, "stop" zeroes it
    pub idle_policy: IdlePolicy,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            size: [60.0, 60.0],
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

impl PlayerConfig {
    pub fn to_player_settings(&self) -> PlayerSettings {
        PlayerSettings {
            size: Vec2::new(self.size[0], self.size[1]),
            mass: self.mass,
            friction: self.friction,
            move_speed: self.move_speed,
            jump_impulse: self.jump_impulse,
            initial_health: self.initial_health,
            max_health: self.max_health,
            idle_policy: self.idle_policy,
        }
    }
}

/// Level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Spawn height above the leftmost platform
    pub spawn_clearance: f32,
    /// End point height above the rightmost platform
    pub end_clearance: f32,
    /// Distance to the end point that completes a level
    pub completion_radius: f32,
    /// Falling below this y coordinate kills the player
    pub fall_limit: f32,
    /// Seconds to linger on the level-complete screen
    pub complete_delay: f32,
    /// RON level set to play instead of the built-in levels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub levels_path: Option<String>,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            spawn_clearance: 100.0,
            end_clearance: 20.0,
            completion_radius: 50.0,
            fall_limit: 2000.0,
            complete_delay: 2.0,
            levels_path: None,
        }
    }
}

impl LevelConfig {
    pub fn to_level_settings(&self) -> LevelSettings {
        LevelSettings {
            spawn_clearance: self.spawn_clearance,
            end_clearance: self.end_clearance,
            completion_radius: self.completion_radius,
            fall_limit: self.fall_limit,
            ..LevelSettings::default()
        }
    }
}

/// Consumable effects configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsumablesConfig {
    pub healthy_health: f32,
    pub healthy_velocity: f32,
    pub junk_health: f32,
    pub junk_velocity: f32,
}

impl Default for ConsumablesConfig {
    fn default() -> Self {
        Self {
            healthy_health: 5.0,
            healthy_velocity: 1.20,
            junk_health: -5.0,
            junk_velocity: 0.65,
        }
    }
}

impl ConsumablesConfig {
    pub fn to_consumable_effects(&self) -> ConsumableEffects {
        ConsumableEffects {
            healthy: ConsumableEffect {
                health_delta: self.healthy_health,
                velocity_multiplier: self.healthy_velocity,
            },
            junk: ConsumableEffect {
                health_delta: self.junk_health,
                velocity_multiplier: self.junk_velocity,
            },
        }
    }
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Visible world area [width, height]
    pub viewport: [f32; 2],
    /// Seconds for the camera to close half the distance to the player
    pub follow_half_life: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            viewport: [1400.0, 900.0],
            follow_half_life: 0.15,
        }
    }
}

/// Narration configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrationConfig {
    /// Describe each finished level
    pub enabled: bool,
    /// Text shown when narration fails
    pub fallback: String,
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            fallback: "Level complete!".to_string(),
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

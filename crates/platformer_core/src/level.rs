//! Level definitions
//!
//! Levels are plain data loaded from RON: platform segments, hazards and
//! consumables. A [`LevelSet`] is the ordered list of levels a run plays
//! through. The built-in set is embedded in the crate.

use serde::{Serialize, Deserialize};
use std::fs;
use std::io;
use std::path::Path;

use platformer_math::{Rect, Vec2};

const BUILTIN_LEVELS: &str = include_str!("../assets/levels.ron");

/// A platform segment between two endpoints
///
/// The first endpoint (`start`) is the one used to rank platforms
/// left-to-right when deriving spawn and end points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlatformDef {
    pub start: Vec2,
    pub end: Vec2,
}

impl PlatformDef {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    pub fn midpoint(&self) -> Vec2 {
        self.start.midpoint(self.end)
    }

    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }
}

fn default_hazard_base() -> f32 {
    40.0
}

fn default_hazard_height() -> f32 {
    30.0
}

/// An upward-pointing triangular spike; `position` is the center of its base
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HazardDef {
    pub position: Vec2,
    #[serde(default = "default_hazard_base")]
    pub base: f32,
    #[serde(default = "default_hazard_height")]
    pub height: f32,
}

impl HazardDef {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            base: default_hazard_base(),
            height: default_hazard_height(),
        }
    }
}

/// What a consumable does when the player touches it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsumableKind {
    /// Heals and speeds the player up
    Healthy,
    /// Hurts and slows the player down
    Junk,
}

fn default_consumable_radius() -> f32 {
    15.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsumableDef {
    pub position: Vec2,
    pub kind: ConsumableKind,
    #[serde(default = "default_consumable_radius")]
    pub radius: f32,
}

impl ConsumableDef {
    pub fn new(position: Vec2, kind: ConsumableKind) -> Self {
        Self {
            position,
            kind,
            radius: default_consumable_radius(),
        }
    }
}

/// Declarative description of one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDefinition {
    /// Level name (for display/debugging)
    pub name: String,
    /// Platform segments, in definition order
    pub platforms: Vec<PlatformDef>,
    #[serde(default)]
    pub hazards: Vec<HazardDef>,
    #[serde(default)]
    pub consumables: Vec<ConsumableDef>,
    /// When set, platform endpoints are clamped into this rectangle
    #[serde(default)]
    pub safe_area: Option<Rect>,
    /// When set, four ground segments are placed along this rectangle's edges
    #[serde(default)]
    pub bounds: Option<Rect>,
}

impl LevelDefinition {
    /// Create an empty level definition
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            platforms: Vec::new(),
            hazards: Vec::new(),
            consumables: Vec::new(),
            safe_area: None,
            bounds: None,
        }
    }

    pub fn with_platform(mut self, start: Vec2, end: Vec2) -> Self {
        self.platforms.push(PlatformDef::new(start, end));
        self
    }

    pub fn with_hazard(mut self, hazard: HazardDef) -> Self {
        self.hazards.push(hazard);
        self
    }

    pub fn with_consumable(mut self, position: Vec2, kind: ConsumableKind) -> Self {
        self.consumables.push(ConsumableDef::new(position, kind));
        self
    }

    pub fn with_safe_area(mut self, area: Rect) -> Self {
        self.safe_area = Some(area);
        self
    }

    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = Some(bounds);
        self
    }
}

/// Ordered list of levels making up a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSet {
    pub levels: Vec<LevelDefinition>,
}

impl LevelSet {
    pub fn new(levels: Vec<LevelDefinition>) -> Self {
        Self { levels }
    }

    /// The levels shipped with the game
    pub fn builtin() -> Result<Self, LevelLoadError> {
        Self::from_ron_str(BUILTIN_LEVELS)
    }

    /// Parse a level set from RON text
    pub fn from_ron_str(contents: &str) -> Result<Self, LevelLoadError> {
        Ok(ron::from_str(contents)?)
    }

    /// Load a level set from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LevelLoadError> {
        let contents = fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Save a level set to a RON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), LevelSaveError> {
        let pretty = ron::ser::PrettyConfig::new()
            .struct_names(true)
            .enumerate_arrays(false);
        let contents = ron::ser::to_string_pretty(self, pretty)?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LevelDefinition> {
        self.levels.get(index)
    }
}

/// Error loading a level set
#[derive(Debug)]
pub enum LevelLoadError {
    /// IO error (file not found, permission denied, etc.)
    Io(io::Error),
    /// Parse error (invalid RON syntax or shape)
    Parse(ron::error::SpannedError),
}

impl From<io::Error> for LevelLoadError {
    fn from(e: io::Error) -> Self {
        LevelLoadError::Io(e)
    }
}

impl From<ron::error::SpannedError> for LevelLoadError {
    fn from(e: ron::error::SpannedError) -> Self {
        LevelLoadError::Parse(e)
    }
}

impl std::fmt::Display for LevelLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelLoadError::Io(e) => write!(f, "IO error: {}", e),
            LevelLoadError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for LevelLoadError {}

/// Error saving a level set
#[derive(Debug)]
pub enum LevelSaveError {
    Io(io::Error),
    Serialize(ron::Error),
}

impl From<io::Error> for LevelSaveError {
    fn from(e: io::Error) -> Self {
        LevelSaveError::Io(e)
    }
}

impl From<ron::Error> for LevelSaveError {
    fn from(e: ron::Error) -> Self {
        LevelSaveError::Serialize(e)
    }
}

impl std::fmt::Display for LevelSaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelSaveError::Io(e) => write!(f, "IO error: {}", e),
            LevelSaveError::Serialize(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for LevelSaveError {}

//! Level validation
//!
//! Checks a [`LevelDefinition`] for problems that would make it unplayable
//! before anything is built from it. The [`LevelValidator`] reports every
//! problem it finds; building a level fails on the first one.

use crate::level::LevelDefinition;

/// Problem found in a level definition
#[derive(Debug, Clone, PartialEq)]
pub enum LevelDefinitionError {
    /// Level has no platforms, so spawn and end points cannot be derived
    NoPlatforms,
    /// Platform endpoints coincide
    DegeneratePlatform { index: usize },
    /// A coordinate or size is NaN or infinite
    NonFiniteCoordinate { what: &'static str, index: usize },
    /// A hazard or consumable has a non-positive size
    InvalidSize { what: &'static str, index: usize },
    /// Safe area or bounds rectangle has min > max
    InvalidRect { what: &'static str },
}

impl std::fmt::Display for LevelDefinitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelDefinitionError::NoPlatforms => write!(f, "Level has no platforms"),
            LevelDefinitionError::DegeneratePlatform { index } => {
                write!(f, "Platform {} has zero length", index)
            }
            LevelDefinitionError::NonFiniteCoordinate { what, index } => {
                write!(f, "{} {} has a non-finite coordinate", what, index)
            }
            LevelDefinitionError::InvalidSize { what, index } => {
                write!(f, "{} {} has a non-positive size", what, index)
            }
            LevelDefinitionError::InvalidRect { what } => {
                write!(f, "Level {} rectangle is inverted or non-finite", what)
            }
        }
    }
}

impl std::error::Error for LevelDefinitionError {}

/// Validator for level definitions
pub struct LevelValidator;

impl LevelValidator {
    /// Validate a level, returning all errors found
    ///
    /// Returns an empty vector if the level is valid.
    pub fn validate(level: &LevelDefinition) -> Vec<LevelDefinitionError> {
        let mut errors = Vec::new();

        if level.platforms.is_empty() {
            errors.push(LevelDefinitionError::NoPlatforms);
        }

        for (index, platform) in level.platforms.iter().enumerate() {
            if !platform.start.is_finite() || !platform.end.is_finite() {
                errors.push(LevelDefinitionError::NonFiniteCoordinate { what: "Platform", index });
            } else if platform.length() <= f32::EPSILON {
                errors.push(LevelDefinitionError::DegeneratePlatform { index });
            }
        }

        for (index, hazard) in level.hazards.iter().enumerate() {
            if !hazard.position.is_finite() || !hazard.base.is_finite() || !hazard.height.is_finite() {
                errors.push(LevelDefinitionError::NonFiniteCoordinate { what: "Hazard", index });
            } else if hazard.base <= 0.0 || hazard.height <= 0.0 {
                errors.push(LevelDefinitionError::InvalidSize { what: "Hazard", index });
            }
        }

        for (index, consumable) in level.consumables.iter().enumerate() {
            if !consumable.position.is_finite() || !consumable.radius.is_finite() {
                errors.push(LevelDefinitionError::NonFiniteCoordinate { what: "Consumable", index });
            } else if consumable.radius <= 0.0 {
                errors.push(LevelDefinitionError::InvalidSize { what: "Consumable", index });
            }
        }

        if let Some(area) = level.safe_area {
            if !area.is_valid() {
                errors.push(LevelDefinitionError::InvalidRect { what: "safe area" });
            }
        }
        if let Some(bounds) = level.bounds {
            if !bounds.is_valid() {
                errors.push(LevelDefinitionError::InvalidRect { what: "bounds" });
            }
        }

        errors
    }

    /// Validate and return the first error, logging any others
    pub fn check(level: &LevelDefinition) -> Result<(), LevelDefinitionError> {
        let mut errors = Self::validate(level).into_iter();
        match errors.next() {
            None => Ok(()),
            Some(first) => {
                for other in errors {
                    log::warn!("Level '{}': {}", level.name, other);
                }
                Err(first)
            }
        }
    }
}

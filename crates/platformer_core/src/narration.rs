//! End-of-level narration
//!
//! A [`Narrator`] turns the result of a finished level into a line of text
//! for the presentation layer. Narration is optional: failures are logged and
//! replaced by a fallback message, and never hold up the game.

/// Result of a finished level, handed to the narrator
#[derive(Clone, Debug, PartialEq)]
pub struct LevelReport {
    pub level_index: usize,
    pub level_name: String,
    pub final_health: f32,
    pub max_health: f32,
    /// Seconds spent in the level
    pub elapsed: f32,
    /// True when this was the last level of the run
    pub final_level: bool,
}

/// Error from a narration service
#[derive(Debug, Clone, PartialEq)]
pub enum NarrationError {
    /// The service could not be reached or timed out
    Unavailable(String),
    /// The service answered with something unusable
    InvalidResponse(String),
}

impl std::fmt::Display for NarrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NarrationError::Unavailable(reason) => write!(f, "Narration unavailable: {}", reason),
            NarrationError::InvalidResponse(reason) => {
                write!(f, "Invalid narration response: {}", reason)
            }
        }
    }
}

impl std::error::Error for NarrationError {}

/// Produces descriptive text for a finished level
pub trait Narrator {
    fn narrate(&mut self, report: &LevelReport) -> Result<String, NarrationError>;
}

/// Offline narrator that describes the run from a few fixed templates
#[derive(Clone, Debug, Default)]
pub struct TemplateNarrator;

impl Narrator for TemplateNarrator {
    fn narrate(&mut self, report: &LevelReport) -> Result<String, NarrationError> {
        let ratio = if report.max_health > 0.0 {
            report.final_health / report.max_health
        } else {
            0.0
        };
        let condition = if ratio >= 0.5 {
            "in great shape"
        } else if ratio >= 0.15 {
            "a little worn out"
        } else {
            "barely standing"
        };
        let ending = if report.final_level {
            "The run is complete."
        } else {
            "On to the next level."
        };
        Ok(format!(
            "Finished '{}' in {:.1}s {} with {:.0} health. {}",
            report.level_name, report.elapsed, condition, report.final_health, ending
        ))
    }
}

/// Ask the narrator for text, falling back to `fallback` on failure
pub fn narrate_or_fallback(narrator: &mut dyn Narrator, report: &LevelReport, fallback: &str) -> String {
    match narrator.narrate(report) {
        Ok(text) => text,
        Err(e) => {
            log::warn!("Narration failed for level {}: {}", report.level_index, e);
            fallback.to_string()
        }
    }
}

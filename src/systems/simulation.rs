//! Game simulation system
//!
//! Runs the game session at a fixed rate regardless of frame rate:
//! - Real frame time is accumulated
//! - The accumulator is drained in fixed ticks, each consuming one set of intents
//! - A frame never runs more than `max_substeps` ticks; any backlog beyond that is dropped

use std::time::Instant;
use platformer_core::{GameError, GameSession, TickOutcome};
use platformer_input::PlayerInput;

/// Longest frame time fed into the accumulator
const MAX_FRAME_TIME: f32 = 0.25;

/// Result of a simulation update
#[derive(Debug, Default)]
pub struct SimulationResult {
    /// Ticks run this frame
    pub ticks: u32,
    /// A tick asked to quit
    pub quit: bool,
    /// Last error reported by a tick this frame
    pub error: Option<GameError>,
}

/// Drives a [`GameSession`] with a fixed-timestep accumulator
pub struct SimulationSystem {
    last_frame: Instant,
    accumulator: f32,
    timestep: f32,
    max_substeps: u32,
}

impl SimulationSystem {
    /// Create a new simulation system
    pub fn new(timestep: f32, max_substeps: u32) -> Self {
        Self {
            last_frame: Instant::now(),
            accumulator: 0.0,
            timestep,
            max_substeps: max_substeps.max(1),
        }
    }

    /// Run one frame using the wall-clock time since the previous frame
    pub fn update(&mut self, session: &mut GameSession, input: &mut PlayerInput) -> SimulationResult {
        let now = Instant::now();
        let frame_time = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.advance(frame_time, session, input)
    }

    /// Run one frame of `frame_time` seconds
    pub fn advance(
        &mut self,
        frame_time: f32,
        session: &mut GameSession,
        input: &mut PlayerInput,
    ) -> SimulationResult {
        // Cap frame time to prevent spiral of death after a stall
        self.accumulator += frame_time.clamp(0.0, MAX_FRAME_TIME);

        let mut result = SimulationResult::default();
        while self.accumulator >= self.timestep && result.ticks < self.max_substeps {
            self.accumulator -= self.timestep;
            result.ticks += 1;

            let intents = input.consume_intents();
            match session.tick(&intents) {
                Ok(TickOutcome::Continue) => {}
                Ok(TickOutcome::Quit) => {
                    result.quit = true;
                    break;
                }
                Err(e) => {
                    log::error!("Game tick failed: {}", e);
                    result.error = Some(e);
                }
            }
        }

        if self.accumulator >= self.timestep {
            log::debug!(
                "Dropping {:.3}s of simulation backlog",
                self.accumulator - self.accumulator % self.timestep
            );
            self.accumulator %= self.timestep;
        }

        result
    }

    /// Time waiting in the accumulator, in seconds
    pub fn pending_time(&self) -> f32 {
        self.accumulator
    }
}

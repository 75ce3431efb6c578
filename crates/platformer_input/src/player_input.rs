//! Keyboard state to per-tick intents
//!
//! Controls:
//! - Left/Right arrows (or A/D): Move (held)
//! - Up arrow (or W): Jump
//! - Enter/Space: Start from the menu
//! - R: Restart after death or victory
//! - N: Skip to the next level (debug)
//! - Escape: Quit
//!
//! Held keys are reported for every tick while down. Everything else is
//! edge-triggered: a press is latched until the next [`PlayerInput::consume_intents`].

use platformer_core::TickIntents;
use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// Keyboard state collected between simulation ticks
#[derive(Clone, Debug, Default)]
pub struct PlayerInput {
    // Held state
    left: bool,
    right: bool,

    // Latched presses
    jump_pressed: bool,
    restart_pressed: bool,
    advance_pressed: bool,
    start_pressed: bool,
    quit_pressed: bool,
}

impl PlayerInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a keyboard event
    ///
    /// Returns true if the key is one the game uses. Auto-repeat presses
    /// should be filtered out by the caller.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) -> bool {
        let pressed = state == ElementState::Pressed;

        match key {
            KeyCode::ArrowLeft | KeyCode::KeyA => { self.left = pressed; true }
            KeyCode::ArrowRight | KeyCode::KeyD => { self.right = pressed; true }
            KeyCode::ArrowUp | KeyCode::KeyW => { self.jump_pressed |= pressed; true }
            KeyCode::Enter | KeyCode::NumpadEnter | KeyCode::Space => { self.start_pressed |= pressed; true }
            KeyCode::KeyR => { self.restart_pressed |= pressed; true }
            KeyCode::KeyN => { self.advance_pressed |= pressed; true }
            KeyCode::Escape => { self.quit_pressed |= pressed; true }
            _ => false,
        }
    }

    /// Release every held key, e.g. when the window loses focus
    pub fn release_all(&mut self) {
        self.left = false;
        self.right = false;
    }

    /// Intents for the next tick, clearing latched presses
    pub fn consume_intents(&mut self) -> TickIntents {
        let intents = self.peek_intents();
        self.jump_pressed = false;
        self.restart_pressed = false;
        self.advance_pressed = false;
        self.start_pressed = false;
        self.quit_pressed = false;
        intents
    }

    /// Intents for the next tick without clearing anything
    pub fn peek_intents(&self) -> TickIntents {
        TickIntents {
            move_left: self.left,
            move_right: self.right,
            jump: self.jump_pressed,
            restart: self.restart_pressed,
            quit: self.quit_pressed,
            advance_level: self.advance_pressed,
            start: self.start_pressed,
        }
    }
}

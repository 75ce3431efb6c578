//! Window management system
//!
//! Handles window creation, fullscreen toggle, and title updates. Drawing is
//! left to an external renderer; the title bar carries the player status.

use std::sync::Arc;
use winit::{
    event_loop::ActiveEventLoop,
    window::{Fullscreen, Window},
};
use platformer_core::{FrameSnapshot, GamePhase};
use crate::config::WindowConfig;

/// Manages the application window
pub struct WindowSystem {
    window: Arc<Window>,
    base_title: String,
    last_title: String,
}

impl WindowSystem {
    /// Create window from config
    pub fn create(
        event_loop: &ActiveEventLoop,
        config: &WindowConfig,
    ) -> Result<Self, WindowError> {
        let mut attrs = Window::default_attributes()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                config.width,
                config.height,
            ));

        if config.fullscreen {
            attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|e| WindowError::CreationFailed(e.to_string()))?,
        );

        Ok(Self {
            window,
            base_title: config.title.clone(),
            last_title: config.title.clone(),
        })
    }

    /// Get window reference
    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    /// Toggle fullscreen mode
    pub fn toggle_fullscreen(&self) {
        let new_fullscreen = if self.window.fullscreen().is_some() {
            None
        } else {
            Some(Fullscreen::Borderless(None))
        };
        self.window.set_fullscreen(new_fullscreen);
    }

    /// Update window title with the phase and player status
    pub fn update_title(&mut self, snapshot: &FrameSnapshot) {
        let title = format_title(&self.base_title, snapshot);
        if title != self.last_title {
            self.window.set_title(&title);
            self.last_title = title;
        }
    }

    /// Request a redraw
    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}

/// Window title for a frame
pub fn format_title(base: &str, snapshot: &FrameSnapshot) -> String {
    let level = format!(
        "Level {} '{}'",
        snapshot.level_index + 1,
        snapshot.level_name.as_deref().unwrap_or("?")
    );
    let status = snapshot
        .player
        .map(|p| format!("Health {:.0}/{:.0} - {:.1}s", p.health, p.max_health, p.elapsed))
        .unwrap_or_default();

    match &snapshot.phase {
        GamePhase::Menu => format!("{} - Press Enter to start", base),
        GamePhase::Playing => format!("{} - {} - {}", base, level, status),
        GamePhase::Dead => format!("{} - {} - Dead [R to restart]", base, level),
        GamePhase::LevelComplete { .. } => format!(
            "{} - {} - {}",
            base,
            level,
            snapshot.narration().unwrap_or("Level complete")
        ),
        GamePhase::Victory { narration } => format!(
            "{} - Victory! {} [R for menu]",
            base,
            narration.as_deref().unwrap_or("")
        ),
    }
}

#[derive(Debug)]
pub enum WindowError {
    CreationFailed(String),
}

impl std::fmt::Display for WindowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowError::CreationFailed(msg) => write!(f, "Window creation failed: {}", msg),
        }
    }
}

impl std::error::Error for WindowError {}

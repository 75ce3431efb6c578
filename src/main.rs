//! Health Platformer
//!
//! A 2D platformer where the player collects healthy food, avoids junk and
//! hazards, and climbs to the end of each level.

use winit::{
    application::ApplicationHandler,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::WindowId,
};

use platformer::config::AppConfig;
use platformer::systems::{SimulationSystem, WindowSystem};
use platformer_core::{GameSession, LevelSet, TemplateNarrator};
use platformer_input::PlayerInput;

/// Main application state
struct App {
    /// Application configuration
    config: AppConfig,
    window: Option<WindowSystem>,
    session: GameSession,
    input: PlayerInput,
    simulation: SimulationSystem,
}

impl App {
    fn new(config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let levels = match &config.level.levels_path {
            Some(path) => LevelSet::load(path)?,
            None => LevelSet::builtin()?,
        };
        log::info!("Loaded {} levels", levels.len());

        let mut session = GameSession::new(config.to_game_settings(), levels)?;
        if config.narration.enabled {
            session = session.with_narrator(Box::new(TemplateNarrator));
        }

        let simulation = SimulationSystem::new(config.physics.timestep, config.physics.max_substeps);

        Ok(Self {
            config,
            window: None,
            session,
            input: PlayerInput::new(),
            simulation,
        })
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            match WindowSystem::create(event_loop, &self.config.window) {
                Ok(window) => self.window = Some(window),
                Err(e) => {
                    log::error!("{}", e);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Focused(false) => {
                self.input.release_all();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.repeat {
                    return;
                }
                if let PhysicalKey::Code(key) = event.physical_key {
                    if key == KeyCode::KeyF && event.state == ElementState::Pressed {
                        if let Some(window) = &self.window {
                            window.toggle_fullscreen();
                        }
                    } else {
                        self.input.process_keyboard(key, event.state);
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                let result = self.simulation.update(&mut self.session, &mut self.input);
                if result.quit {
                    event_loop.exit();
                    return;
                }

                let snapshot = self.session.snapshot();
                if let Some(window) = &mut self.window {
                    window.update_title(&snapshot);
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

fn main() {
    let config = AppConfig::load();
    let log_level = config
        .as_ref()
        .map(|c| c.debug.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = config.unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });

    let mut app = App::new(config).unwrap_or_else(|e| {
        panic!("Failed to start game: {}", e);
    });

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    event_loop.run_app(&mut app).expect("Event loop error");
}

//! Integration tests for the gameplay loop
//!
//! These drive a [`GameSession`] tick by tick the way the application does:
//! 1. Level loading derives spawn/end points and builds the world
//! 2. Movement, jumping and ground contact
//! 3. Hazards, consumables and the fall limit
//! 4. Phase transitions: complete, death, restart, victory

use platformer_core::{
    ConsumableKind, GameError, GamePhase, GameSession, GameSettings, HazardDef, LevelDefinition,
    LevelDefinitionError, LevelSet, Rect, TemplateNarrator, TickIntents, Vec2,
};

const IDLE: TickIntents = TickIntents {
    move_left: false,
    move_right: false,
    jump: false,
    restart: false,
    quit: false,
    advance_level: false,
    start: false,
};

fn builtin_session() -> GameSession {
    let levels = LevelSet::builtin().expect("built-in levels should parse");
    GameSession::new(GameSettings::default(), levels).expect("session should be created")
}

/// Wide floor on the left with the player spawning over (300, 700);
/// a small platform far to the right holds the end point.
fn arena(name: &str) -> LevelDefinition {
    LevelDefinition::new(name)
        .with_platform(Vec2::new(0.0, 800.0), Vec2::new(600.0, 800.0))
        .with_platform(Vec2::new(1000.0, 800.0), Vec2::new(1200.0, 800.0))
}

fn session_with(levels: Vec<LevelDefinition>) -> GameSession {
    GameSession::new(GameSettings::default(), LevelSet::new(levels)).expect("session should be created")
}

fn tick_n(session: &mut GameSession, intents: &TickIntents, n: usize) {
    for _ in 0..n {
        session.tick(intents).expect("tick should succeed");
    }
}

fn player_position(session: &GameSession) -> Vec2 {
    let player = session.player().expect("player should exist");
    player.position(session.world())
}

fn teleport_player(session: &mut GameSession, position: Vec2) {
    let key = session.player().expect("player should exist").body;
    let body = session.world_mut().get_body_mut(key).expect("player body should exist");
    body.position = position;
    body.velocity = Vec2::ZERO;
}

// ==================== Level Loading Tests ====================

#[test]
fn test_first_level_spawn_and_end_points() {
    let mut session = builtin_session();
    session.tick(&TickIntents { start: true, ..IDLE }).unwrap();

    assert_eq!(session.phase(), &GamePhase::Playing);
    let level = session.level().expect("level should be loaded");
    assert_eq!(level.name, "Stepping Stones");
    assert_eq!(level.spawn_point, Vec2::new(175.0, 700.0));
    assert_eq!(level.end_point, Vec2::new(1325.0, 380.0));
    assert_eq!(player_position(&session), Vec2::new(175.0, 700.0));
}

#[test]
fn test_player_lands_on_first_platform() {
    let mut session = builtin_session();
    session.start().unwrap();
    tick_n(&mut session, &IDLE, 60);

    let player = session.player().unwrap();
    assert!(player.on_ground(), "Player should be standing after a second");
    let position = player_position(&session);
    assert!((position.y - 765.0).abs() < 1.0, "Player should rest on the platform, y = {}", position.y);
    assert_eq!(session.phase(), &GamePhase::Playing);
}

#[test]
fn test_snapshot_after_start() {
    let mut session = builtin_session();
    session.start().unwrap();
    let snapshot = session.snapshot();

    assert_eq!(snapshot.level_name.as_deref(), Some("Stepping Stones"));
    let player = snapshot.player.expect("player snapshot");
    assert_eq!(player.position, Vec2::new(175.0, 700.0));
    assert_eq!(player.health, 10.0);
    assert_eq!(snapshot.camera.world_to_screen(player.position), Vec2::new(700.0, 450.0));
    assert_eq!(snapshot.shapes.len(), session.world().shape_count());
}

#[test]
fn test_invalid_level_keeps_menu() {
    let mut session = session_with(vec![LevelDefinition::new("empty")]);

    let result = session.tick(&TickIntents { start: true, ..IDLE });
    assert_eq!(
        result,
        Err(GameError::InvalidLevel {
            index: 0,
            error: LevelDefinitionError::NoPlatforms,
        })
    );
    assert_eq!(session.phase(), &GamePhase::Menu);
    assert_eq!(session.world().body_count(), 0);
}

#[test]
fn test_platform_outside_safe_area_keeps_menu() {
    let level = arena("clamped")
        .with_platform(Vec2::new(1500.0, 950.0), Vec2::new(1600.0, 980.0))
        .with_safe_area(Rect::new(Vec2::ZERO, Vec2::new(1400.0, 900.0)));
    let mut session = session_with(vec![level]);

    let result = session.tick(&TickIntents { start: true, ..IDLE });
    assert_eq!(
        result,
        Err(GameError::InvalidLevel {
            index: 0,
            error: LevelDefinitionError::DegeneratePlatform { index: 2 },
        })
    );
    assert_eq!(session.phase(), &GamePhase::Menu);
    assert_eq!(session.world().body_count(), 0);
}

#[test]
fn test_invalid_next_level_keeps_current_level() {
    let mut session = session_with(vec![arena("good"), LevelDefinition::new("empty")]);
    session.start().unwrap();
    let bodies = session.world().body_count();

    let result = session.tick(&TickIntents { advance_level: true, ..IDLE });
    assert!(matches!(result, Err(GameError::InvalidLevel { index: 1, .. })));
    assert_eq!(session.phase(), &GamePhase::Playing);
    assert_eq!(session.level_index(), 0);
    assert_eq!(session.world().body_count(), bodies);
}

#[test]
fn test_advance_level_wraps_builtin_set() {
    let mut session = builtin_session();
    session.start().unwrap();
    let count = session.level_count();

    for expected in 1..=count {
        session.tick(&TickIntents { advance_level: true, ..IDLE }).unwrap();
        assert_eq!(session.level_index(), expected % count);
    }
}

// ==================== Movement Tests ====================

#[test]
fn test_jump_in_air_is_ignored() {
    let mut session = session_with(vec![arena("air")]);
    session.start().unwrap();

    // Still falling toward the floor
    session.tick(&TickIntents { jump: true, ..IDLE }).unwrap();
    let player = session.player().unwrap();
    assert!(!player.on_ground());
    assert!(player.velocity(session.world()).y > 0.0);
}

#[test]
fn test_jump_from_ground() {
    let mut session = session_with(vec![arena("jump")]);
    session.start().unwrap();
    tick_n(&mut session, &IDLE, 60);
    assert!(session.player().unwrap().on_ground());

    session.tick(&TickIntents { jump: true, ..IDLE }).unwrap();
    let velocity = session.player().unwrap().velocity(session.world());
    assert!(velocity.y < -400.0, "Jump should launch upward, vy = {}", velocity.y);

    tick_n(&mut session, &IDLE, 10);
    assert!(!session.player().unwrap().on_ground());
}

#[test]
fn test_held_direction_moves_player() {
    let mut session = session_with(vec![arena("walk")]);
    session.start().unwrap();
    tick_n(&mut session, &IDLE, 60);
    let before = player_position(&session);

    tick_n(&mut session, &TickIntents { move_left: true, ..IDLE }, 30);
    assert!(player_position(&session).x < before.x - 50.0);
}

// ==================== Taxonomy Tests ====================

#[test]
fn test_hazard_kills_player() {
    let level = arena("spikes").with_hazard(HazardDef::new(Vec2::new(300.0, 795.0)));
    let mut session = session_with(vec![level]);
    session.start().unwrap();

    for _ in 0..120 {
        session.tick(&IDLE).unwrap();
        if session.phase() == &GamePhase::Dead {
            break;
        }
    }
    assert_eq!(session.phase(), &GamePhase::Dead);
    assert_eq!(session.player().unwrap().health(), 0.0);

    // Dead stays dead without a restart
    tick_n(&mut session, &TickIntents { move_right: true, jump: true, ..IDLE }, 10);
    assert_eq!(session.phase(), &GamePhase::Dead);
}

#[test]
fn test_restart_after_death_resets_player() {
    let level = arena("spikes").with_hazard(HazardDef::new(Vec2::new(300.0, 795.0)));
    let mut session = session_with(vec![level]);
    session.start().unwrap();
    for _ in 0..120 {
        session.tick(&IDLE).unwrap();
    }
    assert_eq!(session.phase(), &GamePhase::Dead);

    session.tick(&TickIntents { restart: true, ..IDLE }).unwrap();
    assert_eq!(session.phase(), &GamePhase::Playing);
    let player = session.player().unwrap();
    assert_eq!(player.health(), 10.0);
    assert_eq!(player.elapsed, 0.0);
    assert_eq!(player_position(&session), Vec2::new(300.0, 700.0));
}

#[test]
fn test_consumables_picked_up_once_each() {
    let level = arena("snacks")
        .with_consumable(Vec2::new(360.0, 765.0), ConsumableKind::Healthy)
        .with_consumable(Vec2::new(420.0, 765.0), ConsumableKind::Junk);
    let mut session = session_with(vec![level]);
    session.start().unwrap();
    tick_n(&mut session, &IDLE, 60);
    assert_eq!(session.level().unwrap().remaining_consumables(session.world()), 2);

    let right = TickIntents { move_right: true, ..IDLE };
    let mut ticks = 0;
    while session.level().unwrap().remaining_consumables(session.world()) == 2 && ticks < 120 {
        session.tick(&right).unwrap();
        ticks += 1;
    }
    assert_eq!(session.player().unwrap().health(), 15.0);

    while session.level().unwrap().remaining_consumables(session.world()) == 1 && ticks < 240 {
        session.tick(&right).unwrap();
        ticks += 1;
    }
    assert_eq!(session.level().unwrap().remaining_consumables(session.world()), 0);
    assert_eq!(session.player().unwrap().health(), 10.0);

    // Walking back over the spots changes nothing
    tick_n(&mut session, &TickIntents { move_left: true, ..IDLE }, 40);
    assert_eq!(session.player().unwrap().health(), 10.0);
}

#[test]
fn test_fall_limit_kills_player() {
    let mut settings = GameSettings::default();
    settings.level.fall_limit = 750.0;
    let mut session = GameSession::new(settings, LevelSet::new(vec![arena("pit")])).unwrap();
    session.start().unwrap();

    for _ in 0..60 {
        session.tick(&IDLE).unwrap();
    }
    assert_eq!(session.phase(), &GamePhase::Dead);
}

// ==================== Phase Transition Tests ====================

#[test]
fn test_reaching_end_completes_on_same_tick() {
    let mut session = session_with(vec![arena("one"), arena("two")]);
    session.start().unwrap();
    let end = session.level().unwrap().end_point;

    teleport_player(&mut session, end);
    session.tick(&IDLE).unwrap();

    match session.phase() {
        GamePhase::LevelComplete { narration, .. } => assert!(narration.is_none()),
        other => panic!("Expected LevelComplete, got {:?}", other),
    }
}

#[test]
fn test_level_complete_delay_loads_next_level() {
    let mut session = session_with(vec![arena("one"), arena("two")]);
    session.start().unwrap();
    let end = session.level().unwrap().end_point;
    teleport_player(&mut session, end);
    session.tick(&IDLE).unwrap();

    // Input is ignored while the delay runs
    tick_n(&mut session, &TickIntents { advance_level: true, restart: true, ..IDLE }, 119);
    assert!(matches!(session.phase(), GamePhase::LevelComplete { .. }));
    assert_eq!(session.level_index(), 0);

    for _ in 0..5 {
        session.tick(&IDLE).unwrap();
        if session.phase() == &GamePhase::Playing {
            break;
        }
    }
    assert_eq!(session.phase(), &GamePhase::Playing);
    assert_eq!(session.level_index(), 1);
    assert_eq!(session.level().unwrap().name, "two");
    assert_eq!(session.player().unwrap().health(), 10.0);
}

fn finish_level(session: &mut GameSession) {
    let end = session.level().unwrap().end_point;
    teleport_player(session, end);
    session.tick(&IDLE).unwrap();
    assert!(matches!(session.phase(), GamePhase::LevelComplete { .. }));
    for _ in 0..130 {
        session.tick(&IDLE).unwrap();
        if !matches!(session.phase(), GamePhase::LevelComplete { .. }) {
            break;
        }
    }
}

#[test]
fn test_health_carries_into_next_level() {
    let first = arena("one").with_consumable(Vec2::new(360.0, 765.0), ConsumableKind::Healthy);
    let second = arena("two").with_hazard(HazardDef::new(Vec2::new(300.0, 795.0)));
    let mut session = session_with(vec![first, second]);
    session.start().unwrap();
    tick_n(&mut session, &IDLE, 60);

    let right = TickIntents { move_right: true, ..IDLE };
    let mut ticks = 0;
    while session.level().unwrap().remaining_consumables(session.world()) == 1 && ticks < 120 {
        session.tick(&right).unwrap();
        ticks += 1;
    }
    assert_eq!(session.player().unwrap().health(), 15.0);

    finish_level(&mut session);
    assert_eq!(session.phase(), &GamePhase::Playing);
    assert_eq!(session.level_index(), 1);
    assert_eq!(session.player().unwrap().health(), 15.0);

    // Dying and restarting starts over from the initial health
    for _ in 0..120 {
        session.tick(&IDLE).unwrap();
        if session.phase() == &GamePhase::Dead {
            break;
        }
    }
    assert_eq!(session.phase(), &GamePhase::Dead);
    session.tick(&TickIntents { restart: true, ..IDLE }).unwrap();
    assert_eq!(session.level_index(), 1);
    assert_eq!(session.player().unwrap().health(), 10.0);
}

#[test]
fn test_skipping_a_level_keeps_health() {
    let first = arena("one").with_consumable(Vec2::new(360.0, 765.0), ConsumableKind::Junk);
    let mut session = session_with(vec![first, arena("two")]);
    session.start().unwrap();
    tick_n(&mut session, &IDLE, 60);

    let right = TickIntents { move_right: true, ..IDLE };
    let mut ticks = 0;
    while session.level().unwrap().remaining_consumables(session.world()) == 1 && ticks < 120 {
        session.tick(&right).unwrap();
        ticks += 1;
    }
    assert_eq!(session.player().unwrap().health(), 5.0);

    session.tick(&TickIntents { advance_level: true, ..IDLE }).unwrap();
    assert_eq!(session.level_index(), 1);
    assert_eq!(session.player().unwrap().health(), 5.0);
}

#[test]
fn test_new_run_after_victory_resets_health() {
    let last = arena("last").with_consumable(Vec2::new(360.0, 765.0), ConsumableKind::Healthy);
    let mut session = session_with(vec![last]);
    session.start().unwrap();
    tick_n(&mut session, &IDLE, 60);

    let right = TickIntents { move_right: true, ..IDLE };
    let mut ticks = 0;
    while session.level().unwrap().remaining_consumables(session.world()) == 1 && ticks < 120 {
        session.tick(&right).unwrap();
        ticks += 1;
    }
    assert_eq!(session.player().unwrap().health(), 15.0);

    finish_level(&mut session);
    assert!(matches!(session.phase(), GamePhase::Victory { .. }));
    session.tick(&TickIntents { restart: true, ..IDLE }).unwrap();
    session.tick(&TickIntents { start: true, ..IDLE }).unwrap();
    assert_eq!(session.phase(), &GamePhase::Playing);
    assert_eq!(session.player().unwrap().health(), 10.0);
}

#[test]
fn test_last_level_ends_in_victory() {
    let mut session = session_with(vec![arena("one"), arena("last")])
        .with_narrator(Box::new(TemplateNarrator));
    session.load_level(1).unwrap();
    let end = session.level().unwrap().end_point;
    teleport_player(&mut session, end);
    session.tick(&IDLE).unwrap();

    let narration = session.phase().narration().expect("narrator should be consulted").to_string();
    assert!(narration.contains("last"));

    for _ in 0..130 {
        session.tick(&IDLE).unwrap();
    }
    match session.phase() {
        GamePhase::Victory { narration: text } => assert_eq!(text.as_deref(), Some(narration.as_str())),
        other => panic!("Expected Victory, got {:?}", other),
    }
    assert!(session.player().is_none());
    assert_eq!(session.world().body_count(), 0);

    session.tick(&TickIntents { restart: true, ..IDLE }).unwrap();
    assert_eq!(session.phase(), &GamePhase::Menu);
    assert_eq!(session.level_index(), 0);
}

//! FSM scenario tests
//!
//! Headless App + ручной прогон FixedUpdate: каждый tick() — ровно один
//! simulation тик (реальные часы не участвуют, тайминги воспроизводимы).
//! Пороговые тики проверяем с зазором ±2 тика: накопление f32 таймеров
//! не обязано попадать в порог бит-в-бит.

use bevy::prelude::*;
use grimwatch_simulation::*;

/// Helper: App с полной симуляцией
fn create_test_app() -> App {
    let mut app = create_headless_app(7);
    app.add_plugins(SimulationPlugin);
    app
}

/// Helper: один simulation тик
fn tick(app: &mut App) {
    let timestep = app.world().resource::<Time<Fixed>>().timestep();
    app.world_mut()
        .resource_mut::<Time<Fixed>>()
        .advance_by(timestep);
    app.world_mut().run_schedule(FixedUpdate);
}

fn tick_n(app: &mut App, n: usize) {
    for _ in 0..n {
        tick(app);
    }
}

fn state_of(app: &App, agent: Entity) -> AgentState {
    app.world().get::<AgentState>(agent).unwrap().clone()
}

fn velocity_of(app: &App, agent: Entity) -> Vec2 {
    app.world().get::<Velocity>(agent).unwrap().0
}

/// Всего событий E с начала теста (event cleanup не гоняется — буфер копит всё)
fn event_count<E: Event>(app: &App) -> usize {
    app.world().resource::<Events<E>>().len()
}

fn spawn_target(app: &mut App, x: f32, y: f32) -> Entity {
    app.world_mut()
        .spawn((Transform::from_xyz(x, y, 0.0), Targetable::default()))
        .id()
}

/// Конфиг для «чистых» сценариев: патруль выключен, агент стоит на месте
fn stationary_config() -> AgentConfig {
    AgentConfig {
        patrol_enabled: false,
        ..AgentConfig::default()
    }
}

// --- Сценарии обнаружения ---

#[test]
fn detects_target_in_front() {
    let mut app = create_test_app();
    let agent = spawn_agent(app.world_mut(), Vec2::ZERO, stationary_config());
    let target = spawn_target(&mut app, 300.0, 0.0);

    // Одна evaluation — и мы в Detect
    tick(&mut app);
    let state = state_of(&app, agent);
    assert!(
        matches!(state, AgentState::Detect { .. }),
        "expected Detect, got {:?}",
        state
    );
    assert_eq!(state.target(), Some(target));
    assert_eq!(event_count::<TargetDetected>(&app), 1);

    // Остаёмся в Detect — событие не дублируется
    tick_n(&mut app, 5);
    assert_eq!(event_count::<TargetDetected>(&app), 1);
}

#[test]
fn cone_excludes_target_behind() {
    let mut app = create_test_app();
    let agent = spawn_agent(
        app.world_mut(),
        Vec2::ZERO,
        AgentConfig {
            detection_angle: 90.0,
            ..stationary_config()
        },
    );
    spawn_target(&mut app, -300.0, 0.0); // за спиной (facing по умолчанию +1)

    tick_n(&mut app, 120);
    assert!(matches!(state_of(&app, agent), AgentState::Patrol));
    assert_eq!(event_count::<TargetDetected>(&app), 0);
}

#[test]
fn detection_delay_gates_chase() {
    let mut app = create_test_app();
    let agent = spawn_agent(app.world_mut(), Vec2::ZERO, stationary_config());
    let target = spawn_target(&mut app, 300.0, 0.0);

    tick(&mut app); // Patrol → Detect
    assert!(matches!(state_of(&app, agent), AgentState::Detect { .. }));

    // 0.3s при 60Hz = 18 тиков; на 15 ещё рано
    tick_n(&mut app, 15);
    assert!(matches!(state_of(&app, agent), AgentState::Detect { .. }));

    // К 20-му delay точно накоплен
    tick_n(&mut app, 5);
    assert_eq!(
        state_of(&app, agent),
        AgentState::Chase { target },
        "detection_delay must promote Detect → Chase"
    );
}

#[test]
fn target_exactly_at_attack_range_counts_as_in_range() {
    let mut app = create_test_app();
    let agent = spawn_agent(app.world_mut(), Vec2::ZERO, stationary_config());
    spawn_target(&mut app, 50.0, 0.0); // ровно attack_range

    tick(&mut app); // Patrol → Detect (в Attack из Patrol напрямую не ходим)
    assert!(matches!(state_of(&app, agent), AgentState::Detect { .. }));

    tick(&mut app); // Detect → Attack по range check
    assert!(matches!(state_of(&app, agent), AgentState::Attack { .. }));
}

// --- Attack cooldown ---

#[test]
fn attack_cooldown_fires_once_per_period() {
    let mut app = create_test_app();
    let agent = spawn_agent(app.world_mut(), Vec2::ZERO, stationary_config());
    let target = spawn_target(&mut app, 30.0, 0.0);

    tick_n(&mut app, 2); // Patrol → Detect → Attack
    assert!(matches!(state_of(&app, agent), AgentState::Attack { .. }));

    // 1.5s cooldown = 90 тиков residency; на 85 ещё тишина
    tick_n(&mut app, 85);
    assert_eq!(event_count::<AttackReady>(&app), 0);

    // Первый AttackReady в окне 90±2
    tick_n(&mut app, 7);
    assert_eq!(event_count::<AttackReady>(&app), 1);

    // Таймер сброшен в 0 — второй выстрел не раньше следующих 1.5s
    if let AgentState::Attack { timer, .. } = state_of(&app, agent) {
        assert!(timer < 0.15, "attack timer must reset after AttackReady");
    } else {
        panic!("agent must stay in Attack");
    }

    tick_n(&mut app, 80);
    assert_eq!(event_count::<AttackReady>(&app), 1);
    tick_n(&mut app, 12);
    assert_eq!(event_count::<AttackReady>(&app), 2);

    // Цель всё ещё та же
    assert_eq!(state_of(&app, agent).target(), Some(target));
}

#[test]
fn attack_exits_to_chase_when_target_leaves_range() {
    let mut app = create_test_app();
    let agent = spawn_agent(app.world_mut(), Vec2::ZERO, stationary_config());
    let target = spawn_target(&mut app, 30.0, 0.0);

    tick_n(&mut app, 2);
    assert!(matches!(state_of(&app, agent), AgentState::Attack { .. }));

    // Цель отпрыгнула за attack_range, но осталась видимой
    app.world_mut()
        .get_mut::<Transform>(target)
        .unwrap()
        .translation
        .x = 200.0;

    tick(&mut app);
    assert_eq!(state_of(&app, agent), AgentState::Chase { target });
    assert_eq!(event_count::<TargetLost>(&app), 0);
}

// --- Stun ---

#[test]
fn stun_preempts_attack_and_exits_to_patrol() {
    let mut app = create_test_app();
    let agent = spawn_agent(app.world_mut(), Vec2::ZERO, stationary_config());
    spawn_target(&mut app, 30.0, 0.0);

    tick_n(&mut app, 10);
    assert!(matches!(state_of(&app, agent), AgentState::Attack { .. }));

    app.world_mut().send_event(AgentCommand::Stun { agent });
    tick(&mut app);

    assert!(matches!(state_of(&app, agent), AgentState::Stunned { .. }));
    assert_eq!(velocity_of(&app, agent), Vec2::ZERO);
    assert_eq!(event_count::<AgentStunned>(&app), 1);
    // Диагностика: пришли из Attack
    assert!(matches!(
        app.world().get::<PreviousState>(agent).unwrap().0,
        AgentState::Attack { .. }
    ));

    // 2.0s = 120 тиков; на 115 ещё в стане
    tick_n(&mut app, 114);
    assert!(matches!(state_of(&app, agent), AgentState::Stunned { .. }));
    assert_eq!(velocity_of(&app, agent), Vec2::ZERO);

    // Первый выход из стана — строго в Patrol (не в Chase, хотя цель видна)
    let mut exit_state = None;
    for _ in 0..8 {
        tick(&mut app);
        let state = state_of(&app, agent);
        if !matches!(state, AgentState::Stunned { .. }) {
            exit_state = Some(state);
            break;
        }
    }
    assert_eq!(exit_state, Some(AgentState::Patrol));

    // А уже следующим тиком цель замечается заново — через Detect
    tick(&mut app);
    assert!(matches!(state_of(&app, agent), AgentState::Detect { .. }));
}

#[test]
fn stun_is_noop_when_not_stunnable() {
    let mut app = create_test_app();
    let agent = spawn_agent(
        app.world_mut(),
        Vec2::ZERO,
        AgentConfig {
            can_be_stunned: false,
            ..stationary_config()
        },
    );
    spawn_target(&mut app, 30.0, 0.0);

    tick_n(&mut app, 10);
    let before = state_of(&app, agent);
    assert!(matches!(before, AgentState::Attack { .. }));
    let velocity_before = velocity_of(&app, agent);

    app.world_mut().send_event(AgentCommand::Stun { agent });
    tick(&mut app);

    assert!(matches!(state_of(&app, agent), AgentState::Attack { .. }));
    assert_eq!(velocity_of(&app, agent), velocity_before);
    assert_eq!(event_count::<AgentStunned>(&app), 0);
}

#[test]
fn stun_is_noop_on_dead_agent() {
    let mut app = create_test_app();
    let agent = spawn_agent(app.world_mut(), Vec2::ZERO, stationary_config());

    app.world_mut().send_event(AgentCommand::Kill { agent });
    tick(&mut app);
    assert!(state_of(&app, agent).is_dead());

    app.world_mut().send_event(AgentCommand::Stun { agent });
    tick(&mut app);
    assert!(state_of(&app, agent).is_dead());
    assert_eq!(event_count::<AgentStunned>(&app), 0);
}

// --- Death ---

#[test]
fn kill_is_idempotent_single_died_event() {
    let mut app = create_test_app();
    let agent = spawn_agent(app.world_mut(), Vec2::ZERO, stationary_config());
    spawn_target(&mut app, 300.0, 0.0);

    app.world_mut().send_event(AgentCommand::Kill { agent });
    app.world_mut().send_event(AgentCommand::Kill { agent });
    tick(&mut app);

    assert!(state_of(&app, agent).is_dead());
    assert_eq!(event_count::<AgentDied>(&app), 1);

    app.world_mut().send_event(AgentCommand::Kill { agent });
    tick(&mut app);
    assert_eq!(event_count::<AgentDied>(&app), 1);
}

#[test]
fn death_is_terminal_and_velocity_stays_zero() {
    let mut app = create_test_app();
    // Патруль включён: перед смертью агент реально движется
    let agent = spawn_agent(app.world_mut(), Vec2::ZERO, AgentConfig::default());

    tick_n(&mut app, 30);
    assert!(velocity_of(&app, agent).length() > 0.0, "agent should be walking");

    app.world_mut().send_event(AgentCommand::Kill { agent });
    tick(&mut app);

    // Цель рядом не спасает: Dead терминален
    spawn_target(&mut app, 40.0, 0.0);
    for _ in 0..120 {
        tick(&mut app);
        assert!(state_of(&app, agent).is_dead());
        assert_eq!(velocity_of(&app, agent), Vec2::ZERO);
    }
    assert_eq!(event_count::<TargetDetected>(&app), 0);
}

// --- Потеря цели / round trip ---

#[test]
fn round_trip_lost_target_redetects_through_detect() {
    let mut app = create_test_app();
    let agent = spawn_agent(app.world_mut(), Vec2::ZERO, stationary_config());
    let target = spawn_target(&mut app, 300.0, 0.0);

    tick_n(&mut app, 25); // Detect → Chase
    assert_eq!(state_of(&app, agent), AgentState::Chase { target });

    // Цель телепортировалась за detection_range
    app.world_mut()
        .get_mut::<Transform>(target)
        .unwrap()
        .translation
        .x = 5000.0;
    tick(&mut app);
    assert_eq!(state_of(&app, agent), AgentState::Patrol);
    assert_eq!(event_count::<TargetLost>(&app), 1);

    // Вернулась в поле зрения: снова Detect, не сразу Chase
    let agent_x = app.world().get::<Transform>(agent).unwrap().translation.x;
    app.world_mut()
        .get_mut::<Transform>(target)
        .unwrap()
        .translation
        .x = agent_x + 200.0;
    tick(&mut app);
    assert!(matches!(state_of(&app, agent), AgentState::Detect { .. }));
    assert_eq!(event_count::<TargetDetected>(&app), 2);

    // detection_delay отрабатывается заново
    tick_n(&mut app, 10);
    assert!(matches!(state_of(&app, agent), AgentState::Detect { .. }));
    tick_n(&mut app, 10);
    assert_eq!(state_of(&app, agent), AgentState::Chase { target });
}

#[test]
fn despawned_target_is_treated_as_lost() {
    let mut app = create_test_app();
    let agent = spawn_agent(app.world_mut(), Vec2::ZERO, stationary_config());
    let target = spawn_target(&mut app, 300.0, 0.0);

    tick_n(&mut app, 25);
    assert_eq!(state_of(&app, agent), AgentState::Chase { target });

    app.world_mut().despawn(target);
    tick(&mut app);

    assert_eq!(state_of(&app, agent), AgentState::Patrol);
    assert_eq!(event_count::<TargetLost>(&app), 1);
    assert_eq!(state_of(&app, agent).target(), None);
}

#[test]
fn wall_blocks_detection_until_removed() {
    let mut app = create_test_app();
    app.insert_resource(SightBlockers(Box::new(StaticObstacles {
        segments: vec![(Vec2::new(150.0, -50.0), Vec2::new(150.0, 50.0))],
    })));

    let agent = spawn_agent(app.world_mut(), Vec2::ZERO, stationary_config());
    spawn_target(&mut app, 300.0, 0.0);

    tick_n(&mut app, 60);
    assert!(matches!(state_of(&app, agent), AgentState::Patrol));
    assert_eq!(event_count::<TargetDetected>(&app), 0);

    // Стену убрали — цель видна
    app.insert_resource(SightBlockers(Box::new(NoObstructions)));
    tick(&mut app);
    assert!(matches!(state_of(&app, agent), AgentState::Detect { .. }));
}

// --- Инварианты ---

#[test]
fn target_present_iff_detect_chase_attack() {
    let mut app = create_test_app();
    let agent = spawn_agent(app.world_mut(), Vec2::ZERO, stationary_config());

    assert_eq!(state_of(&app, agent).target(), None); // Patrol

    let target = spawn_target(&mut app, 300.0, 0.0);
    tick(&mut app);
    assert_eq!(state_of(&app, agent).target(), Some(target)); // Detect

    tick_n(&mut app, 25);
    assert_eq!(state_of(&app, agent).target(), Some(target)); // Chase

    app.world_mut().send_event(AgentCommand::Stun { agent });
    tick(&mut app);
    assert_eq!(state_of(&app, agent).target(), None); // Stunned

    app.world_mut().send_event(AgentCommand::Kill { agent });
    tick(&mut app);
    assert_eq!(state_of(&app, agent).target(), None); // Dead
}

// --- Деградация при нулевых конфигах ---

#[test]
fn zero_detection_range_never_leaves_patrol() {
    let mut app = create_test_app();
    let agent = spawn_agent(
        app.world_mut(),
        Vec2::ZERO,
        AgentConfig {
            detection_range: 0.0,
            ..stationary_config()
        },
    );
    spawn_target(&mut app, 10.0, 0.0);

    tick_n(&mut app, 120);
    assert!(matches!(state_of(&app, agent), AgentState::Patrol));
    assert_eq!(event_count::<TargetDetected>(&app), 0);
}

#[test]
fn zero_patrol_distance_stands_at_origin() {
    let mut app = create_test_app();
    let agent = spawn_agent(
        app.world_mut(),
        Vec2::ZERO,
        AgentConfig {
            patrol_distance: 0.0,
            ..AgentConfig::default()
        },
    );

    tick_n(&mut app, 300);
    let transform = app.world().get::<Transform>(agent).unwrap();
    assert!(
        transform.translation.x.abs() <= 5.0,
        "agent drifted to x={}",
        transform.translation.x
    );
    assert!(matches!(state_of(&app, agent), AgentState::Patrol));
}

// --- Patrol controller ---

#[test]
fn patrol_walks_segment_and_turns_around() {
    let mut app = create_test_app();
    let agent = spawn_agent(app.world_mut(), Vec2::ZERO, AgentConfig::default());

    let mut max_x: f32 = 0.0;
    let mut min_x: f32 = 0.0;
    let mut saw_left = false;
    let mut saw_right = false;

    for _ in 0..900 {
        tick(&mut app);
        let x = app.world().get::<Transform>(agent).unwrap().translation.x;
        max_x = max_x.max(x);
        min_x = min_x.min(x);
        match app.world().get::<Facing>(agent).unwrap().0 {
            f if f > 0.0 => saw_right = true,
            _ => saw_left = true,
        }
    }

    // Сегмент 200 вокруг нуля: края ±100 (+ небольшой перелёт на торможении)
    assert!(max_x > 80.0, "never reached right waypoint, max_x={}", max_x);
    assert!(max_x < 115.0, "overshot right waypoint, max_x={}", max_x);
    assert!(min_x < -80.0, "never reached left waypoint, min_x={}", min_x);
    assert!(min_x > -115.0, "overshot left waypoint, min_x={}", min_x);
    assert!(saw_left && saw_right, "facing must flip on turnaround");
}

#[test]
fn configure_patrol_rebinds_segment() {
    let mut app = create_test_app();
    let agent = spawn_agent(app.world_mut(), Vec2::ZERO, AgentConfig::default());

    tick_n(&mut app, 10);
    app.world_mut().send_event(AgentCommand::ConfigurePatrol {
        agent,
        origin: Vec2::new(500.0, 0.0),
        distance: 100.0,
    });
    tick(&mut app);

    let patrol = app.world().get::<PatrolState>(agent).unwrap();
    assert_eq!(patrol.origin, Some(Vec2::new(500.0, 0.0)));
    let config = app.world().get::<AgentConfig>(agent).unwrap();
    assert_eq!(config.patrol_distance, 100.0);

    // Агент идёт к новому сегменту (вправо)
    tick_n(&mut app, 30);
    assert!(velocity_of(&app, agent).x > 0.0);
}

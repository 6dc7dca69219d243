//! Headless прогон GRIMWATCH ядра
//!
//! Маленькая сцена: два врага, цель, стена. Фиксированный шаг гоним вручную
//! (реальные часы не нужны, важна воспроизводимость вывода).

use bevy::prelude::*;
use grimwatch_simulation::{
    create_headless_app, spawn_agent, AgentConfig, AgentState, SightBlockers, SimulationPlugin,
    StaticObstacles, Targetable,
};

fn main() {
    let seed = 42;
    println!("Starting GRIMWATCH headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);

    // Стена между правым врагом и целью
    app.insert_resource(SightBlockers(Box::new(StaticObstacles {
        segments: vec![(Vec2::new(250.0, 0.0), Vec2::new(250.0, 120.0))],
    })));

    let left_guard = spawn_agent(app.world_mut(), Vec2::new(-150.0, 0.0), AgentConfig::default());
    let right_guard = spawn_agent(
        app.world_mut(),
        Vec2::new(400.0, 0.0),
        AgentConfig {
            patrol_randomize: true,
            ..default()
        },
    );

    // Цель (в терминах игры — игрок)
    app.world_mut().spawn((
        Transform::from_xyz(120.0, 0.0, 0.0),
        Targetable::default(),
    ));

    let timestep = app.world().resource::<Time<Fixed>>().timestep();
    for tick in 0..600 {
        app.world_mut()
            .resource_mut::<Time<Fixed>>()
            .advance_by(timestep);
        app.world_mut().run_schedule(FixedUpdate);

        if tick % 100 == 0 {
            let left = state_name(&app, left_guard);
            let right = state_name(&app, right_guard);
            println!("Tick {}: left={} right={}", tick, left, right);
        }
    }

    println!("Simulation complete!");
}

fn state_name(app: &App, agent: Entity) -> &'static str {
    app.world()
        .get::<AgentState>(agent)
        .map(AgentState::name)
        .unwrap_or("?")
}

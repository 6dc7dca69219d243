//! Patrol controller: waypoint seek + разворот + пауза на концах сегмента
//!
//! Работает только для агентов в Patrol. Сегмент одномерный (горизонталь),
//! вертикаль целиком на gravity/physics.

use bevy::prelude::*;
use rand::Rng;

use crate::ai::{AgentConfig, AgentState, PatrolState};
use crate::components::{Agent, Facing, Velocity};
use crate::physics::movement::{decelerate, seek};
use crate::DeterministicRng;

/// Насколько близко к waypoint'у считается «дошёл»
pub const PATROL_POINT_TOLERANCE: f32 = 5.0;

/// Система: patrol behavior
pub fn patrol_behavior(
    mut agents: Query<
        (
            &Transform,
            &AgentState,
            &AgentConfig,
            &mut PatrolState,
            &mut Facing,
            &mut Velocity,
        ),
        With<Agent>,
    >,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (transform, state, config, mut patrol, mut facing, mut velocity) in agents.iter_mut() {
        if !matches!(state, AgentState::Patrol) {
            continue;
        }

        let position = transform.translation.truncate();
        // Origin захватывается из spawn позиции на первом патрульном тике
        let origin = *patrol.origin.get_or_insert(position);

        if !config.patrol_enabled {
            decelerate(&mut velocity.0, config.deceleration, delta);
            continue;
        }

        // Пауза на конце сегмента
        if patrol.wait_timer > 0.0 {
            patrol.wait_timer = (patrol.wait_timer - delta).max(0.0);
            decelerate(&mut velocity.0, config.deceleration, delta);
            continue;
        }

        // patrol_distance == 0 схлопывает сегмент в точку: waypoint == origin,
        // агент стоит у origin и крутит wait_timer
        let waypoint_x = origin.x + patrol.direction * config.patrol_distance * 0.5;

        if (position.x - waypoint_x).abs() <= PATROL_POINT_TOLERANCE {
            patrol.direction = if config.patrol_randomize {
                if rng.rng.gen_bool(0.5) {
                    1.0
                } else {
                    -1.0
                }
            } else {
                -patrol.direction
            };
            patrol.wait_timer = config.patrol_wait_time;
            decelerate(&mut velocity.0, config.deceleration, delta);
        } else {
            let direction = (waypoint_x - position.x).signum();
            seek(
                &mut velocity.0,
                direction,
                config.patrol_speed,
                config.acceleration,
                delta,
            );
            facing.0 = direction;
        }
    }
}

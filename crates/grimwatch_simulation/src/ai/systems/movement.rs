//! AI movement: state → movement driver
//!
//! Выполняется после FSM transitions того же тика, поэтому движение никогда
//! не считается по устаревшей цели. Patrol обслуживается patrol_behavior.

use bevy::prelude::*;

use crate::ai::{AgentConfig, AgentState};
use crate::components::{Agent, Facing, Velocity};
use crate::physics::movement::{decelerate, seek};

/// Дистанция по X, ближе которой преследование не дёргает направление
const CHASE_SLACK: f32 = 1.0;

/// Система: movement driver от FSM state
pub fn ai_movement_from_state(
    mut agents: Query<
        (
            &Transform,
            &AgentState,
            &AgentConfig,
            &mut Facing,
            &mut Velocity,
        ),
        With<Agent>,
    >,
    targets: Query<&Transform>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (transform, state, config, mut facing, mut velocity) in agents.iter_mut() {
        match state {
            // Patrol двигает patrol_behavior
            AgentState::Patrol => {}

            AgentState::Chase { target } => {
                let Ok(target_transform) = targets.get(*target) else {
                    decelerate(&mut velocity.0, config.deceleration, delta);
                    continue;
                };
                let dx = target_transform.translation.x - transform.translation.x;
                if dx.abs() <= CHASE_SLACK {
                    decelerate(&mut velocity.0, config.deceleration, delta);
                } else {
                    let direction = dx.signum();
                    seek(
                        &mut velocity.0,
                        direction,
                        config.chase_speed,
                        config.acceleration,
                        delta,
                    );
                    facing.0 = direction;
                }
            }

            // Стоим и смотрим / стоим и бьём / оглушены — плавное торможение
            AgentState::Detect { .. } | AgentState::Attack { .. } | AgentState::Stunned { .. } => {
                decelerate(&mut velocity.0, config.deceleration, delta);
            }

            // Инвариант Dead: velocity == 0 на всех тиках после смерти
            AgentState::Dead => {
                velocity.0 = Vec2::ZERO;
            }
        }
    }
}

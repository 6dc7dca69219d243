//! Обработка внешних команд (stun, kill, configure patrol)
//!
//! Выполняется в SimSet::Commands — до FSM, поэтому команда видна
//! transition-логике того же тика. Полный pre-empt: mid-cooldown атака
//! не «дорабатывается», состояние просто сбрасывается.

use bevy::prelude::*;

use crate::ai::systems::fsm::transition_to;
use crate::ai::{AgentCommand, AgentConfig, AgentDied, AgentState, AgentStunned, PatrolState, PreviousState};
use crate::components::{Agent, Velocity};
use crate::logger;

/// Система: применение AgentCommand очереди
pub fn process_agent_commands(
    mut command_events: EventReader<AgentCommand>,
    mut agents: Query<
        (
            &mut AgentState,
            &mut PreviousState,
            &mut AgentConfig,
            &mut PatrolState,
            &mut Velocity,
        ),
        With<Agent>,
    >,
    mut stunned_events: EventWriter<AgentStunned>,
    mut died_events: EventWriter<AgentDied>,
) {
    for command in command_events.read() {
        match *command {
            AgentCommand::Stun { agent } => {
                let Ok((mut state, mut previous, config, _, mut velocity)) = agents.get_mut(agent)
                else {
                    continue;
                };
                // No-op для нестанящихся и мёртвых
                if !config.can_be_stunned || state.is_dead() {
                    continue;
                }
                velocity.0 = Vec2::ZERO;
                if transition_to(
                    agent,
                    &mut state,
                    &mut previous,
                    AgentState::Stunned {
                        timer: config.stun_duration,
                    },
                ) {
                    stunned_events.write(AgentStunned { agent });
                }
            }

            AgentCommand::Kill { agent } => {
                let Ok((mut state, mut previous, _, _, mut velocity)) = agents.get_mut(agent)
                else {
                    continue;
                };
                velocity.0 = Vec2::ZERO;
                // Идемпотентно: повторный Kill по мёртвому не даёт второго Died
                if transition_to(agent, &mut state, &mut previous, AgentState::Dead) {
                    died_events.write(AgentDied { agent });
                }
            }

            AgentCommand::ConfigurePatrol {
                agent,
                origin,
                distance,
            } => {
                let Ok((_, _, mut config, mut patrol, _)) = agents.get_mut(agent) else {
                    continue;
                };
                config.patrol_distance = distance;
                patrol.origin = Some(origin);
                patrol.wait_timer = 0.0;
                logger::log(&format!(
                    "AI: {:?} patrol segment rebound to {:?} (len {})",
                    agent, origin, distance
                ));
            }
        }
    }
}

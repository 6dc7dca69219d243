//! AI decision-making module
//!
//! FSM врага + vision oracle + patrol controller + movement driver glue.
//! Всё в FixedUpdate, последовательно — один writer на state/velocity.

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod systems;
pub mod vision;

// Re-export основных типов
pub use components::{AgentConfig, AgentState, PatrolState, PreviousState};
pub use events::{
    AgentCommand, AgentDied, AgentStunned, AttackReady, TargetDetected, TargetLost,
};

use crate::SimSet;

/// AI Plugin
///
/// Порядок выполнения за тик:
/// 1. process_agent_commands — stun/kill/configure_patrol (SimSet::Commands)
/// 2. ai_fsm_transitions — vision + FSM state (SimSet::Ai)
/// 3. patrol_behavior, ai_movement_from_state — commit velocity (SimSet::Steering)
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AgentCommand>()
            .add_event::<TargetDetected>()
            .add_event::<TargetLost>()
            .add_event::<AttackReady>()
            .add_event::<AgentStunned>()
            .add_event::<AgentDied>()
            .init_resource::<vision::SightBlockers>()
            .add_systems(
                FixedUpdate,
                systems::process_agent_commands.in_set(SimSet::Commands),
            )
            .add_systems(
                FixedUpdate,
                systems::ai_fsm_transitions.in_set(SimSet::Ai),
            )
            .add_systems(
                FixedUpdate,
                (systems::patrol_behavior, systems::ai_movement_from_state)
                    .chain()
                    .in_set(SimSet::Steering),
            );
    }
}

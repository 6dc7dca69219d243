//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - agent: враг и его ориентация (Agent, Targetable, Facing)
//! - movement: скорость и kinematic stub (Velocity, KinematicBody)
//!
//! FSM-компоненты (AgentState, AgentConfig, PatrolState) живут в ai::components.

pub mod agent;
pub mod movement;

// Re-exports для удобного импорта
pub use agent::*;
pub use movement::*;

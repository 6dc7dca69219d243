//! AI systems (strategic layer logic)

pub mod commands;
pub mod fsm;
pub mod movement;
pub mod patrol;

// Re-export all systems
pub use commands::*;
pub use fsm::*;
pub use movement::*;
pub use patrol::*;

//! Physics stub module
//!
//! Headless замена внешнему 2D движку: movement driver (линейный
//! move_toward по горизонтали) + gravity + ground check по плоскости пола +
//! интеграция velocity → Transform. Host с настоящей физикой не добавляет
//! KinematicPlugin и интегрирует Velocity сам.

pub mod movement;

// Re-export основных типов
pub use movement::{
    apply_gravity, decelerate, ground_detection, integrate_velocity, move_toward, seek,
    KinematicPlugin, FLOOR_Y,
};

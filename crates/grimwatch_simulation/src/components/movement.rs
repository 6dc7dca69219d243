//! Movement компоненты: velocity и kinematic stub

use bevy::prelude::*;

/// Текущая скорость entity (units/sec, 2D)
///
/// Единственный writer — fixed-tick цепочка (movement driver, затем
/// kinematic stub). Внешний код читает для анимации/эффектов.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Velocity(pub Vec2);

/// Kinematic body для headless интеграции
///
/// Заменяет полноценный физический движок в headless прогонах:
/// gravity + ground check по плоскости пола. Host engine с настоящей
/// физикой просто не добавляет KinematicPlugin.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct KinematicBody {
    /// Ускорение гравитации (units/sec², отрицательное — вниз)
    pub gravity: f32,
    /// На земле ли entity (обновляется ground_detection)
    pub grounded: bool,
}

impl Default for KinematicBody {
    fn default() -> Self {
        Self {
            gravity: -980.0, // пиксельная шкала: ~100 px = 1 m
            grounded: false,
        }
    }
}

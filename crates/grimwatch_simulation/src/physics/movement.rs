//! Movement driver + kinematic stub
//!
//! Driver: линейное приближение горизонтальной скорости к желаемой,
//! шаг ограничен accel * dt — frame-rate independent по построению.
//! Stub: gravity, ground check и интеграция для headless прогонов.

use bevy::prelude::*;

use crate::ai::AgentState;
use crate::components::{KinematicBody, Velocity};
use crate::SimSet;

/// Уровень пола в headless мире
pub const FLOOR_Y: f32 = 0.0;

/// Зазор ground check'а (numerical slack)
const GROUND_EPSILON: f32 = 0.05;

/// Линейный шаг к целевому значению, ограниченный max_delta
pub fn move_toward(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}

/// Разгон горизонтальной скорости к direction * speed
pub fn seek(velocity: &mut Vec2, direction: f32, speed: f32, accel: f32, delta: f32) {
    velocity.x = move_toward(velocity.x, direction * speed, accel * delta);
}

/// Торможение горизонтальной скорости к нулю (seek с desired speed 0)
pub fn decelerate(velocity: &mut Vec2, decel: f32, delta: f32) {
    velocity.x = move_toward(velocity.x, 0.0, decel * delta);
}

/// Kinematic stub plugin (headless интеграция)
pub struct KinematicPlugin;

impl Plugin for KinematicPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (ground_detection, apply_gravity, integrate_velocity)
                .chain()
                .in_set(SimSet::Physics),
        );
    }
}

/// Система: ground check по плоскости пола
pub fn ground_detection(mut query: Query<(&Transform, &mut KinematicBody)>) {
    for (transform, mut body) in query.iter_mut() {
        body.grounded = transform.translation.y <= FLOOR_Y + GROUND_EPSILON;
    }
}

/// Система: gravity к вертикальной скорости
///
/// Мёртвых пропускаем: инвариант Dead требует velocity == 0,
/// труп не должен «копить» падение.
pub fn apply_gravity(
    mut query: Query<(&KinematicBody, &mut Velocity, Option<&AgentState>)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (body, mut velocity, state) in query.iter_mut() {
        if state.is_some_and(AgentState::is_dead) {
            continue;
        }
        if !body.grounded {
            velocity.0.y += body.gravity * delta;
        }
    }
}

/// Система: интеграция velocity → Transform с clamp'ом на пол
pub fn integrate_velocity(
    mut query: Query<(&mut Transform, &mut Velocity), With<KinematicBody>>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut transform, mut velocity) in query.iter_mut() {
        transform.translation.x += velocity.0.x * delta;
        transform.translation.y += velocity.0.y * delta;

        if transform.translation.y < FLOOR_Y {
            transform.translation.y = FLOOR_Y;
            velocity.0.y = 0.0;
        }
    }
}

//! Базовые компоненты врага: Agent, Targetable, Facing

use bevy::prelude::*;

/// Враг под управлением FSM ядра
///
/// Автоматически добавляет FSM state, конфиг, patrol state, velocity и
/// kinematic body через Required Components. Всё с Default'ами, поэтому
/// достаточно `spawn((Transform::..., Agent, config))`.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
#[require(
    Transform,
    crate::components::Velocity,
    crate::components::KinematicBody,
    crate::components::Facing,
    crate::ai::AgentState,
    crate::ai::PreviousState,
    crate::ai::AgentConfig,
    crate::ai::PatrolState
)]
pub struct Agent;

/// Кандидат в цели (игрок, союзник игрока, приманка)
///
/// Ядро не владеет lifetime'ом цели: despawn entity (или снятие компонента)
/// для FSM неотличим от потери line of sight.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Targetable {
    /// Группа цели, сверяется с `AgentConfig::target_group`
    pub group: u64,
}

impl Default for Targetable {
    fn default() -> Self {
        Self { group: 1 }
    }
}

/// Горизонтальная ориентация врага: -1 (влево) или +1 (вправо)
///
/// Обновляется из последнего ненулевого направления движения в Patrol/Chase.
/// Никогда не двигавшийся агент смотрит вправо.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Facing(pub f32);

impl Default for Facing {
    fn default() -> Self {
        Self(1.0)
    }
}

impl Facing {
    /// Forward-вектор для detection cone
    pub fn forward(&self) -> Vec2 {
        Vec2::new(self.0, 0.0)
    }
}

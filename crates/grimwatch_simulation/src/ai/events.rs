//! AI Events — contract между ядром и host игрой
//!
//! Наружу: fire-and-forget события переходов (максимум одно на переход,
//! отражают состояние ПОСЛЕ полной transition-логики тика).
//! Внутрь: команды от combat/game кода, обрабатываются в начале тика.

use bevy::prelude::*;

/// Команды врагу от внешнего combat/game кода
///
/// Очередь событий, но обрабатывается в SimSet::Commands до FSM —
/// для наблюдателя эффект синхронный и немедленный (полный pre-empt
/// текущего состояния, без «дорабатывания» attack cooldown'а).
#[derive(Event, Debug, Clone)]
pub enum AgentCommand {
    /// Оглушить. No-op если can_be_stunned == false или враг мёртв.
    Stun { agent: Entity },

    /// Убить. Безусловно и идемпотентно (второй Kill не даёт второго Died).
    Kill { agent: Entity },

    /// Перепривязать патрульный сегмент
    ConfigurePatrol {
        agent: Entity,
        origin: Vec2,
        distance: f32,
    },
}

/// Враг заметил цель (переход в Detect)
#[derive(Event, Debug, Clone)]
pub struct TargetDetected {
    pub agent: Entity,
    pub target: Entity,
}

/// Цель потеряна (despawn, вышла из радиуса/конуса, перекрыта геометрией)
#[derive(Event, Debug, Clone)]
pub struct TargetLost {
    pub agent: Entity,
}

/// Attack cooldown накоплен — combat код может наносить урон
#[derive(Event, Debug, Clone)]
pub struct AttackReady {
    pub agent: Entity,
    pub target: Entity,
}

/// Враг оглушён
#[derive(Event, Debug, Clone)]
pub struct AgentStunned {
    pub agent: Entity,
}

/// Враг умер (терминально; despawn остаётся за host игрой)
#[derive(Event, Debug, Clone)]
pub struct AgentDied {
    pub agent: Entity,
}

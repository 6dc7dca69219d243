//! FSM AI components (state machine, config, patrol state).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// FSM состояния врага
///
/// Target живёт внутри варианта: инвариант «цель есть ⇔ состояние из
/// {Detect, Chase, Attack}» обеспечен структурой типа, не дисциплиной кода.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub enum AgentState {
    /// Patrol — хождение по сегменту вокруг patrol_origin
    Patrol,

    /// Detect — цель замечена, стоим и «вглядываемся» detection_delay секунд
    Detect {
        target: Entity,
        /// Накопленное время с момента обнаружения (счёт вверх)
        timer: f32,
    },

    /// Chase — преследуем цель на chase_speed
    Chase {
        target: Entity,
    },

    /// Attack — цель в attack_range, копим cooldown до AttackReady
    Attack {
        target: Entity,
        /// Накопленное время с последней атаки (счёт вверх)
        timer: f32,
    },

    /// Stunned — i-frame override: никакого AI, только отсчёт таймера
    Stunned {
        /// Оставшееся время стана (счёт вниз)
        timer: f32,
    },

    /// Dead — терминальное состояние, velocity == 0 навсегда
    Dead,
}

impl Default for AgentState {
    fn default() -> Self {
        Self::Patrol
    }
}

impl AgentState {
    /// Текущая отслеживаемая цель (есть только в Detect/Chase/Attack)
    pub fn target(&self) -> Option<Entity> {
        match self {
            Self::Detect { target, .. } | Self::Chase { target } | Self::Attack { target, .. } => {
                Some(*target)
            }
            Self::Patrol | Self::Stunned { .. } | Self::Dead => None,
        }
    }

    pub fn is_dead(&self) -> bool {
        matches!(self, Self::Dead)
    }

    /// Имя состояния для логов и animation hints
    pub fn name(&self) -> &'static str {
        match self {
            Self::Patrol => "Patrol",
            Self::Detect { .. } => "Detect",
            Self::Chase { .. } => "Chase",
            Self::Attack { .. } => "Attack",
            Self::Stunned { .. } => "Stunned",
            Self::Dead => "Dead",
        }
    }
}

/// Состояние до последнего перехода
///
/// Диагностика и animation hints. Логика FSM по нему не ветвится.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct PreviousState(pub AgentState);

/// Параметры врага (read-only после спавна, кроме configure_patrol команды)
///
/// Serde — чтобы host мог держать архетипы врагов в data файлах.
#[derive(Component, Debug, Clone, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct AgentConfig {
    /// Радиус обнаружения целей (units)
    pub detection_range: f32,
    /// Угол detection cone в градусах (≥ 360 — фильтр по углу отключён)
    pub detection_angle: f32,
    /// Сколько секунд «вглядываемся» в Detect перед Chase
    pub detection_delay: f32,
    /// Скорость патруля (units/sec)
    pub patrol_speed: f32,
    /// Скорость преследования (units/sec)
    pub chase_speed: f32,
    /// Дистанция атаки; цель ровно на границе считается в радиусе (≤)
    pub attack_range: f32,
    /// Разгон горизонтальной скорости (units/sec²)
    pub acceleration: f32,
    /// Торможение горизонтальной скорости (units/sec²)
    pub deceleration: f32,
    /// Интервал между AttackReady событиями (секунды)
    pub attack_cooldown: f32,
    /// Длительность стана (секунды)
    pub stun_duration: f32,
    /// Может ли враг быть оглушён
    pub can_be_stunned: bool,
    /// Патрулировать ли вообще (false — стоять на месте до обнаружения)
    pub patrol_enabled: bool,
    /// Длина патрульного сегмента (0 — стоять у origin)
    pub patrol_distance: f32,
    /// Пауза на конце сегмента (секунды)
    pub patrol_wait_time: f32,
    /// Случайный выбор направления на развороте вместо простого negate
    pub patrol_randomize: bool,
    /// Какую группу Targetable атакуем
    pub target_group: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            detection_range: 400.0,
            detection_angle: 180.0,
            detection_delay: 0.3,
            patrol_speed: 60.0,
            chase_speed: 140.0,
            attack_range: 50.0,
            acceleration: 600.0,
            deceleration: 800.0,
            attack_cooldown: 1.5,
            stun_duration: 2.0,
            can_be_stunned: true,
            patrol_enabled: true,
            patrol_distance: 200.0,
            patrol_wait_time: 1.0,
            patrol_randomize: false,
            target_group: 1,
        }
    }
}

/// Состояние patrol controller'а
///
/// Сегмент длиной patrol_distance с центром в origin, waypoint на
/// `origin.x + direction * distance / 2`. Вертикаль оставлена гравитации.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct PatrolState {
    /// Центр сегмента; None до первого тика (захватится из spawn позиции)
    pub origin: Option<Vec2>,
    /// Текущее направление обхода: -1 или +1
    pub direction: f32,
    /// Оставшаяся пауза на конце сегмента (счёт вниз)
    pub wait_timer: f32,
}

impl Default for PatrolState {
    fn default() -> Self {
        Self {
            origin: None,
            direction: 1.0,
            wait_timer: 0.0,
        }
    }
}

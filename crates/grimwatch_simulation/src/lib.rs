//! GRIMWATCH Simulation Core
//!
//! ECS-симуляция поведения врагов на Bevy 0.16 (strategic layer).
//! Headless: рендер, анимация, звук и полноценная физика живут в host engine,
//! ядро отдаёт state + events и принимает commands.
//!
//! Архитектура:
//! - FSM агента (Patrol → Detect → Chase → Attack, плюс Stunned/Dead overrides)
//! - Vision oracle: range + detection cone + line of sight через injected RayCaster
//! - Kinematic stub для headless прогонов (gravity, ground check, интеграция velocity)

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod components;
pub mod logger;
pub mod physics;

// Re-export базовых типов для удобства
pub use ai::{
    AgentCommand, AgentConfig, AgentDied, AgentState, AgentStunned, AttackReady, AIPlugin,
    PatrolState, PreviousState, TargetDetected, TargetLost,
};
pub use ai::vision::{NoObstructions, RayCaster, RayHit, SightBlockers, StaticObstacles};
pub use components::*;
pub use physics::KinematicPlugin;

/// Seed по умолчанию (используется когда host не задал свой)
pub const DEFAULT_SEED: u64 = 42;

/// Порядок фаз симуляции внутри одного fixed тика
///
/// Инвариант тика: commands → re-evaluation цели → направление движения →
/// commit velocity → интеграция. Цель, потерянная в середине тика, не может
/// повлиять на движение этого тика.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimSet {
    /// Внешние команды (stun, kill, configure patrol)
    Commands,
    /// FSM transitions + vision
    Ai,
    /// Patrol controller + movement driver (пишут Velocity)
    Steering,
    /// Kinematic stub: gravity, ground check, velocity → Transform
    Physics,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick (легче считать интервалы)
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            // Детерминистичный RNG (не перетираем seed если host уже вставил свой)
            .init_resource::<DeterministicRng>()
            .configure_sets(
                FixedUpdate,
                (
                    SimSet::Commands,
                    SimSet::Ai,
                    SimSet::Steering,
                    SimSet::Physics,
                )
                    .chain(),
            )
            // Подсистемы (ECS strategic layer)
            .add_plugins((AIPlugin, KinematicPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    logger::init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Spawn врага в мире
///
/// Required components у [`Agent`] дотягивают остальное
/// (FSM state, patrol state, velocity, kinematic body).
/// `patrol_origin` захватится из spawn позиции на первом тике.
pub fn spawn_agent(world: &mut World, position: Vec2, config: AgentConfig) -> Entity {
    world
        .spawn((
            Transform::from_translation(position.extend(0.0)),
            Agent,
            config,
        ))
        .id()
}

/// Snapshot мира для сравнения детерминизма
/// (упрощённая версия: Debug-формат компонентов, отсортированный по Entity)
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}

//! VAULTRUN Simulation Core
//!
//! ECS-симуляция stealth-режима на Bevy 0.16 (strategic layer).
//!
//! HYBRID ARCHITECTURE:
//! - ECS = strategic layer (FSM роботов, восприятие, правила режима)
//! - Tactical layer (физика, рендер, реальный pathfinding) — внешний:
//!   симуляция пишет MovementCommand и презентационные события,
//!   обратно получает прогресс навигации. Headless executor в
//!   `navigation` подменяет его для тестов и демо.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod components;
pub mod game;
pub mod logger;
pub mod navigation;
pub mod perception;

// Re-export базовых типов для удобства
pub use ai::{
    AgentMachine, AgentState, AIPlugin, AlertNearbyRobots, CountdownTimer, PlayerCaught,
    PresentationEvent, RobotConfig, RobotConfigError, RobotState,
};
pub use components::*;
pub use game::{
    spawn_artifact, Artifact, ArtifactDropped, ArtifactPickedUp, ArtifactStashed, GamePlugin,
    GameRules, GameState, GameWon, RestartLevel,
};
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use navigation::NavigationPlugin;
pub use perception::{can_see, LineOfSight, Occluder, SightBlockers};

/// Порядок подсистем внутри FixedUpdate тика:
/// восприятие+FSM → исполнение навигации → игровая обвязка
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Ai,
    Navigation,
    Game,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            // Детерминистичный RNG (seed по умолчанию)
            .insert_resource(DeterministicRng::new(42))
            // Окклюдеры зрения (уровень заполняет при setup'е)
            .init_resource::<perception::SightBlockers>()
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Ai,
                    SimulationSet::Navigation,
                    SimulationSet::Game,
                )
                    .chain(),
            )
            // Подсистемы (ECS strategic layer)
            .add_plugins((AIPlugin, NavigationPlugin, GamePlugin));
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

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    logger::init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Snapshot мира для сравнения детерминизма.
///
/// Собирает компоненты типа T в детерминированном порядке (сортировка по
/// Entity ID) и сериализует через Debug — достаточно для сравнения
/// прогонов между собой.
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}

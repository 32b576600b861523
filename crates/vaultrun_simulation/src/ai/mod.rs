//! AI decision-making module
//!
//! FSM робота-охранника: лестница эскалации от Idle до погони и обратно.
//! Восприятие и таймеры → решение о переходе → side effects входа/выхода →
//! MovementCommand внешнему locomotion-слою. Поток данных за тик один
//! и направлен в одну сторону.

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod machine;
pub mod systems;

// Re-export основных типов
pub use components::{CountdownTimer, RobotConfig, RobotConfigError, RobotState};
pub use events::{progress_label, AlertNearbyRobots, PlayerCaught, PresentationEvent};
pub use machine::{AgentMachine, AgentState};

use crate::SimulationSet;

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate для детерминизма.
/// Порядок выполнения:
/// 1. announce_spawned_robots — entry-нотификации новых машин
/// 2. alert_nearby_robots — форсированная эскалация (строго между тиками FSM)
/// 3. robot_fsm_update — обновление FSM state (один переход максимум)
/// 4. robot_movement_from_state — конвертация state → MovementCommand
/// 5. robot_catches_player — поимка игрока в погоне
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PresentationEvent>()
            .add_event::<AlertNearbyRobots>()
            .add_event::<PlayerCaught>()
            .add_systems(
                FixedUpdate,
                (
                    systems::announce_spawned_robots,
                    systems::alert_nearby_robots,
                    systems::robot_fsm_update,
                    systems::robot_movement_from_state,
                    systems::robot_catches_player,
                )
                    .chain() // Последовательное выполнение для детерминизма
                    .in_set(SimulationSet::Ai),
            );
    }
}

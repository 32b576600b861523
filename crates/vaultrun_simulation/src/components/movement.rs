//! Movement компоненты: команды перемещения и прогресс навигации.

use bevy::prelude::*;

/// Команда движения для актора — интерфейс к внешней locomotion-системе.
///
/// Архитектура:
/// - AI система пишет MovementCommand (high-level intent)
/// - Locomotion-слой (в полной игре — NavigationAgent движка, здесь —
///   headless executor) читает команду и двигает тело
/// - Прогресс возвращается через NavAgent
#[derive(Component, Debug, Clone, PartialEq)]
pub enum MovementCommand {
    /// Стоять на месте (не трогать текущий target)
    Idle,
    /// Двигаться к позиции (world coordinates)
    MoveToPosition { target: Vec3 },
    /// Следовать за entity (target обновляется каждый тик)
    FollowEntity { target: Entity },
    /// Остановиться немедленно (сбросить путь)
    Stop,
}

impl Default for MovementCommand {
    fn default() -> Self {
        Self::Idle
    }
}

/// Прогресс навигации, заполняется locomotion-слоем.
///
/// remaining_distance == INFINITY пока пути нет — иначе состояние,
/// проверяющее прибытие сразу после входа, увидело бы ложный "дошёл"
/// от предыдущего маршрута.
#[derive(Component, Debug, Clone)]
pub struct NavAgent {
    /// Текущая цель пути (None — путь сброшен)
    pub destination: Option<Vec3>,
    /// Остаток пути до цели (метры)
    pub remaining_distance: f32,
}

impl Default for NavAgent {
    fn default() -> Self {
        Self {
            destination: None,
            remaining_distance: f32::INFINITY,
        }
    }
}

/// Скорость движения актора (метры/сек)
#[derive(Component, Clone, Copy, Debug, Reflect)]
#[reflect(Component)]
pub struct MovementSpeed {
    pub speed: f32,
}

impl Default for MovementSpeed {
    fn default() -> Self {
        Self { speed: 2.0 } // 2 m/s — базовая скорость ходьбы
    }
}

//! AI events — сигналы наружу (презентация) и внутрь (alert, поимка).
//!
//! Симуляция пишет MovementCommand и шлёт PresentationEvent; внешний слой
//! (аниматор/рендер) читает их fire-and-forget, обратной связи нет.

use bevy::prelude::*;

/// Нотификации презентационному слою (аниматор, HUD).
///
/// Walking/DetectionIndicator шлются на входе/выходе из состояния,
/// DetectionProgress — каждый тик пока робот в DetectingPlayer.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum PresentationEvent {
    /// Флаг анимации ходьбы
    Walking { robot: Entity, walking: bool },
    /// Показать/спрятать индикатор обнаружения над головой
    DetectionIndicator { robot: Entity, visible: bool },
    /// Прогресс обнаружения, 0..100
    DetectionProgress { robot: Entity, percent: f32 },
}

/// Строка прогресса для HUD ("40%")
pub fn progress_label(percent: f32) -> String {
    format!("{percent:.0}%")
}

/// Глобальный сигнал "игрок себя выдал" (поднял артефакт, сработал датчик).
///
/// Роботы в радиусе GameRules::alert_distance от игрока форсируются
/// в DetectingPlayer — см. alert_nearby_robots.
#[derive(Event, Debug, Clone, Default)]
pub struct AlertNearbyRobots;

/// Робот догнал игрока (дистанция ≤ catch radius в ChasingPlayer)
#[derive(Event, Debug, Clone)]
pub struct PlayerCaught {
    pub robot: Entity,
}

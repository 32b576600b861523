//! World-компоненты: точки спавна, safe zone.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Тип точки спавна
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Reflect)]
pub enum SpawnKind {
    Player,
    Robot,
}

/// Точка спавна в уровне. Расставляет их внешний редактор уровня;
/// симуляция только выбирает из зарегистрированных.
#[derive(Component, Debug, Clone, Copy, Reflect)]
pub struct SpawnPoint {
    pub kind: SpawnKind,
}

/// Зона, где артефакт считается спрятанным (радиус вокруг позиции entity)
#[derive(Component, Debug, Clone, Copy, Reflect)]
pub struct SafeZone {
    pub radius: f32,
}

//! Компоненты игрока. Для робота игрок — read-only цель: позиция,
//! forward и флаг обнаружимости.

use bevy::prelude::*;

use crate::ai::components::CountdownTimer;

/// Marker игрока (цель восприятия)
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct Player;

/// Можно ли обнаружить игрока (false — клоакинг и т.п.)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Detectable(pub bool);

impl Default for Detectable {
    fn default() -> Self {
        Self(true)
    }
}

/// Оглушение игрока (робот догнал).
///
/// Пока отсчёт идёт — игрок обездвижен и не может подбирать артефакты;
/// после истечения подбор разрешается снова.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct StunState {
    /// Текущий отсчёт оглушения (None — не оглушён)
    pub countdown: Option<CountdownTimer>,
    /// Лок на подбор артефактов (снимается по окончании стана)
    pub pickup_locked: bool,
}

impl StunState {
    pub fn stunned(&self) -> bool {
        self.countdown.map(|c| !c.expired()).unwrap_or(false)
    }

    pub fn can_pickup(&self) -> bool {
        !self.stunned() && !self.pickup_locked
    }
}

/// Артефакт в руках игрока (None — руки свободны)
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct HeldArtifact(pub Option<Entity>);

//! Артефакты — то, что игрок крадёт, а роботы стерегут.
//!
//! Физика подбора (коллизии, бросок) — забота внешнего слоя; здесь
//! event-reactive учёт: кто держит, что спрятано, когда шуметь alert'ом.

use bevy::prelude::*;

use crate::ai::events::AlertNearbyRobots;
use crate::components::{HeldArtifact, Player, SafeZone, StunState};
use crate::game::GameRules;

/// Артефакт: состояние подбора/стэша и родная позиция
#[derive(Component, Debug, Clone, Reflect)]
pub struct Artifact {
    pub picked_up: bool,
    pub stashed: bool,
    /// Где артефакт лежал на старте уровня (для restart)
    pub home_position: Vec3,
}

impl Artifact {
    pub fn new(home_position: Vec3) -> Self {
        Self {
            picked_up: false,
            stashed: false,
            home_position,
        }
    }

    /// Можно ли подобрать (не в руках и не спрятан)
    pub fn available(&self) -> bool {
        !self.picked_up && !self.stashed
    }
}

/// Spawn helper: артефакт на позиции (она же — его home)
pub fn spawn_artifact(commands: &mut Commands, position: Vec3) -> Entity {
    commands
        .spawn((Artifact::new(position), Transform::from_translation(position)))
        .id()
}

#[derive(Event, Debug, Clone)]
pub struct ArtifactPickedUp {
    pub artifact: Entity,
}

#[derive(Event, Debug, Clone)]
pub struct ArtifactDropped {
    pub artifact: Entity,
}

#[derive(Event, Debug, Clone)]
pub struct ArtifactStashed {
    pub artifact: Entity,
}

/// Система: подбор артефакта при сближении (headless-замена коллизии).
///
/// Руки заняты, стан или pickup-лок — не подбираем. Подбор шумный:
/// сразу рассылаем AlertNearbyRobots.
pub fn pickup_artifacts(
    mut player: Query<(&Transform, &StunState, &mut HeldArtifact), With<Player>>,
    mut artifacts: Query<(Entity, &Transform, &mut Artifact), Without<Player>>,
    rules: Res<GameRules>,
    mut picked_events: EventWriter<ArtifactPickedUp>,
    mut alert_events: EventWriter<AlertNearbyRobots>,
) {
    let Ok((player_transform, stun, mut held)) = player.single_mut() else {
        return;
    };
    if held.0.is_some() || !stun.can_pickup() {
        return;
    }

    for (entity, transform, mut artifact) in artifacts.iter_mut() {
        if !artifact.available() {
            continue;
        }
        if transform.translation.distance(player_transform.translation) > rules.pickup_radius {
            continue;
        }

        artifact.picked_up = true;
        held.0 = Some(entity);
        picked_events.write(ArtifactPickedUp { artifact: entity });
        // Подбор выдаёт игрока всем роботам в округе
        alert_events.write(AlertNearbyRobots);
        crate::logger::log(&format!("Picking up artifact {:?}", entity));
        break;
    }
}

/// Система: артефакт в руках следует за игроком
pub fn carry_held_artifact(
    player: Query<(&Transform, &HeldArtifact), With<Player>>,
    mut artifacts: Query<&mut Transform, (With<Artifact>, Without<Player>)>,
) {
    let Ok((player_transform, held)) = player.single() else {
        return;
    };
    let Some(entity) = held.0 else {
        return;
    };
    if let Ok(mut transform) = artifacts.get_mut(entity) {
        // Hold point — у груди
        transform.translation = player_transform.translation + Vec3::Y;
    }
}

/// Система: стэш в safe zone.
///
/// Игрок с артефактом вошёл в зону → артефакт спрятан навсегда
/// (stashed не сбрасывается ничем кроме restart).
pub fn stash_artifacts_in_safe_zone(
    mut player: Query<(&Transform, &mut HeldArtifact), With<Player>>,
    zones: Query<(&Transform, &SafeZone), Without<Player>>,
    mut artifacts: Query<&mut Artifact>,
    mut dropped_events: EventWriter<ArtifactDropped>,
    mut stashed_events: EventWriter<ArtifactStashed>,
) {
    let Ok((player_transform, mut held)) = player.single_mut() else {
        return;
    };
    let Some(entity) = held.0 else {
        return;
    };

    let in_zone = zones.iter().any(|(transform, zone)| {
        transform.translation.distance(player_transform.translation) <= zone.radius
    });
    if !in_zone {
        return;
    }

    if let Ok(mut artifact) = artifacts.get_mut(entity) {
        artifact.stashed = true;
        artifact.picked_up = false;
        held.0 = None;
        dropped_events.write(ArtifactDropped { artifact: entity });
        stashed_events.write(ArtifactStashed { artifact: entity });
        crate::logger::log(&format!("Artifact {:?} stashed in safe zone", entity));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_availability() {
        let mut artifact = Artifact::new(Vec3::ZERO);
        assert!(artifact.available());

        artifact.picked_up = true;
        assert!(!artifact.available());

        artifact.picked_up = false;
        artifact.stashed = true;
        // Спрятанный артефакт не подбирается
        assert!(!artifact.available());
    }
}

//! AI reaction systems (alert broadcast, поимка игрока).

use bevy::prelude::*;

use crate::ai::components::{CountdownTimer, RobotConfig, RobotState};
use crate::ai::events::{AlertNearbyRobots, PlayerCaught, PresentationEvent};
use crate::ai::machine::AgentMachine;
use crate::ai::systems::fsm::apply_transition;
use crate::components::{Player, Robot, StunState};
use crate::game::GameRules;

/// Система: разнести alert по роботам в радиусе.
///
/// Игрок себя выдал (поднял артефакт, сработал датчик) — каждый робот
/// в пределах alert_distance форсируется через on_player_detected.
/// Доставка идёт системой в общей FixedUpdate-цепочке, то есть строго
/// между тиками FSM, не посреди чьего-то Update.
pub fn alert_nearby_robots(
    mut alerts: EventReader<AlertNearbyRobots>,
    mut robots: Query<
        (Entity, &Transform, &RobotConfig, &mut AgentMachine<RobotState>),
        With<Robot>,
    >,
    player: Query<&Transform, With<Player>>,
    rules: Res<GameRules>,
    mut presentation: EventWriter<PresentationEvent>,
) {
    if alerts.is_empty() {
        return;
    }
    alerts.clear();

    let Ok(player_transform) = player.single() else {
        return;
    };
    let player_pos = player_transform.translation;

    for (entity, transform, config, mut machine) in robots.iter_mut() {
        if transform.translation.distance(player_pos) > rules.alert_distance {
            continue;
        }
        crate::logger::log(&format!("Alerting {:?}", entity));
        on_player_detected(entity, config, &mut *machine, &mut presentation);
    }
}

/// Форсированная эскалация одного робота — внешний триггер
/// (другой робот заметил игрока, датчик, скрипт уровня).
///
/// Idle и поисковые состояния переходят в DetectingPlayer как при свежем
/// обнаружении. Робот, уже детектящий, ничего не перезапускает (повтор
/// текущего варианта гасится goto); робота в погоне не трогаем —
/// эскалацию не понижаем.
pub fn on_player_detected(
    entity: Entity,
    config: &RobotConfig,
    machine: &mut AgentMachine<RobotState>,
    presentation: &mut EventWriter<PresentationEvent>,
) {
    if matches!(machine.current(), RobotState::ChasingPlayer) {
        return;
    }
    apply_transition(
        entity,
        machine,
        RobotState::DetectingPlayer {
            countdown: CountdownTimer::start(config.detection_time),
        },
        presentation,
    );
}

/// Система: робот в погоне догнал игрока.
///
/// Дистанция ≤ catch_radius в ChasingPlayer → PlayerCaught; оглушение
/// и выпадение артефакта обрабатывает game-слой.
pub fn robot_catches_player(
    robots: Query<(Entity, &Transform, &AgentMachine<RobotState>), With<Robot>>,
    player: Query<(&Transform, &StunState), With<Player>>,
    rules: Res<GameRules>,
    mut caught_events: EventWriter<PlayerCaught>,
) {
    let Ok((player_transform, stun)) = player.single() else {
        return;
    };
    // Уже лежит — не ловим повторно
    if stun.stunned() {
        return;
    }

    for (entity, transform, machine) in robots.iter() {
        if !matches!(machine.current(), RobotState::ChasingPlayer) {
            continue;
        }
        if transform.translation.distance(player_transform.translation) <= rules.catch_radius {
            caught_events.write(PlayerCaught { robot: entity });
        }
    }
}

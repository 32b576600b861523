//! Game mode — event-reactive обвязка вокруг AI-ядра.
//!
//! Учёт побед, оглушение пойманного игрока, расстановка по spawn-точкам
//! и рестарт уровня. Всё простое и реактивное: системы слушают события
//! и дёргают состояние, никакой собственной логики принятия решений.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod artifact;

pub use artifact::{
    spawn_artifact, Artifact, ArtifactDropped, ArtifactPickedUp, ArtifactStashed,
};

use crate::ai::components::{CountdownTimer, RobotState};
use crate::ai::events::{PlayerCaught, PresentationEvent};
use crate::ai::machine::AgentMachine;
use crate::components::{
    HeldArtifact, HomePosition, MovementCommand, NavAgent, Player, Robot, SpawnKind, SpawnPoint,
    StunState,
};
use crate::{DeterministicRng, SimulationSet};

/// Правила игрового режима (дистанции, тайминги обвязки)
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRules {
    /// Радиус оповещения роботов вокруг игрока при alert'е (метры)
    pub alert_distance: f32,
    /// Дистанция поимки игрока роботом в погоне (метры)
    pub catch_radius: f32,
    /// Дистанция подбора артефакта (метры)
    pub pickup_radius: f32,
    /// Длительность оглушения пойманного игрока (секунды)
    pub stun_duration: f32,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            alert_distance: 15.0,
            catch_radius: 1.2,
            pickup_radius: 1.0,
            stun_duration: 3.0,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum GameRulesError {
    #[error("alert_distance must be positive, got {0}")]
    NonPositiveAlertDistance(f32),
    #[error("catch_radius must be positive, got {0}")]
    NonPositiveCatchRadius(f32),
    #[error("pickup_radius must be positive, got {0}")]
    NonPositivePickupRadius(f32),
    #[error("stun_duration must be positive, got {0}")]
    NonPositiveStunDuration(f32),
}

impl GameRules {
    pub fn validate(&self) -> Result<(), GameRulesError> {
        if !(self.alert_distance > 0.0) {
            return Err(GameRulesError::NonPositiveAlertDistance(self.alert_distance));
        }
        if !(self.catch_radius > 0.0) {
            return Err(GameRulesError::NonPositiveCatchRadius(self.catch_radius));
        }
        if !(self.pickup_radius > 0.0) {
            return Err(GameRulesError::NonPositivePickupRadius(self.pickup_radius));
        }
        if !(self.stun_duration > 0.0) {
            return Err(GameRulesError::NonPositiveStunDuration(self.stun_duration));
        }
        Ok(())
    }
}

/// Прогресс игрового режима
#[derive(Resource, Debug, Clone, Default)]
pub struct GameState {
    pub won: bool,
}

/// Все артефакты спрятаны — победа (шлётся один раз)
#[derive(Event, Debug, Clone)]
pub struct GameWon;

/// Запрос рестарта уровня (внешний input-слой шлёт по своей кнопке)
#[derive(Event, Debug, Clone, Default)]
pub struct RestartLevel;

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameRules>()
            .init_resource::<GameState>()
            .add_event::<ArtifactPickedUp>()
            .add_event::<ArtifactDropped>()
            .add_event::<ArtifactStashed>()
            .add_event::<GameWon>()
            .add_event::<RestartLevel>()
            .add_systems(Startup, (validate_game_rules, place_player_at_spawn).chain())
            .add_systems(
                FixedUpdate,
                (
                    artifact::pickup_artifacts,
                    artifact::carry_held_artifact,
                    artifact::stash_artifacts_in_safe_zone,
                    check_win_condition,
                    stun_caught_player,
                    tick_player_stun,
                    handle_level_restart,
                )
                    .chain()
                    .in_set(SimulationSet::Game),
            );
    }
}

/// Битые правила роняют setup, а не тихо ломают поведение в рантайме
fn validate_game_rules(rules: Res<GameRules>) {
    if let Err(error) = rules.validate() {
        panic!("invalid GameRules: {error}");
    }
}

/// Система: поставить игрока на случайную player-spawn точку.
///
/// Точки расставляет внешний редактор уровня; выбор — из явно
/// зарегистрированных entity, сид берём из DeterministicRng.
pub fn place_player_at_spawn(
    mut rng: ResMut<DeterministicRng>,
    spawn_points: Query<(&SpawnPoint, &Transform), Without<Player>>,
    mut player: Query<&mut Transform, With<Player>>,
) {
    let Ok(mut player_transform) = player.single_mut() else {
        return;
    };

    let candidates: Vec<&Transform> = spawn_points
        .iter()
        .filter(|(point, _)| point.kind == SpawnKind::Player)
        .map(|(_, transform)| transform)
        .collect();
    if candidates.is_empty() {
        return;
    }

    let index = rng.rng.gen_range(0..candidates.len());
    *player_transform = *candidates[index];
    crate::logger::log(&format!("Player placed at spawn point {}", index));
}

/// Система: оглушение пойманного игрока.
///
/// PlayerCaught → роняем артефакт, лочим подбор, заводим отсчёт стана.
/// Уже оглушённого повторно не глушим.
pub fn stun_caught_player(
    mut caught_events: EventReader<PlayerCaught>,
    mut player: Query<(&mut StunState, &mut HeldArtifact), With<Player>>,
    mut artifacts: Query<&mut Artifact>,
    rules: Res<GameRules>,
    mut dropped_events: EventWriter<ArtifactDropped>,
) {
    let Some(event) = caught_events.read().next().cloned() else {
        return;
    };
    caught_events.clear();

    let Ok((mut stun, mut held)) = player.single_mut() else {
        return;
    };
    if stun.stunned() {
        return;
    }

    if let Some(entity) = held.0.take() {
        if let Ok(mut artifact) = artifacts.get_mut(entity) {
            artifact.picked_up = false;
        }
        dropped_events.write(ArtifactDropped { artifact: entity });
    }

    stun.countdown = Some(CountdownTimer::start(rules.stun_duration));
    stun.pickup_locked = true;
    crate::logger::log(&format!(
        "Player caught by {:?} → stunned for {:.1}s",
        event.robot, rules.stun_duration
    ));
}

/// Система: отсчёт стана; по истечении снимаем pickup-лок
pub fn tick_player_stun(mut player: Query<&mut StunState, With<Player>>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();
    let Ok(mut stun) = player.single_mut() else {
        return;
    };
    let Some(mut countdown) = stun.countdown else {
        return;
    };

    countdown.tick_down(delta);
    if countdown.expired() {
        stun.countdown = None;
        stun.pickup_locked = false;
        crate::logger::log("Player recovered from stun");
    } else {
        stun.countdown = Some(countdown);
    }
}

/// Система: проверка победы по событию стэша.
///
/// Все артефакты спрятаны → GameWon ровно один раз.
pub fn check_win_condition(
    mut stashed_events: EventReader<ArtifactStashed>,
    artifacts: Query<&Artifact>,
    mut state: ResMut<GameState>,
    mut won_events: EventWriter<GameWon>,
) {
    if stashed_events.is_empty() {
        return;
    }
    stashed_events.clear();

    if state.won {
        return;
    }
    if !artifacts.is_empty() && artifacts.iter().all(|artifact| artifact.stashed) {
        state.won = true;
        won_events.write(GameWon);
        crate::logger::log_info("You won. :|");
    }
}

/// Система: рестарт уровня.
///
/// Роботы пересоздаются в Idle на постах (машина заменяется целиком —
/// никаких "отменяемых" операций в середине нет), артефакты возвращаются
/// на home-позиции, стан и руки игрока очищаются.
pub fn handle_level_restart(
    mut restart_events: EventReader<RestartLevel>,
    mut robots: Query<
        (
            Entity,
            &HomePosition,
            &mut AgentMachine<RobotState>,
            &mut Transform,
            &mut MovementCommand,
            &mut NavAgent,
        ),
        With<Robot>,
    >,
    mut artifacts: Query<(&mut Artifact, &mut Transform), (Without<Robot>, Without<Player>)>,
    mut player: Query<(&mut StunState, &mut HeldArtifact), With<Player>>,
    mut state: ResMut<GameState>,
    mut presentation: EventWriter<PresentationEvent>,
) {
    if restart_events.is_empty() {
        return;
    }
    restart_events.clear();

    for (entity, home, mut machine, mut transform, mut command, mut nav) in robots.iter_mut() {
        *machine = AgentMachine::new(RobotState::Idle);
        transform.translation = home.0;
        *command = MovementCommand::Stop;
        *nav = NavAgent::default();
        presentation.write(PresentationEvent::Walking {
            robot: entity,
            walking: false,
        });
    }

    for (mut artifact, mut transform) in artifacts.iter_mut() {
        artifact.picked_up = false;
        artifact.stashed = false;
        transform.translation = artifact.home_position;
    }

    if let Ok((mut stun, mut held)) = player.single_mut() {
        *stun = StunState::default();
        held.0 = None;
    }

    state.won = false;
    crate::logger::log_info("Level restarted: robots recreated at home, artifacts reset");
}

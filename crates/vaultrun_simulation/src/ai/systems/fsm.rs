//! FSM системы робота (state transitions, enter/leave side effects).
//!
//! Один вызов на робота за тик: читаем восприятие и таймеры, решаем
//! МАКСИМУМ один переход, исполняем leave/enter эффекты ровно один раз
//! на реальный переход. Повторный запрос текущего состояния гасится
//! в AgentMachine::goto.

use bevy::prelude::*;

use crate::ai::components::{CountdownTimer, RobotConfig, RobotState};
use crate::ai::events::PresentationEvent;
use crate::ai::machine::{AgentMachine, AgentState};
use crate::components::{Detectable, NavAgent, Player, Robot};
use crate::perception::{self, SightBlockers};

/// Система: объявить entry-эффекты только что созданных роботов.
///
/// Спавн — единственный "вход" без предшествующего выхода за жизнь робота:
/// машина рождается сразу в Idle, здесь публикуем его entry-нотификацию.
pub fn announce_spawned_robots(
    robots: Query<Entity, (With<Robot>, Added<AgentMachine<RobotState>>)>,
    mut presentation: EventWriter<PresentationEvent>,
) {
    for robot in robots.iter() {
        presentation.write(PresentationEvent::Walking {
            robot,
            walking: false,
        });
        crate::logger::log(&format!("FSM: {:?} spawned in Idle", robot));
    }
}

/// Система: один Update FSM на робота за тик.
///
/// Порядок внутри тика: восприятие → решение → side effects перехода.
/// Навигационные команды из нового состояния выставляет
/// robot_movement_from_state следом в той же цепочке.
pub fn robot_fsm_update(
    mut robots: Query<
        (
            Entity,
            &Transform,
            &RobotConfig,
            &NavAgent,
            &mut AgentMachine<RobotState>,
        ),
        With<Robot>,
    >,
    player: Query<(&Transform, &Detectable), With<Player>>,
    blockers: Res<SightBlockers>,
    mut presentation: EventWriter<PresentationEvent>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    // Нет игрока в мире — роботам некого высматривать
    let Ok((player_transform, detectable)) = player.single() else {
        return;
    };
    let player_pos = player_transform.translation;

    for (entity, transform, config, nav, mut machine) in robots.iter_mut() {
        // Перцепция без side effects — безопасна в любом состоянии
        let visible = detectable.0
            && perception::can_see(
                transform.translation,
                *transform.forward(),
                config.field_of_view,
                player_pos,
                &*blockers,
            );

        let (next, progress) = next_state(
            machine.current_mut(),
            visible,
            player_pos,
            nav.remaining_distance,
            config,
            delta,
        );

        if let Some(percent) = progress {
            presentation.write(PresentationEvent::DetectionProgress {
                robot: entity,
                percent,
            });
        }

        if let Some(next) = next {
            apply_transition(entity, &mut *machine, next, &mut presentation);
        }
    }
}

/// Решение FSM: максимум один переход за тик, приоритеты внутри состояния.
///
/// Возвращает (кандидат нового состояния, прогресс обнаружения для HUD).
/// Мутирует только payload текущего состояния (тики таймеров).
pub(crate) fn next_state(
    current: &mut RobotState,
    visible: bool,
    player_pos: Vec3,
    remaining_distance: f32,
    config: &RobotConfig,
    delta: f32,
) -> (Option<RobotState>, Option<f32>) {
    match current {
        RobotState::Idle => (
            visible.then(|| RobotState::DetectingPlayer {
                countdown: CountdownTimer::start(config.detection_time),
            }),
            None,
        ),

        RobotState::DetectingPlayer { countdown } => {
            let remaining = countdown.tick_down(delta);
            let percent = ((1.0 - remaining / config.detection_time) * 100.0).clamp(0.0, 100.0);

            let next = if countdown.expired() {
                Some(RobotState::ChasingPlayer)
            } else if !visible {
                // Упустили до полного обнаружения — частичный прогресс сгорает
                Some(RobotState::Idle)
            } else {
                None
            };
            (next, Some(percent))
        }

        RobotState::ChasingPlayer => (
            // Потеря видимости: позиция игрока снапшотится ровно в момент
            // потери, не раньше
            (!visible).then(|| RobotState::MoveToLastKnownPosition {
                last_known: player_pos,
            }),
            None,
        ),

        RobotState::MoveToLastKnownPosition { .. } => {
            let mut next = (remaining_distance <= config.stopped_distance).then(|| {
                RobotState::LookingForPlayer {
                    patience: CountdownTimer::start(config.return_home_time),
                }
            });
            // Прибытие и видимость проверяются независимо; при совпадении
            // в один тик видимость побеждает
            if visible {
                next = Some(RobotState::ChasingPlayer);
            }
            (next, None)
        }

        RobotState::LookingForPlayer { patience } => {
            patience.tick_down(delta);
            let mut next = patience.expired().then_some(RobotState::ReturningHome);
            if visible {
                next = Some(RobotState::ChasingPlayer);
            }
            (next, None)
        }

        RobotState::ReturningHome => {
            let mut next = (remaining_distance <= config.stopped_distance).then_some(RobotState::Idle);
            if visible {
                next = Some(RobotState::ChasingPlayer);
            }
            (next, None)
        }
    }
}

/// Переход + side effects: leave старого, enter нового, ровно один раз.
/// Запрос того же варианта — no-op (AgentMachine::goto вернёт None).
pub(crate) fn apply_transition(
    entity: Entity,
    machine: &mut AgentMachine<RobotState>,
    next: RobotState,
    presentation: &mut EventWriter<PresentationEvent>,
) {
    let Some(left) = machine.goto(next) else {
        return;
    };
    on_state_left(entity, &left, presentation);
    on_state_entered(entity, machine.current(), presentation);
    crate::logger::log(&format!(
        "FSM: {:?} {} → {}",
        entity,
        left.tag(),
        machine.current().tag()
    ));
}

fn on_state_left(robot: Entity, state: &RobotState, presentation: &mut EventWriter<PresentationEvent>) {
    match state {
        RobotState::DetectingPlayer { .. } => {
            // Прячем индикатор обнаружения
            presentation.write(PresentationEvent::DetectionIndicator {
                robot,
                visible: false,
            });
        }
        RobotState::Idle
        | RobotState::ChasingPlayer
        | RobotState::MoveToLastKnownPosition { .. }
        | RobotState::LookingForPlayer { .. }
        | RobotState::ReturningHome => {}
    }
}

fn on_state_entered(
    robot: Entity,
    state: &RobotState,
    presentation: &mut EventWriter<PresentationEvent>,
) {
    match state {
        RobotState::Idle => {
            presentation.write(PresentationEvent::Walking {
                robot,
                walking: false,
            });
        }
        RobotState::DetectingPlayer { .. } => {
            presentation.write(PresentationEvent::DetectionIndicator {
                robot,
                visible: true,
            });
        }
        RobotState::ChasingPlayer
        | RobotState::MoveToLastKnownPosition { .. }
        | RobotState::ReturningHome => {
            presentation.write(PresentationEvent::Walking {
                robot,
                walking: true,
            });
        }
        RobotState::LookingForPlayer { .. } => {
            presentation.write(PresentationEvent::Walking {
                robot,
                walking: false,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RobotConfig {
        RobotConfig::default() // fov 90, detection 2.0, stopped 0.5, patience 5.0
    }

    #[test]
    fn test_idle_sees_player_starts_detection() {
        let mut state = RobotState::Idle;
        let (next, progress) =
            next_state(&mut state, true, Vec3::ZERO, f32::INFINITY, &config(), 0.1);

        match next {
            Some(RobotState::DetectingPlayer { countdown }) => {
                assert_eq!(countdown.remaining(), 2.0); // свежий отсчёт
            }
            other => panic!("expected DetectingPlayer, got {:?}", other),
        }
        assert!(progress.is_none());
    }

    #[test]
    fn test_idle_without_sight_stays() {
        let mut state = RobotState::Idle;
        let (next, _) = next_state(&mut state, false, Vec3::ZERO, f32::INFINITY, &config(), 0.1);
        assert!(next.is_none());
    }

    #[test]
    fn test_detection_progress_is_monotonic() {
        let mut state = RobotState::DetectingPlayer {
            countdown: CountdownTimer::start(2.0),
        };

        let mut last_percent = -1.0;
        for _ in 0..10 {
            let (next, progress) =
                next_state(&mut state, true, Vec3::ZERO, f32::INFINITY, &config(), 0.1);
            assert!(next.is_none()); // 1.0s из 2.0 — ещё не истёк
            let percent = progress.unwrap();
            assert!(percent > last_percent);
            last_percent = percent;
        }
        assert!((last_percent - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_detection_expiry_transitions_to_chase_at_100() {
        let mut countdown = CountdownTimer::start(2.0);
        countdown.tick_down(1.95);
        let mut state = RobotState::DetectingPlayer { countdown };

        let (next, progress) =
            next_state(&mut state, true, Vec3::ZERO, f32::INFINITY, &config(), 0.1);
        assert!(matches!(next, Some(RobotState::ChasingPlayer)));
        assert_eq!(progress, Some(100.0));
    }

    #[test]
    fn test_detection_lost_sight_returns_to_idle() {
        let mut state = RobotState::DetectingPlayer {
            countdown: CountdownTimer::start(2.0),
        };
        let (next, _) = next_state(&mut state, false, Vec3::ZERO, f32::INFINITY, &config(), 0.1);
        assert!(matches!(next, Some(RobotState::Idle)));
    }

    #[test]
    fn test_chase_loss_snapshots_current_position() {
        let mut state = RobotState::ChasingPlayer;
        let player_pos = Vec3::new(3.0, 0.0, -7.0);

        let (next, _) = next_state(&mut state, false, player_pos, 2.0, &config(), 0.1);
        match next {
            Some(RobotState::MoveToLastKnownPosition { last_known }) => {
                assert_eq!(last_known, player_pos);
            }
            other => panic!("expected MoveToLastKnownPosition, got {:?}", other),
        }
    }

    #[test]
    fn test_arrival_at_last_known_starts_search() {
        let mut state = RobotState::MoveToLastKnownPosition {
            last_known: Vec3::ZERO,
        };
        let (next, _) = next_state(&mut state, false, Vec3::ZERO, 0.3, &config(), 0.1);
        assert!(matches!(next, Some(RobotState::LookingForPlayer { .. })));
    }

    #[test]
    fn test_sighting_beats_arrival_same_tick() {
        // Прибытие И видимость в один тик — побеждает видимость
        let mut state = RobotState::MoveToLastKnownPosition {
            last_known: Vec3::ZERO,
        };
        let (next, _) = next_state(&mut state, true, Vec3::ZERO, 0.0, &config(), 0.1);
        assert!(matches!(next, Some(RobotState::ChasingPlayer)));
    }

    #[test]
    fn test_search_timeout_gives_up() {
        let mut patience = CountdownTimer::start(5.0);
        patience.tick_down(4.95);
        let mut state = RobotState::LookingForPlayer { patience };

        let (next, _) = next_state(&mut state, false, Vec3::ZERO, f32::INFINITY, &config(), 0.1);
        assert!(matches!(next, Some(RobotState::ReturningHome)));
    }

    #[test]
    fn test_sighting_beats_search_timeout() {
        let mut patience = CountdownTimer::start(5.0);
        patience.tick_down(10.0);
        let mut state = RobotState::LookingForPlayer { patience };

        let (next, _) = next_state(&mut state, true, Vec3::ZERO, f32::INFINITY, &config(), 0.1);
        assert!(matches!(next, Some(RobotState::ChasingPlayer)));
    }

    #[test]
    fn test_returning_home_arrival_goes_idle() {
        let mut state = RobotState::ReturningHome;
        let (next, _) = next_state(&mut state, false, Vec3::ZERO, 0.1, &config(), 0.1);
        assert!(matches!(next, Some(RobotState::Idle)));
    }

    #[test]
    fn test_sighting_interrupts_return_home() {
        let mut state = RobotState::ReturningHome;
        let (next, _) = next_state(&mut state, true, Vec3::ZERO, 50.0, &config(), 0.1);
        assert!(matches!(next, Some(RobotState::ChasingPlayer)));
    }
}

//! AI movement systems.
//!
//! Конвертирует RobotState → MovementCommand для locomotion-слоя.
//! Guards по равенству команды: навигационный запрос path-состояний
//! уходит один раз на вход в состояние, а не каждый кадр.

use bevy::prelude::*;

use crate::ai::components::RobotState;
use crate::ai::machine::AgentMachine;
use crate::components::{HomePosition, MovementCommand, Player, Robot};

/// Система: RobotState → MovementCommand
pub fn robot_movement_from_state(
    mut robots: Query<
        (&AgentMachine<RobotState>, &HomePosition, &mut MovementCommand),
        With<Robot>,
    >,
    player: Query<Entity, With<Player>>,
) {
    let player_entity = player.single().ok();

    for (machine, home, mut command) in robots.iter_mut() {
        match machine.current() {
            RobotState::Idle => {
                if !matches!(*command, MovementCommand::Idle) {
                    *command = MovementCommand::Idle;
                }
            }

            RobotState::DetectingPlayer { .. } => {
                // Замираем на время детекта (сюда можно попасть на ходу
                // через alert)
                if !matches!(*command, MovementCommand::Stop) {
                    *command = MovementCommand::Stop;
                }
            }

            RobotState::ChasingPlayer => {
                // Преследуем ТЕКУЩУЮ позицию игрока — FollowEntity
                // перенацеливается каждый тик
                let Some(target) = player_entity else {
                    if !matches!(*command, MovementCommand::Idle) {
                        *command = MovementCommand::Idle;
                    }
                    continue;
                };
                if !matches!(*command, MovementCommand::FollowEntity { target: t } if t == target)
                {
                    *command = MovementCommand::FollowEntity { target };
                }
            }

            RobotState::MoveToLastKnownPosition { last_known } => {
                if !matches!(*command, MovementCommand::MoveToPosition { target } if target == *last_known)
                {
                    *command = MovementCommand::MoveToPosition {
                        target: *last_known,
                    };
                }
            }

            RobotState::LookingForPlayer { .. } => {
                if !matches!(*command, MovementCommand::Stop) {
                    *command = MovementCommand::Stop;
                }
            }

            RobotState::ReturningHome => {
                if !matches!(*command, MovementCommand::MoveToPosition { target } if target == home.0)
                {
                    *command = MovementCommand::MoveToPosition { target: home.0 };
                }
            }
        }
    }
}

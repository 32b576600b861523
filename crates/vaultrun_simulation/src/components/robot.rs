//! Компоненты робота-охранника + spawn helper.

use bevy::prelude::*;

use crate::ai::components::{RobotConfig, RobotConfigError, RobotState};
use crate::ai::machine::AgentMachine;
use crate::components::movement::{MovementCommand, MovementSpeed, NavAgent};

/// Marker робота-охранника
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct Robot;

/// Пост робота: точка спавна, неизменяема после создания.
/// Сюда робот возвращается, отчаявшись найти игрока.
#[derive(Component, Debug, Clone, Copy, Reflect)]
pub struct HomePosition(pub Vec3);

/// Spawn helper: создаёт робота на посту в Idle.
///
/// Конфиг валидируется здесь — битые параметры (нулевой detection_time и
/// т.п.) роняют setup, а не превращаются в робота-слепца.
pub fn spawn_robot(
    commands: &mut Commands,
    config: RobotConfig,
    transform: Transform,
) -> Result<Entity, RobotConfigError> {
    config.validate()?;

    let home = transform.translation;
    let entity = commands
        .spawn((
            Robot,
            transform,
            HomePosition(home),
            config,
            AgentMachine::new(RobotState::Idle),
            MovementCommand::Idle,
            NavAgent::default(),
            MovementSpeed::default(),
        ))
        .id();

    Ok(entity)
}

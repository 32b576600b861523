//! FSM AI components (состояния робота, конфиг восприятия).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ai::machine::AgentState;
use crate::ai::components::timer::CountdownTimer;

/// Состояния робота-охранника.
///
/// Лестница эскалации: Idle → DetectingPlayer → ChasingPlayer →
/// MoveToLastKnownPosition → LookingForPlayer → ReturningHome → Idle.
/// Данные, нужные только одному состоянию (отсчёты, снапшот позиции),
/// живут в payload варианта — код других состояний физически не может
/// их прочитать или испортить.
#[derive(Debug, Clone, PartialEq, Reflect)]
pub enum RobotState {
    /// Стоим на месте, каждый тик проверяем конус зрения
    Idle,

    /// Игрок в конусе — копим уверенность до полного обнаружения
    DetectingPlayer {
        /// Отсчёт до полного обнаружения (заводится на входе в состояние)
        countdown: CountdownTimer,
    },

    /// Полное обнаружение — преследуем текущую позицию игрока каждый тик
    ChasingPlayer,

    /// Игрок пропал из виду — идём к точке, где видели его в последний раз
    MoveToLastKnownPosition {
        /// Снапшот позиции игрока в момент потери видимости
        last_known: Vec3,
    },

    /// Дошли до последней известной точки — осматриваемся
    LookingForPlayer {
        /// Терпение: сколько ещё искать прежде чем сдаться
        patience: CountdownTimer,
    },

    /// Поиск не дал ничего — возвращаемся на пост
    ReturningHome,
}

impl AgentState for RobotState {
    fn tag(&self) -> &'static str {
        match self {
            RobotState::Idle => "Idle",
            RobotState::DetectingPlayer { .. } => "DetectingPlayer",
            RobotState::ChasingPlayer => "ChasingPlayer",
            RobotState::MoveToLastKnownPosition { .. } => "MoveToLastKnownPosition",
            RobotState::LookingForPlayer { .. } => "LookingForPlayer",
            RobotState::ReturningHome => "ReturningHome",
        }
    }
}

/// Параметры восприятия робота (неизменяемы после спавна)
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[reflect(Component)]
pub struct RobotConfig {
    /// Полный угол конуса зрения (градусы)
    pub field_of_view: f32,
    /// Секунды непрерывной видимости до полного обнаружения
    pub detection_time: f32,
    /// Допуск прибытия: остаток пути ≤ этого — значит дошли (метры)
    pub stopped_distance: f32,
    /// Секунды бесплодного поиска до возвращения на пост
    pub return_home_time: f32,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            field_of_view: 90.0,
            detection_time: 2.0,
            stopped_distance: 0.5,
            return_home_time: 5.0,
        }
    }
}

/// Ошибки конфигурации робота — ловим на setup'е, а не молчаливым
/// "робот почему-то никого не видит" в рантайме
#[derive(Debug, Error, PartialEq)]
pub enum RobotConfigError {
    #[error("field_of_view must be in (0, 360], got {0}")]
    InvalidFieldOfView(f32),
    #[error("detection_time must be positive, got {0}")]
    NonPositiveDetectionTime(f32),
    #[error("stopped_distance must not be negative, got {0}")]
    NegativeStoppedDistance(f32),
    #[error("return_home_time must be positive, got {0}")]
    NonPositiveReturnHomeTime(f32),
}

impl RobotConfig {
    pub fn validate(&self) -> Result<(), RobotConfigError> {
        if !(self.field_of_view > 0.0 && self.field_of_view <= 360.0) {
            return Err(RobotConfigError::InvalidFieldOfView(self.field_of_view));
        }
        if !(self.detection_time > 0.0) {
            return Err(RobotConfigError::NonPositiveDetectionTime(self.detection_time));
        }
        if self.stopped_distance < 0.0 {
            return Err(RobotConfigError::NegativeStoppedDistance(self.stopped_distance));
        }
        if !(self.return_home_time > 0.0) {
            return Err(RobotConfigError::NonPositiveReturnHomeTime(self.return_home_time));
        }
        Ok(())
    }
}

//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - robot: робот-охранник (marker, пост, spawn helper)
//! - movement: интерфейс навигации (MovementCommand, NavAgent, MovementSpeed)
//! - player: игрок как цель восприятия (Player, Detectable, StunState)
//! - world: разметка уровня (SpawnPoint, SafeZone)

pub mod movement;
pub mod player;
pub mod robot;
pub mod world;

// Re-exports для удобного импорта
pub use movement::*;
pub use player::*;
pub use robot::*;
pub use world::*;

//! Headless locomotion executor.
//!
//! В полной игре MovementCommand исполняет tactical-слой движка
//! (NavigationAgent + физика); симуляция его только просит. Этот модуль —
//! headless-замена: двигает Transform по прямой с MovementSpeed и ведёт
//! NavAgent::remaining_distance, чтобы FSM и тесты работали без движка.

use bevy::prelude::*;

use crate::components::{MovementCommand, MovementSpeed, NavAgent};
use crate::SimulationSet;

pub struct NavigationPlugin;

impl Plugin for NavigationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            drive_nav_agents.in_set(SimulationSet::Navigation),
        );
    }
}

/// Система: исполнение MovementCommand.
///
/// Idle не трогает текущую цель (команда "ничего нового"), Stop сбрасывает
/// путь, FollowEntity перенацеливается на позицию цели каждый тик.
/// Без пути remaining_distance держим в INFINITY — иначе состояние,
/// проверившее прибытие сразу после входа, увидит ложный "дошёл".
pub fn drive_nav_agents(
    mut agents: Query<(
        &MovementCommand,
        &MovementSpeed,
        &mut NavAgent,
        &mut Transform,
    )>,
    targets: Query<&Transform, Without<NavAgent>>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (command, speed, mut nav, mut transform) in agents.iter_mut() {
        match command {
            MovementCommand::Idle => {}
            MovementCommand::MoveToPosition { target } => {
                nav.destination = Some(*target);
            }
            MovementCommand::FollowEntity { target } => {
                nav.destination = targets.get(*target).map(|t| t.translation).ok();
            }
            MovementCommand::Stop => {
                nav.destination = None;
            }
        }

        let Some(destination) = nav.destination else {
            nav.remaining_distance = f32::INFINITY;
            continue;
        };

        // Разворачиваемся по ходу движения (по горизонтали)
        let to_destination = destination - transform.translation;
        let flat = Vec3::new(to_destination.x, 0.0, to_destination.z);
        if flat.length_squared() > 1e-6 {
            let look_target = transform.translation + flat;
            transform.look_at(look_target, Vec3::Y);
        }

        let (new_position, remaining) =
            step_toward(transform.translation, destination, speed.speed * delta);
        transform.translation = new_position;
        nav.remaining_distance = remaining;
    }
}

/// Шаг по прямой к цели. Возвращает новую позицию и остаток пути после шага;
/// цель ближе шага — встаём ровно на неё.
pub(crate) fn step_toward(from: Vec3, to: Vec3, step: f32) -> (Vec3, f32) {
    let distance = from.distance(to);
    if distance <= step {
        return (to, 0.0);
    }
    let direction = (to - from) / distance;
    (from + direction * step, distance - step)
}

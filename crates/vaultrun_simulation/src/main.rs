//! Headless демо VAULTRUN
//!
//! Запускает Bevy App без рендера: игрок по скрипту выходит из-за стены,
//! поднимает артефакт (alert!), робот замечает, догоняет и оглушает.
//! Все переходы FSM и презентационные события уходят в логгер.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use vaultrun_simulation::*;

/// Скриптовый маршрут игрока (замена input-слоя в headless демо)
#[derive(Component, Debug)]
struct ScriptedPath {
    waypoints: Vec<Vec3>,
    next: usize,
    speed: f32,
}

fn drive_scripted_path(
    mut walkers: Query<(&mut Transform, &mut ScriptedPath)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut transform, mut path) in walkers.iter_mut() {
        let Some(&waypoint) = path.waypoints.get(path.next) else {
            continue; // маршрут пройден
        };

        let to_waypoint = waypoint - transform.translation;
        let step = path.speed * delta;
        if to_waypoint.length() <= step {
            transform.translation = waypoint;
            path.next += 1;
        } else {
            transform.translation += to_waypoint.normalize() * step;
        }
    }
}

fn log_presentation_events(mut events: EventReader<PresentationEvent>) {
    for event in events.read() {
        match event {
            PresentationEvent::Walking { robot, walking } => {
                log(&format!("[anim] {:?} walking = {}", robot, walking));
            }
            PresentationEvent::DetectionIndicator { robot, visible } => {
                log(&format!("[hud] {:?} indicator = {}", robot, visible));
            }
            PresentationEvent::DetectionProgress { robot, percent } => {
                log(&format!(
                    "[hud] {:?} detection {}",
                    robot,
                    ai::progress_label(*percent)
                ));
            }
        }
    }
}

fn main() {
    let seed = 42;
    init_logger();
    println!("Starting VAULTRUN headless demo (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin)
        .add_systems(FixedUpdate, drive_scripted_path.before(SimulationSet::Ai))
        .add_systems(FixedUpdate, log_presentation_events.after(SimulationSet::Game))
        // Ровно один FixedUpdate тик на app.update()
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / 60.0,
        )));

    // Стена, за которой прячется игрок
    app.insert_resource(SightBlockers::with_occluders(vec![Occluder::new(
        Vec3::new(-6.0, 0.0, -9.0),
        Vec3::new(-2.0, 3.0, -7.0),
    )]));

    let world = app.world_mut();

    // Робот на посту, смотрит вдоль -Z
    {
        let mut commands = world.commands();
        spawn_robot(
            &mut commands,
            RobotConfig::default(),
            Transform::from_xyz(0.0, 0.0, 0.0),
        )
        .expect("default robot config is valid");

        // Артефакт и safe zone
        spawn_artifact(&mut commands, Vec3::new(0.0, 0.0, -12.0));
        commands.spawn((
            SafeZone { radius: 2.0 },
            Transform::from_xyz(-12.0, 0.0, -14.0),
        ));
    }

    // Игрок за стеной, скрипт ведёт его к артефакту и дальше к safe zone
    world.spawn((
        Player,
        Detectable(true),
        StunState::default(),
        HeldArtifact(None),
        Transform::from_xyz(-4.0, 0.0, -10.0),
        ScriptedPath {
            waypoints: vec![Vec3::new(0.0, 0.0, -12.0), Vec3::new(-12.0, 0.0, -14.0)],
            next: 0,
            speed: 1.5,
        },
    ));
    world.flush();

    // 900 тиков = 15 секунд симуляции
    for tick in 0..900 {
        app.update();

        if tick % 120 == 0 {
            let entity_count = app.world().entities().len();
            println!("Tick {}: {} entities", tick, entity_count);
        }
    }

    println!("Demo complete!");
}

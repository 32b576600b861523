//! Сценарные тесты игровой обвязки: подбор → alert → погоня → поимка →
//! стан → дроп; стэш всех артефактов → победа; рестарт уровня.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use vaultrun_simulation::*;

const DT: f64 = 0.1;

#[derive(Resource, Default)]
struct CapturedEvents(Vec<PresentationEvent>);

fn capture_presentation(
    mut events: EventReader<PresentationEvent>,
    mut captured: ResMut<CapturedEvents>,
) {
    for event in events.read() {
        captured.0.push(event.clone());
    }
}

fn create_test_app() -> App {
    let mut app = create_headless_app(7);
    app.add_plugins(SimulationPlugin)
        .init_resource::<CapturedEvents>()
        .add_systems(FixedUpdate, capture_presentation.after(SimulationSet::Game))
        .insert_resource(Time::<Fixed>::from_seconds(DT))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            DT,
        )));
    // Прогрев: первый update инициализирует время с нулевым delta
    app.update();
    app
}

fn spawn_thief(app: &mut App, position: Vec3) -> Entity {
    app.world_mut()
        .spawn((
            Player,
            Detectable(true),
            StunState::default(),
            HeldArtifact(None),
            Transform::from_translation(position),
        ))
        .id()
}

fn spawn_guard(app: &mut App, config: RobotConfig, transform: Transform) -> Entity {
    let world = app.world_mut();
    let robot = {
        let mut commands = world.commands();
        spawn_robot(&mut commands, config, transform).expect("test config is valid")
    };
    world.flush();
    robot
}

fn spawn_relic(app: &mut App, position: Vec3) -> Entity {
    let world = app.world_mut();
    let relic = {
        let mut commands = world.commands();
        spawn_artifact(&mut commands, position)
    };
    world.flush();
    relic
}

fn held(app: &App, player: Entity) -> Option<Entity> {
    app.world().get::<HeldArtifact>(player).unwrap().0
}

fn stunned(app: &App, player: Entity) -> bool {
    app.world().get::<StunState>(player).unwrap().stunned()
}

#[test]
fn test_pickup_alerts_nearby_guard() {
    let mut app = create_test_app();
    let player = spawn_thief(&mut app, Vec3::new(0.0, 0.0, 0.0));
    let relic = spawn_relic(&mut app, Vec3::new(0.0, 0.0, -0.5));
    // Охранник смотрит ПРОЧЬ от игрока (не видит), но в радиусе alert'а
    let guard = spawn_guard(
        &mut app,
        RobotConfig::default(),
        Transform::from_xyz(0.0, 0.0, -8.0).looking_at(Vec3::new(0.0, 0.0, -20.0), Vec3::Y),
    );
    // Дальний охранник — вне alert_distance (15м)
    let far_guard = spawn_guard(
        &mut app,
        RobotConfig::default(),
        Transform::from_xyz(0.0, 0.0, -40.0),
    );

    // Тик 1: подбор (игрок в pickup-радиусе) → alert записан
    app.update();
    assert_eq!(held(&app, player), Some(relic));
    assert!(app.world().get::<Artifact>(relic).unwrap().picked_up);

    // Тик 2: alert доходит до охранников
    app.update();

    let captured = app.world().resource::<CapturedEvents>();
    let forced: Vec<Entity> = captured
        .0
        .iter()
        .filter_map(|event| match event {
            PresentationEvent::DetectionIndicator {
                robot,
                visible: true,
            } => Some(*robot),
            _ => None,
        })
        .collect();
    assert!(forced.contains(&guard), "nearby guard must be alerted by pickup");
    assert!(!forced.contains(&far_guard), "distant guard must not hear the alert");
}

#[test]
fn test_catch_stuns_player_and_drops_artifact() {
    let mut app = create_test_app();
    let player = spawn_thief(&mut app, Vec3::new(0.0, 0.0, -8.0));
    let relic = spawn_relic(&mut app, Vec3::new(0.0, 0.0, -8.5));
    // Охранник видит игрока сразу; короткий детект для скорости
    let config = RobotConfig {
        detection_time: 0.2,
        ..default()
    };
    spawn_guard(&mut app, config, Transform::from_xyz(0.0, 0.0, 0.0));

    // Подбор на первом тике
    app.update();
    assert_eq!(held(&app, player), Some(relic));

    // Детект → погоня → поимка (8м при 2 м/с ≈ 4с)
    let mut guard_ticks = 0;
    while !stunned(&app, player) && guard_ticks < 200 {
        app.update();
        guard_ticks += 1;
    }
    assert!(stunned(&app, player), "guard never caught the player");

    // Артефакт выпал
    assert_eq!(held(&app, player), None);
    assert!(!app.world().get::<Artifact>(relic).unwrap().picked_up);
    assert!(!app.world().get::<StunState>(player).unwrap().can_pickup());

    // Стан отпускает через stun_duration (3.0s = 30 тиков)
    let mut recovery_ticks = 0;
    while stunned(&app, player) && recovery_ticks < 40 {
        app.update();
        recovery_ticks += 1;
    }
    assert!(!stunned(&app, player), "stun never wore off");
    assert!((29..=32).contains(&recovery_ticks), "stun lasted {} ticks", recovery_ticks);
}

#[test]
fn test_stashing_all_artifacts_wins_once() {
    let mut app = create_test_app();
    spawn_thief(&mut app, Vec3::new(0.0, 0.0, 0.0));
    let relic = spawn_relic(&mut app, Vec3::new(0.0, 0.0, -0.5));
    // Safe zone прямо на игроке: подбор и стэш в один тик
    app.world_mut().spawn((
        SafeZone { radius: 2.0 },
        Transform::from_xyz(0.0, 0.0, 0.0),
    ));

    app.update();
    app.update();

    assert!(app.world().get::<Artifact>(relic).unwrap().stashed);
    assert!(app.world().resource::<GameState>().won);

    // Победа объявляется один раз: GameWon не копится
    let won_events = app.world().resource::<Events<GameWon>>();
    assert!(won_events.len() <= 1);
}

#[test]
fn test_player_is_placed_at_registered_spawn_point() {
    // Без прогрева: Startup должен увидеть расставленные точки
    let mut app = create_headless_app(7);
    app.add_plugins(SimulationPlugin)
        .insert_resource(Time::<Fixed>::from_seconds(DT))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            DT,
        )));

    let player = spawn_thief(&mut app, Vec3::ZERO);
    let spawn_a = Vec3::new(10.0, 0.0, 3.0);
    let spawn_b = Vec3::new(-7.0, 0.0, 12.0);
    app.world_mut().spawn((
        SpawnPoint {
            kind: SpawnKind::Player,
        },
        Transform::from_translation(spawn_a),
    ));
    app.world_mut().spawn((
        SpawnPoint {
            kind: SpawnKind::Player,
        },
        Transform::from_translation(spawn_b),
    ));
    // Robot-точка не должна участвовать в выборе
    app.world_mut().spawn((
        SpawnPoint {
            kind: SpawnKind::Robot,
        },
        Transform::from_translation(Vec3::new(99.0, 0.0, 99.0)),
    ));

    app.update();

    let position = app.world().get::<Transform>(player).unwrap().translation;
    assert!(
        position == spawn_a || position == spawn_b,
        "player was not placed at a player spawn point: {:?}",
        position
    );
}

#[test]
#[should_panic(expected = "invalid GameRules")]
fn test_invalid_game_rules_fail_fast() {
    let mut app = create_headless_app(7);
    app.add_plugins(SimulationPlugin);
    app.insert_resource(GameRules {
        alert_distance: -1.0,
        ..GameRules::default()
    });
    // Startup-валидация роняет setup
    app.update();
}

#[test]
fn test_restart_resets_guards_and_artifacts() {
    let mut app = create_test_app();
    let player = spawn_thief(&mut app, Vec3::new(0.0, 0.0, -5.0));
    let relic_home = Vec3::new(0.0, 0.0, -4.5);
    let relic = spawn_relic(&mut app, relic_home);
    let guard_post = Vec3::new(0.0, 0.0, 0.0);
    let config = RobotConfig {
        detection_time: 0.2,
        ..default()
    };
    let guard = spawn_guard(&mut app, config, Transform::from_translation(guard_post));

    // Игрок подбирает артефакт, охранник уходит в погоню с поста
    for _ in 0..10 {
        app.update();
    }
    let machine = app.world().get::<AgentMachine<RobotState>>(guard).unwrap();
    assert_ne!(machine.current().tag(), "Idle");
    assert_eq!(held(&app, player), Some(relic));

    // Рестарт уровня
    app.world_mut().send_event(RestartLevel);
    app.update();

    let machine = app.world().get::<AgentMachine<RobotState>>(guard).unwrap();
    assert_eq!(machine.current().tag(), "Idle");
    let guard_pos = app.world().get::<Transform>(guard).unwrap().translation;
    assert_eq!(guard_pos, guard_post);

    let artifact = app.world().get::<Artifact>(relic).unwrap();
    assert!(!artifact.picked_up);
    assert!(!artifact.stashed);
    let relic_pos = app.world().get::<Transform>(relic).unwrap().translation;
    assert_eq!(relic_pos, relic_home);

    assert_eq!(held(&app, player), None);
    assert!(!app.world().resource::<GameState>().won);
}

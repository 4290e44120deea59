//! Enemy AI integration test
//!
//! Headless App + SimulationPlugin, fixed tick'и вручную.
//!
//! Проверяем:
//! - distance сценарий Wandering → Chasing → Attacking через ECS
//! - EnemyStateChanged / AttackExecuted events
//! - EnemyDefeated ровно один раз по любому пути (DefeatEnemy, Active(false), despawn)
//! - буферы событий не растут при долгом прогоне

use bevy::prelude::*;
use enemy_simulation::ai::{
    AttackExecuted, DefeatCause, DefeatEnemy, EnemyDefeated, EnemyStateChanged,
    SwitchAttackBehavior,
};
use enemy_simulation::*;

/// Всё, что пришло в `Events<E>` за тест (читается каждый tick)
#[derive(Resource)]
struct Recorded<E: Event>(Vec<E>);

impl<E: Event> Default for Recorded<E> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

fn record_events<E: Event + Clone>(mut reader: EventReader<E>, mut recorded: ResMut<Recorded<E>>) {
    recorded.0.extend(reader.read().cloned());
}

/// Helper: App со всеми plugins + запись AI событий
fn create_enemy_app(seed: u64) -> App {
    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin)
        .init_resource::<Recorded<EnemyStateChanged>>()
        .init_resource::<Recorded<AttackExecuted>>()
        .init_resource::<Recorded<EnemyDefeated>>()
        .add_systems(
            FixedUpdate,
            (
                record_events::<EnemyStateChanged>,
                record_events::<AttackExecuted>,
                record_events::<EnemyDefeated>,
            )
                .after(ai::systems::apply_enemy_velocity),
        );
    app
}

/// Враг стоит на месте (скорости 0), атака без задержек
fn stationary_config() -> EnemyConfig {
    EnemyConfig {
        label: "stationary".to_string(),
        wander_speed: 0.0,
        chase_speed: 0.0,
        windup_ticks: 0,
        attack_recovery_ticks: 0,
        ..EnemyConfig::with_distances(2.0, 10.0)
    }
}

fn spawn_player(app: &mut App, x: f32) -> Entity {
    app.world_mut()
        .spawn((Player, Transform::from_xyz(x, 0.0, 0.0)))
        .id()
}

fn move_player(app: &mut App, player: Entity, x: f32) {
    if let Some(mut transform) = app.world_mut().get_mut::<Transform>(player) {
        transform.translation = Vec3::new(x, 0.0, 0.0);
    }
}

fn enemy_state(app: &App, enemy: Entity) -> EnemyState {
    app.world()
        .get::<EnemyController>(enemy)
        .expect("enemy has controller")
        .state()
}

fn collect<E: Event + Clone>(app: &App) -> Vec<E> {
    app.world().resource::<Recorded<E>>().0.clone()
}

#[test]
fn test_distance_scenario_through_ecs() {
    let mut app = create_enemy_app(42);
    let player = spawn_player(&mut app, 15.0);
    let enemy = spawn_enemy(app.world_mut(), stationary_config(), Vec3::ZERO, Some(player))
        .expect("valid config");

    run_fixed_tick(&mut app);
    assert_eq!(enemy_state(&app, enemy), EnemyState::Wandering);

    move_player(&mut app, player, 5.0);
    run_fixed_tick(&mut app);
    assert_eq!(enemy_state(&app, enemy), EnemyState::Chasing);

    move_player(&mut app, player, 1.0);
    run_fixed_tick(&mut app);
    assert_eq!(enemy_state(&app, enemy), EnemyState::Attacking);

    // Цель исчезла → tick no-op, state остаётся
    app.world_mut().despawn(player);
    run_fixed_tick(&mut app);
    run_fixed_tick(&mut app);
    assert_eq!(enemy_state(&app, enemy), EnemyState::Attacking);
    assert_eq!(
        app.world().get::<EnemyController>(enemy).and_then(|c| c.target()),
        None
    );

    let changes = collect::<EnemyStateChanged>(&app);
    assert_eq!(
        changes,
        vec![
            EnemyStateChanged { entity: enemy, from: None, to: EnemyState::Wandering },
            EnemyStateChanged {
                entity: enemy,
                from: Some(EnemyState::Wandering),
                to: EnemyState::Chasing,
            },
            EnemyStateChanged {
                entity: enemy,
                from: Some(EnemyState::Chasing),
                to: EnemyState::Attacking,
            },
        ]
    );
}

#[test]
fn test_attack_behavior_switch_through_ecs() {
    let mut app = create_enemy_app(7);
    let player = spawn_player(&mut app, 1.0);
    let enemy = spawn_enemy(app.world_mut(), stationary_config(), Vec3::ZERO, Some(player))
        .expect("valid config");

    run_fixed_tick(&mut app);
    app.world_mut().send_event(SwitchAttackBehavior {
        entity: enemy,
        behavior: AttackBehavior::Blows,
    });
    run_fixed_tick(&mut app);

    let attacks = collect::<AttackExecuted>(&app);
    assert_eq!(attacks.len(), 2);
    assert_eq!(attacks[0].behavior, AttackBehavior::Explodes);
    assert_eq!(attacks[1].behavior, AttackBehavior::Blows);
    assert!(matches!(attacks[1].effect, AttackEffect::Blow { .. }));

    // Смена стратегии не вызывает переходов
    let changes = collect::<EnemyStateChanged>(&app);
    assert_eq!(changes.len(), 2); // spawn → Wandering, Wandering → Attacking
}

#[test]
fn test_chasing_enemy_moves_toward_player() {
    let mut app = create_enemy_app(1);
    let player = spawn_player(&mut app, 6.0);
    let config = EnemyConfig {
        chase_speed: 6.0,
        ..stationary_config()
    };
    let enemy = spawn_enemy(app.world_mut(), config, Vec3::ZERO, Some(player))
        .expect("valid config");

    for _ in 0..10 {
        run_fixed_tick(&mut app);
    }

    let position = app.world().get::<Transform>(enemy).expect("transform").translation;
    assert!(position.x > 0.5, "enemy should close in, got {:?}", position);
    assert!(position.x < 6.0);
    assert!(position.y.abs() < 1e-5 && position.z.abs() < 1e-5);
}

#[test]
fn test_defeat_request_fires_once() {
    let mut app = create_enemy_app(3);
    let player = spawn_player(&mut app, 5.0);
    let enemy = spawn_enemy(app.world_mut(), stationary_config(), Vec3::ZERO, Some(player))
        .expect("valid config");

    run_fixed_tick(&mut app);
    app.world_mut().send_event(DefeatEnemy { entity: enemy });
    app.world_mut().send_event(DefeatEnemy { entity: enemy });
    run_fixed_tick(&mut app);
    run_fixed_tick(&mut app);

    // Деактивация через defeat + despawn после — всё равно одно событие
    app.world_mut().despawn(enemy);
    run_fixed_tick(&mut app);

    let defeats = collect::<EnemyDefeated>(&app);
    assert_eq!(
        defeats,
        vec![EnemyDefeated { entity: enemy, cause: DefeatCause::Defeated }]
    );
}

#[test]
fn test_external_deactivation_counts_as_defeat() {
    let mut app = create_enemy_app(4);
    let player = spawn_player(&mut app, 20.0);
    let enemy = spawn_enemy(app.world_mut(), stationary_config(), Vec3::ZERO, Some(player))
        .expect("valid config");

    run_fixed_tick(&mut app);
    if let Some(mut active) = app.world_mut().get_mut::<Active>(enemy) {
        active.0 = false;
    }
    run_fixed_tick(&mut app);

    // Повторный запрос поражения — уже no-op
    app.world_mut().send_event(DefeatEnemy { entity: enemy });
    run_fixed_tick(&mut app);

    let defeats = collect::<EnemyDefeated>(&app);
    assert_eq!(
        defeats,
        vec![EnemyDefeated { entity: enemy, cause: DefeatCause::Deactivated }]
    );
    assert!(app.world().get::<EnemyController>(enemy).is_some_and(|c| c.is_defeated()));
}

#[test]
fn test_despawn_without_defeat_notifies() {
    let mut app = create_enemy_app(5);
    let player = spawn_player(&mut app, 20.0);
    let enemy = spawn_enemy(app.world_mut(), stationary_config(), Vec3::ZERO, Some(player))
        .expect("valid config");

    run_fixed_tick(&mut app);
    app.world_mut().despawn(enemy);
    run_fixed_tick(&mut app);

    let defeats = collect::<EnemyDefeated>(&app);
    assert_eq!(
        defeats,
        vec![EnemyDefeated { entity: enemy, cause: DefeatCause::Deactivated }]
    );
}

#[test]
fn test_spawn_rejects_invalid_thresholds() {
    let mut app = create_enemy_app(6);
    let result = spawn_enemy(
        app.world_mut(),
        EnemyConfig::with_distances(10.0, 5.0),
        Vec3::ZERO,
        None,
    );

    assert!(matches!(result, Err(ConfigError::UnreachableChase { .. })));
    let mut query = app.world_mut().query::<&EnemyController>();
    assert_eq!(query.iter(app.world()).count(), 0);
}

#[test]
fn test_event_buffers_stay_bounded() {
    let mut app = create_enemy_app(8);
    let player = spawn_player(&mut app, 1.0);
    spawn_enemy(app.world_mut(), stationary_config(), Vec3::ZERO, Some(player))
        .expect("valid config");

    // Атака каждый tick: 10 000 AttackExecuted
    const TICKS: usize = 10_000;
    for _ in 0..TICKS {
        run_fixed_tick(&mut app);
    }

    // Readers видят всё, а в буфере только последние два tick'а
    assert_eq!(collect::<AttackExecuted>(&app).len(), TICKS);
    assert!(app.world().resource::<Events<AttackExecuted>>().len() <= 2);
    assert!(app.world().resource::<Events<EnemyStateChanged>>().len() <= 2);
}

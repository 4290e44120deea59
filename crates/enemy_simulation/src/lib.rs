//! Enemy AI Simulation Core
//!
//! Headless ECS-симуляция врагов на Bevy 0.16.
//!
//! Движок-host (рендер, физика, анимация, input) снаружи: он даёт позиции
//! и activation primitive, симуляция решает что враг делает.
//! - `ai` — EnemyController FSM + attack strategies + FixedUpdate системы
//! - `components` — Velocity / Active / EnemyTarget
//! - `logger` — глобальный LogPrinter sink

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Частота FixedUpdate (Hz)
pub const FIXED_HZ: f64 = 60.0;

// Публичные модули
pub mod ai;
pub mod components;
pub mod logger;

// Re-export базовых типов для удобства
pub use ai::{
    spawn_enemy, AttackBehavior, AttackEffect, ConfigError, EnemyAIPlugin, EnemyConfig,
    EnemyController, EnemyHost, EnemyState, KinematicBody, TickOutcome,
};
pub use components::*;
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, LogLevel,
    LogPrinter,
};

/// Главный plugin симуляции
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Fixed timestep 60Hz для simulation tick
        app.insert_resource(Time::<Fixed>::from_hz(FIXED_HZ));

        // Seed от create_headless_app не перетираем
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app.add_plugins(EnemyAIPlugin);
    }
}

/// App-wide RNG: из него `spawn_enemy` раздаёт patrol seed'ы врагам
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(seed);
        Self { rng, seed }
    }
}

/// Headless App: MinimalPlugins + seeded `DeterministicRng` + 60Hz fixed step.
/// Tick'и гоняются вручную через `run_fixed_tick`.
pub fn create_headless_app(seed: u64) -> App {
    init_logger();

    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(DeterministicRng::new(seed));
    app.insert_resource(Time::<Fixed>::from_hz(FIXED_HZ));
    app
}

/// Один fixed tick без real time: сдвигаем `Time<Fixed>` на timestep,
/// ротируем буферы AI событий и прогоняем FixedUpdate. Для headless прогонов
/// и тестов.
///
/// События, отправленные между tick'ами (команды, despawn observer), видны
/// readers этого и следующего tick'а.
pub fn run_fixed_tick(app: &mut App) {
    let world = app.world_mut();
    if let Some(mut time) = world.get_resource_mut::<Time<Fixed>>() {
        let timestep = time.timestep();
        time.advance_by(timestep);
    }
    ai::update_enemy_events(world);
    world.run_schedule(FixedUpdate);
}

/// Snapshot врагов для сравнения детерминизма: FSM state, стратегия,
/// patrol точка и позиция каждого `EnemyController`, по Entity index.
pub fn enemy_snapshot(world: &mut World) -> Vec<u8> {
    let mut query = world.query::<(Entity, &EnemyController, &Transform)>();
    let mut enemies: Vec<_> = query.iter(world).collect();
    enemies.sort_by_key(|(entity, _, _)| entity.index());

    let mut snapshot = Vec::new();
    for (entity, controller, transform) in enemies {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(
            format!(
                "{:?}|{:?}|{}|{:?}|{:?}",
                controller.state(),
                controller.attack_behavior(),
                controller.is_defeated(),
                controller.patrol_point(),
                transform.translation,
            )
            .as_bytes(),
        );
    }

    snapshot
}

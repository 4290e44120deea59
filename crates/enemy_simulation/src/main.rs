//! Headless симуляция врага
//!
//! Игрок проходит мимо врага по прямой: враг патрулирует, замечает,
//! догоняет, атакует (со сменой стратегии), затем его побеждают.

use bevy::prelude::*;
use enemy_simulation::ai::{
    AttackExecuted, DefeatEnemy, EnemyDefeated, EnemyStateChanged, SwitchAttackBehavior,
};
use enemy_simulation::{
    create_headless_app, run_fixed_tick, spawn_enemy, AttackBehavior, EnemyConfig, Player,
    SimulationPlugin,
};

const TICKS: usize = 600;

fn main() {
    let seed = 42;
    println!("Starting enemy AI headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);

    let player = app
        .world_mut()
        .spawn((Player, Transform::from_xyz(20.0, 0.0, 0.0)))
        .id();

    let config = EnemyConfig {
        label: "grunt".to_string(),
        ..EnemyConfig::default()
    };
    let enemy = match spawn_enemy(app.world_mut(), config, Vec3::ZERO, Some(player)) {
        Ok(entity) => entity,
        Err(err) => {
            eprintln!("Invalid enemy config: {}", err);
            return;
        }
    };

    let mut state_cursor = app.world().resource::<Events<EnemyStateChanged>>().get_cursor();
    let mut attack_cursor = app.world().resource::<Events<AttackExecuted>>().get_cursor();
    let mut defeat_cursor = app.world().resource::<Events<EnemyDefeated>>().get_cursor();

    for tick in 0..TICKS {
        // Игрок идёт к врагу и дальше, 0.05м за tick
        if let Some(mut transform) = app.world_mut().get_mut::<Transform>(player) {
            transform.translation.x -= 0.05;
        }

        if tick == 300 {
            app.world_mut().send_event(SwitchAttackBehavior {
                entity: enemy,
                behavior: AttackBehavior::Aims,
            });
        }
        if tick == TICKS - 1 {
            app.world_mut().send_event(DefeatEnemy { entity: enemy });
        }

        // Один fixed tick (детерминированно, без real time)
        run_fixed_tick(&mut app);

        let world = app.world();
        for event in state_cursor.read(world.resource::<Events<EnemyStateChanged>>()) {
            println!("Tick {}: {:?} → {:?}", tick, event.from, event.to);
        }
        let attacks = attack_cursor
            .read(world.resource::<Events<AttackExecuted>>())
            .count();
        if attacks > 0 {
            println!("Tick {}: {} attack(s)", tick, attacks);
        }
        for event in defeat_cursor.read(world.resource::<Events<EnemyDefeated>>()) {
            println!("Tick {}: enemy {:?} defeated ({:?})", tick, event.entity, event.cause);
        }
    }

    println!("Simulation complete!");
}

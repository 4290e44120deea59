//! Enemy AI: FSM (Wandering / Chasing / Attacking) + attack strategies
//!
//! Ядро (`EnemyController`) не зависит от ECS — работает через `EnemyHost`.
//! `EnemyAIPlugin` подключает его к bevy через FixedUpdate системы.

use bevy::prelude::*;
use rand::Rng;

pub mod attack;
pub mod config;
pub mod controller;
pub mod events;
pub mod host;
pub mod state;
pub mod systems;


// Re-export основных типов
pub use attack::{AttackBehavior, AttackEffect, AttackTuning};
pub use config::{ConfigError, EnemyConfig};
pub use controller::{DefeatObserver, EnemyController, TickOutcome};
pub use events::{
    AttackExecuted, DefeatCause, DefeatEnemy, EnemyDefeated, EnemyEvent, EnemyStateChanged,
    SwitchAttackBehavior,
};
pub use host::{EnemyHost, KinematicBody};
pub use state::{select_state, EnemyState};

use crate::components::EnemyTarget;
use crate::DeterministicRng;

/// Enemy AI Plugin
///
/// Регистрирует AI системы в FixedUpdate для детерминизма.
/// Порядок выполнения:
/// 1. track_enemy_targets — опрос позиции цели
/// 2. process_enemy_commands — DefeatEnemy / SwitchAttackBehavior
/// 3. tick_enemies — FSM transitions + update state
/// 4. detect_deactivated_enemies — Active(false) извне → EnemyDefeated
/// 5. apply_enemy_velocity — Velocity → Transform
pub struct EnemyAIPlugin;

impl Plugin for EnemyAIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<EnemyStateChanged>()
            .add_event::<AttackExecuted>()
            .add_event::<EnemyDefeated>()
            .add_event::<DefeatEnemy>()
            .add_event::<SwitchAttackBehavior>();

        app.add_observer(systems::defeat_on_despawn);

        app.add_systems(
            FixedUpdate,
            (
                systems::track_enemy_targets,
                systems::process_enemy_commands,
                systems::tick_enemies,
                systems::detect_deactivated_enemies,
                systems::apply_enemy_velocity,
            )
                .chain(), // Последовательное выполнение для детерминизма
        );
    }
}

/// Swap/clear буферов AI событий, как `event_update_system` в `First`.
///
/// Нужен headless драйверу, который гоняет только FixedUpdate: без него
/// `Events<E>` растут без предела. Событие живёт два update'а, так что
/// `EventReader`/`EventCursor`, читающие каждый tick, ничего не теряют.
pub fn update_enemy_events(world: &mut World) {
    fn update<E: Event>(world: &mut World) {
        if let Some(mut events) = world.get_resource_mut::<Events<E>>() {
            events.update();
        }
    }

    update::<EnemyStateChanged>(world);
    update::<AttackExecuted>(world);
    update::<EnemyDefeated>(world);
    update::<DefeatEnemy>(world);
    update::<SwitchAttackBehavior>(world);
}

/// Спавнит врага с валидированным конфигом.
///
/// Если `config.seed` не задан и в мире есть `DeterministicRng`, seed patrol
/// RNG берётся из него: прогоны с одним seed совпадают. Явный seed не трогаем.
pub fn spawn_enemy(
    world: &mut World,
    mut config: EnemyConfig,
    position: Vec3,
    target: Option<Entity>,
) -> Result<Entity, ConfigError> {
    if config.seed.is_none() {
        if let Some(mut rng) = world.get_resource_mut::<DeterministicRng>() {
            config.seed = Some(rng.rng.gen());
        }
    }

    let controller = EnemyController::new(config)?;
    let label = controller.label().to_string();

    let entity = world
        .spawn((
            controller,
            Transform::from_translation(position),
            EnemyTarget(target),
        ))
        .id();

    crate::log_info(&format!("AI: spawned {} as {:?} at {:?}", label, entity, position));
    Ok(entity)
}

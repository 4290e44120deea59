//! Enemy AI systems (FixedUpdate)
//!
//! ECS ↔ EnemyController мост: Transform/Velocity/Active оборачиваются в
//! `EcsHost`, журнал controller'а превращается в bevy events.

use bevy::prelude::*;

use crate::components::{Active, EnemyTarget, Velocity};

use super::controller::EnemyController;
use super::events::{
    AttackExecuted, DefeatCause, DefeatEnemy, EnemyDefeated, EnemyEvent, EnemyStateChanged,
    SwitchAttackBehavior,
};
use super::host::EnemyHost;

/// EnemyHost поверх ECS компонентов одного врага
struct EcsHost<'a> {
    position: Vec3,
    velocity: Mut<'a, Velocity>,
    active: Mut<'a, Active>,
}

impl EnemyHost for EcsHost<'_> {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity.set_if_neq(Velocity(velocity));
    }

    fn set_active(&mut self, active: bool) {
        // set_if_neq: Changed<Active> только при реальной смене
        self.active.set_if_neq(Active(active));
    }
}

/// Журнал controller'а → ECS events
fn forward_events(
    entity: Entity,
    events: Vec<EnemyEvent>,
    state_changed: &mut EventWriter<EnemyStateChanged>,
    attacks: &mut EventWriter<AttackExecuted>,
    defeated: &mut EventWriter<EnemyDefeated>,
) {
    let mut exited = None;

    for event in events {
        match event {
            EnemyEvent::StateExited(state) => {
                exited = Some(state);
            }
            EnemyEvent::StateEntered(to) => {
                state_changed.write(EnemyStateChanged {
                    entity,
                    from: exited.take(),
                    to,
                });
            }
            EnemyEvent::AttackExecuted { behavior, effect } => {
                attacks.write(AttackExecuted {
                    entity,
                    behavior,
                    effect,
                });
            }
            EnemyEvent::Defeated(cause) => {
                defeated.write(EnemyDefeated { entity, cause });
            }
            EnemyEvent::AttackBehaviorChanged { .. } | EnemyEvent::AttackInterrupted(_) => {}
        }
    }
}

/// Система: опрос позиции цели (один раз за tick)
///
/// Despawned цель → None → warning в tick_enemies.
pub fn track_enemy_targets(
    mut enemies: Query<(&mut EnemyController, &EnemyTarget)>,
    targets: Query<&Transform>,
) {
    for (mut controller, target) in enemies.iter_mut() {
        let position = target
            .0
            .and_then(|entity| targets.get(entity).ok())
            .map(|transform| transform.translation);

        if controller.target() != position {
            controller.set_target(position);
        }
    }
}

/// Система: DefeatEnemy / SwitchAttackBehavior запросы
pub fn process_enemy_commands(
    mut defeat_requests: EventReader<DefeatEnemy>,
    mut switch_requests: EventReader<SwitchAttackBehavior>,
    mut enemies: Query<(&mut EnemyController, &Transform, &mut Velocity, &mut Active)>,
    mut state_changed: EventWriter<EnemyStateChanged>,
    mut attacks: EventWriter<AttackExecuted>,
    mut defeated: EventWriter<EnemyDefeated>,
) {
    for request in switch_requests.read() {
        let Ok((mut controller, ..)) = enemies.get_mut(request.entity) else {
            crate::log_warning(&format!(
                "AI: SwitchAttackBehavior for unknown enemy {:?}",
                request.entity
            ));
            continue;
        };

        controller.set_attack_behavior(request.behavior);
        let events = controller.drain_events();
        forward_events(request.entity, events, &mut state_changed, &mut attacks, &mut defeated);
    }

    for request in defeat_requests.read() {
        let Ok((mut controller, transform, velocity, active)) = enemies.get_mut(request.entity) else {
            crate::log_warning(&format!("AI: DefeatEnemy for unknown enemy {:?}", request.entity));
            continue;
        };

        let mut host = EcsHost {
            position: transform.translation,
            velocity,
            active,
        };
        controller.defeat(&mut host);

        let events = controller.drain_events();
        forward_events(request.entity, events, &mut state_changed, &mut attacks, &mut defeated);
    }
}

/// Система: FSM tick всех активных врагов
pub fn tick_enemies(
    mut enemies: Query<(Entity, &mut EnemyController, &Transform, &mut Velocity, &mut Active)>,
    mut state_changed: EventWriter<EnemyStateChanged>,
    mut attacks: EventWriter<AttackExecuted>,
    mut defeated: EventWriter<EnemyDefeated>,
) {
    for (entity, mut controller, transform, velocity, active) in enemies.iter_mut() {
        if !active.0 {
            continue;
        }

        let mut host = EcsHost {
            position: transform.translation,
            velocity,
            active,
        };
        controller.tick(&mut host);

        let events = controller.drain_events();
        forward_events(entity, events, &mut state_changed, &mut attacks, &mut defeated);
    }
}

/// Система: враг выключен не через defeat (кто-то выставил Active(false))
pub fn detect_deactivated_enemies(
    mut enemies: Query<(Entity, &mut EnemyController, &Active), Changed<Active>>,
    mut defeated: EventWriter<EnemyDefeated>,
) {
    for (entity, mut controller, active) in enemies.iter_mut() {
        if active.0 {
            continue;
        }

        controller.on_deactivated();

        for event in controller.drain_events() {
            if let EnemyEvent::Defeated(cause) = event {
                defeated.write(EnemyDefeated { entity, cause });
            }
        }
    }
}

/// Observer: despawn врага без defeat тоже считается поражением
pub fn defeat_on_despawn(
    trigger: Trigger<OnRemove, EnemyController>,
    mut enemies: Query<&mut EnemyController>,
    mut defeated: EventWriter<EnemyDefeated>,
) {
    let entity = trigger.target();
    let Ok(mut controller) = enemies.get_mut(entity) else {
        return;
    };

    if controller.on_deactivated() {
        defeated.write(EnemyDefeated {
            entity,
            cause: DefeatCause::Deactivated,
        });
    }
}

/// Система: интеграция Velocity → Transform (headless замена физики)
pub fn apply_enemy_velocity(
    mut query: Query<(&mut Transform, &Velocity, &Active), With<EnemyController>>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut transform, velocity, active) in query.iter_mut() {
        if active.0 && velocity.0 != Vec3::ZERO {
            transform.translation += velocity.0 * delta;
        }
    }
}

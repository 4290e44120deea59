//! Enemy AI events
//!
//! `EnemyEvent` — внутренний журнал controller'а (в порядке эмиссии).
//! ECS events (`EnemyStateChanged`, `AttackExecuted`, `EnemyDefeated`) —
//! то, что видят остальные системы и host.

use bevy::prelude::*;

use super::attack::{AttackBehavior, AttackEffect};
use super::state::EnemyState;

/// Откуда пришло поражение
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum DefeatCause {
    /// Явный `defeat()`
    Defeated,
    /// Деактивирован другим путём (Active = false, despawn)
    Deactivated,
}

/// Журнал controller'а, забирается через `drain_events()`
#[derive(Debug, Clone, PartialEq)]
pub enum EnemyEvent {
    StateExited(EnemyState),
    StateEntered(EnemyState),
    AttackBehaviorChanged {
        from: AttackBehavior,
        to: AttackBehavior,
    },
    AttackExecuted {
        behavior: AttackBehavior,
        effect: AttackEffect,
    },
    /// Выход из Attacking до окончания wind-up
    AttackInterrupted(AttackBehavior),
    Defeated(DefeatCause),
}

/// ECS: враг сменил state
#[derive(Event, Debug, Clone, PartialEq)]
pub struct EnemyStateChanged {
    pub entity: Entity,
    /// None — первый вход (старт FSM)
    pub from: Option<EnemyState>,
    pub to: EnemyState,
}

/// ECS: враг выполнил шаг атаки
#[derive(Event, Debug, Clone, PartialEq)]
pub struct AttackExecuted {
    pub entity: Entity,
    pub behavior: AttackBehavior,
    pub effect: AttackEffect,
}

/// ECS: враг побеждён (ровно один раз на врага)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct EnemyDefeated {
    pub entity: Entity,
    pub cause: DefeatCause,
}

/// ECS input: запрос на поражение врага (от combat/host)
#[derive(Event, Debug, Clone)]
pub struct DefeatEnemy {
    pub entity: Entity,
}

/// ECS input: сменить стратегию атаки
#[derive(Event, Debug, Clone)]
pub struct SwitchAttackBehavior {
    pub entity: Entity,
    pub behavior: AttackBehavior,
}

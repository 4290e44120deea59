//! ECS компоненты вокруг EnemyController
//!
//! - Velocity: rigid-body выход FSM (интегрирует `apply_enemy_velocity` или host)
//! - Active: activation primitive (false = снят со сцены/scheduling)
//! - EnemyTarget: за кем следит враг (Transform цели опрашивается каждый tick)
//! - Player: маркер цели для headless сценариев

use bevy::prelude::*;

/// Желаемая скорость (м/с), пишется FSM
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Velocity(pub Vec3);

/// Активен ли объект в сцене
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Active(pub bool);

impl Default for Active {
    fn default() -> Self {
        Self(true)
    }
}

/// Отслеживаемая цель. None / despawned → tick врага no-op с warning.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct EnemyTarget(pub Option<Entity>);

#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Player;

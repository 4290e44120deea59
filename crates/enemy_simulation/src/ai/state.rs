//! Enemy FSM states: Wandering → Chasing → Attacking
//!
//! States stateless (unit enum). Runtime данные state'ов (patrol route,
//! attack timer) лежат в `EnemyController`, state только решает что с ними делать.
//!
//! Переходы выбирает `select_state` по дистанции до цели:
//! - distance ≤ attack → Attacking
//! - attack < distance ≤ chase → Chasing
//! - иначе → Wandering

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::controller::EnemyController;
use super::events::EnemyEvent;
use super::host::EnemyHost;

/// Patrol точка считается достигнутой ближе этого (метры)
const PATROL_ARRIVE_DISTANCE: f32 = 0.5;

/// Enemy FSM состояния
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Reflect)]
pub enum EnemyState {
    /// Wandering — патруль вокруг себя, цель далеко
    #[default]
    Wandering,
    /// Chasing — бежим к цели
    Chasing,
    /// Attacking — стоим и атакуем текущим AttackBehavior
    Attacking,
}

/// Transition policy: какой state нужен на этой дистанции
///
/// Границы включительно в сторону ближнего state. NaN (сломанный host) → Wandering.
pub fn select_state(distance: f32, attack_distance: f32, chase_distance: f32) -> EnemyState {
    if distance <= attack_distance {
        EnemyState::Attacking
    } else if distance <= chase_distance {
        EnemyState::Chasing
    } else {
        EnemyState::Wandering
    }
}

/// Runtime данные Wandering
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PatrolRoute {
    pub point: Option<Vec3>,
    /// Тиков до принудительной смены точки
    pub ticks_left: u32,
}

/// Runtime данные Attacking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttackTimer {
    /// Тиков до следующего execute
    pub ticks_left: u32,
    /// true пока не было ни одного execute после входа
    pub winding_up: bool,
}

impl EnemyState {
    pub(crate) fn enter<H: EnemyHost + ?Sized>(self, enemy: &mut EnemyController, host: &mut H) {
        enemy.emit(EnemyEvent::StateEntered(self));

        match self {
            EnemyState::Wandering => {
                enemy.retarget_patrol(host.position());
            }
            EnemyState::Chasing => {}
            EnemyState::Attacking => {
                // Wind-up: стоим на месте до первого удара
                host.set_velocity(Vec3::ZERO);
                enemy.attack_timer = AttackTimer {
                    ticks_left: enemy.config.windup_ticks,
                    winding_up: true,
                };
            }
        }
    }

    pub(crate) fn update<H: EnemyHost + ?Sized>(
        self,
        enemy: &mut EnemyController,
        host: &mut H,
        target: Vec3,
    ) {
        match self {
            EnemyState::Wandering => {
                let position = host.position();
                let reached = enemy
                    .patrol
                    .point
                    .is_none_or(|point| position.distance(point) <= PATROL_ARRIVE_DISTANCE);

                if reached || enemy.patrol.ticks_left == 0 {
                    enemy.retarget_patrol(position);
                } else {
                    enemy.patrol.ticks_left -= 1;
                }

                let direction = enemy
                    .patrol
                    .point
                    .map_or(Vec3::ZERO, |point| (point - position).normalize_or_zero());
                host.set_velocity(direction * enemy.config.wander_speed);
            }

            EnemyState::Chasing => {
                let direction = (target - host.position()).normalize_or_zero();
                host.set_velocity(direction * enemy.config.chase_speed);
            }

            EnemyState::Attacking => {
                host.set_velocity(Vec3::ZERO);

                if enemy.attack_timer.ticks_left > 0 {
                    enemy.attack_timer.ticks_left -= 1;
                    return;
                }

                let behavior = enemy.attack;
                let effect = behavior.execute(host.position(), target, &enemy.config.attack);
                enemy.emit(EnemyEvent::AttackExecuted { behavior, effect });

                enemy.attack_timer = AttackTimer {
                    ticks_left: enemy.config.attack_recovery_ticks,
                    winding_up: false,
                };
            }
        }
    }

    pub(crate) fn exit<H: EnemyHost + ?Sized>(self, enemy: &mut EnemyController, host: &mut H) {
        match self {
            EnemyState::Wandering => {
                host.set_velocity(Vec3::ZERO);
                enemy.patrol = PatrolRoute::default();
            }
            EnemyState::Chasing => {
                host.set_velocity(Vec3::ZERO);
            }
            EnemyState::Attacking => {
                if enemy.attack_timer.winding_up {
                    enemy.emit(EnemyEvent::AttackInterrupted(enemy.attack));
                }
                enemy.attack_timer = AttackTimer::default();
            }
        }

        enemy.emit(EnemyEvent::StateExited(self));
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyState::Wandering => "Wandering",
            EnemyState::Chasing => "Chasing",
            EnemyState::Attacking => "Attacking",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enemy_state_default() {
        assert_eq!(EnemyState::default(), EnemyState::Wandering);
    }

    #[test]
    fn test_select_state_boundaries_inclusive() {
        let (attack, chase) = (2.0, 10.0);

        assert_eq!(select_state(0.0, attack, chase), EnemyState::Attacking);
        assert_eq!(select_state(2.0, attack, chase), EnemyState::Attacking);
        assert_eq!(select_state(2.0001, attack, chase), EnemyState::Chasing);
        assert_eq!(select_state(10.0, attack, chase), EnemyState::Chasing);
        assert_eq!(select_state(10.0001, attack, chase), EnemyState::Wandering);
        assert_eq!(select_state(f32::INFINITY, attack, chase), EnemyState::Wandering);
    }

    #[test]
    fn test_select_state_sweep() {
        let (attack, chase) = (2.5, 7.5);

        for step in 0..=200 {
            let distance = step as f32 * 0.05;
            let expected = if distance <= attack {
                EnemyState::Attacking
            } else if distance <= chase {
                EnemyState::Chasing
            } else {
                EnemyState::Wandering
            };
            assert_eq!(select_state(distance, attack, chase), expected, "distance {}", distance);
        }
    }

    #[test]
    fn test_select_state_nan_falls_back_to_wandering() {
        assert_eq!(select_state(f32::NAN, 2.0, 10.0), EnemyState::Wandering);
    }
}

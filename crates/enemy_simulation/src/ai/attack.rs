//! Attack behaviors — стратегии атаки для Attacking state
//!
//! Поведение stateless: `execute` только описывает шаг атаки (`AttackEffect`),
//! применение урона/физики — забота host'а.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::config::ConfigError;

/// Стратегия атаки (переключается в runtime без смены state)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Reflect)]
pub enum AttackBehavior {
    /// Взрыв вокруг себя (area effect)
    #[default]
    Explodes,
    /// Удар/порыв в сторону цели (knockback)
    Blows,
    /// Прицельный снаряд в цель
    Aims,
}

/// Числа для всех вариантов атаки
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackTuning {
    pub explosion_radius: f32,
    pub explosion_damage: u32,
    pub blow_force: f32,
    pub blow_damage: u32,
    pub projectile_speed: f32,
    pub projectile_damage: u32,
}

impl Default for AttackTuning {
    fn default() -> Self {
        Self {
            explosion_radius: 3.0,
            explosion_damage: 40,
            blow_force: 8.0,
            blow_damage: 15,
            projectile_speed: 20.0,
            projectile_damage: 25,
        }
    }
}

impl AttackTuning {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("explosion_radius", self.explosion_radius),
            ("blow_force", self.blow_force),
            ("projectile_speed", self.projectile_speed),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }
        Ok(())
    }
}

/// Результат одного шага атаки
#[derive(Debug, Clone, PartialEq)]
pub enum AttackEffect {
    Explosion {
        center: Vec3,
        radius: f32,
        damage: u32,
    },
    Blow {
        origin: Vec3,
        /// Нормализованное направление на цель (ZERO если цель в той же точке)
        direction: Vec3,
        force: f32,
        damage: u32,
    },
    Projectile {
        origin: Vec3,
        direction: Vec3,
        speed: f32,
        damage: u32,
    },
}

impl AttackBehavior {
    /// Один шаг атаки из `origin` по `target`
    pub fn execute(self, origin: Vec3, target: Vec3, tuning: &AttackTuning) -> AttackEffect {
        match self {
            AttackBehavior::Explodes => AttackEffect::Explosion {
                center: origin,
                radius: tuning.explosion_radius,
                damage: tuning.explosion_damage,
            },
            AttackBehavior::Blows => AttackEffect::Blow {
                origin,
                direction: (target - origin).normalize_or_zero(),
                force: tuning.blow_force,
                damage: tuning.blow_damage,
            },
            AttackBehavior::Aims => AttackEffect::Projectile {
                origin,
                direction: (target - origin).normalize_or_zero(),
                speed: tuning.projectile_speed,
                damage: tuning.projectile_damage,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AttackBehavior::Explodes => "Explodes",
            AttackBehavior::Blows => "Blows",
            AttackBehavior::Aims => "Aims",
        }
    }
}

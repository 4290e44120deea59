//! Параметры врага (distance thresholds, скорости, patrol, attack tuning)
//!
//! Конфиг валидируется при создании `EnemyController` — невалидный порядок
//! порогов (attack ≥ chase) отклоняется, а не клэмпится.

use serde::{Deserialize, Serialize};

use super::attack::{AttackBehavior, AttackTuning};

/// Ошибки конфигурации врага
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// attack_distance должна быть конечной и > 0
    #[error("attack distance must be finite and positive, got {0}")]
    InvalidAttackDistance(f32),

    /// chase_distance ≤ attack_distance → Chasing недостижим
    #[error("chase distance {chase} must be greater than attack distance {attack}")]
    UnreachableChase { attack: f32, chase: f32 },

    /// Скорость / радиус отрицательные или не конечные
    #[error("{field} must be finite and non-negative, got {value}")]
    InvalidValue { field: &'static str, value: f32 },

    #[error("failed to parse enemy config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Конфиг одного врага
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Имя для логов
    pub label: String,
    /// Радиус атаки (метры), включительно
    pub attack_distance: f32,
    /// Радиус преследования (метры), включительно
    pub chase_distance: f32,
    /// Скорость патруля (м/с)
    pub wander_speed: f32,
    /// Скорость преследования (м/с)
    pub chase_speed: f32,
    /// Радиус генерации patrol точек вокруг текущей позиции
    pub patrol_radius: f32,
    /// Тиков до смены patrol точки
    pub patrol_retarget_ticks: u32,
    /// Wind-up перед первой атакой (тики)
    pub windup_ticks: u32,
    /// Пауза между атаками (тики)
    pub attack_recovery_ticks: u32,
    pub initial_attack: AttackBehavior,
    pub attack: AttackTuning,
    /// Seed для patrol RNG. `None` → берётся из `DeterministicRng` при spawn
    pub seed: Option<u64>,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            label: "enemy".to_string(),
            attack_distance: 2.0,
            chase_distance: 10.0,
            wander_speed: 1.5,
            chase_speed: 4.0,
            patrol_radius: 5.0,
            patrol_retarget_ticks: 180, // 3 сек при 60Hz
            windup_ticks: 12,
            attack_recovery_ticks: 30,
            initial_attack: AttackBehavior::Explodes,
            attack: AttackTuning::default(),
            seed: None,
        }
    }
}

impl EnemyConfig {
    /// Конфиг с заданными порогами, остальное по умолчанию
    pub fn with_distances(attack_distance: f32, chase_distance: f32) -> Self {
        Self {
            attack_distance,
            chase_distance,
            ..Self::default()
        }
    }

    /// Парсит JSON (пропущенные поля = default) и валидирует
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.attack_distance.is_finite() || self.attack_distance <= 0.0 {
            return Err(ConfigError::InvalidAttackDistance(self.attack_distance));
        }

        if !self.chase_distance.is_finite() || self.chase_distance <= self.attack_distance {
            return Err(ConfigError::UnreachableChase {
                attack: self.attack_distance,
                chase: self.chase_distance,
            });
        }

        for (field, value) in [
            ("wander_speed", self.wander_speed),
            ("chase_speed", self.chase_speed),
            ("patrol_radius", self.patrol_radius),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }

        self.attack.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EnemyConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.attack_distance, 2.0);
        assert_eq!(config.chase_distance, 10.0);
        assert_eq!(config.initial_attack, AttackBehavior::Explodes);
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let config = EnemyConfig::with_distances(10.0, 5.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnreachableChase { attack, chase }) if attack == 10.0 && chase == 5.0
        ));
    }

    #[test]
    fn test_equal_thresholds_rejected() {
        let config = EnemyConfig::with_distances(4.0, 4.0);
        assert!(matches!(config.validate(), Err(ConfigError::UnreachableChase { .. })));
    }

    #[test]
    fn test_non_positive_attack_distance_rejected() {
        assert!(matches!(
            EnemyConfig::with_distances(0.0, 5.0).validate(),
            Err(ConfigError::InvalidAttackDistance(_))
        ));
        assert!(matches!(
            EnemyConfig::with_distances(f32::NAN, 5.0).validate(),
            Err(ConfigError::InvalidAttackDistance(_))
        ));
    }

    #[test]
    fn test_negative_speed_rejected() {
        let config = EnemyConfig {
            chase_speed: -1.0,
            ..EnemyConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "chase_speed", .. })
        ));
    }

    #[test]
    fn test_from_json_partial_uses_defaults() {
        let config = EnemyConfig::from_json_str(
            r#"{ "label": "grunt", "attack_distance": 1.5, "chase_distance": 8.0, "initial_attack": "Aims" }"#,
        )
        .expect("valid json config");

        assert_eq!(config.label, "grunt");
        assert_eq!(config.attack_distance, 1.5);
        assert_eq!(config.chase_distance, 8.0);
        assert_eq!(config.initial_attack, AttackBehavior::Aims);
        assert_eq!(config.wander_speed, EnemyConfig::default().wander_speed);
        assert_eq!(config.seed, None);

        let seeded = EnemyConfig::from_json_str(r#"{ "seed": 5 }"#).expect("valid json config");
        assert_eq!(seeded.seed, Some(5));
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(matches!(
            EnemyConfig::from_json_str(r#"{ "attack_distance": 10.0, "chase_distance": 5.0 }"#),
            Err(ConfigError::UnreachableChase { .. })
        ));
        assert!(matches!(
            EnemyConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}

//! Host seam: то, что движок даёт врагу (позиция, velocity, активация)
//!
//! Controller не владеет телом — host передаётся в каждый вызов.

use bevy::prelude::*;

/// Коллабораторы от движка
pub trait EnemyHost {
    /// Текущая позиция врага (world coordinates)
    fn position(&self) -> Vec3;

    /// Rigid-body handle: желаемая скорость, интеграция — на стороне движка
    fn set_velocity(&mut self, velocity: Vec3);

    /// Активация/деактивация объекта в сцене
    fn set_active(&mut self, active: bool);
}

/// Простое кинематическое тело для headless прогонов и тестов
#[derive(Debug, Clone, PartialEq)]
pub struct KinematicBody {
    pub position: Vec3,
    pub velocity: Vec3,
    pub active: bool,
}

impl KinematicBody {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            active: true,
        }
    }

    /// Интеграция позиции (неактивное тело не двигается)
    pub fn step(&mut self, delta_secs: f32) {
        if self.active {
            self.position += self.velocity * delta_secs;
        }
    }
}

impl EnemyHost for KinematicBody {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

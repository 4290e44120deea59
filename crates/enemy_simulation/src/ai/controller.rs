//! EnemyController — driver FSM врага
//!
//! Каждый tick:
//! 1. Берём дистанцию от host.position() до target
//! 2. `select_state` → если state другой, exit старого + enter нового
//! 3. `update` текущего state (Attacking вызывает AttackBehavior::execute)
//!
//! Поражение (`defeat` / `on_deactivated`) снимает врага с tick'ов и
//! уведомляет observers ровно один раз.

use std::fmt;

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::attack::AttackBehavior;
use super::config::{ConfigError, EnemyConfig};
use super::events::{DefeatCause, EnemyEvent};
use super::host::EnemyHost;
use super::state::{select_state, AttackTimer, EnemyState, PatrolRoute};

/// Seed patrol RNG, если ни конфиг, ни `DeterministicRng` его не задали
const DEFAULT_PATROL_SEED: u64 = 42;

/// Синхронный observer поражения
pub type DefeatObserver = Box<dyn FnMut(DefeatCause) + Send + Sync>;

/// Что произошло за tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// FSM отработал
    Updated { state: EnemyState, distance: f32 },
    /// Нет цели — warning, state не тронут
    MissingTarget,
    /// Враг уже побеждён, tick игнорируется
    Defeated,
}

#[derive(Component)]
#[require(Transform, crate::components::Velocity, crate::components::Active, crate::components::EnemyTarget)]
pub struct EnemyController {
    pub(crate) config: EnemyConfig,
    pub(crate) state: EnemyState,
    /// Был ли enter начального state
    pub(crate) started: bool,
    pub(crate) attack: AttackBehavior,
    pub(crate) target: Option<Vec3>,
    pub(crate) defeated: bool,
    pub(crate) patrol: PatrolRoute,
    pub(crate) attack_timer: AttackTimer,
    rng: ChaCha8Rng,
    events: Vec<EnemyEvent>,
    observers: Vec<DefeatObserver>,
}

impl fmt::Debug for EnemyController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnemyController")
            .field("label", &self.config.label)
            .field("state", &self.state)
            .field("attack", &self.attack)
            .field("target", &self.target)
            .field("defeated", &self.defeated)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl EnemyController {
    /// Создаёт врага в Wandering. Невалидный конфиг (attack ≥ chase и т.п.) отклоняется.
    pub fn new(config: EnemyConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed.unwrap_or(DEFAULT_PATROL_SEED)),
            attack: config.initial_attack,
            state: EnemyState::default(),
            started: false,
            target: None,
            defeated: false,
            patrol: PatrolRoute::default(),
            attack_timer: AttackTimer::default(),
            events: Vec::new(),
            observers: Vec::new(),
            config,
        })
    }

    pub fn config(&self) -> &EnemyConfig {
        &self.config
    }

    pub fn label(&self) -> &str {
        &self.config.label
    }

    pub fn state(&self) -> EnemyState {
        self.state
    }

    pub fn attack_behavior(&self) -> AttackBehavior {
        self.attack
    }

    pub fn target(&self) -> Option<Vec3> {
        self.target
    }

    pub fn is_defeated(&self) -> bool {
        self.defeated
    }

    pub fn patrol_point(&self) -> Option<Vec3> {
        self.patrol.point
    }

    /// Запоминает позицию цели. None → следующие tick'и no-op с warning.
    pub fn set_target(&mut self, target: Option<Vec3>) {
        self.target = target;
    }

    /// Enter начального state (один раз). tick() вызывает сам.
    pub fn start<H: EnemyHost + ?Sized>(&mut self, host: &mut H) {
        if self.started || self.defeated {
            return;
        }

        self.started = true;
        let initial = self.state;
        crate::log(&format!("AI: {} spawned → {}", self.config.label, initial.as_str()));
        initial.enter(self, host);
    }

    pub fn tick<H: EnemyHost + ?Sized>(&mut self, host: &mut H) -> TickOutcome {
        if self.defeated {
            return TickOutcome::Defeated;
        }

        self.start(host);

        let Some(target) = self.target else {
            crate::log_warning(&format!(
                "AI: {} has no target assigned, skipping tick",
                self.config.label
            ));
            return TickOutcome::MissingTarget;
        };

        let distance = host.position().distance(target);
        let desired = select_state(distance, self.config.attack_distance, self.config.chase_distance);

        if desired != self.state {
            self.transition_to(desired, host);
        }

        let state = self.state;
        state.update(self, host, target);

        TickOutcome::Updated { state, distance }
    }

    /// exit текущего (если FSM уже стартовал) → enter `next`.
    ///
    /// Guard «тот же state» — на стороне вызывающего (`tick`), не здесь.
    pub fn transition_to<H: EnemyHost + ?Sized>(&mut self, next: EnemyState, host: &mut H) {
        if self.started {
            let previous = self.state;
            crate::log(&format!(
                "AI: {} {} → {}",
                self.config.label,
                previous.as_str(),
                next.as_str()
            ));
            previous.exit(self, host);
        }

        self.started = true;
        self.state = next;
        next.enter(self, host);
    }

    /// Переключает стратегию атаки. enter/exit не вызываются,
    /// новый behavior используется со следующего execute.
    pub fn set_attack_behavior(&mut self, behavior: AttackBehavior) {
        if behavior == self.attack {
            return;
        }

        let from = std::mem::replace(&mut self.attack, behavior);
        crate::log(&format!(
            "AI: {} attack {} → {}",
            self.config.label,
            from.as_str(),
            behavior.as_str()
        ));
        self.emit(EnemyEvent::AttackBehaviorChanged { from, to: behavior });
    }

    /// Деактивирует врага и уведомляет observers. false — уже был побеждён.
    pub fn defeat<H: EnemyHost + ?Sized>(&mut self, host: &mut H) -> bool {
        if self.defeated {
            return false;
        }

        // Флаг раньше set_active: host может сразу дёрнуть on_deactivated()
        self.defeated = true;
        host.set_velocity(Vec3::ZERO);
        host.set_active(false);
        self.notify_defeated(DefeatCause::Defeated);
        true
    }

    /// Враг выключен не через `defeat()` (Active = false, despawn).
    /// Уведомляет только если поражение ещё не было засчитано.
    pub fn on_deactivated(&mut self) -> bool {
        if self.defeated {
            return false;
        }

        self.defeated = true;
        self.notify_defeated(DefeatCause::Deactivated);
        true
    }

    pub fn on_defeated(&mut self, observer: impl FnMut(DefeatCause) + Send + Sync + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Забирает накопленные события (порядок эмиссии)
    pub fn drain_events(&mut self) -> Vec<EnemyEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: EnemyEvent) {
        self.events.push(event);
    }

    /// Новая patrol точка на плоскости XZ вокруг `origin`
    pub(crate) fn retarget_patrol(&mut self, origin: Vec3) {
        let angle = self.rng.gen::<f32>() * std::f32::consts::TAU;
        // Не ближе половины радиуса, чтобы не «дрожать» на месте
        let distance = self.config.patrol_radius * (0.5 + 0.5 * self.rng.gen::<f32>());

        self.patrol = PatrolRoute {
            point: Some(origin + Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance)),
            ticks_left: self.config.patrol_retarget_ticks,
        };
    }

    fn notify_defeated(&mut self, cause: DefeatCause) {
        crate::log_info(&format!("AI: {} defeated ({:?})", self.config.label, cause));
        self.emit(EnemyEvent::Defeated(cause));

        for observer in self.observers.iter_mut() {
            observer(cause);
        }
    }
}

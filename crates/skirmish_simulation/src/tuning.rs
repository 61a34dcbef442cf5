//! Tuning presets + JSON конфиг симуляции
//!
//! Все поля имеют default (значения из игровых сцен), JSON может задавать
//! только то, что меняет: `#[serde(default)]` на каждой структуре.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::components::{DeathPolicy, IntegrationMode};

/// Переменная окружения с путём к JSON конфигу
pub const CONFIG_ENV_VAR: &str = "SKIRMISH_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Общие параметры ActorCore
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorTuning {
    pub max_health: f32,
    pub attack_damage: f32,
    pub knockback_force: f32,
    pub knockback_decay: f32,
    /// Вертикальный bias направления knockback (0.1–0.5 по роли)
    pub knockback_lift: f32,
    pub coyote_time: f32,
    pub move_speed: f32,
    pub jump_force: f32,
    pub acceleration: f32,
    pub mass: f32,
    /// None — актор не умирает от падения
    pub fall_threshold: Option<f32>,
}

impl Default for ActorTuning {
    fn default() -> Self {
        Self {
            max_health: 10.0,
            attack_damage: 2.0,
            knockback_force: 10.0,
            knockback_decay: 5.0,
            knockback_lift: 0.5,
            coyote_time: 0.1,
            move_speed: 5.0,
            jump_force: 8.0,
            acceleration: 60.0,
            mass: 1.0,
            fall_threshold: Some(-20.0),
        }
    }
}

impl ActorTuning {
    fn validate(&self, prefix: &'static str) -> Result<(), ConfigError> {
        require_positive(prefix, "max_health", self.max_health)?;
        require_positive(prefix, "mass", self.mass)?;
        require_non_negative(prefix, "attack_damage", self.attack_damage)?;
        require_non_negative(prefix, "knockback_force", self.knockback_force)?;
        require_non_negative(prefix, "knockback_decay", self.knockback_decay)?;
        require_non_negative(prefix, "coyote_time", self.coyote_time)?;
        require_non_negative(prefix, "move_speed", self.move_speed)?;
        require_non_negative(prefix, "acceleration", self.acceleration)?;
        if !self.knockback_lift.is_finite() {
            return Err(invalid(prefix, "must be finite"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub actor: ActorTuning,
    pub mouse_sensitivity: f32,
    pub attack_range: f32,
    pub attack_delay: f32,
    pub eye_height: f32,
    pub integration: IntegrationMode,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            actor: ActorTuning::default(),
            mouse_sensitivity: 100.0,
            attack_range: 50.0,
            attack_delay: 0.25,
            eye_height: 0.6,
            integration: IntegrationMode::CharacterController,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub actor: ActorTuning,
    pub accuracy: f32,
    pub decision_interval: f32,
    pub random_move_chance: f32,
    pub attack_delay: f32,
    pub attack_range: f32,
    pub pathfinding_ray_length: f32,
    /// Включить LOS gate
    pub line_of_sight: bool,
    pub los_check_interval: f32,
    pub death_policy: DeathPolicy,
    pub integration: IntegrationMode,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            actor: ActorTuning {
                move_speed: 4.5,
                jump_force: 16.0,
                knockback_force: 13.0,
                knockback_lift: 0.2,
                ..ActorTuning::default()
            },
            accuracy: 0.7,
            decision_interval: 2.0,
            random_move_chance: 0.5,
            attack_delay: 0.5,
            attack_range: 10.0,
            pathfinding_ray_length: 100.0,
            line_of_sight: false,
            los_check_interval: 0.1,
            death_policy: DeathPolicy::Respawn,
            integration: IntegrationMode::RigidBody,
        }
    }
}

/// Контактный hazard (кактус)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardTuning {
    pub damage: f32,
    pub interval: f32,
    pub range: f32,
    pub knockback_force: f32,
}

impl Default for HazardTuning {
    fn default() -> Self {
        Self {
            damage: 2.0,
            interval: 0.5,
            range: 1.5,
            knockback_force: 13.0,
        }
    }
}

/// Конфиг симуляции (resource)
#[derive(Resource, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub seed: u64,
    /// Частота physics step (Hz)
    pub fixed_hz: f64,
    pub gravity: f32,
    pub player: PlayerTuning,
    pub enemy: EnemyTuning,
    pub hazard: HazardTuning,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            fixed_hz: 60.0,
            gravity: -9.81,
            player: PlayerTuning::default(),
            enemy: EnemyTuning::default(),
            hazard: HazardTuning::default(),
        }
    }
}

impl SimulationConfig {
    /// Загрузить и провалидировать JSON конфиг
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// `SKIRMISH_CONFIG` задан → load, иначе defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(PathBuf::from(path)),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fixed_hz > 0.0) || !self.fixed_hz.is_finite() {
            return Err(invalid("fixed_hz", "must be positive"));
        }
        if !self.gravity.is_finite() {
            return Err(invalid("gravity", "must be finite"));
        }

        self.player.actor.validate("player.actor")?;
        require_positive("player", "attack_range", self.player.attack_range)?;
        require_non_negative("player", "attack_delay", self.player.attack_delay)?;

        self.enemy.actor.validate("enemy.actor")?;
        require_positive("enemy", "decision_interval", self.enemy.decision_interval)?;
        require_positive("enemy", "attack_range", self.enemy.attack_range)?;
        require_positive("enemy", "pathfinding_ray_length", self.enemy.pathfinding_ray_length)?;
        require_positive("enemy", "los_check_interval", self.enemy.los_check_interval)?;
        require_non_negative("enemy", "attack_delay", self.enemy.attack_delay)?;
        require_unit("enemy", "accuracy", self.enemy.accuracy)?;
        require_unit("enemy", "random_move_chance", self.enemy.random_move_chance)?;

        require_positive("hazard", "interval", self.hazard.interval)?;
        require_positive("hazard", "range", self.hazard.range)?;
        require_non_negative("hazard", "damage", self.hazard.damage)?;
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn require_positive(section: &'static str, name: &str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(section, format!("{} must be positive, got {}", name, value)))
    }
}

fn require_non_negative(section: &'static str, name: &str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(section, format!("{} must be non-negative, got {}", name, value)))
    }
}

fn require_unit(section: &'static str, name: &str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(section, format!("{} must be within [0, 1], got {}", name, value)))
    }
}

//! AI компоненты: мозг врага, конфиг, line-of-sight gate

use bevy::prelude::*;

/// Мозг врага: один на актора, цель инжектится при спавне
///
/// Читает свой Actor + Transform цели, пишет только MoveIntent/AttackIntent
/// (и прыжковый импульс в своё тело).
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct EnemyBrain {
    pub target: Entity,
    pub next_decision_at: f32,
    /// Текущее направление (unit, горизонтальное)
    pub move_direction: Vec3,
}

impl EnemyBrain {
    pub fn new(target: Entity) -> Self {
        Self {
            target,
            next_decision_at: 0.0,
            move_direction: Vec3::ZERO,
        }
    }

    pub fn decision_due(&self, now: f32) -> bool {
        now >= self.next_decision_at
    }
}

/// Параметры AI (интервалы, шансы, дальность лучей)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct AIConfig {
    /// Период пересмотра направления (секунды)
    pub decision_interval: f32,
    /// Вероятность выбрать случайное направление вместо преследования
    pub random_move_chance: f32,
    /// Длина луча для jump heuristic / LOS (метры)
    pub pathfinding_ray_length: f32,
    /// Насколько цель должна быть выше, чтобы пытаться прыгать
    pub jump_height_threshold: f32,
}

impl Default for AIConfig {
    fn default() -> Self {
        Self {
            decision_interval: 2.0,
            random_move_chance: 0.5,
            pathfinding_ray_length: 100.0,
            jump_height_threshold: 0.5,
        }
    }
}

/// Optional LOS gate: пока цель не видна, враг бродит случайно
///
/// Обновляется со своим cadence (`check_interval`), независимо от решений.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct LineOfSight {
    pub clear: bool,
    pub check_interval: f32,
    pub next_check_at: f32,
}

impl Default for LineOfSight {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl LineOfSight {
    pub fn new(check_interval: f32) -> Self {
        Self {
            clear: false,
            check_interval,
            next_check_at: 0.0,
        }
    }

    pub fn is_blocked(&self) -> bool {
        !self.clear
    }
}

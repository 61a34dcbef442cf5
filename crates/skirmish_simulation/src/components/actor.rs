//! Базовые компоненты акторов: Actor, Health, DeathPolicy, SpawnPoint

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::Flash;
use crate::components::{ActorShape, IntegrationMode, Locomotion, MoveIntent, PhysicsBody};
use crate::physics::layers::{LAYER_ENEMY, LAYER_PLAYER};
use crate::physics::{GroundedTracker, HitTag, Knockback};

/// Роль актора (определяет layer коллайдера и tag для попаданий)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum ActorRole {
    Player,
    Enemy,
}

impl ActorRole {
    pub fn hit_tag(self) -> HitTag {
        match self {
            ActorRole::Player => HitTag::Player,
            ActorRole::Enemy => HitTag::Enemy,
        }
    }

    pub fn layer(self) -> u32 {
        match self {
            ActorRole::Player => LAYER_PLAYER,
            ActorRole::Enemy => LAYER_ENEMY,
        }
    }

    /// Кого атакует актор этой роли
    pub fn opponent(self) -> ActorRole {
        match self {
            ActorRole::Player => ActorRole::Enemy,
            ActorRole::Enemy => ActorRole::Player,
        }
    }
}

/// Актор (игрок или враг) — ActorCore
///
/// Автоматически добавляет Health, Knockback, GroundedTracker, тело и
/// locomotion через Required Components. Spawn helpers (`crate::spawn`)
/// перезаписывают их значениями из tuning.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
#[require(
    Transform,
    Health,
    Knockback,
    GroundedTracker,
    PhysicsBody,
    ActorShape,
    Locomotion,
    MoveIntent,
    DeathPolicy,
    IntegrationMode,
    Flash
)]
pub struct Actor {
    pub role: ActorRole,
}

impl Actor {
    pub fn player() -> Self {
        Self { role: ActorRole::Player }
    }

    pub fn enemy() -> Self {
        Self { role: ActorRole::Enemy }
    }
}

/// Результат применения урона
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageResult {
    /// Сколько реально снято (после clamp)
    pub applied: f32,
    /// Урон довёл health до 0
    pub killed: bool,
}

/// Здоровье актора
///
/// Инвариант: 0 ≤ current ≤ max. `deaths` только растёт.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
    pub deaths: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(10.0)
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self {
            current: max,
            max,
            deaths: 0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    /// Снять `amount` HP (clamp в 0)
    ///
    /// `amount ≤ 0`, NaN и урон по мёртвому актору — no-op (None).
    pub fn apply_damage(&mut self, amount: f32) -> Option<DamageResult> {
        if !(amount > 0.0) || !self.is_alive() {
            return None;
        }

        let before = self.current;
        self.current = (self.current - amount).max(0.0);

        Some(DamageResult {
            applied: before - self.current,
            killed: !self.is_alive(),
        })
    }

    /// Мгновенная смерть (падение за fall threshold). false если уже мёртв.
    pub fn kill(&mut self) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.current = 0.0;
        true
    }

    /// Respawn: полное здоровье, +1 смерть
    pub fn restore(&mut self) {
        self.current = self.max;
        self.deaths += 1;
    }

    pub fn fraction(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }
}

/// Что происходит с актором при смерти
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub enum DeathPolicy {
    /// Вернуться на spawn point с полным здоровьем
    #[default]
    Respawn,
    /// Удалить актора навсегда (terminal state)
    Terminate,
}

/// Точка respawn (фиксируется при спавне, не меняется)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct SpawnPoint(Vec3);

impl SpawnPoint {
    pub fn new(position: Vec3) -> Self {
        Self(position)
    }

    pub fn position(&self) -> Vec3 {
        self.0
    }
}

/// Высота, ниже которой актор считается упавшим с арены
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct FallThreshold(pub f32);

/// Маркер: актору не хватает зависимостей (нет валидной цели и т.п.),
/// его системы пропускают
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Disabled;

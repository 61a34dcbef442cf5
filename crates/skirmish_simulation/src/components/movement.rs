//! Movement компоненты: тело, locomotion, integration mode

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Режим применения силы к телу
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForceMode {
    /// Δv = force / mass
    Impulse,
    /// Δv = force (масса игнорируется)
    VelocityChange,
}

/// Скорость и масса актора (интегрируется в FixedUpdate)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PhysicsBody {
    pub velocity: Vec3,
    pub mass: f32,
}

impl Default for PhysicsBody {
    fn default() -> Self {
        Self {
            velocity: Vec3::ZERO,
            mass: 1.0,
        }
    }
}

impl PhysicsBody {
    pub fn new(mass: f32) -> Self {
        Self {
            velocity: Vec3::ZERO,
            mass,
        }
    }

    pub fn apply_force(&mut self, force: Vec3, mode: ForceMode) {
        if !force.is_finite() {
            return;
        }

        match mode {
            ForceMode::Impulse if self.mass > 0.0 => self.velocity += force / self.mass,
            ForceMode::Impulse => {}
            ForceMode::VelocityChange => self.velocity += force,
        }
    }

    /// Прыжок: обнуляем вертикальную скорость, затем импульс вверх
    pub fn jump(&mut self, jump_force: f32) {
        self.velocity.y = 0.0;
        self.apply_force(Vec3::Y * jump_force, ForceMode::Impulse);
    }

    pub fn horizontal_velocity(&self) -> Vec3 {
        self.velocity.with_y(0.0)
    }

    pub fn reset(&mut self) {
        self.velocity = Vec3::ZERO;
    }
}

/// Как горизонтальное намерение превращается в скорость
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub enum IntegrationMode {
    /// Velocity-change сила, ограниченная `acceleration * dt`
    /// (knockback и коллизии не затираются)
    #[default]
    RigidBody,
    /// Горизонтальная скорость выставляется напрямую (capsule controller)
    CharacterController,
}

/// Параметры передвижения
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Locomotion {
    /// Скорость движения (m/s)
    pub move_speed: f32,
    /// Импульс прыжка
    pub jump_force: f32,
    /// Максимальное изменение горизонтальной скорости (m/s²), RigidBody режим
    pub acceleration: f32,
}

impl Default for Locomotion {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            jump_force: 8.0,
            acceleration: 60.0,
        }
    }
}

/// Намерение движения на следующий physics step
///
/// Пишут PlayerController и EnemyAI (frame step), читает `drive_locomotion`.
/// `direction` горизонтальный, длина ≤ 1.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct MoveIntent {
    pub direction: Vec3,
}

impl MoveIntent {
    pub fn set(&mut self, direction: Vec3) {
        self.direction = direction.with_y(0.0).clamp_length_max(1.0);
    }

    pub fn clear(&mut self) {
        self.direction = Vec3::ZERO;
    }
}

/// Форма актора: вертикальная capsule
///
/// Transform.translation — центр. Ноги на `center.y - half_height`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct ActorShape {
    /// Горизонтальный радиус (упор в стены)
    pub radius: f32,
    /// Половина высоты
    pub half_height: f32,
}

impl Default for ActorShape {
    fn default() -> Self {
        Self {
            radius: 0.5,
            half_height: 1.0,
        }
    }
}

impl ActorShape {
    pub fn feet(&self, center: Vec3) -> Vec3 {
        center - Vec3::Y * self.half_height
    }

    /// Высота груди: откуда враги стреляют лучами
    pub fn chest(&self, center: Vec3) -> Vec3 {
        center + Vec3::Y * 0.5
    }
}

//! Physics module
//!
//! Физический движок (raycast/overlap/character move) — внешний сервис,
//! симуляция потребляет его через trait `PhysicsQuery`. Интеграцию скоростей,
//! gravity, knockback и grounded state симуляция делает сама (fixed timestep,
//! детерминированно).
//!
//! `ArenaPhysics` — rapier3d реализация (статические cuboid'ы + capsule акторов)
//! для тестов и demo binary.

use bevy::prelude::*;
use std::ops::{Deref, DerefMut};

use crate::components::ActorShape;

pub mod arena;
pub mod grounded;
pub mod knockback;
pub mod layers;
pub mod movement;

// Re-export основных типов
pub use arena::{ArenaPhysics, StaticBox, CONTROLLER_OFFSET};
pub use grounded::{GroundedTracker, DEFAULT_COYOTE_TIME, GROUND_CHECK_RADIUS};
pub use knockback::{Knockback, DEFAULT_KNOCKBACK_DECAY, DEFAULT_KNOCKBACK_LIFT, KNOCKBACK_EPSILON};
pub use movement::{drive_horizontal, resolve_motion, PhysicsSettings, PhysicsStepPlugin};

/// Tag поверхности/коллайдера, в который попал луч
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum HitTag {
    #[default]
    Untagged,
    Ground,
    Player,
    Enemy,
}

/// Результат raycast: ближайшее попадание
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec3,
    pub distance: f32,
    pub tag: HitTag,
    /// Entity актора, если попали в актора (статика → None)
    pub entity: Option<Entity>,
}

/// Коллайдер актора, синхронизируемый в physics backend каждый frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorCollider {
    pub entity: Entity,
    pub center: Vec3,
    pub shape: ActorShape,
    pub layer: u32,
    pub tag: HitTag,
}

/// Physics backend (внешний коллаборатор)
///
/// Запросы синхронные и неблокирующие. Луч, начинающийся внутри чужого
/// коллайдера, попадает в него на дистанции 0; свой коллайдер кастующий
/// исключает через `exclude`.
pub trait PhysicsQuery: Send + Sync + 'static {
    /// Ближайшее попадание луча в пределах `max_distance` по слоям `mask`
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: u32,
        exclude: Option<Entity>,
    ) -> Option<RayHit>;

    /// Пересекает ли сфера хоть один коллайдер слоёв `mask`
    fn overlap_sphere(&self, center: Vec3, radius: f32, mask: u32) -> bool;

    /// Сдвинуть актора на `desired` с упором в коллайдеры слоёв `mask`
    /// (стены, ступеньки, другие акторы). Возвращает фактическое смещение.
    fn move_actor(
        &mut self,
        actor: Entity,
        shape: &ActorShape,
        position: Vec3,
        desired: Vec3,
        mask: u32,
        dt: f32,
    ) -> Vec3;

    /// Обновить коллайдеры акторов. Backend, который сам трекает тела, игнорирует.
    fn sync_actors(&mut self, _actors: &[ActorCollider]) {}
}

/// Resource: активный physics backend
///
/// Вставляется host'ом. Без него системы, которым нужны запросы, пропускают тик.
#[derive(Resource)]
pub struct PhysicsWorld {
    backend: Box<dyn PhysicsQuery>,
}

impl PhysicsWorld {
    pub fn new(backend: impl PhysicsQuery) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    pub fn sync_actors(&mut self, actors: &[ActorCollider]) {
        self.backend.sync_actors(actors);
    }
}

impl Deref for PhysicsWorld {
    type Target = dyn PhysicsQuery;

    fn deref(&self) -> &Self::Target {
        self.backend.as_ref()
    }
}

impl DerefMut for PhysicsWorld {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.backend.as_mut()
    }
}

//! ArenaPhysics — headless physics backend на rapier3d
//!
//! Статика: cuboid коллайдеры без тел (пол, стены, платформы).
//! Акторы: capsule коллайдеры, обновляются через `sync_actors` (Sync set)
//! и сдвигаются `move_actor` (KinematicCharacterController) в physics step.
//! PhysicsPipeline не степаем: динамики нет, только запросы.
//!
//! Layers → collision groups: membership = layer, filter запроса = mask.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use bevy::prelude::*;
use rapier3d::control::{CharacterAutostep, CharacterLength, KinematicCharacterController};
use rapier3d::math::{Isometry, Point, Real, Vector};
use rapier3d::prelude::{
    ColliderBuilder, ColliderHandle, ColliderSet, Group, InteractionGroups, IslandManager, QueryFilter,
    QueryPipeline, Ray, RigidBodySet, SharedShape,
};

use super::layers::{get_layer_name, LAYER_DEFAULT, LAYER_GROUND};
use super::movement::STEP_HEIGHT;
use super::{ActorCollider, HitTag, PhysicsQuery, RayHit};
use crate::components::ActorShape;
use crate::logger;

/// Зазор character controller'а между capsule и геометрией
pub const CONTROLLER_OFFSET: f32 = 0.01;

/// Минимальная ширина ступеньки для autostep
const STEP_MIN_WIDTH: f32 = 0.2;

/// Статический axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticBox {
    pub min: Vec3,
    pub max: Vec3,
    pub layer: u32,
    pub tag: HitTag,
}

impl StaticBox {
    pub fn new(min: Vec3, max: Vec3, layer: u32, tag: HitTag) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
            layer,
            tag,
        }
    }

    /// Стена/препятствие (Default layer)
    pub fn wall(min: Vec3, max: Vec3) -> Self {
        Self::new(min, max, LAYER_DEFAULT, HitTag::Untagged)
    }

    /// Поверхность, на которой можно стоять (Ground layer)
    pub fn ground(min: Vec3, max: Vec3) -> Self {
        Self::new(min, max, LAYER_GROUND, HitTag::Ground)
    }

    fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    fn half_extents(&self) -> Vec3 {
        ((self.max - self.min) * 0.5).max(Vec3::splat(1e-3))
    }
}

/// Кому принадлежит коллайдер (для RayHit)
#[derive(Debug, Clone, Copy)]
struct ColliderInfo {
    entity: Option<Entity>,
    tag: HitTag,
}

/// Коллайдер актора в rapier + последнее синхронизированное состояние
#[derive(Debug, Clone, Copy)]
struct ActorSlot {
    handle: ColliderHandle,
    collider: ActorCollider,
}

pub struct ArenaPhysics {
    bodies: RigidBodySet,
    colliders: ColliderSet,
    islands: IslandManager,
    query_pipeline: QueryPipeline,
    controller: KinematicCharacterController,
    /// BTreeMap: детерминированный порядок вставки/удаления
    actors: BTreeMap<Entity, ActorSlot>,
    infos: HashMap<ColliderHandle, ColliderInfo>,
}

impl Default for ArenaPhysics {
    fn default() -> Self {
        let mut controller = KinematicCharacterController::default();
        controller.autostep = Some(CharacterAutostep {
            max_height: CharacterLength::Absolute(STEP_HEIGHT),
            min_width: CharacterLength::Absolute(STEP_MIN_WIDTH),
            include_dynamic_bodies: false,
        });
        controller.max_slope_climb_angle = 45.0_f32.to_radians();
        controller.snap_to_ground = Some(CharacterLength::Absolute(STEP_HEIGHT));
        controller.offset = CharacterLength::Absolute(CONTROLLER_OFFSET);

        Self {
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            islands: IslandManager::new(),
            query_pipeline: QueryPipeline::new(),
            controller,
            actors: BTreeMap::new(),
            infos: HashMap::new(),
        }
    }
}

impl ArenaPhysics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Плоский пол `[-half_extent, half_extent]²`, верх на y = 0
    pub fn flat_ground(half_extent: f32) -> Self {
        Self::new().with_box(StaticBox::ground(
            Vec3::new(-half_extent, -1.0, -half_extent),
            Vec3::new(half_extent, 0.0, half_extent),
        ))
    }

    pub fn with_box(mut self, static_box: StaticBox) -> Self {
        self.add_box(static_box);
        self
    }

    pub fn add_box(&mut self, static_box: StaticBox) -> &mut Self {
        let center = static_box.center();
        let half = static_box.half_extents();
        let collider = ColliderBuilder::cuboid(half.x, half.y, half.z)
            .translation(to_vector(center))
            .collision_groups(member_of(static_box.layer))
            .build();

        let handle = self.colliders.insert(collider);
        self.infos.insert(
            handle,
            ColliderInfo {
                entity: None,
                tag: static_box.tag,
            },
        );
        self.query_pipeline.update(&self.colliders);

        logger::log(&format!(
            "🧱 Static box {:?}..{:?} on layer {}",
            static_box.min,
            static_box.max,
            get_layer_name(static_box.layer)
        ));
        self
    }

    /// Синхронизированные акторы (позиция — после последнего move/sync)
    pub fn actors(&self) -> impl Iterator<Item = &ActorCollider> {
        self.actors.values().map(|slot| &slot.collider)
    }

    fn insert_actor(&mut self, actor: &ActorCollider) -> ColliderHandle {
        let collider = ColliderBuilder::new(capsule(&actor.shape))
            .translation(to_vector(actor.center))
            .collision_groups(member_of(actor.layer))
            .build();

        let handle = self.colliders.insert(collider);
        self.infos.insert(
            handle,
            ColliderInfo {
                entity: Some(actor.entity),
                tag: actor.tag,
            },
        );
        handle
    }

    fn remove_actor(&mut self, entity: Entity) {
        let Some(slot) = self.actors.remove(&entity) else {
            return;
        };
        self.colliders
            .remove(slot.handle, &mut self.islands, &mut self.bodies, false);
        self.infos.remove(&slot.handle);
    }

    fn filter_for(&self, mask: u32, exclude: Option<Entity>) -> QueryFilter<'static> {
        let filter = QueryFilter::new().groups(query_groups(mask));
        match exclude.and_then(|entity| self.actors.get(&entity)) {
            Some(slot) => filter.exclude_collider(slot.handle),
            None => filter,
        }
    }
}

impl PhysicsQuery for ArenaPhysics {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: u32,
        exclude: Option<Entity>,
    ) -> Option<RayHit> {
        let direction = direction.try_normalize()?;
        if !(max_distance > 0.0) {
            return None;
        }

        let ray = Ray::new(to_point(origin), to_vector(direction));
        let (handle, distance) = self.query_pipeline.cast_ray(
            &self.bodies,
            &self.colliders,
            &ray,
            max_distance,
            true, // solid: старт внутри чужого коллайдера → попадание на 0
            self.filter_for(mask, exclude),
        )?;
        let info = self.infos.get(&handle)?;

        Some(RayHit {
            point: origin + direction * distance,
            distance,
            tag: info.tag,
            entity: info.entity,
        })
    }

    fn overlap_sphere(&self, center: Vec3, radius: f32, mask: u32) -> bool {
        let ball = SharedShape::ball(radius.max(1e-4));
        self.query_pipeline
            .intersection_with_shape(
                &self.bodies,
                &self.colliders,
                &translation(center),
                &*ball,
                self.filter_for(mask, None),
            )
            .is_some()
    }

    fn move_actor(
        &mut self,
        actor: Entity,
        shape: &ActorShape,
        position: Vec3,
        desired: Vec3,
        mask: u32,
        dt: f32,
    ) -> Vec3 {
        let movement = self.controller.move_shape(
            dt,
            &self.bodies,
            &self.colliders,
            &self.query_pipeline,
            &*capsule(shape),
            &translation(position),
            to_vector(desired),
            self.filter_for(mask, Some(actor)),
            |_| {},
        );
        let moved = Vec3::new(movement.translation.x, movement.translation.y, movement.translation.z);

        // Следующие акторы в этом step видят новую позицию
        if let Some(slot) = self.actors.get_mut(&actor) {
            slot.collider.center = position + moved;
            if let Some(collider) = self.colliders.get_mut(slot.handle) {
                collider.set_translation(to_vector(slot.collider.center));
            }
            self.query_pipeline.update(&self.colliders);
        }

        moved
    }

    fn sync_actors(&mut self, actors: &[ActorCollider]) {
        let live: BTreeSet<Entity> = actors.iter().map(|a| a.entity).collect();
        let stale: Vec<Entity> = self.actors.keys().filter(|e| !live.contains(e)).copied().collect();
        for entity in stale {
            self.remove_actor(entity);
        }

        for actor in actors {
            let existing = self.actors.get(&actor.entity).copied();
            let handle = match existing {
                Some(slot) if slot.collider.shape == actor.shape && slot.collider.layer == actor.layer => {
                    if let Some(collider) = self.colliders.get_mut(slot.handle) {
                        collider.set_translation(to_vector(actor.center));
                    }
                    slot.handle
                }
                // Новый актор или сменилась форма/слой → пересоздаём
                _ => {
                    self.remove_actor(actor.entity);
                    self.insert_actor(actor)
                }
            };
            self.actors.insert(
                actor.entity,
                ActorSlot {
                    handle,
                    collider: *actor,
                },
            );
        }

        self.query_pipeline.update(&self.colliders);
    }
}

/// Capsule по форме актора: полная высота `2 * half_height`
fn capsule(shape: &ActorShape) -> SharedShape {
    let radius = shape.radius.max(1e-3);
    SharedShape::capsule_y((shape.half_height - radius).max(0.0), radius)
}

/// Коллайдер на слое `layer`, сталкивается со всеми
fn member_of(layer: u32) -> InteractionGroups {
    InteractionGroups::new(Group::from_bits_truncate(layer), Group::ALL)
}

/// Запрос видит только слои из `mask`
fn query_groups(mask: u32) -> InteractionGroups {
    InteractionGroups::new(Group::ALL, Group::from_bits_truncate(mask))
}

fn to_vector(v: Vec3) -> Vector<Real> {
    Vector::new(v.x, v.y, v.z)
}

fn to_point(v: Vec3) -> Point<Real> {
    Point::new(v.x, v.y, v.z)
}

fn translation(v: Vec3) -> Isometry<Real> {
    Isometry::translation(v.x, v.y, v.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::layers::*;

    fn collider(index: u32, center: Vec3, layer: u32, tag: HitTag) -> ActorCollider {
        ActorCollider {
            entity: Entity::from_raw(index),
            center,
            shape: ActorShape::default(),
            layer,
            tag,
        }
    }

    #[test]
    fn test_raycast_down_hits_floor() {
        let arena = ArenaPhysics::flat_ground(10.0);
        let hit = arena
            .raycast(Vec3::new(1.0, 2.0, 1.0), Vec3::NEG_Y, 5.0, MASK_ALL, None)
            .expect("floor должен быть под нами");

        assert!((hit.distance - 2.0).abs() < 1e-4);
        assert!(hit.point.y.abs() < 1e-4);
        assert_eq!(hit.tag, HitTag::Ground);
        assert_eq!(hit.entity, None);
    }

    #[test]
    fn test_raycast_respects_max_distance_and_mask() {
        let arena = ArenaPhysics::flat_ground(10.0);
        assert!(arena.raycast(Vec3::new(0.0, 2.0, 0.0), Vec3::NEG_Y, 1.5, MASK_ALL, None).is_none());
        assert!(arena
            .raycast(Vec3::new(0.0, 2.0, 0.0), Vec3::NEG_Y, 5.0, LAYER_DEFAULT, None)
            .is_none());
    }

    #[test]
    fn test_raycast_skips_excluded_actor() {
        let mut arena = ArenaPhysics::flat_ground(10.0);
        let me = collider(1, Vec3::new(0.0, 1.0, 0.0), LAYER_ENEMY, HitTag::Enemy);
        let player = collider(2, Vec3::new(5.0, 1.0, 0.0), LAYER_PLAYER, HitTag::Player);
        arena.sync_actors(&[me, player]);

        // Луч из груди врага: свой capsule исключён → первым видим игрока
        let hit = arena
            .raycast(
                Vec3::new(0.0, 1.5, 0.0),
                Vec3::new(5.0, -0.5, 0.0),
                10.0,
                MASK_RAYCAST_DEFAULT,
                Some(me.entity),
            )
            .expect("игрок в зоне видимости");
        assert_eq!(hit.entity, Some(player.entity));
        assert_eq!(hit.tag, HitTag::Player);
        assert!(hit.distance > 4.0 && hit.distance < 5.0, "distance = {}", hit.distance);

        // Без exclude луч упирается в свой же capsule
        let own = arena
            .raycast(Vec3::new(0.0, 1.5, 0.0), Vec3::X, 10.0, MASK_RAYCAST_DEFAULT, None)
            .expect("свой capsule");
        assert_eq!(own.entity, Some(me.entity));
        assert_eq!(own.distance, 0.0);
    }

    #[test]
    fn test_ray_starting_inside_other_actor_hits_it() {
        let mut arena = ArenaPhysics::flat_ground(10.0);
        let me = collider(1, Vec3::new(0.3, 1.0, 0.0), LAYER_ENEMY, HitTag::Enemy);
        let player = collider(2, Vec3::new(0.0, 1.0, 0.0), LAYER_PLAYER, HitTag::Player);
        arena.sync_actors(&[me, player]);

        // Вплотную: грудь врага уже внутри capsule игрока
        let hit = arena
            .raycast(
                Vec3::new(0.3, 1.5, 0.0),
                Vec3::new(-0.3, -0.5, 0.0),
                10.0,
                MASK_RAYCAST_DEFAULT,
                Some(me.entity),
            )
            .expect("point-blank попадание");
        assert_eq!(hit.entity, Some(player.entity));
        assert_eq!(hit.distance, 0.0);
    }

    #[test]
    fn test_wall_blocks_actor_behind_it() {
        let mut arena = ArenaPhysics::flat_ground(10.0).with_box(StaticBox::wall(
            Vec3::new(2.0, 0.0, -3.0),
            Vec3::new(2.5, 4.0, 3.0),
        ));
        arena.sync_actors(&[collider(2, Vec3::new(5.0, 1.0, 0.0), LAYER_PLAYER, HitTag::Player)]);

        let hit = arena
            .raycast(Vec3::new(0.0, 1.0, 0.0), Vec3::X, 10.0, MASK_ENEMY_LOS, None)
            .expect("стена на пути");
        assert_eq!(hit.entity, None);
        assert!((hit.distance - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_overlap_sphere_ground_check() {
        let arena = ArenaPhysics::flat_ground(10.0);
        assert!(arena.overlap_sphere(Vec3::new(0.0, 0.1, 0.0), 0.2, MASK_GROUND_CHECK));
        assert!(!arena.overlap_sphere(Vec3::new(0.0, 0.5, 0.0), 0.2, MASK_GROUND_CHECK));
        // Вне пола
        assert!(!arena.overlap_sphere(Vec3::new(20.0, 0.0, 0.0), 0.2, MASK_GROUND_CHECK));
    }

    #[test]
    fn test_zero_direction_is_miss() {
        let arena = ArenaPhysics::flat_ground(10.0);
        assert!(arena.raycast(Vec3::Y, Vec3::ZERO, 10.0, MASK_ALL, None).is_none());
    }

    #[test]
    fn test_sync_removes_despawned_actors() {
        let mut arena = ArenaPhysics::flat_ground(10.0);
        let a = collider(1, Vec3::new(3.0, 1.0, 0.0), LAYER_ENEMY, HitTag::Enemy);
        let b = collider(2, Vec3::new(-3.0, 1.0, 0.0), LAYER_ENEMY, HitTag::Enemy);
        arena.sync_actors(&[a, b]);
        assert_eq!(arena.actors().count(), 2);

        arena.sync_actors(&[b]);
        assert_eq!(arena.actors().map(|c| c.entity).collect::<Vec<_>>(), vec![b.entity]);
        assert!(arena
            .raycast(Vec3::new(0.0, 1.0, 0.0), Vec3::X, 10.0, LAYER_ENEMY, None)
            .is_none());
    }

    #[test]
    fn test_actor_blocks_another_actor() {
        let mut arena = ArenaPhysics::flat_ground(10.0);
        let mover = collider(1, Vec3::new(0.0, 1.0, 0.0), LAYER_ENEMY, HitTag::Enemy);
        let player = collider(2, Vec3::new(1.5, 1.0, 0.0), LAYER_PLAYER, HitTag::Player);
        arena.sync_actors(&[mover, player]);

        let moved = arena.move_actor(mover.entity, &mover.shape, mover.center, Vec3::X, MASK_MOVEMENT, 1.0 / 60.0);
        // capsule радиуса 0.5 упирается в capsule игрока: центры не ближе ~1.0
        assert!(moved.x < 0.51 && moved.x > 0.4, "moved = {:?}", moved);
        let center = arena.actors().find(|c| c.entity == mover.entity).map(|c| c.center);
        assert_eq!(center, Some(mover.center + moved));
    }
}

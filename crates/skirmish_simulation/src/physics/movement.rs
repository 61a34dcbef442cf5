//! Physics step: ground check, locomotion, gravity, интеграция
//!
//! Архитектура:
//! - Raycast/overlap — через внешний `PhysicsQuery` (PhysicsWorld resource)
//! - Velocity интегрируем сами (body + knockback суммируются, не перезаписываются)
//! - Коллизии: KinematicCharacterController backend'а (стены, ступеньки, акторы)
//!
//! Детерминизм: FixedUpdate (60Hz), никаких random внутри physics step.

use bevy::prelude::*;

use crate::combat::{ActorDied, DeathCause, HealthChanged};
use crate::components::{
    Actor, ActorShape, Disabled, FallThreshold, ForceMode, Health, IntegrationMode, Locomotion, MoveIntent,
    PhysicsBody,
};
use crate::logger;

use super::layers::{MASK_GROUND_CHECK, MASK_MOVEMENT};
use super::{GroundedTracker, Knockback, PhysicsQuery, PhysicsWorld, GROUND_CHECK_RADIUS};

/// Высота ступеньки: ниже неё актор забирается автоматически (autostep + snap to ground)
pub const STEP_HEIGHT: f32 = 0.3;

/// Смещение меньше этого не считается упором в препятствие
const BLOCK_EPSILON: f32 = 1e-4;

/// Глобальные параметры physics step
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct PhysicsSettings {
    /// Ускорение свободного падения (m/s²)
    pub gravity: Vec3,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
        }
    }
}

/// Горизонтальная скорость к `desired` согласно integration mode
///
/// - CharacterController: x/z выставляются напрямую
/// - RigidBody: velocity-change, ограниченный `acceleration * dt`
///
/// Вертикальная скорость не трогается.
pub fn drive_horizontal(body: &mut PhysicsBody, desired: Vec3, mode: IntegrationMode, acceleration: f32, dt: f32) {
    let desired = desired.with_y(0.0);

    match mode {
        IntegrationMode::CharacterController => {
            body.velocity.x = desired.x;
            body.velocity.z = desired.z;
        }
        IntegrationMode::RigidBody => {
            let change = (desired - body.horizontal_velocity()).clamp_length_max(acceleration.max(0.0) * dt);
            body.apply_force(change, ForceMode::VelocityChange);
        }
    }
}

/// Смещение актора через character controller backend'а
///
/// Backend упирает capsule в статику и других акторов, забирается на
/// ступеньки до `STEP_HEIGHT`. Здесь гасим ту часть скорости, которая ушла
/// в препятствие: горизонталь "в стену", вертикаль при приземлении/потолке.
pub fn resolve_motion(
    physics: &mut dyn PhysicsQuery,
    actor: Entity,
    position: Vec3,
    shape: &ActorShape,
    displacement: Vec3,
    body: &mut PhysicsBody,
    dt: f32,
) -> Vec3 {
    let moved = physics.move_actor(actor, shape, position, displacement, MASK_MOVEMENT, dt);
    let blocked = displacement - moved;

    let blocked_horizontal = blocked.with_y(0.0);
    if blocked_horizontal.length() > BLOCK_EPSILON {
        let normal = blocked_horizontal.normalize();
        let into_obstacle = body.velocity.dot(normal);
        if into_obstacle > 0.0 {
            body.velocity -= normal * into_obstacle;
        }
    }

    if displacement.y < 0.0 && blocked.y < -BLOCK_EPSILON && body.velocity.y < 0.0 {
        // Приземлились
        body.velocity.y = 0.0;
    } else if displacement.y > 0.0 && blocked.y > BLOCK_EPSILON && body.velocity.y > 0.0 {
        // Потолок
        body.velocity.y = 0.0;
    }

    position + moved
}

/// Система: ground detection (overlap sphere под ногами)
///
/// Контакт пишется по frame clock (`Time<Virtual>`): по нему же
/// `can_jump` проверяют контроллер игрока и AI в Update.
pub fn ground_detection(
    physics: Option<Res<PhysicsWorld>>,
    time: Res<Time<Virtual>>,
    mut query: Query<(&Transform, &ActorShape, &mut GroundedTracker), Without<Disabled>>,
    mut warned: Local<bool>,
) {
    let Some(physics) = physics else {
        if !*warned {
            logger::log_warning("PhysicsWorld resource отсутствует: ground detection пропущен");
            *warned = true;
        }
        return;
    };

    let now = time.elapsed_secs();
    for (transform, shape, mut grounded) in query.iter_mut() {
        let feet = shape.feet(transform.translation);
        let on_ground = physics.overlap_sphere(feet, GROUND_CHECK_RADIUS, MASK_GROUND_CHECK);
        grounded.update(on_ground, now);
    }
}

/// Система: MoveIntent → горизонтальная скорость
pub fn drive_locomotion(
    mut query: Query<(&MoveIntent, &Locomotion, &IntegrationMode, &mut PhysicsBody), Without<Disabled>>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();

    for (intent, locomotion, mode, mut body) in query.iter_mut() {
        let desired = intent.direction * locomotion.move_speed;
        drive_horizontal(&mut body, desired, *mode, locomotion.acceleration, delta);
    }
}

/// Система применения gravity к velocity
///
/// Стоим на земле и не взлетаем → вертикальная скорость 0.
pub fn apply_gravity(
    settings: Res<PhysicsSettings>,
    mut query: Query<(&GroundedTracker, &mut PhysicsBody), Without<Disabled>>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();

    for (grounded, mut body) in query.iter_mut() {
        if grounded.is_grounded() && body.velocity.y <= 0.0 {
            body.velocity.y = 0.0;
        } else {
            body.velocity += settings.gravity * delta;
        }
    }
}

/// Система интеграции velocity → Transform
///
/// displacement = (body + knockback) * dt, затем knockback затухает.
/// Без PhysicsWorld интегрируем без коллизий.
pub fn integrate_motion(
    mut physics: Option<ResMut<PhysicsWorld>>,
    mut query: Query<(Entity, &mut Transform, &ActorShape, &mut PhysicsBody, &mut Knockback), Without<Disabled>>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();

    // Entity order: акторы толкаются о коллайдеры друг друга детерминированно
    let mut actors: Vec<_> = query.iter_mut().collect();
    actors.sort_by_key(|(entity, ..)| *entity);

    for (entity, mut transform, shape, mut body, mut knockback) in actors {
        let displacement = (body.velocity + knockback.velocity) * delta;

        transform.translation = match physics.as_deref_mut() {
            Some(physics) => resolve_motion(
                &mut **physics,
                entity,
                transform.translation,
                shape,
                displacement,
                &mut body,
                delta,
            ),
            None => transform.translation + displacement,
        };

        knockback.step(delta);
    }
}

/// Система: актор упал ниже fall threshold → мгновенная смерть
///
/// Health → 0 сообщается через HealthChanged, как и при смерти от урона.
pub fn check_fall_threshold(
    mut query: Query<(Entity, &Actor, &Transform, &FallThreshold, &mut Health), Without<Disabled>>,
    mut died: EventWriter<ActorDied>,
    mut health_changed: EventWriter<HealthChanged>,
) {
    for (entity, actor, transform, threshold, mut health) in query.iter_mut() {
        if transform.translation.y >= threshold.0 || !health.kill() {
            continue;
        }

        logger::log_info(&format!(
            "🕳️ {:?} {:?} упал ниже {:.1} (y = {:.2})",
            actor.role, entity, threshold.0, transform.translation.y
        ));

        health_changed.write(HealthChanged {
            entity,
            current: health.current,
            max: health.max,
        });
        died.write(ActorDied {
            entity,
            killer: None,
            role: actor.role,
            cause: DeathCause::Fell,
        });
    }
}

/// Plugin physics step
///
/// Регистрирует все системы в FixedUpdate для детерминизма.
/// Порядок: ground → locomotion → gravity → integrate (+knockback decay, character controller) → fall.
pub struct PhysicsStepPlugin;

impl Plugin for PhysicsStepPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PhysicsSettings>().add_systems(
            FixedUpdate,
            (
                ground_detection,
                drive_locomotion,
                apply_gravity,
                integrate_motion,
                check_fall_threshold,
            )
                .chain(), // Последовательное выполнение
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::layers::LAYER_ENEMY;
    use crate::physics::{ActorCollider, ArenaPhysics, HitTag, StaticBox, CONTROLLER_OFFSET};

    const DT: f32 = 1.0 / 60.0;

    fn standing_center() -> Vec3 {
        Vec3::new(0.0, 1.0, 0.0)
    }

    #[test]
    fn test_character_controller_sets_velocity() {
        let mut body = PhysicsBody::default();
        body.velocity = Vec3::new(9.0, -2.0, 9.0);
        drive_horizontal(&mut body, Vec3::new(0.0, 0.0, 5.0), IntegrationMode::CharacterController, 60.0, DT);
        assert_eq!(body.velocity, Vec3::new(0.0, -2.0, 5.0));
    }

    #[test]
    fn test_rigid_body_change_is_bounded() {
        let mut body = PhysicsBody::default();
        drive_horizontal(&mut body, Vec3::new(4.5, 0.0, 0.0), IntegrationMode::RigidBody, 60.0, DT);
        // 60 m/s² × 1/60 s = 1 m/s за step
        assert!((body.velocity.x - 1.0).abs() < 1e-5, "velocity = {:?}", body.velocity);

        for _ in 0..10 {
            drive_horizontal(&mut body, Vec3::new(4.5, 0.0, 0.0), IntegrationMode::RigidBody, 60.0, DT);
        }
        assert!((body.velocity.x - 4.5).abs() < 1e-4);
    }

    const MOVER: Entity = Entity::from_raw(1);

    fn arena_with_mover(arena: ArenaPhysics, center: Vec3) -> ArenaPhysics {
        let mut arena = arena;
        arena.sync_actors(&[ActorCollider {
            entity: MOVER,
            center,
            shape: ActorShape::default(),
            layer: LAYER_ENEMY,
            tag: HitTag::Enemy,
        }]);
        arena
    }

    #[test]
    fn test_walk_on_flat_ground_keeps_height() {
        let mut arena = arena_with_mover(ArenaPhysics::flat_ground(20.0), standing_center());
        let shape = ActorShape::default();
        let mut body = PhysicsBody::default();

        let next = resolve_motion(&mut arena, MOVER, standing_center(), &shape, Vec3::new(0.1, 0.0, 0.0), &mut body, DT);
        assert!((next.x - 0.1).abs() < 1e-3, "next = {:?}", next);
        assert!((next.y - 1.0).abs() < 2.0 * CONTROLLER_OFFSET, "next = {:?}", next);
    }

    #[test]
    fn test_falling_actor_lands_on_ground() {
        let start = Vec3::new(0.0, 1.05, 0.0);
        let mut arena = arena_with_mover(ArenaPhysics::flat_ground(20.0), start);
        let shape = ActorShape::default();
        let mut body = PhysicsBody::default();
        body.velocity.y = -6.0;

        // Ноги на 0.05 над полом, смещение 0.1 вниз → стоим на полу
        let next = resolve_motion(&mut arena, MOVER, start, &shape, Vec3::new(0.0, -0.1, 0.0), &mut body, DT);
        assert!((next.y - 1.0).abs() < 2.0 * CONTROLLER_OFFSET, "next = {:?}", next);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn test_wall_stops_horizontal_motion() {
        let arena = ArenaPhysics::flat_ground(20.0).with_box(StaticBox::wall(
            Vec3::new(1.0, 0.0, -5.0),
            Vec3::new(2.0, 3.0, 5.0),
        ));
        let mut arena = arena_with_mover(arena, standing_center());
        let shape = ActorShape::default();
        let mut body = PhysicsBody::default();
        body.velocity = Vec3::new(30.0, 0.0, 0.0);

        let next = resolve_motion(&mut arena, MOVER, standing_center(), &shape, Vec3::new(0.8, 0.0, 0.0), &mut body, DT);
        // Центр не ближе radius (+ offset) к стене
        assert!(next.x <= 0.5 && next.x > 0.45, "next = {:?}", next);
        assert!(body.velocity.x.abs() < 1e-3, "velocity = {:?}", body.velocity);
    }

    #[test]
    fn test_climbs_low_step() {
        let arena = ArenaPhysics::flat_ground(20.0)
            .with_box(StaticBox::ground(Vec3::new(0.6, 0.0, -5.0), Vec3::new(5.0, 0.2, 5.0)));
        let mut arena = arena_with_mover(arena, standing_center());
        let shape = ActorShape::default();
        let mut body = PhysicsBody::default();

        let mut position = standing_center();
        for _ in 0..10 {
            position = resolve_motion(&mut arena, MOVER, position, &shape, Vec3::new(0.1, 0.0, 0.0), &mut body, DT);
        }
        // Ступенька 0.2 < STEP_HEIGHT: актор на ней, а не упёрся в край
        assert!(position.x > 0.6, "position = {:?}", position);
        assert!(position.y > 1.15, "position = {:?}", position);
    }

    #[test]
    fn test_no_ground_means_free_fall() {
        let mut arena = arena_with_mover(ArenaPhysics::new(), standing_center());
        let shape = ActorShape::default();
        let mut body = PhysicsBody::default();
        body.velocity.y = -3.0;

        let next = resolve_motion(&mut arena, MOVER, standing_center(), &shape, Vec3::new(0.0, -0.05, 0.0), &mut body, DT);
        assert!((next.y - 0.95).abs() < 1e-4);
        assert_eq!(body.velocity.y, -3.0);
    }
}

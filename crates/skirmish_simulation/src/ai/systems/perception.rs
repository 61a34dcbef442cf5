//! AI perception: валидация мозга, line-of-sight gate.

use bevy::prelude::*;

use crate::components::{Actor, ActorShape, AIConfig, Disabled, EnemyBrain, LineOfSight};
use crate::logger;
use crate::physics::layers::MASK_ENEMY_LOS;
use crate::physics::{PhysicsQuery, PhysicsWorld};

/// Система: новый мозг без валидной цели → актор Disabled
///
/// Цель проверяется один раз при появлении EnemyBrain. Цель, исчезнувшая
/// позже, не выключает актора: мозг просто простаивает.
pub fn validate_brains(
    mut commands: Commands,
    brains: Query<(Entity, &EnemyBrain), Added<EnemyBrain>>,
    targets: Query<(), (With<Actor>, With<Transform>)>,
) {
    for (entity, brain) in brains.iter() {
        if targets.contains(brain.target) {
            continue;
        }

        logger::log_warning(&format!(
            "⚠️ EnemyBrain {:?}: target {:?} не актор, враг отключён",
            entity, brain.target
        ));
        commands.entity(entity).insert(Disabled);
    }
}

/// LOS check: луч от груди к цели, враги и Ignore Raycast не блокируют
///
/// Clear только если первое попадание — сама цель. Свой capsule `viewer` исключён.
pub fn line_of_sight_clear(
    physics: &dyn PhysicsQuery,
    viewer: Entity,
    chest: Vec3,
    target: Entity,
    target_position: Vec3,
    max_distance: f32,
) -> bool {
    physics
        .raycast(chest, target_position - chest, max_distance, MASK_ENEMY_LOS, Some(viewer))
        .is_some_and(|hit| hit.entity == Some(target))
}

/// Система: обновление LineOfSight со своим cadence
pub fn ai_line_of_sight(
    time: Res<Time>,
    physics: Option<Res<PhysicsWorld>>,
    mut query: Query<(Entity, &Transform, &ActorShape, &EnemyBrain, &AIConfig, &mut LineOfSight), Without<Disabled>>,
    targets: Query<&Transform, With<Actor>>,
) {
    let Some(physics) = physics else {
        return;
    };

    let now = time.elapsed_secs();

    for (entity, transform, shape, brain, config, mut los) in query.iter_mut() {
        if now < los.next_check_at {
            continue;
        }
        los.next_check_at = now + los.check_interval;

        let was_clear = los.clear;
        los.clear = match targets.get(brain.target) {
            Ok(target_transform) => line_of_sight_clear(
                &**physics,
                entity,
                shape.chest(transform.translation),
                brain.target,
                target_transform.translation,
                config.pathfinding_ray_length,
            ),
            Err(_) => false,
        };

        if los.clear != was_clear {
            logger::log(&format!(
                "👁️ LOS {:?} → {:?}: {}",
                transform.translation,
                brain.target,
                if los.clear { "clear" } else { "blocked" }
            ));
        }
    }
}

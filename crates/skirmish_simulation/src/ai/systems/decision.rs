//! AI decision systems: направление движения, прыжок, разворот.

use bevy::prelude::*;

use crate::ai::brain::{decide_direction, facing_rotation, should_attempt_jump, DecisionBranch};
use crate::components::{
    Actor, ActorShape, AIConfig, Disabled, EnemyBrain, LineOfSight, Locomotion, MoveIntent, PhysicsBody,
};
use crate::logger;
use crate::physics::layers::MASK_JUMP_PATH;
use crate::physics::{GroundedTracker, PhysicsWorld};
use crate::DeterministicRng;

/// Система: decision step (каждые `decision_interval`)
///
/// Между решениями держит MoveIntent = `move_direction`. Цели нет
/// (despawn) → стоим на месте, без атак и прыжков.
pub fn ai_decisions(
    time: Res<Time>,
    physics: Option<Res<PhysicsWorld>>,
    mut rng: ResMut<DeterministicRng>,
    mut query: Query<
        (
            Entity,
            &Transform,
            &ActorShape,
            &Locomotion,
            &GroundedTracker,
            &AIConfig,
            Option<&LineOfSight>,
            &mut EnemyBrain,
            &mut MoveIntent,
            &mut PhysicsBody,
        ),
        Without<Disabled>,
    >,
    targets: Query<&Transform, With<Actor>>,
) {
    let now = time.elapsed_secs();

    for (entity, transform, shape, locomotion, grounded, config, los, mut brain, mut intent, mut body) in
        query.iter_mut()
    {
        let Ok(target_transform) = targets.get(brain.target) else {
            intent.clear();
            continue;
        };

        let position = transform.translation;
        let target_position = target_transform.translation;

        if brain.decision_due(now) {
            brain.next_decision_at = now + config.decision_interval;

            let los_blocked = los.is_some_and(LineOfSight::is_blocked);
            let (direction, branch) = decide_direction(
                position,
                target_position,
                config.random_move_chance,
                los_blocked,
                &mut rng.rng,
            );
            brain.move_direction = direction;

            if branch == DecisionBranch::Wander {
                logger::log(&format!("🎲 {:?} wander {:?} (los blocked: {})", entity, direction, los_blocked));
            }

            // Jump heuristic: цель выше, путь к ней свободен, можем прыгнуть
            if should_attempt_jump(position, target_position, config.jump_height_threshold) {
                let chest = shape.chest(position);
                let path_clear = physics.as_deref().is_some_and(|physics| {
                    physics
                        .raycast(
                            chest,
                            target_position - chest,
                            config.pathfinding_ray_length,
                            MASK_JUMP_PATH,
                            Some(entity),
                        )
                        .is_none()
                });

                if path_clear && grounded.can_jump(now) {
                    body.jump(locomotion.jump_force);
                    logger::log(&format!("🦘 {:?} jumps toward {:?}", entity, brain.target));
                }
            }
        }

        intent.set(brain.move_direction);
    }
}

/// Система: плавный разворот к цели (slerp, скорость `move_speed * dt`)
pub fn ai_facing(
    time: Res<Time>,
    brains: Query<(Entity, &EnemyBrain, &Locomotion), Without<Disabled>>,
    mut transforms: Query<&mut Transform>,
) {
    let delta = time.delta_secs();

    for (entity, brain, locomotion) in brains.iter() {
        let Ok(target_position) = transforms.get(brain.target).map(|t| t.translation) else {
            continue;
        };
        let Ok(mut transform) = transforms.get_mut(entity) else {
            continue;
        };

        let Some(desired) = facing_rotation(target_position - transform.translation) else {
            continue;
        };

        let factor = (locomotion.move_speed * delta).clamp(0.0, 1.0);
        transform.rotation = transform.rotation.slerp(desired, factor);
    }
}

//! AI attack system.

use bevy::prelude::*;

use crate::ai::brain::roll_hits;
use crate::combat::AttackIntent;
use crate::components::{Actor, ActorShape, Attacker, Disabled, EnemyBrain, Health};
use crate::logger;
use crate::DeterministicRng;

/// Система: timed attack
///
/// `now >= ready_at` и цель в `range` → cooldown стартует (даже при промахе),
/// roll `< accuracy` → AttackIntent от груди к цели. Подтверждение лучом
/// делает CombatResolver.
pub fn ai_attacks(
    time: Res<Time>,
    mut rng: ResMut<DeterministicRng>,
    mut query: Query<(Entity, &Actor, &Transform, &ActorShape, &EnemyBrain, &mut Attacker), Without<Disabled>>,
    targets: Query<(&Transform, &Health)>,
    mut intents: EventWriter<AttackIntent>,
) {
    let now = time.elapsed_secs();

    for (entity, actor, transform, shape, brain, mut attacker) in query.iter_mut() {
        let Ok((target_transform, target_health)) = targets.get(brain.target) else {
            continue;
        };
        if !target_health.is_alive() || !attacker.is_ready(now) {
            continue;
        }

        let position = transform.translation;
        let target_position = target_transform.translation;
        if position.distance(target_position) > attacker.range {
            continue;
        }

        attacker.start_cooldown(now);

        if !roll_hits(attacker.accuracy, &mut rng.rng) {
            logger::log(&format!("🎯 {:?} accuracy roll failed", entity));
            continue;
        }

        let chest = shape.chest(position);
        intents.write(
            AttackIntent::hitscan(entity, actor.role, position, chest, target_position - chest)
                .with_target(brain.target)
                .with_stats(attacker.range, attacker.damage, attacker.knockback_force),
        );
    }
}

//! Spawn helpers: актор собирается из tuning preset
//!
//! Цели (player для врагов и hazard'ов) передаются явно, никаких поисков
//! по tag во время тиков.

use bevy::prelude::*;

use crate::combat::ContactHazard;
use crate::components::{
    Actor, AIConfig, Attacker, DeathPolicy, EnemyBrain, FallThreshold, Health, LineOfSight, Locomotion, PhysicsBody,
    Player, PlayerInput, PlayerView, SpawnPoint,
};
use crate::physics::{GroundedTracker, Knockback};
use crate::tuning::{ActorTuning, EnemyTuning, HazardTuning, PlayerTuning};

/// Общий ActorCore bundle из tuning
fn actor_core(position: Vec3, tuning: &ActorTuning) -> impl Bundle {
    (
        Transform::from_translation(position),
        SpawnPoint::new(position),
        Health::new(tuning.max_health),
        Knockback::new(tuning.knockback_decay, tuning.knockback_lift),
        GroundedTracker::new(tuning.coyote_time),
        PhysicsBody::new(tuning.mass),
        Locomotion {
            move_speed: tuning.move_speed,
            jump_force: tuning.jump_force,
            acceleration: tuning.acceleration,
        },
    )
}

/// Spawn player-controlled актора
pub fn spawn_player(commands: &mut Commands, position: Vec3, tuning: &PlayerTuning) -> Entity {
    let mut entity = commands.spawn((
        Actor::player(),
        Player,
        actor_core(position, &tuning.actor),
        tuning.integration,
        DeathPolicy::Respawn,
        PlayerInput::default(),
        PlayerView {
            pitch: 0.0,
            mouse_sensitivity: tuning.mouse_sensitivity,
            eye_height: tuning.eye_height,
        },
        Attacker {
            damage: tuning.actor.attack_damage,
            knockback_force: tuning.actor.knockback_force,
            range: tuning.attack_range,
            accuracy: 1.0,
            attack_delay: tuning.attack_delay,
            ready_at: 0.0,
        },
    ));

    if let Some(threshold) = tuning.actor.fall_threshold {
        entity.insert(FallThreshold(threshold));
    }

    entity.id()
}

/// Параметры спавна врага
#[derive(Debug, Clone, Copy)]
pub struct EnemySpawn {
    pub position: Vec3,
    /// Цель мозга (игрок)
    pub target: Entity,
    /// Позиция цели на момент спавна (начальное направление)
    pub target_position: Vec3,
    /// Текущее время симуляции
    pub now: f32,
}

/// Spawn врага с мозгом
///
/// Начальное направление — к цели, первое решение через `decision_interval`.
pub fn spawn_enemy(commands: &mut Commands, spawn: EnemySpawn, tuning: &EnemyTuning) -> Entity {
    let mut brain = EnemyBrain::new(spawn.target);
    brain.move_direction = crate::ai::brain::direction_to_target_horizontal(spawn.position, spawn.target_position)
        .unwrap_or(Vec3::ZERO);
    brain.next_decision_at = spawn.now + tuning.decision_interval;

    let mut entity = commands.spawn((
        Actor::enemy(),
        actor_core(spawn.position, &tuning.actor),
        tuning.integration,
        tuning.death_policy,
        brain,
        AIConfig {
            decision_interval: tuning.decision_interval,
            random_move_chance: tuning.random_move_chance,
            pathfinding_ray_length: tuning.pathfinding_ray_length,
            ..default()
        },
        Attacker {
            damage: tuning.actor.attack_damage,
            knockback_force: tuning.actor.knockback_force,
            range: tuning.attack_range,
            accuracy: tuning.accuracy,
            attack_delay: tuning.attack_delay,
            ready_at: spawn.now,
        },
    ));

    if tuning.line_of_sight {
        let mut los = LineOfSight::new(tuning.los_check_interval);
        los.next_check_at = spawn.now + tuning.los_check_interval;
        entity.insert(los);
    }
    if let Some(threshold) = tuning.actor.fall_threshold {
        entity.insert(FallThreshold(threshold));
    }

    entity.id()
}

/// Spawn контактного hazard'а
pub fn spawn_hazard(commands: &mut Commands, position: Vec3, target: Entity, tuning: &HazardTuning) -> Entity {
    commands
        .spawn((
            Transform::from_translation(position),
            ContactHazard::new(target, tuning.damage, tuning.interval, tuning.range, tuning.knockback_force),
        ))
        .id()
}

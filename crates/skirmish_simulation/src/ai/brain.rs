//! Решения мозга врага (чистые функции, без ECS)
//!
//! Все броски идут через переданный RNG: в симуляции это DeterministicRng.

use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;

/// Какую ветку выбрал decision step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionBranch {
    /// Идём к цели
    Pursue,
    /// Случайное направление (roll или заблокированный LOS)
    Wander,
}

/// Случайное unit направление в горизонтальной плоскости
pub fn random_horizontal_direction<R: Rng>(rng: &mut R) -> Vec3 {
    let angle = rng.gen_range(0.0..TAU);
    Vec3::new(angle.cos(), 0.0, angle.sin())
}

/// Горизонтальное направление к цели (None — цель ровно над/под нами)
pub fn direction_to_target_horizontal(from: Vec3, to: Vec3) -> Option<Vec3> {
    (to - from).with_y(0.0).try_normalize()
}

/// Decision step
///
/// LOS заблокирован → случайное направление без броска.
/// Иначе roll `< random_move_chance` → случайное, иначе к цели.
pub fn decide_direction<R: Rng>(
    position: Vec3,
    target_position: Vec3,
    random_move_chance: f32,
    los_blocked: bool,
    rng: &mut R,
) -> (Vec3, DecisionBranch) {
    if los_blocked {
        return (random_horizontal_direction(rng), DecisionBranch::Wander);
    }

    if rng.gen::<f32>() < random_move_chance {
        return (random_horizontal_direction(rng), DecisionBranch::Wander);
    }

    let direction = direction_to_target_horizontal(position, target_position).unwrap_or(Vec3::ZERO);
    (direction, DecisionBranch::Pursue)
}

/// Цель заметно выше нас → стоит попробовать прыжок
pub fn should_attempt_jump(position: Vec3, target_position: Vec3, height_threshold: f32) -> bool {
    target_position.y - position.y > height_threshold
}

/// Бросок точности: попадание при `roll < accuracy`
pub fn roll_hits<R: Rng>(accuracy: f32, rng: &mut R) -> bool {
    rng.gen::<f32>() < accuracy
}

/// Yaw, при котором forward (−Z) смотрит вдоль `direction`
pub fn facing_rotation(direction: Vec3) -> Option<Quat> {
    let direction = direction.with_y(0.0).try_normalize()?;
    Some(Quat::from_rotation_y(f32::atan2(-direction.x, -direction.z)))
}

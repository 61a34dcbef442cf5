//! Knockback — временная внешняя скорость, наложенная на актора
//!
//! Импульсы накапливаются (сумма, не перезапись) и разрешаются на следующем
//! physics step: integrate складывает `Knockback.velocity` с `PhysicsBody.velocity`,
//! после чего knockback затухает.

use bevy::prelude::*;

/// Ниже этой величины knockback обнуляется (без остаточного дрейфа)
pub const KNOCKBACK_EPSILON: f32 = 0.01;

/// Скорость затухания (1/сек) по умолчанию
pub const DEFAULT_KNOCKBACK_DECAY: f32 = 5.0;

/// Вертикальный "подброс" направления knockback по умолчанию
pub const DEFAULT_KNOCKBACK_LIFT: f32 = 0.5;

/// Накопленная knockback скорость актора
///
/// Инвариант: `velocity` либо ровно ноль, либо `length() >= KNOCKBACK_EPSILON`
/// после каждого `step`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Knockback {
    pub velocity: Vec3,
    /// Rate затухания (lerp к нулю с фактором `decay * dt`)
    pub decay: f32,
    /// Y-компонента направления перед второй нормализацией (0.1–0.5 по роли)
    pub lift: f32,
}

impl Default for Knockback {
    fn default() -> Self {
        Self::new(DEFAULT_KNOCKBACK_DECAY, DEFAULT_KNOCKBACK_LIFT)
    }
}

impl Knockback {
    pub fn new(decay: f32, lift: f32) -> Self {
        Self {
            velocity: Vec3::ZERO,
            decay,
            lift,
        }
    }

    /// Направление отбрасывания от `source_position` к `actor_position`
    ///
    /// horizontal(actor − source) → normalize → y = lift → normalize.
    /// Совпадающие позиции по горизонтали дают чисто вертикальный импульс.
    pub fn impulse_direction(actor_position: Vec3, source_position: Vec3, lift: f32) -> Vec3 {
        let horizontal = (actor_position - source_position).with_y(0.0).normalize_or_zero();
        horizontal.with_y(lift).try_normalize().unwrap_or(Vec3::Y)
    }

    /// Накопить импульс `force` от источника
    ///
    /// Невалидная сила (≤ 0, NaN) игнорируется.
    pub fn apply_impulse(&mut self, actor_position: Vec3, source_position: Vec3, force: f32) {
        if !(force > 0.0) || !force.is_finite() {
            return;
        }

        let direction = Self::impulse_direction(actor_position, source_position, self.lift);
        self.velocity += direction * force;
    }

    /// Затухание за один physics step
    pub fn step(&mut self, dt: f32) {
        let t = (self.decay * dt).clamp(0.0, 1.0);
        self.velocity = self.velocity.lerp(Vec3::ZERO, t);

        if self.velocity.length() < KNOCKBACK_EPSILON {
            self.velocity = Vec3::ZERO;
        }
    }

    pub fn is_active(&self) -> bool {
        self.velocity != Vec3::ZERO
    }

    pub fn reset(&mut self) {
        self.velocity = Vec3::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_impulse_magnitude_equals_force() {
        let mut knockback = Knockback::default();
        knockback.apply_impulse(Vec3::new(5.0, 0.0, 0.0), Vec3::ZERO, 13.0);

        assert!((knockback.velocity.length() - 13.0).abs() < 1e-4);
        // Отбрасывает от источника и немного вверх
        assert!(knockback.velocity.x > 0.0);
        assert!(knockback.velocity.y > 0.0);
        assert!(knockback.velocity.z.abs() < 1e-6);
    }

    #[test]
    fn test_direction_formula_uses_lift() {
        let direction = Knockback::impulse_direction(Vec3::new(0.0, 3.0, 2.0), Vec3::ZERO, 0.5);
        // Высота источника не влияет: горизонталь (0,0,1) + lift 0.5 → normalize
        let expected = Vec3::new(0.0, 0.5, 1.0).normalize();
        assert!((direction - expected).length() < 1e-5, "direction = {:?}", direction);
    }

    #[test]
    fn test_same_position_is_vertical() {
        let direction = Knockback::impulse_direction(Vec3::new(1.0, 0.0, 1.0), Vec3::new(1.0, -4.0, 1.0), 0.2);
        assert!((direction - Vec3::Y).length() < 1e-6, "direction = {:?}", direction);
    }

    #[test]
    fn test_superposition_of_simultaneous_impulses() {
        let actor = Vec3::new(1.0, 0.0, 1.0);
        let source_a = Vec3::new(-3.0, 0.0, 0.0);
        let source_b = Vec3::new(2.0, 1.0, 6.0);

        let mut combined = Knockback::default();
        combined.apply_impulse(actor, source_a, 10.0);
        combined.apply_impulse(actor, source_b, 7.0);

        let mut only_a = Knockback::default();
        only_a.apply_impulse(actor, source_a, 10.0);
        let mut only_b = Knockback::default();
        only_b.apply_impulse(actor, source_b, 7.0);

        let sum = only_a.velocity + only_b.velocity;
        assert!((combined.velocity - sum).length() < 1e-5);
    }

    #[test]
    fn test_invalid_force_is_ignored() {
        let mut knockback = Knockback::default();
        knockback.apply_impulse(Vec3::X, Vec3::ZERO, 0.0);
        knockback.apply_impulse(Vec3::X, Vec3::ZERO, -4.0);
        knockback.apply_impulse(Vec3::X, Vec3::ZERO, f32::NAN);
        assert!(!knockback.is_active());
    }

    #[test]
    fn test_decay_is_monotonic_and_reaches_zero() {
        let mut knockback = Knockback::default();
        knockback.apply_impulse(Vec3::X, Vec3::ZERO, 100.0);

        let mut previous = knockback.velocity.length();
        let mut steps = 0;
        while knockback.is_active() {
            knockback.step(DT);
            let current = knockback.velocity.length();
            assert!(current <= previous, "step {}: {} > {}", steps, current, previous);
            previous = current;
            steps += 1;
            assert!(steps < 1000, "knockback не затух за 1000 шагов");
        }

        assert_eq!(knockback.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_large_decay_clears_in_one_step() {
        let mut knockback = Knockback::new(120.0, 0.5);
        knockback.apply_impulse(Vec3::X, Vec3::ZERO, 10.0);
        knockback.step(DT);
        assert_eq!(knockback.velocity, Vec3::ZERO);
    }
}

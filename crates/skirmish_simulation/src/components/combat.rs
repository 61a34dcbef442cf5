//! Combat компоненты

use bevy::prelude::*;

/// Способность атаковать (ranged hitscan)
///
/// Cooldown — deadline: атака возможна когда `now >= ready_at`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Attacker {
    pub damage: f32,
    pub knockback_force: f32,
    pub range: f32,
    /// Шанс попадания (0..=1), roll `< accuracy`
    pub accuracy: f32,
    /// Период между атаками (секунды)
    pub attack_delay: f32,
    /// Время, начиная с которого можно атаковать снова
    pub ready_at: f32,
}

impl Default for Attacker {
    fn default() -> Self {
        Self {
            damage: 2.0,
            knockback_force: 10.0,
            range: 10.0,
            accuracy: 1.0,
            attack_delay: 0.5,
            ready_at: 0.0,
        }
    }
}

impl Attacker {
    pub fn is_ready(&self, now: f32) -> bool {
        now >= self.ready_at
    }

    /// Начать cooldown (вызывается при каждой попытке атаки, даже промахе)
    pub fn start_cooldown(&mut self, now: f32) {
        self.ready_at = now + self.attack_delay;
    }
}

//! ContactHazard — статический источник урона (кактус)
//!
//! Пока цель в радиусе: удар сразу при входе, затем каждые `interval` секунд.
//! Выход из радиуса сбрасывает cadence.

use bevy::prelude::*;

use crate::combat::{ActorDied, DamageDealt, HealthChanged, Strike};
use crate::components::{Actor, Disabled, Health};
use crate::physics::Knockback;

#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct ContactHazard {
    pub damage: f32,
    pub interval: f32,
    pub range: f32,
    pub knockback_force: f32,
    /// Цель инжектится при спавне
    pub target: Entity,
    /// None — цель вне радиуса (следующий вход бьёт сразу)
    pub next_hit_at: Option<f32>,
}

impl ContactHazard {
    pub fn new(target: Entity, damage: f32, interval: f32, range: f32, knockback_force: f32) -> Self {
        Self {
            damage,
            interval,
            range,
            knockback_force,
            target,
            next_hit_at: None,
        }
    }

    /// Cadence: бить ли на этом тике
    pub fn should_strike(&mut self, now: f32, in_range: bool) -> bool {
        if !in_range {
            self.next_hit_at = None;
            return false;
        }

        match self.next_hit_at {
            Some(next) if now < next => false,
            _ => {
                self.next_hit_at = Some(now + self.interval);
                true
            }
        }
    }
}

/// Система: контактный урон от hazard'ов
pub fn hazard_contact(
    time: Res<Time>,
    mut hazards: Query<(&Transform, &mut ContactHazard)>,
    mut targets: Query<(&Actor, &Transform, &mut Health, &mut Knockback), Without<Disabled>>,
    mut damage_events: EventWriter<DamageDealt>,
    mut died_events: EventWriter<ActorDied>,
    mut health_events: EventWriter<HealthChanged>,
) {
    let now = time.elapsed_secs();

    for (hazard_transform, mut hazard) in hazards.iter_mut() {
        // Цель исчезла — hazard просто ждёт
        let Ok((actor, target_transform, mut health, mut knockback)) = targets.get_mut(hazard.target) else {
            hazard.next_hit_at = None;
            continue;
        };

        let source = hazard_transform.translation;
        let in_range = source.distance(target_transform.translation) <= hazard.range;
        if !hazard.should_strike(now, in_range) {
            continue;
        }

        let strike = Strike {
            source_position: source,
            damage: hazard.damage,
            knockback_force: hazard.knockback_force,
        };

        if let Some(report) = strike.land(
            hazard.target,
            actor.role,
            target_transform.translation,
            &mut health,
            &mut knockback,
        ) {
            report.emit(None, &mut damage_events, &mut died_events, &mut health_events);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cactus() -> ContactHazard {
        ContactHazard::new(Entity::PLACEHOLDER, 2.0, 0.5, 1.5, 13.0)
    }

    #[test]
    fn test_strikes_on_entry_then_every_interval() {
        let mut hazard = cactus();

        assert!(hazard.should_strike(1.0, true));
        assert!(!hazard.should_strike(1.2, true));
        assert!(!hazard.should_strike(1.49, true));
        assert!(hazard.should_strike(1.5, true));
        assert!(!hazard.should_strike(1.7, true));
    }

    #[test]
    fn test_leaving_range_resets_cadence() {
        let mut hazard = cactus();

        assert!(hazard.should_strike(1.0, true));
        assert!(!hazard.should_strike(1.1, false));
        assert_eq!(hazard.next_hit_at, None);
        // Повторный вход — удар сразу, не дожидаясь интервала
        assert!(hazard.should_strike(1.2, true));
    }

    #[test]
    fn test_out_of_range_never_strikes() {
        let mut hazard = cactus();
        for step in 0..100 {
            assert!(!hazard.should_strike(step as f32 * 0.1, false));
        }
    }
}

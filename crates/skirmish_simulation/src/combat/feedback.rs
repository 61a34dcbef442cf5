//! Render/UI feedback сигналы
//!
//! Симуляция не рисует: она только публикует события (FlashStarted,
//! HealthChanged), host подписывается и красит материал / обновляет UI.

use bevy::prelude::*;

use crate::combat::DamageDealt;

/// Длительность flash при получении урона (секунды)
pub const FLASH_DURATION: f32 = 0.2;

/// Таймер flash (0 — неактивен). Повторный урон перезапускает его.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Flash {
    pub remaining: f32,
}

impl Flash {
    pub fn start(&mut self, duration: f32) {
        self.remaining = duration.max(0.0);
    }

    /// Продвинуть таймер. true — flash закончился на этом тике.
    pub fn tick(&mut self, delta: f32) -> bool {
        if self.remaining <= 0.0 {
            return false;
        }
        self.remaining = (self.remaining - delta).max(0.0);
        self.remaining == 0.0
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }
}

/// RenderFeedback: подсветить актора на `duration` секунд
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct FlashStarted {
    pub entity: Entity,
    pub duration: f32,
}

/// RenderFeedback: flash закончился (вернуть исходный цвет)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct FlashEnded {
    pub entity: Entity,
}

/// HealthDisplay: здоровье изменилось
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct HealthChanged {
    pub entity: Entity,
    pub current: f32,
    pub max: f32,
}

/// Система: продвинуть flash таймеры
pub fn tick_flash(time: Res<Time>, mut query: Query<(Entity, &mut Flash)>, mut ended: EventWriter<FlashEnded>) {
    let delta = time.delta_secs();

    for (entity, mut flash) in query.iter_mut() {
        if flash.tick(delta) {
            ended.write(FlashEnded { entity });
        }
    }
}

/// Система: DamageDealt → (пере)запуск flash
pub fn start_flash_on_damage(
    mut damage_events: EventReader<DamageDealt>,
    mut query: Query<&mut Flash>,
    mut started: EventWriter<FlashStarted>,
) {
    for event in damage_events.read() {
        // Terminate актор мог уже исчезнуть
        let Ok(mut flash) = query.get_mut(event.target) else {
            continue;
        };

        flash.start(FLASH_DURATION);
        started.write(FlashStarted {
            entity: event.target,
            duration: FLASH_DURATION,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_expires_after_duration() {
        let mut flash = Flash::default();
        assert!(!flash.is_active());

        flash.start(FLASH_DURATION);
        assert!(flash.is_active());
        assert!(!flash.tick(0.1));
        assert!(flash.tick(0.15));
        assert!(!flash.is_active());
        // Неактивный flash больше не "заканчивается"
        assert!(!flash.tick(0.1));
    }

    #[test]
    fn test_restart_resets_timer() {
        let mut flash = Flash::default();
        flash.start(FLASH_DURATION);
        flash.tick(0.15);
        flash.start(FLASH_DURATION);
        assert_eq!(flash.remaining, FLASH_DURATION);
    }
}

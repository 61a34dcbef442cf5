//! Grounded tracking с coyote time

use bevy::prelude::*;

/// Радиус ground check sphere под ногами актора
pub const GROUND_CHECK_RADIUS: f32 = 0.2;

/// Окно coyote time по умолчанию (секунды)
pub const DEFAULT_COYOTE_TIME: f32 = 0.1;

/// Состояние контакта с землёй
///
/// `can_jump` доверяет последнему контакту ещё `coyote_time` секунд после
/// отрыва, чтобы прыжок, нажатый на кадр позже, всё равно сработал.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct GroundedTracker {
    grounded: bool,
    /// Время последнего true-контакта (NEG_INFINITY — ещё не касались земли)
    last_grounded_at: f32,
    pub coyote_time: f32,
}

impl Default for GroundedTracker {
    fn default() -> Self {
        Self::new(DEFAULT_COYOTE_TIME)
    }
}

impl GroundedTracker {
    pub fn new(coyote_time: f32) -> Self {
        Self {
            grounded: false,
            last_grounded_at: f32::NEG_INFINITY,
            coyote_time,
        }
    }

    /// Результат ground query за этот step
    pub fn update(&mut self, grounded: bool, now: f32) {
        self.grounded = grounded;
        if grounded {
            self.last_grounded_at = now;
        }
    }

    pub fn can_jump(&self, now: f32) -> bool {
        self.grounded || now < self.last_grounded_at + self.coyote_time
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn last_grounded_at(&self) -> f32 {
        self.last_grounded_at
    }

    /// Сброс после respawn (актор телепортирован, старый контакт невалиден)
    pub fn reset(&mut self) {
        self.grounded = false;
        self.last_grounded_at = f32::NEG_INFINITY;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_grounded_cannot_jump() {
        let tracker = GroundedTracker::default();
        assert!(!tracker.can_jump(0.0));
        assert!(!tracker.can_jump(100.0));
    }

    #[test]
    fn test_grounded_can_jump() {
        let mut tracker = GroundedTracker::default();
        tracker.update(true, 1.0);
        assert!(tracker.is_grounded());
        assert!(tracker.can_jump(1.0));
        assert!(tracker.can_jump(50.0)); // всё ещё стоим
    }

    #[test]
    fn test_coyote_window_after_leaving_ground() {
        let mut tracker = GroundedTracker::new(0.1);
        tracker.update(true, 2.0);
        tracker.update(false, 2.02);

        assert!(tracker.can_jump(2.02));
        assert!(tracker.can_jump(2.09));
        // Окно полуоткрытое: [t, t + coyote)
        assert!(!tracker.can_jump(2.1));
        assert!(!tracker.can_jump(3.0));

        // Снова на земле — снова можно
        tracker.update(true, 3.0);
        assert!(tracker.can_jump(3.0));
    }

    #[test]
    fn test_reset_forgets_contact() {
        let mut tracker = GroundedTracker::default();
        tracker.update(true, 5.0);
        tracker.reset();
        assert!(!tracker.is_grounded());
        assert!(!tracker.can_jump(5.0));
    }
}

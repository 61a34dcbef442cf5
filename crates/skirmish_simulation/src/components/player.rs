//! Player control компоненты
//!
//! Отмечает entity, которым управляет игрок (в отличие от AI), и хранит
//! абстрактный input sample + состояние камеры.

use bevy::prelude::*;

/// Marker component для player-controlled entity
///
/// AI системы работают только с `EnemyBrain`, input системы — с `With<Player>`.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Player;

/// Input sample за frame (заполняет host: устройство ввода, скрипт, тест)
///
/// `jump` / `attack` — edge флаги, PlayerController сбрасывает их после обработки.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PlayerInput {
    /// x — strafe (right +), y — forward (+)
    pub move_axes: Vec2,
    /// x — yaw, y — pitch (в единицах мыши)
    pub look_delta: Vec2,
    pub jump: bool,
    pub attack: bool,
}

/// Камера игрока
///
/// `pitch` в градусах, положительный — взгляд вниз. Yaw живёт в Transform.rotation тела.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PlayerView {
    pub pitch: f32,
    pub mouse_sensitivity: f32,
    /// Высота глаз над центром тела
    pub eye_height: f32,
}

impl Default for PlayerView {
    fn default() -> Self {
        Self {
            pitch: 0.0,
            mouse_sensitivity: 100.0,
            eye_height: 0.6,
        }
    }
}

impl PlayerView {
    pub fn eye(&self, center: Vec3) -> Vec3 {
        center + Vec3::Y * self.eye_height
    }

    /// Направление взгляда: yaw тела + pitch камеры
    pub fn view_direction(&self, body_rotation: Quat) -> Vec3 {
        body_rotation * Quat::from_rotation_x(-self.pitch.to_radians()) * Vec3::NEG_Z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_direction_default_is_forward() {
        let view = PlayerView::default();
        let direction = view.view_direction(Quat::IDENTITY);
        assert!((direction - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn test_view_direction_pitch_down() {
        let view = PlayerView {
            pitch: 90.0,
            ..default()
        };
        let direction = view.view_direction(Quat::IDENTITY);
        assert!((direction - Vec3::NEG_Y).length() < 1e-5, "direction = {:?}", direction);
    }
}

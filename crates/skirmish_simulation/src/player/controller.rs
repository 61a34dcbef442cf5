//! PlayerController: input sample → movement / look / jump / attack
//!
//! Input абстрактный (PlayerInput компонент), устройство ввода — забота host'а.

use bevy::prelude::*;

use crate::combat::AttackIntent;
use crate::components::{Actor, Attacker, Disabled, MoveIntent, PhysicsBody, Player, PlayerInput, PlayerView, Locomotion};
use crate::logger;
use crate::physics::GroundedTracker;

/// Предел pitch камеры (градусы)
pub const PITCH_LIMIT: f32 = 90.0;

/// Камера-относительное направление движения (длина ≤ 1)
///
/// forward/right берутся из yaw тела и проецируются на горизонталь.
pub fn camera_relative_move(body_rotation: Quat, move_axes: Vec2) -> Vec3 {
    let forward = (body_rotation * Vec3::NEG_Z).with_y(0.0).normalize_or_zero();
    let right = (body_rotation * Vec3::X).with_y(0.0).normalize_or_zero();

    (forward * move_axes.y + right * move_axes.x).clamp_length_max(1.0)
}

/// Look: pitch камеры (clamp ±90°) и yaw тела
///
/// Возвращает yaw delta (радианы) для поворота тела.
pub fn apply_look(view: &mut PlayerView, look_delta: Vec2, delta: f32) -> f32 {
    let scale = view.mouse_sensitivity * delta;

    view.pitch = (view.pitch - look_delta.y * scale).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    -(look_delta.x * scale).to_radians()
}

/// Система: input sample → MoveIntent, поворот, прыжок, атака
///
/// `jump`/`attack` — edge флаги: сбрасываются здесь.
pub fn player_control(
    time: Res<Time>,
    mut query: Query<
        (
            Entity,
            &Actor,
            &mut Transform,
            &mut PlayerInput,
            &mut PlayerView,
            &mut MoveIntent,
            &mut PhysicsBody,
            &Locomotion,
            &GroundedTracker,
            Option<&mut Attacker>,
        ),
        (With<Player>, Without<Disabled>),
    >,
    mut intents: EventWriter<AttackIntent>,
) {
    let now = time.elapsed_secs();
    let delta = time.delta_secs();

    for (entity, actor, mut transform, mut input, mut view, mut intent, mut body, locomotion, grounded, attacker) in
        query.iter_mut()
    {
        // Look
        let yaw = apply_look(&mut view, input.look_delta, delta);
        if yaw != 0.0 {
            transform.rotate_y(yaw);
        }

        // Move
        intent.set(camera_relative_move(transform.rotation, input.move_axes));

        // Jump (coyote time)
        if input.jump {
            input.jump = false;
            if grounded.can_jump(now) {
                body.jump(locomotion.jump_force);
                logger::log(&format!("🦘 Player {:?} jumps", entity));
            }
        }

        // Attack (view ray, cooldown)
        if input.attack {
            input.attack = false;

            let Some(mut attacker) = attacker else {
                continue;
            };
            if !attacker.is_ready(now) {
                continue;
            }
            attacker.start_cooldown(now);

            let position = transform.translation;
            intents.write(
                AttackIntent::hitscan(
                    entity,
                    actor.role,
                    position,
                    view.eye(position),
                    view.view_direction(transform.rotation),
                )
                .with_stats(attacker.range, attacker.damage, attacker.knockback_force),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_axis_moves_along_view() {
        let direction = camera_relative_move(Quat::IDENTITY, Vec2::new(0.0, 1.0));
        assert!((direction - Vec3::NEG_Z).length() < 1e-6);

        // Повернулись на 90° влево: forward → −X
        let rotation = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let direction = camera_relative_move(rotation, Vec2::new(0.0, 1.0));
        assert!((direction - Vec3::NEG_X).length() < 1e-5, "direction = {:?}", direction);
    }

    #[test]
    fn test_diagonal_is_clamped_to_unit() {
        let direction = camera_relative_move(Quat::IDENTITY, Vec2::new(1.0, 1.0));
        assert!((direction.length() - 1.0).abs() < 1e-5);
        assert_eq!(direction.y, 0.0);

        let slow = camera_relative_move(Quat::IDENTITY, Vec2::new(0.5, 0.0));
        assert!((slow - Vec3::new(0.5, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut view = PlayerView {
            mouse_sensitivity: 100.0,
            ..default()
        };

        apply_look(&mut view, Vec2::new(0.0, -50.0), 1.0);
        assert_eq!(view.pitch, PITCH_LIMIT);

        apply_look(&mut view, Vec2::new(0.0, 500.0), 1.0);
        assert_eq!(view.pitch, -PITCH_LIMIT);
    }

    #[test]
    fn test_yaw_uses_sensitivity_and_delta() {
        let mut view = PlayerView {
            mouse_sensitivity: 90.0,
            ..default()
        };

        let yaw = apply_look(&mut view, Vec2::new(1.0, 0.0), 1.0);
        assert!((yaw + std::f32::consts::FRAC_PI_2).abs() < 1e-5);
        assert_eq!(view.pitch, 0.0);
    }
}

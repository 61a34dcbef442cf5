//! CombatResolver — общий алгоритм разрешения атак (игрок + враги)
//!
//! AttackIntent (event) → raycast подтверждение → Strike::land → события.
//! Промах — ожидаемый исход, не ошибка (только debug лог).

use bevy::prelude::*;

use crate::combat::{ActorDied, DamageDealt, HealthChanged, HitReport, Strike};
use crate::components::{Actor, ActorRole, Disabled, Health};
use crate::logger;
use crate::physics::layers::MASK_RAYCAST_DEFAULT;
use crate::physics::{HitTag, Knockback, PhysicsQuery, PhysicsWorld};

/// Маска атакующего луча: всё кроме своего слоя и Ignore Raycast
pub fn attack_mask(attacker_role: ActorRole) -> u32 {
    MASK_RAYCAST_DEFAULT & !attacker_role.layer()
}

/// Намерение атаки (hitscan). Живёт один frame.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct AttackIntent {
    pub source: Entity,
    /// Откуда считается knockback
    pub source_position: Vec3,
    /// Конкретная цель (AI). None — первый актор с `expected_tag` на луче (игрок).
    pub target: Option<Entity>,
    pub expected_tag: HitTag,
    pub origin: Vec3,
    pub direction: Vec3,
    pub range: f32,
    pub mask: u32,
    pub damage: f32,
    pub knockback_force: f32,
}

impl AttackIntent {
    /// Луч от `origin` вдоль `direction` со статами атакующего
    pub fn hitscan(source: Entity, role: ActorRole, source_position: Vec3, origin: Vec3, direction: Vec3) -> Self {
        Self {
            source,
            source_position,
            target: None,
            expected_tag: role.opponent().hit_tag(),
            origin,
            direction,
            range: 0.0,
            mask: attack_mask(role),
            damage: 0.0,
            knockback_force: 0.0,
        }
    }

    pub fn with_target(mut self, target: Entity) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_stats(mut self, range: f32, damage: f32, knockback_force: f32) -> Self {
        self.range = range;
        self.damage = damage;
        self.knockback_force = knockback_force;
        self
    }

    pub fn strike(&self) -> Strike {
        Strike {
            source_position: self.source_position,
            damage: self.damage,
            knockback_force: self.knockback_force,
        }
    }
}

/// Исход разрешения атаки
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttackOutcome {
    Hit(HitReport),
    Miss,
}

/// Raycast подтверждение: первое попадание — нужный актор с нужным tag
///
/// Свой коллайдер атакующего исключён; в упор (origin внутри цели) — попадание.
pub fn confirm_hit(physics: &dyn PhysicsQuery, intent: &AttackIntent) -> Option<Entity> {
    let hit = physics.raycast(intent.origin, intent.direction, intent.range, intent.mask, Some(intent.source))?;

    if hit.tag != intent.expected_tag {
        return None;
    }

    let entity = hit.entity?;
    match intent.target {
        Some(target) if target != entity => None,
        _ => Some(entity),
    }
}

/// Разрешить одну атаку против живых акторов
pub fn resolve_attack(
    physics: &dyn PhysicsQuery,
    intent: &AttackIntent,
    targets: &mut Query<(&Actor, &Transform, &mut Health, &mut Knockback), Without<Disabled>>,
) -> AttackOutcome {
    let Some(entity) = confirm_hit(physics, intent) else {
        return AttackOutcome::Miss;
    };

    let Ok((actor, transform, mut health, mut knockback)) = targets.get_mut(entity) else {
        return AttackOutcome::Miss;
    };

    match intent
        .strike()
        .land(entity, actor.role, transform.translation, &mut health, &mut knockback)
    {
        Some(report) => AttackOutcome::Hit(report),
        None => AttackOutcome::Miss,
    }
}

/// Система: разрешение всех AttackIntent за frame
///
/// Позиции — с последнего physics step (внутри frame никто не двигается).
pub fn resolve_attacks(
    physics: Option<Res<PhysicsWorld>>,
    mut intents: EventReader<AttackIntent>,
    mut targets: Query<(&Actor, &Transform, &mut Health, &mut Knockback), Without<Disabled>>,
    mut damage_events: EventWriter<DamageDealt>,
    mut died_events: EventWriter<ActorDied>,
    mut health_events: EventWriter<HealthChanged>,
    mut warned: Local<bool>,
) {
    let Some(physics) = physics else {
        if !intents.is_empty() && !*warned {
            logger::log_warning("PhysicsWorld resource отсутствует: атаки не разрешаются");
            *warned = true;
        }
        intents.clear();
        return;
    };

    for intent in intents.read() {
        match resolve_attack(&**physics, intent, &mut targets) {
            AttackOutcome::Hit(report) => {
                report.emit(Some(intent.source), &mut damage_events, &mut died_events, &mut health_events);
            }
            AttackOutcome::Miss => {
                logger::log(&format!("attack from {:?} missed", intent.source));
            }
        }
    }
}

//! Damage / death / respawn
//!
//! - `Strike::land` — damage, затем knockback
//! - `HitReport::emit` — единая точка генерации DamageDealt/HealthChanged/ActorDied
//! - `handle_deaths` — death policy: Respawn (reset на spawn point) или Terminate (despawn)

use bevy::prelude::*;

use crate::combat::HealthChanged;
use crate::components::{
    ActorRole, DamageResult, DeathPolicy, Health, MoveIntent, PhysicsBody, SpawnPoint,
};
use crate::logger;
use crate::physics::{GroundedTracker, Knockback};

/// Событие: урон нанесен
///
/// Генерируется после применения damage к Health.
/// Используется для flash feedback, UI, звуков.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageDealt {
    /// None — урон от окружения (hazard)
    pub attacker: Option<Entity>,
    pub target: Entity,
    pub amount: f32,
    pub remaining: f32,
    pub killed: bool,
}

/// Причина смерти
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum DeathCause {
    Damage,
    /// Упал ниже fall threshold
    Fell,
}

/// Событие: актор умер (health → 0)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ActorDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
    pub role: ActorRole,
    pub cause: DeathCause,
}

/// Событие: актор вернулся на spawn point
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ActorRespawned {
    pub entity: Entity,
    pub position: Vec3,
    pub deaths: u32,
}

/// Итог удара по конкретному актору
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitReport {
    pub target: Entity,
    pub role: ActorRole,
    /// None — урон был no-op (≤ 0)
    pub result: Option<DamageResult>,
    pub current: f32,
    pub max: f32,
}

impl HitReport {
    /// Разослать события удара
    pub fn emit(
        &self,
        attacker: Option<Entity>,
        damage_events: &mut EventWriter<DamageDealt>,
        died_events: &mut EventWriter<ActorDied>,
        health_events: &mut EventWriter<HealthChanged>,
    ) {
        let Some(result) = self.result else {
            return;
        };

        damage_events.write(DamageDealt {
            attacker,
            target: self.target,
            amount: result.applied,
            remaining: self.current,
            killed: result.killed,
        });

        health_events.write(HealthChanged {
            entity: self.target,
            current: self.current,
            max: self.max,
        });

        if result.killed {
            died_events.write(ActorDied {
                entity: self.target,
                killer: attacker,
                role: self.role,
                cause: DeathCause::Damage,
            });

            logger::log_info(&format!("💀 {:?} {:?} killed by {:?}", self.role, self.target, attacker));
        }
    }
}

/// Удар: damage + knockback от точки источника
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strike {
    pub source_position: Vec3,
    pub damage: f32,
    pub knockback_force: f32,
}

impl Strike {
    /// Применить к живому актору: сначала damage, затем impulse
    ///
    /// Мёртвый (ждущий respawn) актор удары игнорирует → None.
    pub fn land(
        &self,
        target: Entity,
        role: ActorRole,
        target_position: Vec3,
        health: &mut Health,
        knockback: &mut Knockback,
    ) -> Option<HitReport> {
        if !health.is_alive() {
            return None;
        }

        let result = health.apply_damage(self.damage);
        knockback.apply_impulse(target_position, self.source_position, self.knockback_force);

        Some(HitReport {
            target,
            role,
            result,
            current: health.current,
            max: health.max,
        })
    }
}

/// Reset актора в spawn state (без изменения deaths-логики Health)
pub fn respawn_actor(
    spawn: Vec3,
    transform: &mut Transform,
    body: &mut PhysicsBody,
    knockback: &mut Knockback,
    grounded: &mut GroundedTracker,
) {
    transform.translation = spawn;
    body.reset();
    knockback.reset();
    grounded.reset();
}

/// Система: death policy
///
/// Respawn: позиция ← spawn, health ← max, velocity/knockback ← 0, deaths += 1.
/// Terminate: despawn (последующие события по entity — no-op).
pub fn handle_deaths(
    mut commands: Commands,
    mut died_events: EventReader<ActorDied>,
    mut actors: Query<(
        &DeathPolicy,
        Option<&SpawnPoint>,
        &mut Transform,
        &mut Health,
        &mut PhysicsBody,
        &mut Knockback,
        &mut GroundedTracker,
        &mut MoveIntent,
    )>,
    mut respawned_events: EventWriter<ActorRespawned>,
    mut health_events: EventWriter<HealthChanged>,
) {
    for event in died_events.read() {
        // Уже удалён (Terminate) — no-op
        let Ok((policy, spawn, mut transform, mut health, mut body, mut knockback, mut grounded, mut intent)) =
            actors.get_mut(event.entity)
        else {
            continue;
        };

        // Повторное событие по уже восстановленному актору
        if health.is_alive() {
            continue;
        }

        match policy {
            DeathPolicy::Respawn => {
                let spawn = match spawn {
                    Some(spawn) => spawn.position(),
                    None => {
                        logger::log_warning(&format!(
                            "{:?} без SpawnPoint: respawn на месте смерти",
                            event.entity
                        ));
                        transform.translation
                    }
                };

                respawn_actor(spawn, &mut transform, &mut body, &mut knockback, &mut grounded);
                intent.clear();
                health.restore();

                respawned_events.write(ActorRespawned {
                    entity: event.entity,
                    position: spawn,
                    deaths: health.deaths,
                });
                health_events.write(HealthChanged {
                    entity: event.entity,
                    current: health.current,
                    max: health.max,
                });

                logger::log_info(&format!(
                    "🔄 {:?} {:?} respawned at {:?} (deaths: {})",
                    event.role, event.entity, spawn, health.deaths
                ));
            }
            DeathPolicy::Terminate => {
                if let Ok(mut entity_commands) = commands.get_entity(event.entity) {
                    entity_commands.despawn();
                    logger::log_info(&format!("⚰️ {:?} {:?} terminated", event.role, event.entity));
                }
            }
        }
    }
}

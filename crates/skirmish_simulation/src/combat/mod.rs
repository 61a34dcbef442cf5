//! Combat system module
//!
//! ECS ответственность:
//! - Combat rules: hitscan подтверждение, damage, knockback
//! - Death policy: respawn / terminate
//! - Events: AttackIntent, DamageDealt, ActorDied, ActorRespawned
//! - Feedback сигналы для host'а: FlashStarted/FlashEnded, HealthChanged
//!
//! Raycast — внешний PhysicsQuery, рендер/UI — подписчики событий.

use bevy::prelude::*;

pub mod damage;
pub mod feedback;
pub mod hazard;
pub mod resolver;


// Re-export основных типов
pub use damage::{
    handle_deaths, respawn_actor, ActorDied, ActorRespawned, DamageDealt, DeathCause, HitReport, Strike,
};
pub use feedback::{FlashEnded, FlashStarted, Flash, HealthChanged, FLASH_DURATION};
pub use hazard::ContactHazard;
pub use resolver::{attack_mask, confirm_hit, resolve_attack, AttackIntent, AttackOutcome};

use crate::SimulationSet;

/// Combat Plugin
///
/// Регистрирует combat события и системы в Update (frame step).
///
/// Порядок выполнения:
/// 1. hazard_contact — контактный урон
/// 2. resolve_attacks — все AttackIntent за frame (после всех решений)
/// 3. handle_deaths — respawn / terminate
/// 4. tick_flash → start_flash_on_damage — feedback таймеры
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<AttackIntent>()
            .add_event::<DamageDealt>()
            .add_event::<ActorDied>()
            .add_event::<ActorRespawned>()
            .add_event::<HealthChanged>()
            .add_event::<FlashStarted>()
            .add_event::<FlashEnded>();

        app.add_systems(
            Update,
            (hazard::hazard_contact, resolver::resolve_attacks)
                .chain()
                .in_set(SimulationSet::Resolve),
        )
        .add_systems(Update, damage::handle_deaths.in_set(SimulationSet::Lifecycle))
        .add_systems(
            Update,
            (feedback::tick_flash, feedback::start_flash_on_damage)
                .chain()
                .in_set(SimulationSet::Feedback),
        );
    }
}

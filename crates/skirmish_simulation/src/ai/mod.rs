//! AI decision-making module
//!
//! Мозг врага: периодическое решение (wander vs. pursue), optional LOS gate,
//! jump-over-obstacle heuristic, атаки по таймеру.
//! Решения — чистые функции (`brain`), системы только читают/пишут компоненты.

use bevy::prelude::*;

pub mod brain;
pub mod systems;


// Re-export основных типов
pub use brain::DecisionBranch;
pub use systems::{ai_attacks, ai_decisions, ai_facing, ai_line_of_sight, line_of_sight_clear, validate_brains};

use crate::combat::AttackIntent;
use crate::SimulationSet;

/// AI Plugin
///
/// Регистрирует AI системы в Update (frame step). Порядок выполнения:
/// 1. validate_brains → ai_line_of_sight (Sense)
/// 2. ai_decisions → ai_attacks → ai_facing (Decide)
///
/// Все random броски — через DeterministicRng, порядок фиксирован `.chain()`.
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AttackIntent>()
            .add_systems(
                Update,
                (systems::validate_brains, systems::ai_line_of_sight)
                    .chain()
                    .in_set(SimulationSet::Sense),
            )
            .add_systems(
                Update,
                (systems::ai_decisions, systems::ai_attacks, systems::ai_facing)
                    .chain() // Последовательное выполнение для детерминизма
                    .in_set(SimulationSet::Decide),
            );
    }
}

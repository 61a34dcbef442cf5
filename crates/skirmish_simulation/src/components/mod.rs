//! ECS Components для акторов арены
//!
//! Организация по доменам:
//! - actor: роль, здоровье, death policy, spawn point (ActorCore bundle)
//! - movement: тело, locomotion, integration mode, форма коллайдера
//! - combat: параметры атаки и cooldown
//! - ai: мозг врага, AI конфиг, LOS gate
//! - player: маркер игрока, input sample, камера

pub mod actor;
pub mod ai;
pub mod combat;
pub mod movement;
pub mod player;

// Re-exports для удобного импорта
pub use actor::*;
pub use ai::*;
pub use combat::*;
pub use movement::*;
pub use player::*;

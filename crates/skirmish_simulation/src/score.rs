//! Scoreboard: pull-based счёт смертей для ScoreDisplay
//!
//! Считается по ActorDied событиям, поэтому учитывает и Terminate врагов,
//! которых уже нет в мире.

use bevy::prelude::*;

use crate::combat::ActorDied;
use crate::components::ActorRole;

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scoreboard {
    pub player_deaths: u32,
    pub enemy_deaths: u32,
}

impl Scoreboard {
    pub fn record(&mut self, role: ActorRole) {
        match role {
            ActorRole::Player => self.player_deaths += 1,
            ActorRole::Enemy => self.enemy_deaths += 1,
        }
    }

    /// Очки игрока — сколько раз умирали враги, очки бота — смерти игрока
    pub fn render(&self, prefix: &str) -> String {
        format!("{}Player: {} Bot: {}", prefix, self.enemy_deaths, self.player_deaths)
    }
}

/// Система: обновление счёта
pub fn update_scoreboard(mut died_events: EventReader<ActorDied>, mut scoreboard: ResMut<Scoreboard>) {
    for event in died_events.read() {
        scoreboard.record(event.role);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_format() {
        let mut scoreboard = Scoreboard::default();
        assert_eq!(scoreboard.render("Score\n"), "Score\nPlayer: 0 Bot: 0");

        scoreboard.record(ActorRole::Enemy);
        scoreboard.record(ActorRole::Enemy);
        scoreboard.record(ActorRole::Player);
        assert_eq!(scoreboard.render(""), "Player: 2 Bot: 1");
    }
}

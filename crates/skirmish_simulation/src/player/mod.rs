//! Player control module
//!
//! Player-controlled актор получает команды из PlayerInput (host пишет
//! input sample каждый frame), AI системы его не трогают.

use bevy::prelude::*;

pub mod controller;

pub use controller::{apply_look, camera_relative_move, player_control, PITCH_LIMIT};

use crate::combat::AttackIntent;
use crate::SimulationSet;

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AttackIntent>()
            .add_systems(Update, controller::player_control.in_set(SimulationSet::Input));
    }
}

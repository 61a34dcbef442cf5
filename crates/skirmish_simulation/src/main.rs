//! Headless симуляция арены
//!
//! Игрок со скриптовым input против двух врагов (обычный + LOS/no-respawn),
//! кактус рядом со спавном. Конфиг: `SKIRMISH_CONFIG=path.json`.

use bevy::prelude::*;
use std::process::ExitCode;

use skirmish_simulation::logger::{self, LogLevel};
use skirmish_simulation::tuning::EnemyTuning;
use skirmish_simulation::*;

const TICKS: u32 = 1000;

/// Скриптовый input: бег по кругу, атака раз в 20 кадров, прыжок раз в 90
fn scripted_input(mut frame: Local<u32>, mut query: Query<&mut PlayerInput, With<Player>>) {
    *frame += 1;
    let t = *frame as f32 / 60.0;

    for mut input in query.iter_mut() {
        input.move_axes = Vec2::new(t.cos(), 1.0);
        input.look_delta = Vec2::new(0.5 * t.sin(), 0.0);
        input.attack = *frame % 20 == 0;
        input.jump = *frame % 90 == 0;
    }
}

fn build_arena() -> ArenaPhysics {
    ArenaPhysics::flat_ground(30.0)
        // Стена между игроком и вторым врагом
        .with_box(StaticBox::wall(Vec3::new(-8.0, 0.0, 4.0), Vec3::new(-7.0, 3.0, 12.0)))
        // Платформа
        .with_box(StaticBox::ground(Vec3::new(6.0, 0.0, -6.0), Vec3::new(10.0, 1.2, -2.0)))
}

fn main() -> ExitCode {
    let config = match SimulationConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            logger::log_error(&format!("❌ Config error: {}", error));
            return ExitCode::FAILURE;
        }
    };

    if let Some(level) = std::env::var("SKIRMISH_LOG").ok().as_deref().and_then(LogLevel::parse) {
        logger::set_log_level(level);
    }

    println!("Starting skirmish headless simulation (seed: {})", config.seed);

    let mut app = create_headless_app(config.seed);
    app.add_plugins(SimulationPlugin::with_config(config))
        .insert_resource(PhysicsWorld::new(build_arena()))
        .add_systems(Update, scripted_input.before(SimulationSet::Input));

    let player_spawn = Vec3::new(0.0, 1.0, 0.0);
    let player = {
        let mut commands = app.world_mut().commands();
        spawn_player(&mut commands, player_spawn, &config.player)
    };

    {
        let mut commands = app.world_mut().commands();
        spawn_enemy(
            &mut commands,
            EnemySpawn {
                position: Vec3::new(8.0, 1.0, 6.0),
                target: player,
                target_position: player_spawn,
                now: 0.0,
            },
            &config.enemy,
        );

        let sniper = EnemyTuning {
            line_of_sight: true,
            death_policy: DeathPolicy::Terminate,
            ..config.enemy
        };
        spawn_enemy(
            &mut commands,
            EnemySpawn {
                position: Vec3::new(-12.0, 1.0, 8.0),
                target: player,
                target_position: player_spawn,
                now: 0.0,
            },
            &sniper,
        );

        spawn_hazard(&mut commands, Vec3::new(2.0, 1.0, 2.0), player, &config.hazard);
    }
    app.world_mut().flush();

    for tick in 0..TICKS {
        app.update();

        if tick % 100 == 0 {
            let world = app.world();
            let scoreboard = world.resource::<Scoreboard>();
            let entity_count = world.entities().len();
            let player_health = world.get::<Health>(player).map_or(0.0, Health::fraction);
            println!(
                "Tick {}: {} entities | player HP {:.0}% | {}",
                tick,
                entity_count,
                player_health * 100.0,
                scoreboard.render("")
            );
        }
    }

    let scoreboard = app.world().resource::<Scoreboard>();
    println!("Simulation complete! {}", scoreboard.render("Final score: "));
    ExitCode::SUCCESS
}

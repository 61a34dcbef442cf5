//! Skirmish Simulation Core
//!
//! ECS-симуляция на Bevy 0.16: игрок и враги на общей модели
//! движения/боя внутри physics-stepped мира.
//!
//! Разделение ответственности:
//! - ECS = game state, AI, combat rules, интеграция движения
//! - Host = physics backend (PhysicsQuery), рендер, UI, устройства ввода
//!
//! Два clock'а:
//! - FixedUpdate (60Hz) — physics step: ground, locomotion, gravity, knockback
//! - Update — frame step: input, AI, атаки, смерти, feedback

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod logger;
pub mod physics;
pub mod player;
pub mod score;
pub mod spawn;
pub mod tuning;

// Re-export базовых компонентов для удобства
pub use ai::{AIPlugin, DecisionBranch};
pub use combat::{
    ActorDied, ActorRespawned, AttackIntent, AttackOutcome, CombatPlugin, ContactHazard, DamageDealt, DeathCause,
    Flash, FlashEnded, FlashStarted, HealthChanged, FLASH_DURATION,
};
pub use components::*;
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use physics::{
    ActorCollider, ArenaPhysics, GroundedTracker, HitTag, Knockback, PhysicsQuery, PhysicsSettings,
    PhysicsStepPlugin, PhysicsWorld, RayHit, StaticBox,
};
pub use player::PlayerPlugin;
pub use score::Scoreboard;
pub use spawn::{spawn_enemy, spawn_hazard, spawn_player, EnemySpawn};
pub use tuning::{ConfigError, SimulationConfig};

/// Фазы frame step (Update), выполняются строго по порядку
///
/// Все решения видят позиции последнего physics step; атаки буферизуются
/// событиями и разрешаются после всех решений.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Коллайдеры акторов → physics backend
    Sync,
    /// Валидация мозгов, LOS
    Sense,
    /// Player input
    Input,
    /// AI решения и атаки
    Decide,
    /// Hazards + разрешение AttackIntent
    Resolve,
    /// Death policy
    Lifecycle,
    /// Flash таймеры, scoreboard
    Feedback,
}

/// Главный plugin симуляции (объединяет все подсистемы)
#[derive(Default)]
pub struct SimulationPlugin {
    pub config: SimulationConfig,
}

impl SimulationPlugin {
    pub fn with_config(config: SimulationConfig) -> Self {
        Self { config }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = self.config;

        app.insert_resource(config)
            .insert_resource(PhysicsSettings {
                gravity: Vec3::Y * config.gravity,
            })
            // Fixed timestep для physics step
            .insert_resource(Time::<Fixed>::from_hz(config.fixed_hz))
            .init_resource::<Scoreboard>();

        // Seed из create_headless_app / host'а не перетираем
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(config.seed));
        }

        app.configure_sets(
            Update,
            (
                SimulationSet::Sync,
                SimulationSet::Sense,
                SimulationSet::Input,
                SimulationSet::Decide,
                SimulationSet::Resolve,
                SimulationSet::Lifecycle,
                SimulationSet::Feedback,
            )
                .chain(),
        )
        .add_systems(Update, sync_actor_colliders.in_set(SimulationSet::Sync))
        .add_systems(Update, score::update_scoreboard.in_set(SimulationSet::Feedback))
        // Подсистемы
        .add_plugins((PhysicsStepPlugin, CombatPlugin, AIPlugin, PlayerPlugin));
    }
}

/// Система: синхронизация коллайдеров акторов в physics backend
///
/// Raycast'ы frame step видят акторов в позициях последнего physics step.
pub fn sync_actor_colliders(
    physics: Option<ResMut<PhysicsWorld>>,
    actors: Query<(Entity, &Actor, &Transform, &ActorShape), Without<Disabled>>,
) {
    let Some(mut physics) = physics else {
        return;
    };

    let colliders: Vec<ActorCollider> = actors
        .iter()
        .map(|(entity, actor, transform, shape)| ActorCollider {
            entity,
            center: transform.translation,
            shape: *shape,
            layer: actor.role.layer(),
            tag: actor.role.hit_tag(),
        })
        .collect();

    physics.sync_actors(&colliders);
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время ручное: каждый `app.update()` = ровно один physics step (1/60 s).
/// Первый update — нулевой delta (physics step ещё не идёт).
pub fn create_headless_app(seed: u64) -> App {
    let step = Duration::from_secs_f64(1.0 / 60.0);

    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_duration(step)) // 60Hz FixedUpdate
        .insert_resource(TimeUpdateStrategy::ManualDuration(step));

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    // Собираем все компоненты в детерминированный формат
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}

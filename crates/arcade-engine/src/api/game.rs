use crate::api::types::{EntityId, SoundEvent, GameEvent};
use crate::components::body::Body;
use crate::components::tilemap::TileCollision;
use crate::core::physics::{self, PhysicsSettings, StepOutcome};
use crate::input::queue::InputQueue;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// World width in tile units.
    pub world_width: f32,
    /// World height in tile units.
    pub world_height: f32,
    /// Gravity applied per tick, in tiles/tick². Y is up, so falling is negative.
    pub gravity: f32,
    /// Per-axis velocity cap applied by the physics step (default: 1.0).
    pub object_max_speed: f32,
    /// Maximum number of sound events per frame (default: 32).
    pub max_sounds: usize,
    /// Maximum number of game events per frame (default: 32).
    pub max_events: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            world_width: 16.0,
            world_height: 14.0,
            gravity: -0.0375,
            object_max_speed: 1.0,
            max_sounds: 32,
            max_events: 32,
        }
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state, load the tile grid, spawn entities.
    fn init(&mut self, ctx: &mut EngineContext);

    /// The game loop tick. Runs once per fixed step.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);
}

/// Mutable access to engine state, passed to Game::init and Game::update.
pub struct EngineContext {
    /// Static tile collision grid for the current level.
    pub tiles: TileCollision,
    pub physics: PhysicsSettings,
    pub sounds: Vec<SoundEvent>,
    pub events: Vec<GameEvent>,
    /// Fixed delta time of one update.
    pub dt: f32,
    next_id: u32,
    max_sounds: usize,
    max_events: usize,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::from_config(&GameConfig::default())
    }

    /// Create a context sized and tuned from a game's config.
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            tiles: TileCollision::new(
                config.world_width.max(0.0) as u32,
                config.world_height.max(0.0) as u32,
            ),
            physics: PhysicsSettings {
                gravity: config.gravity,
                object_max_speed: config.object_max_speed,
            },
            sounds: Vec::with_capacity(config.max_sounds),
            events: Vec::with_capacity(config.max_events),
            dt: config.fixed_dt,
            next_id: 1,
            max_sounds: config.max_sounds,
            max_events: config.max_events,
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Emit a sound event for the host. Events beyond the per-frame cap are dropped.
    pub fn emit_sound(&mut self, event: SoundEvent) {
        if self.sounds.len() >= self.max_sounds {
            log::warn!("sound buffer full, dropping {:?}", event);
            return;
        }
        self.sounds.push(event);
    }

    /// Emit a game event for the host. Events beyond the per-frame cap are dropped.
    pub fn emit_event(&mut self, event: GameEvent) {
        if self.events.len() >= self.max_events {
            log::warn!("event buffer full, dropping {:?}", event);
            return;
        }
        self.events.push(event);
    }

    /// Clear per-frame transient data (sounds, events).
    pub fn clear_frame_data(&mut self) {
        self.sounds.clear();
        self.events.clear();
    }

    /// Integrate one body against the current tile grid.
    pub fn step_body(&self, body: &mut Body) -> StepOutcome {
        physics::step_body(body, &self.tiles, &self.physics)
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

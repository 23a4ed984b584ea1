use crate::api::game::{EngineContext, Game, GameConfig};
use crate::api::types::{GameEvent, SoundEvent};
use crate::core::time::FixedTimestep;
use crate::input::queue::{InputEvent, InputQueue};

/// Generic headless runner that wires up the engine loop.
///
/// The host owns one runner per game, pushes input between frames and calls
/// `tick` with the wall-clock delta. Sounds and events produced during the
/// frame stay readable until the next `tick`.
///
/// A frame's input reaches only the first fixed update of that frame. Later
/// updates in the same frame see an empty queue, so a tap is never counted
/// twice; held state lives in the game's own trackers.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    no_input: InputQueue,
    timestep: FixedTimestep,
    config: GameConfig,
    initialized: bool,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let timestep = FixedTimestep::new(config.fixed_dt);
        Self {
            game,
            ctx: EngineContext::from_config(&config),
            input: InputQueue::new(),
            no_input: InputQueue::new(),
            timestep,
            config,
            initialized: false,
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        self.game.init(&mut self.ctx);
        self.initialized = true;
        log::info!(
            "runner initialized ({}x{} world, dt={})",
            self.config.world_width,
            self.config.world_height,
            self.config.fixed_dt
        );
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one frame: as many fixed updates as `dt` covers, then drain input.
    /// Returns the number of fixed updates that ran. If `dt` covers no update
    /// the input stays queued for the next frame.
    pub fn tick(&mut self, dt: f32) -> u32 {
        if !self.initialized {
            return 0;
        }

        self.ctx.clear_frame_data();

        let steps = self.timestep.accumulate(dt);
        if steps == 0 {
            return 0;
        }
        self.game.update(&mut self.ctx, &self.input);
        for _ in 1..steps {
            self.game.update(&mut self.ctx, &self.no_input);
        }

        self.input.drain();
        steps
    }

    /// Run exactly one fixed update, bypassing the accumulator.
    pub fn step(&mut self) {
        if !self.initialized {
            return;
        }
        self.ctx.clear_frame_data();
        self.game.update(&mut self.ctx, &self.input);
        self.input.drain();
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn sounds(&self) -> &[SoundEvent] {
        &self.ctx.sounds
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.ctx.events
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

//! The run: levels, score, lives, and the per-update frame order.
//!
//! Each update runs, in order: controls, player, enemies, gorillas, homes,
//! contacts, signal drain, deferred removals, then the level-clear check.

use arcade_engine::{EngineContext, Game, GameConfig, GameEvent, InputQueue, Rng, Scene, SoundEvent, Timer};
use glam::Vec2;

use crate::config::RescueConfig;
use crate::contact::{self, ContactPolicy};
use crate::controls::{ControlMapper, Controls};
use crate::enemy::ChaseEnemy;
use crate::events::{PopupStyle, RunEvent, ScorePopup, Signals, Sound};
use crate::frame::Frame;
use crate::gorilla::SmallGorilla;
use crate::home::Home;
use crate::level::{builtin_levels, LevelDef, LevelError};
use crate::player::Player;
use crate::room::Room;
use crate::spawn::{SpawnCoordinator, SpawnId};

/// `GameEvent::kind` values handed to the host.
pub mod event_kinds {
    /// a, b = text position, c = points.
    pub const SCORE_POPUP: f32 = 1.0;
    /// Same payload as `SCORE_POPUP`, drawn in the save color.
    pub const SAVE_POPUP: f32 = 2.0;
    /// a = score, b = high score.
    pub const SCORE: f32 = 3.0;
    /// a = lives left.
    pub const PLAYER_DIED: f32 = 4.0;
    /// a = index of the level just cleared.
    pub const LEVEL_COMPLETE: f32 = 5.0;
    /// a = final score.
    pub const GAME_OVER: f32 = 6.0;
    /// a = final score.
    pub const VICTORY: f32 = 7.0;
}

pub mod sounds {
    use arcade_engine::SoundEvent;

    pub const PICKUP: SoundEvent = SoundEvent(1);
    pub const COLLECTED: SoundEvent = SoundEvent(2);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Playing,
    /// Every gorilla is home; waiting before the next level.
    LevelComplete,
    GameOver,
    /// The last level is cleared.
    Victory,
}

pub struct RescueGame {
    config: RescueConfig,
    levels: Vec<LevelDef>,
    level_index: usize,
    room: Room,
    player: Option<Player>,
    enemies: Scene<ChaseEnemy>,
    gorillas: Scene<SmallGorilla>,
    homes: Vec<Home>,
    spawns: SpawnCoordinator,
    controls: ControlMapper,
    signals: Signals,
    rng: Rng,
    score: u32,
    high_score: u32,
    lives: u32,
    phase: RunPhase,
    phase_timer: Timer,
}

impl RescueGame {
    /// A run over the bundled levels.
    pub fn new(config: RescueConfig) -> Result<Self, LevelError> {
        Self::with_levels(config, builtin_levels()?)
    }

    pub fn with_levels(config: RescueConfig, levels: Vec<LevelDef>) -> Result<Self, LevelError> {
        let Some(first) = levels.first() else {
            return Err(LevelError::NoLevels);
        };
        let room = Room::new(first.width() as f32);
        Ok(Self {
            rng: Rng::new(config.seed),
            spawns: SpawnCoordinator::new(config.enemy_respawn_delay),
            high_score: config.starting_high_score,
            lives: config.starting_lives,
            config,
            levels,
            level_index: 0,
            room,
            player: None,
            enemies: Scene::new(),
            gorillas: Scene::new(),
            homes: Vec::new(),
            controls: ControlMapper::new(),
            signals: Signals::new(),
            score: 0,
            phase: RunPhase::Playing,
            phase_timer: Timer::new(),
        })
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn room(&self) -> Room {
        self.room
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn enemies(&self) -> &Scene<ChaseEnemy> {
        &self.enemies
    }

    pub fn gorillas(&self) -> &Scene<SmallGorilla> {
        &self.gorillas
    }

    pub fn homes(&self) -> &[Home] {
        &self.homes
    }

    pub fn using_gamepad(&self) -> bool {
        self.controls.using_gamepad()
    }

    pub fn is_level_complete(&self) -> bool {
        crate::gorilla::all_saved(&self.gorillas)
    }

    fn contact_policy(&self) -> ContactPolicy {
        ContactPolicy {
            enemy_defeat: self.config.enemy_defeat,
            held_gorilla_hit: self.config.held_gorilla_hit,
            attack_reach: self.config.player.attack_reach,
        }
    }

    fn start_run(&mut self, ctx: &mut EngineContext) {
        self.score = 0;
        self.lives = self.config.starting_lives;
        self.phase = RunPhase::Playing;
        self.phase_timer.unset();
        self.controls.reset();
        self.load_level(ctx, 0);
        log::info!("new run with {} lives", self.lives);
    }

    fn load_level(&mut self, ctx: &mut EngineContext, index: usize) {
        let Some(level) = self.levels.get(index) else {
            log::warn!("no level {}", index);
            return;
        };
        self.level_index = index;
        ctx.tiles = level.tiles.clone();
        self.room = Room::new(level.width() as f32);

        self.enemies.clear();
        self.gorillas.clear();
        self.signals.drain();

        let enemy_half = self.config.enemy.size[1] * 0.5;
        self.spawns = SpawnCoordinator::new(self.config.enemy_respawn_delay);
        for start in &level.enemies {
            self.spawns
                .register(start.foot + Vec2::new(0.0, enemy_half), start.delay);
        }
        self.spawns
            .spawn_all(ctx, &mut self.enemies, &self.config.enemy);

        let gorilla_half = self.config.gorilla.size[1] * 0.5;
        for &foot in &level.gorillas {
            self.gorillas.spawn(SmallGorilla::new(
                ctx.next_id(),
                foot + Vec2::new(0.0, gorilla_half),
                &self.config.gorilla,
                &mut self.rng,
            ));
        }
        self.homes = level
            .homes
            .iter()
            .map(|&foot| Home::new(foot + Vec2::new(0.0, 0.5)))
            .collect();

        self.player = Some(Self::new_player(ctx, level, &self.config));
        log::info!("level {} '{}' started", index, level.name);
    }

    fn new_player(ctx: &mut EngineContext, level: &LevelDef, config: &RescueConfig) -> Player {
        let half = config.player.size[1] * 0.5;
        Player::new(
            ctx.next_id(),
            level.player_start + Vec2::new(0.0, half),
            &config.player,
        )
    }

    fn play(&mut self, ctx: &mut EngineContext, controls: &Controls) {
        let policy = self.contact_policy();
        {
            let mut frame = Frame {
                dt: ctx.dt,
                room: self.room,
                tiles: &ctx.tiles,
                physics: &ctx.physics,
                lower_bound_y: self.config.lower_bound_y,
                signals: &mut self.signals,
                rng: &mut self.rng,
            };
            if let Some(player) = self.player.as_mut() {
                player.update(controls, &mut frame, &mut self.gorillas);
            }
            for enemy in self.enemies.iter_mut() {
                enemy.update(&mut frame, self.player.as_ref());
            }
            for gorilla in self.gorillas.iter_mut() {
                gorilla.update(&mut frame, self.player.as_ref());
            }
            for home in &mut self.homes {
                home.update(frame.dt);
            }
            contact::resolve(
                self.player.as_mut(),
                &mut self.enemies,
                &mut self.gorillas,
                &self.homes,
                &policy,
                &mut frame,
            );
        }

        self.drain_signals(ctx);
        self.enemies.despawn_destroyed();
        self.enemies.apply_pending();
        self.gorillas.apply_pending();

        if self.phase == RunPhase::Playing && self.player.as_ref().is_some_and(Player::finished_level) {
            self.phase = RunPhase::LevelComplete;
            self.phase_timer.set(self.config.level_clear_delay);
            ctx.emit_event(GameEvent::new(
                event_kinds::LEVEL_COMPLETE,
                self.level_index as f32,
                0.0,
                0.0,
            ));
            log::info!("level {} complete, score {}", self.level_index, self.score);
        }
    }

    fn drain_signals(&mut self, ctx: &mut EngineContext) {
        for event in self.signals.drain() {
            match event {
                RunEvent::Score(amount) => self.add_score(ctx, amount),
                RunEvent::Popup(popup) => ctx.emit_event(popup_event(&popup)),
                RunEvent::Sound(sound) => ctx.emit_sound(sound_event(sound)),
                RunEvent::EnemyDied { spawn_id } => self.respawn_enemy(ctx, spawn_id),
                RunEvent::PlayerDied => {
                    self.lives = self.lives.saturating_sub(1);
                    log::info!("player died, {} lives left", self.lives);
                    ctx.emit_event(GameEvent::new(
                        event_kinds::PLAYER_DIED,
                        self.lives as f32,
                        0.0,
                        0.0,
                    ));
                }
                RunEvent::RespawnPlayer => self.respawn_player(ctx),
            }
        }
    }

    fn add_score(&mut self, ctx: &mut EngineContext, amount: u32) {
        self.score = self.score.saturating_add(amount);
        self.high_score = self.high_score.max(self.score);
        ctx.emit_event(GameEvent::new(
            event_kinds::SCORE,
            self.score as f32,
            self.high_score as f32,
            0.0,
        ));
    }

    fn respawn_enemy(&mut self, ctx: &mut EngineContext, spawn_id: SpawnId) {
        let id = ctx.next_id();
        if let Some(enemy) = self.spawns.respawn(spawn_id, id, &self.config.enemy) {
            log::debug!("respawning enemy at {:?}", spawn_id);
            self.enemies.spawn(enemy);
        }
    }

    /// Clear the board and bring the player back, or end the run.
    fn respawn_player(&mut self, ctx: &mut EngineContext) {
        if self.lives == 0 {
            self.phase = RunPhase::GameOver;
            ctx.emit_event(GameEvent::new(event_kinds::GAME_OVER, self.score as f32, 0.0, 0.0));
            log::info!("game over, final score {}", self.score);
            return;
        }
        for enemy in self.enemies.iter_mut() {
            enemy.queue_remove();
        }
        self.spawns
            .spawn_all(ctx, &mut self.enemies, &self.config.enemy);
        let level = &self.levels[self.level_index];
        self.player = Some(Self::new_player(ctx, level, &self.config));
    }

    fn advance_level(&mut self, ctx: &mut EngineContext) {
        let next = self.level_index + 1;
        if next < self.levels.len() {
            self.load_level(ctx, next);
            self.phase = RunPhase::Playing;
        } else {
            self.phase = RunPhase::Victory;
            ctx.emit_event(GameEvent::new(event_kinds::VICTORY, self.score as f32, 0.0, 0.0));
            log::info!("all levels cleared, final score {}", self.score);
        }
    }
}

fn popup_event(popup: &ScorePopup) -> GameEvent {
    let kind = match popup.style {
        PopupStyle::Plain => event_kinds::SCORE_POPUP,
        PopupStyle::Saved => event_kinds::SAVE_POPUP,
    };
    let at = popup.pos + popup.offset;
    GameEvent::new(kind, at.x, at.y, popup.points as f32)
}

fn sound_event(sound: Sound) -> SoundEvent {
    match sound {
        Sound::Pickup => sounds::PICKUP,
        Sound::Collected => sounds::COLLECTED,
    }
}

impl Game for RescueGame {
    fn config(&self) -> GameConfig {
        let level = &self.levels[self.level_index];
        GameConfig {
            world_width: level.width() as f32,
            world_height: level.height() as f32,
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        self.start_run(ctx);
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        let controls = self.controls.read(input);
        match self.phase {
            RunPhase::Playing => self.play(ctx, &controls),
            RunPhase::LevelComplete => {
                self.phase_timer.tick(ctx.dt);
                if !self.phase_timer.active() {
                    self.advance_level(ctx);
                }
            }
            RunPhase::GameOver | RunPhase::Victory => {
                if controls.jump {
                    self.start_run(ctx);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnemyDefeat;
    use crate::controls::keys;
    use crate::enemy::EnemyState;
    use arcade_engine::{GameRunner, InputEvent, SceneEntity};

    fn runner(config: RescueConfig, rows: &[&str]) -> GameRunner<RescueGame> {
        let level = LevelDef::from_rows("test", rows).unwrap();
        let game = RescueGame::with_levels(config, vec![level]).unwrap();
        let mut runner = GameRunner::new(game);
        runner.init();
        runner
    }

    /// Step until `done` holds, up to `limit` updates. Returns the number of
    /// updates it took.
    fn step_until(
        runner: &mut GameRunner<RescueGame>,
        limit: usize,
        done: impl Fn(&RescueGame) -> bool,
    ) -> usize {
        for n in 1..=limit {
            runner.step();
            if done(runner.game()) {
                return n;
            }
        }
        panic!("condition not reached in {} updates", limit);
    }

    const ALONE: [&str; 4] = [
        "................",
        "................",
        "..P.GH..........",
        "################",
    ];

    const FACE_OFF: [&str; 3] = [
        "................",
        "..P.E...........",
        "################",
    ];

    #[test]
    fn no_levels_is_an_error() {
        assert!(matches!(
            RescueGame::with_levels(RescueConfig::default(), Vec::new()),
            Err(LevelError::NoLevels)
        ));
    }

    #[test]
    fn bundled_levels_start() {
        let mut runner = GameRunner::new(RescueGame::new(RescueConfig::default()).unwrap());
        runner.init();
        assert_eq!(runner.config().world_width, 16.0);
        assert_eq!(runner.config().world_height, 14.0);
        let game = runner.game();
        assert_eq!(game.enemies().len(), 2);
        assert_eq!(game.gorillas().len(), 4);
        assert_eq!(game.homes().len(), 1);
        assert_eq!(game.lives(), 3);
        assert_eq!(game.high_score(), 1_000_000);
        assert!(game.player().is_some());
        assert!(runner.context().tiles.wraps_x());
    }

    #[test]
    fn start_positions_rest_on_the_floor() {
        let runner = runner(RescueConfig::default(), &ALONE);
        let game = runner.game();
        assert_eq!(game.player().unwrap().pos(), Vec2::new(2.5, 1.375));
        let gorilla = game.gorillas().iter().next().unwrap();
        assert_eq!(gorilla.pos(), Vec2::new(4.5, 1.5));
        assert_eq!(game.homes()[0].pos(), Vec2::new(5.5, 1.5));
    }

    #[test]
    fn carrying_the_gorilla_home_clears_the_run() {
        let mut runner = runner(RescueConfig::default(), &ALONE);
        runner.push_input(InputEvent::KeyDown { key_code: keys::RIGHT });

        step_until(&mut runner, 120, |g| g.player().is_some_and(Player::is_saving));
        step_until(&mut runner, 120, |g| g.phase() == RunPhase::LevelComplete);
        let game = runner.game();
        assert!(game.is_level_complete());
        assert_eq!(game.score(), 10 + 100);
        assert_eq!(game.high_score(), 1_000_000);

        // Single level: the clear delay leads to victory.
        let waited = step_until(&mut runner, 400, |g| g.phase() == RunPhase::Victory);
        assert!(waited >= 179, "waited {}", waited);
        assert!(runner
            .events()
            .iter()
            .any(|e| e.kind == event_kinds::VICTORY && e.a == 110.0));
    }

    #[test]
    fn pickup_sound_reaches_the_host() {
        let mut runner = runner(RescueConfig::default(), &ALONE);
        runner.push_input(InputEvent::KeyDown { key_code: keys::RIGHT });
        step_until(&mut runner, 120, |g| {
            g.player().is_some_and(|p| p.held_gorillas() == 1)
        });
        assert!(runner.sounds().contains(&sounds::PICKUP));
        assert!(runner
            .events()
            .iter()
            .any(|e| e.kind == event_kinds::SCORE && e.a == 10.0));
    }

    #[test]
    fn death_costs_a_life_and_resets_enemies() {
        let mut runner = runner(RescueConfig::default(), &FACE_OFF);
        let first_player = runner.game().player().unwrap().id();

        step_until(&mut runner, 600, |g| g.player().is_some_and(Player::is_dead));
        assert_eq!(runner.game().lives(), 2);

        step_until(&mut runner, 600, |g| {
            g.player().is_some_and(|p| p.id() != first_player)
        });
        let game = runner.game();
        assert_eq!(game.lives(), 2);
        assert_eq!(game.phase(), RunPhase::Playing);
        let states: Vec<EnemyState> = game.enemies().iter().map(ChaseEnemy::state).collect();
        assert_eq!(states, vec![EnemyState::QueueRemove, EnemyState::Spawning]);

        // The old enemy goes quietly.
        step_until(&mut runner, 120, |g| g.enemies().len() == 1);
    }

    #[test]
    fn last_life_ends_the_run_and_jump_restarts_it() {
        let config = RescueConfig {
            starting_lives: 1,
            ..RescueConfig::default()
        };
        let mut runner = runner(config, &FACE_OFF);
        step_until(&mut runner, 1200, |g| g.phase() == RunPhase::GameOver);
        assert_eq!(runner.game().lives(), 0);

        runner.push_input(InputEvent::KeyDown { key_code: keys::SPACE });
        runner.step();
        let game = runner.game();
        assert_eq!(game.phase(), RunPhase::Playing);
        assert_eq!(game.lives(), 1);
        assert_eq!(game.score(), 0);
        assert!(game.player().is_some_and(|p| !p.is_dead()));
    }

    #[test]
    fn defeated_enemy_comes_back_at_its_spawn_point() {
        let config = RescueConfig {
            enemy_defeat: EnemyDefeat::OnContact,
            ..RescueConfig::default()
        };
        let mut runner = runner(config, &FACE_OFF);
        let first_enemy = runner.game().enemies().iter().next().unwrap().id();
        let spawn_id = runner.game().enemies().iter().next().unwrap().spawn_id();

        step_until(&mut runner, 600, |g| g.score() == 200);
        step_until(&mut runner, 600, |g| {
            g.enemies().iter().any(|e| e.id() != first_enemy)
        });
        let game = runner.game();
        assert!(game.player().is_some_and(|p| !p.is_dead()));
        assert_eq!(game.enemies().len(), 1);
        let replacement = game.enemies().iter().next().unwrap();
        assert_eq!(replacement.spawn_id(), spawn_id);
        assert_eq!(replacement.state(), EnemyState::Spawning);
    }
}

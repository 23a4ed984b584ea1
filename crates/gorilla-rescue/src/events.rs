//! Signals entities raise during their update.
//!
//! Entities never reach into the orchestrator. They push [`RunEvent`]s into
//! the [`Signals`] outbox handed to them through the frame, and the game
//! drains the outbox once all updates and contacts for the frame are done.

use glam::Vec2;

use crate::spawn::SpawnId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    Pickup,
    Collected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupStyle {
    /// White text, enemy points.
    Plain,
    /// Yellow text, gorilla save tiers.
    Saved,
}

/// Floating score text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScorePopup {
    pub pos: Vec2,
    pub offset: Vec2,
    pub points: u32,
    pub style: PopupStyle,
    /// Seconds on screen.
    pub duration: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    Score(u32),
    Popup(ScorePopup),
    Sound(Sound),
    /// A dead enemy finished its death animation and left the scene.
    EnemyDied { spawn_id: SpawnId },
    PlayerDied,
    /// The player's death sequence is over; the run should bring it back.
    RespawnPlayer,
}

#[derive(Debug, Default)]
pub struct Signals {
    events: Vec<RunEvent>,
}

impl Signals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_score(&mut self, amount: u32) {
        self.events.push(RunEvent::Score(amount));
    }

    pub fn popup(&mut self, popup: ScorePopup) {
        self.events.push(RunEvent::Popup(popup));
    }

    pub fn sound(&mut self, sound: Sound) {
        self.events.push(RunEvent::Sound(sound));
    }

    pub fn enemy_died(&mut self, spawn_id: SpawnId) {
        self.events.push(RunEvent::EnemyDied { spawn_id });
    }

    pub fn player_died(&mut self) {
        self.events.push(RunEvent::PlayerDied);
    }

    pub fn respawn_player(&mut self) {
        self.events.push(RunEvent::RespawnPlayer);
    }

    pub fn iter(&self) -> impl Iterator<Item = &RunEvent> {
        self.events.iter()
    }

    pub fn drain(&mut self) -> Vec<RunEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Score amounts in the order they were raised.
    pub fn scores(&self) -> Vec<u32> {
        self.events
            .iter()
            .filter_map(|e| match e {
                RunEvent::Score(n) => Some(*n),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&RunEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

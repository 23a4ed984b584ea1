use arcade_engine::{PhysicsSettings, Rng, StepOutcome, TileCollision};

use crate::events::Signals;
use crate::kinematics::Mobile;
use crate::room::Room;

/// Everything an entity may read or raise during one fixed update.
///
/// Built by the game each update from its own state and the engine
/// context. Entities get it by `&mut` and keep nothing from it.
pub struct Frame<'a> {
    pub dt: f32,
    pub room: Room,
    pub tiles: &'a TileCollision,
    pub physics: &'a PhysicsSettings,
    pub lower_bound_y: f32,
    pub signals: &'a mut Signals,
    pub rng: &'a mut Rng,
}

impl Frame<'_> {
    /// Run the engine physics step on a mobile body, then fold it back into
    /// the room.
    pub fn integrate(&self, mobile: &mut Mobile) -> StepOutcome {
        let outcome = arcade_engine::step_body(&mut mobile.body, self.tiles, self.physics);
        mobile.wrap(&self.room);
        outcome
    }
}

/// Owned backing store for a [`Frame`] in unit tests.
#[cfg(test)]
pub(crate) struct TestWorld {
    pub tiles: TileCollision,
    pub physics: PhysicsSettings,
    pub signals: Signals,
    pub rng: Rng,
    pub room: Room,
    pub dt: f32,
}

#[cfg(test)]
impl TestWorld {
    /// A 16x14 wrapping room with a solid floor along row 0.
    pub fn floor() -> Self {
        let mut tiles = TileCollision::new(16, 14).with_wrap_x(true);
        tiles.fill_rect(0, 0, 16, 1, true);
        Self::with_tiles(tiles)
    }

    pub fn with_tiles(tiles: TileCollision) -> Self {
        let room = Room::new(tiles.width() as f32);
        Self {
            tiles,
            physics: PhysicsSettings::default(),
            signals: Signals::new(),
            rng: Rng::new(0x9E37_79B9_7F4A_7C15),
            room,
            // Power of two so timer sums stay exact.
            dt: 1.0 / 64.0,
        }
    }

    pub fn frame(&mut self) -> Frame<'_> {
        Frame {
            dt: self.dt,
            room: self.room,
            tiles: &self.tiles,
            physics: &self.physics,
            lower_bound_y: -16.0,
            signals: &mut self.signals,
            rng: &mut self.rng,
        }
    }
}

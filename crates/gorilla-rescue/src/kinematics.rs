//! Shared motion model for everything that walks, jumps and falls.
//!
//! Each entity runs the same pipeline every update, in this order, before
//! handing its body to the engine physics step:
//!
//! 1. pick a gravity scale from the vertical velocity
//! 2. clamp vertical speed
//! 3. stop at the room's lower bound
//! 4. clear the jumping flag once no longer rising
//! 5. accelerate horizontally from move input
//! 6. apply drag
//! 7. probe for ground
//!
//! Entities interleave their own rules between the steps, so the pieces are
//! separate methods rather than one call.

use arcade_engine::{Body, TileCollision};
use glam::Vec2;

use crate::room::{side, Room};

/// Vertical speed bounding the floaty top of an arc.
pub const HOVER_BAND: f32 = 0.125;
pub const RISING_GRAVITY_SCALE: f32 = 0.9;
pub const FALLING_GRAVITY_SCALE: f32 = 0.75;
/// Terminal fall speed in tiles per tick.
pub const MAX_FALL_SPEED: f32 = 0.165;
/// Drag while input pushes along the current motion.
pub const CRUISE_DRAG: f32 = 0.8;
/// Drag while input opposes the current motion.
pub const BRAKE_DRAG: f32 = 0.5;
/// How far below the body the ground probes reach.
pub const GROUND_PROBE: f32 = 1.0;

/// How an entity takes part in overlap checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactMode {
    Off,
    /// Reports overlaps but only some pairs react.
    Sensor,
    Solid,
}

/// The gravity scale for a given vertical velocity.
pub fn gravity_scale_for(vy: f32, hover: f32) -> f32 {
    if vy > HOVER_BAND {
        RISING_GRAVITY_SCALE
    } else if vy.abs() <= HOVER_BAND {
        hover
    } else {
        FALLING_GRAVITY_SCALE
    }
}

/// Horizontal drag factor for the current input and velocity. Idle input
/// counts as rightward, so an idle body drifting right keeps cruise drag.
pub fn drag_for(input_x: f32, vx: f32) -> f32 {
    if side(input_x) == side(vx) {
        CRUISE_DRAG
    } else {
        BRAKE_DRAG
    }
}

/// A body plus the walking state layered on top of it.
#[derive(Debug, Clone, PartialEq)]
pub struct Mobile {
    pub body: Body,
    /// Desired direction, each axis in [-1, 1].
    pub move_input: Vec2,
    pub max_speed: f32,
    pub move_acceleration: f32,
    pub on_ground: bool,
    pub is_jumping: bool,
}

impl Mobile {
    pub fn new(body: Body, move_acceleration: f32, max_speed: f32) -> Self {
        Self {
            body,
            move_input: Vec2::ZERO,
            max_speed,
            move_acceleration,
            on_ground: false,
            is_jumping: false,
        }
    }

    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    pub fn velocity(&self) -> Vec2 {
        self.body.velocity
    }

    /// Direction the forward probes point: the input side, right when idle.
    pub fn heading(&self) -> f32 {
        side(self.move_input.x)
    }

    /// Face the way the input points. Idle input keeps the current facing.
    pub fn face_input(&mut self) {
        if self.move_input.x != 0.0 {
            self.body.mirror = self.move_input.x < 0.0;
        }
    }

    pub fn apply_gravity_profile(&mut self, hover: f32) {
        self.body.gravity_scale = gravity_scale_for(self.body.velocity.y, hover);
    }

    pub fn clamp_vertical(&mut self, max_rise: f32) {
        self.body.velocity.y = self.body.velocity.y.clamp(-MAX_FALL_SPEED, max_rise);
    }

    /// Stop at `bound_y` if the next move would carry the bottom edge past it.
    pub fn apply_lower_bound(&mut self, bound_y: f32, half_height: f32) {
        if self.body.pos.y - half_height + self.body.velocity.y <= bound_y {
            self.body.velocity.y = 0.0;
            self.body.pos.y = bound_y + half_height;
        }
    }

    pub fn clear_jump_if_falling(&mut self) {
        if self.body.velocity.y <= 0.0 {
            self.is_jumping = false;
        }
    }

    pub fn accelerate(&mut self) {
        let vx = self.body.velocity.x + self.move_input.x * self.move_acceleration;
        self.body.velocity.x = vx.clamp(-self.max_speed, self.max_speed);
    }

    pub fn apply_drag(&mut self) {
        self.body.velocity.x *= drag_for(self.move_input.x, self.body.velocity.x);
    }

    /// Probe straight down from the center and both bottom corners.
    pub fn detect_ground(&mut self, tiles: &TileCollision) -> bool {
        let pos = self.body.pos;
        let half_width = self.body.size.x * 0.5;
        let down = Vec2::new(0.0, -GROUND_PROBE);
        self.on_ground = [0.0, -half_width, half_width].iter().any(|&dx| {
            let start = pos + Vec2::new(dx, 0.0);
            tiles.cast(start, start + down)
        });
        self.on_ground
    }

    pub fn jump(&mut self, power: f32) {
        self.body.velocity.y = power;
        self.is_jumping = true;
    }

    /// Zero velocity and gravity so the physics step leaves the body put.
    pub fn freeze(&mut self) {
        self.body.velocity = Vec2::ZERO;
        self.body.gravity_scale = 0.0;
    }

    pub fn wrap(&mut self, room: &Room) {
        self.body.pos.x = room.wrap_x(self.body.pos.x);
    }
}

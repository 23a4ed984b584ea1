//! Keyboard and gamepad mapping.
//!
//! Keys arrive as DOM key codes. A gamepad is reported by the host through
//! custom input events: the left stick as one continuous axis pair, the two
//! face buttons as down/up transitions.

use arcade_engine::{InputEvent, InputQueue, KeyboardState};

pub mod keys {
    pub const SPACE: u32 = 32;
    pub const LEFT: u32 = 37;
    pub const UP: u32 = 38;
    pub const RIGHT: u32 = 39;
    pub const DOWN: u32 = 40;
    pub const C: u32 = 67;
    pub const M: u32 = 77;
    pub const N: u32 = 78;
    pub const V: u32 = 86;
    pub const X: u32 = 88;
    pub const Z: u32 = 90;

    pub const JUMP: [u32; 4] = [SPACE, Z, C, N];
    pub const ACTION: [u32; 3] = [X, V, M];
}

/// Custom input event kinds the host sends for a gamepad.
pub mod pad {
    /// `a` = stick x, `b` = stick y, each in [-1, 1].
    pub const STICK: u32 = 1;
    /// `a` nonzero while the jump button is down.
    pub const JUMP: u32 = 2;
    /// `a` nonzero while the action button is down.
    pub const ACTION: u32 = 3;
}

/// One update's worth of player intent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Controls {
    pub move_x: f32,
    pub move_y: f32,
    /// Pressed this update.
    pub jump: bool,
    /// Pressed this update.
    pub action: bool,
}

#[derive(Debug, Clone, Copy, Default)]
struct PadButton {
    down: bool,
    pressed: bool,
}

impl PadButton {
    fn set(&mut self, down: bool) {
        if down && !self.down {
            self.pressed = true;
        }
        self.down = down;
    }
}

#[derive(Debug, Default)]
pub struct ControlMapper {
    keyboard: KeyboardState,
    stick: (f32, f32),
    jump_button: PadButton,
    action_button: PadButton,
    using_gamepad: bool,
}

impl ControlMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn using_gamepad(&self) -> bool {
        self.using_gamepad
    }

    /// Fold this update's events in and read the player's intent.
    pub fn read(&mut self, input: &InputQueue) -> Controls {
        self.keyboard.begin_frame(input);
        self.jump_button.pressed = false;
        self.action_button.pressed = false;

        for event in input.iter() {
            match *event {
                InputEvent::KeyDown { .. } => self.using_gamepad = false,
                InputEvent::Custom { kind, a, b, .. } => match kind {
                    pad::STICK => {
                        self.stick = (a.clamp(-1.0, 1.0), b.clamp(-1.0, 1.0));
                        self.using_gamepad = true;
                    }
                    pad::JUMP => {
                        self.jump_button.set(a != 0.0);
                        self.using_gamepad = true;
                    }
                    pad::ACTION => {
                        self.action_button.set(a != 0.0);
                        self.using_gamepad = true;
                    }
                    _ => {}
                },
                InputEvent::KeyUp { .. } => {}
            }
        }

        let (move_x, move_y) = if self.using_gamepad {
            self.stick
        } else {
            (
                self.keyboard.axis(keys::LEFT, keys::RIGHT),
                self.keyboard.axis(keys::DOWN, keys::UP),
            )
        };
        Controls {
            move_x,
            move_y,
            jump: self.keyboard.any_pressed(&keys::JUMP) || self.jump_button.pressed,
            action: self.keyboard.any_pressed(&keys::ACTION) || self.action_button.pressed,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

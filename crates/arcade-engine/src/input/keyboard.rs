use std::collections::HashSet;
use crate::input::queue::{InputEvent, InputQueue};

/// Held-key tracker built from the raw event queue.
///
/// `begin_frame` folds the pending events in. A key counts as pressed only on
/// the update where it goes from up to down, so OS auto-repeat KeyDown events
/// do not retrigger.
#[derive(Debug, Default, Clone)]
pub struct KeyboardState {
    held: HashSet<u32>,
    pressed: HashSet<u32>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_frame(&mut self, input: &InputQueue) {
        self.pressed.clear();
        for event in input.iter() {
            match *event {
                InputEvent::KeyDown { key_code } => {
                    if self.held.insert(key_code) {
                        self.pressed.insert(key_code);
                    }
                }
                InputEvent::KeyUp { key_code } => {
                    self.held.remove(&key_code);
                }
                _ => {}
            }
        }
    }

    pub fn is_down(&self, key_code: u32) -> bool {
        self.held.contains(&key_code)
    }

    pub fn was_pressed(&self, key_code: u32) -> bool {
        self.pressed.contains(&key_code)
    }

    pub fn any_pressed(&self, key_codes: &[u32]) -> bool {
        key_codes.iter().any(|k| self.was_pressed(*k))
    }

    /// -1, 0 or 1 from a pair of keys.
    pub fn axis(&self, negative: u32, positive: u32) -> f32 {
        self.is_down(positive) as i32 as f32 - self.is_down(negative) as i32 as f32
    }

    /// Forget everything, e.g. when the window loses focus.
    pub fn reset(&mut self) {
        self.held.clear();
        self.pressed.clear();
    }
}

use arcade_engine::Timer;
use glam::Vec2;

/// Seconds between flash colors.
pub const FLASH_INTERVAL: f32 = 0.5;
pub const FLASH_COLORS: usize = 2;

/// Where gorillas are carried to. Static, flashes to draw the eye.
#[derive(Debug, Clone)]
pub struct Home {
    pos: Vec2,
    size: Vec2,
    flash_timer: Timer,
    flash_index: usize,
}

impl Home {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            size: Vec2::ONE,
            flash_timer: Timer::new(),
            flash_index: 0,
        }
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Which of the flash colors to draw.
    pub fn flash_index(&self) -> usize {
        self.flash_index
    }

    pub fn update(&mut self, dt: f32) {
        self.flash_timer.tick(dt);
        if !self.flash_timer.active() {
            if self.flash_timer.is_set() {
                self.flash_index = (self.flash_index + 1) % FLASH_COLORS;
            }
            self.flash_timer.set(FLASH_INTERVAL);
        }
    }
}

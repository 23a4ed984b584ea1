/// Fixed timestep accumulator.
/// Ensures game logic runs at a consistent rate regardless of frame time.
pub struct FixedTimestep {
    /// The fixed delta time per tick.
    dt: f32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt;
        // Cap to prevent spiral of death (max 10 steps per frame)
        self.accumulator = self.accumulator.min(self.dt * 10.0);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// The fixed delta time.
    pub fn dt(&self) -> f32 {
        self.dt
    }
}

/// Countdown timer, polled by its owner.
///
/// The owner calls `tick` once per active update; the timer never advances
/// on its own. "Active" means time remains. An unset timer is inactive.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Timer {
    remaining: Option<f32>,
}

impl Timer {
    pub fn new() -> Self {
        Self { remaining: None }
    }

    /// A timer already armed with `duration`.
    pub fn started(duration: f32) -> Self {
        Self {
            remaining: Some(duration),
        }
    }

    /// Arm the timer. Re-arming replaces any time left.
    pub fn set(&mut self, duration: f32) {
        self.remaining = Some(duration);
    }

    /// Disarm the timer.
    pub fn unset(&mut self) {
        self.remaining = None;
    }

    /// Advance by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining -= dt;
        }
    }

    pub fn active(&self) -> bool {
        matches!(self.remaining, Some(r) if r > 0.0)
    }

    /// Whether the timer was armed and not unset since (it may have expired).
    pub fn is_set(&self) -> bool {
        self.remaining.is_some()
    }

    /// Seconds left, zero when expired or unset.
    pub fn remaining(&self) -> f32 {
        self.remaining.map_or(0.0, |r| r.max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_step_exact() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        let steps = ts.accumulate(1.0 / 60.0);
        assert_eq!(steps, 1);
    }

    #[test]
    fn accumulates_partial() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        let steps = ts.accumulate(0.008); // half a frame
        assert_eq!(steps, 0);
        let steps = ts.accumulate(0.010); // over one frame total
        assert_eq!(steps, 1);
    }

    #[test]
    fn caps_at_ten_steps() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        let steps = ts.accumulate(1.0);
        assert_eq!(steps, 10);
    }

    #[test]
    fn timer_expires_after_duration() {
        let mut t = Timer::new();
        assert!(!t.active());
        t.set(0.5);
        assert!(t.active());
        t.tick(0.25);
        assert!(t.active());
        assert_eq!(t.remaining(), 0.25);
        t.tick(0.25);
        assert!(!t.active());
        assert!(t.is_set());
        assert_eq!(t.remaining(), 0.0);
    }

    #[test]
    fn unset_timer_is_inactive() {
        let mut t = Timer::started(2.0);
        t.unset();
        assert!(!t.active());
        assert!(!t.is_set());
        t.tick(1.0);
        assert!(!t.active());
    }

    #[test]
    fn rearming_replaces_remaining_time() {
        let mut t = Timer::started(1.0);
        t.tick(0.75);
        t.set(1.0);
        assert_eq!(t.remaining(), 1.0);
    }
}

//! Horizontal room topology.
//!
//! The playfield's left and right edges are the same line, so every
//! horizontal coordinate lives in `[0, width)` and the shortest path between
//! two points may run through the edge.

/// Three-valued sign: 0 stays 0.
pub fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Which side of zero `v` falls on. Zero counts as the positive side, so
/// idle input reads as rightward.
pub fn side(v: f32) -> f32 {
    if v < 0.0 {
        -1.0
    } else {
        1.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Room {
    width: f32,
}

impl Room {
    pub fn new(width: f32) -> Self {
        Self { width }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// Fold an x coordinate back into `[0, width)`.
    pub fn wrap_x(&self, x: f32) -> f32 {
        let w = self.width;
        let mut x = x;
        if x >= w {
            x -= w;
        }
        if x < 0.0 {
            x += w;
        }
        if x < 0.0 || x >= w {
            // Moved more than a full width in one step.
            x = x.rem_euclid(w);
            // rem_euclid rounds tiny negatives up to exactly w.
            if x >= w {
                x = 0.0;
            }
        }
        x
    }

    /// Signed horizontal offset from `from` to `to` along the shorter way
    /// around. Ties go to the direct path.
    pub fn delta(&self, from: f32, to: f32) -> f32 {
        let direct = to - from;
        let wrapped = if to < from {
            (to + self.width) - from
        } else {
            to - (from + self.width)
        };
        if direct.abs() <= wrapped.abs() {
            direct
        } else {
            wrapped
        }
    }

    /// Which way to walk from `from` to reach `to` soonest: -1, 0 or 1.
    pub fn direction_to(&self, from: f32, to: f32) -> f32 {
        sign(self.delta(from, to))
    }

    /// Shortest horizontal distance between two points.
    pub fn distance(&self, a: f32, b: f32) -> f32 {
        self.delta(a, b).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_keeps_positions_in_range() {
        let room = Room::new(16.0);
        let samples = [
            -100.0, -16.0, -15.99, -0.5, -1e-9, 0.0, 0.25, 8.0, 15.999, 16.0, 16.01, 31.5, 47.0, 400.2,
        ];
        for x in samples {
            let w = room.wrap_x(x);
            assert!((0.0..16.0).contains(&w), "{} wrapped to {}", x, w);
        }
        assert_eq!(room.wrap_x(16.5), 0.5);
        assert_eq!(room.wrap_x(-0.5), 15.5);
        assert_eq!(room.wrap_x(7.0), 7.0);
    }

    #[test]
    fn direction_prefers_the_wrap_when_shorter() {
        let room = Room::new(16.0);
        // Enemy at 14 chasing a player at 2: going right through the edge
        // covers 4 tiles, going left covers 12.
        assert_eq!(room.delta(14.0, 2.0), 4.0);
        assert_eq!(room.direction_to(14.0, 2.0), 1.0);
        // And from the other side.
        assert_eq!(room.delta(2.0, 14.0), -4.0);
        assert_eq!(room.direction_to(2.0, 14.0), -1.0);
    }

    #[test]
    fn direction_goes_direct_when_shorter() {
        let room = Room::new(16.0);
        assert_eq!(room.direction_to(5.0, 9.0), 1.0);
        assert_eq!(room.direction_to(9.0, 5.0), -1.0);
        assert_eq!(room.direction_to(6.0, 6.0), 0.0);
        assert_eq!(room.distance(1.0, 15.0), 2.0);
    }

    #[test]
    fn side_counts_zero_as_positive() {
        assert_eq!(side(0.0), 1.0);
        assert_eq!(side(2.5), 1.0);
        assert_eq!(side(-0.1), -1.0);
        assert_eq!(sign(0.0), 0.0);
    }

    #[test]
    fn tie_goes_direct() {
        let room = Room::new(16.0);
        assert_eq!(room.delta(0.0, 8.0), 8.0);
        assert_eq!(room.delta(8.0, 0.0), -8.0);
    }
}

//! Static tile collision grid.
//!
//! Tiles are unit squares in a y-up world: tile (x, y) covers
//! `[x, x+1) × [y, y+1)`. Lookups outside the grid are empty, except that a
//! grid built `with_wrap_x` folds x back into range so the left and right
//! edges meet.

use glam::{IVec2, Vec2};

#[derive(Debug, Clone, PartialEq)]
pub struct TileCollision {
    width: u32,
    height: u32,
    wrap_x: bool,
    /// Row-major: index = y * width + x
    solid: Vec<bool>,
}

impl TileCollision {
    /// Create an empty grid.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            wrap_x: false,
            solid: vec![false; (width * height) as usize],
        }
    }

    /// Make horizontal lookups wrap around the grid width.
    pub fn with_wrap_x(mut self, wrap_x: bool) -> Self {
        self.wrap_x = wrap_x;
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn wraps_x(&self) -> bool {
        self.wrap_x
    }

    /// Mark a tile solid or empty. Out-of-range coordinates are ignored.
    pub fn set_solid(&mut self, x: u32, y: u32, solid: bool) {
        if x < self.width && y < self.height {
            self.solid[(y * self.width + x) as usize] = solid;
        }
    }

    /// Fill a rectangular region.
    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, solid: bool) {
        for ty in y..(y + h).min(self.height) {
            for tx in x..(x + w).min(self.width) {
                self.set_solid(tx, ty, solid);
            }
        }
    }

    /// Clear all tiles.
    pub fn clear(&mut self) {
        self.solid.fill(false);
    }

    /// Whether the tile at signed grid coordinates is solid.
    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        if self.width == 0 || y < 0 || y >= self.height as i32 {
            return false;
        }
        let x = if self.wrap_x {
            x.rem_euclid(self.width as i32)
        } else if x < 0 || x >= self.width as i32 {
            return false;
        } else {
            x
        };
        self.solid[(y as u32 * self.width + x as u32) as usize]
    }

    /// Whether the tile containing a world point is solid.
    pub fn is_solid_at(&self, pos: Vec2) -> bool {
        let cell = pos.floor().as_ivec2();
        self.is_solid(cell.x, cell.y)
    }

    /// Whether an axis-aligned box centered at `center` touches any solid tile.
    /// Boxes that only share an edge with a tile do not overlap it.
    pub fn overlaps(&self, center: Vec2, size: Vec2) -> bool {
        let min = center - size * 0.5;
        let max = center + size * 0.5;
        let x0 = min.x.floor() as i32;
        let y0 = min.y.floor() as i32;
        let x1 = (max.x.ceil() as i32 - 1).max(x0);
        let y1 = (max.y.ceil() as i32 - 1).max(y0);
        (y0..=y1).any(|y| (x0..=x1).any(|x| self.is_solid(x, y)))
    }

    /// Walk the grid cells crossed by the segment `start → end`.
    /// Returns the center of the first solid tile hit, if any.
    pub fn raycast(&self, start: Vec2, end: Vec2) -> Option<Vec2> {
        let delta = end - start;
        let length = delta.length();
        let mut cell = start.floor().as_ivec2();
        let hit = |cell: IVec2| cell.as_vec2() + Vec2::splat(0.5);

        if length <= f32::EPSILON {
            return self.is_solid(cell.x, cell.y).then(|| hit(cell));
        }

        let dir = delta / length;
        let step = IVec2::new(sign_step(delta.x), sign_step(delta.y));
        let unit = Vec2::new(inverse_abs(dir.x), inverse_abs(dir.y));
        let origin = cell.as_vec2();
        // Distance along the ray to the first vertical / horizontal grid line.
        let mut next_x = match step.x {
            0 => f32::INFINITY,
            s if s < 0 => (start.x - origin.x) * unit.x,
            _ => (origin.x + 1.0 - start.x) * unit.x,
        };
        let mut next_y = match step.y {
            0 => f32::INFINITY,
            s if s < 0 => (start.y - origin.y) * unit.y,
            _ => (origin.y + 1.0 - start.y) * unit.y,
        };

        loop {
            if self.is_solid(cell.x, cell.y) {
                return Some(hit(cell));
            }
            if next_x > length && next_y > length {
                return None;
            }
            if next_x > next_y {
                cell.y += step.y;
                next_y += unit.y;
            } else {
                cell.x += step.x;
                next_x += unit.x;
            }
        }
    }

    /// Boolean form of [`raycast`](Self::raycast).
    pub fn cast(&self, start: Vec2, end: Vec2) -> bool {
        self.raycast(start, end).is_some()
    }
}

fn sign_step(v: f32) -> i32 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

fn inverse_abs(v: f32) -> f32 {
    if v == 0.0 {
        f32::INFINITY
    } else {
        (1.0 / v).abs()
    }
}

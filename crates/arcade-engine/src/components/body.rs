use glam::Vec2;

/// Kinematic body: the positional part every mobile entity owns.
/// Designed for simplicity; game entities compose one instead of inheriting.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Center position in tile units (y up).
    pub pos: Vec2,
    /// Velocity in tiles per tick.
    pub velocity: Vec2,
    /// Collision box size in tile units.
    pub size: Vec2,
    /// Multiplier on global gravity, rewritten by game logic every tick.
    pub gravity_scale: f32,
    /// Rotation in radians.
    pub angle: f32,
    /// Horizontal flip (facing left).
    pub mirror: bool,
    /// Whether the physics step pushes this body out of solid tiles.
    pub collide_tiles: bool,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            velocity: Vec2::ZERO,
            size,
            gravity_scale: 1.0,
            angle: 0.0,
            mirror: false,
            collide_tiles: true,
        }
    }

    // -- Builder pattern --

    pub fn with_mirror(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    /// Half extents of the collision box.
    pub fn half_size(&self) -> Vec2 {
        self.size * 0.5
    }

    /// Facing as a signed unit: -1 when mirrored, 1 otherwise.
    pub fn facing(&self) -> f32 {
        if self.mirror {
            -1.0
        } else {
            1.0
        }
    }
}

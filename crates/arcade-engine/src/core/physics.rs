//! Tile-grid integration for kinematic bodies.
//!
//! No general rigid-body solver: gravity, a velocity cap, and axis-separated
//! push-out against solid tiles. Game code shapes velocity first, then calls
//! [`step_body`] once per tick.

use glam::Vec2;
use crate::components::body::Body;
use crate::components::tilemap::TileCollision;

/// Global integration constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsSettings {
    /// Added to `velocity.y` every tick, scaled by the body's gravity scale.
    pub gravity: f32,
    /// Per-axis velocity cap.
    pub object_max_speed: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: -0.0375,
            object_max_speed: 1.0,
        }
    }
}

/// What happened to a body during one step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// Vertical motion was stopped while falling.
    pub landed: bool,
    /// Vertical motion was stopped while rising.
    pub bumped_head: bool,
    /// Horizontal motion was stopped by a wall.
    pub blocked_x: bool,
}

/// Apply gravity, move the body by its velocity, and resolve tile overlap.
pub fn step_body(body: &mut Body, tiles: &TileCollision, settings: &PhysicsSettings) -> StepOutcome {
    let mut outcome = StepOutcome::default();

    body.velocity.y += settings.gravity * body.gravity_scale;
    let cap = Vec2::splat(settings.object_max_speed);
    body.velocity = body.velocity.clamp(-cap, cap);

    let old = body.pos;
    let mut next = old + body.velocity;

    if body.collide_tiles && tiles.overlaps(next, body.size) {
        let blocked_y = tiles.overlaps(Vec2::new(old.x, next.y), body.size);
        let blocked_x = tiles.overlaps(Vec2::new(next.x, old.y), body.size);

        if blocked_y || !blocked_x {
            next.y = old.y;
            if body.velocity.y < 0.0 {
                outcome.landed = true;
                // Rest flush on the tile top instead of hovering a partial step above it.
                let half = body.half_size().y;
                let snapped = (old.y - half).floor() + half;
                if !tiles.overlaps(Vec2::new(old.x, snapped), body.size) {
                    next.y = snapped;
                }
            } else if body.velocity.y > 0.0 {
                outcome.bumped_head = true;
            }
            body.velocity.y = 0.0;
        }
        if blocked_x {
            next.x = old.x;
            body.velocity.x = 0.0;
            outcome.blocked_x = true;
        }
    }

    body.pos = next;
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor_grid() -> TileCollision {
        let mut tiles = TileCollision::new(8, 8);
        tiles.fill_rect(0, 0, 8, 1, true);
        tiles
    }

    #[test]
    fn gravity_accelerates_downward() {
        let tiles = TileCollision::new(8, 8);
        let mut body = Body::new(Vec2::new(4.0, 6.0), Vec2::splat(1.0));
        let settings = PhysicsSettings::default();
        step_body(&mut body, &tiles, &settings);
        assert_eq!(body.velocity.y, -0.0375);
        assert!(body.pos.y < 6.0);
    }

    #[test]
    fn falling_body_lands_on_tile_top() {
        let tiles = floor_grid();
        let mut body = Body::new(Vec2::new(4.0, 1.7), Vec2::new(1.0, 1.0));
        body.velocity.y = -0.5;
        let outcome = step_body(&mut body, &tiles, &PhysicsSettings::default());
        assert!(outcome.landed);
        assert_eq!(body.velocity.y, 0.0);
        assert_eq!(body.pos.y, 1.5);
    }

    #[test]
    fn wall_stops_horizontal_motion() {
        let mut tiles = TileCollision::new(8, 8);
        tiles.set_solid(5, 3, true);
        let mut body = Body::new(Vec2::new(4.4, 3.5), Vec2::new(0.5, 0.5));
        body.gravity_scale = 0.0;
        body.velocity.x = 0.5;
        let outcome = step_body(&mut body, &tiles, &PhysicsSettings::default());
        assert!(outcome.blocked_x);
        assert_eq!(body.pos.x, 4.4);
        assert_eq!(body.velocity.x, 0.0);
    }

    #[test]
    fn velocity_is_capped() {
        let tiles = TileCollision::new(8, 8);
        let mut body = Body::new(Vec2::new(4.0, 4.0), Vec2::splat(1.0));
        body.gravity_scale = 0.0;
        body.velocity = Vec2::new(3.0, 0.0);
        step_body(&mut body, &tiles, &PhysicsSettings::default());
        assert_eq!(body.velocity.x, 1.0);
    }

    #[test]
    fn non_colliding_body_passes_through() {
        let tiles = floor_grid();
        let mut body = Body::new(Vec2::new(4.0, 1.2), Vec2::splat(1.0));
        body.collide_tiles = false;
        body.velocity.y = -0.5;
        step_body(&mut body, &tiles, &PhysicsSettings::default());
        assert!(body.pos.y < 1.0);
    }
}

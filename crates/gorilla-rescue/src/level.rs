//! Level layouts.
//!
//! Levels ship as Tiled JSON maps: any non-zero tile is solid, and an object
//! layer marks where things start. Object classes are `player`, `enemy`
//! (optional `delay` property), `gorilla` and `home`. Small layouts for
//! tests can also be written as rows of text.
//!
//! Start positions are stored as the bottom-center of the marker's cell, so
//! each entity can stand on the floor whatever its height.

use arcade_engine::{MapError, TileCollision, TiledMap};
use glam::Vec2;
use thiserror::Error;

const LEVEL_1: &str = include_str!("../levels/level_1.json");

/// Spawn time for an enemy marker without a `delay` property.
pub const DEFAULT_ENEMY_DELAY: f32 = 2.0;
/// Extra delay per enemy in text layouts, in reading order.
pub const TEXT_ENEMY_STAGGER: f32 = 1.0;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error(transparent)]
    Map(#[from] MapError),
    #[error("level '{0}' has no player start")]
    MissingPlayerStart(String),
    #[error("level '{level}' has an object of unknown kind '{kind}'")]
    UnknownObject { level: String, kind: String },
    #[error("no levels to play")]
    NoLevels,
    #[error("level layout has no rows")]
    EmptyLayout,
    #[error("row {row} is {actual} tiles wide, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("unknown glyph '{glyph}' at row {row}, column {col}")]
    UnknownGlyph { glyph: char, row: usize, col: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStart {
    pub foot: Vec2,
    pub delay: f32,
}

#[derive(Debug, Clone)]
pub struct LevelDef {
    pub name: String,
    /// Collision grid with horizontal wrap enabled.
    pub tiles: TileCollision,
    pub player_start: Vec2,
    pub enemies: Vec<EnemyStart>,
    pub gorillas: Vec<Vec2>,
    pub homes: Vec<Vec2>,
}

impl LevelDef {
    pub fn width(&self) -> u32 {
        self.tiles.width()
    }

    pub fn height(&self) -> u32 {
        self.tiles.height()
    }

    pub fn from_tiled_json(name: &str, json: &str) -> Result<Self, LevelError> {
        let map = TiledMap::from_json(json)?;
        Self::from_tiled(name, &map)
    }

    pub fn from_tiled(name: &str, map: &TiledMap) -> Result<Self, LevelError> {
        let mut player_start = None;
        let mut enemies = Vec::new();
        let mut gorillas = Vec::new();
        let mut homes = Vec::new();

        for object in map.objects() {
            let center = map.object_position(object);
            // Markers without a size sit on their cell's center.
            let foot = center - Vec2::new(0.0, 0.5);
            match object.kind.as_str() {
                "player" => {
                    if player_start.replace(foot).is_some() {
                        log::warn!("level '{}' has more than one player start", name);
                    }
                }
                "enemy" => enemies.push(EnemyStart {
                    foot,
                    delay: object.property_f32("delay").unwrap_or(DEFAULT_ENEMY_DELAY),
                }),
                "gorilla" => gorillas.push(foot),
                "home" => homes.push(foot),
                other => {
                    return Err(LevelError::UnknownObject {
                        level: name.to_string(),
                        kind: other.to_string(),
                    })
                }
            }
        }

        let player_start =
            player_start.ok_or_else(|| LevelError::MissingPlayerStart(name.to_string()))?;
        let level = Self {
            name: name.to_string(),
            tiles: map.collision().with_wrap_x(true),
            player_start,
            enemies,
            gorillas,
            homes,
        };
        level.log_summary();
        Ok(level)
    }

    /// Build a level from text rows, top row first.
    ///
    /// `#` is solid, `.` or space is empty, and `P`, `E`, `G`, `H` mark the
    /// player, an enemy, a gorilla and home.
    pub fn from_rows(name: &str, rows: &[&str]) -> Result<Self, LevelError> {
        let Some(first) = rows.first() else {
            return Err(LevelError::EmptyLayout);
        };
        let width = first.chars().count();
        if width == 0 {
            return Err(LevelError::EmptyLayout);
        }
        let height = rows.len();
        let mut tiles = TileCollision::new(width as u32, height as u32).with_wrap_x(true);
        let mut player_start = None;
        let mut enemies = Vec::new();
        let mut gorillas = Vec::new();
        let mut homes = Vec::new();

        for (row, line) in rows.iter().enumerate() {
            let actual = line.chars().count();
            if actual != width {
                return Err(LevelError::RaggedRow {
                    row,
                    expected: width,
                    actual,
                });
            }
            let y = (height - 1 - row) as u32;
            for (col, glyph) in line.chars().enumerate() {
                let foot = Vec2::new(col as f32 + 0.5, y as f32);
                match glyph {
                    '#' => tiles.set_solid(col as u32, y, true),
                    '.' | ' ' => {}
                    'P' => player_start = Some(foot),
                    'E' => enemies.push(EnemyStart {
                        foot,
                        delay: DEFAULT_ENEMY_DELAY + enemies.len() as f32 * TEXT_ENEMY_STAGGER,
                    }),
                    'G' => gorillas.push(foot),
                    'H' => homes.push(foot),
                    glyph => return Err(LevelError::UnknownGlyph { glyph, row, col }),
                }
            }
        }

        Ok(Self {
            name: name.to_string(),
            tiles,
            player_start: player_start
                .ok_or_else(|| LevelError::MissingPlayerStart(name.to_string()))?,
            enemies,
            gorillas,
            homes,
        })
    }

    fn log_summary(&self) {
        log::info!(
            "loaded level '{}' ({}x{}): {} enemies, {} gorillas, {} homes",
            self.name,
            self.width(),
            self.height(),
            self.enemies.len(),
            self.gorillas.len(),
            self.homes.len()
        );
    }
}

/// The levels bundled with the game, in play order.
pub fn builtin_levels() -> Result<Vec<LevelDef>, LevelError> {
    Ok(vec![LevelDef::from_tiled_json("level_1", LEVEL_1)?])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_level_loads() {
        let levels = builtin_levels().unwrap();
        assert_eq!(levels.len(), 1);
        let level = &levels[0];
        assert_eq!((level.width(), level.height()), (16, 14));
        assert!(level.tiles.wraps_x());
        assert_eq!(level.player_start, Vec2::new(3.5, 1.0));
        assert_eq!(level.enemies.len(), 2);
        assert_eq!(level.gorillas.len(), 4);
        assert_eq!(level.homes, vec![Vec2::new(7.5, 1.0)]);
        // Bottom row is the floor.
        assert!((0..16).all(|x| level.tiles.is_solid(x, 0)));
    }

    #[test]
    fn builtin_markers_stand_on_solid_ground() {
        let level = &builtin_levels().unwrap()[0];
        let feet = level
            .enemies
            .iter()
            .map(|e| e.foot)
            .chain(level.gorillas.iter().copied())
            .chain(level.homes.iter().copied())
            .chain(std::iter::once(level.player_start));
        for foot in feet {
            assert!(
                level.tiles.is_solid_at(foot - Vec2::new(0.0, 0.5)),
                "nothing under {:?}",
                foot
            );
        }
    }

    #[test]
    fn tiled_enemy_delays() {
        let level = &builtin_levels().unwrap()[0];
        let delays: Vec<f32> = level.enemies.iter().map(|e| e.delay).collect();
        assert_eq!(delays, vec![2.0, 4.0]);
    }

    #[test]
    fn text_layout() {
        let level = LevelDef::from_rows(
            "small",
            &["G....E", ".P..H.", "######"],
        )
        .unwrap();
        assert_eq!(level.player_start, Vec2::new(1.5, 1.0));
        assert_eq!(level.gorillas, vec![Vec2::new(0.5, 2.0)]);
        assert_eq!(level.enemies[0].foot, Vec2::new(5.5, 2.0));
        assert_eq!(level.enemies[0].delay, DEFAULT_ENEMY_DELAY);
        assert!(level.tiles.is_solid(3, 0));
        assert!(!level.tiles.is_solid(3, 1));
    }

    #[test]
    fn text_layout_errors() {
        assert!(matches!(
            LevelDef::from_rows("x", &[]),
            Err(LevelError::EmptyLayout)
        ));
        assert!(matches!(
            LevelDef::from_rows("x", &["P..", "##"]),
            Err(LevelError::RaggedRow { row: 1, expected: 3, actual: 2 })
        ));
        assert!(matches!(
            LevelDef::from_rows("x", &["P.?"]),
            Err(LevelError::UnknownGlyph { glyph: '?', row: 0, col: 2 })
        ));
        assert!(matches!(
            LevelDef::from_rows("x", &["..."]),
            Err(LevelError::MissingPlayerStart(_))
        ));
    }

    #[test]
    fn unknown_tiled_object_is_rejected() {
        let json = r#"{ "width": 2, "height": 2, "layers": [
            { "type": "objectgroup", "objects": [ { "type": "dragon", "x": 0, "y": 0 } ] }
        ] }"#;
        match LevelDef::from_tiled_json("bad", json) {
            Err(LevelError::UnknownObject { kind, .. }) => assert_eq!(kind, "dragon"),
            other => panic!("expected UnknownObject, got {:?}", other),
        }
    }

    #[test]
    fn map_errors_pass_through() {
        assert!(matches!(
            LevelDef::from_tiled_json("bad", "{"),
            Err(LevelError::Map(MapError::Json(_)))
        ));
    }

    #[test]
    fn oversized_map_is_a_level_error() {
        let json = r#"{ "width": 65536, "height": 65536, "layers": [] }"#;
        assert!(matches!(
            LevelDef::from_tiled_json("huge", json),
            Err(LevelError::Map(MapError::TooLarge { .. }))
        ));
    }
}

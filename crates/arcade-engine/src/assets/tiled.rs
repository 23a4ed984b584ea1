use glam::Vec2;
use serde::Deserialize;
use thiserror::Error;
use crate::components::tilemap::TileCollision;

/// Map file exported from the Tiled editor (JSON format).
///
/// Only the parts the engine needs: grid size, tile layers (any non-zero gid
/// is solid) and object groups for spawn markers.
#[derive(Debug, Clone, Deserialize)]
pub struct TiledMap {
    /// Width in tiles.
    pub width: u32,
    /// Height in tiles.
    pub height: u32,
    /// Tile width in pixels.
    #[serde(default = "default_tile_px")]
    pub tilewidth: u32,
    /// Tile height in pixels.
    #[serde(default = "default_tile_px")]
    pub tileheight: u32,
    pub layers: Vec<TiledLayer>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TiledLayer {
    TileLayer {
        #[serde(default)]
        name: String,
        data: Vec<u32>,
    },
    ObjectGroup {
        #[serde(default)]
        name: String,
        #[serde(default)]
        objects: Vec<TiledObject>,
    },
    /// Image layers, groups and anything else we do not read.
    #[serde(other)]
    Other,
}

/// A placed object. Coordinates are pixels from the map's top-left corner.
#[derive(Debug, Clone, Deserialize)]
pub struct TiledObject {
    #[serde(default)]
    pub name: String,
    /// Object class. Tiled 1.9 wrote this as `class`.
    #[serde(default, rename = "type", alias = "class")]
    pub kind: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    #[serde(default)]
    pub properties: Vec<TiledProperty>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TiledProperty {
    pub name: String,
    pub value: serde_json::Value,
}

#[derive(Debug, Error)]
pub enum MapError {
    #[error("failed to parse map JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("tile layer '{layer}' has {actual} tiles, expected {expected}")]
    LayerSize {
        layer: String,
        expected: usize,
        actual: usize,
    },
    #[error("map has zero width or height")]
    Empty,
    #[error("map of {width}x{height} tiles is too large")]
    TooLarge { width: u32, height: u32 },
}

fn default_tile_px() -> u32 {
    16
}

impl TiledMap {
    /// Parse and validate a map from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, MapError> {
        let map: TiledMap = serde_json::from_str(json)?;
        map.validate()?;
        Ok(map)
    }

    fn validate(&self) -> Result<(), MapError> {
        if self.width == 0 || self.height == 0 {
            return Err(MapError::Empty);
        }
        // Tile indices are computed in u32 by the collision grid.
        let expected = self
            .width
            .checked_mul(self.height)
            .ok_or(MapError::TooLarge {
                width: self.width,
                height: self.height,
            })? as usize;
        for layer in &self.layers {
            if let TiledLayer::TileLayer { name, data } = layer {
                if data.len() != expected {
                    return Err(MapError::LayerSize {
                        layer: name.clone(),
                        expected,
                        actual: data.len(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Build the collision grid. File row 0 is the top of the map.
    pub fn collision(&self) -> TileCollision {
        let mut tiles = TileCollision::new(self.width, self.height);
        for layer in &self.layers {
            let TiledLayer::TileLayer { data, .. } = layer else {
                continue;
            };
            for y in 0..self.height {
                for x in 0..self.width {
                    if data[(y * self.width + x) as usize] > 0 {
                        tiles.set_solid(x, self.height - 1 - y, true);
                    }
                }
            }
        }
        tiles
    }

    /// All objects across every object group.
    pub fn objects(&self) -> impl Iterator<Item = &TiledObject> {
        self.layers.iter().flat_map(|layer| match layer {
            TiledLayer::ObjectGroup { objects, .. } => objects.as_slice(),
            _ => &[][..],
        })
    }

    /// Center of an object in y-up tile units.
    pub fn object_position(&self, object: &TiledObject) -> Vec2 {
        let px = object.x + object.width / 2.0;
        let py = object.y + object.height / 2.0;
        Vec2::new(
            px / self.tilewidth as f32,
            self.height as f32 - py / self.tileheight as f32,
        )
    }
}

impl TiledObject {
    /// Numeric custom property, if present.
    pub fn property_f32(&self, name: &str) -> Option<f32> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .and_then(|p| p.value.as_f64())
            .map(|v| v as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_MAP: &str = r#"{
        "width": 3, "height": 2, "tilewidth": 16, "tileheight": 16,
        "layers": [
            { "type": "tilelayer", "name": "ground", "data": [0, 0, 0, 1, 2, 1] },
            { "type": "objectgroup", "name": "spawns", "objects": [
                { "name": "start", "type": "player", "x": 8, "y": 8 },
                { "name": "", "class": "enemy", "x": 16, "y": 0, "width": 16, "height": 16,
                  "properties": [ { "name": "delay", "type": "float", "value": 4.5 } ] }
            ]},
            { "type": "imagelayer", "name": "sky" }
        ]
    }"#;

    #[test]
    fn bottom_row_becomes_y_zero() {
        let map = TiledMap::from_json(SMALL_MAP).unwrap();
        let tiles = map.collision();
        assert!(tiles.is_solid(0, 0));
        assert!(tiles.is_solid(2, 0));
        assert!(!tiles.is_solid(0, 1));
    }

    #[test]
    fn objects_are_read_with_properties() {
        let map = TiledMap::from_json(SMALL_MAP).unwrap();
        let objects: Vec<_> = map.objects().collect();
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].kind, "player");
        assert_eq!(objects[1].kind, "enemy");
        assert_eq!(objects[1].property_f32("delay"), Some(4.5));
        assert_eq!(map.object_position(objects[0]), Vec2::new(0.5, 1.5));
        assert_eq!(map.object_position(objects[1]), Vec2::new(1.5, 1.5));
    }

    #[test]
    fn wrong_layer_size_is_rejected() {
        let json = r#"{ "width": 2, "height": 2, "layers": [
            { "type": "tilelayer", "name": "bad", "data": [1, 1, 1] }
        ] }"#;
        match TiledMap::from_json(json) {
            Err(MapError::LayerSize { layer, expected, actual }) => {
                assert_eq!(layer, "bad");
                assert_eq!(expected, 4);
                assert_eq!(actual, 3);
            }
            other => panic!("expected LayerSize error, got {:?}", other),
        }
    }

    #[test]
    fn oversized_map_is_rejected() {
        let json = r#"{ "width": 70000, "height": 70000, "layers": [] }"#;
        assert!(matches!(
            TiledMap::from_json(json),
            Err(MapError::TooLarge { width: 70000, height: 70000 })
        ));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(TiledMap::from_json("{"), Err(MapError::Json(_))));
    }
}

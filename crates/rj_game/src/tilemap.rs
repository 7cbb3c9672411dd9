//! Tile map model: an immutable grid of tile ids in ordered layers.
//!
//! The map arrives already parsed (the level editor exports it); this module
//! only validates it and answers lookups. Layers keep their draw order. Only
//! layers flagged `collision` take part in gameplay queries, the rest are
//! decoration for the renderer.
//!
//! Tile id `0` means "no tile". Every other id maps to an optional type tag
//! such as `"floor"` through `tile_types`.

use glam::Vec2;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Deserialize, Clone)]
pub struct TileMapFile {
    pub tile_width: u32,
    pub tile_height: u32,
    pub columns: u32,
    pub rows: u32,
    #[serde(default)]
    pub origin: MapOrigin,
    pub layers: Vec<LayerFile>,
    #[serde(default)]
    pub tile_types: HashMap<u32, String>,
}

#[derive(Debug, Deserialize, Clone, Copy, Default)]
pub struct MapOrigin {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LayerFile {
    pub name: String,
    #[serde(default)]
    pub collision: bool,
    /// Row-major, `columns * rows` entries.
    pub tiles: Vec<u32>,
}

#[derive(Debug, Clone)]
pub struct Layer {
    pub name: String,
    pub collision: bool,
    tiles: Vec<u32>,
}

#[derive(Debug, Clone)]
pub struct TileMap {
    pub tile_size: (u32, u32),
    pub grid_size: (u32, u32),
    /// World offset of the grid's top-left corner.
    pub origin: Vec2,
    layers: Vec<Layer>,
    tile_types: HashMap<u32, String>,
}

impl TileMap {
    /// Build from a file that already passed `validate_tile_map_file`.
    pub fn from_file(file: TileMapFile) -> Self {
        let layers = file
            .layers
            .into_iter()
            .map(|layer| Layer {
                name: layer.name,
                collision: layer.collision,
                tiles: layer.tiles,
            })
            .collect();
        Self {
            tile_size: (file.tile_width, file.tile_height),
            grid_size: (file.columns, file.rows),
            origin: Vec2::new(file.origin.x, file.origin.y),
            layers,
            tile_types: file.tile_types,
        }
    }

    /// Size of the whole map in world pixels.
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(
            self.grid_size.0 as f32 * self.tile_size.0 as f32,
            self.grid_size.1 as f32 * self.tile_size.1 as f32,
        )
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    #[cfg(test)]
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.name == name)
    }

    pub fn collision_layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter().filter(|layer| layer.collision)
    }

    pub fn tile_type(&self, tile_id: u32) -> Option<&str> {
        self.tile_types.get(&tile_id).map(String::as_str)
    }

    pub fn in_bounds(&self, col: i32, row: i32) -> bool {
        col >= 0 && row >= 0 && (col as u32) < self.grid_size.0 && (row as u32) < self.grid_size.1
    }

    /// Tile id at a grid cell of `layer`, `None` outside the grid.
    pub fn tile_at(&self, layer: &Layer, col: i32, row: i32) -> Option<u32> {
        if !self.in_bounds(col, row) {
            return None;
        }
        let index = row as usize * self.grid_size.0 as usize + col as usize;
        layer.tiles.get(index).copied()
    }
}

pub fn validate_tile_map_file(file: &TileMapFile) -> Result<(), String> {
    if file.tile_width == 0 || file.tile_height == 0 {
        return Err("Map validation failed: tile size must be > 0".to_string());
    }
    if file.columns == 0 || file.rows == 0 {
        return Err("Map validation failed: columns and rows must be > 0".to_string());
    }
    if file.columns.checked_mul(file.tile_width).is_none()
        || file.rows.checked_mul(file.tile_height).is_none()
    {
        return Err(format!(
            "Map validation failed: {}x{} tiles of {}x{}px exceed the addressable world size",
            file.columns, file.rows, file.tile_width, file.tile_height
        ));
    }
    if file.layers.is_empty() {
        return Err("Map validation failed: layers array is empty".to_string());
    }

    let expected = file.columns as usize * file.rows as usize;
    let mut names = HashSet::new();
    for layer in &file.layers {
        if !names.insert(layer.name.as_str()) {
            return Err(format!(
                "Map validation failed: duplicate layer name '{}'",
                layer.name
            ));
        }
        if layer.tiles.len() != expected {
            return Err(format!(
                "Map validation failed: layer '{}' has {} tiles, expected {}",
                layer.name,
                layer.tiles.len(),
                expected
            ));
        }
    }

    if !file.layers.iter().any(|layer| layer.collision) {
        log::warn!("Map has no collision layer. Every actor will fall through the world.");
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// `columns x rows` map with one collision layer whose listed cells hold
    /// tile id 1 (tagged `"floor"`); all other cells hold id 2 (`"empty"`).
    pub(crate) fn floor_map(
        columns: u32,
        rows: u32,
        tile: u32,
        floor_cells: &[(u32, u32)],
    ) -> TileMap {
        let mut tiles = vec![2; (columns * rows) as usize];
        for &(col, row) in floor_cells {
            tiles[(row * columns + col) as usize] = 1;
        }
        let file = TileMapFile {
            tile_width: tile,
            tile_height: tile,
            columns,
            rows,
            origin: MapOrigin::default(),
            layers: vec![
                LayerFile {
                    name: "Background".to_string(),
                    collision: false,
                    tiles: vec![1; (columns * rows) as usize],
                },
                LayerFile {
                    name: "World".to_string(),
                    collision: true,
                    tiles,
                },
            ],
            tile_types: HashMap::from([(1, "floor".to_string()), (2, "empty".to_string())]),
        };
        validate_tile_map_file(&file).expect("test map is valid");
        TileMap::from_file(file)
    }

    #[test]
    fn world_size_is_grid_times_tile() {
        let map = floor_map(10, 8, 32, &[]);
        assert_eq!(map.world_size(), Vec2::new(320.0, 256.0));
    }

    #[test]
    fn tile_at_reads_row_major() {
        let map = floor_map(10, 10, 32, &[(2, 3)]);
        let world = map.layer("World").expect("world layer");
        assert_eq!(map.tile_at(world, 2, 3), Some(1));
        assert_eq!(map.tile_at(world, 3, 2), Some(2));
        assert_eq!(map.tile_at(world, 10, 0), None);
        assert_eq!(map.tile_at(world, -1, 0), None);
    }

    #[test]
    fn only_flagged_layers_are_collision_layers() {
        let map = floor_map(4, 4, 16, &[]);
        let names: Vec<&str> = map.collision_layers().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["World"]);
        assert_eq!(map.layers().len(), 2);
    }

    #[test]
    fn tile_type_lookup() {
        let map = floor_map(4, 4, 16, &[]);
        assert_eq!(map.tile_type(1), Some("floor"));
        assert_eq!(map.tile_type(0), None);
    }

    #[test]
    fn validate_rejects_wrong_tile_count() {
        let file = TileMapFile {
            tile_width: 32,
            tile_height: 32,
            columns: 3,
            rows: 2,
            origin: MapOrigin::default(),
            layers: vec![LayerFile {
                name: "World".to_string(),
                collision: true,
                tiles: vec![0; 5],
            }],
            tile_types: HashMap::new(),
        };
        let err = validate_tile_map_file(&file).expect_err("short layer should fail");
        assert!(err.contains("has 5 tiles, expected 6"));
    }

    #[test]
    fn validate_rejects_pixel_size_overflow() {
        let file = TileMapFile {
            tile_width: 65536,
            tile_height: 32,
            columns: 65536,
            rows: 1,
            origin: MapOrigin::default(),
            layers: vec![LayerFile {
                name: "World".to_string(),
                collision: true,
                tiles: vec![0; 65536],
            }],
            tile_types: HashMap::new(),
        };
        let err = validate_tile_map_file(&file).expect_err("oversized map should fail");
        assert!(err.starts_with("Map validation failed:"));
        assert!(err.contains("exceed the addressable world size"));
    }

    #[test]
    fn validate_rejects_duplicate_layer_names() {
        let layer = LayerFile {
            name: "World".to_string(),
            collision: true,
            tiles: vec![0; 4],
        };
        let file = TileMapFile {
            tile_width: 32,
            tile_height: 32,
            columns: 2,
            rows: 2,
            origin: MapOrigin::default(),
            layers: vec![layer.clone(), layer],
            tile_types: HashMap::new(),
        };
        let err = validate_tile_map_file(&file).expect_err("duplicate names should fail");
        assert!(err.contains("duplicate layer name 'World'"));
    }
}

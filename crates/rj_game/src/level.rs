use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::tilemap::{validate_tile_map_file, TileMap, TileMapFile};

#[derive(Debug, Deserialize, Clone)]
pub struct LevelFile {
    pub version: String,
    pub level_id: String,
    pub map: TileMapFile,
    /// The first spawn is the player; the rest are NPCs.
    pub actors: Vec<ActorSpawn>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct ActorSpawn {
    pub x: f32,
    pub y: f32,
    /// Sprite sheet row of this character, in pixels.
    #[serde(default)]
    pub frame_y_offset: u32,
}

#[derive(Debug, Clone)]
pub struct Level {
    pub level_id: String,
    pub map: TileMap,
    pub spawns: Vec<ActorSpawn>,
}

pub fn load_level_from_path(path: &Path) -> Result<Level, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read level file {}: {e}", path.display()))?;
    parse_level(&raw).map_err(|e| format!("{e} (in {})", path.display()))
}

pub fn parse_level(raw: &str) -> Result<Level, String> {
    let file: LevelFile =
        serde_json::from_str(raw).map_err(|e| format!("Failed to parse level JSON: {e}"))?;
    validate_level(&file)?;
    Ok(Level {
        level_id: file.level_id,
        map: TileMap::from_file(file.map),
        spawns: file.actors,
    })
}

fn validate_level(file: &LevelFile) -> Result<(), String> {
    if file.version != "0.1" {
        return Err(format!(
            "Level validation failed: unsupported version '{}'",
            file.version
        ));
    }
    if file.level_id.is_empty() {
        return Err("Level validation failed: level_id is empty".to_string());
    }
    validate_tile_map_file(&file.map)?;

    if file.actors.is_empty() {
        return Err("Level validation failed: actors array is empty (no player)".to_string());
    }
    let world_w = file.map.columns as f32 * file.map.tile_width as f32;
    let world_h = file.map.rows as f32 * file.map.tile_height as f32;
    for (i, spawn) in file.actors.iter().enumerate() {
        if !(0.0..world_w).contains(&spawn.x) || !(0.0..world_h).contains(&spawn.y) {
            return Err(format!(
                "Level validation failed: actor {} spawns outside the world at ({}, {})",
                i, spawn.x, spawn.y
            ));
        }
    }
    Ok(())
}

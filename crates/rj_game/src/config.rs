//! Game configuration loaded from JSON. Every field has a default, so an
//! empty object `{}` is a valid config.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::actor::ActorTuning;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GameConfig {
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub zoom: f32,
    /// Simulation step in seconds.
    pub fixed_dt: f32,
    /// Seconds between the player's death and the level-wide respawn.
    pub respawn_delay: f32,
    pub free_camera_speed: f32,
    pub audio_enabled: bool,
    pub actor: ActorTuning,
    /// Optional clip table; the built-in sprite layout is used when absent.
    pub clip_table_path: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            viewport_width: 800,
            viewport_height: 600,
            zoom: 2.0,
            fixed_dt: 1.0 / 60.0,
            respawn_delay: 2.0,
            free_camera_speed: 250.0,
            audio_enabled: true,
            actor: ActorTuning::default(),
            clip_table_path: None,
        }
    }
}

pub fn load_config_from_path(path: &Path) -> Result<GameConfig, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let config: GameConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse config JSON {}: {e}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &GameConfig) -> Result<(), String> {
    if config.viewport_width == 0 || config.viewport_height == 0 {
        return Err("Config validation failed: viewport size must be > 0".to_string());
    }
    if !(config.zoom.is_finite() && config.zoom > 0.0) {
        return Err("Config validation failed: zoom must be > 0".to_string());
    }
    if !(config.fixed_dt.is_finite() && config.fixed_dt > 0.0) {
        return Err("Config validation failed: fixed_dt must be > 0".to_string());
    }
    if config.respawn_delay < 0.0 {
        return Err("Config validation failed: respawn_delay must be >= 0".to_string());
    }
    config.actor.validate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "rj_config_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn empty_object_uses_defaults() {
        let path = temp_file_path("empty");
        fs::write(&path, "{}").expect("write temp file");
        let config = load_config_from_path(&path).expect("empty config should load");
        assert_eq!(config.viewport_width, 800);
        assert_eq!(config.zoom, 2.0);
        assert_eq!(config.actor, ActorTuning::default());
        assert!(config.clip_table_path.is_none());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn partial_actor_tuning_keeps_other_defaults() {
        let path = temp_file_path("partial");
        fs::write(
            &path,
            r#"{ "zoom": 1.5, "audio_enabled": false, "actor": { "run_speed_max": 300.0 } }"#,
        )
        .expect("write temp file");
        let config = load_config_from_path(&path).expect("config should load");
        assert_eq!(config.zoom, 1.5);
        assert!(!config.audio_enabled);
        assert_eq!(config.actor.run_speed_max, 300.0);
        assert_eq!(config.actor.walk_speed_max, 100.0);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn rejects_non_positive_zoom() {
        let path = temp_file_path("zoom");
        fs::write(&path, r#"{ "zoom": 0.0 }"#).expect("write temp file");
        let err = load_config_from_path(&path).expect_err("zero zoom should fail");
        assert!(err.contains("zoom must be > 0"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn rejects_invalid_actor_tuning() {
        let path = temp_file_path("tuning");
        fs::write(&path, r#"{ "actor": { "width": -1.0 } }"#).expect("write temp file");
        let err = load_config_from_path(&path).expect_err("negative width should fail");
        assert!(err.contains("width must be > 0"));
        let _ = fs::remove_file(path);
    }
}

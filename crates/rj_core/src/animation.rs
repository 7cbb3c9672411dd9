//! Sprite-sheet animation clips and the per-actor frame cursor.
//!
//! A sprite sheet row holds every frame of one character. A clip is a
//! half-open column range `[start, end)` in that row, and the cursor walks it
//! at a fixed frame rate, looping back to `start` when it reaches `end`.
//!
//! The JSON clip table stores the ranges by clip name; missing clips fall back
//! to the built-in layout.

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Named clips an actor can play. Which one is active is derived from the
/// actor's motion state, never stored separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Clip {
    Walk,
    Run,
    Jump,
    Fall,
}

impl Clip {
    pub const ALL: &'static [Clip] = &[Clip::Walk, Clip::Run, Clip::Jump, Clip::Fall];

    pub fn label(self) -> &'static str {
        match self {
            Self::Walk => "walk",
            Self::Run => "run",
            Self::Jump => "jump",
            Self::Fall => "fall",
        }
    }
}

impl std::fmt::Display for Clip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Half-open frame range `[start, end)` within a sprite sheet row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ClipRange {
    pub start: u32,
    pub end: u32,
}

impl ClipRange {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn contains(self, frame: u32) -> bool {
        frame >= self.start && frame < self.end
    }

    pub fn len(self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClipTable {
    pub walk: ClipRange,
    pub run: ClipRange,
    pub jump: ClipRange,
    pub fall: ClipRange,
}

impl Default for ClipTable {
    fn default() -> Self {
        Self {
            walk: ClipRange::new(0, 4),
            run: ClipRange::new(4, 8),
            jump: ClipRange::new(8, 10),
            fall: ClipRange::new(10, 12),
        }
    }
}

impl ClipTable {
    pub fn range(&self, clip: Clip) -> ClipRange {
        match clip {
            Clip::Walk => self.walk,
            Clip::Run => self.run,
            Clip::Jump => self.jump,
            Clip::Fall => self.fall,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        for &clip in Clip::ALL {
            if self.range(clip).is_empty() {
                let range = self.range(clip);
                return Err(format!(
                    "Clip validation failed: clip '{}' has empty range [{}, {})",
                    clip, range.start, range.end
                ));
            }
        }
        Ok(())
    }
}

/// Playback position inside the active clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameCursor {
    pub frame: u32,
    pub frame_time: f32,
    pub fps: f32,
}

impl FrameCursor {
    pub fn new(fps: f32, range: ClipRange) -> Self {
        Self {
            frame: range.start,
            frame_time: 0.0,
            fps,
        }
    }

    /// Jump back to the first frame of `range`.
    pub fn restart(&mut self, range: ClipRange) {
        self.frame = range.start;
        self.frame_time = 0.0;
    }

    /// Advance playback by `dt` seconds when `playing`, then keep the frame
    /// inside `range`. A frame is held for strictly more than `1 / fps`.
    pub fn tick(&mut self, dt: f32, playing: bool, range: ClipRange) {
        if playing {
            self.frame_time += dt;
            if self.frame_time > 1.0 / self.fps {
                self.frame += 1;
                self.frame_time = 0.0;
            }
        }

        if !range.contains(self.frame) {
            self.frame = range.start;
        }
    }
}

#[derive(Debug, Deserialize)]
struct ClipTableJson {
    version: String,
    #[serde(default)]
    clips: ClipTable,
}

/// Load a clip table from disk.
pub fn load_clip_table(path: &Path) -> Result<ClipTable, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read clip table {}: {e}", path.display()))?;
    parse_clip_table(&raw).map_err(|e| format!("{e} (in {})", path.display()))
}

pub fn parse_clip_table(raw: &str) -> Result<ClipTable, String> {
    let json: ClipTableJson =
        serde_json::from_str(raw).map_err(|e| format!("Failed to parse clip table: {e}"))?;
    if json.version != "0.1" {
        return Err(format!(
            "Clip validation failed: unsupported version '{}'",
            json.version
        ));
    }
    json.clips.validate()?;
    Ok(json.clips)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "rj_clip_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn tick_advances_after_one_frame_period() {
        let range = ClipRange::new(0, 4);
        let mut cursor = FrameCursor::new(4.0, range);

        cursor.tick(0.25, true, range);
        assert_eq!(cursor.frame, 0, "exactly 1/fps is not enough");

        cursor.tick(0.125, true, range);
        assert_eq!(cursor.frame, 1);
        assert_eq!(cursor.frame_time, 0.0);
    }

    #[test]
    fn tick_loops_to_clip_start() {
        let range = ClipRange::new(4, 6);
        let mut cursor = FrameCursor::new(10.0, range);
        for _ in 0..2 {
            cursor.tick(0.5, true, range);
        }
        assert_eq!(cursor.frame, 4);
    }

    #[test]
    fn paused_cursor_holds_frame() {
        let range = ClipRange::new(0, 4);
        let mut cursor = FrameCursor::new(12.0, range);
        cursor.frame = 2;
        cursor.tick(1.0, false, range);
        assert_eq!(cursor.frame, 2);
        assert_eq!(cursor.frame_time, 0.0);
    }

    #[test]
    fn frame_outside_new_clip_snaps_to_start() {
        let walk = ClipRange::new(0, 4);
        let fall = ClipRange::new(10, 12);
        let mut cursor = FrameCursor::new(12.0, walk);
        cursor.frame = 3;
        cursor.tick(0.0, true, fall);
        assert_eq!(cursor.frame, 10);
    }

    #[test]
    fn default_table_is_valid() {
        let table = ClipTable::default();
        table.validate().expect("default clips are valid");
        assert_eq!(table.range(Clip::Jump), ClipRange::new(8, 10));
    }

    #[test]
    fn parse_clip_table_fills_missing_clips() {
        let table = parse_clip_table(
            r#"{ "version": "0.1", "clips": { "run": { "start": 12, "end": 16 } } }"#,
        )
        .expect("should parse");
        assert_eq!(table.run, ClipRange::new(12, 16));
        assert_eq!(table.walk, ClipTable::default().walk);
    }

    #[test]
    fn parse_clip_table_rejects_empty_range() {
        let err = parse_clip_table(
            r#"{ "version": "0.1", "clips": { "fall": { "start": 3, "end": 3 } } }"#,
        )
        .expect_err("empty range should fail");
        assert!(err.contains("clip 'fall' has empty range"));
    }

    #[test]
    fn load_clip_table_rejects_bad_version() {
        let path = temp_file_path("bad_version");
        fs::write(&path, r#"{ "version": "9.9" }"#).expect("write temp file");
        let err = load_clip_table(&path).expect_err("bad version should fail");
        assert!(err.contains("unsupported version"));
        let _ = fs::remove_file(path);
    }
}

//! Keyboard snapshot with both edge-triggered and level-triggered queries.
//!
//! - **Level-triggered (held):** `is_held(key)` is true every frame the key is
//!   down. Walking, running, zooming and free-camera panning read this.
//!
//! - **Edge-triggered (just_pressed / just_released):** true only during the
//!   frame the transition happened, cleared by `end_frame()`. Pause, resume
//!   and zoom reset read these. The main loop
//!   calls `end_frame()` only after a simulation step has consumed them, so a
//!   press is never lost on a frame with zero fixed steps.
//!
//! The input layer owns the mapping from physical devices to `Key`; this type
//! only records which logical keys are down.

use serde::Deserialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    A,
    D,
    LShift,
    Space,
    Escape,
    Q,
    F,
    Up,
    Down,
    Left,
    Right,
    Num1,
    Num2,
    Num3,
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
    just_released: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if self.held.remove(&key) {
            self.just_released.insert(key);
        }
    }

    /// Replace the held set with `keys`, recording press/release edges for
    /// every key whose state changed. Used by replays, which describe whole
    /// keyboard snapshots rather than individual events.
    pub fn apply_snapshot(&mut self, keys: &[Key]) {
        let next: HashSet<Key> = keys.iter().copied().collect();
        let released: Vec<Key> = self.held.difference(&next).copied().collect();
        for key in released {
            self.key_up(key);
        }
        for key in next {
            self.key_down(key);
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        self.just_released.contains(&key)
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_down_sets_held_and_just_pressed() {
        let mut input = InputState::new();
        input.key_down(Key::A);
        assert!(input.is_held(Key::A));
        assert!(input.is_just_pressed(Key::A));
    }

    #[test]
    fn test_key_up_clears_held_sets_just_released() {
        let mut input = InputState::new();
        input.key_down(Key::D);
        input.key_up(Key::D);
        assert!(!input.is_held(Key::D));
        assert!(input.is_just_released(Key::D));
    }

    #[test]
    fn test_key_up_without_down_is_no_op() {
        let mut input = InputState::new();
        input.key_up(Key::Space);
        assert!(!input.is_just_released(Key::Space));
        assert!(!input.is_held(Key::Space));
    }

    #[test]
    fn test_end_frame_keeps_held_keys() {
        let mut input = InputState::new();
        input.key_down(Key::A);
        input.key_down(Key::LShift);
        input.end_frame();
        assert!(!input.is_just_pressed(Key::A));
        assert!(!input.is_just_pressed(Key::LShift));
        assert!(input.is_held(Key::A));
        assert!(input.is_held(Key::LShift));
    }

    #[test]
    fn test_snapshot_records_edges() {
        let mut input = InputState::new();
        input.apply_snapshot(&[Key::A, Key::Space]);
        assert!(input.is_just_pressed(Key::A));
        assert!(input.is_just_pressed(Key::Space));
        input.end_frame();

        input.apply_snapshot(&[Key::A]);
        assert!(input.is_held(Key::A));
        assert!(!input.is_just_pressed(Key::A));
        assert!(!input.is_held(Key::Space));
        assert!(input.is_just_released(Key::Space));
    }

    #[test]
    fn test_key_names_deserialize_snake_case() {
        let keys: Vec<Key> =
            serde_json::from_str(r#"["a", "l_shift", "num2", "escape"]"#).expect("parse keys");
        assert_eq!(keys, vec![Key::A, Key::LShift, Key::Num2, Key::Escape]);
    }
}

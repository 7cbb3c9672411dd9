//! Viewport controller: which part of the world is on screen.
//!
//! `position` is the top-left corner of the visible region in world pixels.
//! The visible region spans `viewport / zoom` world pixels, so zooming in
//! shows less of the map. Every update ends with a clamp to the map so the
//! renderer never draws outside the level.

use glam::Vec2;

/// Axis-aligned rectangle in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }
}

pub struct Camera2D {
    pub position: Vec2,
    zoom: f32,
    zoom_initial: f32,
    pub viewport: (u32, u32),
    /// When set, `follow` stops tracking its target and `pan` moves the camera.
    pub free: bool,
    /// Free-camera pan speed in world pixels per second.
    pub free_speed: f32,
}

impl Camera2D {
    /// `zoom` must be finite and positive; anything else falls back to 1.
    pub fn new(viewport_width: u32, viewport_height: u32, zoom: f32) -> Self {
        let zoom = if zoom.is_finite() && zoom > 0.0 {
            zoom
        } else {
            log::warn!("Rejected initial zoom {zoom}, using 1.0");
            1.0
        };
        Self {
            position: Vec2::ZERO,
            zoom,
            zoom_initial: zoom,
            viewport: (viewport_width, viewport_height),
            free: false,
            free_speed: 250.0,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn zoom_initial(&self) -> f32 {
        self.zoom_initial
    }

    /// Replace the zoom factor. Non-positive or non-finite values are rejected
    /// here so `follow` can divide by the zoom unconditionally.
    pub fn set_zoom(&mut self, zoom: f32) -> Result<(), String> {
        if !zoom.is_finite() || zoom <= 0.0 {
            return Err(format!("Invalid zoom {zoom}: must be finite and > 0"));
        }
        self.zoom = zoom;
        Ok(())
    }

    pub fn adjust_zoom(&mut self, delta: f32) -> Result<(), String> {
        self.set_zoom(self.zoom + delta)
    }

    pub fn reset_zoom(&mut self) {
        self.zoom = self.zoom_initial;
    }

    /// World-space size of the visible region at the current zoom.
    pub fn visible_size(&self) -> Vec2 {
        Vec2::new(self.viewport.0 as f32, self.viewport.1 as f32) / self.zoom
    }

    pub fn visible_rect(&self) -> Rect {
        let size = self.visible_size();
        Rect::new(self.position.x, self.position.y, size.x, size.y)
    }

    /// Center the view on a target of `target_size` at `target_pos` (its
    /// top-left corner), unless the free camera is active, then clamp.
    pub fn follow(&mut self, target_pos: Vec2, target_size: Vec2, map_size: Vec2) {
        if !self.free {
            self.position = target_pos - self.visible_size() / 2.0 + target_size / 2.0;
        }
        self.clamp_to_map(map_size);
    }

    /// Move the free camera by `direction * free_speed * dt`. No-op while the
    /// camera is tracking a target.
    pub fn pan(&mut self, direction: Vec2, dt: f32) {
        if self.free {
            self.position += direction * self.free_speed * dt;
        }
    }

    /// Keep the view inside `[0, map_size - visible_size]` per axis. When the
    /// map is smaller than the view the camera pins to 0.
    pub fn clamp_to_map(&mut self, map_size: Vec2) {
        let max = map_size - self.visible_size();
        self.position = self.position.min(max).max(Vec2::ZERO);
    }
}

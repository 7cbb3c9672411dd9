//! Draw requests handed to the rendering backend.
//!
//! The backend owns textures and the framebuffer; the simulation only says
//! which sprite-sheet cell to copy where, and whether to mirror it.

use glam::Vec2;

use crate::camera::Rect;

/// Source cell in a sprite sheet, in texture pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteRegion {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawRequest {
    pub src: SpriteRegion,
    /// Destination in screen pixels before zoom scaling.
    pub dst: Rect,
    pub flip_x: bool,
}

impl DrawRequest {
    /// Frames are laid out left to right; each character occupies the row
    /// starting at `frame_y_offset`.
    pub fn for_sprite(
        frame: u32,
        frame_y_offset: u32,
        size: Vec2,
        world_pos: Vec2,
        camera_pos: Vec2,
        flip_x: bool,
    ) -> Self {
        let w = size.x.max(0.0) as u32;
        let h = size.y.max(0.0) as u32;
        let screen = world_pos - camera_pos;
        Self {
            src: SpriteRegion {
                x: frame * w,
                y: frame_y_offset,
                w,
                h,
            },
            dst: Rect::new(screen.x, screen.y, size.x, size.y),
            flip_x,
        }
    }
}

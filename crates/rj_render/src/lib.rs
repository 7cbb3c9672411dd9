pub mod camera;
pub mod draw;

pub use camera::{Camera2D, Rect};
pub use draw::{DrawRequest, SpriteRegion};

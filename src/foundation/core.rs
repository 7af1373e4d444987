use crate::foundation::error::{VantageError, VantageResult};

pub use glam::{DMat4, DVec2, DVec3};

/// Device-pixel rectangle a canvas renders into.
///
/// Drives the outermost scale/offset of a drawable's transform stack; see
/// [`crate::TransformSystem::configure`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Left edge in device pixels.
    pub x: i32,
    /// Top edge in device pixels.
    pub y: i32,
    /// Width in device pixels, > 0.
    pub width: u32,
    /// Height in device pixels, > 0.
    pub height: u32,
}

impl Viewport {
    /// Validate and build a viewport rectangle.
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> VantageResult<Self> {
        if width == 0 || height == 0 {
            return Err(VantageError::validation("Viewport extent must be > 0"));
        }
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }
}

/// Logical canvas size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Logical width, > 0.
    pub width: u32,
    /// Logical height, > 0.
    pub height: u32,
}

impl Canvas {
    /// Validate and build a canvas size.
    pub fn new(width: u32, height: u32) -> VantageResult<Self> {
        if width == 0 || height == 0 {
            return Err(VantageError::validation("Canvas extent must be > 0"));
        }
        Ok(Self { width, height })
    }
}

//! Immediate-mode draw calls emitted by rings and elements.

use crate::geometry::{Point, Size};
use palette::Srgba;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum ImageId {
    RingBackground,
    RingCenter,
    Arrow,
    SelectionBackground,
    Icon(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawImage {
    pub image: ImageId,
    pub center: Point,
    pub size: Size,
    /// Radians, applied around `center`.
    pub rotation: f64,
    pub alpha: f64,
    pub tint: Srgba<f64>,
}

impl DrawImage {
    pub fn new(image: ImageId, center: Point, size: Size) -> Self {
        Self {
            image,
            center,
            size,
            rotation: 0.0,
            alpha: 1.0,
            tint: Srgba::new(1.0, 1.0, 1.0, 1.0),
        }
    }

    pub fn rotated(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn tinted(mut self, tint: Srgba<f64>) -> Self {
        self.tint = tint;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Centered,
    Left,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawText {
    pub text: String,
    pub position: Point,
    pub align: TextAlign,
    pub scale: f64,
    pub color: Srgba<f64>,
    pub outline: Srgba<f64>,
}

impl DrawText {
    pub fn centered(text: impl Into<String>, position: Point, scale: f64) -> Self {
        Self {
            text: text.into(),
            position,
            align: TextAlign::Centered,
            scale,
            color: Srgba::new(1.0, 1.0, 1.0, 1.0),
            outline: Srgba::new(0.0, 0.0, 0.0, 1.0),
        }
    }

    pub fn left(text: impl Into<String>, position: Point, scale: f64) -> Self {
        Self {
            align: TextAlign::Left,
            ..Self::centered(text, position, scale)
        }
    }
}

/// Host-provided drawing target. Calls arrive in painter's order.
pub trait DrawSurface {
    fn begin_layer(&mut self, _id: &str) {}
    fn end_layer(&mut self) {}
    fn image(&mut self, image: DrawImage);
    fn text(&mut self, text: DrawText);
}

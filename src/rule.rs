use crate::error::{Error, Result};
use image::RgbImage;
use std::fmt;

/// A single still image grabbed from the camera.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pixels: RgbImage,
}

impl Frame {
    pub fn new(pixels: RgbImage) -> Result<Self> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(Error::EmptyFrame);
        }
        Ok(Self { pixels })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    pub fn to_color_image(&self) -> egui::ColorImage {
        let size = [self.width() as usize, self.height() as usize];
        egui::ColorImage::from_rgb(size, self.pixels().as_raw())
    }
}

// Image pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<egui::Pos2> for Point {
    fn from(pos: egui::Pos2) -> Self {
        Self::new(pos.x, pos.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?}, {:?})", self.x, self.y)
    }
}

/// Top and bottom ends of the ruler, with `top.y <= bottom.y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleRect {
    top: Point,
    bottom: Point,
}

impl RuleRect {
    /// Builds the pair from two clicks in input order. The clicks are swapped
    /// when the second one lies above the first.
    pub fn from_clicks(first: Point, second: Point) -> Self {
        let (mut top, mut bottom) = (first, second);
        if bottom.y < top.y {
            std::mem::swap(&mut top, &mut bottom);
        }
        Self { top, bottom }
    }

    pub fn top(&self) -> Point {
        self.top
    }

    pub fn bottom(&self) -> Point {
        self.bottom
    }
}

impl fmt::Display for RuleRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "top: {}, bottom: {}", self.top, self.bottom)
    }
}

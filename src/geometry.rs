//! Shared geometric and color primitives used across canvas and editor modules.

/// A pixel coordinate in image space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImagePoint {
    pub x: i32,
    pub y: i32,
}

impl ImagePoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Width/height offsets measured from an anchor point. Either component may
/// be negative while a drag moves up or left of its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Extent {
    pub width: i32,
    pub height: i32,
}

impl Extent {
    pub const ZERO: Self = Self::new(0, 0);

    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub const fn is_positive(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageBounds {
    pub width: u32,
    pub height: u32,
}

impl ImageBounds {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Splits a packed `0xRRGGBB` value into channels.
    pub const fn from_packed_rgb(packed: u32) -> Self {
        Self {
            r: ((packed >> 16) & 0xFF) as u8,
            g: ((packed >> 8) & 0xFF) as u8,
            b: (packed & 0xFF) as u8,
        }
    }

    pub const fn rgb(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    pub const fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, 255])
    }
}

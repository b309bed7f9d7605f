//! Canvas buffer: the working raster plus its reset and crop backups.

pub mod brush;
mod raster;

use image::RgbaImage;
use thiserror::Error;

use crate::geometry::{Color, Extent, ImageBounds, ImagePoint};

pub use brush::{Brush, BRUSH_DIAMETER_SCALE, CROP_OUTLINE_WIDTH, MIN_BRUSH_SIZE};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CanvasError {
    #[error("invalid crop region {width}x{height} at ({x}, {y})")]
    InvalidRegion {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
}

pub type CanvasResult<T> = std::result::Result<T, CanvasError>;

/// Whether the display layer has to redraw after a buffer operation.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repaint {
    Needed,
    NotNeeded,
}

impl Repaint {
    pub const fn is_needed(self) -> bool {
        matches!(self, Self::Needed)
    }
}

/// Drawing context bound to one raster instance. It only lives as long as the
/// borrow of that raster, so replacing the raster invalidates it.
struct DrawSurface<'a> {
    target: &'a mut RgbaImage,
    color: Color,
}

impl DrawSurface<'_> {
    fn fill_ellipse(&mut self, center: ImagePoint, diameter: u32) {
        raster::fill_ellipse(self.target, center, diameter, self.color);
    }

    fn fill_segment(&mut self, from: ImagePoint, to: ImagePoint, diameter: u32) {
        raster::fill_segment(self.target, from, to, diameter, self.color);
    }

    fn stroke_rect(&mut self, origin: ImagePoint, extent: Extent, stroke_width: u32) {
        raster::stroke_rect(self.target, origin, extent, stroke_width, self.color);
    }
}

#[derive(Debug, Clone)]
pub struct CanvasBuffer {
    bitmap: RgbaImage,
    reset_backup: RgbaImage,
    crop_backup: Option<RgbaImage>,
    color: Color,
    revision: u64,
}

impl CanvasBuffer {
    pub fn new(bitmap: RgbaImage) -> Self {
        let reset_backup = bitmap.clone();
        Self {
            bitmap,
            reset_backup,
            crop_backup: None,
            color: Color::BLACK,
            revision: 0,
        }
    }

    pub fn bitmap(&self) -> &RgbaImage {
        &self.bitmap
    }

    pub fn reset_backup(&self) -> &RgbaImage {
        &self.reset_backup
    }

    pub fn crop_backup(&self) -> Option<&RgbaImage> {
        self.crop_backup.as_ref()
    }

    pub fn bounds(&self) -> ImageBounds {
        ImageBounds::new(self.bitmap.width(), self.bitmap.height())
    }

    /// Incremented by every operation that changes the visible raster.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn surface(&mut self) -> DrawSurface<'_> {
        DrawSurface {
            target: &mut self.bitmap,
            color: self.color,
        }
    }

    fn replace_bitmap(&mut self, bitmap: RgbaImage) -> Repaint {
        self.bitmap = bitmap;
        self.touch()
    }

    fn touch(&mut self) -> Repaint {
        self.revision = self.revision.wrapping_add(1);
        Repaint::Needed
    }

    pub fn paint_dot(&mut self, center: ImagePoint, color: Color, diameter: u32) -> Repaint {
        self.set_color(color);
        self.surface().fill_ellipse(center, diameter);
        self.touch()
    }

    /// Paints a continuous line of dots from `from` to `to`.
    pub fn paint_segment(
        &mut self,
        from: ImagePoint,
        to: ImagePoint,
        color: Color,
        diameter: u32,
    ) -> Repaint {
        self.set_color(color);
        self.surface().fill_segment(from, to, diameter);
        self.touch()
    }

    /// Restores the raster captured at creation (or at the last crop).
    pub fn reset(&mut self) -> Repaint {
        let fresh = self.reset_backup.clone();
        self.replace_bitmap(fresh)
    }

    pub fn begin_crop(&mut self) {
        self.crop_backup = Some(self.bitmap.clone());
    }

    pub fn is_cropping(&self) -> bool {
        self.crop_backup.is_some()
    }

    pub fn preview_crop_rect(&mut self, origin: ImagePoint, extent: Extent) -> Repaint {
        self.preview_crop_rect_with_stroke(origin, extent, CROP_OUTLINE_WIDTH)
    }

    /// Repaints from the crop backup, then outlines the candidate region in
    /// the current color. Starts a crop if none is in progress.
    pub fn preview_crop_rect_with_stroke(
        &mut self,
        origin: ImagePoint,
        extent: Extent,
        stroke_width: u32,
    ) -> Repaint {
        if self.crop_backup.is_none() {
            self.begin_crop();
        }
        let restored = self
            .crop_backup
            .clone()
            .unwrap_or_else(|| self.bitmap.clone());
        let repaint = self.replace_bitmap(restored);
        self.surface().stroke_rect(origin, extent, stroke_width);
        repaint
    }

    /// Cuts the region out of the crop backup, never out of the preview
    /// decorated bitmap. The result becomes the new reset baseline.
    pub fn commit_crop(&mut self, origin: ImagePoint, extent: Extent) -> CanvasResult<Repaint> {
        let invalid = CanvasError::InvalidRegion {
            x: origin.x,
            y: origin.y,
            width: extent.width,
            height: extent.height,
        };
        let source = self.crop_backup.as_ref().unwrap_or(&self.bitmap);
        let cropped = raster::copy_region(source, origin, extent).ok_or(invalid)?;

        self.reset_backup = cropped.clone();
        self.crop_backup = None;
        Ok(self.replace_bitmap(cropped))
    }

    /// Drops an in-progress crop, restoring the pre-crop raster.
    pub fn cancel_crop(&mut self) -> Repaint {
        match self.crop_backup.take() {
            Some(backup) => self.replace_bitmap(backup),
            None => Repaint::NotNeeded,
        }
    }
}

use crate::geometry::{ImageBounds, ImagePoint};

/// Maps pointer positions in the displayed canvas onto raster pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayScale {
    display_width: f64,
    display_height: f64,
    ratio_x: f64,
    ratio_y: f64,
}

impl Default for DisplayScale {
    fn default() -> Self {
        Self {
            display_width: 0.0,
            display_height: 0.0,
            ratio_x: 1.0,
            ratio_y: 1.0,
        }
    }
}

impl DisplayScale {
    pub fn new(bitmap: ImageBounds, display_width: f64, display_height: f64) -> Self {
        let mut scale = Self::default();
        scale.update(bitmap, display_width, display_height);
        scale
    }

    pub fn ratio_x(&self) -> f64 {
        self.ratio_x
    }

    pub fn ratio_y(&self) -> f64 {
        self.ratio_y
    }

    pub fn display_size(&self) -> (f64, f64) {
        (self.display_width, self.display_height)
    }

    /// Recomputes the ratios after a layout change. Degenerate display sizes
    /// keep the previous ratios.
    pub fn update(&mut self, bitmap: ImageBounds, display_width: f64, display_height: f64) {
        if !(display_width > 0.0 && display_height > 0.0) {
            return;
        }
        self.display_width = display_width;
        self.display_height = display_height;
        self.rebind(bitmap);
    }

    /// Recomputes the ratios for a new raster shown at the same display size.
    pub fn rebind(&mut self, bitmap: ImageBounds) {
        if self.display_width <= 0.0 || self.display_height <= 0.0 {
            return;
        }
        self.ratio_x = f64::from(bitmap.width) / self.display_width;
        self.ratio_y = f64::from(bitmap.height) / self.display_height;
    }

    /// Clamps to the displayed area before scaling, so drags that leave the
    /// widget stay inside the raster.
    pub fn to_image(&self, x: f64, y: f64) -> ImagePoint {
        let x = clamp_axis(x, self.display_width);
        let y = clamp_axis(y, self.display_height);
        ImagePoint::new((x * self.ratio_x) as i32, (y * self.ratio_y) as i32)
    }
}

fn clamp_axis(value: f64, limit: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    if limit > 0.0 {
        value.clamp(0.0, limit)
    } else {
        value.max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_display_point_into_image_space() {
        let scale = DisplayScale::new(ImageBounds::new(200, 200), 100.0, 100.0);
        assert_eq!(scale.to_image(10.0, 10.0), ImagePoint::new(20, 20));
        assert_eq!(scale.ratio_x(), 2.0);
    }

    #[test]
    fn independent_axis_ratios() {
        let scale = DisplayScale::new(ImageBounds::new(1920, 1080), 960.0, 270.0);
        assert_eq!(scale.to_image(480.0, 135.0), ImagePoint::new(960, 540));
    }

    #[test]
    fn clamps_points_outside_the_widget() {
        let scale = DisplayScale::new(ImageBounds::new(300, 150), 100.0, 50.0);
        assert_eq!(scale.to_image(-20.0, 400.0), ImagePoint::new(0, 150));
        assert_eq!(scale.to_image(f64::NAN, 10.0), ImagePoint::new(0, 30));
    }

    #[test]
    fn mapped_points_stay_within_bitmap_bounds() {
        let bitmap = ImageBounds::new(333, 217);
        let scale = DisplayScale::new(bitmap, 123.0, 77.0);
        let mut x = 0.0;
        while x <= 123.0 {
            let mut y = 0.0;
            while y <= 77.0 {
                let point = scale.to_image(x, y);
                assert!(point.x >= 0 && point.x <= bitmap.width as i32);
                assert!(point.y >= 0 && point.y <= bitmap.height as i32);
                y += 3.5;
            }
            x += 2.5;
        }
    }

    #[test]
    fn degenerate_layout_keeps_previous_ratios() {
        let mut scale = DisplayScale::new(ImageBounds::new(200, 100), 100.0, 50.0);
        scale.update(ImageBounds::new(200, 100), 0.0, 50.0);
        assert_eq!(scale.display_size(), (100.0, 50.0));
        assert_eq!(scale.ratio_y(), 2.0);
    }
}

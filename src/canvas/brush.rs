use crate::geometry::Color;

/// Smallest brush size factor the size slider may produce.
pub const MIN_BRUSH_SIZE: f32 = 0.25;
/// Dot diameter in pixels for a size factor of 1.0.
pub const BRUSH_DIAMETER_SCALE: f32 = 100.0;
/// Outline width of the crop rectangle preview.
pub const CROP_OUTLINE_WIDTH: u32 = 10;

const MAX_PACKED_RGB: f32 = 16_777_215.0;

/// Brush color and size, both driven by 0..1 slider values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brush {
    color_value: f32,
    size: f32,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            color_value: 0.0,
            size: MIN_BRUSH_SIZE,
        }
    }
}

impl Brush {
    pub fn new(color_value: f32, size: f32) -> Self {
        let mut brush = Self::default();
        brush.set_color_value(color_value);
        brush.set_size(size);
        brush
    }

    pub fn color_value(&self) -> f32 {
        self.color_value
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn set_color_value(&mut self, value: f32) {
        self.color_value = sanitize_unit(value, 0.0);
    }

    /// Values below [`MIN_BRUSH_SIZE`] are raised to it.
    pub fn set_size(&mut self, value: f32) {
        self.size = sanitize_unit(value, MIN_BRUSH_SIZE).max(MIN_BRUSH_SIZE);
    }

    /// Maps the color slider onto the full 24-bit RGB integer range.
    pub fn color(&self) -> Color {
        Color::from_packed_rgb((self.color_value * MAX_PACKED_RGB) as u32)
    }

    pub fn diameter(&self) -> u32 {
        (self.size * BRUSH_DIAMETER_SCALE) as u32
    }
}

fn sanitize_unit(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_brush_is_black_at_minimum_size() {
        let brush = Brush::default();
        assert_eq!(brush.color(), Color::BLACK);
        assert_eq!(brush.diameter(), 25);
    }

    #[test]
    fn size_is_floored_at_minimum() {
        let mut brush = Brush::default();
        brush.set_size(0.1);
        assert_eq!(brush.size(), MIN_BRUSH_SIZE);
        brush.set_size(0.5);
        assert_eq!(brush.diameter(), 50);
        brush.set_size(3.0);
        assert_eq!(brush.diameter(), 100);
    }

    #[test]
    fn color_slider_spans_packed_rgb_range() {
        let mut brush = Brush::default();
        brush.set_color_value(1.0);
        assert_eq!(brush.color(), Color::new(255, 255, 255));
        brush.set_color_value(0.5);
        let (r, _, _) = brush.color().rgb();
        assert_eq!(r, 0x7F);
    }

    #[test]
    fn non_finite_slider_values_fall_back() {
        let brush = Brush::new(f32::NAN, f32::INFINITY);
        assert_eq!(brush.color_value(), 0.0);
        assert_eq!(brush.size(), MIN_BRUSH_SIZE);
    }
}

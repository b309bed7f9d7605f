//! Raster primitives over `RgbaImage`. Everything clips to the image bounds.

use image::{imageops, RgbaImage};

use crate::geometry::{Color, Extent, ImagePoint};

/// Fills a disc of `diameter` pixels centered on `center`.
pub(super) fn fill_ellipse(image: &mut RgbaImage, center: ImagePoint, diameter: u32, color: Color) {
    if diameter == 0 {
        return;
    }
    let radius = f64::from(diameter) / 2.0;
    let reach = radius.floor() as i32;
    let radius_sq = radius * radius;
    let pixel = color.to_rgba();

    let (left, right) = clip_span(center.x - reach, center.x + reach + 1, image.width());
    let (top, bottom) = clip_span(center.y - reach, center.y + reach + 1, image.height());

    for y in top..bottom {
        let dy = f64::from(y as i32 - center.y);
        for x in left..right {
            let dx = f64::from(x as i32 - center.x);
            if dx * dx + dy * dy <= radius_sq {
                image.put_pixel(x, y, pixel);
            }
        }
    }
}

/// Stamps discs along the segment so a fast drag leaves a continuous line.
pub(super) fn fill_segment(
    image: &mut RgbaImage,
    from: ImagePoint,
    to: ImagePoint,
    diameter: u32,
    color: Color,
) {
    let dx = f64::from(to.x - from.x);
    let dy = f64::from(to.y - from.y);
    let length = (dx * dx + dy * dy).sqrt();
    let spacing = (f64::from(diameter) / 4.0).max(1.0);
    let steps = (length / spacing).ceil() as i32;
    if steps <= 0 {
        fill_ellipse(image, to, diameter, color);
        return;
    }
    for step in 0..=steps {
        let t = f64::from(step) / f64::from(steps);
        let point = ImagePoint::new(
            from.x + (dx * t).round() as i32,
            from.y + (dy * t).round() as i32,
        );
        fill_ellipse(image, point, diameter, color);
    }
}

/// Draws the outline of the rectangle at `origin` spanning `extent`, with the
/// stroke centered on the rectangle edge.
pub(super) fn stroke_rect(
    image: &mut RgbaImage,
    origin: ImagePoint,
    extent: Extent,
    stroke_width: u32,
    color: Color,
) {
    if !extent.is_positive() || stroke_width == 0 {
        return;
    }
    let stroke = stroke_width as i32;
    let inset = stroke / 2;
    let outset = stroke - inset;

    let outer_left = origin.x - inset;
    let outer_top = origin.y - inset;
    let outer_right = origin.x + extent.width + outset;
    let outer_bottom = origin.y + extent.height + outset;
    let inner_left = origin.x + outset;
    let inner_top = origin.y + outset;
    let inner_right = origin.x + extent.width - inset;
    let inner_bottom = origin.y + extent.height - inset;

    let (left, right) = clip_span(outer_left, outer_right, image.width());
    let (top, bottom) = clip_span(outer_top, outer_bottom, image.height());
    let pixel = color.to_rgba();

    for y in top..bottom {
        let yi = y as i32;
        let inside_rows = yi >= inner_top && yi < inner_bottom;
        for x in left..right {
            let xi = x as i32;
            if inside_rows && xi >= inner_left && xi < inner_right {
                continue;
            }
            image.put_pixel(x, y, pixel);
        }
    }
}

/// Copies the part of `origin`/`extent` that lies inside `source`.
/// Returns `None` when the intersection is empty.
pub(super) fn copy_region(
    source: &RgbaImage,
    origin: ImagePoint,
    extent: Extent,
) -> Option<RgbaImage> {
    if !extent.is_positive() {
        return None;
    }
    let (left, right) = clip_span(origin.x, origin.x.saturating_add(extent.width), source.width());
    let (top, bottom) = clip_span(
        origin.y,
        origin.y.saturating_add(extent.height),
        source.height(),
    );
    if left >= right || top >= bottom {
        return None;
    }
    Some(imageops::crop_imm(source, left, top, right - left, bottom - top).to_image())
}

fn clip_span(start: i32, end: i32, limit: u32) -> (u32, u32) {
    let limit = i64::from(limit);
    let start = i64::from(start).clamp(0, limit) as u32;
    let end = i64::from(end).clamp(0, limit) as u32;
    (start, end.max(start))
}

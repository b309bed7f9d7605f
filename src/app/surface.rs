use gtk4::cairo::{Format, ImageSurface};
use image::{Rgba, RgbaImage};

/// Packs a straight-alpha pixel into cairo's premultiplied ARGB32 word.
fn premultiplied_argb(pixel: Rgba<u8>) -> u32 {
    let [r, g, b, a] = pixel.0;
    let premultiply = |channel: u8| -> u32 {
        match a {
            0 => 0,
            255 => u32::from(channel),
            _ => (u32::from(channel) * u32::from(a) + 127) / 255,
        }
    };
    (u32::from(a) << 24) | (premultiply(r) << 16) | (premultiply(g) << 8) | premultiply(b)
}

pub(super) fn rgba_image_to_cairo_surface(image: &RgbaImage) -> Option<ImageSurface> {
    let width = i32::try_from(image.width()).ok()?;
    let height = i32::try_from(image.height()).ok()?;
    let mut surface = ImageSurface::create(Format::ARgb32, width, height).ok()?;
    let stride = usize::try_from(surface.stride()).ok()?;
    let row_len = usize::try_from(image.width()).ok()?.checked_mul(4)?;

    {
        let mut data = surface.data().ok()?;
        for (row_index, row) in image.rows().enumerate() {
            let offset = row_index.checked_mul(stride)?;
            let dst_row = data.get_mut(offset..offset.checked_add(row_len)?)?;
            for (pixel, dst) in row.zip(dst_row.chunks_exact_mut(4)) {
                dst.copy_from_slice(&premultiplied_argb(*pixel).to_ne_bytes());
            }
        }
    }

    surface.flush();
    Some(surface)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_pixels_keep_their_channels() {
        assert_eq!(premultiplied_argb(Rgba([0x12, 0x34, 0x56, 255])), 0xFF12_3456);
    }

    #[test]
    fn translucent_pixels_are_premultiplied() {
        assert_eq!(premultiplied_argb(Rgba([255, 0, 100, 128])), 0x8080_0032);
        assert_eq!(premultiplied_argb(Rgba([255, 255, 255, 0])), 0);
    }

    #[test]
    fn surface_matches_image_dimensions_and_pixels() {
        let mut image = RgbaImage::from_pixel(3, 2, Rgba([0, 0, 0, 255]));
        image.put_pixel(2, 1, Rgba([10, 20, 30, 255]));

        let mut surface = rgba_image_to_cairo_surface(&image).expect("surface");
        assert_eq!((surface.width(), surface.height()), (3, 2));

        let stride = usize::try_from(surface.stride()).expect("stride");
        let data = surface.data().expect("surface data");
        let offset = stride + 2 * 4;
        let word = u32::from_ne_bytes([
            data[offset],
            data[offset + 1],
            data[offset + 2],
            data[offset + 3],
        ]);
        assert_eq!(word, 0xFF0A_141E);
    }
}

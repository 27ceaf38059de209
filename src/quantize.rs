use crate::color::Color;
use crate::image_buffer::ImageBuffer;
use crate::iter_utils::min_by_key_partial;

/// The palette entry closest to `color`, the earliest one on ties. When no
/// distance compares (NaN input), the first entry is kept.
pub fn nearest(palette: &[Color], color: Color) -> Option<Color> {
    min_by_key_partial(palette.iter(), |c| c.distance_squared(color)).copied()
}

/// Replaces every pixel with its nearest palette color. An empty palette
/// maps everything to black.
pub fn quantize(image: &ImageBuffer, palette: &[Color]) -> ImageBuffer {
    let pixels = image.pixels().iter()
        .map(|px| nearest(palette, *px).unwrap_or(Color::BLACK))
        .collect();
    ImageBuffer::from_pixels(image.width(), image.height(), pixels)
}

/// Root-mean-square color distance between two images of equal size.
///
/// # Panics
///
/// If the dimensions differ.
pub fn rmse(a: &ImageBuffer, b: &ImageBuffer) -> f32 {
    assert!(a.width() == b.width() && a.height() == b.height(),
        "cannot compare {}x{} with {}x{}", a.width(), a.height(), b.width(), b.height());
    let count = a.pixels().len();
    if count == 0 {
        return 0.0;
    }
    let sum: f64 = a.pixels().iter().zip(b.pixels())
        .map(|(p, q)| p.distance_squared(*q) as f64)
        .sum();
    (sum / count as f64).sqrt() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_go_to_the_first_entry() {
        let palette = [Color::new(0.0, 0.0, 0.0), Color::new(1.0, 0.0, 0.0)];
        let mid = Color::new(0.5, 0.0, 0.0);
        assert_eq!(nearest(&palette, mid), Some(palette[0]));
        let flipped = [palette[1], palette[0]];
        assert_eq!(nearest(&flipped, mid), Some(palette[1]));
    }

    #[test]
    fn nan_pixel_maps_to_first_entry() {
        let palette = [Color::new(0.2, 0.2, 0.2), Color::WHITE];
        let nan = Color::new(f32::NAN, 0.0, 0.0);
        assert_eq!(nearest(&palette, nan), Some(palette[0]));
        let out = quantize(&ImageBuffer::from_pixels(1, 1, vec![nan]), &palette);
        assert_eq!(out.get(0, 0), palette[0]);
    }

    #[test]
    fn empty_palette_paints_black() {
        let img = ImageBuffer::from_pixels(2, 1, vec![Color::WHITE, Color::new(0.3, 0.6, 0.9)]);
        let out = quantize(&img, &[]);
        assert_eq!(out, ImageBuffer::new(2, 1));
    }

    #[test]
    fn rmse_of_known_difference() {
        let a = ImageBuffer::from_pixels(2, 1, vec![Color::BLACK, Color::BLACK]);
        let b = ImageBuffer::from_pixels(2, 1, vec![Color::new(0.0, 0.0, 1.0), Color::BLACK]);
        // sqrt((1 + 0) / 2)
        assert!((rmse(&a, &b) - 0.5f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn rmse_of_empty_images_is_zero() {
        assert_eq!(rmse(&ImageBuffer::new(0, 3), &ImageBuffer::new(0, 3)), 0.0);
    }

    #[test]
    #[should_panic]
    fn rmse_rejects_mismatched_sizes() {
        rmse(&ImageBuffer::new(2, 1), &ImageBuffer::new(1, 2));
    }
}

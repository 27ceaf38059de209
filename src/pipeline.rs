use tracing::info;

use crate::image_buffer::ImageBuffer;
use crate::palette::{Palette, PaletteGenerator};
use crate::quantize::{quantize, rmse};

/// Result of a posterization run.
#[derive(Debug, Clone)]
pub struct Posterized {
    pub palette: Palette,
    pub image: ImageBuffer,
    pub rmse: f32,
}

/// Builds a palette, maps the image onto it and scores the result.
pub fn posterize(image: &ImageBuffer, generator: &dyn PaletteGenerator, requested: usize)
        -> Posterized {
    info!(requested, "computing color quantization");
    let palette = generator.generate(image, requested);

    info!(colors = palette.len(), "quantizing image");
    let quantized = quantize(image, &palette);

    let rmse = rmse(image, &quantized);
    Posterized { palette, image: quantized, rmse }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::palette::Trivial;

    #[test]
    fn black_and_white_image_is_reproduced_exactly() {
        let img = ImageBuffer::from_pixels(2, 2,
            vec![Color::BLACK, Color::WHITE, Color::WHITE, Color::BLACK]);
        let result = posterize(&img, &Trivial, 2);
        assert_eq!(result.palette, vec![Color::BLACK, Color::WHITE]);
        assert_eq!(result.image, img);
        assert_eq!(result.rmse, 0.0);
    }
}

use crate::color::Color;
use crate::image_buffer::ImageBuffer;
use crate::kmeans::KMeans;
use crate::median_cut::MedianCut;

/// Colors an image is posterized to. The order only settles ties.
pub type Palette = Vec<Color>;

/// Derives a palette of (about) `requested` colors from an image.
pub trait PaletteGenerator {
    fn generate(&self, image: &ImageBuffer, requested: usize) -> Palette;
}

/// Samples the image's color bounding box on a uniform `quant`^3 grid.
#[derive(Debug, Clone, Copy, Default)]
pub struct Trivial;

/// Selectable non-trivial generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Method {
    #[default]
    Kmeans,
    MedianCut,
}

impl Method {
    pub fn generator(self) -> Box<dyn PaletteGenerator> {
        match self {
            Method::Kmeans => Box::new(KMeans::default()),
            Method::MedianCut => Box::new(MedianCut),
        }
    }
}

/// Largest `quant` with `quant^3 <= requested`; 0 when `requested` is 0.
pub fn cube_side(requested: usize) -> usize {
    let cube = |q: usize| q.checked_mul(q).and_then(|qq| qq.checked_mul(q));
    let mut quant = 1;
    while cube(quant).map_or(false, |c| c <= requested) {
        quant += 1;
    }
    quant - 1
}

/// Per-channel `(min, max)` over all pixels, or `None` for an empty image.
pub fn bounding_box(image: &ImageBuffer) -> Option<(Color, Color)> {
    let mut pixels = image.pixels().iter();
    let first = *pixels.next()?;
    Some(pixels.fold((first, first), |(lo, hi), &px| (lo.min(px), hi.max(px))))
}

fn cube_step(lo: f32, hi: f32, i: usize, quant: usize) -> f32 {
    if quant < 2 {
        return lo;
    }
    lo + (hi - lo) * i as f32 / (quant - 1) as f32
}

impl PaletteGenerator for Trivial {
    fn generate(&self, image: &ImageBuffer, requested: usize) -> Palette {
        // Too few colors for a cube: plain black and white.
        if requested < 8 {
            return vec![Color::BLACK, Color::WHITE];
        }

        let (bmin, bmax) = bounding_box(image).unwrap_or((Color::BLACK, Color::WHITE));
        let quant = cube_side(requested);

        let mut colors = Vec::with_capacity(quant * quant * quant);
        for r in 0..quant {
            for g in 0..quant {
                for b in 0..quant {
                    colors.push(Color::new(
                        cube_step(bmin.x, bmax.x, r, quant),
                        cube_step(bmin.y, bmax.y, g, quant),
                        cube_step(bmin.z, bmax.z, b, quant)));
                }
            }
        }
        colors
    }
}

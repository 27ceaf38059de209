//! Posterizes images to a small palette and measures how much was lost.
//!
//! The pipeline is: load an [`ImageBuffer`], derive a palette with a
//! [`PaletteGenerator`], replace each pixel with its nearest palette color
//! ([`quantize()`]) and score the result with [`rmse()`].

pub mod color;
pub mod encoding;
pub mod error;
pub mod image_buffer;
mod iter_utils;
pub mod kmeans;
pub mod median_cut;
pub mod palette;
pub mod pipeline;
pub mod quantize;

pub use color::Color;
pub use encoding::Transfer;
pub use error::CodecError;
pub use image_buffer::ImageBuffer;
pub use kmeans::KMeans;
pub use median_cut::MedianCut;
pub use palette::{Method, Palette, PaletteGenerator, Trivial};
pub use pipeline::{posterize, Posterized};
pub use quantize::{nearest, quantize, rmse};

use thiserror::Error;

/// Failures while reading or writing image files.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("expected magic `P6`, found {0:?}")]
    BadMagic(String),

    #[error("cannot parse image dimensions from {0:?}")]
    BadDimensions(String),

    #[error("only 8-bit images (max value 255) are supported, found {0:?}")]
    UnsupportedMaxValue(String),

    #[error("pixel data truncated: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("image {width}x{height} does not fit the format's 16-bit dimensions")]
    TooLarge { width: usize, height: usize },

    #[error("decode error: {0}")]
    Decode(#[from] image::ImageError),
}

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::color::Color;
use crate::encoding::Transfer;
use crate::error::CodecError;

const TGA_HEADER_LEN: usize = 18;

/// A `width` x `height` grid of colors stored row-major, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Creates an all-black image.
    pub fn new(width: usize, height: usize) -> Self {
        ImageBuffer {
            width,
            height,
            pixels: vec![Color::BLACK; width * height],
        }
    }

    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Color>) -> Self {
        assert_eq!(pixels.len(), width * height,
            "pixel count does not match {}x{}", width, height);
        ImageBuffer { width, height, pixels }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    fn index(&self, x: usize, y: usize) -> usize {
        assert!(x < self.width && y < self.height,
            "pixel ({}, {}) outside {}x{} image", x, y, self.width, self.height);
        x + y * self.width
    }

    /// Panics if `(x, y)` lies outside the image.
    pub fn get(&self, x: usize, y: usize) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Panics if `(x, y)` lies outside the image.
    pub fn set(&mut self, x: usize, y: usize, c: Color) {
        let i = self.index(x, y);
        self.pixels[i] = c;
    }

    // Codecs

    /// Loads a PPM file, or any format the `image` crate understands when
    /// the extension is not `.ppm`.
    pub fn open<P: AsRef<Path>>(path: P, transfer: Transfer)
            -> Result<ImageBuffer, CodecError> {
        let path = path.as_ref();
        if has_extension(path, "ppm") {
            return ImageBuffer::read_ppm(path, transfer);
        }

        let rgb = image::open(path)?.to_rgb8();
        let pixels = rgb.pixels()
            .map(|px| Color::new(
                transfer.decode(px[0]),
                transfer.decode(px[1]),
                transfer.decode(px[2])))
            .collect::<Vec<_>>();
        Ok(ImageBuffer::from_pixels(rgb.width() as usize, rgb.height() as usize, pixels))
    }

    /// Writes TGA when the extension is `.tga`, PPM otherwise.
    pub fn save<P: AsRef<Path>>(&self, path: P, transfer: Transfer)
            -> Result<(), CodecError> {
        let path = path.as_ref();
        if has_extension(path, "tga") {
            self.write_tga(path, transfer)
        } else {
            self.write_ppm(path, transfer)
        }
    }

    pub fn read_ppm<P: AsRef<Path>>(path: P, transfer: Transfer)
            -> Result<ImageBuffer, CodecError> {
        let file = File::open(path)?;
        ImageBuffer::decode_ppm(BufReader::new(file), transfer)
    }

    /// Parses a binary `P6` stream. Nothing is returned unless the whole
    /// image was read.
    pub fn decode_ppm<R: BufRead>(mut reader: R, transfer: Transfer)
            -> Result<ImageBuffer, CodecError> {
        let magic = read_line(&mut reader)?;
        if magic != "P6" {
            return Err(CodecError::BadMagic(magic));
        }

        let mut line = read_line(&mut reader)?;
        while line.starts_with('#') {
            line = read_line(&mut reader)?;
        }
        let (width, height) = parse_dimensions(&line)
            .ok_or_else(|| CodecError::BadDimensions(line.clone()))?;

        let max_value = read_line(&mut reader)?;
        if max_value != "255" {
            return Err(CodecError::UnsupportedMaxValue(max_value));
        }

        let expected = width.checked_mul(height)
            .and_then(|n| n.checked_mul(3))
            .ok_or_else(|| CodecError::BadDimensions(line.clone()))?;
        let mut data = Vec::new();
        reader.by_ref().take(expected as u64).read_to_end(&mut data)?;
        if data.len() < expected {
            return Err(CodecError::Truncated { expected, actual: data.len() });
        }

        let pixels = data.chunks_exact(3)
            .map(|px| Color::new(
                transfer.decode(px[0]),
                transfer.decode(px[1]),
                transfer.decode(px[2])))
            .collect::<Vec<_>>();
        Ok(ImageBuffer::from_pixels(width, height, pixels))
    }

    pub fn write_ppm<P: AsRef<Path>>(&self, path: P, transfer: Transfer)
            -> Result<(), CodecError> {
        let mut out = BufWriter::new(File::create(path)?);
        self.encode_ppm(&mut out, transfer)?;
        out.flush()?;
        Ok(())
    }

    pub fn encode_ppm<W: Write>(&self, out: &mut W, transfer: Transfer)
            -> Result<(), CodecError> {
        write!(out, "P6\n{} {}\n255\n", self.width, self.height)?;
        self.write_scanlines(out, |c| [
            transfer.encode(c.x),
            transfer.encode(c.y),
            transfer.encode(c.z),
        ])
    }

    pub fn write_tga<P: AsRef<Path>>(&self, path: P, transfer: Transfer)
            -> Result<(), CodecError> {
        // Checked before the file is created so an oversized image leaves
        // nothing behind.
        self.tga_header()?;
        let mut out = BufWriter::new(File::create(path)?);
        self.encode_tga(&mut out, transfer)?;
        out.flush()?;
        Ok(())
    }

    /// Uncompressed 24-bit TGA, top-down, BGR sample order.
    pub fn encode_tga<W: Write>(&self, out: &mut W, transfer: Transfer)
            -> Result<(), CodecError> {
        out.write_all(&self.tga_header()?)?;
        self.write_scanlines(out, |c| [
            transfer.encode(c.z),
            transfer.encode(c.y),
            transfer.encode(c.x),
        ])
    }

    fn tga_header(&self) -> Result<[u8; TGA_HEADER_LEN], CodecError> {
        let too_large = || CodecError::TooLarge { width: self.width, height: self.height };
        let width = u16::try_from(self.width).map_err(|_| too_large())?;
        let height = u16::try_from(self.height).map_err(|_| too_large())?;

        let mut header = [0u8; TGA_HEADER_LEN];
        header[2] = 3; // image type
        header[12..14].copy_from_slice(&width.to_le_bytes());
        header[14..16].copy_from_slice(&height.to_le_bytes());
        header[16] = 24; // bits per pixel
        header[17] = 0x20; // top-down, non-interlaced
        Ok(header)
    }

    fn write_scanlines<W, F>(&self, out: &mut W, mut to_bytes: F)
            -> Result<(), CodecError>
            where W: Write, F: FnMut(Color) -> [u8; 3] {
        if self.width == 0 {
            return Ok(());
        }
        let mut buffer = Vec::with_capacity(self.width * 3);
        for row in self.pixels.chunks_exact(self.width) {
            buffer.clear();
            for px in row {
                buffer.extend_from_slice(&to_bytes(*px));
            }
            out.write_all(&buffer)?;
        }
        Ok(())
    }
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e.eq_ignore_ascii_case(ext))
}

// Reads up to the next '\n' (or EOF), without the terminator.
fn read_line<R: BufRead>(reader: &mut R) -> Result<String, CodecError> {
    let mut line = Vec::new();
    reader.read_until(b'\n', &mut line)?;
    if line.last() == Some(&b'\n') {
        line.pop();
    }
    Ok(String::from_utf8_lossy(&line).into_owned())
}

fn parse_dimensions(line: &str) -> Option<(usize, usize)> {
    let mut fields = line.split_whitespace();
    let width = fields.next()?.parse().ok()?;
    let height = fields.next()?.parse().ok()?;
    Some((width, height))
}

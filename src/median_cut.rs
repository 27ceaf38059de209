// Median cut in the style of ColorThief: colors are binned into a 5-bit per
// channel histogram and boxes of that histogram are split until enough exist.

use std::ops::Range;

use tracing::debug;

use crate::color::Color;
use crate::encoding::Transfer;
use crate::image_buffer::ImageBuffer;
use crate::palette::{Palette, PaletteGenerator};

const BITS: u32 = 5;
const SIDE: usize = 1 << BITS;
const MAX_COLORS: usize = 256;
const MAX_SPLITS: usize = 1000;

type Histogram = [usize; SIDE * SIDE * SIDE];
type Bin = [u8; 3];

#[derive(Debug, Clone, Copy, Default)]
pub struct MedianCut;

#[derive(Clone)]
struct Bucket {
    volume: usize,
    weight: usize,
    bounds: [Range<usize>; 3],
}

fn to_bin(color: Color) -> Bin {
    let quantize = |c| Transfer::Linear.encode(c) >> (8 - BITS);
    [quantize(color.x), quantize(color.y), quantize(color.z)]
}

fn bin_center(bin: [usize; 3]) -> Color {
    // Middle of the bin's 8-bit range, normalized
    let promote = |x: usize| ((x << (8 - BITS)) | (1 << (7 - BITS))) as f32 / 255.0;
    Color::new(promote(bin[0]), promote(bin[1]), promote(bin[2]))
}

fn pack(bin: [usize; 3]) -> usize {
    bin[0] << (2 * BITS) | bin[1] << BITS | bin[2]
}

fn generate_histogram(pixels: &[Color]) -> Box<Histogram> {
    let mut histo = Box::new([0; SIDE * SIDE * SIDE]);
    for px in pixels {
        let b = to_bin(*px);
        histo[pack([b[0] as usize, b[1] as usize, b[2] as usize])] += 1;
    }
    histo
}

fn volume(bounds: &[Range<usize>; 3]) -> usize {
    bounds.iter().map(|d| d.len()).product()
}

fn bucket_weight(bounds: &[Range<usize>; 3], histogram: &Histogram) -> usize {
    let mut sum = 0;
    for i in bounds[0].clone() {
        for j in bounds[1].clone() {
            for k in bounds[2].clone() {
                sum += histogram[pack([i, j, k])];
            }
        }
    }
    sum
}

fn make_bucket_from_pixels(pixels: &[Color]) -> Bucket {
    let bins = pixels.iter().map(|c| to_bin(*c)).collect::<Vec<_>>();
    let mut bounds = [0..0, 0..0, 0..0];
    for (axis, range) in bounds.iter_mut().enumerate() {
        let min = bins.iter().map(|b| b[axis]).min().unwrap_or(0);
        let max = bins.iter().map(|b| b[axis]).max().unwrap_or(0);
        *range = min as usize..max as usize + 1;
    }
    Bucket {
        volume: volume(&bounds),
        weight: pixels.len(),
        bounds,
    }
}

fn split_bucket_along(bucket: Bucket, axis: usize, split_position: usize,
        histogram: &Histogram) -> (Bucket, Bucket) {
    let mut b0 = bucket;
    let mut b1 = b0.clone();

    b0.bounds[axis].end = split_position;
    b0.weight = bucket_weight(&b0.bounds, histogram);
    b0.volume = volume(&b0.bounds);
    b1.bounds[axis].start = split_position;
    b1.weight = bucket_weight(&b1.bounds, histogram);
    b1.volume = volume(&b1.bounds);

    (b0, b1)
}

fn split_bucket(bucket: Bucket, histogram: &Histogram) -> (Bucket, Option<Bucket>) {
    if bucket.volume == 1 {
        return (bucket, None);
    }

    // Widest axis first, then the other two
    let (x, y, z) = {
        let dx = bucket.bounds[0].len();
        let dy = bucket.bounds[1].len();
        let dz = bucket.bounds[2].len();
        let max = dx.max(dy).max(dz);
        if dx == max      { (0, 1, 2) }
        else if dy == max { (1, 0, 2) }
        else              { (2, 0, 1) }
    };

    // Collapse the bucket onto its widest axis
    let mut slices = [0; SIDE];
    for i in bucket.bounds[x].clone() {
        let mut px = [0, 0, 0];
        px[x] = i;
        let mut sum = 0;
        for j in bucket.bounds[y].clone() {
            px[y] = j;
            for k in bucket.bounds[z].clone() {
                px[z] = k;
                sum += histogram[pack(px)];
            }
        }
        slices[i] = sum;
    }
    let pixel_sum: usize = slices.iter().sum();

    // Split where the two halves' weights are closest
    let mut prefix_sums = [0; SIDE];
    for i in 1..SIDE {
        prefix_sums[i] = prefix_sums[i - 1] + slices[i - 1];
    }
    let best_split = (0..SIDE).min_by_key(|i| {
        (2 * prefix_sums[*i] as i64 - pixel_sum as i64).abs()
    }).unwrap_or(0);

    if prefix_sums[best_split] == 0 || prefix_sums[best_split] == pixel_sum {
        // Can't split into two non-empty buckets
        return (bucket, None);
    }

    let (low, high) = split_bucket_along(bucket, x, best_split, histogram);
    (low, Some(high))
}

fn color_from_bucket(bucket: &Bucket, histogram: &Histogram) -> Color {
    let mut avg = [0f64; 3];
    let mut weight = 0;
    for i in bucket.bounds[0].clone() {
        for j in bucket.bounds[1].clone() {
            for k in bucket.bounds[2].clone() {
                let mult = histogram[pack([i, j, k])];
                let c = bin_center([i, j, k]);
                avg[0] += c.x as f64 * mult as f64;
                avg[1] += c.y as f64 * mult as f64;
                avg[2] += c.z as f64 * mult as f64;
                weight += mult;
            }
        }
    }

    if weight == 0 {
        return Color::BLACK;
    }
    let w = weight as f64;
    Color::new((avg[0] / w) as f32, (avg[1] / w) as f32, (avg[2] / w) as f32)
}

/// Repeatedly splits the heaviest bucket by `key` until `target` buckets
/// exist or nothing more can be split.
fn split_until(queue: &mut Vec<Bucket>, histogram: &Histogram,
        key: fn(&Bucket) -> usize, target: usize) {
    let mut settled = Vec::new();
    for _ in 0..MAX_SPLITS {
        if queue.len() + settled.len() >= target {
            break;
        }
        queue.sort_unstable_by_key(key);
        let b = match queue.pop() {
            Some(b) => b,
            None => break,
        };
        match split_bucket(b, histogram) {
            (b0, Some(b1)) => {
                queue.push(b0);
                queue.push(b1);
            }
            (b, None) => settled.push(b),
        }
    }
    queue.append(&mut settled);
}

impl PaletteGenerator for MedianCut {
    fn generate(&self, image: &ImageBuffer, requested: usize) -> Palette {
        let pixels = image.pixels();
        if pixels.is_empty() || requested == 0 {
            return Vec::new();
        }
        let target = requested.min(MAX_COLORS);

        let histogram = generate_histogram(pixels);
        let mut queue = vec![make_bucket_from_pixels(pixels)];

        split_until(&mut queue, &histogram, |b| b.weight, target * 3 / 4);
        split_until(&mut queue, &histogram, |b| b.weight * b.volume, target);
        debug!(buckets = queue.len(), "median cut finished");

        queue.iter().map(|b| color_from_bucket(b, &histogram)).collect()
    }
}

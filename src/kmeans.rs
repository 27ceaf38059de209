use tracing::debug;

use crate::color::Color;
use crate::image_buffer::ImageBuffer;
use crate::iter_utils::*;
use crate::palette::{Palette, PaletteGenerator};

type Center = [f64; 3];

/// Lloyd's algorithm over the image's pixels.
#[derive(Debug, Clone, Copy)]
pub struct KMeans {
    /// Upper bound on refinement steps; iteration also stops once no
    /// center moves.
    pub max_iterations: usize,
}

impl Default for KMeans {
    fn default() -> Self {
        KMeans { max_iterations: 64 }
    }
}

#[derive(Debug)]
struct Cluster {
    centroid: Center,
    mean: Center,
    size: usize,
}

fn sqr(x: f64) -> f64 {
    x * x
}

fn to_center(c: Color) -> Center {
    [c.x as f64, c.y as f64, c.z as f64]
}

fn distance(fc: Center, c: Color) -> f64 {
    sqr(fc[0] - c.x as f64)
    + sqr(fc[1] - c.y as f64)
    + sqr(fc[2] - c.z as f64)
}

fn center_distance(c1: Center, c2: Center) -> f64 {
    sqr(c1[0] - c2[0])
    + sqr(c1[1] - c2[1])
    + sqr(c1[2] - c2[2])
}

fn initialize(pixels: &[Color], color_count: usize) -> Vec<Center> {
    // Farthest-point seeding: start from the mean color, then repeatedly
    // take the pixel farthest from every center chosen so far. Stops early
    // once every pixel coincides with a center.
    let color_count = color_count.min(pixels.len());
    let mut centers = Vec::with_capacity(color_count);

    centers.push({
        let mut acc = [0f64; 3];
        for px in pixels {
            acc[0] += px.x as f64;
            acc[1] += px.y as f64;
            acc[2] += px.z as f64;
        }
        for a in acc.iter_mut() {
            *a /= pixels.len() as f64;
        }
        acc
    });

    let nearest_center = |centers: &[Center], px: Color| {
        min_partial(centers.iter().map(|c| distance(*c, px))).unwrap_or(0.0)
    };
    for i in 1..color_count {
        let farthest = max_by_key_partial(pixels.iter(), |px| nearest_center(&centers, **px));
        match farthest {
            Some(px) if nearest_center(&centers, *px) > 0.0 => centers.push(to_center(*px)),
            _ => break,
        }
        debug!(center = i, "chose starting center");
    }

    centers
}

impl PaletteGenerator for KMeans {
    fn generate(&self, image: &ImageBuffer, requested: usize) -> Palette {
        let pixels = image.pixels();
        if pixels.is_empty() || requested == 0 {
            return Vec::new();
        }

        let mut clusters = initialize(pixels, requested).into_iter().map(|c| {
            Cluster {
                centroid: [0.0, 0.0, 0.0],
                mean: c,
                size: 0,
            }
        }).collect::<Vec<_>>();

        for step in 1..=self.max_iterations {
            // Accumulate each pixel into its closest cluster
            for px in pixels {
                let closest = min_by_key_partial(clusters.iter_mut(), |c| {
                    distance(c.mean, *px)
                });
                if let Some(closest) = closest {
                    closest.centroid[0] += px.x as f64;
                    closest.centroid[1] += px.y as f64;
                    closest.centroid[2] += px.z as f64;
                    closest.size += 1;
                }
            }

            // Move means to centroids
            let mut biggest_movement = 0.0;
            for cluster in clusters.iter_mut() {
                if cluster.size != 0 {
                    for c in cluster.centroid.iter_mut() {
                        *c /= cluster.size as f64;
                    }
                    let movement = center_distance(cluster.mean, cluster.centroid);
                    cluster.mean = cluster.centroid;
                    if biggest_movement < movement {
                        biggest_movement = movement;
                    }
                }
                cluster.centroid = [0.0, 0.0, 0.0];
                cluster.size = 0;
            }

            debug!(step, difference = biggest_movement, "k-means step");
            if biggest_movement == 0.0 {
                break;
            }
        }

        clusters.into_iter()
            .map(|c| Color::new(c.mean[0] as f32, c.mean[1] as f32, c.mean[2] as f32))
            .collect()
    }
}

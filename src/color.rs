/// An RGB sample with real-valued components, nominally in `[0, 1]`.
///
/// Nothing clamps the components here; out-of-range values survive until
/// they are encoded to bytes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

fn sqr(x: f32) -> f32 {
    x * x
}

impl Color {
    pub const BLACK: Color = Color { x: 0.0, y: 0.0, z: 0.0 };
    pub const WHITE: Color = Color { x: 1.0, y: 1.0, z: 1.0 };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Color { x, y, z }
    }

    pub fn distance_squared(self, other: Color) -> f32 {
        sqr(self.x - other.x) + sqr(self.y - other.y) + sqr(self.z - other.z)
    }

    pub fn distance(self, other: Color) -> f32 {
        self.distance_squared(other).sqrt()
    }

    pub fn min(self, other: Color) -> Color {
        Color::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    pub fn max(self, other: Color) -> Color {
        Color::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

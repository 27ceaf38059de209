//! Conversion between normalized components and 8-bit file samples.

const GAMMA: f32 = 2.2;

/// Transfer curve applied when components are written to or read from bytes.
///
/// Reads and writes of one run must agree on the curve for a file to
/// round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Transfer {
    /// Bytes are `component * 255`.
    #[default]
    Linear,
    /// Bytes hold `component^(1/2.2)`.
    #[value(name = "gamma-2.2")]
    Gamma22,
}

impl Transfer {
    /// Clamps to `[0, 1]`, applies the curve and truncates to a byte.
    pub fn encode(self, x: f32) -> u8 {
        let mut x = x.clamp(0.0, 1.0);
        if self == Transfer::Gamma22 {
            x = x.powf(1.0 / GAMMA);
        }
        (x * 255.0).floor() as u8
    }

    pub fn decode(self, b: u8) -> f32 {
        let x = b as f32 / 255.0;
        match self {
            Transfer::Linear => x,
            Transfer::Gamma22 => x.powf(GAMMA),
        }
    }
}

use std::f64::consts::TAU;

use num_complex::Complex;

/// Single-bin DFT at an arbitrary (not necessarily bin-centred) frequency,
/// over blocks of a fixed length.
pub struct GoertzelDetector {
    /// `2 cos(ω)`, the resonator feedback.
    feedback: f32,
    /// `e^(-jω)`, applied to the second-to-last state when a block ends.
    rotation: Complex<f32>,
    block_len: usize,
}

impl GoertzelDetector {
    pub fn from_hz(frequency_hz: f64, sample_rate: f64, block_len: usize) -> Self {
        let omega = (TAU * frequency_hz / sample_rate) as f32;
        Self {
            feedback: 2.0 * omega.cos(),
            rotation: Complex::from_polar(1.0, -omega),
            block_len,
        }
    }

    pub fn block_len(&self) -> usize {
        self.block_len
    }

    /// Level of the frequency over the first `block_len` samples, in dB
    /// relative to a full-scale sine. Blocks are independent of each other.
    pub fn measure(&self, samples: &[f32]) -> f32 {
        let (last, previous) = samples.iter()
            .take(self.block_len)
            .fold((0.0f32, 0.0f32), |(s1, s2), x| (x + self.feedback * s1 - s2, s1));

        let y = Complex::new(last, 0.0) - self.rotation * previous;

        // A sine of amplitude A gives |y| = A * block_len / 2.
        20.0 * (2.0 * y.norm() / self.block_len as f32).log10()
    }
}

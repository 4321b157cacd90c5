use crate::error::{Error, Result};
use crate::scheme::FrequencyPair;

pub mod dual_tone;
pub mod sine;

pub use dual_tone::DualTone;
pub use sine::SineWave;

pub type Sample = f32;

/// Number of samples covering `length_ms` at `sample_rate`, rounded up so a
/// fractional millisecond never truncates a segment to nothing.
pub fn sample_count(length_ms: f64, sample_rate: f64) -> usize {
    if length_ms > 0.0 && sample_rate > 0.0 {
        (length_ms * sample_rate / 1000.0).ceil() as usize
    } else {
        0
    }
}

/// Output format shared by every segment of a sequence.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Waveform {
    sample_rate: f64,
    channels: u16,
}

impl Waveform {
    pub fn new(sample_rate: f64, channels: u16) -> Result<Self> {
        if !(sample_rate > 0.0) || !sample_rate.is_finite() {
            return Err(Error::invalid_parameter("sample_rate", sample_rate));
        }
        if channels < 1 {
            return Err(Error::invalid_parameter("channels", channels as f64));
        }

        Ok(Self {
            sample_rate,
            channels,
        })
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_count(&self, length_ms: f64) -> usize {
        sample_count(length_ms, self.sample_rate)
    }

    /// `amplitude * sin(2π * freq * i / sample_rate + phase)` for
    /// `ceil(length_ms * sample_rate / 1000)` samples. A zero frequency or
    /// amplitude yields exact silence.
    pub fn sine(&self, freq: f64, length_ms: f64, amplitude: f64, phase: f64) -> SineWave {
        SineWave::new(freq, amplitude, phase, self.sample_rate, self.sample_count(length_ms))
    }

    pub fn silence(&self, length_ms: f64) -> SineWave {
        self.sine(0.0, length_ms, 0.0, 0.0)
    }

    /// Both frequencies of `pair` at half of `amplitude` each, summed.
    pub fn dual_tone(&self, pair: FrequencyPair, length_ms: f64, amplitude: f64) -> DualTone {
        let half = amplitude / 2.0;
        DualTone::new(
            self.sine(pair.low, length_ms, half, 0.0),
            self.sine(pair.high, length_ms, half, 0.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_count_rounds_up() {
        assert_eq!(sample_count(500.0, 10.0), 5);
        assert_eq!(sample_count(100.0, 10.0), 1);
        assert_eq!(sample_count(22.0, 44100.0), 971);
        assert_eq!(sample_count(0.01, 8000.0), 1);
        assert_eq!(sample_count(0.0, 8000.0), 0);
        assert_eq!(sample_count(-5.0, 8000.0), 0);
    }

    #[test]
    fn rejects_bad_format() {
        assert_eq!(Waveform::new(0.0, 1), Err(Error::invalid_parameter("sample_rate", 0.0)));
        assert!(Waveform::new(f64::NAN, 1).is_err());
        assert_eq!(Waveform::new(8000.0, 0), Err(Error::invalid_parameter("channels", 0.0)));
        assert!(Waveform::new(8000.0, 2).is_ok());
    }

    #[test]
    fn length_invariant() {
        for sample_rate in [10.0, 8000.0, 11025.0, 44100.0, 48000.0] {
            let waveform = Waveform::new(sample_rate, 1).unwrap();
            for length_ms in [0.5, 1.0, 22.0, 40.0, 100.0, 333.3] {
                let expected = (length_ms * sample_rate / 1000.0).ceil() as usize;
                assert_eq!(waveform.sine(697.0, length_ms, 1.0, 0.0).count(), expected);
                assert_eq!(waveform.silence(length_ms).count(), expected);
            }
        }
    }
}

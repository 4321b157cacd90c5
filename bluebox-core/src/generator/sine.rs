use std::f64::consts::TAU;

use super::Sample;

/// A finite run of single-frequency samples. Rebuild it to start over.
#[derive(Clone, Debug)]
pub struct SineWave {
    phase: f64,
    phase_advance: f64,
    amplitude: f64,
    silent: bool,
    index: usize,
    count: usize,
}

impl SineWave {
    pub fn new(freq: f64, amplitude: f64, phase: f64, sample_rate: f64, count: usize) -> Self {
        Self {
            phase,
            phase_advance: TAU * freq / sample_rate,
            amplitude,
            silent: freq == 0.0 || amplitude == 0.0,
            index: 0,
            count,
        }
    }

    pub fn is_silent(&self) -> bool {
        self.silent
    }
}

impl Iterator for SineWave {
    type Item = Sample;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.count {
            return None;
        }

        let output = if self.silent {
            0.0
        } else {
            self.amplitude * (self.phase_advance * self.index as f64 + self.phase).sin()
        };
        self.index += 1;

        Some(output as Sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SineWave {}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::super::Waveform;

    fn assert_close(a: f32, b: f64) {
        assert!((a as f64 - b).abs() < 1e-6, "{a} != {b}");
    }

    #[test]
    fn sine() {
        let samples: Vec<_> = Waveform::new(10.0, 1).unwrap().sine(5.0, 1000.0, 1.0, 0.0).collect();
        assert_eq!(samples.len(), 10);
        assert_eq!(samples[0], 0.0);
        for (i, sample) in samples.into_iter().enumerate() {
            assert_close(sample, (2.0 * PI * 5.0 * i as f64 / 10.0).sin());
        }

        let samples: Vec<_> = Waveform::new(100.0, 1).unwrap().sine(5.0, 1000.0, 1.0, 0.0).collect();
        assert_eq!(samples.len(), 100);
        for (i, sample) in samples.into_iter().enumerate() {
            assert_close(sample, (2.0 * PI * 5.0 * i as f64 / 100.0).sin());
        }
    }

    #[test]
    fn amplitude_and_phase() {
        let samples: Vec<_> = Waveform::new(8000.0, 1).unwrap().sine(1000.0, 1.0, 0.25, PI / 2.0).collect();
        assert_eq!(samples.len(), 8);
        assert_close(samples[0], 0.25);
        for (i, sample) in samples.into_iter().enumerate() {
            assert_close(sample, 0.25 * (2.0 * PI * 1000.0 * i as f64 / 8000.0 + PI / 2.0).sin());
            assert!(sample.abs() <= 0.25 + 1e-6);
        }
    }

    #[test]
    fn zero_frequency_or_amplitude_is_silence() {
        let waveform = Waveform::new(10.0, 1).unwrap();

        let wave = waveform.sine(0.0, 1000.0, 1.0, 0.0);
        assert!(wave.is_silent());
        assert_eq!(wave.collect::<Vec<_>>(), vec![0.0; 10]);

        let wave = waveform.sine(5.0, 1000.0, 0.0, 1.0);
        assert!(wave.is_silent());
        assert_eq!(wave.collect::<Vec<_>>(), vec![0.0; 10]);
    }

    #[test]
    fn streams_are_independent() {
        let waveform = Waveform::new(8000.0, 1).unwrap();
        let mut a = waveform.sine(697.0, 10.0, 1.0, 0.0);
        let b = waveform.sine(697.0, 10.0, 1.0, 0.0);
        assert_eq!(a.len(), 80);
        a.next();
        a.next();
        assert_eq!(a.len(), 78);
        assert_eq!(b.len(), 80);
        assert_eq!(b.take(2).count(), 2);
    }
}

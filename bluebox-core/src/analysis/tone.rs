use std::ops::RangeInclusive;

use super::goertzel::GoertzelDetector;
use crate::scheme::FrequencyScheme;

// Each tone of a pair sits near -6 dB at full amplitude.
const DETECT_POWER_RANGE: RangeInclusive<f32> = -40.0..=3.0;
const SEPARATION_DB: f32 = 10.0;
const TWIST_DB: f32 = 10.0;

/// Recognises which code of a scheme a block of samples holds, by measuring
/// every frequency the scheme uses.
pub struct ToneDetector {
    sample_rate: f64,
    frequencies: Vec<f64>,
    codes: Vec<(&'static str, f64, f64)>,
}

impl ToneDetector {
    pub fn new(scheme: &dyn FrequencyScheme, sample_rate: f64) -> Self {
        let codes: Vec<_> = scheme.codes().iter()
            .enumerate()
            .map(|(index, code)| {
                let pair = scheme.pair(index);
                (*code, pair.low, pair.high)
            })
            .collect();

        let mut frequencies: Vec<f64> = codes.iter()
            .flat_map(|(_, low, high)| [*low, *high])
            .collect();
        frequencies.sort_by(f64::total_cmp);
        frequencies.dedup();

        Self {
            sample_rate,
            frequencies,
            codes,
        }
    }

    /// Canonical code sounded in `samples`, if exactly one pair stands out.
    pub fn detect(&self, samples: &[f32]) -> Option<&'static str> {
        if samples.is_empty() {
            return None;
        }

        let mut powers: Vec<(f64, f32)> = self.frequencies.iter()
            .map(|frequency| {
                let detector = GoertzelDetector::from_hz(*frequency, self.sample_rate, samples.len());
                (*frequency, detector.measure(samples))
            })
            .collect();
        powers.sort_by(|a, b| b.1.total_cmp(&a.1));

        let (frequency_0, power_0) = *powers.first()?;
        let (frequency_1, power_1) = *powers.get(1)?;
        if !DETECT_POWER_RANGE.contains(&power_0) || !DETECT_POWER_RANGE.contains(&power_1) {
            return None;
        }
        if power_0 - power_1 > TWIST_DB {
            return None;
        }
        if let Some((_, power_2)) = powers.get(2) {
            if power_1 - power_2 < SEPARATION_DB {
                return None;
            }
        }

        let (low, high) = if frequency_0 < frequency_1 {
            (frequency_0, frequency_1)
        } else {
            (frequency_1, frequency_0)
        };

        self.codes.iter()
            .find(|(_, l, h)| *l == low && *h == high)
            .map(|(code, _, _)| *code)
    }
}

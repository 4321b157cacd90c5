use super::{Sample, SineWave};

/// Sample-wise sum of two sine waves of equal length.
#[derive(Clone, Debug)]
pub struct DualTone {
    tone_0: SineWave,
    tone_1: SineWave,
}

impl DualTone {
    pub fn new(tone_0: SineWave, tone_1: SineWave) -> Self {
        Self {
            tone_0,
            tone_1,
        }
    }
}

impl Iterator for DualTone {
    type Item = Sample;

    fn next(&mut self) -> Option<Self::Item> {
        let s0 = self.tone_0.next()?;
        let s1 = self.tone_1.next()?;
        Some(s0 + s1)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.tone_0.len().min(self.tone_1.len());
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DualTone {}

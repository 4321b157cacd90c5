use std::fmt;
use std::iter::Peekable;
use std::sync::Arc;
use std::vec;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::generator::{DualTone, Sample, SineWave, Waveform};
use crate::scheme::{FrequencyPair, FrequencyScheme};

/// Codes that insert an extra pause instead of a tone, in every scheme.
pub const META_CODES: [&str; 2] = ["p", "P"];

pub fn is_meta_code(code: &str) -> bool {
    META_CODES.contains(&code)
}

/// What to do with a code the scheme does not know.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum ErrorPolicy {
    /// Log a warning and leave the code out.
    #[default]
    Skip,
    /// Fail the whole sequence before producing any output.
    Halt,
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SequencerConfig {
    pub tone_length_ms: f64,
    /// Separator between codes, also the length of a `p` pause.
    pub pause_ms: f64,
    /// Silence once before and once after the whole sequence.
    pub padding_ms: f64,
    /// Peak of the combined pair, in (0, 1].
    pub amplitude: f64,
    pub sample_rate: f64,
    pub channels: u16,
    pub error_policy: ErrorPolicy,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            tone_length_ms: 22.0,
            pause_ms: 40.0,
            padding_ms: 150.0,
            amplitude: 1.0,
            sample_rate: 44100.0,
            channels: 1,
            error_policy: ErrorPolicy::Skip,
        }
    }
}

impl SequencerConfig {
    pub fn validate(&self) -> Result<()> {
        let finite = |field, value: f64| {
            if value.is_finite() { Ok(()) } else { Err(Error::invalid_parameter(field, value)) }
        };

        finite("tone_length", self.tone_length_ms)?;
        if self.tone_length_ms <= 0.0 {
            return Err(Error::invalid_parameter("tone_length", self.tone_length_ms));
        }
        finite("pause", self.pause_ms)?;
        if self.pause_ms < 0.0 {
            return Err(Error::invalid_parameter("pause", self.pause_ms));
        }
        finite("padding", self.padding_ms)?;
        if self.padding_ms < 0.0 {
            return Err(Error::invalid_parameter("padding", self.padding_ms));
        }
        if !(self.amplitude > 0.0 && self.amplitude <= 1.0) {
            return Err(Error::invalid_parameter("amplitude", self.amplitude));
        }
        if !(self.sample_rate > 0.0) {
            return Err(Error::invalid_parameter("sample_rate", self.sample_rate));
        }
        finite("sample_rate", self.sample_rate)?;
        if self.channels < 1 {
            return Err(Error::invalid_parameter("channels", self.channels as f64));
        }

        // Each segment's sample count has to fit a usize.
        for (field, length_ms) in [("tone_length", self.tone_length_ms), ("pause", self.pause_ms), ("padding", self.padding_ms)] {
            if length_ms * self.sample_rate / 1000.0 >= usize::MAX as f64 {
                return Err(Error::invalid_parameter(field, length_ms));
            }
        }

        Ok(())
    }
}

///////////////////////////////////////////////////////////////////////

#[derive(Copy, Clone, PartialEq, Debug)]
enum Step {
    Tone(FrequencyPair),
    Pause,
}

/// Turns code strings into sample streams for one scheme and one set of
/// parameters. Parameters are checked once, here, never at play time.
#[derive(Clone)]
pub struct Sequencer {
    scheme: Arc<dyn FrequencyScheme>,
    config: SequencerConfig,
    waveform: Waveform,
}

impl Sequencer {
    pub fn new(scheme: Arc<dyn FrequencyScheme>, config: SequencerConfig) -> Result<Self> {
        config.validate()?;
        let waveform = Waveform::new(config.sample_rate, config.channels)?;

        Ok(Self {
            scheme,
            config,
            waveform,
        })
    }

    pub fn scheme(&self) -> &dyn FrequencyScheme {
        self.scheme.as_ref()
    }

    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    pub fn waveform(&self) -> &Waveform {
        &self.waveform
    }

    /// One code per character. Positions in errors are character indices.
    pub fn sequence(&self, codes: &str) -> Result<Sequence> {
        let tokens = codes.char_indices()
            .map(|(offset, c)| &codes[offset..offset + c.len_utf8()])
            .enumerate();
        self.build(tokens)
    }

    /// One code per item, so multi-character codes such as MF `KP` can be
    /// sent. Positions in errors are item indices.
    pub fn sequence_codes<I, S>(&self, codes: I) -> Result<Sequence>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let codes: Vec<S> = codes.into_iter().collect();
        self.build(codes.iter().map(|code| code.as_ref()).enumerate())
    }

    fn resolve(&self, code: &str) -> Result<Step> {
        if is_meta_code(code) {
            Ok(Step::Pause)
        } else {
            self.scheme.lookup(code).map(Step::Tone)
        }
    }

    fn build<'a, I>(&self, tokens: I) -> Result<Sequence>
    where
        I: Iterator<Item = (usize, &'a str)>,
    {
        let mut steps = Vec::new();
        for (position, code) in tokens {
            match self.resolve(code) {
                Ok(step) => steps.push(step),
                Err(_) => match self.config.error_policy {
                    ErrorPolicy::Halt => return Err(Error::invalid_code(code, Some(position))),
                    ErrorPolicy::Skip => warn!(code, position, scheme = self.scheme.name(), "skipping invalid code"),
                },
            }
        }

        if steps.is_empty() {
            warn!("empty sequence, nothing to generate");
            return Ok(Sequence::empty(self.waveform));
        }

        let sequence = Sequence::new(self.waveform, &self.config, steps)?;
        debug!(samples = sequence.len(), "sequence planned");
        Ok(sequence)
    }
}

impl fmt::Debug for Sequencer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequencer")
            .field("scheme", &self.scheme.name())
            .field("config", &self.config)
            .finish()
    }
}

///////////////////////////////////////////////////////////////////////
// Sample stream

#[derive(Clone, Debug)]
enum Segment {
    Silence(SineWave),
    Tone(DualTone),
}

impl Iterator for Segment {
    type Item = Sample;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Segment::Silence(wave) => wave.next(),
            Segment::Tone(tone) => tone.next(),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Stage {
    Leading,
    Codes,
    Separator,
    Trailing,
    Done,
}

/// A single-pass stream of samples for one code sequence. Segments are
/// generated only as the consumer pulls; dropping the stream cancels it.
#[derive(Debug)]
pub struct Sequence {
    waveform: Waveform,
    tone_length_ms: f64,
    pause_ms: f64,
    padding_ms: f64,
    amplitude: f64,
    steps: Peekable<vec::IntoIter<Step>>,
    stage: Stage,
    segment: Option<Segment>,
    remaining: usize,
}

impl Sequence {
    /// Plans the stream. Fails when the total sample count overflows a
    /// usize, naming the parameter with the largest share.
    fn new(waveform: Waveform, config: &SequencerConfig, steps: Vec<Step>) -> Result<Self> {
        let tone = waveform.sample_count(config.tone_length_ms);
        let pause = waveform.sample_count(config.pause_ms);
        let padding = waveform.sample_count(config.padding_ms);

        let tones = steps.iter().filter(|step| matches!(step, Step::Tone(_))).count();
        // Meta-code pauses plus one separator between neighbouring steps.
        let silences = 2 * steps.len() - tones - 1;

        let padding_total = padding.checked_mul(2)
            .ok_or_else(|| Error::invalid_parameter("padding", config.padding_ms))?;
        let tone_total = tones.checked_mul(tone)
            .ok_or_else(|| Error::invalid_parameter("tone_length", config.tone_length_ms))?;
        let pause_total = silences.checked_mul(pause)
            .ok_or_else(|| Error::invalid_parameter("pause", config.pause_ms))?;

        let remaining = padding_total.checked_add(tone_total)
            .and_then(|total| total.checked_add(pause_total))
            .ok_or_else(|| {
                if padding_total >= tone_total && padding_total >= pause_total {
                    Error::invalid_parameter("padding", config.padding_ms)
                } else if tone_total >= pause_total {
                    Error::invalid_parameter("tone_length", config.tone_length_ms)
                } else {
                    Error::invalid_parameter("pause", config.pause_ms)
                }
            })?;

        Ok(Self {
            waveform,
            tone_length_ms: config.tone_length_ms,
            pause_ms: config.pause_ms,
            padding_ms: config.padding_ms,
            amplitude: config.amplitude,
            steps: steps.into_iter().peekable(),
            stage: Stage::Leading,
            segment: None,
            remaining,
        })
    }

    fn empty(waveform: Waveform) -> Self {
        Self {
            waveform,
            tone_length_ms: 0.0,
            pause_ms: 0.0,
            padding_ms: 0.0,
            amplitude: 0.0,
            steps: Vec::new().into_iter().peekable(),
            stage: Stage::Done,
            segment: None,
            remaining: 0,
        }
    }

    pub fn waveform(&self) -> &Waveform {
        &self.waveform
    }

    pub fn is_empty(&self) -> bool {
        self.remaining == 0
    }

    fn silence(&self, length_ms: f64) -> Option<Segment> {
        if self.waveform.sample_count(length_ms) > 0 {
            Some(Segment::Silence(self.waveform.silence(length_ms)))
        } else {
            None
        }
    }

    fn next_segment(&mut self) -> Option<Segment> {
        loop {
            let segment = match self.stage {
                Stage::Leading => {
                    self.stage = Stage::Codes;
                    self.silence(self.padding_ms)
                },
                Stage::Codes => {
                    let Some(step) = self.steps.next() else {
                        self.stage = Stage::Trailing;
                        continue;
                    };
                    self.stage = if self.steps.peek().is_some() { Stage::Separator } else { Stage::Trailing };
                    match step {
                        Step::Tone(pair) => {
                            Some(Segment::Tone(self.waveform.dual_tone(pair, self.tone_length_ms, self.amplitude)))
                        },
                        Step::Pause => self.silence(self.pause_ms),
                    }
                },
                Stage::Separator => {
                    self.stage = Stage::Codes;
                    self.silence(self.pause_ms)
                },
                Stage::Trailing => {
                    self.stage = Stage::Done;
                    self.silence(self.padding_ms)
                },
                Stage::Done => return None,
            };

            if segment.is_some() {
                return segment;
            }
        }
    }
}

impl Iterator for Sequence {
    type Item = Sample;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(segment) = &mut self.segment {
                if let Some(sample) = segment.next() {
                    self.remaining = self.remaining.saturating_sub(1);
                    return Some(sample);
                }
            }
            self.segment = Some(self.next_segment()?);
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Sequence {}

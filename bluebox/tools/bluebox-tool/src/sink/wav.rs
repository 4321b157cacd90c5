use std::path::PathBuf;

use bluebox_core::Sample;
use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::{error, info, warn};

use super::{OutputSink, SinkSettings};
use crate::error::BackendError;

/// [-1, 1] float to 16-bit PCM.
pub fn quantize(sample: Sample) -> i16 {
    (sample * i16::MAX as f32).round().clamp(i16::MIN as f32, i16::MAX as f32) as i16
}

/// Collects everything played and writes one 16-bit PCM WAV file on close.
pub struct WavSink {
    path: PathBuf,
    settings: SinkSettings,
    buffer: Vec<Sample>,
    written: bool,
}

impl WavSink {
    pub fn new<P: Into<PathBuf>>(path: P, settings: SinkSettings) -> Self {
        Self {
            path: path.into(),
            settings,
            buffer: Vec::new(),
            written: false,
        }
    }

    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    fn write(&self) -> Result<(), BackendError> {
        if self.settings.sample_rate == 0 {
            return Err(BackendError::SampleRate(0.0));
        }

        let spec = WavSpec {
            channels: self.settings.channels,
            sample_rate: self.settings.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };

        let mut writer = WavWriter::create(&self.path, spec)?;
        for sample in &self.buffer {
            let value = quantize(*sample);
            for _ in 0..self.settings.channels {
                writer.write_sample(value)?;
            }
        }
        writer.finalize()?;
        Ok(())
    }
}

impl OutputSink for WavSink {
    fn play(&mut self, samples: &mut dyn Iterator<Item = Sample>, close: bool) -> Result<(), BackendError> {
        let (lower, _) = samples.size_hint();
        self.buffer.reserve(lower);
        self.buffer.extend(samples);

        if close {
            self.close()?;
        }
        Ok(())
    }

    fn play_all(&mut self, batches: &mut dyn Iterator<Item = bluebox_core::Sequence>) -> Result<(), BackendError> {
        for mut batch in batches {
            self.play(&mut batch, false)?;
        }
        self.close()
    }

    fn stop(&mut self) {}

    fn close(&mut self) -> Result<(), BackendError> {
        if self.buffer.is_empty() {
            if !self.written {
                warn!(path = %self.path.display(), "no audio data to write");
            }
            return Ok(());
        }

        // The buffer is gone either way, so a failed write is reported once.
        let result = self.write();
        match &result {
            Ok(()) => info!(path = %self.path.display(), samples = self.buffered(), "wrote wav file"),
            Err(e) => error!(path = %self.path.display(), samples = self.buffered(), "failed to write wav file: {e}"),
        }
        self.written |= result.is_ok();
        self.buffer.clear();
        result
    }
}

impl Drop for WavSink {
    fn drop(&mut self) {
        if !self.buffer.is_empty() {
            // Logged by close().
            let _ = self.close();
        }
    }
}

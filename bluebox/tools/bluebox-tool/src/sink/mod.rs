use std::path::PathBuf;

use bluebox_core::{Sample, Sequence};
use clap::ArgEnum;

use crate::error::BackendError;

pub mod capture;
pub mod device;
pub mod wav;

pub use capture::{CaptureMode, CaptureSink};
pub use device::DeviceSink;
pub use wav::WavSink;

/// Where generated samples go. Samples are mono frames in [-1, 1]; sinks
/// with more than one channel copy each frame to every channel.
pub trait OutputSink {
    /// Consumes all of `samples`, then closes the sink if `close` is set.
    fn play(&mut self, samples: &mut dyn Iterator<Item = Sample>, close: bool) -> Result<(), BackendError>;

    fn play_all(&mut self, batches: &mut dyn Iterator<Item = Sequence>) -> Result<(), BackendError> {
        for mut batch in batches {
            self.play(&mut batch, false)?;
        }
        Ok(())
    }

    /// Best-effort halt of anything still being output.
    fn stop(&mut self);

    /// Releases the device or file. Calling it again does nothing.
    fn close(&mut self) -> Result<(), BackendError>;
}

#[derive(ArgEnum, Copy, Clone, PartialEq, Eq, Debug)]
pub enum Backend {
    Device,
    Wav,
    #[clap(alias = "dummy")]
    Capture,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct SinkSettings {
    pub sample_rate: u32,
    pub channels: u16,
}

impl SinkSettings {
    /// Sinks run at whole-hertz rates; `sample_rate` is rounded and must
    /// land in `1..=u32::MAX`.
    pub fn new(sample_rate: f64, channels: u16) -> Result<Self, BackendError> {
        let rounded = sample_rate.round();
        if !(rounded >= 1.0 && rounded <= u32::MAX as f64) {
            return Err(BackendError::SampleRate(sample_rate));
        }

        Ok(Self {
            sample_rate: rounded as u32,
            channels,
        })
    }
}

/// `output` is used by the wav backend only, `capture` by the capture backend.
pub fn open(
    backend: Backend,
    settings: SinkSettings,
    output: Option<PathBuf>,
    capture: CaptureMode,
) -> Result<Box<dyn OutputSink>, BackendError> {
    let sink: Box<dyn OutputSink> = match backend {
        Backend::Device => Box::new(DeviceSink::new(settings)),
        Backend::Wav => {
            let path = output.ok_or(BackendError::MissingOutput)?;
            Box::new(WavSink::new(path, settings))
        },
        Backend::Capture => Box::new(CaptureSink::new(capture)),
    };
    Ok(sink)
}

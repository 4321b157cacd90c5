use bluebox_core::Sequencer;

use crate::error::{BackendError, PlayError};
use crate::sink::OutputSink;

/// A sequencer wired to an output sink.
pub struct Player {
    sequencer: Sequencer,
    sink: Box<dyn OutputSink>,
}

impl Player {
    pub fn new(sequencer: Sequencer, sink: Box<dyn OutputSink>) -> Self {
        Self {
            sequencer,
            sink,
        }
    }

    pub fn with_factory<F>(sequencer: Sequencer, factory: F) -> Result<Self, BackendError>
    where
        F: FnOnce() -> Result<Box<dyn OutputSink>, BackendError>,
    {
        Ok(Self::new(sequencer, factory()?))
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    /// Plays one code string. Under the halt policy a bad code fails the
    /// call before the sink sees any sample.
    pub fn play(&mut self, codes: &str) -> Result<(), PlayError> {
        let mut sequence = self.sequencer.sequence(codes)?;
        self.sink.play(&mut sequence, false)?;
        Ok(())
    }

    pub fn play_all<I, S>(&mut self, lines: I) -> Result<(), PlayError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let sequences = lines.into_iter()
            .map(|codes| self.sequencer.sequence(codes.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        self.sink.play_all(&mut sequences.into_iter())?;
        Ok(())
    }

    pub fn stop(&mut self) {
        self.sink.stop();
    }

    /// Flushes and releases the sink (writes the WAV file, closes the device).
    pub fn finish(&mut self) -> Result<(), BackendError> {
        self.sink.close()
    }
}

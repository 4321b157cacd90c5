use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bluebox_core::Sample;
use clap::ArgEnum;

use super::OutputSink;
use crate::error::BackendError;

#[derive(ArgEnum, Copy, Clone, PartialEq, Eq, Debug)]
pub enum CaptureMode {
    /// Print each played batch to stdout.
    Print,
    /// Keep everything played; print it all on close.
    #[clap(alias = "list")]
    Accumulate,
}

/// In-memory sink. Clones share the captured data.
#[derive(Clone, Debug)]
pub struct CaptureSink {
    mode: CaptureMode,
    data: Arc<Mutex<Vec<Sample>>>,
}

impl CaptureSink {
    pub fn new(mode: CaptureMode) -> Self {
        Self {
            mode,
            data: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Sample>> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn data(&self) -> Vec<Sample> {
        self.lock().clone()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl OutputSink for CaptureSink {
    fn play(&mut self, samples: &mut dyn Iterator<Item = Sample>, close: bool) -> Result<(), BackendError> {
        let batch: Vec<Sample> = samples.collect();
        match self.mode {
            CaptureMode::Print => println!("{batch:?}"),
            CaptureMode::Accumulate => self.lock().extend(batch),
        }

        if close {
            self.close()?;
        }
        Ok(())
    }

    fn stop(&mut self) {}

    fn close(&mut self) -> Result<(), BackendError> {
        if self.mode == CaptureMode::Accumulate {
            let data = self.data();
            if !data.is_empty() {
                println!("{data:?}");
            }
            self.clear();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_across_plays() {
        let mut sink = CaptureSink::new(CaptureMode::Accumulate);
        let handle = sink.clone();

        sink.play(&mut vec![0.5, 0.25].into_iter(), false).unwrap();
        sink.play(&mut vec![-1.0].into_iter(), false).unwrap();
        assert_eq!(handle.data(), vec![0.5, 0.25, -1.0]);

        handle.clear();
        assert!(sink.data().is_empty());
    }

    #[test]
    fn close_empties_accumulated_data() {
        let mut sink = CaptureSink::new(CaptureMode::Accumulate);
        sink.play(&mut vec![0.5; 4].into_iter(), true).unwrap();
        assert!(sink.data().is_empty());

        sink.play(&mut vec![0.5; 4].into_iter(), false).unwrap();
        sink.close().unwrap();
        assert!(sink.data().is_empty());
    }

    #[test]
    fn print_mode_keeps_nothing() {
        let mut sink = CaptureSink::new(CaptureMode::Print);
        sink.play(&mut vec![0.0; 3].into_iter(), true).unwrap();
        assert!(sink.data().is_empty());
    }

    #[test]
    fn mode_names() {
        assert_eq!(CaptureMode::from_str("print", false), Ok(CaptureMode::Print));
        assert_eq!(CaptureMode::from_str("accumulate", false), Ok(CaptureMode::Accumulate));
        assert_eq!(CaptureMode::from_str("list", false), Ok(CaptureMode::Accumulate));
    }
}

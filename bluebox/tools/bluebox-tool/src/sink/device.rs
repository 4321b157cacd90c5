use std::thread;
use std::time::Duration;

use bluebox_core::Sample;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam::channel::{unbounded, Receiver};
use ringbuf::{Producer, RingBuffer};
use tracing::{debug, info, warn};

use super::{OutputSink, SinkSettings};
use crate::error::BackendError;

const BUFFER_MS: usize = 250;
const POLL_INTERVAL: Duration = Duration::from_millis(5);
// Lets the last device buffer play out after the ring buffer drains.
const DRAIN_GRACE: Duration = Duration::from_millis(100);

struct ActiveStream {
    stream: cpal::Stream,
    producer: Producer<Sample>,
    errors: Receiver<cpal::StreamError>,
}

impl ActiveStream {
    fn check(&self) -> Result<(), BackendError> {
        match self.errors.try_recv() {
            Ok(e) => Err(e.into()),
            Err(_) => Ok(()),
        }
    }

    fn push(&mut self, sample: Sample) -> Result<(), BackendError> {
        let mut sample = sample;
        loop {
            match self.producer.push(sample) {
                Ok(()) => return Ok(()),
                Err(rejected) => {
                    self.check()?;
                    sample = rejected;
                    thread::sleep(POLL_INTERVAL);
                },
            }
        }
    }

    fn drain(&self) -> Result<(), BackendError> {
        while !self.producer.is_empty() {
            self.check()?;
            thread::sleep(POLL_INTERVAL);
        }
        thread::sleep(DRAIN_GRACE);
        self.check()
    }
}

/// Live playback on the default output device, as 32-bit float frames.
/// The device is opened on the first non-empty `play`.
pub struct DeviceSink {
    settings: SinkSettings,
    active: Option<ActiveStream>,
}

impl DeviceSink {
    pub fn new(settings: SinkSettings) -> Self {
        Self {
            settings,
            active: None,
        }
    }

    fn open(&self) -> Result<ActiveStream, BackendError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(BackendError::NoDevice)?;
        info!(device = %device.name().unwrap_or_else(|_| "unknown".to_string()), "opening audio output");

        let config = cpal::StreamConfig {
            channels: self.settings.channels,
            sample_rate: cpal::SampleRate(self.settings.sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let capacity = (self.settings.sample_rate as usize * BUFFER_MS / 1000).max(1);
        let (producer, mut consumer) = RingBuffer::<Sample>::new(capacity).split();
        let (error_sender, errors) = unbounded();

        let channels = self.settings.channels as usize;
        let stream = device.build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                for frame in data.chunks_mut(channels) {
                    let sample = consumer.pop().unwrap_or(0.0);
                    for out in frame.iter_mut() {
                        *out = sample;
                    }
                }
            },
            move |err| {
                let _ = error_sender.send(err);
            },
            None,
        )?;
        stream.play()?;

        debug!(sample_rate = self.settings.sample_rate, channels, capacity, "audio stream started");

        Ok(ActiveStream {
            stream,
            producer,
            errors,
        })
    }
}

impl OutputSink for DeviceSink {
    fn play(&mut self, samples: &mut dyn Iterator<Item = Sample>, close: bool) -> Result<(), BackendError> {
        let mut samples = samples.peekable();
        if samples.peek().is_some() {
            if self.active.is_none() {
                self.active = Some(self.open()?);
            }
            if let Some(active) = self.active.as_mut() {
                for sample in samples {
                    active.push(sample)?;
                }
                active.drain()?;
            }
        }

        if close {
            self.close()?;
        }
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(active) = self.active.take() {
            if let Err(e) = active.stream.pause() {
                warn!("pausing audio stream: {e}");
            }
        }
    }

    fn close(&mut self) -> Result<(), BackendError> {
        if self.active.take().is_some() {
            debug!("audio stream closed");
        }
        Ok(())
    }
}

impl Drop for DeviceSink {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_play_does_not_open_device() {
        let mut sink = DeviceSink::new(SinkSettings { sample_rate: 8000, channels: 1 });
        sink.play(&mut std::iter::empty(), true).unwrap();
        assert!(sink.active.is_none());
        sink.stop();
        sink.close().unwrap();
    }
}

//! Tone sequencing for in-band telephone signaling.
//!
//! A [`Sequencer`] turns a string of codes into a lazily generated stream of
//! samples, using a [`FrequencyScheme`] (DTMF, MF, ...) to find the pair of
//! frequencies for each code.
//!
//! ```
//! use bluebox_core::{registry, Sequencer, SequencerConfig};
//!
//! let scheme = registry().create("dtmf").unwrap();
//! let config = SequencerConfig { sample_rate: 8000.0, padding_ms: 0.0, ..Default::default() };
//! let sequencer = Sequencer::new(scheme, config).unwrap();
//!
//! let samples: Vec<f32> = sequencer.sequence("555").unwrap().collect();
//! assert_eq!(samples.len(), 3 * 176 + 2 * 320);
//! ```

pub mod analysis;
pub mod error;
pub mod generator;
pub mod scheme;
pub mod sequencer;

pub use error::{Error, Result};
pub use generator::{Sample, Waveform};
pub use scheme::{registry, FrequencyPair, FrequencyScheme, SchemeRegistry};
pub use sequencer::{ErrorPolicy, Sequence, Sequencer, SequencerConfig};

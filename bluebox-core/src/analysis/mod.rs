pub mod goertzel;
pub mod tone;

pub use goertzel::GoertzelDetector;
pub use tone::ToneDetector;

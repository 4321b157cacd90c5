use thiserror::Error;

/// Failure inside an output sink.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("no audio output device available")]
    NoDevice,
    #[error("the wav backend requires an output path")]
    MissingOutput,
    #[error("unsupported output sample rate: {0} Hz")]
    SampleRate(f64),
    #[error(transparent)]
    BuildStream(#[from] cpal::BuildStreamError),
    #[error(transparent)]
    PlayStream(#[from] cpal::PlayStreamError),
    #[error("audio stream: {0}")]
    Stream(#[from] cpal::StreamError),
    #[error("wav: {0}")]
    Wav(#[from] hound::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum PlayError {
    #[error(transparent)]
    Sequence(#[from] bluebox_core::Error),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl PlayError {
    /// Errors that end an interactive session rather than just the line.
    pub fn is_fatal(&self) -> bool {
        matches!(self, PlayError::Sequence(bluebox_core::Error::InvalidCode { .. }))
    }
}

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use bluebox_core::{registry, ErrorPolicy, Sequencer, SequencerConfig};
use clap::{ArgGroup, Parser};
use tracing::{debug, error};

use crate::error::BackendError;
use crate::player::Player;
use crate::sink::{Backend, CaptureMode, SinkSettings};

mod error;
mod interactive;
mod logging;
mod player;
mod sink;

/// Generate DTMF and MF tone sequences.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about=None)]
#[clap(group(ArgGroup::new("input").required(true).args(&["sequence", "file", "pipe", "stdin", "interactive"])))]
pub(crate) struct Cli {
    /// Length of each tone in milliseconds.
    #[clap(short, long, env = "BLUEBOX_LENGTH", default_value_t = 22.0)]
    pub length: f64,

    /// Pause between tones in milliseconds.
    #[clap(short, long, env = "BLUEBOX_PAUSE", default_value_t = 40.0)]
    pub pause: f64,

    /// Combined amplitude of the two tones, in (0, 1].
    #[clap(short, long, env = "BLUEBOX_AMPLITUDE", default_value_t = 1.0)]
    pub amplitude: f64,

    #[clap(short, long, env = "BLUEBOX_SAMPLE_RATE", default_value_t = 44100.0)]
    pub sample_rate: f64,

    #[clap(short, long, env = "BLUEBOX_CHANNELS", default_value_t = 1)]
    pub channels: u16,

    /// Frequency scheme, e.g. dtmf, mf.
    #[clap(short, long, env = "BLUEBOX_MF", default_value = "dtmf")]
    pub mf: String,

    #[clap(short, long, arg_enum, env = "BLUEBOX_BACKEND", default_value = "device")]
    pub backend: Backend,

    /// What the capture backend does with samples: print each sequence,
    /// or accumulate and print everything at exit.
    #[clap(long, arg_enum, env = "BLUEBOX_CAPTURE_MODE", default_value = "print")]
    pub capture_mode: CaptureMode,

    /// Output file path (required for the wav backend).
    #[clap(short, long, env = "BLUEBOX_OUTPUT", parse(from_os_str))]
    pub output: Option<PathBuf>,

    /// Silence before and after the whole sequence, in milliseconds.
    #[clap(short = 'r', long, env = "BLUEBOX_PAD_PAUSE", default_value_t = 150.0)]
    pub pad_pause_duration: f64,

    /// Debug logging; also stops on the first invalid code.
    #[clap(short, long)]
    pub debug: bool,

    /// Stop on the first invalid code instead of skipping it.
    #[clap(long)]
    pub stop_on_error: bool,

    /// Read the sequence from a file.
    #[clap(short, long, parse(from_os_str))]
    pub file: Option<PathBuf>,

    /// Read the sequence from a named pipe.
    #[clap(short = 'P', long, parse(from_os_str))]
    pub pipe: Option<PathBuf>,

    /// Read the sequence from stdin.
    #[clap(short = 'S', long)]
    pub stdin: bool,

    #[clap(short, long)]
    pub interactive: bool,

    /// The sequence of codes to play.
    pub sequence: Option<String>,
}

impl Cli {
    fn error_policy(&self) -> ErrorPolicy {
        if self.debug || self.stop_on_error {
            ErrorPolicy::Halt
        } else {
            ErrorPolicy::Skip
        }
    }

    fn sequencer_config(&self) -> SequencerConfig {
        SequencerConfig {
            tone_length_ms: self.length,
            pause_ms: self.pause,
            padding_ms: self.pad_pause_duration,
            amplitude: self.amplitude,
            sample_rate: self.sample_rate,
            channels: self.channels,
            error_policy: self.error_policy(),
        }
    }

    fn sink_settings(&self) -> Result<SinkSettings, BackendError> {
        SinkSettings::new(self.sample_rate, self.channels)
    }
}

/// One sequence per non-blank line, trimmed.
fn split_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

fn read_codes(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("reading sequence from {}", path.display()))
}

fn run(cli: Cli) -> Result<()> {
    let scheme = registry().create(&cli.mf)?;
    let sequencer = Sequencer::new(scheme, cli.sequencer_config())?;
    debug!(?sequencer, backend = ?cli.backend, "configured");

    let settings = cli.sink_settings().context("opening output")?;
    let output = cli.output.clone();
    let mut player = Player::with_factory(sequencer, || sink::open(cli.backend, settings, output, cli.capture_mode))
        .context("opening output")?;

    if cli.interactive {
        interactive::run(&mut player)?;
    } else if let Some(codes) = &cli.sequence {
        player.play(codes)?;
    } else {
        let text = if let Some(path) = &cli.file {
            read_codes(path)?
        } else if let Some(path) = &cli.pipe {
            read_codes(path)?
        } else {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text).context("reading sequence from stdin")?;
            text
        };
        player.play_all(split_lines(&text))?;
    }

    player.finish().context("closing output")?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.debug);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        },
    }
}

use anyhow::Result;
use console::style;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{debug, error};

use crate::player::Player;

const PROMPT: &str = "Sequence: ";

#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Help,
    Codes,
    Exit,
    Play(&'a str),
}

fn parse(line: &str) -> Option<Command<'_>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let command = match line.to_ascii_lowercase().as_str() {
        "help" => Command::Help,
        "codes" => Command::Codes,
        "exit" | "quit" => Command::Exit,
        _ => Command::Play(line),
    };
    Some(command)
}

fn print_help() {
    println!("{}", style("Commands:").bold());
    println!("  {}  Exit interactive mode", style("exit, quit").cyan());
    println!("  {}        Show this help message", style("help").cyan());
    println!("  {}       Show valid codes for the current scheme", style("codes").cyan());
    println!("Or enter a sequence of tones to play.");
}

fn print_codes(player: &Player) {
    let scheme = player.sequencer().scheme();
    let codes = scheme.valid_codes().into_iter().collect::<Vec<_>>().join(", ");
    println!("{} {}", style(format!("Valid {} codes:", scheme.name())).bold(), style(codes).green());
}

/// Reads code strings from the terminal until `exit`, EOF or Ctrl-C.
/// Errors on one line are logged and the prompt continues, except a halting
/// invalid code, which ends the session with that error.
pub fn run(player: &mut Player) -> Result<()> {
    let mut editor = DefaultEditor::new()?;

    println!("Entering interactive mode.");
    println!("Type {} for commands, {} to quit.", style("help").cyan(), style("exit").cyan());

    loop {
        let line = match editor.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                player.stop();
                println!("Exiting...");
                break;
            },
            Err(ReadlineError::Eof) => {
                println!("EOF received, exiting...");
                break;
            },
            Err(e) => return Err(e.into()),
        };

        let Some(command) = parse(&line) else {
            continue;
        };
        if let Err(e) = editor.add_history_entry(line.trim()) {
            debug!("history: {e}");
        }

        match command {
            Command::Help => print_help(),
            Command::Codes => print_codes(player),
            Command::Exit => {
                println!("Exiting...");
                break;
            },
            Command::Play(codes) => {
                if let Err(e) = player.play(codes) {
                    if e.is_fatal() {
                        return Err(e.into());
                    }
                    error!("{e}");
                }
            },
        }
    }

    Ok(())
}

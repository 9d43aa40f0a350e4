//! User controls. A background thread turns text commands from stdin into
//! [`InputEvent`]s and hands them to the frame loop over a channel, which
//! drains it without blocking once per frame.

use crossbeam::channel::{Receiver, Sender};
use log::{debug, error, info, warn};
use std::io::{self, BufRead};
use std::thread;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Start,
    TiltLeft,
    TiltRight,
    Quit,
}

impl InputEvent {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "s" | "start" => Some(InputEvent::Start),
            "l" | "left" => Some(InputEvent::TiltLeft),
            "r" | "right" => Some(InputEvent::TiltRight),
            "q" | "quit" | "exit" => Some(InputEvent::Quit),
            _ => None,
        }
    }
}

pub const HELP: &str = "commands: start (s), left (l), right (r), quit (q)";

/// Forwards every recognised line of `reader` to `sender` until the reader
/// ends, a quit command is read, or the receiving side hangs up.
pub fn forward_commands<R: BufRead>(reader: R, sender: Sender<InputEvent>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to read input: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let Some(event) = InputEvent::parse(&line) else {
            warn!("Unknown command {:?}, {}", line.trim(), HELP);
            continue;
        };
        debug!("Input event: {:?}", event);

        if let Err(e) = sender.send(event) {
            error!("Failed to send input to frame loop: {:?}", e);
            break;
        }
        if event == InputEvent::Quit {
            info!("Quit requested, stopping input thread");
            break;
        }
    }
}

/// Spawns the stdin reader thread and returns the receiving end.
pub fn spawn_stdin_reader() -> io::Result<Receiver<InputEvent>> {
    let (sender, receiver) = crossbeam::channel::unbounded();
    thread::Builder::new()
        .name("stdin-input".to_string())
        .spawn(move || forward_commands(io::stdin().lock(), sender))?;
    Ok(receiver)
}

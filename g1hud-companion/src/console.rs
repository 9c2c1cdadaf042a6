//! Console commands
//!
//! The user drives the companion by typing one command per line on stdin:
//!
//! ```text
//! page <default|music|calendar|rearview|next>
//! on | off | toggle
//! auto <on|off>
//! scan | disconnect
//! status | quit
//! ```
//!
//! SIGINT and SIGTERM ask for the same orderly shutdown as `quit`.

use std::io::{self, BufRead};
use std::process;
use std::str::FromStr;
use std::thread;

use g1hud_core::page::Page;
use log::{debug, info, warn};
use thiserror::Error;

use crate::channels::USER_COMMANDS;

/// One user action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCommand {
    Page(Page),
    NextPage,
    DisplayOn,
    DisplayOff,
    ToggleDisplay,
    AutoOff(bool),
    Scan,
    Disconnect,
    Status,
    Quit,
}

/// Console parse errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}' (try: page, on, off, toggle, auto, scan, disconnect, status, quit)")]
    Unknown(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error("bad argument '{arg}' for '{command}'")]
    BadArgument { command: &'static str, arg: String },
}

fn on_off(command: &'static str, arg: &str) -> Result<bool, CommandError> {
    match arg.to_ascii_lowercase().as_str() {
        "on" | "true" | "1" => Ok(true),
        "off" | "false" | "0" => Ok(false),
        _ => Err(CommandError::BadArgument {
            command,
            arg: arg.to_string(),
        }),
    }
}

impl FromStr for UserCommand {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let command = words.next().ok_or(CommandError::Empty)?.to_ascii_lowercase();
        let arg = words.next();

        match command.as_str() {
            "page" | "p" => {
                let arg = arg.ok_or(CommandError::MissingArgument("page"))?;
                if arg.eq_ignore_ascii_case("next") {
                    Ok(UserCommand::NextPage)
                } else {
                    Page::from_name(arg)
                        .map(UserCommand::Page)
                        .ok_or_else(|| CommandError::BadArgument {
                            command: "page",
                            arg: arg.to_string(),
                        })
                }
            }
            "next" | "n" => Ok(UserCommand::NextPage),
            "on" => Ok(UserCommand::DisplayOn),
            "off" => Ok(UserCommand::DisplayOff),
            "toggle" | "t" => Ok(UserCommand::ToggleDisplay),
            "auto" => {
                let arg = arg.ok_or(CommandError::MissingArgument("auto"))?;
                on_off("auto", arg).map(UserCommand::AutoOff)
            }
            "scan" | "connect" => Ok(UserCommand::Scan),
            "disconnect" => Ok(UserCommand::Disconnect),
            "status" | "s" => Ok(UserCommand::Status),
            "quit" | "exit" | "q" => Ok(UserCommand::Quit),
            _ => Err(CommandError::Unknown(command)),
        }
    }
}

/// Queue a `quit` without blocking; false if the command queue is full
pub fn request_stop() -> bool {
    USER_COMMANDS.try_send(UserCommand::Quit).is_ok()
}

/// Route SIGINT/SIGTERM into the command queue
///
/// The first signal requests an orderly shutdown. A second one exits
/// immediately.
pub fn install_signal_handler() -> Result<(), ctrlc::Error> {
    let mut stopping = false;
    ctrlc::set_handler(move || {
        if stopping {
            warn!("Second signal, exiting without shutdown");
            process::exit(130);
        }
        stopping = true;
        info!("Signal received, shutting down");
        if !request_stop() {
            warn!("Command queue full, signal again to exit");
        }
    })
}

/// Read commands from stdin on a background thread
///
/// End of input stops the reader but leaves the companion running.
pub fn spawn_stdin_reader() -> io::Result<()> {
    thread::Builder::new()
        .name("console".into())
        .spawn(|| {
            for line in io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        warn!("Console read failed: {}", e);
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<UserCommand>() {
                    Ok(command) => {
                        debug!("Console: {:?}", command);
                        embassy_futures::block_on(USER_COMMANDS.send(command));
                        if command == UserCommand::Quit {
                            return;
                        }
                    }
                    Err(e) => warn!("{}", e),
                }
            }
            info!("Console closed");
        })?;
    Ok(())
}

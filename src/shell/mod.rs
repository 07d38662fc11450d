//! Msh - Shell Module
//!
//! The Shell owns the prompt loop and the interpreter state: the
//! termination encoding of the last foreground command and the session
//! configuration. Signal dispositions, process creation, and background
//! reaping live in the submodules.

use std::fmt;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;
use std::process;

use atty::Stream;
use failure::{Fail, ResultExt};
use log::info;
use nix::errno::Errno;
use nix::unistd::{self, Pid};

use crate::builtins;
use crate::core::{expansion, parser::Command, MAX_LINE_LEN};
use crate::errors::{Error, ErrorKind, Result};

pub mod execute_command;
pub mod reaper;
pub mod signals;

const PROMPT: &str = ": ";
const COMMENT_CHAR: char = '#';

/// Termination encoding of a child process: either a normal exit with a
/// code, or death by a signal.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TerminationStatus {
    /// The process exited normally with the given code.
    Exited(i32),
    /// The process was terminated by the given signal number.
    Signaled(i32),
}

impl TerminationStatus {
    /// Maps the encoding to an exit code for the shell itself, following
    /// the shell convention of 128 + N for signal deaths.
    pub fn code(self) -> i32 {
        match self {
            TerminationStatus::Exited(code) => code,
            TerminationStatus::Signaled(signal) => 128 + signal,
        }
    }
}

impl Default for TerminationStatus {
    fn default() -> TerminationStatus {
        TerminationStatus::Exited(0)
    }
}

impl fmt::Display for TerminationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            TerminationStatus::Exited(code) => write!(f, "exit value {}", code),
            TerminationStatus::Signaled(signal) => write!(f, "terminated by signal {}", signal),
        }
    }
}

/// Policy object to control a Shell's behavior
#[derive(Clone, Copy, Debug)]
pub struct ShellConfig {
    /// Determines if some messages (e.g. "exit") should be displayed.
    display_messages: bool,

    /// Determines if child processes get the default stop-signal
    /// disposition instead of inheriting the shell's toggle handler.
    reset_stop_signal_in_children: bool,
}

impl ShellConfig {
    /// Creates an interactive shell configuration, e.g. messages are
    /// displayed.
    pub fn interactive() -> ShellConfig {
        ShellConfig {
            display_messages: true,
            reset_stop_signal_in_children: false,
        }
    }

    /// Creates a noninteractive shell configuration for scripts and
    /// one-shot command strings: fewer messages are displayed.
    pub fn noninteractive() -> ShellConfig {
        Default::default()
    }

    /// Configures whether children have the stop signal restored to its
    /// default disposition before exec.
    pub fn reset_stop_signal_in_children(mut self, reset: bool) -> ShellConfig {
        self.reset_stop_signal_in_children = reset;
        self
    }
}

impl Default for ShellConfig {
    fn default() -> ShellConfig {
        ShellConfig {
            display_messages: false,
            reset_stop_signal_in_children: false,
        }
    }
}

/// Msh Shell
#[derive(Debug)]
pub struct Shell {
    /// Termination encoding of the last foreground command.
    last_status: TerminationStatus,
    config: ShellConfig,
    /// Is `false` if the shell is running a script or its input is not a
    /// terminal.
    is_interactive: bool,
}

impl Shell {
    /// Constructs a new Shell and installs the interpreter's signal
    /// dispositions.
    pub fn new(config: ShellConfig) -> Result<Shell> {
        signals::install_interpreter_dispositions()?;

        let shell = Shell {
            last_status: Default::default(),
            config,
            is_interactive: atty::is(Stream::Stdin),
        };

        info!("msh started up");
        Ok(shell)
    }

    /// Returns `true` if the shell is reading commands from a terminal.
    pub fn is_interactive(&self) -> bool {
        self.is_interactive
    }

    /// Termination encoding of the most recent foreground command.
    pub fn last_status(&self) -> TerminationStatus {
        self.last_status
    }

    pub(crate) fn set_last_status(&mut self, status: TerminationStatus) {
        self.last_status = status;
    }

    /// Prompts for and reads the next input line.
    /// Returns `None` when end of file is reached.
    fn prompt(&mut self) -> Result<Option<String>> {
        if self.is_interactive {
            print!("{}", PROMPT);
            io::stdout().flush().context(ErrorKind::Io)?;
        }

        read_line()
    }

    /// Runs commands from stdin until EOF is received.
    pub fn execute_from_stdin(&mut self) {
        loop {
            let input = match self.prompt() {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    // The stop-signal handler already wrote its notice; a
                    // fresh prompt is all an interrupted read needs.
                    if *e.kind() != ErrorKind::ReadInterrupted {
                        eprintln!("msh: {}", e);
                    }
                    continue;
                }
            };

            let temp_result = self.execute_command_string(&input);
            if let Err(ref e) = temp_result {
                eprintln!("msh: {}", e);
            }
            log_if_err!(temp_result, "execute_command_string");
        }
    }

    /// Expands, parses, and dispatches a single command line, then polls
    /// for finished background children.
    pub fn execute_command_string(&mut self, input: &str) -> Result<()> {
        let result = self.dispatch(input);

        // The poll runs after every dispatch, builtins and no-ops included.
        reaper::reap_finished_children();

        result
    }

    /// Runs commands from a script file, one per line. A failing line is
    /// reported and the script continues, matching interactive behavior.
    pub fn execute_commands_from_file(&mut self, path: &Path) -> Result<()> {
        let mut f = File::open(path).context(ErrorKind::Io)?;
        let mut buffer = String::new();
        f.read_to_string(&mut buffer)
            .with_context(|_| ErrorKind::Io)?;

        for line in buffer.split('\n') {
            let temp_result = self.execute_command_string(line);
            if let Err(ref e) = temp_result {
                eprintln!("msh: {}", e);
            }
            log_if_err!(temp_result, "execute_command_string");
        }

        Ok(())
    }

    fn dispatch(&mut self, input: &str) -> Result<()> {
        let input = input.trim();

        // Comments and blank lines never reach the parser.
        if input.is_empty() || input.starts_with(COMMENT_CHAR) {
            return Ok(());
        }
        if input.len() > MAX_LINE_LEN {
            return Err(Error::input_too_long(input.len()));
        }

        let expanded = expansion::expand_pid(input, Pid::this());
        let command = match Command::parse(&expanded)? {
            Some(command) => command,
            None => return Ok(()),
        };

        if builtins::is_builtin(&command.argv) {
            builtins::run(self, &command.argv)
        } else {
            execute_command::execute(self, &command)
        }
    }

    /// Exit the shell.
    ///
    /// Exit the shell with a status of n, or with the last foreground
    /// command's status code when n is None. Like bash and its
    /// descendents, codes are folded into 0-255: positive n becomes
    /// n % 256 and negative n becomes (256 + n) % 256.
    pub fn exit(&mut self, n: Option<i32>) -> ! {
        if self.config.display_messages {
            println!("exit");
        }

        let code = n.unwrap_or_else(|| self.last_status.code());
        let code_like_u8 = if code < 0 {
            (256 + code) % 256
        } else {
            code % 256
        };

        info!("msh has shut down");
        process::exit(code_like_u8);
    }
}

/// Reads one line from standard input with raw `read(2)` calls so that an
/// interrupting signal surfaces as `ReadInterrupted` instead of silently
/// restarting the read. Returns `None` at end of file.
fn read_line() -> Result<Option<String>> {
    let mut line = Vec::with_capacity(64);
    let mut byte = [0_u8; 1];

    loop {
        match unistd::read(libc::STDIN_FILENO, &mut byte) {
            Ok(0) => {
                if line.is_empty() {
                    return Ok(None);
                }
                break;
            }
            Ok(_) => {
                if byte[0] == b'\n' {
                    break;
                }
                line.push(byte[0]);
                if line.len() > MAX_LINE_LEN {
                    drain_current_line()?;
                    return Err(Error::input_too_long(line.len()));
                }
            }
            Err(nix::Error::Sys(Errno::EINTR)) => return Err(ErrorKind::ReadInterrupted.into()),
            Err(e) => return Err(e.context(ErrorKind::Nix).into()),
        }
    }

    Ok(Some(String::from_utf8_lossy(&line).into_owned()))
}

/// Discards the rest of an overlong line so the next prompt starts clean.
fn drain_current_line() -> Result<()> {
    let mut byte = [0_u8; 1];
    loop {
        match unistd::read(libc::STDIN_FILENO, &mut byte) {
            Ok(0) => return Ok(()),
            Ok(_) if byte[0] == b'\n' => return Ok(()),
            Ok(_) => {}
            Err(nix::Error::Sys(Errno::EINTR)) => {}
            Err(e) => return Err(e.context(ErrorKind::Nix).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn termination_status_reports_exit_value() {
        assert_eq!(TerminationStatus::Exited(3).to_string(), "exit value 3");
        assert_eq!(TerminationStatus::Exited(0).to_string(), "exit value 0");
    }

    #[test]
    fn termination_status_reports_signal() {
        assert_eq!(
            TerminationStatus::Signaled(9).to_string(),
            "terminated by signal 9"
        );
    }

    #[test]
    fn termination_status_defaults_to_success() {
        assert_eq!(TerminationStatus::default(), TerminationStatus::Exited(0));
    }

    #[test]
    fn signal_deaths_map_past_128() {
        assert_eq!(TerminationStatus::Exited(3).code(), 3);
        assert_eq!(TerminationStatus::Signaled(15).code(), 143);
    }
}

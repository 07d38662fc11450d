//! Error module. See the [failure](https://crates.io/crates/failure) crate for details.

use std::fmt;
use std::result;

use failure::{Backtrace, Context, Fail};

/// A specialized `Result` type for shell operations.
pub type Result<T> = result::Result<T, Error>;

/// The error type for shell operations.
#[derive(Debug)]
pub struct Error {
    ctx: Context<ErrorKind>,
}

impl Error {
    /// Returns the kind of this error.
    pub fn kind(&self) -> &ErrorKind {
        self.ctx.get_context()
    }

    pub(crate) fn builtin_command<T: AsRef<str>>(message: T, code: i32) -> Error {
        Error::from(ErrorKind::BuiltinCommand {
            message: message.as_ref().to_string(),
            code,
        })
    }

    pub(crate) fn input_too_long(length: usize) -> Error {
        Error::from(ErrorKind::InputTooLong(length))
    }

    pub(crate) fn too_many_arguments(count: usize) -> Error {
        Error::from(ErrorKind::TooManyArguments(count))
    }
}

impl Fail for Error {
    fn cause(&self) -> Option<&dyn Fail> {
        self.ctx.cause()
    }

    fn backtrace(&self) -> Option<&Backtrace> {
        self.ctx.backtrace()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.ctx.fmt(f)
    }
}

/// The specific kind of an [`Error`](struct.Error.html).
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// A builtin command failed; `code` is its would-be exit status.
    BuiltinCommand {
        /// Message to display to the user.
        message: String,
        /// Exit status the builtin reports.
        code: i32,
    },
    /// An input line exceeded the line-length bound.
    InputTooLong(usize),
    /// A command carried more arguments than the argument bound allows.
    TooManyArguments(usize),
    /// A signal interrupted the read of an input line.
    ReadInterrupted,
    /// I/O error occurred.
    Io,
    /// A system call failed.
    Nix,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ErrorKind::BuiltinCommand { ref message, .. } => write!(f, "{}", message),
            ErrorKind::InputTooLong(length) => {
                write!(f, "input line too long: {} bytes", length)
            }
            ErrorKind::TooManyArguments(count) => write!(f, "too many arguments: {}", count),
            ErrorKind::ReadInterrupted => write!(f, "read interrupted by signal"),
            ErrorKind::Io => write!(f, "I/O error occurred"),
            ErrorKind::Nix => write!(f, "system call error occurred"),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error::from(Context::new(kind))
    }
}

impl From<Context<ErrorKind>> for Error {
    fn from(ctx: Context<ErrorKind>) -> Error {
        Error { ctx }
    }
}

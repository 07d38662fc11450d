//! Msh Parser
//!
//! Splits an expanded input line on whitespace runs into an argument
//! list, recognizing the `<` and `>` redirect tokens and a trailing `&`
//! background marker.

use log::debug;

use crate::errors::{Error, Result};

/// Most arguments a single command may carry.
pub const MAX_ARGS: usize = 512;

const INPUT_REDIRECT_TOKEN: &str = "<";
const OUTPUT_REDIRECT_TOKEN: &str = ">";
const BACKGROUND_TOKEN: &str = "&";

/// A parsed command line.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Command {
    /// The program and its arguments, program first.
    pub argv: Vec<String>,
    /// Redirect standard input from this file, if set.
    pub stdin: Option<String>,
    /// Redirect standard output to this file, if set.
    pub stdout: Option<String>,
    /// Run the command without blocking the prompt loop.
    pub background: bool,
}

impl Command {
    /// Parses an input line into a command.
    ///
    /// Returns `Ok(None)` when no arguments remain once the special tokens
    /// are stripped. A redirect token with nothing after it leaves that
    /// redirect unset; a repeated redirect keeps the last path; `&`
    /// anywhere but the end of the line is an ordinary argument.
    pub fn parse(input: &str) -> Result<Option<Command>> {
        let tokens: Vec<&str> = input.split_whitespace().collect();
        let mut command = Command::default();

        let mut index = 0;
        while index < tokens.len() {
            match tokens[index] {
                INPUT_REDIRECT_TOKEN => {
                    if let Some(path) = tokens.get(index + 1) {
                        command.stdin = Some((*path).to_string());
                        index += 1;
                    }
                }
                OUTPUT_REDIRECT_TOKEN => {
                    if let Some(path) = tokens.get(index + 1) {
                        command.stdout = Some((*path).to_string());
                        index += 1;
                    }
                }
                BACKGROUND_TOKEN if index == tokens.len() - 1 => {
                    command.background = true;
                }
                argument => command.argv.push(argument.to_string()),
            }
            index += 1;
        }

        if command.argv.len() > MAX_ARGS {
            return Err(Error::too_many_arguments(command.argv.len()));
        }

        if command.argv.is_empty() {
            return Ok(None);
        }

        debug!("parsed command: {:?}", command);
        Ok(Some(command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::errors::ErrorKind;

    fn parse(input: &str) -> Option<Command> {
        Command::parse(input).expect("parse should succeed")
    }

    #[test]
    fn parses_arguments_and_redirections() {
        let command = parse("ls -la < in.txt > out.txt").unwrap();
        assert_eq!(command.argv, vec!["ls", "-la"]);
        assert_eq!(command.stdin, Some("in.txt".to_string()));
        assert_eq!(command.stdout, Some("out.txt".to_string()));
        assert!(!command.background);
    }

    #[test]
    fn redirections_are_order_independent() {
        let command = parse("sort > sorted.txt < unsorted.txt -r").unwrap();
        assert_eq!(command.argv, vec!["sort", "-r"]);
        assert_eq!(command.stdin, Some("unsorted.txt".to_string()));
        assert_eq!(command.stdout, Some("sorted.txt".to_string()));
    }

    #[test]
    fn trailing_marker_backgrounds_the_command() {
        let command = parse("sleep 5 &").unwrap();
        assert_eq!(command.argv, vec!["sleep", "5"]);
        assert!(command.background);
    }

    #[test]
    fn embedded_marker_is_an_ordinary_argument() {
        let command = parse("echo & hi").unwrap();
        assert_eq!(command.argv, vec!["echo", "&", "hi"]);
        assert!(!command.background);
    }

    #[test]
    fn missing_redirect_target_is_tolerated() {
        let command = parse("cmd <").unwrap();
        assert_eq!(command.argv, vec!["cmd"]);
        assert!(command.stdin.is_none());
    }

    #[test]
    fn repeated_redirect_keeps_the_last_path() {
        let command = parse("cmd < a < b").unwrap();
        assert_eq!(command.stdin, Some("b".to_string()));
    }

    #[test]
    fn lines_without_arguments_yield_no_command() {
        assert!(parse("").is_none());
        assert!(parse("   ").is_none());
        assert!(parse("&").is_none());
        assert!(parse("< in.txt > out.txt").is_none());
    }

    #[test]
    fn too_many_arguments_is_an_error() {
        let input = vec!["arg"; MAX_ARGS + 1].join(" ");
        let err = Command::parse(&input).unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::TooManyArguments(MAX_ARGS + 1));
    }
}

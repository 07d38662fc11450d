//! Pure command-line logic: sentinel expansion and tokenization.

pub mod expansion;
pub mod parser;

/// Longest accepted input line, in bytes.
pub const MAX_LINE_LEN: usize = 2048;

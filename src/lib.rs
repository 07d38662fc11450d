//! Msh - Mini Shell
//!
//! A small command interpreter for POSIX systems: one command per line,
//! `$$` pid expansion, `<`/`>` redirection, a trailing `&` background
//! marker, and three builtins (`cd`, `exit`, `status`). Background
//! children are collected with a non-blocking wait-any poll after every
//! dispatched command.

#![deny(
    missing_docs,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces
)]

#[macro_use]
mod macros;

pub mod builtins;
pub mod core;
pub mod errors;
pub mod shell;

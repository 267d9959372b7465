//! A minimal interactive command shell.
//!
//! Each line is read, recorded in a bounded history, split on whitespace and then
//! either handled by a built-in (`cd`, `pwd`, `help`, `exit`, `history`) or run as an
//! external program. See [`shell::Shell`] for the run loop.

pub mod builtins;
pub mod completion;
pub mod config;
pub mod error;
pub mod history;
pub mod launcher;
pub mod parser;
pub mod reader;
pub mod repl;
pub mod shell;
pub mod util;

pub use error::ShellError;

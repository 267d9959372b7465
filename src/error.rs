// error.rs

use nix::errno::Errno;
use rustyline::error::ReadlineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("allocation error")]
    Allocation,
    #[error("expected argument to \"{0}\"")]
    MissingArgument(&'static str),
    #[error("cd: {path}: {source}")]
    ChangeDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("pwd: {0}")]
    CurrentDir(#[source] std::io::Error),
    #[error("error creating process `{program}`: {reason} (error code {code})")]
    Launch {
        program: String,
        reason: &'static str,
        code: i32,
    },
    #[error("write error: {0}")]
    Output(#[source] std::io::Error),
    #[error("argument contains a nul byte: {0:?}")]
    NulByte(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("line editor: {0}")]
    Editor(#[from] ReadlineError),
}

impl ShellError {
    pub fn launch(program: &str, errno: Errno) -> Self {
        ShellError::Launch {
            program: program.to_string(),
            reason: errno.desc(),
            code: errno as i32,
        }
    }

    /// Fatal errors end the shell; everything else is reported and the loop goes on.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ShellError::Allocation | ShellError::Io(_) | ShellError::Editor(_))
    }
}

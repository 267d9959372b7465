// repl.rs

use std::io::{self, IsTerminal};

use anyhow::Context as _;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Config as EditorConfig, Editor};

use crate::completion::CommandCompleter;
use crate::config::Config;
use crate::error::ShellError;
use crate::reader::{LineSource, StreamReader};
use crate::shell::Shell;

/// Terminal input through rustyline, with command-word completion and line recall.
pub struct EditorReader {
    editor: Editor<CommandCompleter, DefaultHistory>,
}

impl EditorReader {
    pub fn new(builtins: &[&'static str]) -> anyhow::Result<Self> {
        let config = EditorConfig::builder().completion_type(CompletionType::List).build();
        let mut editor = Editor::with_config(config).context("failed to create line editor")?;
        editor.set_helper(Some(CommandCompleter::new(builtins)));
        Ok(Self { editor })
    }
}

impl LineSource for EditorReader {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, ShellError> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                let _ = self.editor.add_history_entry(line.as_str());
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

pub fn start(config: &Config) -> anyhow::Result<()> {
    let mut shell = Shell::new(config, io::stdout(), io::stderr());
    if io::stdin().is_terminal() {
        log::debug!("interactive input");
        let mut input = EditorReader::new(shell.builtin_names())?;
        shell.run(&mut input)?;
    } else {
        let mut input = StreamReader::new(io::stdin().lock(), io::stdout());
        shell.run(&mut input)?;
    }
    Ok(())
}

// completion.rs

use itertools::Itertools;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Context, Helper};

/// Completes the command word from the built-in names and executables on `PATH`.
pub struct CommandCompleter {
    builtins: Vec<&'static str>,
}

impl CommandCompleter {
    pub fn new(builtins: &[&'static str]) -> Self {
        Self { builtins: builtins.to_vec() }
    }

    pub fn candidates(&self, prefix: &str) -> Vec<String> {
        let builtins = self
            .builtins
            .iter()
            .filter(|b| b.starts_with(prefix))
            .map(|b| b.to_string());
        builtins.chain(path_executables(prefix)).sorted().dedup().collect()
    }
}

fn path_executables(prefix: &str) -> Vec<String> {
    let Ok(path_var) = std::env::var("PATH") else {
        return Vec::new();
    };
    let mut names = Vec::new();
    for dir in path_var.split(':').filter(|d| !d.is_empty()) {
        let Ok(entries) = std::fs::read_dir(dir) else { continue };
        for entry in entries.flatten() {
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else { continue };
            if !name.starts_with(prefix) {
                continue;
            }
            if let Ok(meta) = entry.metadata() {
                #[cfg(unix)]
                let is_exec = {
                    use std::os::unix::fs::PermissionsExt;
                    meta.is_file() && meta.permissions().mode() & 0o111 != 0
                };
                #[cfg(not(unix))]
                let is_exec = meta.is_file();
                if is_exec {
                    names.push(name.to_string());
                }
            }
        }
    }
    names
}

impl Completer for CommandCompleter {
    type Candidate = Pair;
    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Result<(usize, Vec<Pair>), ReadlineError> {
        let prefix = &line[..pos];
        let start = prefix.len() - prefix.trim_start().len();
        let word = &prefix[start..];
        // Only the command word is completed.
        if word.contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }
        let completions = self
            .candidates(word)
            .into_iter()
            .map(|n| Pair { display: n.clone(), replacement: format!("{} ", n) })
            .collect();
        Ok((start, completions))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        None
    }
}

impl Highlighter for CommandCompleter {}

impl Validator for CommandCompleter {
    fn validate(&self, _ctx: &mut ValidationContext) -> Result<ValidationResult, ReadlineError> {
        Ok(ValidationResult::Valid(None))
    }
}

impl Helper for CommandCompleter {}

// config.rs

use std::env;

pub const DEFAULT_PROMPT: &str = "SimpleShell> ";
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

const PROMPT_VAR: &str = "SIMPLESHELL_PROMPT";
const HISTSIZE_VAR: &str = "SIMPLESHELL_HISTSIZE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub prompt: String,
    pub history_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_vars(env::var(PROMPT_VAR).ok(), env::var(HISTSIZE_VAR).ok())
    }

    fn from_vars(prompt: Option<String>, histsize: Option<String>) -> Self {
        let mut config = Config::default();
        if let Some(prompt) = prompt {
            config.prompt = prompt;
        }
        if let Some(size) = histsize {
            match size.trim().parse::<usize>() {
                Ok(n) => config.history_capacity = n,
                Err(e) => log::warn!("ignoring {}={:?}: {}", HISTSIZE_VAR, size, e),
            }
        }
        config
    }
}

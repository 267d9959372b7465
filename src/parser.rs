// parser.rs

use crate::error::ShellError;

pub const TOKEN_DELIMITERS: &[char] = &[' ', '\t', '\r', '\n', '\x07'];
const TOKEN_BUFFER: usize = 64;

/// Splits `line` on runs of delimiter characters. Tokens borrow from `line`.
pub fn split_line(line: &str) -> Result<Vec<&str>, ShellError> {
    let mut tokens: Vec<&str> = Vec::new();
    tokens.try_reserve_exact(TOKEN_BUFFER).map_err(|_| ShellError::Allocation)?;
    for token in line.split(TOKEN_DELIMITERS).filter(|t| !t.is_empty()) {
        if tokens.len() == tokens.capacity() {
            tokens.try_reserve_exact(TOKEN_BUFFER).map_err(|_| ShellError::Allocation)?;
        }
        tokens.push(token);
    }
    Ok(tokens)
}

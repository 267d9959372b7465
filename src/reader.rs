// reader.rs

use std::io::{ErrorKind, Read, Write};
use crate::error::ShellError;

const BUFFER_SIZE: usize = 1024;

/// Something the shell can pull input lines from.
///
/// `Ok(None)` means the input is exhausted.
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, ShellError>;
}

/// Plain stream input: writes the prompt to `prompt_out`, then reads one line from `input`.
pub struct StreamReader<R, W> {
    input: R,
    prompt_out: W,
}

impl<R: Read, W: Write> StreamReader<R, W> {
    pub fn new(input: R, prompt_out: W) -> Self {
        Self { input, prompt_out }
    }
}

impl<R: Read, W: Write> LineSource for StreamReader<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, ShellError> {
        write!(self.prompt_out, "{}", prompt)?;
        self.prompt_out.flush()?;
        read_line(&mut self.input)
    }
}

/// Reads bytes one at a time up to `\n` or end of stream. The newline is not returned.
///
/// The buffer starts at `BUFFER_SIZE` bytes and grows by the same amount whenever it
/// fills up. Failing to grow it is reported as `ShellError::Allocation`.
pub fn read_line<R: Read + ?Sized>(input: &mut R) -> Result<Option<String>, ShellError> {
    let mut buffer: Vec<u8> = Vec::new();
    buffer.try_reserve_exact(BUFFER_SIZE).map_err(|_| ShellError::Allocation)?;
    let mut byte = [0u8; 1];
    loop {
        match input.read(&mut byte) {
            Ok(0) if buffer.is_empty() => return Ok(None),
            Ok(0) => break,
            Ok(_) if byte[0] == b'\n' => break,
            Ok(_) => {
                if buffer.len() == buffer.capacity() {
                    buffer.try_reserve_exact(BUFFER_SIZE).map_err(|_| ShellError::Allocation)?;
                }
                buffer.push(byte[0]);
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(Some(String::from_utf8_lossy(&buffer).into_owned()))
}

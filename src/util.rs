// util.rs

use std::io::Write;

pub fn writeln_ignore_broken_pipe<W: Write + ?Sized, S: AsRef<str>>(w: &mut W, s: S) -> std::io::Result<()> {
    match writeln!(w, "{}", s.as_ref()) {
        Err(ref e) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

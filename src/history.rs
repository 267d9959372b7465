// history.rs

use std::collections::VecDeque;
use std::io::{self, Write};

/// Bounded log of raw input lines, oldest first.
///
/// Once `capacity` entries are stored, recording a new line evicts the oldest.
pub struct History {
    entries: VecDeque<String>,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self { entries: VecDeque::new(), capacity }
    }

    pub fn record(&mut self, line: &str) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(line.to_string());
    }

    /// Writes every entry as `<index> <line>`, 1-based.
    pub fn print_all<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        for (i, entry) in self.entries.iter().enumerate() {
            writeln!(out, "{} {}", i + 1, entry)?;
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn capacity(&self) -> usize {
        self.capacity
    }
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

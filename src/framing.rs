//! Newline framing for the TCP command stream.
//!
//! TCP gives no message boundaries: a command can arrive split over several
//! reads, and a read can end in the middle of a multi-byte character. The
//! [`LineFramer`] buffers bytes until a `\n` and only then yields the line.
use heapless::Vec;

use crate::robot::commands::CommandLine;
use crate::status::bounded;

/// Accumulates received bytes into lines of at most `N` bytes. Bytes past the
/// capacity are dropped up to the next newline.
#[derive(Debug, Default)]
pub struct LineFramer<const N: usize> {
    pending: Vec<u8, N>,
    overflowed: bool,
}

impl<const N: usize> LineFramer<N> {
    pub const fn new() -> Self {
        Self {
            pending: Vec::new(),
            overflowed: false,
        }
    }

    /// Feeds one byte; returns the trimmed line when `byte` terminates a
    /// non-empty one.
    pub fn feed(&mut self, byte: u8) -> Option<CommandLine> {
        if byte != b'\n' {
            if self.pending.push(byte).is_err() {
                self.overflowed = true;
            }
            return None;
        }

        let line = decode(&self.pending);
        let line = line.trim();
        let out = (!line.is_empty()).then(|| bounded(line));
        self.pending.clear();
        self.overflowed = false;
        out
    }

    /// Bytes waiting for their newline.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn overflowed(&self) -> bool {
        self.overflowed
    }
}

/// Longest valid UTF-8 prefix. A character cut by truncation is dropped.
fn decode(bytes: &[u8]) -> &str {
    match core::str::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => core::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or_default(),
    }
}

// src/output/mod.rs

//! The human-readable report stream.
//!
//! Everything the batch "says" (banners, `-> cmd` lines, streamed child
//! output, rotation lines) goes through a [`Console`]. Production writes to
//! stdout; tests capture into a [`memory::MemoryConsole`].

use std::fmt::Debug;
use std::io::Write;

pub mod memory;

pub use memory::MemoryConsole;

/// Sink for report output.
pub trait Console: Send + Sync + Debug {
    /// Write raw bytes as they arrive (child process output).
    fn write_bytes(&self, bytes: &[u8]);

    /// Write a single line of text followed by a newline.
    fn line(&self, text: &str) {
        let mut buf = Vec::with_capacity(text.len() + 1);
        buf.extend_from_slice(text.as_bytes());
        buf.push(b'\n');
        self.write_bytes(&buf);
    }
}

/// Console that writes to the process stdout, flushing every write so child
/// output shows up immediately even when stdout is a pipe.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutConsole;

impl Console for StdoutConsole {
    fn write_bytes(&self, bytes: &[u8]) {
        let mut out = std::io::stdout().lock();
        // A closed stdout must not take the batch down with it.
        let _ = out.write_all(bytes);
        let _ = out.flush();
    }
}

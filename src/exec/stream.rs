// src/exec/stream.rs

//! Draining a child's stdout and stderr onto one console.

use std::io;

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::output::Console;

/// Bytes read per wake-up. Small on purpose: output is forwarded as soon as
/// any of it is available, never held back for a full line.
pub const CHUNK_SIZE: usize = 256;

/// How much each stream produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainStats {
    pub stdout_bytes: u64,
    pub stderr_bytes: u64,
}

/// Forward both streams to `console` in arrival order until each has hit
/// end-of-stream.
///
/// Whichever stream is readable first is read first; each stream has its
/// own end-of-stream flag, so a child that closes stderr early (or never
/// writes to it) keeps being drained on stdout and vice versa. Neither pipe
/// can fill up and stall the child while the other is being waited on.
pub async fn drain_interleaved<O, E>(
    mut stdout: O,
    mut stderr: E,
    console: &dyn Console,
) -> io::Result<DrainStats>
where
    O: AsyncRead + Unpin,
    E: AsyncRead + Unpin,
{
    let mut out_buf = [0u8; CHUNK_SIZE];
    let mut err_buf = [0u8; CHUNK_SIZE];
    let mut stdout_done = false;
    let mut stderr_done = false;
    let mut stats = DrainStats::default();

    while !(stdout_done && stderr_done) {
        tokio::select! {
            res = stdout.read(&mut out_buf), if !stdout_done => {
                match res? {
                    0 => stdout_done = true,
                    n => {
                        console.write_bytes(&out_buf[..n]);
                        stats.stdout_bytes += n as u64;
                    }
                }
            }
            res = stderr.read(&mut err_buf), if !stderr_done => {
                match res? {
                    0 => stderr_done = true,
                    n => {
                        console.write_bytes(&err_buf[..n]);
                        stats.stderr_bytes += n as u64;
                    }
                }
            }
        }
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::MemoryConsole;
    use tokio::io::AsyncWriteExt;

    #[tokio::test]
    async fn drains_until_both_streams_close() {
        let console = MemoryConsole::new();
        let (mut out_w, out_r) = tokio::io::duplex(64);
        let (mut err_w, err_r) = tokio::io::duplex(64);

        // Writers bigger than the pipe capacity: they only finish if the
        // reader keeps draining both sides.
        let writer = tokio::spawn(async move {
            for _ in 0..100 {
                out_w.write_all(b"out-chunk\n").await.unwrap();
                err_w.write_all(b"err\n").await.unwrap();
            }
            drop(err_w);
            for _ in 0..50 {
                out_w.write_all(b"late\n").await.unwrap();
            }
        });

        let stats = drain_interleaved(out_r, err_r, &console).await.unwrap();
        writer.await.unwrap();

        assert_eq!(stats.stdout_bytes, 100 * 10 + 50 * 5);
        assert_eq!(stats.stderr_bytes, 100 * 4);
        let text = console.contents();
        assert_eq!(text.matches("out-chunk").count(), 100);
        assert_eq!(text.matches("err\n").count(), 100);
        assert_eq!(text.matches("late").count(), 50);
    }

    #[tokio::test]
    async fn empty_streams_produce_nothing() {
        let console = MemoryConsole::new();
        let stats = drain_interleaved(tokio::io::empty(), tokio::io::empty(), &console)
            .await
            .unwrap();

        assert_eq!(stats, DrainStats::default());
        assert!(console.contents().is_empty());
    }
}

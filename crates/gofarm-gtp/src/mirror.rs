// ABOUTME: Write-only sinks that receive a copy of every outgoing GTP command
// ABOUTME: Used for audit transcripts; mirror failures never affect protocol semantics

use std::io::Write;

/// A sink that records a copy of every command written to the engine.
///
/// Any `io::Write` works as a mirror: each command is recorded as one
/// line and flushed so a transcript survives a crashed session.
pub trait MirrorSink: Send {
    fn record(&mut self, command: &str) -> std::io::Result<()>;
}

impl<W: Write + Send> MirrorSink for W {
    fn record(&mut self, command: &str) -> std::io::Result<()> {
        writeln!(self, "{command}")?;
        self.flush()
    }
}

//! Destinations for command output.

use std::fmt;
use std::io;

/// Text sink handed to command handlers.
///
/// The id identifies the connection the output goes to, so handlers can keep
/// per-connection state across calls.
pub trait OutputSink: fmt::Write + Send {
    fn id(&self) -> i32;
}

/// Collects output in memory.
#[derive(Debug, Default, Clone)]
pub struct BufferSink {
    id: i32,
    buffer: String,
}

impl BufferSink {
    pub fn new(id: i32) -> Self {
        Self {
            id,
            buffer: String::new(),
        }
    }

    pub fn contents(&self) -> &str {
        &self.buffer
    }

    /// Returns the collected output, leaving the sink empty.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }
}

impl fmt::Write for BufferSink {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.buffer.push_str(s);
        Ok(())
    }
}

impl OutputSink for BufferSink {
    fn id(&self) -> i32 {
        self.id
    }
}

/// Forwards output to an [`io::Write`].
#[derive(Debug)]
pub struct WriterSink<W> {
    id: i32,
    writer: W,
}

impl<W: io::Write + Send> WriterSink<W> {
    pub fn new(id: i32, writer: W) -> Self {
        Self { id, writer }
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(1, io::stdout())
    }
}

impl<W: io::Write + Send> fmt::Write for WriterSink<W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.writer.write_all(s.as_bytes()).map_err(|_| fmt::Error)
    }
}

impl<W: io::Write + Send> OutputSink for WriterSink<W> {
    fn id(&self) -> i32 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write;

    #[test]
    fn test_buffer_sink_collects_and_takes() {
        let mut sink = BufferSink::new(7);
        write!(sink, "a{}", 1).unwrap();
        writeln!(sink, "b").unwrap();

        assert_eq!(sink.id(), 7);
        assert_eq!(sink.contents(), "a1b\n");
        assert_eq!(sink.take(), "a1b\n");
        assert!(sink.contents().is_empty());
    }

    #[test]
    fn test_writer_sink() {
        let mut sink = WriterSink::new(3, Vec::new());
        writeln!(sink, "hello").unwrap();
        assert_eq!(sink.id(), 3);
        assert_eq!(sink.into_inner(), b"hello\n");
    }
}

//! In-memory byte pipe for driving channels across threads.
//!
//! Each `write` call becomes one message on an unbounded mpsc queue. Reads
//! drain queued messages in order and may return fewer bytes than asked
//! for, which exercises `read_exact` the way a socket does. Dropping the
//! writer ends the stream: once the queue is drained, reads return 0.

use std::{
    io::{self, Read, Write},
    sync::mpsc::{self, Receiver, Sender},
};

/// Writing half of a [`pipe`].
#[derive(Debug, Clone)]
pub struct PipeWriter {
    tx: Sender<Vec<u8>>,
}

/// Reading half of a [`pipe`].
#[derive(Debug)]
pub struct PipeReader {
    rx: Receiver<Vec<u8>>,
    pending: Vec<u8>,
    offset: usize,
    max_read: usize,
}

/// Create a connected writer/reader pair.
pub fn pipe() -> (PipeWriter, PipeReader) {
    pipe_with_max_read(usize::MAX)
}

/// Like [`pipe`], but each `read` returns at most `max_read` bytes.
pub fn pipe_with_max_read(max_read: usize) -> (PipeWriter, PipeReader) {
    let (tx, rx) = mpsc::channel();
    let reader = PipeReader { rx, pending: Vec::new(), offset: 0, max_read: max_read.max(1) };
    (PipeWriter { tx }, reader)
}

impl Write for PipeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.tx
            .send(buf.to_vec())
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "pipe reader dropped"))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Read for PipeReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        while self.offset == self.pending.len() {
            match self.rx.recv() {
                Ok(next) => {
                    self.pending = next;
                    self.offset = 0;
                },
                // All writers gone.
                Err(_) => return Ok(0),
            }
        }

        let n = buf.len().min(self.pending.len() - self.offset).min(self.max_read);
        buf[..n].copy_from_slice(&self.pending[self.offset..self.offset + n]);
        self.offset += n;
        Ok(n)
    }
}

/// One side of a bidirectional connection built from two pipes.
#[derive(Debug)]
pub struct Endpoint {
    /// Bytes to the peer
    pub writer: PipeWriter,
    /// Bytes from the peer
    pub reader: PipeReader,
}

/// Two endpoints wired to each other.
pub fn duplex() -> (Endpoint, Endpoint) {
    let (a_writer, b_reader) = pipe();
    let (b_writer, a_reader) = pipe();
    (Endpoint { writer: a_writer, reader: a_reader }, Endpoint { writer: b_writer, reader: b_reader })
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn bytes_arrive_in_order() {
        let (mut writer, mut reader) = pipe();
        writer.write_all(b"hello ").unwrap();
        writer.write_all(b"world").unwrap();
        drop(writer);

        let mut out = String::new();
        reader.read_to_string(&mut out).unwrap();
        assert_eq!(out, "hello world");
    }

    #[test]
    fn short_reads_are_capped() {
        let (mut writer, mut reader) = pipe_with_max_read(3);
        writer.write_all(b"abcdefgh").unwrap();

        let mut buf = [0u8; 8];
        assert_eq!(reader.read(&mut buf).unwrap(), 3);
        assert_eq!(&buf[..3], b"abc");

        reader.read_exact(&mut buf[3..]).unwrap();
        assert_eq!(&buf, b"abcdefgh");
    }

    #[test]
    fn dropped_reader_breaks_the_pipe() {
        let (mut writer, reader) = pipe();
        drop(reader);
        assert_eq!(writer.write(b"x").unwrap_err().kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn duplex_crosses_threads() {
        let (mut a, mut b) = duplex();
        let echo = thread::spawn(move || {
            let mut buf = [0u8; 4];
            b.reader.read_exact(&mut buf).unwrap();
            b.writer.write_all(&buf).unwrap();
        });

        a.writer.write_all(b"ping").unwrap();
        let mut buf = [0u8; 4];
        a.reader.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"ping");
        echo.join().unwrap();
    }
}

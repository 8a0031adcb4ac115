//! Append-only chunked byte buffer backing the [`Writer`](crate::Writer).
//!
//! Output accumulates in a current chunk. When the chunk is full it is closed
//! off (never touched again) and a new chunk, twice as large up to
//! [`MAX_CHUNK`], takes its place. Growing therefore never copies bytes that
//! were already written; the single copy happens when the chunks are
//! concatenated by [`Buffer::build`] or streamed out by [`Buffer::dump_to`].

use std::{collections::VecDeque, fmt, io};

use crate::error::SinkError;

pub(crate) const MIN_CHUNK: usize = 128;
pub(crate) const MAX_CHUNK: usize = 32 * 1024;

#[derive(Debug, Default, Clone)]
pub struct Buffer {
    current: Vec<u8>,
    closed: Vec<Vec<u8>>,
    closed_len: usize,
}

impl Buffer {
    #[cfg(test)]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of bytes written so far.
    #[must_use]
    pub fn size(&self) -> usize {
        self.closed_len + self.current.len()
    }

    #[cfg(test)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Number of chunks holding data, including the open one.
    #[cfg(test)]
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.closed.len() + usize::from(!self.current.is_empty())
    }

    #[inline]
    pub fn push(&mut self, b: u8) {
        if self.current.len() == self.current.capacity() {
            self.grow();
        }
        self.current.push(b);
    }

    pub fn extend(&mut self, mut bytes: &[u8]) {
        while !bytes.is_empty() {
            let room = self.current.capacity() - self.current.len();
            if room == 0 {
                self.grow();
                continue;
            }
            let n = room.min(bytes.len());
            self.current.extend_from_slice(&bytes[..n]);
            bytes = &bytes[n..];
        }
    }

    #[inline]
    pub fn extend_str(&mut self, s: &str) {
        self.extend(s.as_bytes());
    }

    /// Closes the current chunk (if it holds anything) and opens a larger one.
    fn grow(&mut self) {
        let cap = self.current.capacity();
        let next = (cap * 2).clamp(MIN_CHUNK, MAX_CHUNK);
        if self.current.is_empty() {
            self.current.reserve_exact(next);
            return;
        }
        let full = std::mem::replace(&mut self.current, Vec::with_capacity(next));
        self.closed_len += full.len();
        self.closed.push(full);
    }

    /// Concatenates all chunks in order. Leaves the buffer untouched, so
    /// repeated calls give identical results.
    #[must_use]
    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.size());
        for chunk in &self.closed {
            out.extend_from_slice(chunk);
        }
        out.extend_from_slice(&self.current);
        out
    }

    /// Moves the contents out and leaves the buffer empty.
    ///
    /// When everything fits in one chunk the chunk itself is returned without
    /// copying.
    pub fn take(&mut self) -> Vec<u8> {
        if self.closed.is_empty() {
            return std::mem::take(&mut self.current);
        }
        let out = self.build();
        self.clear();
        out
    }

    pub fn clear(&mut self) {
        self.closed.clear();
        self.closed_len = 0;
        self.current = Vec::new();
    }

    /// Drains the buffer into `sink`, chunk by chunk.
    ///
    /// On failure the buffer keeps whatever the sink did not accept and the
    /// error carries the number of bytes that were accepted.
    pub fn dump_to<W: io::Write + ?Sized>(&mut self, sink: &mut W) -> Result<usize, SinkError> {
        let mut written = 0;
        let mut chunks: VecDeque<Vec<u8>> = self.closed.drain(..).collect();
        chunks.push_back(std::mem::take(&mut self.current));
        self.closed_len = 0;

        while let Some(chunk) = chunks.pop_front() {
            let mut offset = 0;
            while offset < chunk.len() {
                match sink.write(&chunk[offset..]) {
                    Ok(0) => {
                        self.restore(&chunk[offset..], chunks);
                        return Err(SinkError {
                            written,
                            source: io::ErrorKind::WriteZero.into(),
                        });
                    }
                    Ok(n) => {
                        offset += n;
                        written += n;
                    }
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                    Err(e) => {
                        self.restore(&chunk[offset..], chunks);
                        return Err(SinkError { written, source: e });
                    }
                }
            }
        }
        sink.flush().map_err(|source| SinkError { written, source })?;
        Ok(written)
    }

    fn restore(&mut self, head: &[u8], rest: VecDeque<Vec<u8>>) {
        let mut left = Vec::with_capacity(head.len());
        left.extend_from_slice(head);
        self.closed_len = left.len();
        self.closed.push(left);
        for chunk in rest {
            if chunk.is_empty() {
                continue;
            }
            self.closed_len += chunk.len();
            self.closed.push(chunk);
        }
    }

    /// Converts the buffer into a reader over its chunks, without
    /// concatenating them.
    #[must_use]
    pub fn into_reader(self) -> ChunkReader {
        let mut chunks: VecDeque<Vec<u8>> = self.closed.into();
        if !self.current.is_empty() {
            chunks.push_back(self.current);
        }
        ChunkReader { chunks, offset: 0 }
    }
}

impl fmt::Write for Buffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.extend_str(s);
        Ok(())
    }
}

/// [`io::Read`] over the chunks of a drained [`Buffer`].
#[derive(Debug)]
pub struct ChunkReader {
    chunks: VecDeque<Vec<u8>>,
    offset: usize,
}

impl io::Read for ChunkReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        while let Some(front) = self.chunks.front() {
            let rest = &front[self.offset..];
            if rest.is_empty() {
                self.chunks.pop_front();
                self.offset = 0;
                continue;
            }
            let n = rest.len().min(buf.len());
            buf[..n].copy_from_slice(&rest[..n]);
            self.offset += n;
            return Ok(n);
        }
        Ok(0)
    }
}

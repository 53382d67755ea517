//! Byte sinks
//!
//! Write side of the stream abstraction.

use std::io::Write;

use bytes::{BufMut, BytesMut};

use crate::error::Result;

/// A blocking, append-only sink of bytes
pub trait ByteSink {
    /// Write all of `bytes` or fail
    fn write_all(&mut self, bytes: &[u8]) -> Result<()>;
}

impl<S: ByteSink + ?Sized> ByteSink for &mut S {
    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write_all(bytes)
    }
}

impl ByteSink for Vec<u8> {
    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

impl ByteSink for BytesMut {
    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.put_slice(bytes);
        Ok(())
    }
}

/// Adapter over any blocking `Write`
#[derive(Debug)]
pub struct WriterSink<W> {
    inner: W,
    written: u64,
}

impl<W: Write> WriterSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    /// Total bytes written through this adapter
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> ByteSink for WriterSink<W> {
    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.inner.write_all(bytes)?;
        self.written += bytes.len() as u64;
        Ok(())
    }
}

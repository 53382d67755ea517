//! Byte sources
//!
//! Read side of the stream abstraction.

use std::io::{ErrorKind, Read};

use bytes::{Buf, Bytes};

use crate::error::{ProtoError, Result};

/// A blocking source of bytes
pub trait ByteSource {
    /// Read exactly `n` bytes or fail with `InsufficientData`
    fn read_exactly(&mut self, n: usize) -> Result<Vec<u8>>;

    /// Bytes known to be readable without blocking, if the source can tell.
    ///
    /// Advisory only: a read must still be length-checked.
    fn available_hint(&self) -> Option<usize> {
        None
    }

    /// Read up to (and consume) the next `separator` byte.
    ///
    /// The separator is not part of the returned data. Fails with
    /// `LengthMismatch` once more than `limit` data bytes have been seen.
    fn read_until(&mut self, separator: u8, limit: usize) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        loop {
            let byte = self.read_exactly(1)?;
            if byte[0] == separator {
                return Ok(out);
            }
            if out.len() == limit {
                return Err(separator_limit(limit));
            }
            out.push(byte[0]);
        }
    }

    /// Read everything left in the source, at most `limit` bytes
    fn read_remaining(&mut self, limit: usize) -> Result<Vec<u8>>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_exactly(&mut self, n: usize) -> Result<Vec<u8>> {
        (**self).read_exactly(n)
    }

    fn available_hint(&self) -> Option<usize> {
        (**self).available_hint()
    }

    fn read_until(&mut self, separator: u8, limit: usize) -> Result<Vec<u8>> {
        (**self).read_until(separator, limit)
    }

    fn read_remaining(&mut self, limit: usize) -> Result<Vec<u8>> {
        (**self).read_remaining(limit)
    }
}

fn separator_limit(limit: usize) -> ProtoError {
    ProtoError::LengthMismatch(format!("no separator within {} bytes", limit))
}

fn remaining_limit(remaining: usize, limit: usize) -> ProtoError {
    ProtoError::LengthMismatch(format!(
        "remaining span of {} bytes exceeds limit of {}",
        remaining, limit
    ))
}

// =============================================================================
// SliceSource
// =============================================================================

/// Cursor over a borrowed byte slice
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Number of bytes consumed so far
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Unconsumed tail of the slice
    pub fn remaining(&self) -> &'a [u8] {
        let data: &'a [u8] = self.data;
        &data[self.pos..]
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }
}

impl ByteSource for SliceSource<'_> {
    fn read_exactly(&mut self, n: usize) -> Result<Vec<u8>> {
        let rest = self.remaining();
        if rest.len() < n {
            return Err(ProtoError::short(n, rest.len()));
        }
        let out = rest[..n].to_vec();
        self.pos += n;
        Ok(out)
    }

    fn available_hint(&self) -> Option<usize> {
        Some(self.data.len() - self.pos)
    }

    fn read_until(&mut self, separator: u8, limit: usize) -> Result<Vec<u8>> {
        let rest = self.remaining();
        match rest.iter().position(|&b| b == separator) {
            Some(idx) if idx > limit => Err(separator_limit(limit)),
            Some(idx) => {
                let out = rest[..idx].to_vec();
                self.pos += idx + 1;
                Ok(out)
            }
            None => Err(ProtoError::short(rest.len() + 1, rest.len())),
        }
    }

    fn read_remaining(&mut self, limit: usize) -> Result<Vec<u8>> {
        let rest = self.remaining();
        if rest.len() > limit {
            return Err(remaining_limit(rest.len(), limit));
        }
        self.pos = self.data.len();
        Ok(rest.to_vec())
    }
}

// =============================================================================
// ReaderSource
// =============================================================================

/// Adapter over any blocking `Read`
///
/// Timeouts belong to the wrapped reader; a blocked read blocks the caller.
#[derive(Debug)]
pub struct ReaderSource<R> {
    inner: R,
    consumed: u64,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, consumed: 0 }
    }

    /// Total bytes consumed through this adapter
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Fill `buf` as far as possible, returning how many bytes arrived before EOF
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        self.consumed += filled as u64;
        Ok(filled)
    }
}

impl<R: Read> ByteSource for ReaderSource<R> {
    fn read_exactly(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        let filled = self.fill(&mut buf)?;
        if filled < n {
            return Err(ProtoError::short(n, filled));
        }
        Ok(buf)
    }

    fn read_remaining(&mut self, limit: usize) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let read = (&mut self.inner)
            .take((limit as u64).saturating_add(1))
            .read_to_end(&mut out)?;
        self.consumed += read as u64;
        if out.len() > limit {
            return Err(remaining_limit(out.len(), limit));
        }
        Ok(out)
    }
}

// =============================================================================
// Bytes
// =============================================================================

impl ByteSource for Bytes {
    fn read_exactly(&mut self, n: usize) -> Result<Vec<u8>> {
        if self.remaining() < n {
            return Err(ProtoError::short(n, self.remaining()));
        }
        Ok(self.split_to(n).to_vec())
    }

    fn available_hint(&self) -> Option<usize> {
        Some(self.remaining())
    }

    fn read_until(&mut self, separator: u8, limit: usize) -> Result<Vec<u8>> {
        match self.iter().position(|&b| b == separator) {
            Some(idx) if idx > limit => Err(separator_limit(limit)),
            Some(idx) => {
                let out = self.split_to(idx).to_vec();
                self.advance(1);
                Ok(out)
            }
            None => Err(ProtoError::short(self.len() + 1, self.len())),
        }
    }

    fn read_remaining(&mut self, limit: usize) -> Result<Vec<u8>> {
        if self.remaining() > limit {
            return Err(remaining_limit(self.remaining(), limit));
        }
        Ok(self.split_off(0).to_vec())
    }
}

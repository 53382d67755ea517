//! Stream Module
//!
//! Byte source/sink abstractions consumed by every codec.
//!
//! ## Responsibilities
//! - Exact-length reads with explicit short-read errors
//! - An advisory `available_hint` for pre-checking a read
//! - Separator-terminated and read-to-end spans for variable-length fields
//! - Append-only writes
//!
//! ## Adapters
//! ```text
//! ┌──────────────────────┬──────────────────────────────────────┐
//! │ ByteSource           │ SliceSource, ReaderSource<R>, Bytes  │
//! ├──────────────────────┼──────────────────────────────────────┤
//! │ ByteSink             │ Vec<u8>, BytesMut, WriterSink<W>     │
//! └──────────────────────┴──────────────────────────────────────┘
//! ```
//!
//! A failed read or write leaves the stream wherever it stopped; callers
//! must resynchronize before reusing it.

mod sink;
mod source;

pub use sink::{ByteSink, WriterSink};
pub use source::{ByteSource, ReaderSource, SliceSource};

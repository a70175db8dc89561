//! bytepress-core: codec core of a lossless file-compression utility
//!
//! This library provides the engine behind the bytepress tool:
//! - Compresses files with run-length encoding or static Huffman coding
//! - Frames every artifact with a magic/version header that remembers the
//!   original file extension
//! - Streams arbitrarily large files through fixed 16 KiB buffers
//!
//! # Architecture
//!
//! The system is designed around clear module boundaries:
//! - `bitio`: Low-level MSB-first bit reading/writing over byte streams
//! - `header`: The framing record at the start of every artifact
//! - `rle`: Run-length codec with a 255-escape convention
//! - `huffman`: Static Huffman codec with a self-describing code table
//! - `dispatch`: Codec selection, header handling, progress translation
//!
//! # Design Principles
//!
//! - **No panics**: All errors are structured and propagate to the
//!   dispatcher boundary
//! - **Bounded memory**: Buffer sizes are fixed; memory use does not grow
//!   with input size
//! - **Bit-exact framing**: Encoder and decoder agree on MSB-first bit
//!   order and explicit bit counts, so padding never leaks into output
//! - **Synchronous**: Encode/decode are blocking, single-threaded calls; a
//!   shell that wants a responsive UI runs them on its own worker

pub mod bitio;
pub mod dispatch;
pub mod error;
pub mod header;
pub mod huffman;
pub mod rle;

// Re-export the surface a shell needs
pub use dispatch::{compress, decompress, read_header, Algorithm};
pub use error::{Error, Result};

/// Common buffer size for all codec passes.
pub const BUFFER_SIZE: usize = 16 * 1024;

/// Callback reporting the number of input bytes processed so far.
///
/// Invoked synchronously between buffered chunks; values are
/// monotonically non-decreasing within one encode/decode call.
pub type ProgressFn<'a> = &'a mut dyn FnMut(u64);

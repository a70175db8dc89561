//! Error types for the bytepress codec core.
//!
//! All operations return structured errors rather than panicking.
//! Every fatal condition unwinds to the dispatcher boundary, where it is
//! surfaced as a single failure with a human-readable message.

use std::path::PathBuf;
use thiserror::Error;

use crate::dispatch::Algorithm;

/// Top-level error type for all operations in the core.
///
/// Each variant corresponds to a specific failure domain:
/// - Bit I/O: reading/writing bits from/to byte streams
/// - Header: framing record serialization/parsing
/// - RLE: run-length decode failures
/// - Huffman: codec construction or encode/decode failures
/// - Dispatch: file access, format identification, algorithm routing
#[derive(Debug, Error)]
pub enum Error {
    /// Bit I/O operation failed (e.g., reading past end of stream)
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// File header error (e.g., short read, unsupported version)
    #[error("invalid header: {0}")]
    Header(#[from] HeaderError),

    /// RLE codec error (e.g., truncated escape sequence)
    #[error("RLE codec error: {0}")]
    Rle(#[from] RleError),

    /// Huffman codec error (e.g., invalid code, decode failure)
    #[error("huffman codec error: {0}")]
    Huffman(#[from] HuffmanError),

    /// A named input or output stream could not be acquired
    #[error("failed to open file: {}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Header magic matches no known codec
    #[error("unknown compression file format: magic {magic:?}")]
    UnknownFormat { magic: [u8; 3] },

    /// Selected algorithm does not match the file's compression method
    #[error("algorithm mismatch: file is {found}, expected {expected}")]
    AlgorithmMismatch {
        expected: Algorithm,
        found: Algorithm,
    },

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Bit-level I/O errors.
#[derive(Debug, Error)]
pub enum BitIoError {
    /// Attempted to read past the end of the stream
    #[error("unexpected end of bit stream")]
    UnexpectedEof,

    /// Invalid bit count (more than 64 bits requested in one call)
    #[error("invalid bit count: {0}")]
    InvalidBitCount(u32),
}

/// File header errors.
///
/// The header is the fixed-layout record at the start of every compressed
/// artifact; any deviation from the expected layout is fatal.
#[derive(Debug, Error)]
pub enum HeaderError {
    /// Stream ended before a complete header was read
    #[error("failed to read {field}")]
    Truncated { field: &'static str },

    /// Version byte is not the supported version
    #[error("unsupported file version {0}")]
    UnsupportedVersion(u8),

    /// Extension length field is zero
    #[error("invalid extension length")]
    EmptyExtension,

    /// Extension does not fit the one-byte length field
    #[error("extension length {0} exceeds maximum 255")]
    ExtensionTooLong(usize),
}

/// RLE codec errors.
#[derive(Debug, Error)]
pub enum RleError {
    /// An escape prefix at end of input was not followed by the run byte
    #[error("truncated escape sequence at end of input")]
    DanglingEscape,
}

/// Huffman codec errors.
#[derive(Debug, Error)]
pub enum HuffmanError {
    /// Stream ended while reading the encoding table or bit-count field
    #[error("unexpected end of file while reading {0}")]
    TruncatedTable(&'static str),

    /// Stream ended before the declared number of payload bits was read
    #[error("unexpected end of file: decoded {processed} of {expected} payload bits")]
    TruncatedPayload { expected: u64, processed: u64 },

    /// Trie walk stepped into a missing child
    #[error("invalid Huffman code encountered during decoding at bit {position}")]
    InvalidCode { position: u64 },

    /// Payload ended in the middle of a code
    #[error("incomplete Huffman code at end of payload")]
    IncompleteCode,

    /// Table declares more entries than the 256-byte alphabet allows
    #[error("encoding table has {0} entries, more than the alphabet size")]
    TableTooLarge(u32),

    /// Table entry carries a zero-length code
    #[error("zero-length code for byte {byte:#04x} in encoding table")]
    EmptyCode { byte: u8 },

    /// Two table entries conflict: one code is a prefix of another
    #[error("encoding table is not prefix-free: conflict at byte {byte:#04x}")]
    NotPrefixFree { byte: u8 },

    /// An empty table cannot describe a non-empty payload
    #[error("empty encoding table with {bits} payload bits declared")]
    EmptyTable { bits: u64 },

    /// Derived code length exceeds the 255-bit wire limit
    #[error("code length {0} exceeds maximum 255")]
    CodeLengthTooLong(usize),
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;

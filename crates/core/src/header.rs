//! File header serialization and parsing.
//!
//! Every compressed artifact starts with a fixed-layout framing record
//! that identifies the codec and remembers the original file extension so
//! decompression can restore the original name.
//!
//! # Header Format
//!
//! ```text
//! +------------------+
//! | Magic (3 bytes)  |  "RLE" or "HUF"
//! +------------------+
//! | version (1)      |  u8, currently 1
//! +------------------+
//! | ext_len (1)      |  u8, 1..=255
//! +------------------+
//! | extension        |  ext_len bytes, original extension WITHOUT the
//! | (variable)       |  leading dot (ASCII expected, any bytes tolerated)
//! +------------------+
//! ```
//!
//! All fields are contiguous, with no padding or alignment. Reading
//! validates the version and the extension length but NOT the magic; the
//! dispatcher classifies the file by magic after the header is parsed.

use std::io::{ErrorKind, Read, Write};

use crate::error::{HeaderError, Result};

/// Size of the magic number field in bytes
pub const MAGIC_LEN: usize = 3;

/// The only supported container version
pub const VERSION: u8 = 1;

/// The framing record at the start of every compressed artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    /// Codec identifier ("RLE" or "HUF"); not validated by `read`
    magic: [u8; MAGIC_LEN],

    /// Original file extension, without the leading dot
    extension: Vec<u8>,
}

impl FileHeader {
    /// Create a header for the given magic and original extension.
    ///
    /// # Errors
    /// - `HeaderError::EmptyExtension` if the extension is empty
    /// - `HeaderError::ExtensionTooLong` if it exceeds 255 bytes
    pub fn new(magic: [u8; MAGIC_LEN], extension: &[u8]) -> Result<Self> {
        if extension.is_empty() {
            return Err(HeaderError::EmptyExtension.into());
        }
        if extension.len() > u8::MAX as usize {
            return Err(HeaderError::ExtensionTooLong(extension.len()).into());
        }

        Ok(Self {
            magic,
            extension: extension.to_vec(),
        })
    }

    /// The codec magic recorded in this header.
    pub fn magic(&self) -> [u8; MAGIC_LEN] {
        self.magic
    }

    /// The original file extension, without the leading dot.
    pub fn extension(&self) -> &[u8] {
        &self.extension
    }

    /// The extension as a string, with non-UTF-8 bytes replaced.
    pub fn extension_lossy(&self) -> String {
        String::from_utf8_lossy(&self.extension).into_owned()
    }

    /// Total serialized size in bytes: magic + version + length + extension.
    pub fn serialized_len(&self) -> usize {
        MAGIC_LEN + 2 + self.extension.len()
    }

    /// Write the header to the output stream.
    pub fn write<W: Write>(&self, output: &mut W) -> Result<()> {
        output.write_all(&self.magic)?;
        output.write_all(&[VERSION])?;
        output.write_all(&[self.extension.len() as u8])?;
        output.write_all(&self.extension)?;
        Ok(())
    }

    /// Read and validate a header from the input stream.
    ///
    /// # Errors
    /// - `HeaderError::Truncated` if the stream ends inside the header
    /// - `HeaderError::UnsupportedVersion` if the version byte is not 1
    /// - `HeaderError::EmptyExtension` if the extension length is 0
    pub fn read<R: Read>(input: &mut R) -> Result<Self> {
        let mut magic = [0u8; MAGIC_LEN];
        read_field(input, &mut magic, "magic number")?;

        let mut version = [0u8; 1];
        read_field(input, &mut version, "version")?;
        if version[0] != VERSION {
            return Err(HeaderError::UnsupportedVersion(version[0]).into());
        }

        let mut ext_len = [0u8; 1];
        read_field(input, &mut ext_len, "extension length")?;
        if ext_len[0] == 0 {
            return Err(HeaderError::EmptyExtension.into());
        }

        let mut extension = vec![0u8; ext_len[0] as usize];
        read_field(input, &mut extension, "original extension")?;

        Ok(Self { magic, extension })
    }
}

/// Read an exact-width header field, mapping a short read to a header error.
fn read_field<R: Read>(input: &mut R, buf: &mut [u8], field: &'static str) -> Result<()> {
    input.read_exact(buf).map_err(|e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            HeaderError::Truncated { field }.into()
        } else {
            crate::error::Error::Io(e)
        }
    })
}

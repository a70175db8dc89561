//! Codec dispatch: the surface the shell talks to.
//!
//! `compress` and `decompress` wrap the codec entry points with the file
//! framing: on encode they write a `FileHeader` carrying the codec magic
//! and the input's original extension, on decode they read the header
//! back, classify the file by magic, and route to the matching codec.
//!
//! Progress is translated here from the codecs' byte counts into a 0-100
//! percentage, with a guaranteed final 100% tick on success.
//!
//! # Failure behavior
//!
//! On any error the partially written output file is removed, so a caller
//! can never mistake an aborted run for a valid compressed artifact. The
//! error itself carries the human-readable message for the shell.

use std::fmt;
use std::fs::{self, File};
use std::path::Path;

use crate::error::{Error, Result};
use crate::header::{FileHeader, MAGIC_LEN};
use crate::{huffman, rle};

/// The codecs a compressed file can be framed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// Run-length encoding
    Rle,
    /// Huffman coding
    Huffman,
}

impl Algorithm {
    /// The magic number identifying this codec in a file header.
    pub const fn magic(self) -> [u8; MAGIC_LEN] {
        match self {
            Algorithm::Rle => *b"RLE",
            Algorithm::Huffman => *b"HUF",
        }
    }

    /// Classify a header magic, or None if it matches no known codec.
    pub fn from_magic(magic: [u8; MAGIC_LEN]) -> Option<Self> {
        match &magic {
            b"RLE" => Some(Algorithm::Rle),
            b"HUF" => Some(Algorithm::Huffman),
            _ => None,
        }
    }

    /// Conventional file extension for artifacts of this codec.
    pub const fn compressed_extension(self) -> &'static str {
        match self {
            Algorithm::Rle => "rle",
            Algorithm::Huffman => "huff",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Rle => write!(f, "RLE"),
            Algorithm::Huffman => write!(f, "Huffman"),
        }
    }
}

impl std::str::FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rle" => Ok(Algorithm::Rle),
            "huffman" | "huff" => Ok(Algorithm::Huffman),
            other => Err(format!("unknown algorithm: {other}")),
        }
    }
}

/// Compress `input_path` into `output_path` with the chosen codec.
///
/// Writes the framing header, then streams the input through the codec.
/// The progress callback, when present, receives percentages 0-100 and is
/// always called with 100 on success. On failure the output file is
/// removed.
pub fn compress(
    input_path: &Path,
    output_path: &Path,
    algorithm: Algorithm,
    progress: Option<&mut dyn FnMut(u8)>,
) -> Result<()> {
    let result = compress_inner(input_path, output_path, algorithm, progress);
    if result.is_err() {
        let _ = fs::remove_file(output_path);
    }
    result
}

fn compress_inner(
    input_path: &Path,
    output_path: &Path,
    algorithm: Algorithm,
    mut progress: Option<&mut dyn FnMut(u8)>,
) -> Result<()> {
    let mut input = File::open(input_path).map_err(|source| Error::FileOpen {
        path: input_path.to_path_buf(),
        source,
    })?;
    let total_size = input.metadata()?.len();

    let mut output = File::create(output_path).map_err(|source| Error::FileOpen {
        path: output_path.to_path_buf(),
        source,
    })?;

    let header = FileHeader::new(algorithm.magic(), original_extension(input_path).as_bytes())?;
    header.write(&mut output)?;

    {
        let mut report = |processed: u64| {
            if let Some(cb) = progress.as_mut() {
                cb(percent_of(processed, total_size));
            }
        };

        match algorithm {
            Algorithm::Rle => rle::encode(&mut input, &mut output, Some(&mut report))?,
            Algorithm::Huffman => huffman::encode(&mut input, &mut output, Some(&mut report))?,
        }
    }

    if let Some(cb) = progress.as_mut() {
        cb(100);
    }

    Ok(())
}

/// Decompress `input_path` into `output_path`, expecting the given codec.
///
/// Reads and validates the framing header, classifies the file by magic,
/// and rejects it when the magic is unknown or names a different codec
/// than expected. On failure the output file is removed.
pub fn decompress(
    input_path: &Path,
    output_path: &Path,
    expected: Algorithm,
    progress: Option<&mut dyn FnMut(u8)>,
) -> Result<()> {
    let result = decompress_inner(input_path, output_path, expected, progress);
    if result.is_err() {
        let _ = fs::remove_file(output_path);
    }
    result
}

fn decompress_inner(
    input_path: &Path,
    output_path: &Path,
    expected: Algorithm,
    mut progress: Option<&mut dyn FnMut(u8)>,
) -> Result<()> {
    let mut input = File::open(input_path).map_err(|source| Error::FileOpen {
        path: input_path.to_path_buf(),
        source,
    })?;
    let total_size = input.metadata()?.len();

    let header = FileHeader::read(&mut input)?;
    let file_algorithm = Algorithm::from_magic(header.magic()).ok_or(Error::UnknownFormat {
        magic: header.magic(),
    })?;

    if file_algorithm != expected {
        return Err(Error::AlgorithmMismatch {
            expected,
            found: file_algorithm,
        });
    }

    let mut output = File::create(output_path).map_err(|source| Error::FileOpen {
        path: output_path.to_path_buf(),
        source,
    })?;

    {
        // The codecs count payload bytes; the header is already behind us.
        let header_len = header.serialized_len() as u64;
        let mut report = |processed: u64| {
            if let Some(cb) = progress.as_mut() {
                cb(percent_of(header_len + processed, total_size));
            }
        };

        match file_algorithm {
            Algorithm::Rle => rle::decode(&mut input, &mut output, Some(&mut report))?,
            Algorithm::Huffman => huffman::decode(&mut input, &mut output, Some(&mut report))?,
        }
    }

    if let Some(cb) = progress.as_mut() {
        cb(100);
    }

    Ok(())
}

/// Read the header of a compressed file without decoding anything.
///
/// This is how a shell learns the original extension (to derive the
/// decompressed output name) and the codec before committing to a full
/// decompression.
pub fn read_header(input_path: &Path) -> Result<FileHeader> {
    let mut input = File::open(input_path).map_err(|source| Error::FileOpen {
        path: input_path.to_path_buf(),
        source,
    })?;
    FileHeader::read(&mut input)
}

/// The input's extension without the leading dot, or "bin" when the file
/// name has none. The header field cannot be empty.
fn original_extension(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .filter(|ext| !ext.is_empty())
        .unwrap_or_else(|| "bin".to_string())
}

/// Integer percentage, saturating at 100. An empty input is complete by
/// definition.
fn percent_of(processed: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    ((processed * 100) / total).min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_magic_round_trip() {
        for algorithm in [Algorithm::Rle, Algorithm::Huffman] {
            assert_eq!(Algorithm::from_magic(algorithm.magic()), Some(algorithm));
        }
        assert_eq!(Algorithm::from_magic(*b"ZIP"), None);
    }

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!("rle".parse::<Algorithm>().unwrap(), Algorithm::Rle);
        assert_eq!("RLE".parse::<Algorithm>().unwrap(), Algorithm::Rle);
        assert_eq!("huffman".parse::<Algorithm>().unwrap(), Algorithm::Huffman);
        assert_eq!("huff".parse::<Algorithm>().unwrap(), Algorithm::Huffman);
        assert!("lz77".parse::<Algorithm>().is_err());
    }

    #[test]
    fn test_original_extension() {
        assert_eq!(original_extension(&PathBuf::from("notes.txt")), "txt");
        assert_eq!(original_extension(&PathBuf::from("archive.tar.gz")), "gz");
        assert_eq!(original_extension(&PathBuf::from("Makefile")), "bin");
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(percent_of(0, 200), 0);
        assert_eq!(percent_of(50, 200), 25);
        assert_eq!(percent_of(200, 200), 100);
        assert_eq!(percent_of(250, 200), 100);
        assert_eq!(percent_of(0, 0), 100);
    }
}

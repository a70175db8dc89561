//! Run-length codec.
//!
//! The simplest of the two codecs: repeated bytes collapse into
//! (byte, count) pairs, with an escape convention for runs that overflow
//! the one-byte count.
//!
//! # Wire Format
//!
//! A concatenation of two-byte pairs and three-byte escape blocks:
//!
//! ```text
//! +------+-------+        +------+------+------+
//! | byte | count |   or   | 0xFF | 0x00 | byte |
//! +------+-------+        +------+------+------+
//!   count in 1..=255        exactly 255 copies of byte
//! ```
//!
//! A run of N copies of B is emitted as N/255 escape blocks followed, when
//! N is not a multiple of 255, by a single (B, N mod 255) pair. The pair
//! (0xFF, 0x00) can never occur as a literal run because a count of zero is
//! never written, which is what makes the escape prefix unambiguous. The
//! decoder also accepts a plain (B, 255) pair, so either spelling of a
//! 255-long run decodes identically.
//!
//! Both directions stream through 16 KiB buffers; memory use is constant
//! regardless of input size.

use std::io::{Read, Write};

use crate::bitio::read_chunk;
use crate::error::{Result, RleError};
use crate::{ProgressFn, BUFFER_SIZE};

/// Escape marker: a count byte can never be 0, so (0xFF, 0x00) is free to
/// introduce a 255-long run.
const ESCAPE: u8 = 0xFF;

/// Compress `input` into `output` using run-length encoding.
///
/// The progress callback, when present, receives the total number of input
/// bytes processed after each 16 KiB chunk.
pub fn encode<R: Read, W: Write>(
    input: &mut R,
    output: &mut W,
    mut progress: Option<ProgressFn<'_>>,
) -> Result<()> {
    let mut in_buf = vec![0u8; BUFFER_SIZE];
    let mut out_buf: Vec<u8> = Vec::with_capacity(BUFFER_SIZE);

    let mut run_byte = 0u8;
    let mut run_len = 0u8;
    let mut consumed = 0u64;

    loop {
        let bytes_read = read_chunk(input, &mut in_buf)?;
        if bytes_read == 0 {
            break;
        }

        for &current in &in_buf[..bytes_read] {
            if current == run_byte && run_len < u8::MAX {
                run_len += 1;
            } else {
                write_run(&mut out_buf, output, run_byte, run_len)?;
                run_byte = current;
                run_len = 1;
            }
        }

        consumed += bytes_read as u64;
        if let Some(cb) = progress.as_mut() {
            cb(consumed);
        }
    }

    // The last run is still pending at EOF.
    write_run(&mut out_buf, output, run_byte, run_len)?;

    if !out_buf.is_empty() {
        output.write_all(&out_buf)?;
    }

    Ok(())
}

/// Decompress an RLE stream from `input` into `output`.
///
/// Decoding stops cleanly when the input ends on a pair boundary (a lone
/// trailing byte is ignored). An escape prefix with no run byte after it
/// is a hard error: well-formed output never ends that way.
pub fn decode<R: Read, W: Write>(
    input: &mut R,
    output: &mut W,
    progress: Option<ProgressFn<'_>>,
) -> Result<()> {
    let mut scanner = ByteScanner::new(input, progress);
    let mut out_buf: Vec<u8> = Vec::with_capacity(BUFFER_SIZE);

    loop {
        let first = match scanner.next_byte()? {
            Some(b) => b,
            None => break,
        };
        let second = match scanner.next_byte()? {
            Some(b) => b,
            None => break,
        };

        let (byte, count) = if first == ESCAPE && second == 0 {
            match scanner.next_byte()? {
                Some(b) => (b, u8::MAX as usize),
                None => return Err(RleError::DanglingEscape.into()),
            }
        } else {
            (first, second as usize)
        };

        out_buf.extend(std::iter::repeat(byte).take(count));

        if out_buf.len() >= BUFFER_SIZE {
            output.write_all(&out_buf)?;
            out_buf.clear();
        }
    }

    if !out_buf.is_empty() {
        output.write_all(&out_buf)?;
    }

    Ok(())
}

/// Emit one run into the output buffer, draining it at 16 KiB.
///
/// A zero-length run is the encoder's initial state and writes nothing.
/// A run of exactly 255 becomes an escape block.
fn write_run<W: Write>(out_buf: &mut Vec<u8>, output: &mut W, byte: u8, count: u8) -> Result<()> {
    if count == 0 {
        return Ok(());
    }

    if count == u8::MAX {
        out_buf.push(ESCAPE);
        out_buf.push(0);
        out_buf.push(byte);
    } else {
        out_buf.push(byte);
        out_buf.push(count);
    }

    if out_buf.len() >= BUFFER_SIZE {
        output.write_all(out_buf)?;
        out_buf.clear();
    }

    Ok(())
}

/// Byte-at-a-time view of a stream, refilled in 16 KiB chunks.
///
/// Reports cumulative consumed bytes to the progress callback whenever a
/// chunk has been fully drained, so pairs and escape blocks can span
/// chunk boundaries without the decode loop ever noticing.
struct ByteScanner<'p, R: Read> {
    inner: R,
    buf: Vec<u8>,
    pos: usize,
    len: usize,
    eof: bool,
    consumed: u64,
    progress: Option<ProgressFn<'p>>,
}

impl<'p, R: Read> ByteScanner<'p, R> {
    fn new(inner: R, progress: Option<ProgressFn<'p>>) -> Self {
        Self {
            inner,
            buf: vec![0u8; BUFFER_SIZE],
            pos: 0,
            len: 0,
            eof: false,
            consumed: 0,
            progress,
        }
    }

    /// The next byte, or None at end of input. End of input is sticky.
    fn next_byte(&mut self) -> Result<Option<u8>> {
        if self.pos >= self.len && !self.refill()? {
            return Ok(None);
        }

        let byte = self.buf[self.pos];
        self.pos += 1;
        Ok(Some(byte))
    }

    fn refill(&mut self) -> Result<bool> {
        if self.eof {
            return Ok(false);
        }

        // The previous chunk is fully consumed once we need another.
        if self.len > 0 {
            self.consumed += self.len as u64;
            self.len = 0;
            self.pos = 0;
            if let Some(cb) = self.progress.as_mut() {
                cb(self.consumed);
            }
        }

        let bytes_read = read_chunk(&mut self.inner, &mut self.buf)?;
        if bytes_read == 0 {
            self.eof = true;
            return Ok(false);
        }

        self.len = bytes_read;
        self.pos = 0;
        Ok(true)
    }
}

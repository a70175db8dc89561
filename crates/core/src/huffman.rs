//! Huffman codec.
//!
//! Classic two-pass static Huffman coding: the first pass over the input
//! counts byte frequencies, a min-heap merges the two lightest subtrees
//! until one remains, and the second pass replaces each byte with its
//! variable-length code. The encoding table travels in the output, so the
//! decoder needs no prior knowledge to rebuild the code.
//!
//! # Container Format
//!
//! All fields below are bit-packed MSB-first via the bitio adapters:
//!
//! ```text
//! +--------------------+
//! | entry count (16)   |  number of table entries N, 0..=256
//! +--------------------+
//! | N entries:         |
//! |   byte (8)         |  the symbol
//! |   code length (8)  |  L, 1..=255
//! |   code (L bits)    |  the symbol's code, MSB-first
//! +--------------------+
//! | total bits (64)    |  exact number of payload bits that follow
//! +--------------------+
//! | payload            |  one code per input byte, zero-padded to a
//! | (variable)         |  byte boundary by the final flush
//! +--------------------+
//! ```
//!
//! The explicit bit count is what keeps the padding bits of the final byte
//! from being decoded as data; no symbol is sacrificed for an
//! end-of-stream marker. An entry count of 0 with a bit count of 0 is the
//! encoding of empty input.
//!
//! # Single-symbol inputs
//!
//! A one-leaf tree would naively give that symbol a zero-length code.
//! The table derivation special-cases it to the one-bit code `0`, keeping
//! every code length in 1..=255.

use std::collections::BinaryHeap;
use std::io::{Read, Seek, SeekFrom, Write};

use crate::bitio::{read_chunk, BitReader, BitWriter};
use crate::error::{BitIoError, Error, HuffmanError, Result};
use crate::{ProgressFn, BUFFER_SIZE};

/// Size of the byte alphabet.
const ALPHABET: usize = 256;

/// Compress `input` into `output` using Huffman coding.
///
/// Makes two passes over the input (frequency count, then encoding), so
/// the source must be seekable. The progress callback, when present,
/// receives the total number of input bytes processed after each 16 KiB
/// chunk of the encoding pass.
pub fn encode<R: Read + Seek, W: Write>(
    input: &mut R,
    output: &mut W,
    mut progress: Option<ProgressFn<'_>>,
) -> Result<()> {
    let freqs = build_frequency_table(input)?;
    let table = match build_tree(&freqs) {
        Some(root) => EncodingTable::from_tree(&root)?,
        None => EncodingTable::empty(),
    };

    let mut writer = BitWriter::new(output);
    table.write(&mut writer)?;

    let total_bits = table.total_encoded_bits(&freqs);
    writer.write_bits(total_bits, 64)?;

    // Second pass: rewind and substitute codes for bytes.
    input.seek(SeekFrom::Start(0))?;

    let mut buf = vec![0u8; BUFFER_SIZE];
    let mut consumed = 0u64;

    loop {
        let bytes_read = read_chunk(input, &mut buf)?;
        if bytes_read == 0 {
            break;
        }

        for &byte in &buf[..bytes_read] {
            writer.write_code(table.code(byte))?;
        }

        consumed += bytes_read as u64;
        if let Some(cb) = progress.as_mut() {
            cb(consumed);
        }
    }

    writer.flush()
}

/// Decompress a Huffman stream from `input` into `output`.
///
/// Reads the encoding table, rebuilds the decoding trie, then walks it
/// for exactly the declared number of payload bits. The progress
/// callback, when present, receives input bytes consumed, sampled at
/// 16 KiB boundaries of the compressed stream.
pub fn decode<R: Read, W: Write>(
    input: &mut R,
    output: &mut W,
    mut progress: Option<ProgressFn<'_>>,
) -> Result<()> {
    let mut reader = BitReader::new(input);

    let table = EncodingTable::read(&mut reader)?;
    let total_bits = field_bits(&mut reader, 64, "total encoded bits")?;

    if table.is_empty() {
        if total_bits > 0 {
            return Err(HuffmanError::EmptyTable { bits: total_bits }.into());
        }
        return Ok(());
    }

    let root = build_decoding_tree(&table)?;

    let mut out_buf: Vec<u8> = Vec::with_capacity(BUFFER_SIZE);
    let mut node = &root;
    let mut bits_processed = 0u64;
    let mut last_reported = 0u64;

    while bits_processed < total_bits {
        let bit = match reader.read_bit() {
            Ok(bit) => bit,
            Err(Error::BitIo(BitIoError::UnexpectedEof)) => {
                return Err(HuffmanError::TruncatedPayload {
                    expected: total_bits,
                    processed: bits_processed,
                }
                .into());
            }
            Err(e) => return Err(e),
        };
        bits_processed += 1;

        let child = if bit { &node.right } else { &node.left };
        node = match child.as_deref() {
            Some(next) => next,
            None => {
                return Err(HuffmanError::InvalidCode {
                    position: bits_processed,
                }
                .into());
            }
        };

        if let Some(byte) = node.byte {
            out_buf.push(byte);
            node = &root;

            if out_buf.len() == BUFFER_SIZE {
                output.write_all(&out_buf)?;
                out_buf.clear();
            }

            let input_consumed = reader.bytes_consumed();
            if input_consumed >= last_reported + BUFFER_SIZE as u64 {
                last_reported = input_consumed;
                if let Some(cb) = progress.as_mut() {
                    cb(input_consumed);
                }
            }
        }
    }

    if !std::ptr::eq(node, &root) {
        return Err(HuffmanError::IncompleteCode.into());
    }

    if !out_buf.is_empty() {
        output.write_all(&out_buf)?;
    }

    Ok(())
}

/// Count byte frequencies over the whole input.
fn build_frequency_table<R: Read>(input: &mut R) -> Result<[u64; ALPHABET]> {
    let mut freqs = [0u64; ALPHABET];
    let mut buf = vec![0u8; BUFFER_SIZE];

    loop {
        let bytes_read = read_chunk(input, &mut buf)?;
        if bytes_read == 0 {
            return Ok(freqs);
        }

        for &byte in &buf[..bytes_read] {
            freqs[byte as usize] += 1;
        }
    }
}

/// A node of the code tree: either a symbol or a pair of subtrees.
///
/// Weights matter only while the heap is merging; they live in
/// `HeapEntry` and are dropped once the tree is built.
enum Node {
    Leaf { byte: u8 },
    Internal { left: Box<Node>, right: Box<Node> },
}

/// Heap entry ordering a subtree by weight.
///
/// Reversed comparison turns `BinaryHeap` into a min-heap. Equal weights
/// compare equal, so ties break by the heap's internal order; the decoder
/// rebuilds from the serialized table, never from this tree, so
/// tie-breaking is encoder-local.
struct HeapEntry {
    freq: u64,
    node: Node,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.freq == other.freq
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other.freq.cmp(&self.freq)
    }
}

/// Merge the two lightest subtrees until one remains.
///
/// Returns None for an all-zero frequency table (empty input).
fn build_tree(freqs: &[u64; ALPHABET]) -> Option<Node> {
    let mut heap: BinaryHeap<HeapEntry> = freqs
        .iter()
        .enumerate()
        .filter(|&(_, &freq)| freq > 0)
        .map(|(byte, &freq)| HeapEntry {
            freq,
            node: Node::Leaf { byte: byte as u8 },
        })
        .collect();

    while heap.len() > 1 {
        let left = heap.pop().unwrap();
        let right = heap.pop().unwrap();

        heap.push(HeapEntry {
            freq: left.freq + right.freq,
            node: Node::Internal {
                left: Box::new(left.node),
                right: Box::new(right.node),
            },
        });
    }

    heap.pop().map(|entry| entry.node)
}

/// The byte -> code mapping, indexed by byte value.
///
/// An empty code means the byte has no entry. Codes are bit sequences,
/// first bit first; every present code has length 1..=255.
struct EncodingTable {
    codes: Vec<Vec<bool>>,
}

impl EncodingTable {
    fn empty() -> Self {
        Self {
            codes: vec![Vec::new(); ALPHABET],
        }
    }

    /// Derive codes from the tree: left edge 0, right edge 1.
    ///
    /// A tree that is a single leaf gets the one-bit code `0`.
    fn from_tree(root: &Node) -> Result<Self> {
        let mut table = Self::empty();

        match root {
            Node::Leaf { byte } => table.codes[*byte as usize] = vec![false],
            Node::Internal { .. } => {
                let mut path = Vec::new();
                table.collect_codes(root, &mut path)?;
            }
        }

        Ok(table)
    }

    fn collect_codes(&mut self, node: &Node, path: &mut Vec<bool>) -> Result<()> {
        match node {
            Node::Leaf { byte } => {
                if path.len() > u8::MAX as usize {
                    return Err(HuffmanError::CodeLengthTooLong(path.len()).into());
                }
                self.codes[*byte as usize] = path.clone();
                Ok(())
            }
            Node::Internal { left, right } => {
                path.push(false);
                self.collect_codes(left, path)?;
                path.pop();

                path.push(true);
                self.collect_codes(right, path)?;
                path.pop();

                Ok(())
            }
        }
    }

    fn code(&self, byte: u8) -> &[bool] {
        &self.codes[byte as usize]
    }

    fn entries(&self) -> impl Iterator<Item = (u8, &[bool])> {
        self.codes
            .iter()
            .enumerate()
            .filter(|(_, code)| !code.is_empty())
            .map(|(byte, code)| (byte as u8, code.as_slice()))
    }

    fn len(&self) -> usize {
        self.entries().count()
    }

    fn is_empty(&self) -> bool {
        self.codes.iter().all(Vec::is_empty)
    }

    /// Exact number of payload bits the encoding pass will emit.
    fn total_encoded_bits(&self, freqs: &[u64; ALPHABET]) -> u64 {
        self.entries()
            .map(|(byte, code)| code.len() as u64 * freqs[byte as usize])
            .sum()
    }

    /// Serialize: 16-bit entry count, then (byte, length, code) per entry.
    fn write<W: Write>(&self, writer: &mut BitWriter<W>) -> Result<()> {
        writer.write_bits(self.len() as u64, 16)?;

        for (byte, code) in self.entries() {
            writer.write_bits(u64::from(byte), 8)?;
            writer.write_bits(code.len() as u64, 8)?;
            writer.write_code(code)?;
        }

        Ok(())
    }

    /// Deserialize the inverse of `write`. Any short read is fatal.
    fn read<R: Read>(reader: &mut BitReader<R>) -> Result<Self> {
        let entry_count = field_bits(reader, 16, "encoding table size")?;
        if entry_count > ALPHABET as u64 {
            return Err(HuffmanError::TableTooLarge(entry_count as u32).into());
        }

        let mut table = Self::empty();

        for _ in 0..entry_count {
            let byte = field_bits(reader, 8, "table entry byte")? as u8;

            let code_length = field_bits(reader, 8, "code length")?;
            if code_length == 0 {
                return Err(HuffmanError::EmptyCode { byte }.into());
            }

            let mut code = Vec::with_capacity(code_length as usize);
            for _ in 0..code_length {
                code.push(field_bits(reader, 1, "code bits")? == 1);
            }

            table.codes[byte as usize] = code;
        }

        Ok(table)
    }
}

/// Read a fixed-width container field, naming the field on a short read.
fn field_bits<R: Read>(reader: &mut BitReader<R>, count: u32, field: &'static str) -> Result<u64> {
    match reader.read_bits(count) {
        Ok(value) => Ok(value),
        Err(Error::BitIo(BitIoError::UnexpectedEof)) => {
            Err(HuffmanError::TruncatedTable(field).into())
        }
        Err(e) => Err(e),
    }
}

/// A node of the decoding trie. `byte` is set exactly on leaves.
#[derive(Default)]
struct TrieNode {
    left: Option<Box<TrieNode>>,
    right: Option<Box<TrieNode>>,
    byte: Option<u8>,
}

/// Rebuild the decoding trie from a deserialized table: each code is a
/// root-to-leaf path, 0 descending left and 1 descending right.
///
/// Rejects tables where one code is a prefix of another; such a table
/// cannot have come from a code tree and would make decoding ambiguous.
fn build_decoding_tree(table: &EncodingTable) -> Result<TrieNode> {
    let mut root = TrieNode::default();

    for (byte, code) in table.entries() {
        let mut node = &mut root;

        for &bit in code {
            if node.byte.is_some() {
                return Err(HuffmanError::NotPrefixFree { byte }.into());
            }

            let child = if bit { &mut node.right } else { &mut node.left };
            node = &mut **child.get_or_insert_with(Default::default);
        }

        if node.byte.is_some() || node.left.is_some() || node.right.is_some() {
            return Err(HuffmanError::NotPrefixFree { byte }.into());
        }
        node.byte = Some(byte);
    }

    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use std::io::Cursor;

    fn huffman_encode(data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        encode(&mut Cursor::new(data), &mut out, None).unwrap();
        out
    }

    fn huffman_decode(data: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        decode(&mut &data[..], &mut out, None)?;
        Ok(out)
    }

    fn derived_table(data: &[u8]) -> (EncodingTable, [u64; ALPHABET]) {
        let freqs = build_frequency_table(&mut &data[..]).unwrap();
        let root = build_tree(&freqs).expect("non-empty input");
        (EncodingTable::from_tree(&root).unwrap(), freqs)
    }

    fn is_prefix_free(table: &EncodingTable) -> bool {
        let codes: Vec<&[bool]> = table.entries().map(|(_, code)| code).collect();
        for (i, a) in codes.iter().enumerate() {
            for (j, b) in codes.iter().enumerate() {
                if i != j && b.len() >= a.len() && &b[..a.len()] == *a {
                    return false;
                }
            }
        }
        true
    }

    #[test]
    fn test_frequency_table() {
        let freqs = build_frequency_table(&mut &b"aabbbz"[..]).unwrap();
        assert_eq!(freqs[b'a' as usize], 2);
        assert_eq!(freqs[b'b' as usize], 3);
        assert_eq!(freqs[b'z' as usize], 1);
        assert_eq!(freqs.iter().sum::<u64>(), 6);
    }

    #[test]
    fn test_round_trip_text() {
        let data = b"this is an example for huffman encoding";
        let encoded = huffman_encode(data);
        assert_eq!(huffman_decode(&encoded).unwrap(), data);

        let distinct = data.iter().collect::<std::collections::HashSet<_>>().len();
        let (table, _) = derived_table(data);
        assert_eq!(table.len(), distinct);
        assert!(is_prefix_free(&table));
    }

    #[test]
    fn test_single_byte_input() {
        let encoded = huffman_encode(b"A");

        let mut reader = BitReader::new(encoded.as_slice());
        let table = EncodingTable::read(&mut reader).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.code(b'A'), &[false]);

        let total_bits = reader.read_bits(64).unwrap();
        assert_eq!(total_bits, 1);

        assert_eq!(huffman_decode(&encoded).unwrap(), b"A");
    }

    #[test]
    fn test_single_symbol_run() {
        let data = vec![b'A'; 5000];
        let encoded = huffman_encode(&data);

        // One-bit codes: the payload is 5000 bits, well under the input size.
        assert!(encoded.len() < data.len() / 4);
        assert_eq!(huffman_decode(&encoded).unwrap(), data);
    }

    #[test]
    fn test_empty_input() {
        let encoded = huffman_encode(b"");

        // 16-bit zero entry count + 64-bit zero total, flushed to 10 bytes.
        assert_eq!(encoded, vec![0u8; 10]);
        assert!(huffman_decode(&encoded).unwrap().is_empty());
    }

    #[test]
    fn test_all_symbols() {
        let data: Vec<u8> = (0..=255u8).collect();
        let encoded = huffman_encode(&data);
        assert_eq!(huffman_decode(&encoded).unwrap(), data);

        let (table, _) = derived_table(&data);
        assert_eq!(table.len(), 256);
        assert!(is_prefix_free(&table));
    }

    #[test]
    fn test_two_symbols() {
        let data = b"ABABABABAB";
        let (table, _) = derived_table(data);
        assert_eq!(table.code(b'A').len(), 1);
        assert_eq!(table.code(b'B').len(), 1);

        let encoded = huffman_encode(data);
        assert_eq!(huffman_decode(&encoded).unwrap(), data);
    }

    #[test]
    fn test_skewed_frequencies_stay_prefix_free() {
        // Heavily skewed distribution produces long codes for rare bytes.
        let mut data = vec![b'a'; 10_000];
        for (i, byte) in (b'b'..=b'p').enumerate() {
            data.extend(std::iter::repeat(byte).take(1 << i));
        }

        let (table, freqs) = derived_table(&data);
        assert!(is_prefix_free(&table));
        for (_, code) in table.entries() {
            assert!((1..=255).contains(&code.len()));
        }

        let encoded = huffman_encode(&data);
        assert_eq!(huffman_decode(&encoded).unwrap(), data);

        // The declared bit count must match the table exactly.
        let mut reader = BitReader::new(encoded.as_slice());
        let parsed = EncodingTable::read(&mut reader).unwrap();
        let declared = reader.read_bits(64).unwrap();
        assert_eq!(declared, parsed.total_encoded_bits(&freqs));
    }

    #[test]
    fn test_bit_count_matches_emitted_payload() {
        let data = b"mississippi river";
        let (table, freqs) = derived_table(data);

        let expected: u64 = data.iter().map(|&b| table.code(b).len() as u64).sum();
        assert_eq!(table.total_encoded_bits(&freqs), expected);
    }

    #[test]
    fn test_round_trip_random_data() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for _ in 0..6 {
            let len = rng.gen_range(0..60_000);
            let data: Vec<u8> = (0..len).map(|_| rng.gen()).collect();

            let encoded = huffman_encode(&data);
            assert_eq!(huffman_decode(&encoded).unwrap(), data);
        }
    }

    #[test]
    fn test_round_trip_across_buffer_boundaries() {
        let data: Vec<u8> = (0..3 * BUFFER_SIZE + 333)
            .map(|i| (i % 7) as u8 * 31)
            .collect();
        let encoded = huffman_encode(&data);
        assert_eq!(huffman_decode(&encoded).unwrap(), data);
    }

    #[test]
    fn test_truncated_payload() {
        let encoded = huffman_encode(b"hello world, hello huffman");
        let truncated = &encoded[..encoded.len() - 1];

        let result = huffman_decode(truncated);
        assert!(matches!(
            result,
            Err(Error::Huffman(HuffmanError::TruncatedPayload { .. }))
        ));
    }

    #[test]
    fn test_truncated_table() {
        let encoded = huffman_encode(b"abc");
        let result = huffman_decode(&encoded[..1]);
        assert!(matches!(
            result,
            Err(Error::Huffman(HuffmanError::TruncatedTable(_)))
        ));
    }

    /// Handcraft a container: entries (byte, code), declared bit count,
    /// payload bits.
    fn craft(entries: &[(u8, &[bool])], total_bits: u64, payload: &[bool]) -> Vec<u8> {
        let mut out = Vec::new();
        let mut writer = BitWriter::new(&mut out);
        writer.write_bits(entries.len() as u64, 16).unwrap();
        for &(byte, code) in entries {
            writer.write_bits(u64::from(byte), 8).unwrap();
            writer.write_bits(code.len() as u64, 8).unwrap();
            writer.write_code(code).unwrap();
        }
        writer.write_bits(total_bits, 64).unwrap();
        writer.write_code(payload).unwrap();
        writer.flush().unwrap();
        out
    }

    #[test]
    fn test_invalid_code_hits_missing_child() {
        // Codes 0 and 10 leave 11 unassigned.
        let wire = craft(
            &[(b'A', &[false]), (b'B', &[true, false])],
            2,
            &[true, true],
        );
        assert!(matches!(
            huffman_decode(&wire),
            Err(Error::Huffman(HuffmanError::InvalidCode { position: 2 }))
        ));
    }

    #[test]
    fn test_incomplete_final_code() {
        let wire = craft(&[(b'A', &[false]), (b'B', &[true, false])], 1, &[true]);
        assert!(matches!(
            huffman_decode(&wire),
            Err(Error::Huffman(HuffmanError::IncompleteCode))
        ));
    }

    #[test]
    fn test_non_prefix_free_table_rejected() {
        // 0 is a prefix of 01.
        let wire = craft(&[(b'A', &[false]), (b'B', &[false, true])], 1, &[false]);
        assert!(matches!(
            huffman_decode(&wire),
            Err(Error::Huffman(HuffmanError::NotPrefixFree { .. }))
        ));
    }

    #[test]
    fn test_zero_length_code_rejected() {
        let wire = craft(&[(b'A', &[])], 0, &[]);
        assert!(matches!(
            huffman_decode(&wire),
            Err(Error::Huffman(HuffmanError::EmptyCode { byte: b'A' }))
        ));
    }

    #[test]
    fn test_oversized_table_rejected() {
        let wire = craft(&[], 0, &[]);
        // Patch the entry count to 300.
        let mut patched = wire;
        patched[0] = 0x01;
        patched[1] = 0x2C;
        assert!(matches!(
            huffman_decode(&patched),
            Err(Error::Huffman(HuffmanError::TableTooLarge(300)))
        ));
    }

    #[test]
    fn test_empty_table_with_payload_rejected() {
        let wire = craft(&[], 5, &[false; 5]);
        assert!(matches!(
            huffman_decode(&wire),
            Err(Error::Huffman(HuffmanError::EmptyTable { bits: 5 }))
        ));
    }

    #[test]
    fn test_decode_progress_is_monotonic() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let data: Vec<u8> = (0..200_000).map(|_| rng.gen_range(b'a'..=b'f')).collect();
        let encoded = huffman_encode(&data);

        let mut reported = Vec::new();
        let mut cb = |n: u64| reported.push(n);

        let mut out = Vec::new();
        decode(&mut &encoded[..], &mut out, Some(&mut cb)).unwrap();

        assert_eq!(out, data);
        assert!(!reported.is_empty());
        assert!(reported.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_encode_progress_ends_at_input_size() {
        let data = vec![b'q'; 2 * BUFFER_SIZE + 100];
        let mut reported = Vec::new();
        let mut cb = |n: u64| reported.push(n);

        let mut out = Vec::new();
        encode(&mut Cursor::new(&data), &mut out, Some(&mut cb)).unwrap();

        assert_eq!(*reported.last().unwrap(), data.len() as u64);
    }
}

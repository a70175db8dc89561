//! Sample input generation for demo runs.
//!
//! When no input file is given, the demo generates data with interesting
//! compression characteristics so both codecs have something to show:
//! long single-byte runs flatter RLE, skewed text-like sections flatter
//! Huffman, and random noise keeps either honest.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::io::Write;
use std::path::Path;

/// Letters weighted roughly like English text, so Huffman has a skewed
/// distribution to exploit.
const WEIGHTED_TEXT: &[u8] = b"eeeeeeeeeeeetttttttttaaaaaaaaooooooiiiiiinnnnnnsssshhhhrrrrddlllcumwfgypbvk .,\n";

/// Generate sample data of the given size with mixed compressibility.
///
/// The same seed always produces the same bytes.
pub fn generate_sample_data(seed: u64, size_bytes: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(size_bytes);

    while data.len() < size_bytes {
        let section = (size_bytes - data.len()).min(rng.gen_range(512..=8192));

        match rng.gen_range(0..100u32) {
            // Long runs, including some that overflow the RLE count byte
            0..=34 => {
                let byte: u8 = rng.gen();
                let mut remaining = section;
                while remaining > 0 {
                    let run = remaining.min(rng.gen_range(16..=1024));
                    data.extend(std::iter::repeat(byte).take(run));
                    remaining -= run;
                }
            }

            // Skewed text-like data
            35..=69 => {
                for _ in 0..section {
                    data.push(WEIGHTED_TEXT[rng.gen_range(0..WEIGHTED_TEXT.len())]);
                }
            }

            // Short repeating structure
            70..=84 => {
                let period = rng.gen_range(3..=24);
                let pattern: Vec<u8> = (0..period).map(|_| rng.gen()).collect();
                for i in 0..section {
                    data.push(pattern[i % pattern.len()]);
                }
            }

            // Incompressible noise
            _ => {
                for _ in 0..section {
                    data.push(rng.gen());
                }
            }
        }
    }

    data.truncate(size_bytes);
    data
}

/// Generate sample data and write it to a file.
pub fn write_sample_file(path: &Path, seed: u64, size_bytes: usize) -> std::io::Result<()> {
    let data = generate_sample_data(seed, size_bytes);
    let mut file = std::fs::File::create(path)?;
    file.write_all(&data)
}

//! Run statistics and reporting.
//!
//! Collects the few numbers worth printing after a run: byte counts on
//! both sides, the compression ratio, and wall-clock throughput. Updates
//! are explicit and single-threaded; the core never touches this.

use std::time::{Duration, Instant};

/// Counters and timing for one compression or round-trip run.
#[derive(Debug, Clone)]
pub struct RunStats {
    /// When the run started
    pub start_time: Instant,

    /// When the run ended (set on completion)
    pub end_time: Option<Instant>,

    /// Original (uncompressed) size in bytes
    pub input_bytes: u64,

    /// Compressed artifact size in bytes, including the header
    pub compressed_bytes: u64,

    /// Restored size in bytes, when the run decompressed as well
    pub restored_bytes: Option<u64>,
}

impl RunStats {
    /// Create new stats with the clock started.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            input_bytes: 0,
            compressed_bytes: 0,
            restored_bytes: None,
        }
    }

    /// Mark the run as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Total duration (or elapsed so far if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Compression ratio (compressed / original). 0.0 before any data.
    pub fn compression_ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            0.0
        } else {
            self.compressed_bytes as f64 / self.input_bytes as f64
        }
    }

    /// Space saving as a fraction (1 - ratio), clamped at zero for
    /// expanding inputs.
    pub fn space_saving(&self) -> f64 {
        (1.0 - self.compression_ratio()).max(0.0)
    }

    /// Throughput over the original bytes, in bytes/second.
    pub fn throughput_bps(&self) -> f64 {
        let secs = self.duration().as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.input_bytes as f64 / secs
        }
    }

    /// Whether the restored output matched the original size.
    pub fn verified(&self) -> Option<bool> {
        self.restored_bytes.map(|n| n == self.input_bytes)
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!();
        println!("=== Summary ===");
        println!("Duration: {} ms", self.duration().as_millis());
        println!(
            "Original:   {} bytes ({:.2} KiB)",
            self.input_bytes,
            self.input_bytes as f64 / 1024.0
        );
        println!(
            "Compressed: {} bytes ({:.2} KiB)",
            self.compressed_bytes,
            self.compressed_bytes as f64 / 1024.0
        );
        println!(
            "Ratio: {:.1}% (saved {:.1}%)",
            self.compression_ratio() * 100.0,
            self.space_saving() * 100.0
        );
        println!("Throughput: {:.2} MB/s", self.throughput_bps() / 1_000_000.0);

        match self.verified() {
            Some(true) => println!("Round trip: PASSED"),
            Some(false) => println!("Round trip: FAILED (size mismatch)"),
            None => {}
        }
        println!();
    }

    /// Export as a simple key=value text format (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "duration_ms={}\n\
             input_bytes={}\n\
             compressed_bytes={}\n\
             compression_ratio={:.4}\n",
            self.duration().as_millis(),
            self.input_bytes,
            self.compressed_bytes,
            self.compression_ratio(),
        )
    }
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compression_ratio() {
        let mut stats = RunStats::new();
        stats.input_bytes = 1000;
        stats.compressed_bytes = 250;

        assert_eq!(stats.compression_ratio(), 0.25);
        assert_eq!(stats.space_saving(), 0.75);
    }

    #[test]
    fn test_empty_input_ratio() {
        let stats = RunStats::new();
        assert_eq!(stats.compression_ratio(), 0.0);
    }

    #[test]
    fn test_expanding_input_saves_nothing() {
        let mut stats = RunStats::new();
        stats.input_bytes = 100;
        stats.compressed_bytes = 180;
        assert_eq!(stats.space_saving(), 0.0);
    }

    #[test]
    fn test_verification() {
        let mut stats = RunStats::new();
        stats.input_bytes = 500;
        assert_eq!(stats.verified(), None);

        stats.restored_bytes = Some(500);
        assert_eq!(stats.verified(), Some(true));

        stats.restored_bytes = Some(400);
        assert_eq!(stats.verified(), Some(false));
    }

    #[test]
    fn test_export_text() {
        let mut stats = RunStats::new();
        stats.input_bytes = 1000;
        stats.compressed_bytes = 500;

        let text = stats.export_text();
        assert!(text.contains("input_bytes=1000"));
        assert!(text.contains("compressed_bytes=500"));
        assert!(text.contains("compression_ratio=0.5000"));
    }
}

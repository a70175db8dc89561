//! bytepress: command-line shell around the compression core.
//!
//! Keeps the orchestration thin: resolve paths, run the dispatcher with a
//! progress renderer, report statistics. All codec behavior lives in
//! `bytepress-core`.

mod config;
mod input_gen;
mod stats;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use bytepress_core::{compress, decompress, read_header, Algorithm};
use config::{Config, Mode};
use stats::RunStats;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("error: {message}");
            eprintln!("try: bytepress --help");
            return ExitCode::from(2);
        }
    };

    if config.print_config {
        config.print();
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<(), String> {
    match config.mode {
        Mode::Compress => run_compress(config),
        Mode::Decompress => run_decompress(config),
        Mode::Demo => run_demo(config),
    }
}

fn run_compress(config: &Config) -> Result<(), String> {
    let Some(input) = config.input_file.as_ref() else {
        return Err("no input file".to_string());
    };
    let output = config
        .output_file
        .clone()
        .unwrap_or_else(|| compressed_name(input, config.algorithm));

    let mut run_stats = RunStats::new();

    println!(
        "Compressing {} -> {} ({})",
        input.display(),
        output.display(),
        config.algorithm
    );
    with_progress_line(|progress| compress(input, &output, config.algorithm, Some(progress)))
        .map_err(|e| e.to_string())?;

    run_stats.input_bytes = file_len(input)?;
    run_stats.compressed_bytes = file_len(&output)?;
    run_stats.complete();

    if config.print_stats {
        run_stats.print_summary();
    }
    Ok(())
}

fn run_decompress(config: &Config) -> Result<(), String> {
    let Some(input) = config.input_file.as_ref() else {
        return Err("no input file".to_string());
    };

    // The header knows the original extension; resolve the output name
    // before committing to the decode.
    let header = read_header(input).map_err(|e| e.to_string())?;
    let output = config
        .output_file
        .clone()
        .unwrap_or_else(|| input.with_extension(header.extension_lossy()));

    println!("Decompressing {} -> {}", input.display(), output.display());
    with_progress_line(|progress| decompress(input, &output, config.algorithm, Some(progress)))
        .map_err(|e| e.to_string())?;

    println!("Restored {} bytes", file_len(&output)?);
    Ok(())
}

/// Zero-argument flow: take (or generate) an input, compress it, restore
/// it under a different name, and verify the round trip byte for byte.
fn run_demo(config: &Config) -> Result<(), String> {
    let input = match &config.input_file {
        Some(path) => path.clone(),
        None => {
            let path = PathBuf::from("bytepress-sample.bin");
            println!(
                "Generating {} byte sample -> {} (seed {})",
                config.sample_bytes,
                path.display(),
                config.seed
            );
            input_gen::write_sample_file(&path, config.seed, config.sample_bytes)
                .map_err(|e| e.to_string())?;
            path
        }
    };

    let compressed = compressed_name(&input, config.algorithm);
    let mut run_stats = RunStats::new();

    println!(
        "Compressing {} -> {} ({})",
        input.display(),
        compressed.display(),
        config.algorithm
    );
    with_progress_line(|progress| compress(&input, &compressed, config.algorithm, Some(progress)))
        .map_err(|e| e.to_string())?;

    let header = read_header(&compressed).map_err(|e| e.to_string())?;
    let restored = input.with_extension(format!("restored.{}", header.extension_lossy()));

    println!("Decompressing {} -> {}", compressed.display(), restored.display());
    with_progress_line(|progress| {
        decompress(&compressed, &restored, config.algorithm, Some(progress))
    })
    .map_err(|e| e.to_string())?;

    run_stats.input_bytes = file_len(&input)?;
    run_stats.compressed_bytes = file_len(&compressed)?;
    run_stats.restored_bytes = Some(file_len(&restored)?);
    run_stats.complete();

    let original = fs::read(&input).map_err(|e| e.to_string())?;
    let round_tripped = fs::read(&restored).map_err(|e| e.to_string())?;
    if original != round_tripped {
        return Err("round trip verification failed: restored bytes differ".to_string());
    }

    if config.print_stats {
        run_stats.print_summary();
    }
    println!(
        "Artifacts: {}, {}",
        compressed.display(),
        restored.display()
    );
    Ok(())
}

/// Run a dispatcher call with a single-line percentage renderer.
fn with_progress_line<F>(f: F) -> bytepress_core::Result<()>
where
    F: FnOnce(&mut dyn FnMut(u8)) -> bytepress_core::Result<()>,
{
    let mut render = |percent: u8| {
        print!("\r  {percent:3}%");
        let _ = io::stdout().flush();
    };
    let result = f(&mut render);
    println!();
    result
}

/// `<stem>.rle` or `<stem>.huff` beside the input.
fn compressed_name(input: &Path, algorithm: Algorithm) -> PathBuf {
    input.with_extension(algorithm.compressed_extension())
}

fn file_len(path: &Path) -> Result<u64, String> {
    fs::metadata(path)
        .map(|m| m.len())
        .map_err(|e| format!("{}: {e}", path.display()))
}

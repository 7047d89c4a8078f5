//! lzma-cli - Command-line interface for lzmalib
//!
//! A command-line tool for compressing, decompressing and inspecting `.lzma`
//! streams.

use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use lzmalib::{
    compress_bytes_with, crc32, EncoderOptions, LzmaReader, Properties, SizeMode, StreamHeader,
};
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "lzma-cli")]
#[command(about = "A CLI tool for LZMA compression and decompression")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file into an .lzma stream
    Compress {
        /// Input file to compress
        input: PathBuf,

        /// Output compressed file
        output: PathBuf,

        /// Search effort preset
        #[arg(short, long, value_enum, default_value_t = CliPreset::Default)]
        preset: CliPreset,

        /// Literal context bits (0-8, lc + lp <= 4)
        #[arg(long, default_value_t = 3)]
        lc: u8,

        /// Literal position bits (0-4)
        #[arg(long, default_value_t = 0)]
        lp: u8,

        /// Position state bits (0-4)
        #[arg(long, default_value_t = 2)]
        pb: u8,

        /// Dictionary size in KiB (defaults to the preset's)
        #[arg(short, long)]
        dict_size_kib: Option<u32>,

        /// Write an end marker instead of the uncompressed size
        #[arg(short, long)]
        end_marker: bool,

        /// Force overwrite of output file
        #[arg(short, long)]
        force: bool,
    },

    /// Decompress an .lzma stream
    Decompress {
        /// Input compressed file
        input: PathBuf,

        /// Output decompressed file
        output: PathBuf,

        /// Expected CRC32 of the decompressed data, in hex
        #[arg(long)]
        expect_crc: Option<String>,

        /// Force overwrite of output file
        #[arg(short, long)]
        force: bool,
    },

    /// Get information about a compressed file
    Info {
        /// Compressed file to analyze
        input: PathBuf,
    },

    /// Print the CRC32 of a file
    Crc32 {
        /// File to checksum
        input: PathBuf,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum CliPreset {
    /// Shallow search, 1 MiB dictionary
    Fast,
    /// Balanced search, 8 MiB dictionary
    Default,
    /// Deep search, 64 MiB dictionary
    Best,
}

impl From<CliPreset> for EncoderOptions {
    fn from(preset: CliPreset) -> Self {
        match preset {
            CliPreset::Fast => EncoderOptions::fast(),
            CliPreset::Default => EncoderOptions::default(),
            CliPreset::Best => EncoderOptions::best(),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compress {
            input,
            output,
            preset,
            lc,
            lp,
            pb,
            dict_size_kib,
            end_marker,
            force,
        } => build_options(preset, lc, lp, pb, dict_size_kib, end_marker).and_then(|options| {
            compress_file(&input, &output, &options, force, cli.verbose, cli.quiet)
        }),
        Commands::Decompress {
            input,
            output,
            expect_crc,
            force,
        } => parse_crc(expect_crc.as_deref()).and_then(|expected| {
            decompress_file(&input, &output, expected, force, cli.verbose, cli.quiet)
        }),
        Commands::Info { input } => show_file_info(&input, cli.verbose),
        Commands::Crc32 { input } => show_crc32(&input),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn build_options(
    preset: CliPreset,
    lc: u8,
    lp: u8,
    pb: u8,
    dict_size_kib: Option<u32>,
    end_marker: bool,
) -> Result<EncoderOptions, Box<dyn std::error::Error>> {
    let options = EncoderOptions::from(preset);
    let dict_size = match dict_size_kib {
        Some(kib) => kib
            .checked_mul(1024)
            .ok_or_else(|| format!("Dictionary size {kib} KiB is too large"))?,
        None => options.properties.dict_size(),
    };
    let properties = Properties::new(lc, lp, pb, dict_size)?;
    let size_mode = if end_marker {
        SizeMode::EndMarker
    } else {
        SizeMode::Known
    };
    Ok(options
        .with_properties(properties)
        .with_size_mode(size_mode))
}

fn parse_crc(value: Option<&str>) -> Result<Option<u32>, Box<dyn std::error::Error>> {
    value
        .map(|text| {
            let digits = text.trim_start_matches("0x").trim_start_matches("0X");
            u32::from_str_radix(digits, 16).map_err(|e| -> Box<dyn std::error::Error> {
                format!("Invalid CRC32 '{text}': {e}").into()
            })
        })
        .transpose()
}

fn check_paths(input: &Path, output: &Path, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    // Check if input file exists
    if !input.exists() {
        return Err(format!("Input file '{}' does not exist", input.display()).into());
    }

    // Check if output file exists and force flag
    if output.exists() && !force {
        return Err(format!(
            "Output file '{}' already exists. Use --force to overwrite",
            output.display()
        )
        .into());
    }
    Ok(())
}

fn progress_bar(
    quiet: bool,
    size: usize,
    message: &'static str,
) -> Result<Option<ProgressBar>, Box<dyn std::error::Error>> {
    // Show progress bar for large files
    if quiet || size <= 1024 * 1024 {
        return Ok(None);
    }
    let pb = ProgressBar::new(2);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    pb.set_message(message);
    pb.inc(1);
    Ok(Some(pb))
}

fn compress_file(
    input: &Path,
    output: &Path,
    options: &EncoderOptions,
    force: bool,
    verbose: bool,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    check_paths(input, output, force)?;

    let props = options.properties;
    if verbose {
        println!(
            "Compressing '{}' to '{}'",
            input.display(),
            output.display()
        );
        println!(
            "lc={} lp={} pb={} dictionary={} bytes, {:?}",
            props.lc(),
            props.lp(),
            props.pb(),
            props.dict_size(),
            options.size_mode
        );
    }

    let start_time = Instant::now();

    // Read input file
    let input_data = fs::read(input)?;
    let input_size = input_data.len();

    if verbose {
        println!("Input size: {} bytes", input_size);
    }

    let progress = progress_bar(quiet, input_size, "Compressing...")?;

    let compressed_data = compress_bytes_with(&input_data, options)
        .map_err(|e| format!("Compression failed: {}", e))?;

    if let Some(ref pb) = progress {
        pb.inc(1);
        pb.finish_with_message("Compression complete");
    }

    // Write output file
    fs::write(output, &compressed_data)?;

    let compression_time = start_time.elapsed();
    let output_size = compressed_data.len();
    let compression_ratio = (output_size as f64 / input_size.max(1) as f64) * 100.0;

    if !quiet {
        println!("✓ Compression successful!");
        println!("  Input:  {} bytes", input_size);
        println!("  Output: {} bytes", output_size);
        println!("  Ratio:  {:.1}%", compression_ratio);
        println!("  CRC32:  {:08x}", crc32(&input_data));
        println!("  Time:   {:.2?}", compression_time);
    }

    Ok(())
}

fn decompress_file(
    input: &Path,
    output: &Path,
    expected_crc: Option<u32>,
    force: bool,
    verbose: bool,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    check_paths(input, output, force)?;

    if verbose {
        println!(
            "Decompressing '{}' to '{}'",
            input.display(),
            output.display()
        );
    }

    let start_time = Instant::now();

    // Read input file
    let compressed_data = fs::read(input)?;
    let input_size = compressed_data.len();

    if verbose {
        println!("Compressed size: {} bytes", input_size);
    }

    let progress = progress_bar(quiet, input_size, "Decompressing...")?;

    let decompressed_data = lzmalib::decompress_bytes(&compressed_data)
        .map_err(|e| format!("Decompression failed: {}", e))?;

    if let Some(ref pb) = progress {
        pb.inc(1);
        pb.finish_with_message("Decompression complete");
    }

    // Verify before anything is written
    let actual_crc = crc32(&decompressed_data);
    if let Some(expected) = expected_crc {
        if expected != actual_crc {
            return Err(format!(
                "CRC32 mismatch: expected {expected:08x}, got {actual_crc:08x}"
            )
            .into());
        }
    }

    // Write output file
    fs::write(output, &decompressed_data)?;

    let decompression_time = start_time.elapsed();
    let output_size = decompressed_data.len();

    if !quiet {
        println!("✓ Decompression successful!");
        println!("  Input:  {} bytes", input_size);
        println!("  Output: {} bytes", output_size);
        println!("  CRC32:  {:08x}", actual_crc);
        println!("  Time:   {:.2?}", decompression_time);
    }

    Ok(())
}

fn show_file_info(input: &Path, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    // Check if input file exists
    if !input.exists() {
        return Err(format!("Input file '{}' does not exist", input.display()).into());
    }

    // Read the file
    let data = fs::read(input)?;
    let file_size = data.len();
    let header = StreamHeader::parse(&data)?;
    let props = header.properties;

    println!("LZMA File Information:");
    println!("  File: {}", input.display());
    println!("  Size: {} bytes", file_size);
    println!(
        "  Properties: lc={} lp={} pb={} (byte {:#04x})",
        props.lc(),
        props.lp(),
        props.pb(),
        props.to_byte()
    );
    println!("  Dictionary Size: {} bytes", props.dict_size());
    match header.uncompressed_size {
        Some(size) => println!("  Declared Size: {} bytes", size),
        None => println!("  Declared Size: unknown (end marker)"),
    }

    if verbose {
        println!("  Header bytes: {}", hex_bytes(&data[..lzmalib::HEADER_SIZE]));
    }

    let mut reader = LzmaReader::new(std::io::Cursor::new(&data[..]))?;
    let mut decompressed = Vec::new();
    match reader.decode_to_end(&mut decompressed) {
        Ok(_) => {
            let stats = reader.stats();
            let compression_ratio = (file_size as f64 / decompressed.len().max(1) as f64) * 100.0;
            println!("  Decompressed Size: {} bytes", decompressed.len());
            println!("  Compression Ratio: {:.1}%", compression_ratio);
            println!("  CRC32: {:08x}", crc32(&decompressed));
            println!(
                "  Symbols: {} literals, {} matches, {} reps, {} short reps",
                stats.literal_count, stats.match_count, stats.rep_count, stats.short_rep_count
            );
            println!("  Longest Match: {} bytes", stats.longest_match);
            println!("  Status: ✓ Valid LZMA stream");
        }
        Err(e) => {
            println!("  Status: ✗ Invalid or corrupted LZMA stream");
            println!("  Decoded before error: {} bytes", decompressed.len());
            if verbose {
                println!("  Error: {}", e);
            }
        }
    }

    Ok(())
}

fn show_crc32(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    println!("{:08x}  {}", crc32(&data), input.display());
    Ok(())
}

fn hex_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

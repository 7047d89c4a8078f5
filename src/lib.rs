//! lzmalib - Rust implementation of the LZMA stream codec
//!
//! This crate provides a pure Rust implementation of the `.lzma` ("LZMA alone")
//! format: adaptive binary range coding over a sliding-window dictionary,
//! driven by a 12-state literal/match state machine. It is used to unpack
//! compressed resource payloads before they are handed on, together with a
//! CRC32 helper for checking the decompressed bytes against a stored value.
//!
//! # Features
//!
//! - Decompression of streams with a declared size or an end marker
//! - Compression with hash chain match finding and repeat-distance reuse
//! - All valid `lc`/`lp`/`pb` combinations, dictionaries from 4 KiB to 1 GiB
//! - Streaming API via Read/Write traits
//! - Typed errors; a failed stream never yields a silent wrong result
//!
//! # Example - Decompression
//!
//! ```no_run
//! use lzmalib::{crc32, decompress_bytes, LzmaReader};
//! use std::io::Read;
//!
//! let compressed_data = std::fs::read("texture.lzma")?;
//! let decompressed = decompress_bytes(&compressed_data)?;
//! println!("crc32 = {:08x}", crc32(&decompressed));
//!
//! // Or use streaming API
//! let mut reader = LzmaReader::new(std::io::Cursor::new(compressed_data))?;
//! let mut output = Vec::new();
//! reader.read_to_end(&mut output)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Example - Compression
//!
//! ```no_run
//! use lzmalib::{compress_bytes, LzmaWriter, Properties};
//! use std::io::Write;
//!
//! let data = b"Hello, World! Hello, World!";
//! let compressed = compress_bytes(data, Properties::default())?;
//!
//! // Or use streaming API
//! let mut writer = LzmaWriter::new(Vec::new(), Properties::new(3, 0, 2, 1 << 20)?)?;
//! writer.write_all(data)?;
//! let output = writer.finish()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

// Public modules
pub mod common;
pub mod crc32;
pub mod decode;
pub mod encode;
pub mod error;
pub mod model;
pub mod state;
pub mod tables;

// Async modules (only available with async feature)
#[cfg(feature = "async")]
pub mod async_batch;
#[cfg(feature = "async")]
pub mod async_convenience;

// Re-export commonly used types
pub use common::{
    CodecStats, EncoderOptions, LzmaError, Properties, Result, SizeMode, StreamHeader,
    HEADER_SIZE, MAX_DICT_SIZE, MIN_DICT_SIZE,
};
pub use crc32::{crc32, Crc32};
pub use decode::{decompress_bytes_partial, DecoderStatus, LzmaReader};
pub use encode::{compress_bytes_with, LzmaWriter};

// Re-export async types when async feature is enabled
#[cfg(feature = "async")]
pub use async_batch::AsyncBatchProcessor;
#[cfg(feature = "async")]
pub use async_convenience::*;

// Convenience functions

/// Compress data into an `.lzma` stream with a declared size
///
/// # Arguments
/// * `data` - The data to compress
/// * `properties` - Model parameters and dictionary size
///
/// # Returns
/// A vector containing the header followed by the compressed payload
pub fn compress_bytes(data: &[u8], properties: Properties) -> Result<Vec<u8>> {
    encode::compress_bytes(data, properties)
}

/// Decompress an `.lzma` stream
///
/// # Arguments
/// * `data` - The header followed by the compressed payload
///
/// # Returns
/// A vector containing the decompressed data
pub fn decompress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    decode::decompress_bytes(data)
}

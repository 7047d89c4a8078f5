//! LZMA compression
//!
//! Range encoder, hash chain match finder, greedy parse and the streaming
//! [`LzmaWriter`] that ties them together.

mod hash;
mod pattern;
mod range;
mod state;
mod writer;

pub use hash::MatchFinder;
pub use pattern::{Choice, MatchResult};
pub use range::RangeEncoder;
pub use state::EncoderState;
pub use writer::LzmaWriter;

use crate::common::{EncoderOptions, Properties};
use crate::{LzmaError, Result};
use std::io::Write;

/// Hash table size for the match finder, in bits
pub const HASH_BITS: u32 = 16;

/// Shortest match the hash chains can find
pub const MIN_MATCH_FIND: u32 = 3;

/// Distance from which a 3-byte match is not worth coding (16 KiB)
pub const FAR_MATCH_3: usize = 1 << 14;

/// Convenience function to compress data in memory with a declared size
pub fn compress_bytes(data: &[u8], properties: Properties) -> Result<Vec<u8>> {
    compress_bytes_with(data, &EncoderOptions::new(properties))
}

/// Convenience function to compress data in memory with explicit options
pub fn compress_bytes_with(data: &[u8], options: &EncoderOptions) -> Result<Vec<u8>> {
    if data.len() as u64 > u32::MAX as u64 {
        return Err(LzmaError::InputTooLarge(data.len() as u64));
    }
    let mut output = Vec::with_capacity(data.len() / 2 + 32);
    {
        let mut writer = LzmaWriter::with_options(&mut output, *options)?;
        writer.write_all(data)?;
        writer.finish()?;
    }
    Ok(output)
}

//! LZMA decompression
//!
//! Range decoder, dictionary window, symbol decoders and the streaming
//! [`LzmaReader`] that drives them.

mod decoder;
mod range;
mod reader;
mod state;
mod window;

pub use decoder::Progress;
pub use range::RangeDecoder;
pub use reader::LzmaReader;
pub use state::{DecoderState, DecoderStatus};
pub use window::DictWindow;

use crate::Result;
use std::io::Cursor;

/// Input buffer size for the range decoder (8 KiB)
pub const IN_BUFF_SIZE: usize = 0x2000;

/// Output produced per decode chunk before it is handed out (64 KiB)
pub const OUT_CHUNK_SIZE: usize = 0x10000;

/// Largest up-front reservation made from a declared size (64 MiB)
pub const MAX_OUTPUT_RESERVE: u64 = 64 << 20;

/// Convenience function to decompress an in-memory `.lzma` stream
pub fn decompress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut reader = LzmaReader::new(Cursor::new(data))?;
    let mut output = Vec::new();
    reader.decode_to_end(&mut output)?;
    Ok(output)
}

/// Decompress, returning whatever was produced alongside the verdict
///
/// The bytes preceding an error are diagnostic only; adaptive state after a
/// corrupted symbol is meaningless, so nothing past the error is produced.
pub fn decompress_bytes_partial(data: &[u8]) -> (Vec<u8>, Result<()>) {
    let mut output = Vec::new();
    let result = LzmaReader::new(Cursor::new(data))
        .and_then(|mut reader| reader.decode_to_end(&mut output).map(|_| ()));
    (output, result)
}

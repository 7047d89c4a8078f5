//! Common types and constants for the LZMA stream codec
//!
//! This module defines the core types, constants, and structures used by both
//! the compression (encode) and decompression (decode) directions.

use thiserror::Error;

/// Smallest dictionary the codec works with (4 KiB)
pub const MIN_DICT_SIZE: u32 = 1 << 12;

/// Largest dictionary accepted in a properties block (1 GiB)
pub const MAX_DICT_SIZE: u32 = 1 << 30;

/// Size of the `.lzma` stream header in bytes
pub const HEADER_SIZE: usize = 13;

/// Uncompressed size value meaning "unknown, stream ends with an end marker"
pub const UNKNOWN_SIZE: u64 = u64::MAX;

/// Largest valid properties byte: `(4 * 5 + 4) * 9 + 8`
pub const MAX_PROPS_BYTE: u8 = 224;

/// Largest sum of literal context bits and literal position bits
pub const MAX_LC_PLUS_LP: u8 = 4;

/// Error type for LZMA operations
#[derive(Debug, Error)]
pub enum LzmaError {
    /// Properties out of range (lc/lp/pb, lc + lp, dictionary size)
    #[error("Invalid properties: {0}")]
    InvalidProperties(String),

    /// Input ended before the stream was complete
    #[error("Stream truncated: input exhausted before end of stream")]
    StreamTruncated,

    /// Back-reference reaching beyond the bytes produced so far or the window
    #[error("Invalid distance {distance} at output position {position}")]
    InvalidDistance {
        /// Encoded distance (real distance minus one)
        distance: u32,
        /// Number of bytes produced when the reference was decoded
        position: u64,
    },

    /// Structurally impossible symbol sequence
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Declared uncompressed length not reached, or exceeded
    #[error("Length mismatch: declared {declared} bytes, stream produced {actual}")]
    LengthMismatch {
        /// Length stored in the header
        declared: u64,
        /// Length reached when the mismatch was detected
        actual: u64,
    },

    /// Input too large for the encoder's position space
    #[error("Input too large: {0} bytes")]
    InputTooLarge(u64),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for LZMA operations
pub type Result<T> = std::result::Result<T, LzmaError>;

/// Model parameters fixed for the lifetime of one stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Properties {
    lc: u8,
    lp: u8,
    pb: u8,
    dict_size: u32,
}

impl Properties {
    /// Create validated properties
    ///
    /// # Arguments
    /// * `lc` - Literal context bits (0..=8, lc + lp <= 4)
    /// * `lp` - Literal position bits (0..=4)
    /// * `pb` - Position state bits (0..=4)
    /// * `dict_size` - Dictionary size in bytes
    pub fn new(lc: u8, lp: u8, pb: u8, dict_size: u32) -> Result<Self> {
        if lc > 8 || lp > 4 || pb > 4 {
            return Err(LzmaError::InvalidProperties(format!(
                "lc={lc} lp={lp} pb={pb} out of range"
            )));
        }
        if lc + lp > MAX_LC_PLUS_LP {
            return Err(LzmaError::InvalidProperties(format!(
                "lc + lp = {} exceeds {MAX_LC_PLUS_LP}",
                lc + lp
            )));
        }
        if !(MIN_DICT_SIZE..=MAX_DICT_SIZE).contains(&dict_size) {
            return Err(LzmaError::InvalidProperties(format!(
                "dictionary size {dict_size} outside {MIN_DICT_SIZE}..={MAX_DICT_SIZE}"
            )));
        }
        Ok(Self {
            lc,
            lp,
            pb,
            dict_size,
        })
    }

    /// Decode the packed properties byte `(pb * 5 + lp) * 9 + lc`
    pub fn from_byte(byte: u8, dict_size: u32) -> Result<Self> {
        if byte > MAX_PROPS_BYTE {
            return Err(LzmaError::InvalidProperties(format!(
                "properties byte {byte} exceeds {MAX_PROPS_BYTE}"
            )));
        }
        let lc = byte % 9;
        let rest = byte / 9;
        Self::new(lc, rest % 5, rest / 5, dict_size)
    }

    /// Packed properties byte
    pub fn to_byte(&self) -> u8 {
        (self.pb * 5 + self.lp) * 9 + self.lc
    }

    /// Return a copy with a different dictionary size
    pub fn with_dict_size(self, dict_size: u32) -> Result<Self> {
        Self::new(self.lc, self.lp, self.pb, dict_size)
    }

    /// Literal context bits
    pub fn lc(&self) -> u8 {
        self.lc
    }

    /// Literal position bits
    pub fn lp(&self) -> u8 {
        self.lp
    }

    /// Position state bits
    pub fn pb(&self) -> u8 {
        self.pb
    }

    /// Dictionary size in bytes
    pub fn dict_size(&self) -> u32 {
        self.dict_size
    }

    /// Mask applied to the output position to get the position state
    pub fn pos_mask(&self) -> u32 {
        (1 << self.pb) - 1
    }

    /// Mask applied to the output position for literal position bits
    pub fn literal_pos_mask(&self) -> u32 {
        (1 << self.lp) - 1
    }

    /// Number of literal coder contexts, `1 << (lc + lp)`
    pub fn literal_contexts(&self) -> usize {
        1 << (self.lc + self.lp)
    }
}

impl Default for Properties {
    fn default() -> Self {
        Self {
            lc: 3,
            lp: 0,
            pb: 2,
            dict_size: 1 << 23,
        }
    }
}

/// How the end of the stream is signalled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeMode {
    /// Header stores the uncompressed length; no end marker is written
    #[default]
    Known,
    /// Header stores the unknown-size value; the stream ends with an end marker
    EndMarker,
}

/// Encoder configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderOptions {
    /// Model parameters written to the header
    pub properties: Properties,
    /// Declared size or end marker
    pub size_mode: SizeMode,
    /// Hash chain candidates examined per position
    pub depth: u32,
    /// Match length that stops the search early
    pub nice_len: u32,
}

impl EncoderOptions {
    /// Options with default search effort for the given properties
    pub fn new(properties: Properties) -> Self {
        Self {
            properties,
            ..Self::default()
        }
    }

    /// Shallow search, 1 MiB dictionary
    pub fn fast() -> Self {
        Self {
            properties: Properties {
                dict_size: 1 << 20,
                ..Properties::default()
            },
            size_mode: SizeMode::Known,
            depth: 4,
            nice_len: 32,
        }
    }

    /// Deep search, 64 MiB dictionary
    pub fn best() -> Self {
        Self {
            properties: Properties {
                dict_size: 1 << 26,
                ..Properties::default()
            },
            size_mode: SizeMode::Known,
            depth: 256,
            nice_len: 273,
        }
    }

    /// Replace the size mode
    pub fn with_size_mode(mut self, size_mode: SizeMode) -> Self {
        self.size_mode = size_mode;
        self
    }

    /// Replace the model parameters
    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            properties: Properties::default(),
            size_mode: SizeMode::Known,
            depth: 32,
            nice_len: 64,
        }
    }
}

/// Parsed `.lzma` stream header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamHeader {
    /// Model parameters
    pub properties: Properties,
    /// Declared uncompressed size, `None` when the stream uses an end marker
    pub uncompressed_size: Option<u64>,
}

impl StreamHeader {
    /// Parse the 13-byte header at the start of `data`
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(LzmaError::StreamTruncated);
        }

        let mut dict_bytes = [0u8; 4];
        dict_bytes.copy_from_slice(&data[1..5]);
        // The reference decoder treats any smaller dictionary as 4 KiB
        let dict_size = u32::from_le_bytes(dict_bytes).max(MIN_DICT_SIZE);
        let properties = Properties::from_byte(data[0], dict_size)?;

        let mut size_bytes = [0u8; 8];
        size_bytes.copy_from_slice(&data[5..13]);
        let size = u64::from_le_bytes(size_bytes);

        Ok(Self {
            properties,
            uncompressed_size: (size != UNKNOWN_SIZE).then_some(size),
        })
    }

    /// Serialize the header
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[0] = self.properties.to_byte();
        out[1..5].copy_from_slice(&self.properties.dict_size().to_le_bytes());
        out[5..13].copy_from_slice(
            &self
                .uncompressed_size
                .unwrap_or(UNKNOWN_SIZE)
                .to_le_bytes(),
        );
        out
    }
}

/// Statistics for compression/decompression operations
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CodecStats {
    /// Number of literal bytes encoded/decoded
    pub literal_count: u64,
    /// Number of matches with an explicit distance
    pub match_count: u64,
    /// Number of repeat-distance matches
    pub rep_count: u64,
    /// Number of single-byte repeats of the most recent distance
    pub short_rep_count: u64,
    /// Total uncompressed bytes processed
    pub bytes_processed: u64,
    /// Longest match found
    pub longest_match: u32,
}

impl CodecStats {
    pub(crate) fn record_match(&mut self, length: u32) {
        self.bytes_processed += u64::from(length);
        self.longest_match = self.longest_match.max(length);
    }
}

//! Property-based tests for the lzmalib codec
//!
//! These tests use randomized inputs to verify correctness across a wide range
//! of data patterns, model parameters and damaged streams.

use lzmalib::{
    compress_bytes, compress_bytes_with, crc32, decompress_bytes, decompress_bytes_partial,
    Crc32, EncoderOptions, Properties, SizeMode,
};
use proptest::prelude::*;

/// Valid (lc, lp, pb) triples
fn model_params() -> impl Strategy<Value = (u8, u8, u8)> {
    (0u8..=4, 0u8..=4, 0u8..=4).prop_filter("lc + lp <= 4", |(lc, lp, _)| lc + lp <= 4)
}

fn size_mode() -> impl Strategy<Value = SizeMode> {
    prop_oneof![Just(SizeMode::Known), Just(SizeMode::EndMarker)]
}

proptest! {
    #[test]
    fn test_decompression_never_panics(data in prop::collection::vec(any::<u8>(), 0..1000)) {
        // Random bytes are rarely a valid stream, but must only ever produce errors
        let _ = decompress_bytes(&data);
    }
}

proptest! {
    #[test]
    fn test_payload_corruption_never_panics(
        data in prop::collection::vec(any::<u8>(), 0..400),
        garbage in prop::collection::vec(any::<u8>(), 1..200)
    ) {
        // Valid header, random payload
        let mut stream = compress_bytes(&data, Properties::default())?;
        stream.truncate(13);
        stream.push(0);
        stream.extend_from_slice(&garbage);
        let (partial, _) = decompress_bytes_partial(&stream);
        prop_assert!(partial.len() <= data.len());
    }
}

proptest! {
    #[test]
    fn test_round_trip_any_parameters(
        data in prop::collection::vec(any::<u8>(), 0..2000),
        (lc, lp, pb) in model_params(),
        mode in size_mode()
    ) {
        let properties = Properties::new(lc, lp, pb, 1 << 16)?;
        let options = EncoderOptions::new(properties).with_size_mode(mode);
        let compressed = compress_bytes_with(&data, &options)?;
        let decompressed = decompress_bytes(&compressed)?;
        prop_assert_eq!(&data[..], &decompressed[..]);
    }
}

proptest! {
    #[test]
    fn test_repetitive_patterns(
        pattern in prop::collection::vec(any::<u8>(), 1..20),
        repeat_count in 2..80u8
    ) {
        let mut data = Vec::new();
        for _ in 0..repeat_count {
            data.extend_from_slice(&pattern);
        }

        for options in [EncoderOptions::fast(), EncoderOptions::default()] {
            let compressed = compress_bytes_with(&data, &options)?;
            let decompressed = decompress_bytes(&compressed)?;
            prop_assert_eq!(&data[..], &decompressed[..]);

            // Repeats code as matches, so the payload stays small
            prop_assert!(
                compressed.len() <= pattern.len() + 13 + 64,
                "Compression expanded too much: {} -> {}",
                data.len(),
                compressed.len()
            );
        }
    }
}

proptest! {
    #[test]
    fn test_single_byte_patterns(byte_value in any::<u8>(), size in 1..3000usize) {
        let data = vec![byte_value; size];
        let compressed = compress_bytes(&data, Properties::default())?;
        let decompressed = decompress_bytes(&compressed)?;
        prop_assert_eq!(&data[..], &decompressed[..]);
    }
}

proptest! {
    #[test]
    fn test_small_dictionary(
        chunks in prop::collection::vec(prop::collection::vec(any::<u8>(), 1..64), 1..200)
    ) {
        // Mix repeated and fresh chunks so matches cross the 4 KiB window
        let mut data = Vec::new();
        for (i, chunk) in chunks.iter().enumerate() {
            data.extend_from_slice(chunk);
            if i % 3 == 0 {
                data.extend_from_slice(&chunks[i / 2]);
            }
        }
        let properties = Properties::new(3, 0, 2, 4096)?;
        let compressed = compress_bytes(&data, properties)?;
        let decompressed = decompress_bytes(&compressed)?;
        prop_assert_eq!(&data[..], &decompressed[..]);
    }
}

proptest! {
    #[test]
    fn test_compression_ratio_bounds(data in prop::collection::vec(any::<u8>(), 10..2000)) {
        let compressed = compress_bytes(&data, Properties::default())?;
        // Incompressible input grows by the header plus a small coder overhead
        prop_assert!(
            compressed.len() <= data.len() + data.len() / 16 + 64,
            "Compression expanded data too much: {} -> {}",
            data.len(),
            compressed.len()
        );
    }
}

proptest! {
    #[test]
    fn test_truncated_streams_fail(data in prop::collection::vec(any::<u8>(), 1..300), cut in any::<prop::sample::Index>()) {
        let compressed = compress_bytes(&data, Properties::default())?;
        let len = cut.index(compressed.len());
        prop_assert!(decompress_bytes(&compressed[..len]).is_err());
    }
}

proptest! {
    #[test]
    fn test_compression_deterministic(data in prop::collection::vec(any::<u8>(), 10..500)) {
        let compressed1 = compress_bytes(&data, Properties::default())?;
        let compressed2 = compress_bytes(&data, Properties::default())?;
        // Same input should always produce same output
        prop_assert_eq!(compressed1, compressed2);
    }
}

proptest! {
    #[test]
    fn test_crc32_incremental(data in prop::collection::vec(any::<u8>(), 0..1000), split in any::<prop::sample::Index>()) {
        let at = if data.is_empty() { 0 } else { split.index(data.len()) };
        let mut hasher = Crc32::new();
        hasher.update(&data[..at]);
        hasher.update(&data[at..]);
        prop_assert_eq!(hasher.digest(), crc32(&data));
    }
}

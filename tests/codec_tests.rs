//! Tests for the LZMA codec
//!
//! Round trips across model parameters and size modes, the streaming
//! interfaces, and every way a damaged stream has to be rejected.

use lzmalib::encode::{EncoderState, RangeEncoder};
use lzmalib::{
    compress_bytes, compress_bytes_with, decompress_bytes, decompress_bytes_partial,
    DecoderStatus, EncoderOptions, LzmaError, LzmaReader, LzmaWriter, Properties, SizeMode,
    StreamHeader, HEADER_SIZE,
};
use std::io::{Cursor, Read, Write};

/// Deterministic pseudo-random bytes
fn noise(len: usize, seed: u32) -> Vec<u8> {
    let mut x = seed;
    (0..len)
        .map(|_| {
            x = x.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (x >> 24) as u8
        })
        .collect()
}

/// Text with plenty of repeats at short and long distances
fn sample_text() -> Vec<u8> {
    let mut data = Vec::new();
    for i in 0..200 {
        data.extend_from_slice(
            format!("line {i}: The quick brown fox jumps over the lazy dog.\n").as_bytes(),
        );
    }
    data
}

/// Wrap a hand-built payload in a header
fn stream(properties: Properties, size: Option<u64>, payload: &[u8]) -> Vec<u8> {
    let header = StreamHeader {
        properties,
        uncompressed_size: size,
    };
    let mut out = header.to_bytes().to_vec();
    out.extend_from_slice(payload);
    out
}

/// Test basic round trip with default properties
#[test]
fn test_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let test_data = b"Hello, World! This is a test of the LZMA compression system.";

    let compressed = compress_bytes(test_data, Properties::default())?;
    assert!(compressed.len() >= HEADER_SIZE + 5);

    let decompressed = decompress_bytes(&compressed)?;
    assert_eq!(test_data, &decompressed[..]);

    Ok(())
}

/// Test round trips over a spread of lc/lp/pb and both size modes
#[test]
fn test_round_trip_all_parameters() -> Result<(), Box<dyn std::error::Error>> {
    let mut data = sample_text();
    data.extend(noise(3000, 7));
    data.extend_from_slice(&sample_text()[..1000]);

    let params = [
        (3, 0, 2),
        (0, 0, 0),
        (0, 4, 4),
        (4, 0, 4),
        (4, 0, 0),
        (0, 4, 0),
        (1, 3, 1),
        (2, 2, 3),
    ];

    for (lc, lp, pb) in params {
        for size_mode in [SizeMode::Known, SizeMode::EndMarker] {
            println!("Testing lc={lc} lp={lp} pb={pb} {size_mode:?}");

            let properties = Properties::new(lc, lp, pb, 1 << 16)?;
            let options = EncoderOptions::new(properties).with_size_mode(size_mode);
            let compressed = compress_bytes_with(&data, &options)?;

            let header = StreamHeader::parse(&compressed)?;
            assert_eq!(header.properties, properties);
            match size_mode {
                SizeMode::Known => assert_eq!(header.uncompressed_size, Some(data.len() as u64)),
                SizeMode::EndMarker => assert_eq!(header.uncompressed_size, None),
            }

            let decompressed = decompress_bytes(&compressed)?;
            assert_eq!(
                data, decompressed,
                "Round-trip failed for lc={lc} lp={lp} pb={pb} {size_mode:?}"
            );
        }
    }

    Ok(())
}

/// Test that each preset compresses and decodes
#[test]
fn test_presets() -> Result<(), Box<dyn std::error::Error>> {
    let data = sample_text();
    for options in [
        EncoderOptions::fast(),
        EncoderOptions::default(),
        EncoderOptions::best(),
    ] {
        let compressed = compress_bytes_with(&data, &options)?;
        assert!(compressed.len() < data.len() / 4);
        assert_eq!(decompress_bytes(&compressed)?, data);
    }
    Ok(())
}

/// Test empty input in both size modes
#[test]
fn test_empty_input() -> Result<(), Box<dyn std::error::Error>> {
    let compressed = compress_bytes(b"", Properties::default())?;
    // Header plus the five flush bytes of an empty range coder
    assert_eq!(compressed.len(), HEADER_SIZE + 5);
    assert_eq!(&compressed[HEADER_SIZE..], &[0u8; 5]);
    assert!(decompress_bytes(&compressed)?.is_empty());

    let options = EncoderOptions::default().with_size_mode(SizeMode::EndMarker);
    let compressed = compress_bytes_with(b"", &options)?;
    assert!(decompress_bytes(&compressed)?.is_empty());

    Ok(())
}

/// Test single bytes and runs of one byte
#[test]
fn test_runs() -> Result<(), Box<dyn std::error::Error>> {
    for len in [1usize, 2, 3, 4, 273, 274, 1000, 70_000] {
        let data = vec![b'z'; len];
        let compressed = compress_bytes(&data, Properties::default())?;
        assert_eq!(decompress_bytes(&compressed)?, data, "run of {len}");
    }
    Ok(())
}

/// Test a match reaching the oldest byte a 4 KiB dictionary holds
#[test]
fn test_dictionary_boundary() -> Result<(), Box<dyn std::error::Error>> {
    let mut data = noise(4096, 99);
    let head = data[..64].to_vec();
    data.extend_from_slice(&head);

    let properties = Properties::new(3, 0, 2, 4096)?;
    let mut writer = LzmaWriter::new(Vec::new(), properties)?;
    writer.write_all(&data)?;
    let (compressed, stats) = writer.finish_with_stats()?;

    assert!(stats.match_count + stats.rep_count > 0);
    assert!(stats.longest_match >= 64);
    assert_eq!(decompress_bytes(&compressed)?, data);

    // Longer than the dictionary: the window wraps many times
    let mut long = Vec::new();
    for i in 0..40 {
        long.extend(noise(1500, i % 5));
    }
    let compressed = compress_bytes(&long, properties)?;
    assert_eq!(decompress_bytes(&compressed)?, long);

    Ok(())
}

/// Test streaming decode with a tiny read buffer
#[test]
fn test_streaming_read_small_chunks() -> Result<(), Box<dyn std::error::Error>> {
    let mut data = sample_text();
    data.extend(noise(150_000, 3));
    data.extend(sample_text());

    for size_mode in [SizeMode::Known, SizeMode::EndMarker] {
        let options = EncoderOptions::default().with_size_mode(size_mode);
        let compressed = compress_bytes_with(&data, &options)?;

        let mut reader = LzmaReader::new(Cursor::new(compressed))?;
        assert_eq!(reader.status(), DecoderStatus::Ready);

        let mut output = Vec::new();
        let mut buf = [0u8; 7];
        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            output.extend_from_slice(&buf[..n]);
        }

        assert_eq!(output, data);
        assert_eq!(reader.status(), DecoderStatus::Finished);
        assert_eq!(reader.total_out(), data.len() as u64);
        assert!(reader.stats().literal_count > 0);
    }

    Ok(())
}

/// Test streaming encode through the Write impl in pieces
#[test]
fn test_streaming_write() -> Result<(), Box<dyn std::error::Error>> {
    let data = sample_text();
    let mut writer = LzmaWriter::new(Vec::new(), Properties::default())?;
    for chunk in data.chunks(100) {
        writer.write_all(chunk)?;
    }
    writer.flush()?;
    let compressed = writer.finish()?;

    assert_eq!(compressed, compress_bytes(&data, Properties::default())?);
    assert_eq!(decompress_bytes(&compressed)?, data);
    Ok(())
}

/// Every proper prefix of a valid stream is rejected as truncated
#[test]
fn test_truncation_sweep() -> Result<(), Box<dyn std::error::Error>> {
    let data = b"abracadabra abracadabra, the quick brown fox";
    for size_mode in [SizeMode::Known, SizeMode::EndMarker] {
        let options = EncoderOptions::default().with_size_mode(size_mode);
        let compressed = compress_bytes_with(data, &options)?;

        for cut in 0..compressed.len() {
            match decompress_bytes(&compressed[..cut]) {
                Err(LzmaError::StreamTruncated) => {}
                other => panic!("prefix of {cut} bytes ({size_mode:?}): {other:?}"),
            }
        }
        assert_eq!(decompress_bytes(&compressed)?, data);
    }
    Ok(())
}

/// An end marker before the declared size is reached
#[test]
fn test_end_marker_before_declared_size() -> Result<(), Box<dyn std::error::Error>> {
    let options = EncoderOptions::default().with_size_mode(SizeMode::EndMarker);
    let mut compressed = compress_bytes_with(b"hello world", &options)?;
    compressed[5..13].copy_from_slice(&100u64.to_le_bytes());

    match decompress_bytes(&compressed) {
        Err(LzmaError::LengthMismatch { declared, actual }) => {
            assert_eq!(declared, 100);
            assert_eq!(actual, 11);
        }
        other => panic!("expected LengthMismatch, got {other:?}"),
    }
    Ok(())
}

/// A match running past the declared size
#[test]
fn test_match_past_declared_size() -> Result<(), Box<dyn std::error::Error>> {
    let data = b"abcabcabcabcabcabc";
    let mut compressed = compress_bytes(data, Properties::default())?;
    compressed[5..13].copy_from_slice(&5u64.to_le_bytes());

    let (partial, result) = decompress_bytes_partial(&compressed);
    assert!(matches!(
        result,
        Err(LzmaError::LengthMismatch { declared: 5, .. })
    ));
    assert!(partial.len() <= 5);
    assert_eq!(&partial[..], &data[..partial.len()]);
    Ok(())
}

/// A declared size shorter than the literals stops decoding early
#[test]
fn test_declared_size_stops_decoding() -> Result<(), Box<dyn std::error::Error>> {
    let mut compressed = compress_bytes(b"abcdefgh", Properties::default())?;
    compressed[5..13].copy_from_slice(&4u64.to_le_bytes());
    assert_eq!(decompress_bytes(&compressed)?, b"abcd");
    Ok(())
}

/// Test invalid properties from the constructor and from the header
#[test]
fn test_invalid_properties() -> Result<(), Box<dyn std::error::Error>> {
    assert!(matches!(
        Properties::new(9, 0, 0, 1 << 20),
        Err(LzmaError::InvalidProperties(_))
    ));
    assert!(matches!(
        Properties::new(3, 2, 2, 1 << 20),
        Err(LzmaError::InvalidProperties(_))
    ));
    // lc alone may reach 8, but only with lp = 0 and lc + lp <= 4
    assert!(matches!(
        Properties::new(8, 0, 0, 1 << 20),
        Err(LzmaError::InvalidProperties(_))
    ));
    assert!(Properties::new(4, 0, 0, 1 << 20).is_ok());
    assert!(Properties::new(0, 4, 0, 1 << 20).is_ok());
    assert!(matches!(
        Properties::new(3, 0, 5, 1 << 20),
        Err(LzmaError::InvalidProperties(_))
    ));
    assert!(matches!(
        Properties::new(3, 0, 2, 1024),
        Err(LzmaError::InvalidProperties(_))
    ));

    let mut compressed = compress_bytes(b"data", Properties::default())?;
    compressed[0] = 225;
    assert!(matches!(
        decompress_bytes(&compressed),
        Err(LzmaError::InvalidProperties(_))
    ));

    // lc = 4, lp = 1 packs into a byte that is in range but not allowed
    compressed[0] = (2 * 5 + 1) * 9 + 4;
    assert!(matches!(
        decompress_bytes(&compressed),
        Err(LzmaError::InvalidProperties(_))
    ));
    Ok(())
}

/// A header dictionary smaller than 4 KiB is treated as 4 KiB
#[test]
fn test_small_header_dictionary() -> Result<(), Box<dyn std::error::Error>> {
    let data = b"tiny dictionary, tiny dictionary";
    let mut compressed = compress_bytes(data, Properties::new(3, 0, 2, 4096)?)?;
    compressed[1..5].copy_from_slice(&16u32.to_le_bytes());

    let header = StreamHeader::parse(&compressed)?;
    assert_eq!(header.properties.dict_size(), 4096);
    assert_eq!(decompress_bytes(&compressed)?, data);
    Ok(())
}

/// The first payload byte must be zero
#[test]
fn test_nonzero_first_byte() -> Result<(), Box<dyn std::error::Error>> {
    let mut compressed = compress_bytes(b"data", Properties::default())?;
    compressed[HEADER_SIZE] = 1;
    assert!(matches!(
        decompress_bytes(&compressed),
        Err(LzmaError::InvalidState(_))
    ));
    Ok(())
}

/// A distance reaching before the start of the output
#[test]
fn test_distance_before_output() -> Result<(), Box<dyn std::error::Error>> {
    let properties = Properties::default();
    let data = b"ab";
    let mut enc = EncoderState::new(properties);
    let mut rc = RangeEncoder::new();
    enc.encode_literal(&mut rc, data, 0);
    enc.encode_literal(&mut rc, data, 1);
    enc.encode_match(&mut rc, 2, 5, 2);
    enc.encode_end_marker(&mut rc, 4);
    let compressed = stream(properties, None, &rc.finish());

    let (partial, result) = decompress_bytes_partial(&compressed);
    match result {
        Err(LzmaError::InvalidDistance { distance, position }) => {
            assert_eq!(distance, 4);
            assert_eq!(position, 2);
        }
        other => panic!("expected InvalidDistance, got {other:?}"),
    }
    assert_eq!(partial, data);
    Ok(())
}

/// A repeat match with no output to repeat
#[test]
fn test_rep_before_output() {
    let properties = Properties::default();
    let mut enc = EncoderState::new(properties);
    let mut rc = RangeEncoder::new();
    enc.encode_rep(&mut rc, 0, 0, 4);
    enc.encode_end_marker(&mut rc, 4);
    let compressed = stream(properties, None, &rc.finish());

    assert!(matches!(
        decompress_bytes(&compressed),
        Err(LzmaError::InvalidState(_))
    ));
}

/// A repeat match before any explicit match reuses distance 1
#[test]
fn test_rep_after_literal() -> Result<(), Box<dyn std::error::Error>> {
    let properties = Properties::default();
    let data = b"q";
    let mut enc = EncoderState::new(properties);
    let mut rc = RangeEncoder::new();
    enc.encode_literal(&mut rc, data, 0);
    enc.encode_rep(&mut rc, 1, 0, 5);
    enc.encode_end_marker(&mut rc, 6);
    let compressed = stream(properties, None, &rc.finish());

    assert_eq!(decompress_bytes(&compressed)?, b"qqqqqq");
    Ok(())
}

/// A failed reader refuses to continue
#[test]
fn test_failed_status() -> Result<(), Box<dyn std::error::Error>> {
    let compressed = compress_bytes(&sample_text(), Properties::default())?;
    let cut = &compressed[..compressed.len() / 2];

    let mut reader = LzmaReader::new(Cursor::new(cut))?;
    let mut output = Vec::new();
    assert!(matches!(
        reader.decode_to_end(&mut output),
        Err(LzmaError::StreamTruncated)
    ));
    assert_eq!(reader.status(), DecoderStatus::Failed);
    assert_eq!(&output[..], &sample_text()[..output.len()]);

    assert!(matches!(
        reader.decode_to_end(&mut output),
        Err(LzmaError::InvalidState(_))
    ));

    // The Read impl surfaces the failure as InvalidData
    let mut reader = LzmaReader::new(Cursor::new(cut))?;
    let err = reader.read_to_end(&mut Vec::new()).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    Ok(())
}

/// Raw payload decoding with properties supplied out of band
#[test]
fn test_raw_reader() -> Result<(), Box<dyn std::error::Error>> {
    let data = sample_text();
    let properties = Properties::new(0, 2, 0, 1 << 16)?;
    let compressed = compress_bytes(&data, properties)?;

    let mut reader = LzmaReader::new_raw(
        Cursor::new(&compressed[HEADER_SIZE..]),
        properties,
        Some(data.len() as u64),
    );
    let mut output = Vec::new();
    reader.decode_to_end(&mut output)?;
    assert_eq!(output, data);
    Ok(())
}

/// The writer encodes with exactly the options it was given
#[test]
fn test_writer_keeps_options() -> Result<(), Box<dyn std::error::Error>> {
    let properties = Properties::new(0, 4, 0, 4096)?;
    let options = EncoderOptions::new(properties).with_size_mode(SizeMode::EndMarker);
    let mut writer = LzmaWriter::with_options(Vec::new(), options)?;
    assert_eq!(writer.options(), &options);

    writer.write_all(b"options pass straight through")?;
    let compressed = writer.finish()?;
    let header = StreamHeader::parse(&compressed)?;
    assert_eq!(header.properties, properties);
    assert_eq!(header.uncompressed_size, None);
    assert_eq!(decompress_bytes(&compressed)?, b"options pass straight through");

    assert!(matches!(
        Properties::default().with_dict_size(1),
        Err(LzmaError::InvalidProperties(_))
    ));
    Ok(())
}

//! Async convenience functions
//!
//! This module provides easy-to-use async functions for common compression
//! and decompression operations. The codec never yields mid-symbol, so the
//! coding itself runs on tokio's blocking pool while I/O stays async.

#[cfg(feature = "async")]
pub mod functions {
    use crate::{
        compress_bytes_with, CodecStats, EncoderOptions, LzmaError, LzmaReader, LzmaWriter,
        Result,
    };
    use std::io::Write;
    use std::path::Path;
    use tokio::io::{AsyncRead, AsyncReadExt};

    /// Run a codec job on the blocking pool
    pub(crate) async fn run_blocking<T, F>(job: F) -> Result<T>
    where
        F: FnOnce() -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        tokio::task::spawn_blocking(job)
            .await
            .map_err(|e| LzmaError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?
    }

    /// Decompress a whole `.lzma` stream from an async reader
    pub async fn decompress_async<R: AsyncRead + Unpin>(mut reader: R) -> Result<Vec<u8>> {
        let mut input = Vec::new();
        reader.read_to_end(&mut input).await?;
        decompress_bytes_async(input).await
    }

    /// Compress everything an async reader yields
    pub async fn compress_async<R: AsyncRead + Unpin>(
        mut reader: R,
        options: EncoderOptions,
    ) -> Result<Vec<u8>> {
        let mut input = Vec::new();
        reader.read_to_end(&mut input).await?;
        compress_bytes_async(input, options).await
    }

    /// Decompress an owned buffer off the async runtime
    pub async fn decompress_bytes_async(data: Vec<u8>) -> Result<Vec<u8>> {
        run_blocking(move || crate::decompress_bytes(&data)).await
    }

    /// Compress an owned buffer off the async runtime
    pub async fn compress_bytes_async(data: Vec<u8>, options: EncoderOptions) -> Result<Vec<u8>> {
        run_blocking(move || compress_bytes_with(&data, &options)).await
    }

    /// Compress a file asynchronously
    pub async fn compress_file<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_path: P1,
        output_path: P2,
        options: EncoderOptions,
    ) -> Result<CodecStats> {
        let input = tokio::fs::read(input_path).await?;
        let (output, stats) = run_blocking(move || {
            let mut writer = LzmaWriter::with_options(Vec::new(), options)?;
            writer.write_all(&input)?;
            writer.finish_with_stats()
        })
        .await?;
        tokio::fs::write(output_path, output).await?;
        Ok(stats)
    }

    /// Decompress a file asynchronously
    pub async fn decompress_file<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_path: P1,
        output_path: P2,
    ) -> Result<CodecStats> {
        let input = tokio::fs::read(input_path).await?;
        let (output, stats) = run_blocking(move || {
            let mut reader = LzmaReader::new(std::io::Cursor::new(input))?;
            let mut output = Vec::new();
            reader.decode_to_end(&mut output)?;
            Ok((output, reader.stats().clone()))
        })
        .await?;
        tokio::fs::write(output_path, output).await?;
        Ok(stats)
    }

    /// Compress multiple files concurrently
    pub async fn compress_files<P: AsRef<Path> + Send + Sync>(
        files: Vec<P>,
        options: EncoderOptions,
        concurrency: Option<usize>,
    ) -> Result<Vec<(std::path::PathBuf, Vec<u8>)>> {
        use crate::async_batch::AsyncBatchProcessor;

        let mut processor = AsyncBatchProcessor::new();
        if let Some(limit) = concurrency {
            processor = processor.with_concurrency(limit);
        }

        processor.compress_files(files, options).await
    }
}

#[cfg(feature = "async")]
pub use functions::*;

//! Async batch processing module
//!
//! Decodes or encodes many independent streams concurrently. Every stream has
//! its own codec state, so the only shared data is the immutable CRC table.

#[cfg(feature = "async")]
/// Concurrent stream processing with a configurable concurrency limit
pub mod processor {
    use crate::async_convenience::functions::run_blocking;
    use crate::{compress_bytes_with, decompress_bytes, EncoderOptions, LzmaError, Result};
    use futures::stream::{self, StreamExt, TryStreamExt};
    use std::path::{Path, PathBuf};

    /// Concurrent processor for independent streams
    #[derive(Debug, Clone)]
    pub struct AsyncBatchProcessor {
        concurrency_limit: usize,
    }

    impl AsyncBatchProcessor {
        /// Create a new batch processor using one task per CPU
        pub fn new() -> Self {
            Self {
                concurrency_limit: num_cpus::get().max(1),
            }
        }

        /// Set the concurrency limit
        pub fn with_concurrency(mut self, limit: usize) -> Self {
            self.concurrency_limit = limit.max(1);
            self
        }

        /// Current concurrency limit
        pub fn concurrency(&self) -> usize {
            self.concurrency_limit
        }

        /// Compress multiple files, failing on the first error
        pub async fn compress_files<P: AsRef<Path> + Send + Sync>(
            &self,
            files: Vec<P>,
            options: EncoderOptions,
        ) -> Result<Vec<(PathBuf, Vec<u8>)>> {
            log::debug!(
                "compressing {} files, concurrency {}",
                files.len(),
                self.concurrency_limit
            );
            stream::iter(files.into_iter().map(|path| async move {
                let path = path.as_ref().to_path_buf();
                let data = tokio::fs::read(&path).await?;
                let compressed = run_blocking(move || compress_bytes_with(&data, &options)).await?;
                Ok::<_, LzmaError>((path, compressed))
            }))
            .buffer_unordered(self.concurrency_limit)
            .try_collect()
            .await
        }

        /// Decompress multiple files, failing on the first error
        pub async fn decompress_files<P: AsRef<Path> + Send + Sync>(
            &self,
            files: Vec<P>,
        ) -> Result<Vec<(PathBuf, Vec<u8>)>> {
            log::debug!(
                "decompressing {} files, concurrency {}",
                files.len(),
                self.concurrency_limit
            );
            stream::iter(files.into_iter().map(|path| async move {
                let path = path.as_ref().to_path_buf();
                let data = tokio::fs::read(&path).await?;
                let decompressed = run_blocking(move || decompress_bytes(&data)).await?;
                Ok::<_, LzmaError>((path, decompressed))
            }))
            .buffer_unordered(self.concurrency_limit)
            .try_collect()
            .await
        }

        /// Decompress in-memory streams; results keep the input order and
        /// one failing stream does not affect the others
        pub async fn decompress_all(&self, streams: Vec<Vec<u8>>) -> Vec<Result<Vec<u8>>> {
            stream::iter(
                streams
                    .into_iter()
                    .map(|data| run_blocking(move || decompress_bytes(&data))),
            )
            .buffered(self.concurrency_limit)
            .collect()
            .await
        }

        /// Compress in-memory buffers; results keep the input order
        pub async fn compress_all(
            &self,
            buffers: Vec<Vec<u8>>,
            options: EncoderOptions,
        ) -> Vec<Result<Vec<u8>>> {
            stream::iter(
                buffers
                    .into_iter()
                    .map(|data| run_blocking(move || compress_bytes_with(&data, &options))),
            )
            .buffered(self.concurrency_limit)
            .collect()
            .await
        }
    }

    impl Default for AsyncBatchProcessor {
        fn default() -> Self {
            Self::new()
        }
    }
}

#[cfg(feature = "async")]
pub use processor::AsyncBatchProcessor;

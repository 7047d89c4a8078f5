//! Error handling for LZMA operations
//!
//! This module defines the error types used throughout the codec.
//! It uses thiserror for ergonomic error handling and provides context-specific
//! error variants.

pub use crate::common::LzmaError;
pub use crate::common::Result;

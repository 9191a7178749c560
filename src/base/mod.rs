//! Foundation types for the Ecsact toolchain.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`Position`], [`Span`] - Line/column positions and ranges
//! - [`LineIndex`] - Line/column to byte offset conversion
//! - [`memory`] - Bounds-checked accessors over engine linear memory
//! - [`text_utils`] - Whole-word keyword search
//! - Domain constants (language id, command names, file names)
//!
//! This module has NO dependencies on other ecsact modules.

pub mod constants;
mod line_index;
pub mod memory;
mod position;
pub mod text_utils;

pub use line_index::LineIndex;
pub use memory::{DecodeError, SourceSpan};
pub use position::{Position, Span};

// Re-export text-size types for convenience
pub use text_size;

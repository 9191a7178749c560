//! # ecsact-base
//!
//! Incremental statement tokenizer and language-server launcher for the
//! Ecsact schema language.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide       → Semantic tokens, highlighter entry point
//!   ↓
//! project   → Engine loading, settings, language server lifecycle
//!   ↓
//! parser    → Engine contract, statement/status decoding, parse adapter
//!   ↓
//! base      → Primitives (Position, Span, LineIndex, memory reader)
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → project → ide)
// ============================================================================

/// Foundation types: positions, line index, engine memory reader
pub mod base;

/// Parser: statement engine contract and decoding of its output
pub mod parser;

/// Project: engine loading, settings, language server process
pub mod project;

/// IDE features: semantic tokens
pub mod ide;

// Re-export foundation types
pub use base::{LineIndex, Position, SourceSpan, Span};

//! IDE features: syntax highlighting for editor hosts.
//!
//! ## Design Principles
//!
//! 1. **No LSP types**: Uses our own types, converted at the LSP boundary
//!    (see [`encode_semantic_tokens`])
//! 2. **Partial results**: a malformed statement truncates highlighting,
//!    it never discards tokens already produced

mod highlighter;
mod semantic_tokens;

pub use highlighter::Highlighter;
pub use semantic_tokens::{
    SemanticToken, SemanticTokensLegend, TOKEN_MODIFIERS, TokenType, encode_semantic_tokens,
    legend, semantic_tokens, semantic_tokens_range,
};

//! The semantic tokens entry point for editor hosts.
//!
//! Owns a shared [`EngineHandle`] and runs the tokenizer against it. Engine
//! load failures are logged by the handle and produce an empty result; the
//! next request retries the load.
//!
//! ## Usage
//!
//! ```ignore
//! let handle = Arc::new(EngineHandle::new(ModuleFileLoader::new(instantiate)));
//! let highlighter = Highlighter::new(handle);
//!
//! let tokens = highlighter.document_tokens(text, &CancellationToken::new());
//! let data = encode_semantic_tokens(&tokens);
//! ```

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::base::Span;
use crate::project::EngineHandle;

use super::semantic_tokens::{
    SemanticToken, SemanticTokensLegend, legend, semantic_tokens, semantic_tokens_range,
};

#[derive(Debug, Clone)]
pub struct Highlighter {
    engine: Arc<EngineHandle>,
}

impl Highlighter {
    pub fn new(engine: Arc<EngineHandle>) -> Self {
        Self { engine }
    }

    pub fn legend(&self) -> SemanticTokensLegend {
        legend()
    }

    pub fn engine(&self) -> &Arc<EngineHandle> {
        &self.engine
    }

    /// Tokens for the whole document.
    pub fn document_tokens(&self, text: &str, cancel: &CancellationToken) -> Vec<SemanticToken> {
        self.engine
            .with_engine(cancel, |engine| semantic_tokens(engine, text, cancel))
            .unwrap_or_else(|err| {
                debug!("semantic tokens unavailable: {err}");
                Vec::new()
            })
    }

    /// Tokens for `range` of the document.
    pub fn range_tokens(
        &self,
        text: &str,
        range: Span,
        cancel: &CancellationToken,
    ) -> Vec<SemanticToken> {
        self.engine
            .with_engine(cancel, |engine| {
                semantic_tokens_range(engine, text, range, cancel)
            })
            .unwrap_or_else(|err| {
                debug!("semantic tokens unavailable: {err}");
                Vec::new()
            })
    }
}

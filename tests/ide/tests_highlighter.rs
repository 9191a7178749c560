//! Highlighter tests: engine loading, retries and shared use.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use ecsact::base::Span;
use ecsact::ide::{Highlighter, TokenType, encode_semantic_tokens};
use ecsact::parser::{EngineError, StatementEngine};
use ecsact::project::EngineHandle;
use tokio_util::sync::CancellationToken;

use crate::helpers::{ScriptedEngine, scripted_highlighter, tok};

/// Highlighter whose loader fails `failures` times before succeeding.
fn flaky_highlighter(failures: usize) -> (Highlighter, Arc<AtomicUsize>) {
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = attempts.clone();
    let handle = EngineHandle::new(move |_: &CancellationToken| {
        let attempt = counter.fetch_add(1, Ordering::SeqCst);
        if attempt < failures {
            Err(EngineError::ModuleNotFound {
                path: "missing/ecsact_parse.wasm".into(),
            })
        } else {
            Ok(Box::new(ScriptedEngine::new()) as Box<dyn StatementEngine>)
        }
    });
    (Highlighter::new(Arc::new(handle)), attempts)
}

#[test]
fn test_document_tokens() {
    let highlighter = scripted_highlighter();
    let tokens = highlighter.document_tokens("import OtherPkg;", &CancellationToken::new());

    assert_eq!(
        tokens,
        vec![
            tok(0, 0, 6, TokenType::Keyword),
            tok(0, 7, 8, TokenType::Namespace),
        ]
    );
    assert!(highlighter.engine().is_loaded());
}

#[test]
fn test_range_tokens() {
    let highlighter = scripted_highlighter();
    let source = "component A;\ncomponent B;\ncomponent C;";
    let tokens = highlighter.range_tokens(
        source,
        Span::from_coords(1, 0, 2, 0),
        &CancellationToken::new(),
    );

    assert_eq!(
        tokens,
        vec![
            tok(1, 0, 9, TokenType::Keyword),
            tok(1, 10, 1, TokenType::Type),
        ]
    );
}

#[test]
fn test_load_failure_returns_empty_then_retries() {
    let (highlighter, attempts) = flaky_highlighter(1);
    let cancel = CancellationToken::new();

    assert!(highlighter.document_tokens("action A;", &cancel).is_empty());
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
    assert!(!highlighter.engine().is_loaded());

    let tokens = highlighter.document_tokens("action A;", &cancel);
    assert_eq!(tokens.len(), 2);
    assert_eq!(attempts.load(Ordering::SeqCst), 2);

    // loaded once, kept afterwards
    highlighter.document_tokens("action B;", &cancel);
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[test]
fn test_every_failed_request_retries() {
    let (highlighter, attempts) = flaky_highlighter(usize::MAX);
    let cancel = CancellationToken::new();

    for _ in 0..3 {
        assert!(highlighter.document_tokens("action A;", &cancel).is_empty());
    }
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[test]
fn test_concurrent_requests_share_one_engine() {
    let (highlighter, attempts) = flaky_highlighter(0);
    let source = "package main Game;\ncomponent Health {\n    i32 value;\n}\n";

    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let highlighter = highlighter.clone();
                scope.spawn(move || highlighter.document_tokens(source, &CancellationToken::new()))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(attempts.load(Ordering::SeqCst), 1);
    for tokens in &results {
        assert_eq!(tokens, &results[0]);
        assert_eq!(tokens.len(), 7);
    }
}

#[test]
fn test_legend_and_encoding_round_out_lsp_output() {
    let highlighter = scripted_highlighter();
    let tokens = highlighter.document_tokens("package main MyGame;", &CancellationToken::new());
    let legend = highlighter.legend();

    let data = encode_semantic_tokens(&tokens);
    assert_eq!(data.len(), 15);
    // first encoded token is `package`, a keyword
    assert_eq!(legend.token_types[data[3] as usize], "keyword");
    // `MyGame` is last and typed as a type
    assert_eq!(legend.token_types[data[13] as usize], "type");
}

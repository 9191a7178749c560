//! Semantic tokens tests for the IDE layer.

use ecsact::base::Span;
use ecsact::ide::{TokenType, semantic_tokens, semantic_tokens_range};
use ecsact::parser::LinearMemory;
use tokio_util::sync::CancellationToken;

use crate::helpers::{ScriptedEngine, tok, token_text};

const GAME: &str = "package main Game;

component Health {
    i32 value;
}
enum Color {
    Red = 0;
}
action Move;
";

fn tokens_for(source: &str) -> Vec<ecsact::ide::SemanticToken> {
    let mut engine = ScriptedEngine::new();
    semantic_tokens(&mut engine, source, &CancellationToken::new())
}

// =============================================================================
// SEMANTIC TOKENS - SINGLE STATEMENTS
// =============================================================================

#[test]
fn test_main_package_tokens() {
    let tokens = tokens_for("package main MyGame;");

    assert_eq!(
        tokens,
        vec![
            tok(0, 8, 4, TokenType::Keyword),
            tok(0, 0, 7, TokenType::Keyword),
            tok(0, 13, 6, TokenType::Type),
        ]
    );
}

#[test]
fn test_package_without_main() {
    let tokens = tokens_for("package MyMain;");

    assert_eq!(
        tokens,
        vec![
            tok(0, 0, 7, TokenType::Keyword),
            tok(0, 8, 6, TokenType::Type),
        ]
    );
}

#[test]
fn test_import_tokens() {
    let tokens = tokens_for("import OtherPkg;");

    assert_eq!(
        tokens,
        vec![
            tok(0, 0, 6, TokenType::Keyword),
            tok(0, 7, 8, TokenType::Namespace),
        ]
    );
}

#[test]
fn test_transient_tokens() {
    let tokens = tokens_for("transient Tick;");

    assert_eq!(
        tokens,
        vec![
            tok(0, 0, 9, TokenType::Keyword),
            tok(0, 10, 4, TokenType::Type),
        ]
    );
}

#[test]
fn test_unknown_builtin_type_emits_property_only() {
    let mut engine = ScriptedEngine::new();
    engine.builtin_type_override = Some(42);
    let tokens = semantic_tokens(&mut engine, "  i32 health;", &CancellationToken::new());

    assert_eq!(tokens, vec![tok(0, 6, 6, TokenType::Property)]);
}

#[test]
fn test_payloadless_statements_emit_nothing() {
    let tokens = tokens_for("system Move {\n    generates;\n    Position pos;\n}");

    assert_eq!(
        tokens,
        vec![
            tok(0, 0, 6, TokenType::Keyword),
            tok(0, 7, 4, TokenType::Type),
        ]
    );
}

// =============================================================================
// SEMANTIC TOKENS - DOCUMENTS
// =============================================================================

#[test]
fn test_multiline_document() {
    let tokens = tokens_for(GAME);

    assert_eq!(
        tokens,
        vec![
            tok(0, 8, 4, TokenType::Keyword),
            tok(0, 0, 7, TokenType::Keyword),
            tok(0, 13, 4, TokenType::Type),
            tok(2, 0, 9, TokenType::Keyword),
            tok(2, 10, 6, TokenType::Type),
            tok(3, 4, 3, TokenType::Keyword),
            tok(3, 8, 5, TokenType::Property),
            tok(5, 0, 4, TokenType::Keyword),
            tok(5, 5, 5, TokenType::Type),
            tok(6, 4, 3, TokenType::EnumMember),
            tok(8, 0, 6, TokenType::Keyword),
            tok(8, 7, 4, TokenType::Type),
        ]
    );
}

#[test]
fn test_tokens_cover_their_source_text() {
    let tokens = tokens_for(GAME);
    let texts: Vec<&str> = tokens.iter().map(|t| token_text(GAME, t)).collect();

    assert_eq!(
        texts,
        vec![
            "main", "package", "Game", "component", "Health", "i32", "value", "enum", "Color",
            "Red", "action", "Move",
        ]
    );
}

#[test]
fn test_statements_sharing_a_line() {
    let source = "package Pkg; import Other;";
    let tokens = tokens_for(source);

    assert_eq!(
        tokens,
        vec![
            tok(0, 0, 7, TokenType::Keyword),
            tok(0, 8, 3, TokenType::Type),
            tok(0, 13, 6, TokenType::Keyword),
            tok(0, 20, 5, TokenType::Namespace),
        ]
    );
}

#[test]
fn test_columns_count_characters() {
    let source = "package Çore;\ncomponent Héllo;";
    let tokens = tokens_for(source);

    assert_eq!(
        tokens,
        vec![
            tok(0, 0, 7, TokenType::Keyword),
            tok(0, 8, 4, TokenType::Type),
            tok(1, 0, 9, TokenType::Keyword),
            tok(1, 10, 5, TokenType::Type),
        ]
    );
    assert_eq!(token_text(source, &tokens[3]), "Héllo");
}

#[test]
fn test_range_tokens() {
    let mut engine = ScriptedEngine::new();
    let tokens = semantic_tokens_range(
        &mut engine,
        GAME,
        Span::from_coords(2, 0, 5, 0),
        &CancellationToken::new(),
    );

    assert_eq!(
        tokens,
        vec![
            tok(2, 0, 9, TokenType::Keyword),
            tok(2, 10, 6, TokenType::Type),
            tok(3, 4, 3, TokenType::Keyword),
            tok(3, 8, 5, TokenType::Property),
        ]
    );
}

#[test]
fn test_empty_range_makes_no_calls() {
    let mut engine = ScriptedEngine::new();
    let tokens = semantic_tokens_range(
        &mut engine,
        GAME,
        Span::from_coords(3, 2, 3, 2),
        &CancellationToken::new(),
    );

    assert!(tokens.is_empty());
    assert_eq!(engine.calls, 0);
}

#[test]
fn test_inverted_range_makes_no_calls() {
    let mut engine = ScriptedEngine::new();
    let tokens = semantic_tokens_range(
        &mut engine,
        GAME,
        Span::from_coords(5, 0, 2, 0),
        &CancellationToken::new(),
    );

    assert!(tokens.is_empty());
    assert_eq!(engine.calls, 0);
}

#[test]
fn test_empty_document() {
    let mut engine = ScriptedEngine::new();
    assert!(semantic_tokens(&mut engine, "", &CancellationToken::new()).is_empty());
    assert_eq!(engine.calls, 0);
}

// =============================================================================
// SEMANTIC TOKENS - TERMINATION
// =============================================================================

#[test]
fn test_missing_terminator_yields_nothing() {
    let mut engine = ScriptedEngine::new();
    let tokens = semantic_tokens(&mut engine, "component Foo", &CancellationToken::new());

    assert!(tokens.is_empty());
    assert_eq!(engine.calls, 1);
}

#[test]
fn test_syntax_error_keeps_earlier_tokens() {
    let mut engine = ScriptedEngine::new();
    let source = "package main Game;\ncomponent Foo\naction Move;";
    let tokens = semantic_tokens(&mut engine, source, &CancellationToken::new());

    // `component Foo\naction Move;` parses as one broken statement
    assert_eq!(tokens.len(), 3);
    assert_eq!(engine.calls, 2);
}

#[test]
fn test_stops_at_first_error_without_resync() {
    let mut engine = ScriptedEngine::new();
    let source = "component A;\nwhat is this;\ncomponent B;";
    let tokens = semantic_tokens(&mut engine, source, &CancellationToken::new());

    assert_eq!(
        tokens,
        vec![
            tok(0, 0, 9, TokenType::Keyword),
            tok(0, 10, 1, TokenType::Type),
        ]
    );
}

#[test]
fn test_zero_progress_terminates() {
    let mut engine = ScriptedEngine::new();
    engine.consumed_override = Some(0);

    let tokens = semantic_tokens(&mut engine, GAME, &CancellationToken::new());

    assert!(tokens.is_empty());
    assert_eq!(engine.calls, 1);
}

#[test]
fn test_decode_fault_keeps_earlier_tokens() {
    let mut engine = ScriptedEngine::new();
    engine.corrupt_from_call = Some(3);

    let tokens = semantic_tokens(&mut engine, GAME, &CancellationToken::new());

    // package (3 tokens) and component (2 tokens) precede the fault
    assert_eq!(tokens.len(), 5);
    assert_eq!(engine.calls, 3);
}

#[test]
fn test_cancelled_before_start() {
    let mut engine = ScriptedEngine::new();
    let cancel = CancellationToken::new();
    cancel.cancel();

    assert!(semantic_tokens(&mut engine, GAME, &cancel).is_empty());
    assert_eq!(engine.calls, 0);
}

#[test]
fn test_cancelled_between_statements() {
    let mut engine = ScriptedEngine::new();
    let cancel = CancellationToken::new();
    engine.cancel_after = Some((2, cancel.clone()));

    let tokens = semantic_tokens(&mut engine, GAME, &cancel);

    assert_eq!(tokens.len(), 5);
    assert_eq!(engine.calls, 2);
}

#[test]
fn test_consumed_sums_to_scanned_text() {
    let mut engine = ScriptedEngine::new();
    semantic_tokens(&mut engine, GAME, &CancellationToken::new());

    // every statement except the trailing end-of-input report advanced the cursor
    let log = &engine.consumed_log;
    assert!(log[..log.len() - 1].iter().all(|c| *c > 0));
    let scanned: i32 = log.iter().sum();
    assert_eq!(scanned as usize, GAME.len() - 1);
}

// =============================================================================
// SEMANTIC TOKENS - LARGE DOCUMENTS
// =============================================================================

#[test]
fn test_document_larger_than_scratch_stack() {
    let source = "component A;\n".repeat(2000);
    let mut engine = ScriptedEngine::new();
    let tokens = semantic_tokens(&mut engine, &source, &CancellationToken::new());

    assert_eq!(tokens.len(), 4000);
    assert_eq!(tokens[3998], tok(1999, 0, 9, TokenType::Keyword));
    assert_eq!(tokens[3999], tok(1999, 10, 1, TokenType::Type));
    assert!(engine.longest_input < 16 * 1024);
}

#[test]
fn test_blank_lines_wider_than_window() {
    let source = format!("{}component A;", "\n".repeat(5000));
    let mut engine = ScriptedEngine::new();
    let tokens = semantic_tokens(&mut engine, &source, &CancellationToken::new());

    assert_eq!(
        tokens,
        vec![
            tok(5000, 0, 9, TokenType::Keyword),
            tok(5000, 10, 1, TokenType::Type),
        ]
    );
    assert_eq!(engine.calls, 2);
}

#[test]
fn test_statement_longer_than_initial_window() {
    let name = "N".repeat(5000);
    let source = format!("action {name};\naction Tail;");
    let tokens = tokens_for(&source);

    assert_eq!(
        tokens,
        vec![
            tok(0, 0, 6, TokenType::Keyword),
            tok(0, 7, 5000, TokenType::Type),
            tok(1, 0, 6, TokenType::Keyword),
            tok(1, 7, 4, TokenType::Type),
        ]
    );
}

#[test]
fn test_window_shrinks_to_fit_small_stack() {
    let source = "enum E;\n".repeat(300);
    let mut engine = ScriptedEngine::with_memory(LinearMemory::new(64 * 1024, 1024));
    let tokens = semantic_tokens(&mut engine, &source, &CancellationToken::new());

    assert_eq!(tokens.len(), 600);
    assert_eq!(tokens[599], tok(299, 5, 1, TokenType::Type));
    assert!(engine.longest_input < 1024);
}

#[test]
fn test_statement_too_large_for_stack_stops_scan() {
    let source = format!("action A;\naction {};\naction C;", "N".repeat(2000));
    let mut engine = ScriptedEngine::with_memory(LinearMemory::new(64 * 1024, 1024));
    let tokens = semantic_tokens(&mut engine, &source, &CancellationToken::new());

    assert_eq!(
        tokens,
        vec![
            tok(0, 0, 6, TokenType::Keyword),
            tok(0, 7, 1, TokenType::Type),
        ]
    );
}

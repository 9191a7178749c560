//! Semantic tokens: syntax highlighting driven by the statement engine.
//!
//! The tokenizer walks a cursor across the requested range, parsing one
//! statement per engine call. Each decoded statement is turned into zero or
//! more classified spans, and the cursor advances by exactly the number of
//! bytes the engine consumed. Scanning stops at the end of the range, on the
//! first terminal parse status, or when cancellation is requested.
//!
//! The engine sees a bounded window of the remaining text rather than all of
//! it, so documents larger than its scratch stack still tokenize. A window
//! that cut a statement short is doubled and the call retried; a window that
//! overflows the stack is halved.

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace};

use crate::base::text_utils::find_keyword_before;
use crate::base::{LineIndex, Position, SourceSpan, Span};
use crate::parser::{
    EngineError, ParseResult, Statement, StatementData, StatementEngine, parse_statement,
};

/// Bytes of input handed to the engine on the first attempt.
const INITIAL_WINDOW: usize = 4 * 1024;

/// Windows at or below this size are not shrunk further on stack overflow.
const MIN_WINDOW: usize = 64;

/// Token type for semantic highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    Namespace,
    Type,
    EnumMember,
    Property,
    Keyword,
}

impl TokenType {
    pub const ALL: [TokenType; 5] = [
        TokenType::Namespace,
        TokenType::Type,
        TokenType::EnumMember,
        TokenType::Property,
        TokenType::Keyword,
    ];

    /// Convert to LSP token type index.
    pub fn to_lsp_index(self) -> u32 {
        match self {
            TokenType::Namespace => 0,
            TokenType::Type => 1,
            TokenType::EnumMember => 2,
            TokenType::Property => 3,
            TokenType::Keyword => 4,
        }
    }

    /// Name of the token type in the LSP legend.
    pub fn name(self) -> &'static str {
        match self {
            TokenType::Namespace => "namespace",
            TokenType::Type => "type",
            TokenType::EnumMember => "enumMember",
            TokenType::Property => "property",
            TokenType::Keyword => "keyword",
        }
    }
}

/// Token modifiers advertised in the legend. Spans currently carry none.
pub const TOKEN_MODIFIERS: &[&str] = &["declaration"];

/// Token type and modifier names, indexed as in the encoded token stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticTokensLegend {
    pub token_types: Vec<&'static str>,
    pub token_modifiers: Vec<&'static str>,
}

/// The fixed legend matching [`TokenType::to_lsp_index`].
pub fn legend() -> SemanticTokensLegend {
    SemanticTokensLegend {
        token_types: TokenType::ALL.iter().map(|t| t.name()).collect(),
        token_modifiers: TOKEN_MODIFIERS.to_vec(),
    }
}

/// A semantic token for syntax highlighting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticToken {
    /// Line number (0-indexed)
    pub line: u32,
    /// Column number (0-indexed, in characters)
    pub col: u32,
    /// Length of the token in characters
    pub length: u32,
    /// The token type
    pub token_type: TokenType,
}

impl SemanticToken {
    fn at(position: Position, length: usize, token_type: TokenType) -> Self {
        Self {
            line: position.line as u32,
            col: position.column as u32,
            length: length as u32,
            token_type,
        }
    }
}

/// Get semantic tokens for a whole document.
pub fn semantic_tokens<E>(
    engine: &mut E,
    text: &str,
    cancel: &CancellationToken,
) -> Vec<SemanticToken>
where
    E: StatementEngine + ?Sized,
{
    let end = LineIndex::new(text).end_position(text);
    semantic_tokens_range(engine, text, Span::new(Position::default(), end), cancel)
}

/// Get semantic tokens for `range` of `text`.
///
/// Tokens are returned in emission order. A terminal parse status or an
/// engine failure ends the scan; tokens produced before it are kept.
pub fn semantic_tokens_range<E>(
    engine: &mut E,
    text: &str,
    range: Span,
    cancel: &CancellationToken,
) -> Vec<SemanticToken>
where
    E: StatementEngine + ?Sized,
{
    if range.is_empty() {
        return Vec::new();
    }

    let index = LineIndex::new(text);
    let end_offset = usize::from(index.offset(text, range.end));
    let mut offset = usize::from(index.offset(text, range.start)).min(end_offset);
    let mut cursor = range.start;
    let mut tokens = Vec::new();
    let mut window = INITIAL_WINDOW;

    while offset < end_offset {
        if cancel.is_cancelled() {
            debug!("semantic tokens cancelled at {}:{}", cursor.line, cursor.column);
            break;
        }

        let extracted = &text[offset..end_offset];
        let result = match parse_windowed(engine, extracted, &mut window) {
            Ok(result) => result,
            Err(err) => {
                error!("[engine] statement parse failed: {err}");
                break;
            }
        };

        if result.status.code.is_terminal() {
            debug!(
                code = ?result.status.code,
                error_at = result.status.error_location.offset,
                "stopping at {}:{}",
                cursor.line,
                cursor.column
            );
            break;
        }

        let consumed = floor_char_boundary(extracted, result.consumed);
        if consumed == 0 {
            debug!("engine made no progress at {}:{}", cursor.line, cursor.column);
            break;
        }

        if let Some(statement) = &result.statement {
            push_statement_tokens(statement, cursor, &extracted[..consumed], &mut tokens);
        }

        cursor = cursor.walked(extracted, consumed);
        offset += consumed;
    }

    trace!("produced {} semantic tokens", tokens.len());
    tokens
}

/// Parse the first statement of `rest` through a bounded input window.
///
/// `window` carries the working size across calls: it doubles while the
/// engine reports that a truncated window ended mid-statement, and halves on
/// stack overflow. After an overflow it never grows past the size that
/// overflowed.
fn parse_windowed<E>(
    engine: &mut E,
    rest: &str,
    window: &mut usize,
) -> Result<ParseResult, EngineError>
where
    E: StatementEngine + ?Sized,
{
    let mut limit = rest.len();
    loop {
        let len = floor_char_boundary(rest, (*window).min(limit));
        match parse_statement(engine, &rest[..len]) {
            Ok(result)
                if len < rest.len()
                    && *window < limit
                    && result.status.code.needs_more_input() =>
            {
                *window = window.saturating_mul(2);
                trace!(window = *window, "statement crosses the input window, growing");
            }
            Ok(result) => return Ok(result),
            Err(EngineError::StackOverflow { .. }) if len > MIN_WINDOW => {
                limit = len / 2;
                *window = (*window).min(limit);
                debug!(window = *window, "scratch stack overflow, shrinking input window");
            }
            Err(err) => return Err(err),
        }
    }
}

fn floor_char_boundary(text: &str, mut idx: usize) -> usize {
    idx = idx.min(text.len());
    while !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

/// Append the tokens for one statement whose text starts at `anchor`.
fn push_statement_tokens(
    statement: &Statement,
    anchor: Position,
    text: &str,
    tokens: &mut Vec<SemanticToken>,
) {
    let Some(name) = statement.data.name() else {
        return;
    };
    let name_offset = name.offset as usize;

    let mut keyword = |word: &str| {
        if let Some(idx) = find_keyword_before(text, word, name_offset) {
            tokens.push(SemanticToken::at(
                anchor.walked(text, idx),
                word.chars().count(),
                TokenType::Keyword,
            ));
        }
    };

    let name_type = match &statement.data {
        StatementData::Package(package) => {
            if package.main {
                keyword("main");
            }
            keyword("package");
            TokenType::Type
        }
        StatementData::Import(_) => {
            keyword("import");
            TokenType::Namespace
        }
        StatementData::Component(_)
        | StatementData::Transient(_)
        | StatementData::System(_)
        | StatementData::Action(_)
        | StatementData::Enum(_) => {
            if let Some(word) = statement.kind().declaration_keyword() {
                keyword(word);
            }
            TokenType::Type
        }
        StatementData::EnumValue(_) => TokenType::EnumMember,
        StatementData::BuiltinTypeField(field) => {
            if let Some(field_type) = field.field_type {
                keyword(field_type.keyword());
            }
            TokenType::Property
        }
        _ => return,
    };

    push_name(name, anchor, text, name_type, tokens);
}

fn push_name(
    name: &SourceSpan,
    anchor: Position,
    text: &str,
    token_type: TokenType,
    tokens: &mut Vec<SemanticToken>,
) {
    // count characters in the source, the decoded value is byte-per-char
    let length = text
        .get(name.offset as usize..name.end() as usize)
        .map(|source| source.chars().count())
        .unwrap_or_else(|| name.char_len());
    if length == 0 {
        return;
    }
    tokens.push(SemanticToken::at(
        anchor.walked(text, name.offset as usize),
        length,
        token_type,
    ));
}

/// Encode tokens in the LSP relative format.
///
/// Each token becomes five integers: line delta, start delta (relative to
/// the previous token when on the same line), length, type index and the
/// modifier bitset. Tokens are ordered by position first.
pub fn encode_semantic_tokens(tokens: &[SemanticToken]) -> Vec<u32> {
    let mut sorted: Vec<&SemanticToken> = tokens.iter().collect();
    sorted.sort_by_key(|t| (t.line, t.col));

    let mut data = Vec::with_capacity(sorted.len() * 5);
    let (mut prev_line, mut prev_col) = (0, 0);
    for token in sorted {
        let delta_line = token.line - prev_line;
        let delta_col = if delta_line == 0 {
            token.col - prev_col
        } else {
            token.col
        };
        data.extend([
            delta_line,
            delta_col,
            token.length,
            token.token_type.to_lsp_index(),
            0,
        ]);
        prev_line = token.line;
        prev_col = token.col;
    }
    data
}

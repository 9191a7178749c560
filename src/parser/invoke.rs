//! One engine call: marshal the input, run the parser, decode the result.

use tracing::{trace, warn};

use crate::base::memory;

use super::engine::{ScratchScope, StatementEngine};
use super::statement::{STATEMENT_RECORD_SIZE, Statement, decode_statement};
use super::status::{ParseStatus, STATUS_RECORD_SIZE, decode_status};
use super::EngineError;

/// Result of parsing a single statement.
///
/// `statement` is present exactly when `status.code` is resumable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    pub status: ParseStatus,
    /// Bytes of the input that belong to the parsed statement, including
    /// leading whitespace. Never exceeds the input length.
    pub consumed: usize,
    pub statement: Option<Statement>,
}

impl ParseResult {
    pub fn is_resumable(&self) -> bool {
        self.status.code.is_resumable()
    }
}

/// Parse the first statement of `text`.
///
/// All scratch allocations made here are released before returning, on
/// success and on error alike.
pub fn parse_statement<E>(engine: &mut E, text: &str) -> Result<ParseResult, EngineError>
where
    E: StatementEngine + ?Sized,
{
    let input_len = u32::try_from(text.len()).map_err(|_| EngineError::StackOverflow {
        requested: u32::MAX,
        available: 0,
    })?;

    let mut scope = ScratchScope::enter(engine);

    let input = scope.stack_alloc(input_len + 1)?;
    memory::write_bytes(scope.memory_mut(), input, text.as_bytes())?;
    memory::write_bytes(scope.memory_mut(), input + input_len, &[0])?;

    let out_status = scope.stack_alloc(STATUS_RECORD_SIZE)?;
    memory::fill_zero(scope.memory_mut(), out_status, STATUS_RECORD_SIZE)?;
    let out_statement = scope.stack_alloc(STATEMENT_RECORD_SIZE)?;
    memory::fill_zero(scope.memory_mut(), out_statement, STATEMENT_RECORD_SIZE)?;

    let raw_consumed = scope.parse_statement(input, input_len, 0, out_statement, out_status)?;

    let status = decode_status(scope.memory(), out_status, input)?;
    let statement = if status.code.is_resumable() {
        Some(decode_statement(scope.memory(), out_statement, input)?)
    } else {
        None
    };

    let consumed = usize::try_from(raw_consumed).unwrap_or(0);
    if raw_consumed < 0 || consumed > text.len() {
        warn!(
            "[engine] consumed count {raw_consumed} outside input of {} bytes, clamping",
            text.len()
        );
    }
    let consumed = consumed.min(text.len());

    trace!(
        code = ?status.code,
        consumed,
        kind = ?statement.as_ref().map(Statement::kind),
        "parsed statement"
    );

    Ok(ParseResult {
        status,
        consumed,
        statement,
    })
}

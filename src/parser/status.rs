//! Parse status record returned by the engine for every call.

use crate::base::memory::{self, DecodeError, SourceSpan};

/// Size in bytes of the engine's status record: `code`, then an error-location string view.
pub const STATUS_RECORD_SIZE: u32 = 12;

/// Outcome of a single statement parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusCode {
    #[default]
    Ok,
    BlockBegin,
    BlockEnd,
    ExpectedStatementEnd,
    UnexpectedEof,
    SyntaxError,
}

impl StatusCode {
    /// Map a raw engine value. Values outside the known set are syntax errors.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => StatusCode::Ok,
            1 => StatusCode::BlockBegin,
            2 => StatusCode::BlockEnd,
            3 => StatusCode::ExpectedStatementEnd,
            4 => StatusCode::UnexpectedEof,
            _ => StatusCode::SyntaxError,
        }
    }

    pub fn to_raw(self) -> i32 {
        match self {
            StatusCode::Ok => 0,
            StatusCode::BlockBegin => 1,
            StatusCode::BlockEnd => 2,
            StatusCode::ExpectedStatementEnd => 3,
            StatusCode::UnexpectedEof => 4,
            StatusCode::SyntaxError => 5,
        }
    }

    /// A statement was produced and scanning may continue.
    pub fn is_resumable(self) -> bool {
        matches!(
            self,
            StatusCode::Ok | StatusCode::BlockBegin | StatusCode::BlockEnd
        )
    }

    pub fn is_terminal(self) -> bool {
        !self.is_resumable()
    }

    /// The input ended before the statement did; more text may complete it.
    pub fn needs_more_input(self) -> bool {
        matches!(
            self,
            StatusCode::ExpectedStatementEnd | StatusCode::UnexpectedEof
        )
    }
}

/// Status of a parse call. `error_location` is only meaningful for terminal codes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParseStatus {
    pub code: StatusCode,
    pub error_location: SourceSpan,
}

impl ParseStatus {
    pub fn new(code: StatusCode) -> Self {
        Self {
            code,
            error_location: SourceSpan::default(),
        }
    }
}

/// Decode the status record at `offset`.
///
/// The error location is read only for terminal codes that carry a non-empty
/// string view; everything else gets the empty span at offset 0.
pub fn decode_status(memory: &[u8], offset: u32, base: u32) -> Result<ParseStatus, DecodeError> {
    let code = StatusCode::from_raw(memory::read_i32(memory, offset)?);
    if code.is_resumable() {
        return Ok(ParseStatus::new(code));
    }

    let location_len = memory::read_i32(memory, offset + 8)?;
    let error_location = if location_len > 0 {
        memory::read_string_span(memory, offset + 4, base)?
    } else {
        SourceSpan::default()
    };

    Ok(ParseStatus {
        code,
        error_location,
    })
}

//! Statement parser adapter.
//!
//! This module wraps the external statement parsing engine:
//! - [`StatementEngine`] - the engine's binary contract
//! - [`parse_statement`] - one call, one statement (or one failure status)
//! - [`decode_statement`], [`decode_status`] - typed views of the engine's records
//! - [`LinearMemory`] - scratch-stack memory for native engines

mod engine;
mod error;
mod invoke;
mod statement;
mod status;

pub use engine::{LinearMemory, ScratchScope, StatementEngine};
pub use error::EngineError;
pub use invoke::{ParseResult, parse_statement};
pub use statement::{
    ActionStatement, BuiltinType, BuiltinTypeFieldStatement, ComponentStatement, EnumStatement,
    EnumValueStatement, ImportStatement, PackageStatement, STATEMENT_RECORD_SIZE, Statement,
    StatementData, StatementKind, SystemStatement, TransientStatement, decode_statement,
};
pub use status::{ParseStatus, STATUS_RECORD_SIZE, StatusCode, decode_status};

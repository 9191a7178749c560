//! Domain constants shared across the crate.

/// Language identifier used by editors for schema documents.
pub const LANGUAGE_ID: &str = "ecsact";

/// URI scheme of documents the language client serves.
pub const DOCUMENT_SCHEME: &str = "file";

/// File extension of schema documents.
pub const FILE_EXTENSION: &str = "ecsact";

/// Glob watched by the language client for schema files.
pub const FILE_WATCH_GLOB: &str = "**/*.ecsact";

/// Command identifier for restarting the language server.
pub const RESTART_COMMAND: &str = "ecsact.lsp.restart";

/// Executable used when no setting provides one.
pub const DEFAULT_SERVER_COMMAND: &str = "ecsact_lsp_server";

/// File name of the compiled statement parser module.
pub const ENGINE_MODULE_FILE: &str = "ecsact_parse.wasm";

/// Prefix tag for language-server lifecycle log lines.
pub const LSP_LOG_TAG: &str = "[ecsact-lsp]";

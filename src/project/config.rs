//! Editor settings that control how the language server is launched.
//!
//! Settings arrive as the editor's JSON settings object:
//!
//! ```json
//! {
//!   "ecsact": {
//!     "lsp": {
//!       "executable": {
//!         "default": { "command": "ecsact_lsp_server", "args": [] },
//!         "win32": { "command": "ecsact_lsp_server.exe" }
//!       }
//!     }
//!   }
//! }
//! ```

use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;

use crate::base::constants::DEFAULT_SERVER_COMMAND;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// One `ecsact.lsp.executable.<key>` entry. Unset fields fall through to the next level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ExecutableSettings {
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub args: Option<Vec<String>>,
}

/// The `default` entry plus per-platform overrides keyed by platform name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ExecutableTable {
    #[serde(default)]
    pub default: ExecutableSettings,
    #[serde(flatten)]
    pub platforms: FxHashMap<String, ExecutableSettings>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
struct LspSection {
    #[serde(default)]
    executable: ExecutableTable,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
struct EcsactSection {
    #[serde(default)]
    lsp: LspSection,
}

/// Settings relevant to this crate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LspSettings {
    #[serde(default)]
    ecsact: EcsactSection,
}

/// A resolved server command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Executable {
    pub command: String,
    pub args: Vec<String>,
}

impl Default for Executable {
    fn default() -> Self {
        Self {
            command: DEFAULT_SERVER_COMMAND.to_string(),
            args: Vec::new(),
        }
    }
}

/// Platform name as editors report it (`linux`, `darwin`, `win32`, ...).
pub fn host_platform() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        "windows" => "win32",
        other => other,
    }
}

impl LspSettings {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn executables(&self) -> &ExecutableTable {
        &self.ecsact.lsp.executable
    }

    /// Resolve the executable for the host platform.
    pub fn executable(&self) -> Executable {
        self.executable_for(host_platform())
    }

    /// Resolve the executable for `platform`.
    ///
    /// `command` and `args` resolve independently: the platform entry wins,
    /// then `default`, then the built-in server name with no arguments. An
    /// empty command counts as unset.
    pub fn executable_for(&self, platform: &str) -> Executable {
        let table = self.executables();
        let platform = table.platforms.get(platform);
        let levels = [platform, Some(&table.default)];

        let command = levels
            .iter()
            .flatten()
            .find_map(|level| level.command.clone().filter(|c| !c.is_empty()))
            .unwrap_or_else(|| DEFAULT_SERVER_COMMAND.to_string());
        let args = levels
            .iter()
            .flatten()
            .find_map(|level| level.args.clone())
            .unwrap_or_default();

        Executable { command, args }
    }
}

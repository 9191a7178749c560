//! Language server process lifecycle.
//!
//! The server is an opaque stdio peer. This module only starts, stops and
//! restarts it; the protocol spoken over its pipes belongs to the caller.
//! [`ServerHost`] is the editor-facing surface: every lifecycle failure is
//! logged with [`LSP_LOG_TAG`] and swallowed there.

use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use thiserror::Error;
use tracing::{debug, error, info};

use crate::base::constants::{
    DOCUMENT_SCHEME, FILE_EXTENSION, FILE_WATCH_GLOB, LANGUAGE_ID, LSP_LOG_TAG, RESTART_COMMAND,
};

use super::config::{Executable, LspSettings};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to stop language server: {0}")]
    Stop(#[source] std::io::Error),
}

/// Documents and files the language client is responsible for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentSelector {
    pub scheme: &'static str,
    pub language_id: &'static str,
    pub watch_glob: &'static str,
}

impl Default for DocumentSelector {
    fn default() -> Self {
        Self {
            scheme: DOCUMENT_SCHEME,
            language_id: LANGUAGE_ID,
            watch_glob: FILE_WATCH_GLOB,
        }
    }
}

impl DocumentSelector {
    /// Whether a document is served: the URI scheme must match, then the
    /// language id or, failing that, the path's extension.
    pub fn matches(&self, scheme: &str, language_id: Option<&str>, path: &Path) -> bool {
        if scheme != self.scheme {
            return false;
        }
        match language_id {
            Some(id) => id == self.language_id,
            None => path.extension().is_some_and(|ext| ext == FILE_EXTENSION),
        }
    }
}

/// A language server child process speaking over stdio.
#[derive(Debug)]
pub struct LanguageClient {
    executable: Executable,
    child: Option<Child>,
}

impl LanguageClient {
    pub fn new(executable: Executable) -> Self {
        Self {
            executable,
            child: None,
        }
    }

    pub fn executable(&self) -> &Executable {
        &self.executable
    }

    /// Replace the command line. Takes effect on the next start.
    pub fn set_executable(&mut self, executable: Executable) {
        self.executable = executable;
    }

    /// Whether the server process is alive. Reaps it if it has exited.
    pub fn is_running(&mut self) -> bool {
        let Some(child) = self.child.as_mut() else {
            return false;
        };
        match child.try_wait() {
            Ok(None) => true,
            Ok(Some(status)) => {
                debug!("{LSP_LOG_TAG} server exited with {status}");
                self.child = None;
                false
            }
            Err(_) => false,
        }
    }

    /// OS process id of the running server.
    pub fn pid(&mut self) -> Option<u32> {
        if self.is_running() {
            self.child.as_ref().map(Child::id)
        } else {
            None
        }
    }

    /// Spawn the server. Does nothing if it is already running.
    pub fn start(&mut self) -> Result<(), ServerError> {
        if self.is_running() {
            return Ok(());
        }

        let child = Command::new(&self.executable.command)
            .args(&self.executable.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| ServerError::Spawn {
                command: self.executable.command.clone(),
                source,
            })?;

        info!(
            "{LSP_LOG_TAG} started `{}` (pid {})",
            self.executable.command,
            child.id()
        );
        self.child = Some(child);
        Ok(())
    }

    /// Kill and reap the server. Does nothing if it is not running.
    pub fn stop(&mut self) -> Result<(), ServerError> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        if child.try_wait().map_err(ServerError::Stop)?.is_none() {
            child.kill().map_err(ServerError::Stop)?;
        }
        let status = child.wait().map_err(ServerError::Stop)?;
        info!("{LSP_LOG_TAG} stopped language server ({status})");
        Ok(())
    }

    pub fn restart(&mut self) -> Result<(), ServerError> {
        self.stop()?;
        self.start()
    }

    /// Take the server's stdio pipes for the protocol transport.
    pub fn take_stdio(&mut self) -> Option<(ChildStdin, ChildStdout)> {
        let child = self.child.as_mut()?;
        Some((child.stdin.take()?, child.stdout.take()?))
    }
}

impl Drop for LanguageClient {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            error!("{LSP_LOG_TAG} {err}");
        }
    }
}

/// Editor-facing language server state: activation, commands, settings, deactivation.
#[derive(Debug, Default)]
pub struct ServerHost {
    settings: LspSettings,
    selector: DocumentSelector,
    client: Option<LanguageClient>,
}

impl ServerHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client(&mut self) -> Option<&mut LanguageClient> {
        self.client.as_mut()
    }

    pub fn settings(&self) -> &LspSettings {
        &self.settings
    }

    pub fn selector(&self) -> DocumentSelector {
        self.selector
    }

    /// Create the client from `settings` and start the server.
    pub fn activate(&mut self, settings: LspSettings) {
        self.deactivate();

        let mut client = LanguageClient::new(settings.executable());
        self.settings = settings;
        if let Err(err) = client.start() {
            error!("{LSP_LOG_TAG} {err}");
        }
        self.client = Some(client);
    }

    /// Record new settings. The command line is used from the next (re)start.
    pub fn configuration_changed(&mut self, settings: LspSettings) {
        debug!("{LSP_LOG_TAG} configuration changed: {settings:?}");
        let executable = settings.executable();
        self.settings = settings;
        if let Some(client) = self.client.as_mut() {
            client.set_executable(executable);
        }
    }

    /// Dispatch an editor command. Returns `false` for commands not handled here.
    pub fn execute_command(&mut self, command: &str) -> bool {
        if command != RESTART_COMMAND {
            return false;
        }
        self.restart();
        true
    }

    /// Restart the server. A no-op when there is no client.
    pub fn restart(&mut self) {
        let Some(client) = self.client.as_mut() else {
            debug!("{LSP_LOG_TAG} restart requested with no client");
            return;
        };
        if let Err(err) = client.restart() {
            error!("{LSP_LOG_TAG} restart failed: {err}");
        }
    }

    /// Stop and drop the client.
    pub fn deactivate(&mut self) {
        let Some(mut client) = self.client.take() else {
            return;
        };
        if let Err(err) = client.stop() {
            error!("{LSP_LOG_TAG} {err}");
        }
    }
}

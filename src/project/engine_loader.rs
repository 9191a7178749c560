//! Loading the statement engine module and owning the loaded instance.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::base::constants::ENGINE_MODULE_FILE;
use crate::parser::{EngineError, StatementEngine};

/// Magic bytes and version at the start of every wasm module.
const WASM_HEADER: [u8; 8] = [0x00, 0x61, 0x73, 0x6d, 0x01, 0x00, 0x00, 0x00];

/// Produces a ready-to-use engine.
pub trait EngineLoader: Send + Sync {
    fn load(&self, cancel: &CancellationToken) -> Result<Box<dyn StatementEngine>, EngineError>;
}

impl<F> EngineLoader for F
where
    F: Fn(&CancellationToken) -> Result<Box<dyn StatementEngine>, EngineError> + Send + Sync,
{
    fn load(&self, cancel: &CancellationToken) -> Result<Box<dyn StatementEngine>, EngineError> {
        self(cancel)
    }
}

/// Turns module bytes into a running engine, using whatever runtime the host embeds.
pub trait Instantiate: Send + Sync {
    fn instantiate(&self, module: &[u8]) -> Result<Box<dyn StatementEngine>, EngineError>;
}

impl<F> Instantiate for F
where
    F: Fn(&[u8]) -> Result<Box<dyn StatementEngine>, EngineError> + Send + Sync,
{
    fn instantiate(&self, module: &[u8]) -> Result<Box<dyn StatementEngine>, EngineError> {
        self(module)
    }
}

/// Loads the engine module from disk and hands it to an [`Instantiate`] step.
pub struct ModuleFileLoader<I> {
    path: PathBuf,
    instantiate: I,
}

impl<I: Instantiate> ModuleFileLoader<I> {
    /// Creates a loader with automatic path discovery.
    ///
    /// Searches for the module in these locations (in order):
    /// 1. Next to the current executable (for installed binaries)
    /// 2. Current working directory (for development)
    pub fn new(instantiate: I) -> Self {
        Self {
            path: Self::discover_path(),
            instantiate,
        }
    }

    /// Creates a loader for a specific module path.
    pub fn with_path(path: PathBuf, instantiate: I) -> Self {
        Self { path, instantiate }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn discover_path() -> PathBuf {
        if let Some(exe_dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|p| p.to_path_buf()))
        {
            let next_to_exe = exe_dir.join(ENGINE_MODULE_FILE);
            if next_to_exe.is_file() {
                return next_to_exe;
            }
        }

        PathBuf::from(ENGINE_MODULE_FILE)
    }
}

impl<I: Instantiate> EngineLoader for ModuleFileLoader<I> {
    fn load(&self, cancel: &CancellationToken) -> Result<Box<dyn StatementEngine>, EngineError> {
        if cancel.is_cancelled() {
            return Err(EngineError::Cancelled);
        }
        if !self.path.exists() {
            return Err(EngineError::ModuleNotFound {
                path: self.path.clone(),
            });
        }

        let bytes = std::fs::read(&self.path).map_err(|source| EngineError::Io {
            path: self.path.clone(),
            source,
        })?;
        if !bytes.starts_with(&WASM_HEADER) {
            return Err(EngineError::invalid_module(format!(
                "{} is not a wasm module",
                self.path.display()
            )));
        }
        debug!("[engine] read {} bytes from {}", bytes.len(), self.path.display());

        if cancel.is_cancelled() {
            return Err(EngineError::Cancelled);
        }
        self.instantiate.instantiate(&bytes)
    }
}

/// Lazily loaded, exclusively locked engine instance.
///
/// The first request loads the engine; a failed load leaves the handle empty
/// so the next request tries again. Once loaded the engine is kept for the
/// handle's lifetime. Requests are serialized because the engine's scratch
/// stack is shared state.
pub struct EngineHandle {
    loader: Box<dyn EngineLoader>,
    engine: Mutex<Option<Box<dyn StatementEngine>>>,
}

impl EngineHandle {
    pub fn new(loader: impl EngineLoader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            engine: Mutex::new(None),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.engine.lock().is_some()
    }

    /// Run `f` with exclusive access to the engine, loading it first if needed.
    pub fn with_engine<R>(
        &self,
        cancel: &CancellationToken,
        f: impl FnOnce(&mut dyn StatementEngine) -> R,
    ) -> Result<R, EngineError> {
        let mut slot = self.engine.lock();
        let engine = match slot.take() {
            Some(engine) => engine,
            None => self.load(cancel)?,
        };
        let engine = slot.insert(engine);
        Ok(f(&mut **engine))
    }

    fn load(&self, cancel: &CancellationToken) -> Result<Box<dyn StatementEngine>, EngineError> {
        match self.loader.load(cancel) {
            Ok(engine) => {
                info!("[engine] statement engine loaded");
                Ok(engine)
            }
            Err(EngineError::Cancelled) => {
                debug!("[engine] load cancelled");
                Err(EngineError::Cancelled)
            }
            Err(err) => {
                error!("[engine] failed to load statement engine: {err}");
                Err(err)
            }
        }
    }
}

impl std::fmt::Debug for EngineHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineHandle")
            .field("loaded", &self.engine.try_lock().map(|slot| slot.is_some()))
            .finish()
    }
}

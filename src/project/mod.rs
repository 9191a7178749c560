pub mod config;
mod engine_loader;
pub mod server;

pub use config::{ConfigError, Executable, LspSettings, host_platform};
pub use engine_loader::{EngineHandle, EngineLoader, Instantiate, ModuleFileLoader};
pub use server::{DocumentSelector, LanguageClient, ServerError, ServerHost};

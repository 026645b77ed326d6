//! Core process state: the serve context, shutdown handle, startup errors.

mod context;
mod error;
mod state;

pub use context::ServeContext;
pub use error::StartupError;
pub use state::Shutdown;

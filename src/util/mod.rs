//! Shared utilities

pub mod config;
pub mod context;
pub mod dir;
pub mod fs;
pub mod process;
pub mod shell;

pub use config::Config;
pub use context::GlobalContext;

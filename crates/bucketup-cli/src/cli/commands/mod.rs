//! CLI command handlers.

mod update;

pub use update::run_update;

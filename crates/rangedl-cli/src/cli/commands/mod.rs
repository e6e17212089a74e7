//! CLI command handlers. Each command is in its own file.

mod clean;
mod get;
mod scratch_dir;

pub use clean::run_clean;
pub use get::run_get;
pub use scratch_dir::run_scratch_dir;

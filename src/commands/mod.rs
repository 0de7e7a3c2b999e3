mod completions;
mod config;
mod sync;

pub use completions::CompletionOpt;
pub use config::{config, ConfigOpt};
pub use sync::{sync, SyncOpt};

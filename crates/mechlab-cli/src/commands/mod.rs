// Subcommand handlers. main.rs parses arguments and dispatches to these.

pub mod chassis;
pub mod coder_stats;
pub mod decode;
pub mod encode;

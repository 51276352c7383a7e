//! Mechlab CLI library.
//!
//! Path resolution, subcommand handlers and output rendering for the
//! `mechlab-cli` binary.

pub mod commands;
pub mod config;
pub mod output;

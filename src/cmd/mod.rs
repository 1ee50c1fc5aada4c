//! Subcommand implementations.
//!
//! Each command exposes an `Args` struct for clap and a `run` function that
//! returns a user-facing error string.

pub mod config_cmd;
pub mod rank;
pub mod score;

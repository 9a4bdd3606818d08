//! Switchboard CLI library module.
//!
//! Operator front end for the switchboard console:
//! - `cli/` - Argument parsing, logging setup and subcommand dispatch
//! - `config` - The `switchboard.toml` configuration file
//! - `session` - Line-oriented session over stdin/stdout

pub mod cli;
pub mod config;
pub mod session;

//! ROSTER CLI library: argument parsing, configuration, logging setup, and
//! command execution for the `roster` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod telemetry;

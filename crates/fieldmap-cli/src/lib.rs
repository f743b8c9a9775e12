//! Command-line front end for the fieldmap engine.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod oracle_command;
pub mod summary;

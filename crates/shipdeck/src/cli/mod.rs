//! Command-line interface for shipdeck.
//!
//! This module provides the CLI structure for the `shipdeck` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ConfigCommand, DeleteCommand, EditCommand, ListCommand, OutputFormat,
    SearchCommand, ShowCommand,
};

/// shipdeck - Manage a catalog of historical ships
///
/// Lists, searches, creates, edits, and deletes ship records held by a
/// remote ship service, or by an in-memory store in standalone mode.
#[derive(Debug, Parser)]
#[command(name = "shipdeck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Use the in-memory store instead of the remote service
    #[arg(long, global = true)]
    pub standalone: bool,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List ships
    List(ListCommand),

    /// Show one ship
    Show(ShowCommand),

    /// Search ships on the service by field
    Search(SearchCommand),

    /// Add a ship
    Add(AddCommand),

    /// Edit a ship
    Edit(EditCommand),

    /// Delete a ship
    Delete(DeleteCommand),

    /// Open an interactive catalog session
    Shell,

    /// Check that the ship service is reachable
    Ping,

    /// Show the current session
    Whoami,

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.verbose, self.quiet)
    }
}

//! Command-line interface for littlelemon.
//!
//! This module provides the CLI structure for the `lemon` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    CategoryArg, ConfigCommand, LaunchCommand, MenuCommand, OnboardCommand, ProfileCommand,
    ProfileUpdate,
};

/// lemon - Little Lemon menu and profile from the terminal
///
/// Browses the restaurant menu from a local cache backed by the remote
/// catalog, and manages the signed-in guest's profile.
#[derive(Debug, Parser)]
#[command(name = "lemon")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for debug)
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
    /// Resolve where the app opens for the current session
    Launch(LaunchCommand),

    /// Show the menu, optionally searched and filtered
    Menu(MenuCommand),

    /// Sign in with a first name and email
    Onboard(OnboardCommand),

    /// View or edit the stored profile
    #[command(subcommand)]
    Profile(ProfileCommand),

    /// Clear the session
    Logout,

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

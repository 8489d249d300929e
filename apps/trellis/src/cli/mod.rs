//! # Trellis CLI Module
//!
//! This module implements the CLI interface for Trellis.
//!
//! ## Available Commands
//!
//! - `demo` - Run the built-in end-to-end scenario
//! - `load` - Publish a JSON scenario and process its events
//! - `verify` - Build a scenario's graph and check acyclicity
//! - `snapshot` - Publish + process a scenario and write snapshot bytes
//! - `inspect` - Read a snapshot file and report its contents

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use trellis_core::TrellisError;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Trellis - shared substrate driver
///
/// A bounded, append-only graph-and-event store. Heterogeneous producers
/// publish typed nodes and causally-ordered events; the substrate replays
/// them deterministically.
#[derive(Parser, Debug)]
#[command(name = "trellis")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML file overriding substrate capacities
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the built-in end-to-end scenario
    Demo,

    /// Publish a scenario file and process its events
    Load {
        /// Path to the scenario file (JSON)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Build a scenario's graph and check it for cycles
    Verify {
        /// Path to the scenario file (JSON)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Publish + process a scenario, then write snapshot bytes
    Snapshot {
        /// Path to the scenario file (JSON)
        #[arg(short, long)]
        file: PathBuf,

        /// Output file for the snapshot bytes
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Read a snapshot file and report its contents
    Inspect {
        /// Path to the snapshot file
        #[arg(short, long)]
        input: PathBuf,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), TrellisError> {
    let json_mode = cli.json_mode;
    let config = cli.config.as_deref();

    match cli.command {
        Some(Commands::Demo) | None => cmd_demo(config, json_mode),
        Some(Commands::Load { file }) => cmd_load(config, json_mode, &file),
        Some(Commands::Verify { file }) => cmd_verify(config, json_mode, &file),
        Some(Commands::Snapshot { file, output }) => {
            cmd_snapshot(config, json_mode, &file, &output)
        }
        Some(Commands::Inspect { input }) => cmd_inspect(json_mode, &input),
    }
}

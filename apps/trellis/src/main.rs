//! # Trellis - Substrate Driver
//!
//! The main binary for the Trellis graph-and-event substrate.
//!
//! This application provides:
//! - CLI interface for publishing scenarios into a substrate
//! - Snapshot file I/O (the core defines the format, this binary moves bytes)
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │               apps/trellis (THE BINARY)          │
//! │                                                  │
//! │   ┌─────────────┐      ┌──────────────────────┐  │
//! │   │    CLI      │      │  Scenario / Snapshot │  │
//! │   │   (clap)    │      │      file I/O        │  │
//! │   └──────┬──────┘      └──────────┬───────────┘  │
//! │          │                        │              │
//! │          └────────────┬───────────┘              │
//! │                       ▼                          │
//! │               ┌───────────────┐                  │
//! │               │ trellis-core  │                  │
//! │               │  (THE LOGIC)  │                  │
//! │               └───────────────┘                  │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Run the built-in end-to-end scenario
//! trellis demo
//!
//! # Publish a scenario file and process its events
//! trellis load --file scenario.json
//!
//! # Check a scenario's graph for cycles
//! trellis verify --file scenario.json
//! ```

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trellis::cli;

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // Initialize tracing — TRELLIS_LOG_FORMAT=json enables machine-parseable
    // output.
    let log_format = std::env::var("TRELLIS_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "trellis=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Display startup banner
    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Trellis startup banner.
fn print_banner() {
    println!(
        r#"
  ████████╗██████╗ ███████╗██╗     ██╗     ██╗███████╗
  ╚══██╔══╝██╔══██╗██╔════╝██║     ██║     ██║██╔════╝
     ██║   ██████╔╝█████╗  ██║     ██║     ██║███████╗
     ██║   ██╔══██╗██╔══╝  ██║     ██║     ██║╚════██║
     ██║   ██║  ██║███████╗███████╗███████╗██║███████║
     ╚═╝   ╚═╝  ╚═╝╚══════╝╚══════╝╚══════╝╚═╝╚══════╝

  Shared Substrate v{}

  Bounded • Append-only • Deterministic
"#,
        env!("CARGO_PKG_VERSION")
    );
}

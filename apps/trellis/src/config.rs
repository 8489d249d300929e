//! # App Configuration
//!
//! TOML overrides for substrate capacities. Everything is optional; missing
//! keys fall back to the compiled-in defaults.
//!
//! ```toml
//! [capacities]
//! max_nodes = 1024
//! max_edges = 4096
//! max_pending_events = 256
//! ```

use serde::Deserialize;
use std::path::Path;
use trellis_core::{Capacities, TrellisError};

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub capacities: CapacityOverrides,
}

/// Optional per-limit overrides of `Capacities::default()`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct CapacityOverrides {
    pub max_nodes: Option<usize>,
    pub max_edges: Option<usize>,
    pub max_pending_events: Option<usize>,
    pub max_payload_bytes: Option<usize>,
    pub max_metadata_bytes: Option<usize>,
}

impl CapacityOverrides {
    /// Merge the overrides over the defaults.
    #[must_use]
    pub fn resolve(&self) -> Capacities {
        let defaults = Capacities::default();
        Capacities {
            max_nodes: self.max_nodes.unwrap_or(defaults.max_nodes),
            max_edges: self.max_edges.unwrap_or(defaults.max_edges),
            max_pending_events: self
                .max_pending_events
                .unwrap_or(defaults.max_pending_events),
            max_payload_bytes: self.max_payload_bytes.unwrap_or(defaults.max_payload_bytes),
            max_metadata_bytes: self
                .max_metadata_bytes
                .unwrap_or(defaults.max_metadata_bytes),
        }
    }
}

/// Load configuration from a TOML file.
pub fn load(path: &Path) -> Result<AppConfig, TrellisError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        TrellisError::IoError(format!("cannot read config '{}': {}", path.display(), e))
    })?;
    toml::from_str(&text).map_err(|e| TrellisError::DeserializationError(e.to_string()))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_resolves_to_defaults() {
        let config: AppConfig = toml::from_str("").expect("parse");
        assert_eq!(config.capacities.resolve(), Capacities::default());
    }

    #[test]
    fn partial_overrides_merge_over_defaults() {
        let config: AppConfig = toml::from_str(
            "[capacities]\nmax_nodes = 32\nmax_pending_events = 8\n",
        )
        .expect("parse");

        let caps = config.capacities.resolve();
        assert_eq!(caps.max_nodes, 32);
        assert_eq!(caps.max_pending_events, 8);
        assert_eq!(caps.max_edges, Capacities::default().max_edges);
    }
}

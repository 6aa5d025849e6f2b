//! Engine configuration.

use agraph_core::GraphContextConfig;
use serde::Serialize;

/// Configuration for a [`Session`](crate::Session).
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Initial capacity of each graph context's vertex table.
    pub vertex_capacity: usize,
    /// Initial capacity of each graph context's edge table.
    pub edge_capacity: usize,
    /// Whether rows whose properties are not an object fail the build.
    pub validate_properties: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vertex_capacity: 1_000_000,
            edge_capacity: 1_000_000,
            validate_properties: true,
        }
    }
}

impl Config {
    /// Small tables, suitable for tests and short-lived tools.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            vertex_capacity: 64,
            edge_capacity: 64,
            ..Self::default()
        }
    }

    /// Sets the initial vertex table capacity.
    #[must_use]
    pub fn with_vertex_capacity(mut self, capacity: usize) -> Self {
        self.vertex_capacity = capacity;
        self
    }

    /// Sets the initial edge table capacity.
    #[must_use]
    pub fn with_edge_capacity(mut self, capacity: usize) -> Self {
        self.edge_capacity = capacity;
        self
    }

    /// Enables or disables property validation.
    #[must_use]
    pub fn with_validate_properties(mut self, enabled: bool) -> Self {
        self.validate_properties = enabled;
        self
    }

    /// The settings used to build each graph context.
    #[must_use]
    pub fn context_config(&self) -> GraphContextConfig {
        GraphContextConfig {
            vertex_capacity: self.vertex_capacity,
            edge_capacity: self.edge_capacity,
            validate_properties: self.validate_properties,
        }
    }
}

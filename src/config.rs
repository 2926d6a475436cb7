//! Configuration for keytable
//!
//! Centralized configuration with sensible defaults.

/// Configuration for a single table instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    // -------------------------------------------------------------------------
    // Table Configuration
    // -------------------------------------------------------------------------
    /// Table identifier (normalized to lower case by the table)
    pub name: String,

    // -------------------------------------------------------------------------
    // Iteration Configuration
    // -------------------------------------------------------------------------
    /// Seed for the default random iteration strategy.
    /// `None` draws a fresh order from the thread RNG on every iteration.
    pub random_seed: Option<u64>,

    // -------------------------------------------------------------------------
    // Actor Configuration
    // -------------------------------------------------------------------------
    /// Request queue capacity for `TableActor`.
    /// `None` uses an unbounded channel.
    pub actor_queue_capacity: Option<usize>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            name: "table".to_string(),
            random_seed: None,
            actor_queue_capacity: Some(1024),
        }
    }
}

impl TableConfig {
    /// Create a new config builder
    pub fn builder() -> TableConfigBuilder {
        TableConfigBuilder::default()
    }
}

/// Builder for TableConfig
#[derive(Default)]
pub struct TableConfigBuilder {
    config: TableConfig,
}

impl TableConfigBuilder {
    /// Set the table name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Seed the default random iteration strategy
    pub fn random_seed(mut self, seed: u64) -> Self {
        self.config.random_seed = Some(seed);
        self
    }

    /// Set a bounded request queue for the table actor
    pub fn actor_queue_capacity(mut self, capacity: usize) -> Self {
        self.config.actor_queue_capacity = Some(capacity);
        self
    }

    /// Use an unbounded request queue for the table actor
    pub fn unbounded_actor_queue(mut self) -> Self {
        self.config.actor_queue_capacity = None;
        self
    }

    pub fn build(self) -> TableConfig {
        self.config
    }
}

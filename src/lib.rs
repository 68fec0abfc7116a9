//! Churn knowledge graph
//!
//! Builds a directed, typed, attributed graph from tabular churned-customer
//! records and answers structured relationship and aggregate queries over
//! it: customers by segment/reason/competitor, neighbor traversal, and
//! per-segment churn-pattern aggregates. The graph can be persisted as a
//! compressed snapshot and restored without touching the source data.
//!
//! The graph is built once, synchronously, from a fully materialized
//! record batch, then treated as read-only (build-then-freeze). Absent
//! entities produce empty query results, never errors.
//!
//! # Example
//!
//! ```rust
//! use churngraph::dataset::ChurnRecord;
//! use churngraph::ChurnGraph;
//!
//! let records = vec![
//!     ChurnRecord::new("Acme Corp")
//!         .with_segment("Commercial")
//!         .with_amount_text("$10,000.00")
//!         .with_primary_reason("Pricing")
//!         .with_competitor_1("RivalSoft"),
//!     ChurnRecord::new("Beta LLC")
//!         .with_segment("Commercial")
//!         .with_amount(5_000.0)
//!         .with_primary_reason("Support"),
//! ];
//!
//! let graph = ChurnGraph::from_records(&records);
//!
//! assert_eq!(
//!     graph.customers_by_segment("Commercial"),
//!     vec!["Acme Corp", "Beta LLC"]
//! );
//!
//! let patterns = graph.churn_patterns("Commercial");
//! assert_eq!(patterns.customer_count, 2);
//! assert_eq!(patterns.avg_arr_lost, 7_500.0);
//! ```

#![warn(clippy::all)]

pub mod dataset;
pub mod graph;
pub mod persistence;
pub mod query;

// Re-export main types for convenience
pub use graph::{
    ChurnGraph, Edge, EntityKind, GraphError, GraphResult, GraphStatistics, Node, NodeId,
    PropertyMap, PropertyValue, ReasonKind, Relationship,
};

pub use dataset::{load_records, Amount, ChurnRecord, DatasetError, DatasetResult};

pub use persistence::{SnapshotError, SnapshotResult};

pub use query::ChurnPatterns;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}

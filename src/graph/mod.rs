//! Churn knowledge graph core
//!
//! Directed, typed, attributed graph over churned-customer records:
//! - Tagged node identities per entity kind (no flat string namespace)
//! - Labeled Customer -> entity relationships with edge properties
//! - Order-preserving storage so query output is deterministic
//! - Per-kind entity index owned by the graph instance

pub mod builder;
pub mod edge;
pub mod node;
pub mod property;
pub mod store;
pub mod types;

// Re-export main types
pub use edge::Edge;
pub use node::Node;
pub use property::{PropertyMap, PropertyValue};
pub use store::{ChurnGraph, GraphError, GraphResult, GraphStatistics};
pub use types::{EntityKind, NodeId, ReasonKind, Relationship};

//! Edge implementation for the churn knowledge graph

use super::property::{PropertyMap, PropertyValue};
use super::types::{NodeId, Relationship};
use serde::{Deserialize, Serialize};

/// A directed, labeled edge
///
/// The graph holds at most one edge per (source, target) pair; identity is
/// the endpoint pair, with the relationship label and properties as
/// payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Source node (edge goes FROM this node)
    pub source: NodeId,

    /// Target node (edge goes TO this node)
    pub target: NodeId,

    /// Relationship label (e.g. BELONGS_TO, CHURNED_DUE_TO)
    pub relationship: Relationship,

    /// Properties associated with this edge
    pub properties: PropertyMap,
}

impl Edge {
    /// Create a new directed edge
    pub fn new(source: NodeId, target: NodeId, relationship: Relationship) -> Self {
        Edge {
            source,
            target,
            relationship,
            properties: PropertyMap::new(),
        }
    }

    /// Create a new edge with properties
    pub fn new_with_properties(
        source: NodeId,
        target: NodeId,
        relationship: Relationship,
        properties: PropertyMap,
    ) -> Self {
        Edge {
            source,
            target,
            relationship,
            properties,
        }
    }

    /// Set a property value
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Get a property value
    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Check if property exists
    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }
}

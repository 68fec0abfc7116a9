//! Node implementation for the churn knowledge graph

use super::property::{PropertyMap, PropertyValue};
use super::types::{EntityKind, NodeId};
use serde::{Deserialize, Serialize};

/// A node in the knowledge graph
///
/// Identity carries the entity kind (see [`NodeId`]); everything else about
/// the entity lives in the property map. Customer nodes carry the full
/// record attributes, the other kinds carry at least a `name` property.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Tagged identifier for this node
    pub id: NodeId,

    /// Properties associated with this node
    pub properties: PropertyMap,
}

impl Node {
    /// Create a new node with no properties
    pub fn new(id: NodeId) -> Self {
        Node {
            id,
            properties: PropertyMap::new(),
        }
    }

    /// Create a new node with properties
    pub fn new_with_properties(id: NodeId, properties: PropertyMap) -> Self {
        Node { id, properties }
    }

    /// Entity kind of this node
    pub fn kind(&self) -> EntityKind {
        self.id.kind()
    }

    /// Textual identifier of this node
    pub fn name(&self) -> &str {
        self.id.name()
    }

    /// Set a property value, returning the previous value if any
    pub fn set_property(
        &mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Option<PropertyValue> {
        self.properties.insert(key.into(), value.into())
    }

    /// Get a property value
    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Check if property exists
    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Get number of properties
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// Float property with a 0.0 default, the read used by aggregates
    pub fn float_property_or_zero(&self, key: &str) -> f64 {
        self.properties
            .get(key)
            .and_then(PropertyValue::as_float)
            .unwrap_or(0.0)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl std::hash::Hash for Node {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_node() {
        let node = Node::new(NodeId::segment("Commercial"));
        assert_eq!(node.kind(), EntityKind::Segment);
        assert_eq!(node.name(), "Commercial");
        assert_eq!(node.property_count(), 0);
    }

    #[test]
    fn test_node_properties() {
        let mut node = Node::new(NodeId::customer("Acme Corp"));

        node.set_property("segment", "Enterprise");
        node.set_property("arr_lost", 50_000.0);
        node.set_property("tenure_years", 3.5);

        assert_eq!(
            node.get_property("segment").unwrap().as_string(),
            Some("Enterprise")
        );
        assert_eq!(node.get_property("arr_lost").unwrap().as_float(), Some(50_000.0));
        assert_eq!(node.property_count(), 3);
        assert!(node.has_property("tenure_years"));
        assert!(!node.has_property("churn_date"));
    }

    #[test]
    fn test_set_property_returns_previous() {
        let mut node = Node::new(NodeId::customer("Acme Corp"));
        assert!(node.set_property("arr_lost", 10.0).is_none());
        let old = node.set_property("arr_lost", 20.0);
        assert_eq!(old.and_then(|v| v.as_float()), Some(10.0));
    }

    #[test]
    fn test_float_property_or_zero() {
        let mut node = Node::new(NodeId::customer("Acme Corp"));
        assert_eq!(node.float_property_or_zero("arr_lost"), 0.0);

        node.set_property("arr_lost", 1_234.5);
        assert_eq!(node.float_property_or_zero("arr_lost"), 1_234.5);

        // Non-float values also read as zero
        node.set_property("segment", "SMB");
        assert_eq!(node.float_property_or_zero("segment"), 0.0);
    }

    #[test]
    fn test_node_equality_by_id() {
        let node1 = Node::new(NodeId::competitor("RivalSoft"));
        let mut node2 = Node::new(NodeId::competitor("RivalSoft"));
        node2.set_property("name", "RivalSoft");
        let node3 = Node::new(NodeId::competitor("OtherCo"));

        assert_eq!(node1, node2); // Same id, properties do not matter
        assert_ne!(node1, node3);
    }
}

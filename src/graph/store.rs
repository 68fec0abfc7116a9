//! In-memory storage for the churn knowledge graph
//!
//! Hash-based structures with order preservation where query output
//! depends on it:
//! - nodes: NodeId -> Node, insertion-ordered
//! - outgoing: NodeId -> (target -> Edge), insertion-ordered both levels,
//!   at most one edge per pair
//! - incoming: NodeId -> ordered set of predecessor NodeIds
//! - entity_index: EntityKind -> ordered set of identifiers (derived cache)

use super::edge::Edge;
use super::node::Node;
use super::types::{EntityKind, NodeId, Relationship};
use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Errors that can occur during graph mutation
#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    #[error("invalid edge: source node {0} does not exist")]
    MissingSource(NodeId),

    #[error("invalid edge: target node {0} does not exist")]
    MissingTarget(NodeId),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Aggregate counts over the graph, logged after construction and exposed
/// to callers for diagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct GraphStatistics {
    pub node_count: usize,
    pub edge_count: usize,
    /// Entity counts in extraction-pass order
    pub entities: Vec<(EntityKind, usize)>,
    /// Relationship counts in declaration order
    pub relationships: Vec<(Relationship, usize)>,
}

impl GraphStatistics {
    pub fn entity_count(&self, kind: EntityKind) -> usize {
        self.entities
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    pub fn relationship_count(&self, relationship: Relationship) -> usize {
        self.relationships
            .iter()
            .find(|(r, _)| *r == relationship)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }
}

impl std::fmt::Display for GraphStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "nodes: {}", self.node_count)?;
        for (kind, count) in &self.entities {
            writeln!(f, "  {}: {}", kind, count)?;
        }
        writeln!(f, "edges: {}", self.edge_count)?;
        for (relationship, count) in &self.relationships {
            writeln!(f, "  {}: {}", relationship, count)?;
        }
        Ok(())
    }
}

/// The churn knowledge graph
///
/// Built once from a batch of records, then treated as read-only; there is
/// no incremental ingestion (new source rows require a full rebuild).
#[derive(Debug, Default)]
pub struct ChurnGraph {
    /// Node storage, insertion-ordered
    pub(crate) nodes: IndexMap<NodeId, Node>,

    /// Outgoing adjacency: source -> (target -> edge)
    ///
    /// Insertion-ordered at both levels so edge iteration replays build
    /// order; snapshot restore depends on this to reproduce predecessor
    /// order and with it query output.
    pub(crate) outgoing: IndexMap<NodeId, IndexMap<NodeId, Edge>>,

    /// Incoming adjacency: target -> ordered predecessor set
    pub(crate) incoming: FxHashMap<NodeId, IndexSet<NodeId>>,

    /// Per-kind identifier sets, owned by the graph instance
    ///
    /// Derived from node identities; rebuilt (never trusted) when the
    /// graph is restored from a snapshot.
    pub(crate) entity_index: FxHashMap<EntityKind, IndexSet<String>>,
}

impl ChurnGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, merging properties if the id already exists
    ///
    /// Repeated inserts follow last-write-wins per property key, so a
    /// duplicate account name later in the dataset overwrites the earlier
    /// row's attributes.
    pub fn upsert_node(&mut self, node: Node) {
        self.entity_index
            .entry(node.kind())
            .or_default()
            .insert(node.name().to_string());

        match self.nodes.entry(node.id.clone()) {
            indexmap::map::Entry::Occupied(mut existing) => {
                existing.get_mut().properties.extend(node.properties);
            }
            indexmap::map::Entry::Vacant(slot) => {
                slot.insert(node);
            }
        }
    }

    /// Insert a directed edge between two existing nodes
    ///
    /// At most one edge exists per (source, target) pair; re-adding merges
    /// properties and takes the newer relationship label.
    pub fn add_edge(&mut self, edge: Edge) -> GraphResult<()> {
        if !self.nodes.contains_key(&edge.source) {
            return Err(GraphError::MissingSource(edge.source));
        }
        if !self.nodes.contains_key(&edge.target) {
            return Err(GraphError::MissingTarget(edge.target));
        }

        self.incoming
            .entry(edge.target.clone())
            .or_default()
            .insert(edge.source.clone());

        let adjacency = self.outgoing.entry(edge.source.clone()).or_default();
        match adjacency.entry(edge.target.clone()) {
            indexmap::map::Entry::Occupied(mut existing) => {
                let slot = existing.get_mut();
                slot.relationship = edge.relationship;
                slot.properties.extend(edge.properties);
            }
            indexmap::map::Entry::Vacant(slot) => {
                slot.insert(edge);
            }
        }

        Ok(())
    }

    /// Get a node by id
    pub fn get_node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Check if a node exists
    pub fn has_node(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Get the edge between two nodes, if any
    pub fn get_edge(&self, source: &NodeId, target: &NodeId) -> Option<&Edge> {
        self.outgoing.get(source)?.get(target)
    }

    /// Total number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total number of edges
    pub fn edge_count(&self) -> usize {
        self.outgoing.values().map(IndexMap::len).sum()
    }

    /// Iterate over all nodes in insertion order
    pub fn all_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Iterate over all edges
    pub fn all_edges(&self) -> impl Iterator<Item = &Edge> {
        self.outgoing.values().flat_map(IndexMap::values)
    }

    /// Nodes with an edge into the given node, in insertion order
    pub fn predecessors(&self, id: &NodeId) -> Vec<&NodeId> {
        self.incoming
            .get(id)
            .map(|sources| sources.iter().collect())
            .unwrap_or_default()
    }

    /// Rebuild the per-kind entity index by scanning node identities
    ///
    /// The index is a derived cache, not part of the graph's serialized
    /// identity; snapshot restore calls this instead of trusting any
    /// persisted copy.
    pub fn rebuild_entity_index(&mut self) {
        self.entity_index.clear();
        for node in self.nodes.values() {
            self.entity_index
                .entry(node.kind())
                .or_default()
                .insert(node.name().to_string());
        }
    }

    /// Compute aggregate node/edge counts
    pub fn statistics(&self) -> GraphStatistics {
        let entities = EntityKind::ALL
            .iter()
            .map(|kind| {
                let count = self
                    .entity_index
                    .get(kind)
                    .map(IndexSet::len)
                    .unwrap_or(0);
                (*kind, count)
            })
            .collect();

        let mut per_relationship: FxHashMap<Relationship, usize> = FxHashMap::default();
        for edge in self.all_edges() {
            *per_relationship.entry(edge.relationship).or_default() += 1;
        }
        let relationships = Relationship::ALL
            .iter()
            .map(|r| (*r, per_relationship.get(r).copied().unwrap_or(0)))
            .collect();

        GraphStatistics {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            entities,
            relationships,
        }
    }

    /// Clear all data from the graph
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.outgoing.clear();
        self.incoming.clear();
        self.entity_index.clear();
    }
}

//! Structured queries over the churn knowledge graph
//!
//! Callers never see the internal representation; absence is uniformly an
//! empty result, never an error, so the consuming analysis layer has no
//! not-found path to handle.

use crate::graph::{ChurnGraph, EntityKind, NodeId, PropertyMap, Relationship};
use indexmap::IndexMap;

/// Number of reasons/competitors reported per segment aggregate
const TOP_PATTERN_LIMIT: usize = 5;

/// Aggregate churn profile of one segment
#[derive(Debug, Clone, PartialEq)]
pub struct ChurnPatterns {
    pub segment: String,
    pub customer_count: usize,
    /// Top reasons by frequency, descending; ties keep first-encountered
    /// order
    pub top_reasons: Vec<(String, usize)>,
    /// Top competitors by frequency, same ordering rules
    pub top_competitors: Vec<(String, usize)>,
    pub avg_tenure_years: f64,
    pub avg_arr_lost: f64,
    pub total_arr_lost: f64,
}

impl ChurnPatterns {
    /// Zeroed aggregate for a segment with no customers
    fn empty(segment: &str) -> Self {
        ChurnPatterns {
            segment: segment.to_string(),
            customer_count: 0,
            top_reasons: Vec::new(),
            top_competitors: Vec::new(),
            avg_tenure_years: 0.0,
            avg_arr_lost: 0.0,
            total_arr_lost: 0.0,
        }
    }
}

impl ChurnGraph {
    /// All entity identifiers of a kind, in first-encountered order
    pub fn entities_by_type(&self, kind: EntityKind) -> Vec<String> {
        self.entity_index
            .get(&kind)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Out-neighbors of a node with their edge properties, optionally
    /// filtered by relationship label
    ///
    /// Returns an empty list if the node is absent.
    pub fn neighbors(
        &self,
        id: &NodeId,
        relationship: Option<Relationship>,
    ) -> Vec<(&NodeId, &PropertyMap)> {
        self.outgoing
            .get(id)
            .map(|adjacency| {
                adjacency
                    .values()
                    .filter(|edge| relationship.map_or(true, |r| edge.relationship == r))
                    .map(|edge| (&edge.target, &edge.properties))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Customers that churned for the given reason text
    pub fn customers_by_reason(&self, reason: &str) -> Vec<String> {
        self.customers_pointing_at(&NodeId::reason(reason))
    }

    /// Customers that switched to the given competitor
    pub fn customers_by_competitor(&self, competitor: &str) -> Vec<String> {
        self.customers_pointing_at(&NodeId::competitor(competitor))
    }

    /// Customers belonging to the given segment
    pub fn customers_by_segment(&self, segment: &str) -> Vec<String> {
        self.customers_pointing_at(&NodeId::segment(segment))
    }

    /// Customers with an inbound edge to the target node
    ///
    /// "Customers for entity X" traverses predecessor edges into X; the
    /// graph is directed and customer edges always point outward.
    fn customers_pointing_at(&self, target: &NodeId) -> Vec<String> {
        self.predecessors(target)
            .into_iter()
            .filter(|id| id.kind() == EntityKind::Customer)
            .map(|id| id.name().to_string())
            .collect()
    }

    /// Aggregate churn patterns for one segment
    ///
    /// Walks every customer in the segment, accumulating reason and
    /// competitor frequencies plus tenure/ARR figures. Linear in the
    /// number of customers and their out-edges.
    pub fn churn_patterns(&self, segment: &str) -> ChurnPatterns {
        let customers = self.customers_by_segment(segment);
        if customers.is_empty() {
            return ChurnPatterns::empty(segment);
        }

        let mut reason_counts: IndexMap<String, usize> = IndexMap::new();
        let mut competitor_counts: IndexMap<String, usize> = IndexMap::new();
        let mut total_tenure = 0.0;
        let mut total_arr = 0.0;

        for customer in &customers {
            let id = NodeId::customer(customer.clone());

            if let Some(node) = self.get_node(&id) {
                total_tenure += node.float_property_or_zero("tenure_years");
                total_arr += node.float_property_or_zero("arr_lost");
            }

            for (target, _) in self.neighbors(&id, Some(Relationship::ChurnedDueTo)) {
                if target.kind() == EntityKind::ChurnReason {
                    *reason_counts.entry(target.name().to_string()).or_default() += 1;
                }
            }

            for (target, _) in self.neighbors(&id, Some(Relationship::SwitchedTo)) {
                if target.kind() == EntityKind::Competitor {
                    *competitor_counts
                        .entry(target.name().to_string())
                        .or_default() += 1;
                }
            }
        }

        let count = customers.len();
        ChurnPatterns {
            segment: segment.to_string(),
            customer_count: count,
            top_reasons: top_n(reason_counts, TOP_PATTERN_LIMIT),
            top_competitors: top_n(competitor_counts, TOP_PATTERN_LIMIT),
            avg_tenure_years: total_tenure / count as f64,
            avg_arr_lost: total_arr / count as f64,
            total_arr_lost: total_arr,
        }
    }
}

/// Most frequent entries, descending by count
///
/// The stable sort keeps insertion (first-encountered) order for equal
/// counts.
fn top_n(counts: IndexMap<String, usize>, limit: usize) -> Vec<(String, usize)> {
    let mut entries: Vec<(String, usize)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.truncate(limit);
    entries
}

//! Graph construction from churned-customer records
//!
//! Five entity-extraction passes followed by one relationship pass.
//! Construction is a single synchronous walk over a fully materialized
//! record batch; there is no incremental ingestion.

use super::edge::Edge;
use super::node::Node;
use super::property::{PropertyMap, PropertyValue};
use super::store::ChurnGraph;
use super::types::{EntityKind, NodeId, ReasonKind, Relationship};
use crate::dataset::{clean_field, parse_arr, split_products, ChurnRecord};
use tracing::{debug, info};

impl ChurnGraph {
    /// Build a graph from a batch of records
    pub fn from_records(records: &[ChurnRecord]) -> Self {
        let mut graph = ChurnGraph::new();
        graph.build_from_records(records);
        graph
    }

    /// Populate this graph from churned-customer records
    ///
    /// Fail-soft per row: malformed ARR coerces to 0.0 and missing or
    /// sentinel optional fields skip only the corresponding entity/edge.
    /// A record with an empty account name violates the caller contract —
    /// the account name is the join key for every downstream query — and
    /// is not handled gracefully.
    pub fn build_from_records(&mut self, records: &[ChurnRecord]) {
        info!("building knowledge graph from {} customer records", records.len());

        self.extract_customers(records);
        self.extract_segments(records);
        self.extract_churn_reasons(records);
        self.extract_competitors(records);
        self.extract_products(records);

        self.build_relationships(records);

        info!("knowledge graph statistics:\n{}", self.statistics());
    }

    fn extract_customers(&mut self, records: &[ChurnRecord]) {
        for record in records {
            let mut properties = PropertyMap::new();
            properties.insert(
                "segment".to_string(),
                string_or_null(record.segment.as_deref()),
            );
            properties.insert(
                "tenure_years".to_string(),
                PropertyValue::Float(record.tenure_years.filter(|t| t.is_finite()).unwrap_or(0.0)),
            );
            properties.insert(
                "arr_lost".to_string(),
                PropertyValue::Float(parse_arr(record.amount.as_ref())),
            );
            properties.insert(
                "churn_date".to_string(),
                string_or_null(record.churn_date.as_deref()),
            );
            properties.insert(
                "first_win_date".to_string(),
                string_or_null(record.first_win_date.as_deref()),
            );
            properties.insert(
                "products".to_string(),
                PropertyValue::String(record.products.clone().unwrap_or_default()),
            );
            properties.insert(
                "churn_narrative".to_string(),
                PropertyValue::String(record.churn_narrative.clone().unwrap_or_default()),
            );

            self.upsert_node(Node::new_with_properties(
                NodeId::customer(record.account_name.clone()),
                properties,
            ));
        }

        info!("extracted {} customers", self.count_of(EntityKind::Customer));
    }

    fn extract_segments(&mut self, records: &[ChurnRecord]) {
        for record in records {
            if let Some(segment) = clean_field(record.segment.as_ref()) {
                self.upsert_node(named_node(NodeId::segment(segment), segment));
            }
        }

        info!("extracted {} segments", self.count_of(EntityKind::Segment));
    }

    fn extract_churn_reasons(&mut self, records: &[ChurnRecord]) {
        for record in records {
            if let Some(reason) = clean_field(record.primary_reason.as_ref()) {
                self.upsert_node(reason_node(reason, ReasonKind::Primary));
            }
        }

        // Sub-reasons after primaries; a sub-reason whose text matches a
        // primary reason merges onto the same node (reason nodes are keyed
        // by text alone) and its reason_kind takes the last write.
        for record in records {
            if let Some(sub_reason) = clean_field(record.sub_reason.as_ref()) {
                self.upsert_node(reason_node(sub_reason, ReasonKind::Sub));
            }
        }

        info!(
            "extracted {} churn reasons",
            self.count_of(EntityKind::ChurnReason)
        );
    }

    fn extract_competitors(&mut self, records: &[ChurnRecord]) {
        for record in records {
            for competitor in [record.competitor_1.as_ref(), record.competitor_2.as_ref()] {
                if let Some(name) = clean_field(competitor) {
                    self.upsert_node(named_node(NodeId::competitor(name), name));
                }
            }
        }

        info!(
            "extracted {} competitors",
            self.count_of(EntityKind::Competitor)
        );
    }

    fn extract_products(&mut self, records: &[ChurnRecord]) {
        for record in records {
            let Some(raw) = record.products.as_deref() else {
                continue;
            };
            for product in split_products(raw) {
                self.upsert_node(named_node(NodeId::product(product.clone()), &product));
            }
        }

        info!("extracted {} products", self.count_of(EntityKind::Product));
    }

    fn build_relationships(&mut self, records: &[ChurnRecord]) {
        let mut relationship_count = 0usize;

        for record in records {
            let customer = NodeId::customer(record.account_name.clone());

            if let Some(segment) = clean_field(record.segment.as_ref()) {
                relationship_count += self.link(Edge::new(
                    customer.clone(),
                    NodeId::segment(segment),
                    Relationship::BelongsTo,
                ));
            }

            if let Some(reason) = clean_field(record.primary_reason.as_ref()) {
                let mut edge = Edge::new(
                    customer.clone(),
                    NodeId::reason(reason),
                    Relationship::ChurnedDueTo,
                );
                if let Some(churn_date) = record.churn_date.as_deref() {
                    edge.set_property("churn_date", churn_date);
                }
                relationship_count += self.link(edge);
            }

            if let Some(sub_reason) = clean_field(record.sub_reason.as_ref()) {
                relationship_count += self.link(Edge::new(
                    customer.clone(),
                    NodeId::reason(sub_reason),
                    Relationship::ChurnedDueTo,
                ));
            }

            for competitor in [record.competitor_1.as_ref(), record.competitor_2.as_ref()] {
                if let Some(name) = clean_field(competitor) {
                    relationship_count += self.link(Edge::new(
                        customer.clone(),
                        NodeId::competitor(name),
                        Relationship::SwitchedTo,
                    ));
                }
            }

            if let Some(raw) = record.products.as_deref() {
                for product in split_products(raw) {
                    relationship_count += self.link(Edge::new(
                        customer.clone(),
                        NodeId::product(product),
                        Relationship::UsedProduct,
                    ));
                }
            }
        }

        info!("built {} relationships", relationship_count);
    }

    /// Insert an edge, logging and swallowing failures
    ///
    /// One bad record must never prevent the rest of the dataset from
    /// loading; edge failures are row-scoped.
    fn link(&mut self, edge: Edge) -> usize {
        match self.add_edge(edge) {
            Ok(()) => 1,
            Err(err) => {
                debug!("skipping relationship: {}", err);
                0
            }
        }
    }

    fn count_of(&self, kind: EntityKind) -> usize {
        self.entity_index.get(&kind).map(|set| set.len()).unwrap_or(0)
    }
}

fn string_or_null(value: Option<&str>) -> PropertyValue {
    match value {
        Some(s) => PropertyValue::String(s.to_string()),
        None => PropertyValue::Null,
    }
}

fn named_node(id: NodeId, name: &str) -> Node {
    let mut properties = PropertyMap::new();
    properties.insert("name".to_string(), PropertyValue::String(name.to_string()));
    Node::new_with_properties(id, properties)
}

fn reason_node(text: &str, kind: ReasonKind) -> Node {
    let mut properties = PropertyMap::new();
    properties.insert("name".to_string(), PropertyValue::String(text.to_string()));
    properties.insert(
        "reason_kind".to_string(),
        PropertyValue::String(kind.as_str().to_string()),
    );
    Node::new_with_properties(NodeId::reason(text), properties)
}

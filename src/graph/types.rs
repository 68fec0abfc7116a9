//! Core type definitions for the churn knowledge graph

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of entity a node represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub enum EntityKind {
    Customer,
    Segment,
    ChurnReason,
    Competitor,
    Product,
}

impl EntityKind {
    /// All entity kinds, in the order extraction passes run
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Customer,
        EntityKind::Segment,
        EntityKind::ChurnReason,
        EntityKind::Competitor,
        EntityKind::Product,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Customer => "Customer",
            EntityKind::Segment => "Segment",
            EntityKind::ChurnReason => "ChurnReason",
            EntityKind::Competitor => "Competitor",
            EntityKind::Product => "Product",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Node identity: entity kind plus textual identifier
///
/// A tagged variant rather than a prefixed string in a flat namespace, so
/// a segment named "Pricing" and a churn reason named "Pricing" can never
/// collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub enum NodeId {
    /// Keyed by account name
    Customer(String),
    /// Keyed by segment name
    Segment(String),
    /// Keyed by reason text (primary and sub reasons share this namespace)
    Reason(String),
    /// Keyed by competitor name
    Competitor(String),
    /// Keyed by product name
    Product(String),
}

impl NodeId {
    pub fn customer(name: impl Into<String>) -> Self {
        NodeId::Customer(name.into())
    }

    pub fn segment(name: impl Into<String>) -> Self {
        NodeId::Segment(name.into())
    }

    pub fn reason(text: impl Into<String>) -> Self {
        NodeId::Reason(text.into())
    }

    pub fn competitor(name: impl Into<String>) -> Self {
        NodeId::Competitor(name.into())
    }

    pub fn product(name: impl Into<String>) -> Self {
        NodeId::Product(name.into())
    }

    /// Entity kind this identifier belongs to
    pub fn kind(&self) -> EntityKind {
        match self {
            NodeId::Customer(_) => EntityKind::Customer,
            NodeId::Segment(_) => EntityKind::Segment,
            NodeId::Reason(_) => EntityKind::ChurnReason,
            NodeId::Competitor(_) => EntityKind::Competitor,
            NodeId::Product(_) => EntityKind::Product,
        }
    }

    /// Textual identifier without the kind tag
    pub fn name(&self) -> &str {
        match self {
            NodeId::Customer(s)
            | NodeId::Segment(s)
            | NodeId::Reason(s)
            | NodeId::Competitor(s)
            | NodeId::Product(s) => s,
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind(), self.name())
    }
}

/// Relationship label on a directed edge (always Customer -> entity)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub enum Relationship {
    /// Customer -> Segment, exactly one per customer
    BelongsTo,
    /// Customer -> ChurnReason, one primary plus optionally one sub
    ChurnedDueTo,
    /// Customer -> Competitor, zero to two
    SwitchedTo,
    /// Customer -> Product, zero or more
    UsedProduct,
}

impl Relationship {
    pub const ALL: [Relationship; 4] = [
        Relationship::BelongsTo,
        Relationship::ChurnedDueTo,
        Relationship::SwitchedTo,
        Relationship::UsedProduct,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Relationship::BelongsTo => "BELONGS_TO",
            Relationship::ChurnedDueTo => "CHURNED_DUE_TO",
            Relationship::SwitchedTo => "SWITCHED_TO",
            Relationship::UsedProduct => "USED_PRODUCT",
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Distinguishes top-level churn reasons from sub-reasons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReasonKind {
    Primary,
    Sub,
}

impl ReasonKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonKind::Primary => "primary",
            ReasonKind::Sub => "sub",
        }
    }
}

impl fmt::Display for ReasonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

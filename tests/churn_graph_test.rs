//! End-to-end test: dataset loading, graph construction, and queries

use churngraph::dataset::ChurnRecord;
use churngraph::{ChurnGraph, EntityKind, NodeId, Relationship};
use std::io::Write;

fn dataset() -> Vec<ChurnRecord> {
    vec![
        ChurnRecord::new("CustomerA")
            .with_segment("Commercial")
            .with_tenure_years(2.0)
            .with_amount_text("$10,000.00")
            .with_churn_date("2024-03-31")
            .with_first_win_date("2022-03-31")
            .with_primary_reason("Pricing")
            .with_sub_reason("Renewal cost increase")
            .with_competitor_1("RivalSoft")
            .with_products("Analytics Suite, Alerts"),
        ChurnRecord::new("CustomerB")
            .with_segment("Commercial")
            .with_tenure_years(4.0)
            .with_amount_text("$5,000")
            .with_primary_reason("Support")
            .with_competitor_1("None mentioned")
            .with_products("Analytics Suite"),
        ChurnRecord::new("CustomerC")
            .with_segment("Enterprise")
            .with_tenure_years(6.0)
            .with_amount_text("$50,000")
            .with_primary_reason("Pricing")
            .with_sub_reason("N/A")
            .with_competitor_1("RivalSoft")
            .with_competitor_2("CheapCo"),
    ]
}

#[test]
fn test_build_and_query_end_to_end() {
    let graph = ChurnGraph::from_records(&dataset());

    // Three rows, two distinct segment values -> two segment nodes
    let stats = graph.statistics();
    assert_eq!(stats.entity_count(EntityKind::Customer), 3);
    assert_eq!(stats.entity_count(EntityKind::Segment), 2);
    assert_eq!(stats.entity_count(EntityKind::Competitor), 2);
    assert_eq!(stats.entity_count(EntityKind::Product), 2);

    // Every customer with a segment has exactly one BELONGS_TO edge
    assert_eq!(stats.relationship_count(Relationship::BelongsTo), 3);
    for customer in graph.entities_by_type(EntityKind::Customer) {
        let segments = graph.neighbors(
            &NodeId::customer(customer),
            Some(Relationship::BelongsTo),
        );
        assert_eq!(segments.len(), 1);
    }

    // "None mentioned" never became a node or an edge
    assert!(!graph.has_node(&NodeId::competitor("None mentioned")));
    assert!(graph
        .neighbors(
            &NodeId::customer("CustomerB"),
            Some(Relationship::SwitchedTo)
        )
        .is_empty());

    // Segment query matches the rows, and the reverse traversal agrees
    let commercial = graph.customers_by_segment("Commercial");
    assert_eq!(commercial, vec!["CustomerA", "CustomerB"]);
    for customer in &commercial {
        let neighbors = graph.neighbors(
            &NodeId::customer(customer.clone()),
            Some(Relationship::BelongsTo),
        );
        assert_eq!(neighbors[0].0, &NodeId::segment("Commercial"));
    }

    // Reason and competitor lookups traverse predecessor edges
    assert_eq!(
        graph.customers_by_reason("Pricing"),
        vec!["CustomerA", "CustomerC"]
    );
    assert_eq!(
        graph.customers_by_competitor("RivalSoft"),
        vec!["CustomerA", "CustomerC"]
    );
    assert_eq!(graph.customers_by_competitor("CheapCo"), vec!["CustomerC"]);
}

#[test]
fn test_commercial_churn_patterns() {
    let graph = ChurnGraph::from_records(&dataset());
    let patterns = graph.churn_patterns("Commercial");

    assert_eq!(patterns.customer_count, 2);
    assert_eq!(patterns.avg_arr_lost, 7_500.0);
    assert_eq!(patterns.avg_tenure_years, 3.0);
    assert_eq!(patterns.total_arr_lost, 15_000.0);

    // Each reason seen once: Pricing, the sub-reason, and Support
    let reasons: Vec<&str> = patterns.top_reasons.iter().map(|(r, _)| r.as_str()).collect();
    assert!(reasons.contains(&"Pricing"));
    assert!(reasons.contains(&"Support"));
    assert!(patterns.top_reasons.iter().all(|(_, count)| *count == 1));

    assert_eq!(patterns.top_competitors, vec![("RivalSoft".to_string(), 1)]);
}

#[test]
fn test_unknown_segment_patterns_are_zeroed() {
    let graph = ChurnGraph::from_records(&dataset());
    let patterns = graph.churn_patterns("NoSuchSegment");

    assert_eq!(patterns.customer_count, 0);
    assert_eq!(patterns.avg_tenure_years, 0.0);
    assert_eq!(patterns.avg_arr_lost, 0.0);
    assert!(patterns.top_reasons.is_empty());
}

#[test]
fn test_load_jsonl_and_build() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"{{"Account Name": "Acme Corp", "Account Segment": "SMB", "Amount": "$1,200.50", "Primary Outcome Reason": "Pricing"}}"#
    )
    .unwrap();
    writeln!(
        file,
        r#"{{"account_name": "Beta LLC", "segment": "SMB", "amount": 800, "primary_reason": "Support"}}"#
    )
    .unwrap();

    let records = churngraph::load_records(file.path()).unwrap();
    assert_eq!(records.len(), 2);

    let graph = ChurnGraph::from_records(&records);
    assert_eq!(
        graph.customers_by_segment("SMB"),
        vec!["Acme Corp", "Beta LLC"]
    );

    let patterns = graph.churn_patterns("SMB");
    assert_eq!(patterns.customer_count, 2);
    assert_eq!(patterns.total_arr_lost, 2_000.5);
}

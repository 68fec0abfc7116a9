//! Snapshot persistence for the churn knowledge graph
//!
//! The graph is rebuilt from source data rarely and read often, so the
//! built structure is dumped to disk as an opaque blob: bincode-encoded,
//! gzip-compressed. The format is private to this crate.

use crate::graph::{ChurnGraph, Edge, Node};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Snapshot errors
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Encoding(#[from] bincode::Error),

    #[error("snapshot is corrupt: {0}")]
    Corrupt(String),
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// On-disk layout: the full node and edge set
///
/// The per-kind entity index is deliberately absent; it is a derived cache
/// and is rebuilt from node identities on load rather than trusted from
/// disk.
#[derive(Serialize, Deserialize)]
struct Snapshot {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl ChurnGraph {
    /// Write the graph to a snapshot file
    pub fn save_snapshot(&self, path: impl AsRef<Path>) -> SnapshotResult<()> {
        let path = path.as_ref();
        let snapshot = Snapshot {
            nodes: self.all_nodes().cloned().collect(),
            edges: self.all_edges().cloned().collect(),
        };

        let file = File::create(path)?;
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
        bincode::serialize_into(&mut encoder, &snapshot)?;
        // Drain both layers explicitly so a failed flush surfaces as an
        // error instead of disappearing in Drop.
        encoder
            .finish()?
            .into_inner()
            .map_err(|err| err.into_error())?;

        info!(
            "saved snapshot to {} ({} nodes, {} edges)",
            path.display(),
            snapshot.nodes.len(),
            snapshot.edges.len()
        );
        Ok(())
    }

    /// Restore a graph from a snapshot file
    ///
    /// Nodes are inserted first, then edges; the entity-type index is
    /// rebuilt by scanning the restored nodes.
    pub fn load_snapshot(path: impl AsRef<Path>) -> SnapshotResult<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let decoder = GzDecoder::new(BufReader::new(file));
        let snapshot: Snapshot = bincode::deserialize_from(decoder)?;

        let mut graph = ChurnGraph::new();
        for node in snapshot.nodes {
            graph.upsert_node(node);
        }
        for edge in snapshot.edges {
            graph
                .add_edge(edge)
                .map_err(|err| SnapshotError::Corrupt(err.to_string()))?;
        }
        graph.rebuild_entity_index();

        info!(
            "loaded snapshot from {} ({} nodes, {} edges)",
            path.display(),
            graph.node_count(),
            graph.edge_count()
        );
        Ok(graph)
    }
}

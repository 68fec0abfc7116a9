use anyhow::{bail, Context, Result};
use churngraph::{ChurnGraph, EntityKind};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "churngraph", version, about = "Churn knowledge graph CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a graph from a churn dataset and optionally save a snapshot
    Build {
        /// Dataset file (JSON array or JSON Lines of churn records)
        #[arg(long)]
        input: PathBuf,

        /// Where to write the graph snapshot
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },

    /// Print entity and relationship counts for a snapshot
    Stats {
        #[arg(long)]
        snapshot: PathBuf,
    },

    /// List customers by segment, churn reason, or competitor
    Customers {
        #[arg(long)]
        snapshot: PathBuf,

        #[arg(long)]
        segment: Option<String>,

        #[arg(long)]
        reason: Option<String>,

        #[arg(long)]
        competitor: Option<String>,
    },

    /// Print the aggregate churn patterns of a segment
    Patterns {
        #[arg(long)]
        snapshot: PathBuf,

        #[arg(long)]
        segment: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Build { input, snapshot } => build(input, snapshot),
        Command::Stats { snapshot } => stats(snapshot),
        Command::Customers {
            snapshot,
            segment,
            reason,
            competitor,
        } => customers(snapshot, segment, reason, competitor),
        Command::Patterns { snapshot, segment } => patterns(snapshot, segment),
    }
}

fn build(input: PathBuf, snapshot: Option<PathBuf>) -> Result<()> {
    let records = churngraph::load_records(&input)
        .with_context(|| format!("failed to load records from {}", input.display()))?;

    let graph = ChurnGraph::from_records(&records);
    print!("{}", graph.statistics());

    if let Some(path) = snapshot {
        graph
            .save_snapshot(&path)
            .with_context(|| format!("failed to save snapshot to {}", path.display()))?;
        println!("snapshot written to {}", path.display());
    }

    Ok(())
}

fn stats(snapshot: PathBuf) -> Result<()> {
    let graph = load(&snapshot)?;
    print!("{}", graph.statistics());
    Ok(())
}

fn customers(
    snapshot: PathBuf,
    segment: Option<String>,
    reason: Option<String>,
    competitor: Option<String>,
) -> Result<()> {
    let graph = load(&snapshot)?;

    let customers = match (segment, reason, competitor) {
        (Some(segment), None, None) => graph.customers_by_segment(&segment),
        (None, Some(reason), None) => graph.customers_by_reason(&reason),
        (None, None, Some(competitor)) => graph.customers_by_competitor(&competitor),
        _ => bail!("specify exactly one of --segment, --reason, --competitor"),
    };

    for customer in &customers {
        println!("{}", customer);
    }
    println!("({} customers)", customers.len());
    Ok(())
}

fn patterns(snapshot: PathBuf, segment: String) -> Result<()> {
    let graph = load(&snapshot)?;

    let known = graph.entities_by_type(EntityKind::Segment);
    if !known.iter().any(|s| s == &segment) {
        println!(
            "segment {:?} not found (known segments: {})",
            segment,
            known.join(", ")
        );
    }

    let patterns = graph.churn_patterns(&segment);
    println!("segment: {}", patterns.segment);
    println!("customers: {}", patterns.customer_count);
    println!("avg tenure: {:.2} years", patterns.avg_tenure_years);
    println!("avg ARR lost: ${:.2}", patterns.avg_arr_lost);
    println!("total ARR lost: ${:.2}", patterns.total_arr_lost);

    println!("top reasons:");
    for (reason, count) in &patterns.top_reasons {
        println!("  {} ({})", reason, count);
    }
    println!("top competitors:");
    for (competitor, count) in &patterns.top_competitors {
        println!("  {} ({})", competitor, count);
    }
    Ok(())
}

fn load(snapshot: &Path) -> Result<ChurnGraph> {
    ChurnGraph::load_snapshot(snapshot)
        .with_context(|| format!("failed to load snapshot from {}", snapshot.display()))
}

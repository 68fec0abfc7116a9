//! Row abstraction and field cleaning for churned-customer records
//!
//! The graph consumes [`ChurnRecord`]s with named fields; binding those
//! fields to a concrete file layout is the loader's concern. Serde aliases
//! accept both snake_case keys and the column headers of the original CRM
//! export ("Account Name", "Tenure (years)", ...).

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Errors raised while loading a dataset file
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type DatasetResult<T> = Result<T, DatasetError>;

/// Placeholder values that never become nodes or edges
///
/// Exact match after whitespace trim; the empty string is covered by the
/// trim itself.
const SENTINELS: [&str; 3] = ["N/A", "None", "None mentioned"];

/// Check whether a field value is a placeholder rather than real data
pub fn is_sentinel(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || SENTINELS.contains(&trimmed)
}

/// Trim an optional field and drop sentinels
pub fn clean_field(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !is_sentinel(s))
}

/// Split a delimited product-list field into cleaned product names
///
/// Splits on comma and semicolon, trims each token, and drops sentinels.
pub fn split_products(raw: &str) -> Vec<String> {
    raw.split([',', ';'])
        .map(str::trim)
        .filter(|token| !is_sentinel(token))
        .map(str::to_string)
        .collect()
}

/// Lost-ARR field: either numeric or a currency-formatted string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
}

impl Amount {
    /// Coerce to a float, stripping currency formatting
    ///
    /// Fail-soft: malformed text and non-finite numbers become 0.0 rather
    /// than an error.
    pub fn as_arr(&self) -> f64 {
        match self {
            Amount::Number(n) if n.is_finite() => *n,
            Amount::Number(_) => 0.0,
            Amount::Text(raw) => raw
                .trim()
                .replace(['$', ','], "")
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .unwrap_or(0.0),
        }
    }
}

/// Parse an optional ARR field, treating missing values as 0.0
pub fn parse_arr(amount: Option<&Amount>) -> f64 {
    amount.map(Amount::as_arr).unwrap_or(0.0)
}

/// One churned-customer record
///
/// `account_name` is the customer's join key and must be non-empty; every
/// downstream query hangs off it. All other fields are optional and
/// fail-soft during graph construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChurnRecord {
    #[serde(alias = "Account Name")]
    pub account_name: String,

    #[serde(default, alias = "Account Segment")]
    pub segment: Option<String>,

    #[serde(default, alias = "Tenure (years)")]
    pub tenure_years: Option<f64>,

    #[serde(default, alias = "Amount")]
    pub amount: Option<Amount>,

    #[serde(default, alias = "Close Date")]
    pub churn_date: Option<String>,

    #[serde(default, alias = "First Win Date")]
    pub first_win_date: Option<String>,

    #[serde(default, alias = "Products (Rollup)")]
    pub products: Option<String>,

    #[serde(default, alias = "Primary Outcome Reason")]
    pub primary_reason: Option<String>,

    #[serde(default, alias = "Outcome Sub Reason")]
    pub sub_reason: Option<String>,

    #[serde(default, alias = "Competitor 1")]
    pub competitor_1: Option<String>,

    #[serde(default, alias = "Competitor 2")]
    pub competitor_2: Option<String>,

    #[serde(default, alias = "Lost Opportunity Details")]
    pub churn_narrative: Option<String>,
}

impl ChurnRecord {
    /// Create a record with only the account name set
    pub fn new(account_name: impl Into<String>) -> Self {
        ChurnRecord {
            account_name: account_name.into(),
            segment: None,
            tenure_years: None,
            amount: None,
            churn_date: None,
            first_win_date: None,
            products: None,
            primary_reason: None,
            sub_reason: None,
            competitor_1: None,
            competitor_2: None,
            churn_narrative: None,
        }
    }

    pub fn with_segment(mut self, segment: impl Into<String>) -> Self {
        self.segment = Some(segment.into());
        self
    }

    pub fn with_tenure_years(mut self, tenure: f64) -> Self {
        self.tenure_years = Some(tenure);
        self
    }

    pub fn with_amount(mut self, arr: f64) -> Self {
        self.amount = Some(Amount::Number(arr));
        self
    }

    pub fn with_amount_text(mut self, raw: impl Into<String>) -> Self {
        self.amount = Some(Amount::Text(raw.into()));
        self
    }

    pub fn with_churn_date(mut self, date: impl Into<String>) -> Self {
        self.churn_date = Some(date.into());
        self
    }

    pub fn with_first_win_date(mut self, date: impl Into<String>) -> Self {
        self.first_win_date = Some(date.into());
        self
    }

    pub fn with_products(mut self, products: impl Into<String>) -> Self {
        self.products = Some(products.into());
        self
    }

    pub fn with_primary_reason(mut self, reason: impl Into<String>) -> Self {
        self.primary_reason = Some(reason.into());
        self
    }

    pub fn with_sub_reason(mut self, reason: impl Into<String>) -> Self {
        self.sub_reason = Some(reason.into());
        self
    }

    pub fn with_competitor_1(mut self, competitor: impl Into<String>) -> Self {
        self.competitor_1 = Some(competitor.into());
        self
    }

    pub fn with_competitor_2(mut self, competitor: impl Into<String>) -> Self {
        self.competitor_2 = Some(competitor.into());
        self
    }

    pub fn with_churn_narrative(mut self, narrative: impl Into<String>) -> Self {
        self.churn_narrative = Some(narrative.into());
        self
    }
}

/// Load churn records from a JSON array file or a JSON Lines file
///
/// Content starting with `[` is parsed as one array; anything else is
/// treated as one record per non-blank line.
pub fn load_records(path: impl AsRef<Path>) -> DatasetResult<Vec<ChurnRecord>> {
    let path = path.as_ref();
    let mut reader = BufReader::new(File::open(path)?);

    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;

    let records = if contents.trim_start().starts_with('[') {
        serde_json::from_str::<Vec<ChurnRecord>>(&contents)?
    } else {
        let mut records = Vec::new();
        for line in contents.lines() {
            if line.trim().is_empty() {
                continue;
            }
            records.push(serde_json::from_str::<ChurnRecord>(line)?);
        }
        records
    };

    info!("loaded {} churn records from {}", records.len(), path.display());
    Ok(records)
}

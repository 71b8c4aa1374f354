//! Retrieval of the raw crime table.
//!
//! The source is either comma-delimited text or a JSON array of flat objects;
//! [`SourceFormat::detect`] picks one from the location's suffix. Both forms
//! come back as [`RawRecord`]s so the normalizer never sees the difference.

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{PipelineError, Result};
use crate::models::RawRecord;
use crate::parser::parse_csv;

const USER_AGENT: &str = concat!("crime-rank/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Json,
}

impl SourceFormat {
    /// `.json` locations are pre-structured; anything else is CSV. Query
    /// strings and fragments are ignored.
    pub fn detect(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        if path.to_ascii_lowercase().ends_with(".json") {
            SourceFormat::Json
        } else {
            SourceFormat::Csv
        }
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFormat::Csv => write!(f, "csv"),
            SourceFormat::Json => write!(f, "json"),
        }
    }
}

pub fn build_client() -> Result<Client> {
    Ok(Client::builder().user_agent(USER_AGENT).build()?)
}

/// Fetch the source document and turn it into raw records.
///
/// A non-success status is fatal; there is no retry.
pub async fn fetch_records(client: &Client, url: &str) -> Result<Vec<RawRecord>> {
    let format = SourceFormat::detect(url);
    info!(%format, "fetching source");

    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(PipelineError::Fetch {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("").to_string(),
        });
    }

    let body = response.text().await?;
    debug!(bytes = body.len(), "source downloaded");

    match format {
        SourceFormat::Csv => parse_csv(&body),
        SourceFormat::Json => parse_json(&body),
    }
}

/// Parse a JSON array of objects into raw records.
///
/// Strings pass through trimmed, numbers and booleans use their JSON text and
/// `null` is treated as an absent column. Non-object items are skipped.
pub fn parse_json(body: &str) -> Result<Vec<RawRecord>> {
    let data: Value =
        serde_json::from_str(body).map_err(|e| PipelineError::Decode(e.to_string()))?;
    let Value::Array(items) = data else {
        return Err(PipelineError::Decode(
            "expected a JSON array of rows".to_string(),
        ));
    };

    let records: Vec<RawRecord> = items
        .iter()
        .filter_map(Value::as_object)
        .map(|obj| {
            obj.iter()
                .filter_map(|(column, value)| {
                    let raw = match value {
                        Value::String(s) => s.trim().to_string(),
                        Value::Number(n) => n.to_string(),
                        Value::Bool(b) => b.to_string(),
                        Value::Null | Value::Array(_) | Value::Object(_) => return None,
                    };
                    Some((column.trim(), raw))
                })
                .collect::<RawRecord>()
        })
        // all-null objects carry no columns at all
        .filter(|record| !record.is_empty())
        .collect();

    if records.is_empty() {
        return Err(PipelineError::EmptyInput(
            "JSON source has no row objects".to_string(),
        ));
    }

    Ok(records)
}

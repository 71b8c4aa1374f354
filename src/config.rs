use chrono::Utc;

use crate::error::{PipelineError, Result};

/// Environment variables naming the data source, in lookup order.
pub const SOURCE_ENV_VARS: [&str; 2] = ["SHEET_CSV_URL", "SOURCE_URL"];

/// Everything a run needs that does not come from the source itself.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Location of the crime table.
    pub source_url: String,
    /// Run date as `YYYY-MM-DD`, used for `generatedAt` and missing `lastUpdated`.
    pub today: String,
}

/// Load the run configuration from the process environment.
pub fn load_config() -> Result<RunConfig> {
    let source_url = resolve_source(|name| std::env::var(name).ok())?;
    Ok(RunConfig {
        source_url,
        today: Utc::now().date_naive().format("%Y-%m-%d").to_string(),
    })
}

/// Pick the first non-blank source variable via `lookup`.
pub fn resolve_source<F>(lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    SOURCE_ENV_VARS
        .iter()
        .filter_map(|name| lookup(*name))
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
        .ok_or_else(|| PipelineError::Configuration(SOURCE_ENV_VARS.join(" or ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_primary_variable_wins() {
        let vars = env(&[("SHEET_CSV_URL", "https://a.test/x.csv"), ("SOURCE_URL", "https://b.test")]);
        let url = resolve_source(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(url, "https://a.test/x.csv");
    }

    #[test]
    fn test_fallback_variable() {
        let vars = env(&[("SHEET_CSV_URL", "   "), ("SOURCE_URL", " https://b.test/rows.json ")]);
        let url = resolve_source(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(url, "https://b.test/rows.json");
    }

    #[test]
    fn test_missing_source() {
        let err = resolve_source(|_| None).unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(_)));
        assert!(err.to_string().contains("SHEET_CSV_URL"));
    }
}

use std::collections::BTreeMap;

/// One input row: column name → trimmed raw value.
///
/// Produced by the row parser (or the JSON source) and consumed immediately by
/// the normalizer. A later column with the same name replaces an earlier one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: BTreeMap<String, String>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(column.into(), value.into());
    }

    /// Exact column-name lookup.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Case-insensitive column-name lookup. Columns are scanned in sorted
    /// order, so the first match is deterministic.
    pub fn get_ignore_case(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(column))
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = RawRecord::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

/// A validated city record. Derived fields stay `None` until the scorer and
/// ranker fill them in.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalEntity {
    pub key: String,
    pub city: String,
    pub state: String,
    pub violent_crime: f64,
    pub property_crime: f64,
    pub population: Option<f64>,
    pub police_response_time: Option<f64>,
    pub police_resources: Option<f64>,
    pub safety_index: Option<f64>,
    pub trend: String,
    pub last_updated: String,
    pub note: String,
    pub risk_score: Option<f64>,
    pub rank: Option<usize>,
    pub rank_out_of: Option<usize>,
}

impl CanonicalEntity {
    /// Builds the identity key shared by the artifact map and every `_meta` list.
    pub fn make_key(city: &str, state: &str) -> String {
        format!("{}, {}", city, state)
    }
}

/// Canonical columns the normalizer knows how to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    City,
    State,
    ViolentCrime,
    PropertyCrime,
    Population,
    PoliceResponseTime,
    PoliceResources,
    SafetyIndex,
    Trend,
    LastUpdated,
    Note,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::City => write!(f, "city"),
            Field::State => write!(f, "state"),
            Field::ViolentCrime => write!(f, "violentCrime"),
            Field::PropertyCrime => write!(f, "propertyCrime"),
            Field::Population => write!(f, "population"),
            Field::PoliceResponseTime => write!(f, "policeResponseTime"),
            Field::PoliceResources => write!(f, "policeResources"),
            Field::SafetyIndex => write!(f, "safetyIndex"),
            Field::Trend => write!(f, "trend"),
            Field::LastUpdated => write!(f, "lastUpdated"),
            Field::Note => write!(f, "note"),
        }
    }
}

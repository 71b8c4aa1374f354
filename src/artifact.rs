use std::fs;
use std::path::{Path, PathBuf};

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::{PipelineError, Result};
use crate::models::CanonicalEntity;
use crate::ranker::{RankingEntry, RankingSummary};

/// Artifact location relative to the site root.
pub const ARTIFACT_PATH: &str = "public/data/crime.json";
/// Key of the metadata entry, alongside the per-city entries.
pub const META_KEY: &str = "_meta";

/// The persisted document: one entry per city keyed by `"{city}, {state}"`,
/// in rank order, then `_meta`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactDocument {
    pub entities: Vec<CanonicalEntity>,
    pub meta: Meta,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub generated_at: String,
    pub total_cities: usize,
    pub ranking: Vec<RankingEntry>,
    pub top_most_at_risk: Vec<String>,
    pub top_safest: Vec<String>,
}

/// Public view of one city, in the field order the site expects.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EntityView<'a> {
    city: &'a str,
    state: &'a str,
    #[serde(serialize_with = "serialize_number")]
    violent_crime: f64,
    #[serde(serialize_with = "serialize_number")]
    property_crime: f64,
    trend: &'a str,
    last_updated: &'a str,
    #[serde(serialize_with = "serialize_opt_number")]
    safety_index: Option<f64>,
    #[serde(serialize_with = "serialize_opt_number")]
    police_response_time: Option<f64>,
    #[serde(serialize_with = "serialize_opt_number")]
    police_resources: Option<f64>,
    #[serde(serialize_with = "serialize_opt_number")]
    population: Option<f64>,
    note: &'a str,
    #[serde(serialize_with = "serialize_opt_number")]
    risk_score: Option<f64>,
    rank: Option<usize>,
    rank_out_of: Option<usize>,
}

impl<'a> From<&'a CanonicalEntity> for EntityView<'a> {
    fn from(e: &'a CanonicalEntity) -> Self {
        EntityView {
            city: &e.city,
            state: &e.state,
            violent_crime: e.violent_crime,
            property_crime: e.property_crime,
            trend: &e.trend,
            last_updated: &e.last_updated,
            safety_index: e.safety_index,
            police_response_time: e.police_response_time,
            police_resources: e.police_resources,
            population: e.population,
            note: &e.note,
            risk_score: e.risk_score,
            rank: e.rank,
            rank_out_of: e.rank_out_of,
        }
    }
}

impl Serialize for ArtifactDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entities.len() + 1))?;
        for entity in &self.entities {
            map.serialize_entry(&entity.key, &EntityView::from(entity))?;
        }
        map.serialize_entry(META_KEY, &self.meta)?;
        map.end()
    }
}

/// Largest integer an f64 holds exactly (2^53).
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Write whole numbers without a fractional part (`100`, not `100.0`).
pub fn serialize_number<S: Serializer>(
    value: &f64,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() <= MAX_EXACT_INT {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

pub fn serialize_opt_number<S: Serializer>(
    value: &Option<f64>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match value {
        Some(v) => serialize_number(v, serializer),
        None => serializer.serialize_none(),
    }
}

/// Assemble the document from ranked entities and their summary.
pub fn build_document(
    entities: Vec<CanonicalEntity>,
    summary: RankingSummary,
    generated_at: &str,
) -> ArtifactDocument {
    ArtifactDocument {
        entities,
        meta: Meta {
            generated_at: generated_at.to_string(),
            total_cities: summary.total,
            ranking: summary.ranking,
            top_most_at_risk: summary.top_most_at_risk,
            top_safest: summary.top_safest,
        },
    }
}

/// Pretty JSON with a trailing newline.
pub fn to_json(doc: &ArtifactDocument) -> Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(doc)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Write the artifact under `root`, replacing any previous one.
///
/// The document is fully serialized first and lands via a sibling temp file
/// plus rename, so a failed run leaves the old artifact in place.
pub fn write_artifact(root: &Path, doc: &ArtifactDocument) -> Result<PathBuf> {
    let path = root.join(ARTIFACT_PATH);
    let bytes = to_json(doc)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| PipelineError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, &bytes).map_err(|source| PipelineError::Io {
        path: tmp.clone(),
        source,
    })?;
    if let Err(source) = fs::rename(&tmp, &path) {
        let _ = fs::remove_file(&tmp);
        return Err(PipelineError::Io { path, source });
    }

    Ok(path)
}

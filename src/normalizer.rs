use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::models::{CanonicalEntity, Field, RawRecord};

/// Default for a missing or empty `trend`. Any other lowercased value is kept as-is.
pub const DEFAULT_TREND: &str = "flat";

/// Canonical field → raw column names accepted for it, in resolution order.
pub const FIELD_ALIASES: &[(Field, &[&str])] = &[
    (Field::City, &["city", "City", "CITY"]),
    (Field::State, &["state", "State", "STATE"]),
    (
        Field::ViolentCrime,
        &["violentCrime", "violent_crime", "Violent Crime"],
    ),
    (
        Field::PropertyCrime,
        &["propertyCrime", "property_crime", "Property Crime"],
    ),
    (Field::Population, &["population", "Population"]),
    (
        Field::PoliceResponseTime,
        &["policeResponseTime", "police_response_time", "responseTime"],
    ),
    (
        Field::PoliceResources,
        &["policeResources", "police_resources", "officers"],
    ),
    (Field::SafetyIndex, &["safetyIndex", "safety_index"]),
    (Field::Trend, &["trend"]),
    (Field::LastUpdated, &["lastUpdated", "last_updated"]),
    (Field::Note, &["note", "notes"]),
];

/// Counters collected while normalizing. Diagnostic only; nothing here reaches
/// the artifact.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizeStats {
    pub rows_seen: usize,
    pub rows_accepted: usize,
    pub rows_rejected: usize,
    pub duplicates_replaced: usize,
    /// Fields that fell back to their default, per canonical field.
    pub defaulted: BTreeMap<Field, usize>,
}

impl NormalizeStats {
    pub fn total_defaulted(&self) -> usize {
        self.defaulted.values().sum()
    }

    fn note_default(&mut self, field: Field) {
        *self.defaulted.entry(field).or_insert(0) += 1;
    }
}

fn aliases(field: Field) -> &'static [&'static str] {
    FIELD_ALIASES
        .iter()
        .find(|(f, _)| *f == field)
        .map(|(_, names)| *names)
        .unwrap_or(&[])
}

/// Resolve a canonical field against a raw record: exact alias match first,
/// then case-insensitive alias match. Empty values count as absent.
pub fn resolve<'a>(record: &'a RawRecord, field: Field) -> Option<&'a str> {
    let names = aliases(field);
    let present = |value: Option<&'a str>| value.map(str::trim).filter(|v| !v.is_empty());
    names
        .iter()
        .find_map(|name| present(record.get(name)))
        .or_else(|| {
            names
                .iter()
                .find_map(|name| present(record.get_ignore_case(name)))
        })
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Normalize every record, dropping rows without a city and state.
///
/// Keys stay unique: a later row with an existing key replaces the earlier
/// entity but keeps the earlier entity's position.
pub fn normalize_all(
    records: &[RawRecord],
    today: &str,
) -> (Vec<CanonicalEntity>, NormalizeStats) {
    let mut stats = NormalizeStats::default();
    let mut entities: Vec<CanonicalEntity> = Vec::with_capacity(records.len());
    let mut index_by_key: HashMap<String, usize> = HashMap::new();

    for record in records {
        stats.rows_seen += 1;
        let Some(entity) = normalize_record(record, today, &mut stats) else {
            stats.rows_rejected += 1;
            continue;
        };
        stats.rows_accepted += 1;

        match index_by_key.get(&entity.key) {
            Some(&idx) => {
                debug!(key = %entity.key, "duplicate key, keeping later row");
                stats.duplicates_replaced += 1;
                entities[idx] = entity;
            }
            None => {
                index_by_key.insert(entity.key.clone(), entities.len());
                entities.push(entity);
            }
        }
    }

    (entities, stats)
}

/// Normalize one record, or `None` when city or state is missing.
pub fn normalize_record(
    record: &RawRecord,
    today: &str,
    stats: &mut NormalizeStats,
) -> Option<CanonicalEntity> {
    let city = resolve(record, Field::City)?;
    let state = resolve(record, Field::State)?;

    // Crime counts never go null: anything unusable is 0.
    let mut count = |field: Field| -> f64 {
        match resolve(record, field).and_then(parse_number) {
            Some(n) if n >= 0.0 => n,
            _ => {
                stats.note_default(field);
                0.0
            }
        }
    };
    let violent_crime = count(Field::ViolentCrime);
    let property_crime = count(Field::PropertyCrime);

    let mut optional = |field: Field| -> Option<f64> {
        let value = resolve(record, field).and_then(parse_number);
        if value.is_none() {
            stats.note_default(field);
        }
        value
    };
    let population = optional(Field::Population);
    let police_response_time = optional(Field::PoliceResponseTime);
    let police_resources = optional(Field::PoliceResources);
    let safety_index = optional(Field::SafetyIndex);

    let mut text = |field: Field, default: &str| -> String {
        match resolve(record, field) {
            Some(v) => v.to_string(),
            None => {
                stats.note_default(field);
                default.to_string()
            }
        }
    };
    let trend = text(Field::Trend, DEFAULT_TREND).to_lowercase();
    let last_updated = text(Field::LastUpdated, today);
    let note = text(Field::Note, "");

    Some(CanonicalEntity {
        key: CanonicalEntity::make_key(city, state),
        city: city.to_string(),
        state: state.to_string(),
        violent_crime,
        property_crime,
        population,
        police_response_time,
        police_resources,
        safety_index,
        trend,
        last_updated,
        note,
        risk_score: None,
        rank: None,
        rank_out_of: None,
    })
}

use tracing::{debug, info};

use crate::artifact::{build_document, ArtifactDocument};
use crate::error::{PipelineError, Result};
use crate::models::RawRecord;
use crate::normalizer::{normalize_all, NormalizeStats};
use crate::ranker::rank;
use crate::scorer::score;

/// Result of transforming one batch of raw rows.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub document: ArtifactDocument,
    pub stats: NormalizeStats,
}

/// Normalize, score and rank `records` into the artifact document.
///
/// Fails with [`PipelineError::NoValidRecords`] when no row has a city and
/// state; nothing partial is returned.
pub fn transform(records: &[RawRecord], today: &str) -> Result<PipelineOutput> {
    let (mut entities, stats) = normalize_all(records, today);
    info!(
        rows = stats.rows_seen,
        accepted = stats.rows_accepted,
        rejected = stats.rows_rejected,
        duplicates = stats.duplicates_replaced,
        defaulted_fields = stats.total_defaulted(),
        "normalized rows"
    );
    for (field, count) in &stats.defaulted {
        debug!(%field, count, "fields defaulted");
    }

    if entities.is_empty() {
        return Err(PipelineError::NoValidRecords {
            rows: stats.rows_seen,
        });
    }

    let (max_violent, max_property) = score(&mut entities);
    debug!(max_violent, max_property, "scored entities");

    let summary = rank(&mut entities);
    let document = build_document(entities, summary, today);

    Ok(PipelineOutput { document, stats })
}

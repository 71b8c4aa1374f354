use serde::Serialize;

use crate::models::CanonicalEntity;

/// Maximum length of the most-at-risk and safest key lists.
pub const TOP_LIST_CAP: usize = 10;

/// Lightweight per-entity row of `_meta.ranking`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub key: String,
    pub city: String,
    pub state: String,
    pub rank: usize,
    #[serde(serialize_with = "crate::artifact::serialize_number")]
    pub risk_score: f64,
    #[serde(serialize_with = "crate::artifact::serialize_number")]
    pub violent_crime: f64,
    #[serde(serialize_with = "crate::artifact::serialize_number")]
    pub property_crime: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankingSummary {
    pub total: usize,
    /// Every entity, rank 1 first.
    pub ranking: Vec<RankingEntry>,
    pub top_most_at_risk: Vec<String>,
    /// Safest entity first.
    pub top_safest: Vec<String>,
}

/// Sort entities by `riskScore` descending and assign `rank`/`rankOutOf`.
///
/// The sort is stable: equal scores keep their normalization order. Unscored
/// entities sort as `0`.
pub fn rank(entities: &mut [CanonicalEntity]) -> RankingSummary {
    entities.sort_by(|a, b| {
        let sa = a.risk_score.unwrap_or(0.0);
        let sb = b.risk_score.unwrap_or(0.0);
        sb.total_cmp(&sa)
    });

    let total = entities.len();
    for (idx, entity) in entities.iter_mut().enumerate() {
        entity.rank = Some(idx + 1);
        entity.rank_out_of = Some(total);
    }

    let ranking = entities
        .iter()
        .enumerate()
        .map(|(idx, e)| RankingEntry {
            key: e.key.clone(),
            city: e.city.clone(),
            state: e.state.clone(),
            rank: idx + 1,
            risk_score: e.risk_score.unwrap_or(0.0),
            violent_crime: e.violent_crime,
            property_crime: e.property_crime,
        })
        .collect();

    let cap = TOP_LIST_CAP.min(total);
    let top_most_at_risk = entities
        .iter()
        .take(cap)
        .map(|e| e.key.clone())
        .collect();
    let top_safest = entities
        .iter()
        .rev()
        .take(cap)
        .map(|e| e.key.clone())
        .collect();

    RankingSummary {
        total,
        ranking,
        top_most_at_risk,
        top_safest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(city: &str, score: f64) -> CanonicalEntity {
        CanonicalEntity {
            key: CanonicalEntity::make_key(city, "IL"),
            city: city.to_string(),
            state: "IL".to_string(),
            violent_crime: 0.0,
            property_crime: 0.0,
            population: None,
            police_response_time: None,
            police_resources: None,
            safety_index: None,
            trend: "flat".to_string(),
            last_updated: "2024-05-01".to_string(),
            note: String::new(),
            risk_score: Some(score),
            rank: None,
            rank_out_of: None,
        }
    }

    #[test]
    fn test_ranks_descending_by_score() {
        let mut items = vec![scored("Low", 0.1), scored("High", 0.9), scored("Mid", 0.5)];
        let summary = rank(&mut items);
        let order: Vec<&str> = items.iter().map(|e| e.city.as_str()).collect();
        assert_eq!(order, ["High", "Mid", "Low"]);
        assert_eq!(items[0].rank, Some(1));
        assert_eq!(items[2].rank, Some(3));
        assert!(items.iter().all(|e| e.rank_out_of == Some(3)));
        assert_eq!(summary.total, 3);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let mut items = vec![
            scored("First", 0.5),
            scored("Top", 0.7),
            scored("Second", 0.5),
            scored("Third", 0.5),
        ];
        rank(&mut items);
        let order: Vec<&str> = items.iter().map(|e| e.city.as_str()).collect();
        assert_eq!(order, ["Top", "First", "Second", "Third"]);
    }

    #[test]
    fn test_small_dataset_top_lists_cover_everything() {
        let mut items = vec![scored("A", 0.3), scored("B", 0.2), scored("C", 0.1)];
        let summary = rank(&mut items);
        assert_eq!(summary.top_most_at_risk, ["A, IL", "B, IL", "C, IL"]);
        assert_eq!(summary.top_safest, ["C, IL", "B, IL", "A, IL"]);
    }

    #[test]
    fn test_top_lists_capped_at_ten() {
        let mut items: Vec<CanonicalEntity> = (0..25)
            .map(|i| scored(&format!("C{i:02}"), i as f64 / 100.0))
            .collect();
        let summary = rank(&mut items);
        assert_eq!(summary.top_most_at_risk.len(), TOP_LIST_CAP);
        assert_eq!(summary.top_safest.len(), TOP_LIST_CAP);
        assert_eq!(summary.top_most_at_risk[0], "C24, IL");
        assert_eq!(summary.top_safest[0], "C00, IL");
    }

    #[test]
    fn test_ranks_are_contiguous_and_monotonic() {
        let scores = [0.2, 0.9, 0.2, 0.0, 0.5, 0.9, 0.1];
        let mut items: Vec<CanonicalEntity> = scores
            .iter()
            .enumerate()
            .map(|(i, s)| scored(&format!("C{i}"), *s))
            .collect();
        let summary = rank(&mut items);

        let mut ranks: Vec<usize> = summary.ranking.iter().map(|r| r.rank).collect();
        ranks.sort_unstable();
        assert_eq!(ranks, (1..=scores.len()).collect::<Vec<_>>());

        for pair in summary.ranking.windows(2) {
            assert!(pair[0].rank < pair[1].rank);
            assert!(pair[0].risk_score >= pair[1].risk_score);
        }
    }

    #[test]
    fn test_empty() {
        let mut items: Vec<CanonicalEntity> = Vec::new();
        let summary = rank(&mut items);
        assert_eq!(summary, RankingSummary::default());
    }
}

use crate::models::CanonicalEntity;

/// Weight of normalized violent crime in the composite score.
pub const VIOLENT_WEIGHT: f64 = 0.6;
/// Weight of normalized property crime in the composite score.
pub const PROPERTY_WEIGHT: f64 = 0.4;
/// Decimal places kept in `riskScore`.
pub const SCORE_DECIMALS: i32 = 6;

/// Largest violent and property counts across the collection, `0` when empty.
pub fn metric_maxima(entities: &[CanonicalEntity]) -> (f64, f64) {
    entities.iter().fold((0.0_f64, 0.0_f64), |(v, p), e| {
        (v.max(e.violent_crime), p.max(e.property_crime))
    })
}

/// Assign a `riskScore` to every entity. Order and membership are untouched.
///
/// Each count is divided by the collection maximum; a zero maximum yields a
/// zero term rather than NaN.
pub fn score(entities: &mut [CanonicalEntity]) -> (f64, f64) {
    let (max_violent, max_property) = metric_maxima(entities);

    for entity in entities.iter_mut() {
        let nv = ratio(entity.violent_crime, max_violent);
        let np = ratio(entity.property_crime, max_property);
        entity.risk_score = Some(round_to(
            VIOLENT_WEIGHT * nv + PROPERTY_WEIGHT * np,
            SCORE_DECIMALS,
        ));
    }

    (max_violent, max_property)
}

fn ratio(value: f64, max: f64) -> f64 {
    if max > 0.0 {
        value / max
    } else {
        0.0
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

//! Trust Score 360: every raw metric is mapped onto a 0-100 scale, then
//! blended with fixed weights.
//!
//!   on-time delivery % ............... 35%
//!   quality (PPM -> score) ........... 25%
//!   quote response time (hours) ...... 15%
//!   price index (distance from 100) .. 15%
//!   penalty (docs/OTD/PPM deduction) . 10%

mod penalty;

pub use penalty::derive_penalty_pct;

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::config::ScoringConfig;
use super::domain::{Vendor, VendorId};
use super::repository::{RepositoryError, VendorRepository};
use super::{clamp, round2};

const OTD_WEIGHT: f64 = 0.35;
const QUALITY_WEIGHT: f64 = 0.25;
const RESPONSE_WEIGHT: f64 = 0.15;
const PRICE_WEIGHT: f64 = 0.15;
const PENALTY_WEIGHT: f64 = 0.10;

/// On-time delivery percentage, clamped. Missing history scores zero.
pub fn otd_score(on_time_pct: Option<f64>) -> f64 {
    match on_time_pct {
        Some(pct) if pct.is_finite() => clamp(pct, 0.0, 100.0),
        _ => 0.0,
    }
}

/// Convert a defect rate in parts per million to a 0-100 quality score.
/// 0 ppm scores 100, `target_ppm` scores 0, and anything beyond stays at 0.
pub fn quality_score(ppm: Option<f64>, target_ppm: f64) -> f64 {
    let Some(ppm) = ppm.filter(|value| value.is_finite()) else {
        return 0.0;
    };
    let ratio = clamp(ppm / target_ppm.max(1.0), 0.0, 2.0);
    round2(100.0 - clamp(ratio * 100.0, 0.0, 100.0))
}

/// Quote response SLA step function: 24h -> 100, 48h -> 80, 72h -> 60,
/// 96h -> 40, 120h -> 20, slower -> 10.
pub fn response_score(hours: Option<f64>) -> f64 {
    let Some(hours) = hours.filter(|value| value.is_finite()) else {
        return 0.0;
    };
    let hours = hours.max(0.0);
    if hours <= 24.0 {
        100.0
    } else if hours <= 48.0 {
        80.0
    } else if hours <= 72.0 {
        60.0
    } else if hours <= 96.0 {
        40.0
    } else if hours <= 120.0 {
        20.0
    } else {
        10.0
    }
}

/// Price index score: 100 is the market baseline; the further from 100 the
/// lower the score.
pub fn price_score(price_index: Option<f64>) -> f64 {
    let Some(index) = price_index.filter(|value| value.is_finite()) else {
        return 0.0;
    };
    round2(100.0 - clamp((index - 100.0).abs(), 0.0, 100.0))
}

/// Penalty percentage clamped onto 0..100 points of deduction.
pub fn penalty_score(pct: Option<f64>) -> f64 {
    match pct {
        Some(pct) if pct.is_finite() => clamp(pct, 0.0, 100.0),
        _ => 0.0,
    }
}

/// Raw metric snapshot feeding the composite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrustScoreInputs {
    pub on_time_pct: Option<f64>,
    pub quality_ppm: Option<f64>,
    pub quote_resp_hrs: Option<f64>,
    pub price_index: Option<f64>,
    pub penalty_pct: Option<f64>,
}

impl From<&Vendor> for TrustScoreInputs {
    /// Normalize a vendor row into scoring inputs. The penalty is derived
    /// separately from the document snapshot, so it starts out unset.
    fn from(vendor: &Vendor) -> Self {
        Self {
            on_time_pct: vendor.on_time_pct,
            quality_ppm: vendor.quality_ppm,
            quote_resp_hrs: vendor.quote_resp_hrs,
            price_index: vendor.price_index,
            penalty_pct: None,
        }
    }
}

/// Weighted composite, clamped to [0, 100] and rounded to two decimals.
/// The penalty deducts from its 10% bucket.
pub fn compute_trust_score(inputs: &TrustScoreInputs, config: &ScoringConfig) -> f64 {
    let otd = otd_score(inputs.on_time_pct);
    let quality = quality_score(inputs.quality_ppm, config.target_ppm);
    let response = response_score(inputs.quote_resp_hrs);
    let price = price_score(inputs.price_index);
    let penalty = penalty_score(inputs.penalty_pct);

    let score = OTD_WEIGHT * otd
        + QUALITY_WEIGHT * quality
        + RESPONSE_WEIGHT * response
        + PRICE_WEIGHT * price
        + PENALTY_WEIGHT * (100.0 - penalty);
    round2(clamp(score, 0.0, 100.0))
}

/// Recomputes and persists vendor trust scores through the injected store.
pub struct TrustScoreService<R> {
    repository: Arc<R>,
    config: ScoringConfig,
}

impl<R> TrustScoreService<R>
where
    R: VendorRepository,
{
    pub fn new(repository: Arc<R>, config: ScoringConfig) -> Self {
        Self { repository, config }
    }

    /// Recompute one vendor's trust score and write it back.
    pub fn recompute_vendor_score(
        &self,
        id: VendorId,
        today: NaiveDate,
    ) -> Result<f64, TrustScoreError> {
        let vendor = self
            .repository
            .vendor(id)?
            .ok_or(TrustScoreError::VendorNotFound(id))?;
        let score = self.score_vendor(&vendor, today)?;
        self.repository.update_trust_score(id, score)?;
        Ok(score)
    }

    /// Recompute the whole fleet. Each vendor's row is independently owned,
    /// so there is no ordering guarantee and no cross-vendor locking; a
    /// vendor that fails to score or persist is recorded in the outcome and
    /// never blocks its siblings.
    pub fn recompute_all(&self, today: NaiveDate) -> Result<BatchOutcome, TrustScoreError> {
        let vendors = self.repository.vendors()?;
        let mut outcome = BatchOutcome::default();

        for vendor in vendors {
            let result = self.score_vendor(&vendor, today).and_then(|score| {
                self.repository
                    .update_trust_score(vendor.id, score)
                    .map_err(TrustScoreError::from)
            });

            match result {
                Ok(()) => outcome.updated += 1,
                Err(err) => {
                    warn!(vendor_id = %vendor.id, error = %err, "trust score update failed");
                    outcome.failures.push(BatchFailure {
                        vendor_id: vendor.id,
                        reason: err.to_string(),
                    });
                }
            }
        }

        Ok(outcome)
    }

    fn score_vendor(&self, vendor: &Vendor, today: NaiveDate) -> Result<f64, TrustScoreError> {
        let documents = self.repository.documents(Some(vendor.id))?;
        let mut inputs = TrustScoreInputs::from(vendor);
        inputs.penalty_pct = Some(derive_penalty_pct(vendor, &documents, today));
        Ok(compute_trust_score(&inputs, &self.config))
    }
}

/// Aggregate result of a fleet-wide recompute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub updated: usize,
    pub failures: Vec<BatchFailure>,
}

/// One vendor that could not be scored or persisted during a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchFailure {
    pub vendor_id: VendorId,
    pub reason: String,
}

/// Error raised by trust score recomputation.
#[derive(Debug, thiserror::Error)]
pub enum TrustScoreError {
    #[error("vendor {0} not found")]
    VendorNotFound(VendorId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

use serde::{Deserialize, Serialize};

/// Tunable heuristics shared by the scoring services, so thresholds remain
/// overridable per deployment instead of living as inlined constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Defect rate (parts per million) at which the quality sub-score
    /// reaches zero.
    pub target_ppm: f64,
    /// Document expiry lookahead window, in days.
    pub lookahead_days: i64,
    /// Risk contribution per item code the vendor alone supplies.
    pub single_source_step: f64,
    pub seasonality: SeasonalityCalendar,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            target_ppm: 1000.0,
            lookahead_days: 30,
            single_source_step: 20.0,
            seasonality: SeasonalityCalendar::default(),
        }
    }
}

/// Fixed-calendar seasonality buckets. The defaults reflect logistics
/// pressure around Ramadan/Hajj and year-end shipping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalityCalendar {
    pub high_months: Vec<u32>,
    pub medium_months: Vec<u32>,
    pub high_base: f64,
    pub medium_base: f64,
    pub low_base: f64,
}

impl SeasonalityCalendar {
    /// Baseline seasonal risk for a calendar month (1..=12).
    pub fn base_for(&self, month: u32) -> f64 {
        if self.high_months.contains(&month) {
            self.high_base
        } else if self.medium_months.contains(&month) {
            self.medium_base
        } else {
            self.low_base
        }
    }
}

impl Default for SeasonalityCalendar {
    fn default() -> Self {
        Self {
            high_months: vec![3, 4, 5, 6, 12],
            medium_months: vec![1, 2, 7, 8],
            high_base: 70.0,
            medium_base: 40.0,
            low_base: 20.0,
        }
    }
}

//! Next-period delay risk: a weighted blend of recent performance,
//! document compliance, logistics heuristics, and seasonality, computed
//! across the whole fleet and sorted by severity.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::config::{ScoringConfig, SeasonalityCalendar};
use super::domain::{Vendor, VendorId, VendorPerformanceHistory, VendorProduct};
use super::repository::{HistoryFilter, RepositoryError, VendorRepository};
use super::{clamp, round2};

const OTD_WEIGHT: f64 = 0.30;
const LEAD_TIME_WEIGHT: f64 = 0.20;
const QUALITY_WEIGHT: f64 = 0.15;
const DOCS_WEIGHT: f64 = 0.10;
const AIR_WEIGHT: f64 = 0.10;
const SINGLE_SOURCE_WEIGHT: f64 = 0.05;
const SEASONAL_WEIGHT: f64 = 0.10;

const LOW_OTD_ALERT: f64 = 80.0;
const HIGH_LEAD_TIME_ALERT: f64 = 30.0;
const HIGH_PPM_ALERT: f64 = 3000.0;
const AIR_HEAVY_ALERT: f64 = 50.0;
const SINGLE_SOURCE_ALERT: f64 = 80.0;

const LEAD_TIME_SPAN_DAYS: f64 = 60.0;
const PPM_SPAN: f64 = 6000.0;
const DOCS_STEP: f64 = 20.0;
const SEASONAL_OTD_FACTOR: f64 = 0.5;
const SEASONAL_ADJ_CAP: f64 = 30.0;
const HISTORY_WINDOW_MONTHS: u32 = 3;

/// Categorical warnings raised alongside the numeric score. Any subset may
/// fire independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskAlert {
    LowOtd,
    HighLeadTime,
    HighPpm,
    ExpiringDocs,
    AirFreightHeavy,
    SingleSourceRisk,
}

impl RiskAlert {
    pub const fn label(self) -> &'static str {
        match self {
            RiskAlert::LowOtd => "LOW_OTD",
            RiskAlert::HighLeadTime => "HIGH_LEAD_TIME",
            RiskAlert::HighPpm => "HIGH_PPM",
            RiskAlert::ExpiringDocs => "EXPIRING_DOCS",
            RiskAlert::AirFreightHeavy => "AIR_FREIGHT_HEAVY",
            RiskAlert::SingleSourceRisk => "SINGLE_SOURCE_RISK",
        }
    }
}

/// The seven factors feeding the blend, kept on the result so reports can
/// explain the score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskFactors {
    /// On-time delivery %, 0..100. Missing history defaults optimistically
    /// to 100.
    pub otd: f64,
    /// Average lead time in days, unscaled.
    pub lead_days: f64,
    /// Defect rate in parts per million, unscaled.
    pub ppm: f64,
    /// Documents expiring within the lookahead window or already invalid.
    pub docs_expiring: u32,
    /// Share of ship modes mentioning air freight, 0..100.
    pub air_bias: f64,
    /// Single-source exposure, 0..100.
    pub single_source: f64,
    /// Seasonality factor for the next calendar month, 0..100.
    pub seasonal: f64,
}

/// Per-vendor risk assessment row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorRisk {
    pub id: VendorId,
    pub code: String,
    pub name: String,
    pub risk_score: f64,
    pub alerts: Vec<RiskAlert>,
    pub factors: RiskFactors,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecast_month: Option<NaiveDate>,
}

/// Share (0..100) of recorded ship modes whose text mentions air freight.
/// A vendor with no recorded modes scores zero.
pub fn air_bias(ship_modes: &[String]) -> f64 {
    if ship_modes.is_empty() {
        return 0.0;
    }
    let air = ship_modes
        .iter()
        .filter(|mode| mode.to_ascii_lowercase().contains("air"))
        .count();
    air as f64 / ship_modes.len() as f64 * 100.0
}

/// Linear map of `value` clamped to [lo, hi] onto 0..100.
pub fn scale(value: f64, lo: f64, hi: f64) -> f64 {
    if hi <= lo {
        return 0.0;
    }
    (clamp(value, lo, hi) - lo) / (hi - lo) * 100.0
}

/// Exposure from item codes this vendor alone supplies: each adds `step`
/// points, capped at 100.
pub fn single_source_exposure(sole_item_count: u32, step: f64) -> f64 {
    clamp(sole_item_count as f64 * step, 0.0, 100.0)
}

/// Item codes with exactly one distinct seller, counted per vendor.
pub fn sole_source_counts(products: &[VendorProduct]) -> HashMap<VendorId, u32> {
    let mut sellers: HashMap<&str, HashSet<VendorId>> = HashMap::new();
    for product in products {
        sellers
            .entry(product.item_code.as_str())
            .or_default()
            .insert(product.vendor_id);
    }

    let mut counts: HashMap<VendorId, u32> = HashMap::new();
    for vendors in sellers.values() {
        if vendors.len() == 1 {
            if let Some(&vendor_id) = vendors.iter().next() {
                *counts.entry(vendor_id).or_default() += 1;
            }
        }
    }
    counts
}

/// Seasonal factor: the calendar base for the target month, adjusted upward
/// when recent on-time delivery has been weak. With no history the base
/// stands alone.
pub fn seasonal_factor(history: &[&VendorPerformanceHistory], base: f64) -> f64 {
    if history.is_empty() {
        return base;
    }
    let avg_otd = history
        .iter()
        .map(|row| row.on_time_pct.unwrap_or(100.0))
        .sum::<f64>()
        / history.len() as f64;
    let adjustment = clamp((100.0 - avg_otd) * SEASONAL_OTD_FACTOR, 0.0, SEASONAL_ADJ_CAP);
    clamp(base + adjustment, 0.0, 100.0)
}

/// First day of the month after `today`.
pub fn next_month(today: NaiveDate) -> NaiveDate {
    let first = start_of_month(today);
    first.checked_add_months(Months::new(1)).unwrap_or(first)
}

fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn seasonal_base_for(calendar: &SeasonalityCalendar, target: NaiveDate) -> f64 {
    calendar.base_for(target.month())
}

/// Assesses every vendor's near-term delivery risk from a snapshot of the
/// vendor store.
pub struct RiskAssessor<R> {
    repository: Arc<R>,
    config: ScoringConfig,
}

impl<R> RiskAssessor<R>
where
    R: VendorRepository,
{
    pub fn new(repository: Arc<R>, config: ScoringConfig) -> Self {
        Self { repository, config }
    }

    /// Assess the whole fleet, sorted by risk score descending. Ties keep
    /// the store's vendor order.
    pub fn assess_vendors(&self, today: NaiveDate) -> Result<Vec<VendorRisk>, RepositoryError> {
        let vendors = self.repository.vendors()?;

        let cutoff = today + Duration::days(self.config.lookahead_days);
        let mut expiring: HashMap<VendorId, u32> = HashMap::new();
        for doc in self.repository.documents(None)? {
            if doc.expiring_or_invalid(cutoff) {
                *expiring.entry(doc.vendor_id).or_default() += 1;
            }
        }

        let window_start = start_of_month(today)
            .checked_sub_months(Months::new(HISTORY_WINDOW_MONTHS))
            .unwrap_or_else(|| start_of_month(today));
        let history = self
            .repository
            .performance_history(&HistoryFilter::since(window_start))?;
        let mut history_by_vendor: HashMap<VendorId, Vec<&VendorPerformanceHistory>> =
            HashMap::new();
        for row in &history {
            history_by_vendor.entry(row.vendor_id).or_default().push(row);
        }

        let products = self.repository.products()?;
        let sole_counts = sole_source_counts(&products);

        let season_base = seasonal_base_for(&self.config.seasonality, next_month(today));

        let mut results: Vec<VendorRisk> = vendors
            .iter()
            .map(|vendor| {
                self.assess_vendor(
                    vendor,
                    expiring.get(&vendor.id).copied().unwrap_or(0),
                    history_by_vendor
                        .get(&vendor.id)
                        .map(Vec::as_slice)
                        .unwrap_or(&[]),
                    sole_counts.get(&vendor.id).copied().unwrap_or(0),
                    season_base,
                )
            })
            .collect();

        // sort_by is stable, so equal scores keep their input order
        results.sort_by(|a, b| b.risk_score.total_cmp(&a.risk_score));
        Ok(results)
    }

    /// Forecast variant: the same assessment with the target month stamped
    /// onto every row.
    pub fn predict_next_month(&self, today: NaiveDate) -> Result<Vec<VendorRisk>, RepositoryError> {
        let forecast_month = next_month(today);
        let mut assessed = self.assess_vendors(today)?;
        for row in &mut assessed {
            row.forecast_month = Some(forecast_month);
        }
        Ok(assessed)
    }

    fn assess_vendor(
        &self,
        vendor: &Vendor,
        docs_expiring: u32,
        history: &[&VendorPerformanceHistory],
        sole_item_count: u32,
        season_base: f64,
    ) -> VendorRisk {
        let otd = clamp(vendor.on_time_pct.unwrap_or(100.0), 0.0, 100.0);
        let lead_days = vendor.lead_time_avg_days.unwrap_or(0.0);
        let ppm = vendor.quality_ppm.unwrap_or(0.0);
        let air = air_bias(&vendor.ship_modes);
        let single = single_source_exposure(sole_item_count, self.config.single_source_step);
        let seasonal = seasonal_factor(history, season_base);

        let mut alerts = Vec::new();
        if otd < LOW_OTD_ALERT {
            alerts.push(RiskAlert::LowOtd);
        }
        if lead_days > HIGH_LEAD_TIME_ALERT {
            alerts.push(RiskAlert::HighLeadTime);
        }
        if ppm > HIGH_PPM_ALERT {
            alerts.push(RiskAlert::HighPpm);
        }
        if docs_expiring > 0 {
            alerts.push(RiskAlert::ExpiringDocs);
        }
        if air > AIR_HEAVY_ALERT {
            alerts.push(RiskAlert::AirFreightHeavy);
        }
        if single >= SINGLE_SOURCE_ALERT {
            alerts.push(RiskAlert::SingleSourceRisk);
        }

        let risk_score = OTD_WEIGHT * (100.0 - otd)
            + LEAD_TIME_WEIGHT * scale(lead_days, 0.0, LEAD_TIME_SPAN_DAYS)
            + QUALITY_WEIGHT * scale(ppm, 0.0, PPM_SPAN)
            + DOCS_WEIGHT * clamp(docs_expiring as f64 * DOCS_STEP, 0.0, 100.0)
            + AIR_WEIGHT * clamp(air, 0.0, 100.0)
            + SINGLE_SOURCE_WEIGHT * clamp(single, 0.0, 100.0)
            + SEASONAL_WEIGHT * clamp(seasonal, 0.0, 100.0);

        VendorRisk {
            id: vendor.id,
            code: vendor.code.clone(),
            name: vendor.name.clone(),
            risk_score: round2(risk_score),
            alerts,
            factors: RiskFactors {
                otd,
                lead_days,
                ppm,
                docs_expiring,
                air_bias: air,
                single_source: single,
                seasonal,
            },
            forecast_month: None,
        }
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier wrapper for vendor records.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct VendorId(pub i64);

impl fmt::Display for VendorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Onboarding state of a vendor as tracked by the sourcing platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VendorStatus {
    Approved,
    Pending,
    OnHold,
    Suspended,
}

impl VendorStatus {
    pub const fn label(self) -> &'static str {
        match self {
            VendorStatus::Approved => "Approved",
            VendorStatus::Pending => "Pending",
            VendorStatus::OnHold => "On-Hold",
            VendorStatus::Suspended => "Suspended",
        }
    }
}

/// Master vendor record. All metric fields are optional: the platform
/// onboards vendors before performance data exists, and every scoring
/// function defines an explicit default for a missing value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: VendorId,
    pub code: String,
    pub name: String,
    pub status: VendorStatus,
    pub on_time_pct: Option<f64>,
    pub lead_time_avg_days: Option<f64>,
    pub quality_ppm: Option<f64>,
    pub price_index: Option<f64>,
    pub quote_resp_hrs: Option<f64>,
    pub trust_score: Option<f64>,
    pub ship_modes: Vec<String>,
    pub categories: Vec<String>,
    pub regions: Vec<String>,
}

/// Regulatory or commercial document on file for a vendor. `doc_type` is
/// free text and is matched case-insensitively against the required
/// compliance categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorDocument {
    pub vendor_id: VendorId,
    pub doc_type: String,
    pub number: Option<String>,
    pub expiry: Option<NaiveDate>,
    pub valid: bool,
}

impl VendorDocument {
    /// A document counts against the vendor when it is explicitly invalid
    /// or carries an expiry on or before the cutoff. Documents without an
    /// expiry date never expire.
    pub fn expiring_or_invalid(&self, cutoff: NaiveDate) -> bool {
        !self.valid || self.expiry.is_some_and(|expiry| expiry <= cutoff)
    }
}

/// Monthly performance roll-up. The vendor store keeps one row per
/// (vendor, month) pair; `month` is normalized to the first of the month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorPerformanceHistory {
    pub vendor_id: VendorId,
    pub month: NaiveDate,
    pub on_time_pct: Option<f64>,
    pub quality_ppm: Option<f64>,
    pub disputes: u32,
    pub quotes_count: u32,
    pub avg_resp_hrs: Option<f64>,
    pub trust_score: Option<f64>,
}

/// Catalog entry used to detect single-source exposure across the fleet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorProduct {
    pub vendor_id: VendorId,
    pub item_code: String,
    pub price: f64,
    pub moq: u32,
    pub lead_time_days: u32,
}

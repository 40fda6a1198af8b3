use chrono::{Months, NaiveDate};

use super::super::clamp;
use super::super::domain::{Vendor, VendorDocument};

const EXPIRING_DOCS_PENALTY: f64 = 20.0;
const LOW_OTD_PENALTY: f64 = 10.0;
const HIGH_PPM_PENALTY: f64 = 20.0;

const LOW_OTD_THRESHOLD: f64 = 80.0;
const HIGH_PPM_THRESHOLD: f64 = 3000.0;

/// Deduction percentage derived from document compliance state and recent
/// performance, clamped to [0, 100].
///
/// Documents already marked invalid or expiring within one calendar month
/// add 20 points; on-time delivery below 80% adds 10; a defect rate above
/// 3000 ppm adds 20. A vendor with no recorded OTD is not penalized for it,
/// and a vendor with no recorded PPM is treated as defect-free here; the
/// trust sub-scores already zero out those missing inputs.
pub fn derive_penalty_pct(vendor: &Vendor, documents: &[VendorDocument], today: NaiveDate) -> f64 {
    let cutoff = today.checked_add_months(Months::new(1)).unwrap_or(today);
    let flagged = documents
        .iter()
        .filter(|doc| doc.vendor_id == vendor.id && doc.expiring_or_invalid(cutoff))
        .count();

    let mut penalty = 0.0;
    if flagged > 0 {
        penalty += EXPIRING_DOCS_PENALTY;
    }
    if vendor.on_time_pct.unwrap_or(100.0) < LOW_OTD_THRESHOLD {
        penalty += LOW_OTD_PENALTY;
    }
    if vendor.quality_ppm.unwrap_or(0.0) > HIGH_PPM_THRESHOLD {
        penalty += HIGH_PPM_PENALTY;
    }

    clamp(penalty, 0.0, 100.0)
}

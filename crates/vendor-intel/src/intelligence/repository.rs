use chrono::NaiveDate;

use super::domain::{
    Vendor, VendorDocument, VendorId, VendorPerformanceHistory, VendorProduct,
};

/// Data-access capability the scoring services depend on. The platform's
/// vendor store implements this; tests plug in in-memory fixtures. Services
/// receive it as an injected `Arc` rather than reaching for a process-wide
/// client.
pub trait VendorRepository: Send + Sync {
    fn vendor(&self, id: VendorId) -> Result<Option<Vendor>, RepositoryError>;
    fn vendors(&self) -> Result<Vec<Vendor>, RepositoryError>;
    /// Documents for one vendor, or the whole fleet when `vendor_id` is `None`.
    fn documents(&self, vendor_id: Option<VendorId>)
        -> Result<Vec<VendorDocument>, RepositoryError>;
    fn performance_history(
        &self,
        filter: &HistoryFilter,
    ) -> Result<Vec<VendorPerformanceHistory>, RepositoryError>;
    fn products(&self) -> Result<Vec<VendorProduct>, RepositoryError>;
    /// Persist a recomputed trust score. This is the only vendor field the
    /// engine ever writes.
    fn update_trust_score(&self, id: VendorId, score: f64) -> Result<(), RepositoryError>;
}

/// Narrowing criteria for performance history reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    pub vendor_id: Option<VendorId>,
    /// Keep rows whose month is on or after this date.
    pub months_from: Option<NaiveDate>,
}

impl HistoryFilter {
    pub fn since(month: NaiveDate) -> Self {
        Self {
            vendor_id: None,
            months_from: Some(month),
        }
    }

    pub fn for_vendor(vendor_id: VendorId) -> Self {
        Self {
            vendor_id: Some(vendor_id),
            months_from: None,
        }
    }

    pub fn matches(&self, row: &VendorPerformanceHistory) -> bool {
        if let Some(vendor_id) = self.vendor_id {
            if row.vendor_id != vendor_id {
                return false;
            }
        }
        if let Some(from) = self.months_from {
            if row.month < from {
                return false;
            }
        }
        true
    }
}

/// Error enumeration for vendor store failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("vendor record not found")]
    NotFound,
    #[error("vendor store unavailable: {0}")]
    Unavailable(String),
}

//! Scoring core: trust score computation, risk assessment, and compliance
//! auditing over a snapshot of the vendor store.

pub mod compliance;
pub mod config;
pub mod domain;
pub mod repository;
pub mod risk;
pub mod router;
pub mod trust;

#[cfg(test)]
mod tests;

use std::sync::Arc;

pub use compliance::{
    ComplianceAuditor, ComplianceError, ComplianceExport, ComplianceReport, ComplianceSummary,
    ExportFormat, ExportOptions, RequiredDoc, VendorComplianceRow,
};
pub use config::{ScoringConfig, SeasonalityCalendar};
pub use domain::{
    Vendor, VendorDocument, VendorId, VendorPerformanceHistory, VendorProduct, VendorStatus,
};
pub use repository::{HistoryFilter, RepositoryError, VendorRepository};
pub use risk::{RiskAlert, RiskAssessor, RiskFactors, VendorRisk};
pub use router::vendor_router;
pub use trust::{
    BatchFailure, BatchOutcome, TrustScoreError, TrustScoreInputs, TrustScoreService,
};

/// The three scoring services over one shared repository handle. Routers
/// and CLIs hold this as their single state object.
pub struct VendorIntelligence<R> {
    pub trust: TrustScoreService<R>,
    pub risk: RiskAssessor<R>,
    pub compliance: ComplianceAuditor<R>,
}

impl<R> VendorIntelligence<R>
where
    R: VendorRepository,
{
    pub fn new(repository: Arc<R>, config: ScoringConfig) -> Self {
        Self {
            trust: TrustScoreService::new(repository.clone(), config.clone()),
            risk: RiskAssessor::new(repository.clone(), config.clone()),
            compliance: ComplianceAuditor::new(repository, config),
        }
    }
}

pub(crate) fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

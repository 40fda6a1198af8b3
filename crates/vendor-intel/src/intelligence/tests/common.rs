use std::sync::Mutex;

use chrono::NaiveDate;
use serde_json::Value;

use crate::intelligence::domain::{
    Vendor, VendorDocument, VendorId, VendorPerformanceHistory, VendorProduct, VendorStatus,
};
use crate::intelligence::repository::{HistoryFilter, RepositoryError, VendorRepository};
use crate::intelligence::ScoringConfig;

/// Mid-October evaluation date: the following month (November) sits in the
/// low seasonality bucket, which keeps baseline expectations simple.
pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 15).expect("valid date")
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn scoring_config() -> ScoringConfig {
    ScoringConfig::default()
}

pub(super) fn vendor(id: i64, code: &str, name: &str) -> Vendor {
    Vendor {
        id: VendorId(id),
        code: code.to_string(),
        name: name.to_string(),
        status: VendorStatus::Approved,
        on_time_pct: Some(95.0),
        lead_time_avg_days: Some(10.0),
        quality_ppm: Some(200.0),
        price_index: Some(100.0),
        quote_resp_hrs: Some(12.0),
        trust_score: None,
        ship_modes: vec!["Sea".to_string()],
        categories: vec!["Electronics".to_string()],
        regions: vec!["EMEA".to_string()],
    }
}

pub(super) fn document(
    vendor_id: i64,
    doc_type: &str,
    expiry: Option<NaiveDate>,
    valid: bool,
) -> VendorDocument {
    VendorDocument {
        vendor_id: VendorId(vendor_id),
        doc_type: doc_type.to_string(),
        number: Some(format!("{doc_type}-0001")),
        expiry,
        valid,
    }
}

pub(super) fn product(vendor_id: i64, item_code: &str) -> VendorProduct {
    VendorProduct {
        vendor_id: VendorId(vendor_id),
        item_code: item_code.to_string(),
        price: 4.2,
        moq: 100,
        lead_time_days: 14,
    }
}

pub(super) fn history_row(vendor_id: i64, month: NaiveDate, on_time_pct: f64) -> VendorPerformanceHistory {
    VendorPerformanceHistory {
        vendor_id: VendorId(vendor_id),
        month,
        on_time_pct: Some(on_time_pct),
        quality_ppm: Some(300.0),
        disputes: 0,
        quotes_count: 8,
        avg_resp_hrs: Some(20.0),
        trust_score: None,
    }
}

/// Mutex-backed store for exercising the services without the platform's
/// vendor database.
#[derive(Default)]
pub(super) struct MemoryRepository {
    pub(super) vendors: Mutex<Vec<Vendor>>,
    pub(super) documents: Mutex<Vec<VendorDocument>>,
    pub(super) history: Mutex<Vec<VendorPerformanceHistory>>,
    pub(super) products: Mutex<Vec<VendorProduct>>,
}

impl MemoryRepository {
    pub(super) fn with_vendors(vendors: Vec<Vendor>) -> Self {
        Self {
            vendors: Mutex::new(vendors),
            ..Self::default()
        }
    }

    pub(super) fn add_documents(&self, documents: Vec<VendorDocument>) {
        self.documents
            .lock()
            .expect("documents mutex poisoned")
            .extend(documents);
    }

    pub(super) fn add_products(&self, products: Vec<VendorProduct>) {
        self.products
            .lock()
            .expect("products mutex poisoned")
            .extend(products);
    }

    pub(super) fn add_history(&self, rows: Vec<VendorPerformanceHistory>) {
        self.history
            .lock()
            .expect("history mutex poisoned")
            .extend(rows);
    }

    pub(super) fn stored_trust_score(&self, id: VendorId) -> Option<f64> {
        self.vendors
            .lock()
            .expect("vendors mutex poisoned")
            .iter()
            .find(|vendor| vendor.id == id)
            .and_then(|vendor| vendor.trust_score)
    }
}

impl VendorRepository for MemoryRepository {
    fn vendor(&self, id: VendorId) -> Result<Option<Vendor>, RepositoryError> {
        Ok(self
            .vendors
            .lock()
            .expect("vendors mutex poisoned")
            .iter()
            .find(|vendor| vendor.id == id)
            .cloned())
    }

    fn vendors(&self) -> Result<Vec<Vendor>, RepositoryError> {
        Ok(self.vendors.lock().expect("vendors mutex poisoned").clone())
    }

    fn documents(
        &self,
        vendor_id: Option<VendorId>,
    ) -> Result<Vec<VendorDocument>, RepositoryError> {
        let documents = self.documents.lock().expect("documents mutex poisoned");
        Ok(documents
            .iter()
            .filter(|doc| vendor_id.map(|id| doc.vendor_id == id).unwrap_or(true))
            .cloned()
            .collect())
    }

    fn performance_history(
        &self,
        filter: &HistoryFilter,
    ) -> Result<Vec<VendorPerformanceHistory>, RepositoryError> {
        let history = self.history.lock().expect("history mutex poisoned");
        Ok(history
            .iter()
            .filter(|row| filter.matches(row))
            .cloned()
            .collect())
    }

    fn products(&self) -> Result<Vec<VendorProduct>, RepositoryError> {
        Ok(self
            .products
            .lock()
            .expect("products mutex poisoned")
            .clone())
    }

    fn update_trust_score(&self, id: VendorId, score: f64) -> Result<(), RepositoryError> {
        let mut vendors = self.vendors.lock().expect("vendors mutex poisoned");
        match vendors.iter_mut().find(|vendor| vendor.id == id) {
            Some(vendor) => {
                vendor.trust_score = Some(score);
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }
}

/// Wrapper that refuses trust score writes for one vendor, for exercising
/// partial batch failures.
pub(super) struct FailingUpdateRepository {
    pub(super) inner: MemoryRepository,
    pub(super) failing: VendorId,
}

impl VendorRepository for FailingUpdateRepository {
    fn vendor(&self, id: VendorId) -> Result<Option<Vendor>, RepositoryError> {
        self.inner.vendor(id)
    }

    fn vendors(&self) -> Result<Vec<Vendor>, RepositoryError> {
        self.inner.vendors()
    }

    fn documents(
        &self,
        vendor_id: Option<VendorId>,
    ) -> Result<Vec<VendorDocument>, RepositoryError> {
        self.inner.documents(vendor_id)
    }

    fn performance_history(
        &self,
        filter: &HistoryFilter,
    ) -> Result<Vec<VendorPerformanceHistory>, RepositoryError> {
        self.inner.performance_history(filter)
    }

    fn products(&self) -> Result<Vec<VendorProduct>, RepositoryError> {
        self.inner.products()
    }

    fn update_trust_score(&self, id: VendorId, score: f64) -> Result<(), RepositoryError> {
        if id == self.failing {
            return Err(RepositoryError::Unavailable("row lock timeout".to_string()));
        }
        self.inner.update_trust_score(id, score)
    }
}

pub(super) async fn read_json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    serde_json::from_slice(&bytes).expect("body is json")
}

pub(super) async fn read_text_body(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    String::from_utf8_lossy(&bytes).into_owned()
}

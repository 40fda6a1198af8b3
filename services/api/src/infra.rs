use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use vendor_intel::intelligence::{
    HistoryFilter, RepositoryError, ScoringConfig, Vendor, VendorDocument, VendorId,
    VendorPerformanceHistory, VendorProduct, VendorRepository,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct VendorStore {
    vendors: BTreeMap<VendorId, Vendor>,
    documents: Vec<VendorDocument>,
    history: Vec<VendorPerformanceHistory>,
    products: Vec<VendorProduct>,
}

/// Mutex-backed stand-in for the platform's vendor store. The service runs
/// against it until the real repository adapter is wired in.
#[derive(Default, Clone)]
pub(crate) struct InMemoryVendorRepository {
    store: Arc<Mutex<VendorStore>>,
}

impl InMemoryVendorRepository {
    pub(crate) fn insert_vendor(&self, vendor: Vendor) {
        let mut store = self.store.lock().expect("vendor store mutex poisoned");
        store.vendors.insert(vendor.id, vendor);
    }

    pub(crate) fn insert_document(&self, document: VendorDocument) {
        let mut store = self.store.lock().expect("vendor store mutex poisoned");
        store.documents.push(document);
    }

    pub(crate) fn insert_product(&self, product: VendorProduct) {
        let mut store = self.store.lock().expect("vendor store mutex poisoned");
        store.products.push(product);
    }

    /// One row per (vendor, month): an existing row for the pair is
    /// replaced, never duplicated.
    pub(crate) fn upsert_history(&self, row: VendorPerformanceHistory) {
        let mut store = self.store.lock().expect("vendor store mutex poisoned");
        match store
            .history
            .iter_mut()
            .find(|existing| existing.vendor_id == row.vendor_id && existing.month == row.month)
        {
            Some(existing) => *existing = row,
            None => store.history.push(row),
        }
    }
}

impl VendorRepository for InMemoryVendorRepository {
    fn vendor(&self, id: VendorId) -> Result<Option<Vendor>, RepositoryError> {
        let store = self.store.lock().expect("vendor store mutex poisoned");
        Ok(store.vendors.get(&id).cloned())
    }

    fn vendors(&self) -> Result<Vec<Vendor>, RepositoryError> {
        let store = self.store.lock().expect("vendor store mutex poisoned");
        let mut vendors: Vec<Vendor> = store.vendors.values().cloned().collect();
        vendors.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(vendors)
    }

    fn documents(
        &self,
        vendor_id: Option<VendorId>,
    ) -> Result<Vec<VendorDocument>, RepositoryError> {
        let store = self.store.lock().expect("vendor store mutex poisoned");
        Ok(store
            .documents
            .iter()
            .filter(|doc| vendor_id.map(|id| doc.vendor_id == id).unwrap_or(true))
            .cloned()
            .collect())
    }

    fn performance_history(
        &self,
        filter: &HistoryFilter,
    ) -> Result<Vec<VendorPerformanceHistory>, RepositoryError> {
        let store = self.store.lock().expect("vendor store mutex poisoned");
        Ok(store
            .history
            .iter()
            .filter(|row| filter.matches(row))
            .cloned()
            .collect())
    }

    fn products(&self) -> Result<Vec<VendorProduct>, RepositoryError> {
        let store = self.store.lock().expect("vendor store mutex poisoned");
        Ok(store.products.clone())
    }

    fn update_trust_score(&self, id: VendorId, score: f64) -> Result<(), RepositoryError> {
        let mut store = self.store.lock().expect("vendor store mutex poisoned");
        let vendor = store.vendors.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        vendor.trust_score = Some(score);
        Ok(())
    }
}

pub(crate) fn default_scoring_config() -> ScoringConfig {
    ScoringConfig::default()
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

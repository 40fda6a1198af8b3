//! Regulatory document audit: per-vendor presence/validity/expiry of the
//! four required categories, a fleet summary, and JSON/CSV exports.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::config::ScoringConfig;
use super::domain::{Vendor, VendorDocument, VendorId, VendorStatus};
use super::repository::{RepositoryError, VendorRepository};

/// Document categories every vendor must keep on file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequiredDoc {
    Cr,
    Tax,
    Iso,
    Insurance,
}

impl RequiredDoc {
    pub const ALL: [RequiredDoc; 4] = [
        RequiredDoc::Cr,
        RequiredDoc::Tax,
        RequiredDoc::Iso,
        RequiredDoc::Insurance,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            RequiredDoc::Cr => "CR",
            RequiredDoc::Tax => "TAX",
            RequiredDoc::Iso => "ISO",
            RequiredDoc::Insurance => "INSURANCE",
        }
    }

    /// Case-insensitive substring containment, so "ISO9001" satisfies ISO.
    /// Intentionally loose: a type literally named "MISO" matches too.
    pub fn matches(self, doc_type: &str) -> bool {
        doc_type.to_ascii_uppercase().contains(self.label())
    }
}

/// Audit result for one vendor across the required categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorComplianceRow {
    pub vendor_id: VendorId,
    pub code: String,
    pub name: String,
    pub status: VendorStatus,
    pub has_cr: bool,
    pub cr_expiry: Option<NaiveDate>,
    pub has_tax: bool,
    pub tax_expiry: Option<NaiveDate>,
    pub has_iso: bool,
    pub iso_expiry: Option<NaiveDate>,
    pub has_insurance: bool,
    pub insurance_expiry: Option<NaiveDate>,
    pub missing: Vec<RequiredDoc>,
    pub expiring_soon: Vec<RequiredDoc>,
    pub invalid: Vec<RequiredDoc>,
}

impl VendorComplianceRow {
    pub fn fully_compliant(&self) -> bool {
        self.missing.is_empty() && self.invalid.is_empty()
    }
}

/// Fleet-wide roll-up of the per-vendor rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceSummary {
    pub total_vendors: usize,
    pub fully_compliant: usize,
    pub missing_docs: usize,
    pub expiring_soon: usize,
    pub invalid_docs: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub generated_at: DateTime<Utc>,
    pub window_days: i64,
    pub summary: ComplianceSummary,
    pub rows: Vec<VendorComplianceRow>,
}

/// Requested export shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct ExportOptions {
    pub days_ahead: Option<i64>,
    #[serde(default)]
    pub format: ExportFormat,
}

/// Rendered export ready for a download response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceExport {
    pub mime: String,
    pub filename: String,
    pub body: String,
}

/// Error raised while auditing or exporting compliance state.
#[derive(Debug, thiserror::Error)]
pub enum ComplianceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("failed to render compliance table: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to serialize compliance report: {0}")]
    Json(#[from] serde_json::Error),
}

struct CategoryAudit {
    present: bool,
    earliest_expiry: Option<NaiveDate>,
    expiring: bool,
    invalid: bool,
}

fn audit_category(
    documents: &[&VendorDocument],
    category: RequiredDoc,
    cutoff: NaiveDate,
) -> CategoryAudit {
    let matching: Vec<&&VendorDocument> = documents
        .iter()
        .filter(|doc| category.matches(&doc.doc_type))
        .collect();

    let earliest_expiry = matching.iter().filter_map(|doc| doc.expiry).min();

    CategoryAudit {
        present: !matching.is_empty(),
        earliest_expiry,
        expiring: earliest_expiry.is_some_and(|expiry| expiry <= cutoff),
        invalid: matching.iter().any(|doc| !doc.valid),
    }
}

fn audit_vendor(vendor: &Vendor, documents: &[&VendorDocument], cutoff: NaiveDate) -> VendorComplianceRow {
    let cr = audit_category(documents, RequiredDoc::Cr, cutoff);
    let tax = audit_category(documents, RequiredDoc::Tax, cutoff);
    let iso = audit_category(documents, RequiredDoc::Iso, cutoff);
    let insurance = audit_category(documents, RequiredDoc::Insurance, cutoff);

    let mut missing = Vec::new();
    let mut expiring_soon = Vec::new();
    let mut invalid = Vec::new();
    for (category, audit) in RequiredDoc::ALL.into_iter().zip([&cr, &tax, &iso, &insurance]) {
        if !audit.present {
            missing.push(category);
        }
        if audit.expiring {
            expiring_soon.push(category);
        }
        if audit.invalid {
            invalid.push(category);
        }
    }

    VendorComplianceRow {
        vendor_id: vendor.id,
        code: vendor.code.clone(),
        name: vendor.name.clone(),
        status: vendor.status,
        has_cr: cr.present,
        cr_expiry: cr.earliest_expiry,
        has_tax: tax.present,
        tax_expiry: tax.earliest_expiry,
        has_iso: iso.present,
        iso_expiry: iso.earliest_expiry,
        has_insurance: insurance.present,
        insurance_expiry: insurance.earliest_expiry,
        missing,
        expiring_soon,
        invalid,
    }
}

fn summarize(rows: &[VendorComplianceRow]) -> ComplianceSummary {
    ComplianceSummary {
        total_vendors: rows.len(),
        fully_compliant: rows.iter().filter(|row| row.fully_compliant()).count(),
        missing_docs: rows.iter().filter(|row| !row.missing.is_empty()).count(),
        expiring_soon: rows.iter().filter(|row| !row.expiring_soon.is_empty()).count(),
        invalid_docs: rows.iter().filter(|row| !row.invalid.is_empty()).count(),
    }
}

/// Flat delimited rendering with standard CSV quoting, one header row and
/// one row per vendor.
pub fn to_csv(report: &ComplianceReport) -> Result<String, ComplianceError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "vendor_id",
        "code",
        "name",
        "status",
        "has_cr",
        "cr_expiry",
        "has_tax",
        "tax_expiry",
        "has_iso",
        "iso_expiry",
        "has_insurance",
        "insurance_expiry",
        "missing",
        "expiring_soon",
        "invalid",
    ])?;

    for row in &report.rows {
        writer.write_record([
            row.vendor_id.to_string(),
            row.code.clone(),
            row.name.clone(),
            row.status.label().to_string(),
            row.has_cr.to_string(),
            date_field(row.cr_expiry),
            row.has_tax.to_string(),
            date_field(row.tax_expiry),
            row.has_iso.to_string(),
            date_field(row.iso_expiry),
            row.has_insurance.to_string(),
            date_field(row.insurance_expiry),
            join_categories(&row.missing),
            join_categories(&row.expiring_soon),
            join_categories(&row.invalid),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ComplianceError::Csv(csv::Error::from(err.into_error())))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn date_field(expiry: Option<NaiveDate>) -> String {
    expiry.map(|date| date.to_string()).unwrap_or_default()
}

fn join_categories(categories: &[RequiredDoc]) -> String {
    categories
        .iter()
        .map(|category| category.label())
        .collect::<Vec<_>>()
        .join("|")
}

/// Aggregates document state into per-vendor rows plus a fleet summary.
pub struct ComplianceAuditor<R> {
    repository: Arc<R>,
    config: ScoringConfig,
}

impl<R> ComplianceAuditor<R>
where
    R: VendorRepository,
{
    pub fn new(repository: Arc<R>, config: ScoringConfig) -> Self {
        Self { repository, config }
    }

    /// Build the structured report. `days_ahead` overrides the configured
    /// lookahead window.
    pub fn build_report(
        &self,
        days_ahead: Option<i64>,
        today: NaiveDate,
    ) -> Result<ComplianceReport, ComplianceError> {
        let window_days = days_ahead.unwrap_or(self.config.lookahead_days);
        let cutoff = today + Duration::days(window_days);

        let mut vendors = self.repository.vendors()?;
        vendors.sort_by(|a, b| a.name.cmp(&b.name));

        let documents = self.repository.documents(None)?;
        let mut by_vendor: HashMap<VendorId, Vec<&VendorDocument>> = HashMap::new();
        for doc in &documents {
            by_vendor.entry(doc.vendor_id).or_default().push(doc);
        }

        let rows: Vec<VendorComplianceRow> = vendors
            .iter()
            .map(|vendor| {
                audit_vendor(
                    vendor,
                    by_vendor.get(&vendor.id).map(Vec::as_slice).unwrap_or(&[]),
                    cutoff,
                )
            })
            .collect();

        Ok(ComplianceReport {
            generated_at: Utc::now(),
            window_days,
            summary: summarize(&rows),
            rows,
        })
    }

    /// Facade used by download handlers: builds the report and renders it in
    /// the requested shape with a download filename.
    pub fn generate(
        &self,
        options: &ExportOptions,
        today: NaiveDate,
    ) -> Result<ComplianceExport, ComplianceError> {
        let report = self.build_report(options.days_ahead, today)?;

        match options.format {
            ExportFormat::Csv => Ok(ComplianceExport {
                mime: mime::TEXT_CSV_UTF_8.to_string(),
                filename: format!("vendors-compliance-{}d.csv", report.window_days),
                body: to_csv(&report)?,
            }),
            ExportFormat::Json => Ok(ComplianceExport {
                mime: mime::APPLICATION_JSON.to_string(),
                filename: format!("vendors-compliance-{}d.json", report.window_days),
                body: serde_json::to_string_pretty(&report)?,
            }),
        }
    }
}

use crate::infra::{default_scoring_config, InMemoryVendorRepository};
use chrono::{Datelike, Local, NaiveDate};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use vendor_intel::error::AppError;
use vendor_intel::intelligence::{
    ComplianceReport, ExportFormat, ExportOptions, Vendor, VendorDocument, VendorId,
    VendorIntelligence, VendorPerformanceHistory, VendorProduct, VendorRepository, VendorRisk,
    VendorStatus,
};

#[derive(Args, Debug, Default)]
pub(crate) struct RiskArgs {
    /// Stamp each row with the month being forecast instead of assessing today
    #[arg(long)]
    pub(crate) forecast: bool,
    /// Override the assessment date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ComplianceArgs {
    /// Lookahead window in days for expiring documents
    #[arg(long)]
    pub(crate) days_ahead: Option<i64>,
    /// Export format
    #[arg(long, value_enum, default_value_t = ExportFormatArg::Json)]
    pub(crate) format: ExportFormatArg,
    /// Write the export to a file instead of stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Override the audit date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum ExportFormatArg {
    #[default]
    Json,
    Csv,
}

impl From<ExportFormatArg> for ExportFormat {
    fn from(arg: ExportFormatArg) -> Self {
        match arg {
            ExportFormatArg::Json => ExportFormat::Json,
            ExportFormatArg::Csv => ExportFormat::Csv,
        }
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the evaluation date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_risk_report(args: RiskArgs) -> Result<(), AppError> {
    let RiskArgs { forecast, today } = args;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let repository = Arc::new(seed_fleet());
    let engine = VendorIntelligence::new(repository, default_scoring_config());

    let rows = if forecast {
        engine.risk.predict_next_month(today)?
    } else {
        engine.risk.assess_vendors(today)?
    };

    render_risk_table(&rows, today, forecast);
    Ok(())
}

pub(crate) fn run_compliance_export(args: ComplianceArgs) -> Result<(), AppError> {
    let ComplianceArgs {
        days_ahead,
        format,
        output,
        today,
    } = args;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let repository = Arc::new(seed_fleet());
    let engine = VendorIntelligence::new(repository, default_scoring_config());

    let options = ExportOptions {
        days_ahead,
        format: format.into(),
    };
    let export = engine.compliance.generate(&options, today)?;

    match output {
        Some(path) => {
            std::fs::write(&path, export.body.as_bytes())?;
            println!(
                "Wrote {} ({}) to {}",
                export.filename,
                export.mime,
                path.display()
            );
        }
        None => println!("{}", export.body),
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { today } = args;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    println!("Vendor intelligence demo (evaluated {today})");

    let repository = Arc::new(seed_fleet());
    let engine = VendorIntelligence::new(repository.clone(), default_scoring_config());

    let outcome = engine.trust.recompute_all(today)?;
    println!(
        "\nTrust scores: {} vendors updated, {} failures",
        outcome.updated,
        outcome.failures.len()
    );
    for failure in &outcome.failures {
        println!("  - vendor {}: {}", failure.vendor_id, failure.reason);
    }
    let mut vendors = repository.vendors()?;
    vendors.sort_by(|a, b| {
        b.trust_score
            .unwrap_or(0.0)
            .total_cmp(&a.trust_score.unwrap_or(0.0))
    });
    for vendor in &vendors {
        let score = vendor
            .trust_score
            .map(|score| format!("{score:.2}"))
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "  - {} ({}) [{}] -> {}",
            vendor.name,
            vendor.code,
            vendor.status.label(),
            score
        );
    }

    let risk_rows = engine.risk.assess_vendors(today)?;
    render_risk_table(&risk_rows, today, false);

    let forecast_rows = engine.risk.predict_next_month(today)?;
    render_risk_table(&forecast_rows, today, true);

    let report = engine.compliance.build_report(None, today)?;
    render_compliance_report(&report);

    Ok(())
}

pub(crate) fn render_risk_table(rows: &[VendorRisk], today: NaiveDate, forecast: bool) {
    if forecast {
        let month = rows
            .iter()
            .find_map(|row| row.forecast_month)
            .map(|month| month.to_string())
            .unwrap_or_else(|| "n/a".to_string());
        println!("\nRisk forecast for {month} ({} vendors)", rows.len());
    } else {
        println!("\nRisk assessment as of {today} ({} vendors)", rows.len());
    }

    for row in rows {
        let alerts = if row.alerts.is_empty() {
            "none".to_string()
        } else {
            row.alerts
                .iter()
                .map(|alert| alert.label())
                .collect::<Vec<_>>()
                .join(", ")
        };
        println!(
            "- {} ({}) risk {:.2} | alerts: {}",
            row.name, row.code, row.risk_score, alerts
        );
        println!(
            "    otd {:.1} | lead {:.1}d | ppm {:.0} | docs expiring {} | air {:.0}% | single-source {:.0} | seasonal {:.0}",
            row.factors.otd,
            row.factors.lead_days,
            row.factors.ppm,
            row.factors.docs_expiring,
            row.factors.air_bias,
            row.factors.single_source,
            row.factors.seasonal
        );
    }
}

pub(crate) fn render_compliance_report(report: &ComplianceReport) {
    println!(
        "\nCompliance audit ({}-day window, generated {})",
        report.window_days, report.generated_at
    );
    println!(
        "- {} vendors | {} fully compliant | {} missing docs | {} expiring soon | {} invalid",
        report.summary.total_vendors,
        report.summary.fully_compliant,
        report.summary.missing_docs,
        report.summary.expiring_soon,
        report.summary.invalid_docs
    );

    for row in &report.rows {
        if row.fully_compliant() {
            println!("- {} ({}): compliant", row.name, row.code);
            continue;
        }
        println!("- {} ({}):", row.name, row.code);
        if !row.missing.is_empty() {
            println!("    missing: {}", join_labels(&row.missing));
        }
        if !row.expiring_soon.is_empty() {
            println!("    expiring soon: {}", join_labels(&row.expiring_soon));
        }
        if !row.invalid.is_empty() {
            println!("    invalid: {}", join_labels(&row.invalid));
        }
    }
}

fn join_labels(categories: &[vendor_intel::intelligence::RequiredDoc]) -> String {
    categories
        .iter()
        .map(|category| category.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Small supplier fleet used by the demo subcommands and the default
/// in-process server seed.
pub(crate) fn seed_fleet() -> InMemoryVendorRepository {
    let repository = InMemoryVendorRepository::default();
    let today = Local::now().date_naive();

    repository.insert_vendor(Vendor {
        id: VendorId(1),
        code: "GFW-104".to_string(),
        name: "Gulf Fastener Works".to_string(),
        status: VendorStatus::Approved,
        on_time_pct: Some(96.5),
        lead_time_avg_days: Some(12.0),
        quality_ppm: Some(180.0),
        price_index: Some(101.5),
        quote_resp_hrs: Some(6.0),
        trust_score: None,
        ship_modes: vec!["Ocean FCL".to_string(), "Truck LTL".to_string()],
        categories: vec!["Fasteners".to_string()],
        regions: vec!["US-South".to_string()],
    });
    repository.insert_vendor(Vendor {
        id: VendorId(2),
        code: "DLP-221".to_string(),
        name: "Deltaline Polymers, Ltd".to_string(),
        status: VendorStatus::Approved,
        on_time_pct: Some(72.0),
        lead_time_avg_days: Some(41.0),
        quality_ppm: Some(3400.0),
        price_index: Some(93.0),
        quote_resp_hrs: Some(55.0),
        trust_score: None,
        ship_modes: vec!["Air Express".to_string(), "Air Standard".to_string()],
        categories: vec!["Resins".to_string(), "Gaskets".to_string()],
        regions: vec!["EU-West".to_string()],
    });
    repository.insert_vendor(Vendor {
        id: VendorId(3),
        code: "NMC-733".to_string(),
        name: "Northstar Machining Co".to_string(),
        status: VendorStatus::Pending,
        on_time_pct: Some(88.0),
        lead_time_avg_days: Some(24.0),
        quality_ppm: Some(900.0),
        price_index: Some(108.0),
        quote_resp_hrs: Some(20.0),
        trust_score: None,
        ship_modes: vec!["Truck FTL".to_string()],
        categories: vec!["Machined Parts".to_string()],
        regions: vec!["US-Midwest".to_string()],
    });

    let far_expiry = Some(
        today.checked_add_signed(chrono::Duration::days(540))
            .unwrap_or(today),
    );
    for doc_type in ["CR Certificate", "Tax Clearance", "ISO 9001", "Insurance Policy"] {
        repository.insert_document(VendorDocument {
            vendor_id: VendorId(1),
            doc_type: doc_type.to_string(),
            number: Some(format!("GFW-{}", doc_type.len())),
            expiry: far_expiry,
            valid: true,
        });
    }
    repository.insert_document(VendorDocument {
        vendor_id: VendorId(2),
        doc_type: "CR Certificate".to_string(),
        number: Some("DLP-0092".to_string()),
        expiry: Some(
            today.checked_add_signed(chrono::Duration::days(10))
                .unwrap_or(today),
        ),
        valid: true,
    });
    repository.insert_document(VendorDocument {
        vendor_id: VendorId(2),
        doc_type: "ISO 14001".to_string(),
        number: None,
        expiry: far_expiry,
        valid: true,
    });
    repository.insert_document(VendorDocument {
        vendor_id: VendorId(2),
        doc_type: "Insurance Policy".to_string(),
        number: Some("DLP-INS-7".to_string()),
        expiry: far_expiry,
        valid: false,
    });
    repository.insert_document(VendorDocument {
        vendor_id: VendorId(3),
        doc_type: "Tax Clearance".to_string(),
        number: Some("NMC-TAX-3".to_string()),
        expiry: far_expiry,
        valid: true,
    });

    for idx in 0..5 {
        repository.insert_product(VendorProduct {
            vendor_id: VendorId(2),
            item_code: format!("GSK-{:03}", 100 + idx),
            price: 4.2 + idx as f64,
            moq: 500,
            lead_time_days: 35,
        });
    }
    repository.insert_product(VendorProduct {
        vendor_id: VendorId(1),
        item_code: "FST-010".to_string(),
        price: 0.12,
        moq: 10_000,
        lead_time_days: 14,
    });
    repository.insert_product(VendorProduct {
        vendor_id: VendorId(3),
        item_code: "FST-010".to_string(),
        price: 0.14,
        moq: 5_000,
        lead_time_days: 21,
    });

    for (months_back, otd) in [(1, 70.0), (2, 74.0), (3, 69.0)] {
        let month = today
            .checked_sub_months(chrono::Months::new(months_back))
            .unwrap_or(today)
            .with_day(1)
            .unwrap_or(today);
        repository.upsert_history(VendorPerformanceHistory {
            vendor_id: VendorId(2),
            month,
            on_time_pct: Some(otd),
            quality_ppm: Some(3100.0),
            disputes: 2,
            quotes_count: 11,
            avg_resp_hrs: Some(52.0),
            trust_score: None,
        });
    }

    repository
}

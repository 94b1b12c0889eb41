//! Blob store and catalog audit command.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use cabinet_core::config::AppConfig;
use cabinet_core::error::AppError;
use cabinet_service::ReconcileService;

use crate::output::{self, OutputFormat};

/// Arguments for the reconcile command
#[derive(Debug, Args)]
pub struct ReconcileArgs {
    /// Only audit this owner
    #[arg(short, long)]
    pub owner: Option<String>,
}

#[derive(Debug, Serialize, Tabled)]
struct DriftRow {
    problem: &'static str,
    key: String,
    detail: String,
}

/// Execute the reconcile command
pub async fn execute(
    args: &ReconcileArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let stores = super::connect(config).await?;
    let service = ReconcileService::new(stores.catalog.clone(), stores.blobs.clone(), stores.deadlines);
    let report = service.audit(args.owner.as_deref()).await?;
    stores.db.close().await;

    if format == OutputFormat::Json {
        output::print_json(&report);
        return Ok(());
    }

    output::print_kv("blobs checked", &report.blobs_checked.to_string());
    output::print_kv("rows checked", &report.rows_checked.to_string());
    if report.is_clean() {
        output::print_success("Blob store and catalog agree.");
        return Ok(());
    }

    let rows: Vec<DriftRow> = report
        .orphan_blobs
        .iter()
        .map(|key| DriftRow {
            problem: "orphan blob",
            key: key.clone(),
            detail: "no catalog row".to_string(),
        })
        .chain(report.dangling_rows.iter().map(|row| DriftRow {
            problem: "dangling row",
            key: row.storage_key.clone(),
            detail: format!("{:?} {} of {}", row.kind, row.name, row.owner),
        }))
        .collect();
    output::print_warning(&format!("{} problem(s) found", rows.len()));
    output::print_list(&rows, format);
    Ok(())
}

// Small analysis utility: profile a work-order CSV and export the cleaned
// hand-off file consumed by the modeling stage.
//
// Usage:
//   cargo run --bin profile_work_orders -- <work_orders.csv> [output_dir]
//
// This is intentionally lightweight and does not run the modeling pipeline.

use std::path::PathBuf;
use work_order_analytics::importer::csv_export::{write_cleaned_csv, CLEANED_EXPORT_FILE_NAME};
use work_order_analytics::{AnalysisConfig, AnalysisPipeline};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    work_order_analytics::logging::init();

    let mut args = std::env::args().skip(1);
    let csv_path = PathBuf::from(
        args.next()
            .ok_or("用法: profile_work_orders <工单CSV> [输出目录]")?,
    );
    let output_dir = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));

    let config = AnalysisConfig::default();
    let pipeline = AnalysisPipeline::new(config);
    let outcome = pipeline.profile(&csv_path)?;

    println!("{}", serde_json::to_string_pretty(&outcome.profile)?);

    let export_path = output_dir.join(CLEANED_EXPORT_FILE_NAME);
    write_cleaned_csv(&export_path, &outcome.cleaned)?;
    tracing::info!(
        rows = outcome.cleaned.len(),
        path = %export_path.display(),
        "清洗数据集已导出"
    );

    Ok(())
}

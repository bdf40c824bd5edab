// Entry point and high-level CLI flow.
//
// - Load and clean the document export, printing diagnostics.
// - Generate the bucketed report and the summary counters.
// - Export both (CSV + JSON) and print a Markdown preview.
use clap::Parser;
use log::info;
use registry_report::config::Cli;
use registry_report::types::{Document, ReportRow, ReportSummary};
use registry_report::{loader, output, reports, util};
use std::error::Error;

/// Load the export named on the command line and print what was found.
fn handle_load(cli: &Cli) -> Result<Vec<Document>, Box<dyn Error>> {
    let (documents, load_report) = loader::load_documents(&cli.input)?;
    println!(
        "Processing dataset... ({} rows read, {} documents, {} sub-forms)",
        util::format_int(load_report.total_rows),
        util::format_int(load_report.documents),
        util::format_int(load_report.sub_forms)
    );
    if load_report.dangling_sub_forms > 0 {
        println!(
            "Note: {} sub-forms without a document link or timestamp are ignored.",
            util::format_int(load_report.dangling_sub_forms)
        );
    }
    println!();
    Ok(documents)
}

fn handle_export(
    cli: &Cli,
    rows: &[ReportRow],
    summary: &ReportSummary,
) -> Result<(), Box<dyn Error>> {
    std::fs::create_dir_all(&cli.output_dir)?;
    let report_path = cli.report_path();
    output::write_csv(&report_path, rows)?;
    info!("wrote {} report rows to {}", rows.len(), report_path.display());
    let summary_path = cli.summary_path();
    output::write_json(&summary_path, summary)?;
    info!("wrote summary to {}", summary_path.display());
    println!(
        "(Full table exported to {}, summary to {})\n",
        report_path.display(),
        summary_path.display()
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let documents = handle_load(&cli)?;
    let rows = reports::generate_report(&documents, cli.granularity, cli.year)?;
    let summary = reports::generate_summary(&documents);

    let span = match cli.year {
        Some(y) => y.to_string(),
        None => match reports::detect_year_range(&documents) {
            Some((lo, hi)) => format!("{}–{}", lo, hi),
            None => "no data".to_string(),
        },
    };
    println!("Registry Report ({}, {})\n", cli.granularity.as_str(), span);
    output::preview_table_rows(&rows, cli.preview_rows);

    println!("Summary Stats:");
    println!(
        "{{\"registered\": {}, \"unregistered\": {}, \"marriage\": {}, \"birth\": {}, \"death\": {}}}\n",
        util::format_int(summary.registered_documents),
        util::format_int(summary.unregistered_documents),
        util::format_int(summary.classifications.marriage),
        util::format_int(summary.classifications.birth),
        util::format_int(summary.classifications.death)
    );

    if !cli.no_export {
        handle_export(&cli, &rows, &summary)?;
    }
    Ok(())
}

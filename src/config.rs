use crate::types::Granularity;
use clap::Parser;
use std::path::PathBuf;

/// Period-bucketed statistics over a civil-registry document export.
#[derive(Debug, Clone, Parser)]
#[command(name = "registry_report", version)]
pub struct Cli {
    /// Document export to read (.json with nested subForms, or a .csv join export).
    #[arg(short, long, env = "REGISTRY_REPORT_INPUT")]
    pub input: PathBuf,

    #[arg(
        short,
        long,
        value_enum,
        default_value_t = Granularity::Monthly,
        env = "REGISTRY_REPORT_GRANULARITY"
    )]
    pub granularity: Granularity,

    /// Report a single year; omit to cover every year present in the input.
    #[arg(short, long, value_parser = parse_year_arg, env = "REGISTRY_REPORT_YEAR")]
    pub year: Option<i32>,

    #[arg(short, long, default_value = ".", env = "REGISTRY_REPORT_OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Rows shown in the console preview.
    #[arg(long, default_value_t = 5, env = "REGISTRY_REPORT_PREVIEW_ROWS")]
    pub preview_rows: usize,

    /// Print the preview only, without writing files.
    #[arg(long)]
    pub no_export: bool,
}

fn parse_year_arg(s: &str) -> Result<i32, String> {
    crate::util::parse_year(s).map_err(|e| e.to_string())
}

impl Cli {
    pub fn report_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("registry_report_{}.csv", self.granularity.as_str()))
    }

    pub fn summary_path(&self) -> PathBuf {
        self.output_dir.join("registry_summary.json")
    }
}

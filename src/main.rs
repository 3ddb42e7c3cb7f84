// Command-line driver: read one or more crossing CSVs, write the report.
use anyhow::{Context, Result};
use border_crossing_report::aggregate::{compute_averages, merge_totals, Totals};
use border_crossing_report::loader::{self, LoadReport};
use border_crossing_report::output;
use border_crossing_report::reports;
use border_crossing_report::util::format_int;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "border_crossing_report")]
#[command(about = "Monthly border crossing totals with running averages", long_about = None)]
struct Cli {
    /// Input CSV file(s); repeat to combine several
    #[arg(short, long, value_name = "FILE", default_value = "input/Border_Crossing_Entry_Data.csv")]
    input: Vec<PathBuf>,

    /// Report CSV to write
    #[arg(short, long, default_value = "output/report.csv")]
    output: PathBuf,

    /// Optional JSON run summary
    #[arg(long, value_name = "FILE")]
    summary: Option<PathBuf>,

    /// Rows to preview on stdout (0 disables)
    #[arg(long, default_value_t = 5)]
    preview: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut totals = Totals::new();
    let mut load = LoadReport::default();
    for path in &cli.input {
        let (part, part_load) = loader::load_totals(path)
            .with_context(|| format!("failed to load {}", path.display()))?;
        info!(
            "Processing {}... ({} rows, {} keys)",
            path.display(),
            format_int(part_load.total_rows),
            format_int(part_load.distinct_keys)
        );
        load.total_rows += part_load.total_rows;
        merge_totals(&mut totals, part)
            .with_context(|| format!("failed to combine totals from {}", path.display()))?;
    }
    load.distinct_keys = totals.len();

    let averages = compute_averages(&totals);
    let rows = reports::build_report(&totals, &averages);

    output::write_csv(&cli.output, &rows)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;
    info!(
        "Report written to {} ({} rows)",
        cli.output.display(),
        format_int(rows.len())
    );

    if let Some(path) = &cli.summary {
        let summary = reports::generate_summary(&load, &totals, &rows);
        output::write_json(path, &summary)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("Summary written to {}", path.display());
    }

    if cli.preview > 0 {
        println!("{}", output::render_preview(&rows, cli.preview));
    }

    Ok(())
}

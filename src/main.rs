// src/main.rs
mod extractors;
mod report;
mod scanner;
mod storage;
mod utils;
mod wordpress;

use clap::Parser;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use extractors::ShortcodeExtractor;
use storage::StorageManager;
use utils::progress::{BarProgress, ProgressReporter, SilentProgress};
use utils::AppError;
use wordpress::client::DEFAULT_TABLE_PREFIX;
use wordpress::SqliteContentStore;

/// Produces shortcode reports for published posts and pages, including
/// shortcodes that are no longer registered.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Export the results to a CSV file
    #[arg(long)]
    export: bool,

    /// The site to query (blog id, path slug or domain)
    #[arg(long)]
    site: Option<String>,

    /// Path to the WordPress SQLite database
    #[arg(short, long, env = "WP_DB_PATH")]
    database: PathBuf,

    /// Database table prefix
    #[arg(long, env = "WP_TABLE_PREFIX", default_value = DEFAULT_TABLE_PREFIX)]
    table_prefix: String,

    /// Directory for CSV exports (defaults to the directory of this executable)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,
}

#[derive(Debug)]
struct RunSummary {
    rows: usize,
    exported: Option<PathBuf>,
}

fn default_output_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Scans the selected site, writes the report table to `out` and exports on request.
fn run<P, W>(args: &Args, progress: &mut P, out: &mut W) -> Result<RunSummary, AppError>
where
    P: ProgressReporter + ?Sized,
    W: Write,
{
    // 1. Open the content store and switch site if asked
    let mut store = SqliteContentStore::open(&args.database, &args.table_prefix)?;
    if let Some(site) = &args.site {
        store.switch_to_site(site)?;
    }

    // 2. Walk every page of published content
    let rows = scanner::scan(&store, &ShortcodeExtractor::new(), progress)?;

    // 3. Display the table
    if rows.is_empty() {
        writeln!(out, "No shortcodes found.")?;
    } else {
        write!(out, "{}", report::render_table(&rows))?;
    }

    let mut summary = RunSummary { rows: rows.len(), exported: None };
    if !args.export {
        return Ok(summary);
    }

    // 4. Export
    if rows.is_empty() {
        tracing::warn!("Export requested but no shortcodes were found");
        writeln!(out, "No results to export, skipping CSV file.")?;
        return Ok(summary);
    }

    let output_dir = args.output_dir.clone().unwrap_or_else(default_output_dir);
    let storage = StorageManager::new(&output_dir)?;
    let today = chrono::Local::now().date_naive();
    let path = storage.save_csv(&rows, args.site.as_deref(), today)?;
    writeln!(out, "Success: Exported {} rows to {}", rows.len(), path.display())?;

    summary.exported = Some(path);
    Ok(summary)
}

fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting shortcode scrape for args: {:?}", args);

    // 3. Scan, report and export
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = if args.no_progress {
        run(&args, &mut SilentProgress, &mut out)
    } else {
        run(&args, &mut BarProgress::new(), &mut out)
    };

    let summary = result.map_err(|e| {
        tracing::error!("{}", e);
        e
    })?;
    tracing::info!("Processing finished. Rows: {}, exported: {:?}", summary.rows, summary.exported);

    Ok(())
}

// Declare modules
pub mod aggregator;
pub mod cli;
pub mod formatter;
pub mod manifest;
pub mod models;
pub mod paths;
pub mod projector;
pub mod vdf;

use anyhow::{bail, Result};
use clap::Parser;

use self::cli::{Action, Cli};
use self::models::ReportKind;
use self::paths::{normalize_path, Platform};

/// Initializes components and orchestrates data flow.
pub fn run() -> Result<()> {
    // 1. Parse Args
    let args = Cli::parse();
    let platform = Platform::current();

    // 2. Resolve library roots and scan directories
    let explicit_roots: Vec<String> = args
        .paths
        .iter()
        .map(|p| normalize_path(p, platform))
        .collect();
    let explicit_apps: Vec<String> = args
        .apps
        .iter()
        .map(|p| normalize_path(p, platform))
        .collect();
    let resolution = paths::resolve(&explicit_roots, &explicit_apps, platform);

    if resolution.scan_dirs.is_empty() {
        bail!("there's no steamapps directory to scan");
    }

    // 3. Aggregate manifests into a report
    let kind = match args.execute {
        Action::Export => ReportKind::export(args.fields()),
        Action::List => ReportKind::list(args.mode),
    };
    let report = aggregator::aggregate(&resolution.scan_dirs, &kind, platform);

    // 4. Serialize and deliver
    let text = formatter::render(args.output, &report)?;
    match args.save {
        Some(file) => formatter::persist(&text, &file, args.output)?,
        None => {
            // Exactly one trailing newline on stdout.
            print!("{text}");
            if !text.ends_with('\n') {
                println!();
            }
        }
    }

    Ok(())
}

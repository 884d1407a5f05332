use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::reconcile::Reconciler;
use crate::rules::RuleTables;
use crate::store::InMemoryRecordStore;

#[derive(Args)]
pub struct CheckArgs {
    /// Record set to audit (JSON array of records)
    #[arg(required = true)]
    pub records: PathBuf,

    /// Path to custom rule tables (JSON); built-in tables by default
    #[arg(long)]
    pub rules: Option<PathBuf>,
}

#[derive(Serialize)]
struct CheckReport {
    records: usize,
    language_closures: usize,
    relevant_closures: usize,
}

/// Execute the check subcommand: build and audit every closure, plan nothing.
///
/// # Errors
///
/// Returns an error (and a non-zero exit) on the first inconsistency.
pub fn run(args: CheckArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let store = InMemoryRecordStore::load_from_file(&args.records)?;
    let rules = match &args.rules {
        Some(path) => RuleTables::load_from_file(path)?,
        None => RuleTables::builtin(),
    };

    if verbose {
        eprintln!("Loaded {} records", store.len());
    }

    let reconciler = Reconciler::new(&store, &rules);
    let language = reconciler.language_closures()?;
    let relevant = reconciler.relevant_closures()?;

    let report = CheckReport {
        records: store.len(),
        language_closures: language.len(),
        relevant_closures: relevant.len(),
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => println!(
            "OK: {} records, {} language closures, {} relevant closures",
            report.records, report.language_closures, report.relevant_closures
        ),
    }

    Ok(())
}

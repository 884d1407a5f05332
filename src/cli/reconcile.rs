use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::reconcile::{Reconciler, RunSummary};
use crate::rules::RuleTables;
use crate::store::{InMemoryRecordStore, PlanCollector, PlannedWrite};

#[derive(Args)]
pub struct ReconcileArgs {
    /// Record set to reconcile (JSON array of records)
    #[arg(required = true)]
    pub records: PathBuf,

    /// Path to custom rule tables (JSON); built-in tables by default
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// Write the plan as JSON to this file instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(Serialize)]
struct PlanDocument<'a> {
    summary: RunSummary,
    writes: &'a [PlannedWrite],
}

/// Execute the reconcile subcommand.
///
/// # Errors
///
/// Returns an error if the record set or rule tables cannot be loaded, or if
/// the pipeline hits any inconsistency.
pub fn run(args: ReconcileArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let store = InMemoryRecordStore::load_from_file(&args.records)?;
    let rules = match &args.rules {
        Some(path) => RuleTables::load_from_file(path)?,
        None => RuleTables::builtin(),
    };

    if verbose {
        eprintln!("Loaded {} records", store.len());
    }

    let reconciler = Reconciler::new(&store, &rules);
    let mut sink = PlanCollector::new();
    let summary = reconciler.run(&mut sink)?;

    if let Some(out) = &args.out {
        let document = PlanDocument {
            summary,
            writes: &sink.writes,
        };
        std::fs::write(out, serde_json::to_string_pretty(&document)?)?;
        if verbose {
            eprintln!("Plan written to {}", out.display());
        }
        return Ok(());
    }

    match format {
        OutputFormat::Json => {
            let document = PlanDocument {
                summary,
                writes: &sink.writes,
            };
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
        OutputFormat::Text => {
            for write in &sink.writes {
                for reference in &write.references {
                    println!("{} {} += {}", write.key, write.kind, reference);
                }
            }
            println!(
                "{} records, {} language closures, {} relevant closures, {} writes planned",
                summary.records,
                summary.language_closures,
                summary.relevant_closures,
                summary.language_writes + summary.relevant_writes,
            );
        }
    }

    Ok(())
}

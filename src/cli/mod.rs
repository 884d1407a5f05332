//! Command-line interface for hymnlink.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **reconcile**: Run the full pipeline and emit the planned write-back diff
//! - **check**: Build and audit all closures without planning writes
//! - **translate**: Render one identifier in both external dialects
//!
//! ## Usage
//!
//! ```text
//! # Plan the write-back diff for a record set
//! hymnlink reconcile records.json --out plan.json
//!
//! # Audit only; non-zero exit on any inconsistency
//! hymnlink check records.json
//!
//! # Custom rule tables
//! hymnlink reconcile records.json --rules rules.json
//!
//! # Translate an identifier between dialects
//! hymnlink translate NS1087
//! hymnlink translate lb/87 --format json
//! ```

use clap::{Parser, Subcommand};

pub mod check;
pub mod reconcile;
pub mod translate;

#[derive(Parser)]
#[command(name = "hymnlink")]
#[command(version)]
#[command(about = "Reconcile hymn cross-references across two numbering schemes")]
#[command(
    long_about = "hymnlink reconciles the cross-references stored on hymn records under two incompatible numbering schemes.\n\nIt computes the transitive closure of translation/alternate-tune relationships, verifies each closure against cardinality and compatibility rules, and plans the minimal set of missing references to write back.\n\nAny inconsistency (dangling reference, overlapping closures, incompatible types) aborts the batch with full context so the rule tables can be corrected and the run repeated."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the pipeline and emit the planned write-back diff
    Reconcile(reconcile::ReconcileArgs),

    /// Build and audit all closures without planning writes
    Check(check::CheckArgs),

    /// Render one identifier in both external dialects
    Translate(translate::TranslateArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

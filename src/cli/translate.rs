use clap::Args;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::core::key::HymnKey;
use crate::parsing::{scheme_a, scheme_b};

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum Dialect {
    A,
    B,
}

#[derive(Args)]
pub struct TranslateArgs {
    /// Identifier to translate (scheme A token or scheme B path)
    #[arg(required = true)]
    pub id: String,

    /// Source dialect; inferred from the shape when omitted
    #[arg(long, value_enum)]
    pub from: Option<Dialect>,
}

#[derive(Serialize)]
struct Translation {
    hymn_type: String,
    number: String,
    variant: String,
    scheme_a: Option<String>,
    scheme_b: String,
}

/// Execute the translate subcommand: parse one identifier and render it in
/// both dialects. Handy when composing rule-table entries by hand.
///
/// # Errors
///
/// Returns an error if the identifier does not parse in the chosen dialect.
pub fn run(args: TranslateArgs, format: OutputFormat, _verbose: bool) -> anyhow::Result<()> {
    let key = parse(&args)?;

    // Some types have no scheme A rendering at all; that is worth showing,
    // not worth failing over
    let scheme_a = scheme_a::to_scheme_a(&key).ok();
    let translation = Translation {
        hymn_type: key.hymn_type.to_string(),
        number: key.number.clone(),
        variant: key.variant.clone(),
        scheme_a,
        scheme_b: scheme_b::to_scheme_b(&key),
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&translation)?),
        OutputFormat::Text => {
            println!("type:     {}", translation.hymn_type);
            println!("number:   {}", translation.number);
            if !translation.variant.is_empty() {
                println!("variant:  {}", translation.variant);
            }
            println!(
                "scheme A: {}",
                translation.scheme_a.as_deref().unwrap_or("(none)")
            );
            println!("scheme B: {}", translation.scheme_b);
        }
    }

    Ok(())
}

fn parse(args: &TranslateArgs) -> anyhow::Result<HymnKey> {
    let key = match args.from {
        Some(Dialect::A) => scheme_a::parse_scheme_a(&args.id)?,
        Some(Dialect::B) => scheme_b::parse_scheme_b(&args.id)?,
        None => {
            if args.id.contains('/') {
                scheme_b::parse_scheme_b(&args.id)?
            } else {
                scheme_a::parse_scheme_a(&args.id)?
            }
        }
    };
    Ok(key)
}

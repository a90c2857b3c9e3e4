mod cli;
mod convert;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use crate::cli::{CliArgs, Command, Target};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    match args.command {
        Command::Convert {
            kind,
            to,
            variant,
            input,
        } => {
            let data = convert::read_input(&input)?;
            debug!(?kind, ?to, bytes = data.len(), "converting");
            let output = match to {
                Target::Schema => {
                    serde_json::to_string_pretty(&convert::json_to_schema(kind, &data)?)?
                }
                Target::Json => convert::schema_to_json(kind, &data, variant.as_deref())?,
            };
            println!("{output}");
        }
        Command::Schema { kind, variant } => {
            let schema = convert::schema_for(kind, variant.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }

    Ok(())
}

use clap::{Parser, Subcommand, ValueEnum};

/// Convert monitoring configuration between the REST API's JSON and the
/// declarative-schema tree.
#[derive(Parser, Debug)]
#[command(name = "monconf", version, about)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert one entity; the input format is the opposite of `--to`.
    Convert {
        #[arg(long, value_enum)]
        kind: Kind,

        /// Output representation
        #[arg(long, value_enum)]
        to: Target,

        /// Comparison discriminator (e.g. INDEXED_NAME), needed to read a
        /// comparison tree that does not carry `type`
        #[arg(long)]
        variant: Option<String>,

        /// Input file, `-` for stdin
        #[arg(default_value = "-")]
        input: String,
    },

    /// Print the field schema of an entity kind as JSON.
    Schema {
        #[arg(long, value_enum)]
        kind: Kind,

        /// Comparison discriminator; required for `--kind comparison`
        #[arg(long)]
        variant: Option<String>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Comparison,
    Condition,
    AutotagRule,
    Slo,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Schema,
    Json,
}

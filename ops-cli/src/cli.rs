use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use pricing_service::AlternativeKind;
use rust_decimal::Decimal;

/// ClaimLens medical bill analysis
#[derive(Parser, Debug)]
#[command(name = "claimlens", version)]
#[command(about = "Check medical bills against an insurance policy and market prices")]
pub struct Cli {
    /// Configuration file (YAML or TOML)
    #[arg(short, long, global = true, env = "CLAIMLENS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyse a bill: JSON or YAML bill, or a labelled text document
    Analyze {
        file: PathBuf,

        /// Policy document to use instead of the configured one
        #[arg(long)]
        policy: Option<PathBuf>,

        /// Include the patient summary
        #[arg(long)]
        summary: bool,
    },

    /// Parse a policy document and print the policy
    ParsePolicy { file: PathBuf },

    /// Find cheaper brands or providers for an item
    Alternatives {
        name: String,

        /// Price that was billed
        #[arg(long)]
        price: Decimal,

        #[arg(long, value_enum, default_value_t = ItemKind::Medicine)]
        kind: ItemKind,
    },

    /// Run the billing HTTP API
    Serve {
        /// Overrides `server.bind_address`
        #[arg(long)]
        bind: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ItemKind {
    Medicine,
    Procedure,
}

impl From<ItemKind> for AlternativeKind {
    fn from(kind: ItemKind) -> Self {
        match kind {
            ItemKind::Medicine => Self::Medicine,
            ItemKind::Procedure => Self::Procedure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from(["claimlens", "--config", "claimlens.yaml", "analyze", "bill.json", "--summary"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("claimlens.yaml")));
        match cli.command {
            Command::Analyze { file, policy, summary } => {
                assert_eq!(file, PathBuf::from("bill.json"));
                assert!(policy.is_none());
                assert!(summary);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_alternatives() {
        let cli = Cli::try_parse_from(["claimlens", "alternatives", "Paracetamol", "--price", "65.50", "--kind", "procedure"])
            .unwrap();
        match cli.command {
            Command::Alternatives { name, price, kind } => {
                assert_eq!(name, "Paracetamol");
                assert_eq!(price, Decimal::new(6_550, 2));
                assert_eq!(AlternativeKind::from(kind), AlternativeKind::Procedure);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_rejects_bad_price() {
        assert!(Cli::try_parse_from(["claimlens", "alternatives", "Paracetamol", "--price", "cheap"]).is_err());
    }
}

use clap::{Parser, Subcommand};

use crate::domain::GroupSpec;

/// Parses a group specification of the form "MofN", "M-of-N", or "M/N"
fn parse_group_spec(s: &str) -> Result<GroupSpec, String> {
    let normalized = s.to_lowercase().replace("-of-", "/").replace("of", "/");
    let (threshold, count) = normalized
        .split_once('/')
        .ok_or_else(|| format!("'{s}' is not a group spec like '2of3'"))?;
    let threshold: u8 = threshold
        .trim()
        .parse()
        .map_err(|_| format!("'{threshold}' is not a valid member threshold"))?;
    let count: u8 = count
        .trim()
        .parse()
        .map_err(|_| format!("'{count}' is not a valid member count"))?;
    GroupSpec::new(threshold, count).map_err(|e| e.to_string())
}

fn parse_exponent(s: &str) -> Result<u8, String> {
    let value: u8 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if value > 15 {
        return Err(format!("iteration exponent must be 0..=15, got {value}"));
    }
    Ok(value)
}

#[derive(Parser)]
#[command(name = "splinter")]
#[command(about = "Split a master secret into SLIP-0039 mnemonic shares")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split a master secret into mnemonic share groups
    Split {
        /// Number of groups required to reconstruct the secret
        #[arg(short = 't', long, default_value_t = 1)]
        group_threshold: u8,

        /// Group specification, repeatable: e.g. -g 2of3 -g 3of5
        #[arg(short, long = "group", value_parser = parse_group_spec, required = true)]
        groups: Vec<GroupSpec>,

        /// PBKDF2 iteration exponent (0..=15); work scales with 2^e
        #[arg(short = 'e', long, default_value_t = 1, value_parser = parse_exponent)]
        exponent: u8,

        /// Create an extendable backup (more groups can be added later)
        #[arg(long)]
        extendable: bool,

        /// Prompt for an encryption passphrase
        #[arg(short, long)]
        passphrase: bool,
    },
    /// Combine mnemonic shares to reconstruct the master secret
    Combine {
        /// Prompt for the decryption passphrase
        #[arg(short, long)]
        passphrase: bool,
    },
    /// Show the metadata of a single share without recovering any secret
    Inspect,
}

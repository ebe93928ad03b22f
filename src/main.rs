use std::io::{self, BufRead};

use anyhow::{Context, Result};
use clap::Parser;
use zeroize::Zeroizing;

use splinter::cli::{Cli, Commands};
use splinter::commands::{combine_shares, inspect_share, split_secret};
use splinter::domain::SplitConfig;

/// Read the master secret from stdin (hidden input when a TTY is attached)
fn read_secret() -> Result<String> {
    if atty::is(atty::Stream::Stdin) {
        eprintln!("Enter the master secret (hex or BIP-39 mnemonic):");
        rpassword::read_password().context("failed to read the secret from stdin")
    } else {
        let stdin = io::stdin();
        let mut secret = String::new();
        stdin
            .lock()
            .read_line(&mut secret)
            .context("failed to read the secret from stdin")?;
        Ok(secret.trim().to_string())
    }
}

/// Read share mnemonics from stdin, one per line, empty line to finish
fn read_shares() -> Result<Vec<String>> {
    let mut shares = Vec::new();

    if atty::is(atty::Stream::Stdin) {
        eprintln!("Enter share mnemonics (one per line, empty line to finish):");
        loop {
            let share =
                rpassword::read_password().context("failed to read a share from stdin")?;
            if share.trim().is_empty() {
                break;
            }
            shares.push(share.trim().to_string());
        }
    } else {
        for line in io::stdin().lock().lines() {
            let line = line.context("failed to read a line from stdin")?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                break;
            }
            shares.push(trimmed.to_string());
        }
    }

    if shares.is_empty() {
        anyhow::bail!("no shares provided");
    }

    Ok(shares)
}

/// Prompt for a passphrase on the controlling terminal when requested
fn read_passphrase(prompt_requested: bool) -> Result<Zeroizing<String>> {
    if !prompt_requested {
        return Ok(Zeroizing::new(String::new()));
    }
    let passphrase = rpassword::prompt_password("Passphrase: ")
        .context("failed to read the passphrase")?;
    Ok(Zeroizing::new(passphrase))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Split {
            group_threshold,
            groups,
            exponent,
            extendable,
            passphrase,
        } => {
            let config = SplitConfig::new(group_threshold, groups)?;
            let passphrase = read_passphrase(passphrase)?;
            let secret = Zeroizing::new(read_secret()?);
            split_secret(&secret, &config, &passphrase, exponent, extendable)?;
        }
        Commands::Combine { passphrase } => {
            let passphrase = read_passphrase(passphrase)?;
            let shares = read_shares()?;
            combine_shares(&shares, &passphrase)?;
        }
        Commands::Inspect => {
            let shares = read_shares()?;
            for share in &shares {
                inspect_share(share)?;
                println!();
            }
        }
    }

    Ok(())
}

use anyhow::{bail, Context, Result};
use bip39::{Language, Mnemonic};
use zeroize::Zeroizing;

use crate::domain::SplitConfig;
use crate::{combine_mnemonics, decode_mnemonic, generate_mnemonics};

/// Interpret the secret input as hex, or fall back to a BIP-39 mnemonic
/// whose entropy becomes the master secret.
fn parse_master_secret(input: &str) -> Result<Zeroizing<Vec<u8>>> {
    let trimmed = input.trim();
    if let Ok(bytes) = hex::decode(trimmed) {
        return Ok(Zeroizing::new(bytes));
    }
    let mnemonic = Mnemonic::parse_in(Language::English, trimmed)
        .context("the secret is neither hex nor a valid BIP-39 mnemonic")?;
    Ok(Zeroizing::new(mnemonic.to_entropy()))
}

/// Split a master secret into mnemonic share groups and print them
///
/// # Errors
/// Returns an error if the secret cannot be parsed or the split parameters
/// are rejected by the library
pub fn split_secret(
    secret_input: &str,
    config: &SplitConfig,
    passphrase: &str,
    iteration_exponent: u8,
    extendable: bool,
) -> Result<()> {
    let master_secret = parse_master_secret(secret_input)?;
    println!("Master secret: {} bytes", master_secret.len());

    let groups = generate_mnemonics(
        config,
        &master_secret,
        passphrase,
        iteration_exponent,
        extendable,
    )
    .context("failed to split the master secret")?;

    let group_threshold = config.group_threshold();
    println!(
        "\nCreated {} group(s); {group_threshold} group(s) required to reconstruct.\n",
        groups.len()
    );

    for (group_index, (spec, mnemonics)) in
        config.groups().iter().zip(&groups).enumerate()
    {
        println!(
            "Group {} of {} - {} of {} shares required:",
            group_index + 1,
            groups.len(),
            spec.member_threshold(),
            spec.member_count()
        );
        for mnemonic in mnemonics {
            println!("  {mnemonic}");
        }
        println!();
    }

    Ok(())
}

/// Combine mnemonic shares and print the recovered master secret
///
/// # Errors
/// Returns an error if the shares do not form a recoverable set
pub fn combine_shares(share_strings: &[String], passphrase: &str) -> Result<()> {
    if share_strings.is_empty() {
        bail!("no shares provided");
    }

    println!("Combining {} share(s)...", share_strings.len());
    let master_secret = combine_mnemonics(share_strings, passphrase)
        .context("failed to reconstruct the master secret")?;

    println!("\nRecovered master secret (hex):");
    println!("{}", hex::encode(&*master_secret));

    // Entropy of a BIP-39-compatible length also round-trips to words.
    if let Ok(mnemonic) = Mnemonic::from_entropy(&master_secret) {
        println!("\nAs a BIP-39 mnemonic:");
        println!("{mnemonic}");
    }

    Ok(())
}

/// Print the metadata of one share without touching secret material
///
/// # Errors
/// Returns an error if the mnemonic fails to decode
pub fn inspect_share(mnemonic: &str) -> Result<()> {
    let share = decode_mnemonic(mnemonic).context("failed to decode the share")?;

    println!("Identifier:         {}", share.identifier);
    println!("Extendable:         {}", share.extendable);
    println!("Iteration exponent: {}", share.iteration_exponent);
    println!(
        "Group:              {} of {} (index {})",
        share.group_threshold, share.group_count, share.group_index
    );
    println!(
        "Member:             threshold {} (index {})",
        share.member_threshold, share.member_index
    );
    println!("Share value length: {} bytes", share.value.len());

    Ok(())
}

// src/bin/dev_runner.rs
use anyhow::{Context, Result};
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use tracing::{info, warn};

use lp_inspector::{
    analysis::{assess_mint, position_range_or_fallback},
    config::Config,
    decoders::{decode_account, DecodeError, DecodedAccount, MintAccount, Position},
    monitoring::setup_logging,
    rpc::ResilientRpcClient,
};

// --- BANC D'ESSAI ---

// Comptes utilisés quand aucune adresse n'est passée en argument.
const DEFAULT_ACCOUNTS: [&str; 2] = [
    "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v", // USDC (SPL Token)
    "2b1kV6DkPAnxd5ixfnxCpjxmKwqjjaYmCZfHsFu24GXo", // PYUSD (Token-2022)
];

// Paire de référence pour convertir les ticks : WSOL (9) / USDC (6).
const DECIMALS_A: u8 = 9;
const DECIMALS_B: u8 = 6;

fn print_mint(address: &Pubkey, mint: &MintAccount) -> Result<()> {
    println!("\n--- Mint {} ---", address);
    println!("-> Supply: {} (decimals: {})", mint.ui_supply(), mint.decimals);
    println!("-> Token-2022: {}", mint.is_token_extensions);
    for extension in &mint.extensions {
        println!("-> Extension: {:?}", extension);
    }
    if let Some(truncated) = &mint.extensions_truncated {
        println!("!! Zone d'extensions tronquée: {:?}", truncated);
    }
    let report = assess_mint(mint, None);
    println!("-> Sécurité: {}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn print_position(address: &Pubkey, position: Position) -> Result<()> {
    println!("\n--- Position {} ---", address);
    let range = position_range_or_fallback(Ok(position), DECIMALS_A, DECIMALS_B, None)?;
    if range.value().is_heuristic() {
        println!("!! Ticks trouvés par heuristique, à vérifier.");
    }
    println!("-> Plage: {}", serde_json::to_string_pretty(range.value())?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;
    let config = Config::load().context("Chargement de la configuration")?;

    if !config.enable_blockchain_data {
        warn!("ENABLE_BLOCKCHAIN_DATA=false : aucune donnée à décoder.");
        return Ok(());
    }

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    // `--nft <mint>...` : les adresses sont des mints de NFT de position.
    let by_nft_mint = args.first().is_some_and(|a| a == "--nft");
    if by_nft_mint {
        args.remove(0);
    }
    let addresses: Vec<Pubkey> = if args.is_empty() {
        DEFAULT_ACCOUNTS.iter().map(|a| Pubkey::from_str(a)).collect::<Result<_, _>>()?
    } else {
        args.iter()
            .map(|a| Pubkey::from_str(a).with_context(|| format!("Adresse invalide : {}", a)))
            .collect::<Result<_>>()?
    };

    let clmm_program_ids = config.clmm_program_ids()?;
    let client = ResilientRpcClient::new(config.solana_rpc_url.clone(), config.retry_config());
    info!(count = addresses.len(), rpc = %config.solana_rpc_url, "Lancement du banc d'essai des décodeurs.");

    if by_nft_mint {
        for mint in &addresses {
            match client.find_position_by_nft_mint(mint, &clmm_program_ids).await {
                Ok((account, position)) => print_position(&account, position)?,
                Err(e) => println!("!! NFT {} : {}", mint, e),
            }
        }
        println!("\n--- Banc d'essai terminé ---");
        return Ok(());
    }

    let accounts = client
        .get_raw_accounts(&addresses)
        .await
        .context("Récupération des comptes")?;

    for (address, account) in addresses.iter().zip(accounts) {
        let raw = match account {
            Ok(raw) => raw,
            Err(e) => {
                println!("!! {} : {}", address, e);
                continue;
            }
        };
        match decode_account(&raw, &clmm_program_ids) {
            Ok(DecodedAccount::Mint(mint)) => print_mint(address, &mint)?,
            Ok(DecodedAccount::Position(position)) => print_position(address, position)?,
            Err(DecodeError::UnexpectedOwner { owner }) => {
                println!("!! {} : programme {} non pris en charge", address, owner);
            }
            Err(e) => println!("!! {} : décodage impossible ({})", address, e),
        }
    }

    println!("\n--- Banc d'essai terminé ---");
    Ok(())
}

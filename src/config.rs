use anyhow::{Context, Result};
use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;
use std::{str::FromStr, time::Duration};

use crate::rpc::RetryConfig;

/// Les trois programmes Raydium CLMM connus (actuel, ancien, devnet).
pub const DEFAULT_CLMM_PROGRAM_IDS: [&str; 3] = [
    "CAMMCzo5YL8w4VFF8KVHrK22GGUsp5VTaW7grrKgrWqK",
    "CAMMCzo5YL8w4VFF8KVHrK22GGUQpMkFr9g8CV6sjMjA",
    "devi51mZmdwUJGU9hjN27vEz64Gps7uUefqxg27EAtH",
];

fn default_max_retries() -> u32 {
    5
}

fn default_retry_delay_ms() -> u64 {
    2000
}

fn default_transient_retry_delay_ms() -> u64 {
    1000
}

fn default_enable_blockchain_data() -> bool {
    true
}

fn default_clmm_program_ids() -> Vec<String> {
    DEFAULT_CLMM_PROGRAM_IDS.iter().map(|id| id.to_string()).collect()
}

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub solana_rpc_url: String,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    #[serde(default = "default_transient_retry_delay_ms")]
    pub transient_retry_delay_ms: u64,
    /// Si faux, aucun appel RPC n'est fait.
    #[serde(default = "default_enable_blockchain_data")]
    pub enable_blockchain_data: bool,
    #[serde(default = "default_clmm_program_ids")]
    pub raydium_clmm_program_ids: Vec<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()?;
        Ok(config)
    }

    /// Même chose que `load`, à partir d'une liste explicite de variables.
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(vars)?;
        Ok(config)
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_retries: self.max_retries,
            base_delay: Duration::from_millis(self.retry_delay_ms),
            transient_delay: Duration::from_millis(self.transient_retry_delay_ms),
        }
    }

    pub fn clmm_program_ids(&self) -> Result<Vec<Pubkey>> {
        self.raydium_clmm_program_ids
            .iter()
            .map(|id| {
                Pubkey::from_str(id.trim())
                    .with_context(|| format!("Program id CLMM invalide : {}", id))
            })
            .collect()
    }
}

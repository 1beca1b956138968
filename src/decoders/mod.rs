// src/decoders/mod.rs

use anyhow::{anyhow, bail, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use solana_sdk::{account::Account, pubkey::Pubkey};
use thiserror::Error;

use crate::state::program_cache::{ProgramKind, PROGRAM_CACHE};

// --- 1. Déclarer tous nos modules de décodage ---
pub mod byte_cursor;
pub mod raydium;
pub mod spl_token_decoders;

// --- 2. Ré-exporter les éléments les plus utilisés ---
pub use byte_cursor::ByteCursor;
pub use raydium::clmm::{decode_position, Position, PositionDecoder, SourceOffset};
pub use spl_token_decoders::{decode_mint, ExtensionRecord, MintAccount};

/// Erreurs de la couche de décodage. Toutes sont fatales pour le décodage en
/// cours ; c'est à l'appelant de décider s'il réessaie ailleurs ou abandonne.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("données tronquées : {needed} octets requis à l'offset {offset}, {available} disponibles")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("discriminant invalide pour {field} : {value} (attendu 0 ou 1)")]
    InvalidDiscriminant { field: &'static str, value: u32 },

    #[error("aucune paire de ticks valide ({candidates} candidats testés)")]
    InvalidTickRange { candidates: usize },

    #[error("mint de NFT {mint} absent du compte")]
    MintNotFound { mint: Pubkey },

    #[error("compte possédé par un programme inattendu : {owner}")]
    UnexpectedOwner { owner: Pubkey },
}

/// Un compte tel que renvoyé par le RPC, données déjà décodées du base64.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAccount {
    pub owner: Pubkey,
    pub data: Vec<u8>,
    pub executable: bool,
}

/// Forme JSON d'un compte dans une réponse `getAccountInfo` en encodage base64.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcAccountSnapshot {
    pub owner: String,
    pub data: (String, String),
    #[serde(default)]
    pub executable: bool,
}

impl RawAccount {
    pub fn new(owner: Pubkey, data: Vec<u8>) -> Self {
        Self { owner, data, executable: false }
    }

    /// Adaptateur fin entre la réponse JSON du RPC et les décodeurs.
    pub fn from_rpc_snapshot(snapshot: &RpcAccountSnapshot) -> Result<Self> {
        let owner_bytes = bs58::decode(&snapshot.owner)
            .into_vec()
            .with_context(|| format!("Owner base58 invalide : {}", snapshot.owner))?;
        let owner_array: [u8; 32] = owner_bytes
            .try_into()
            .map_err(|bytes: Vec<u8>| anyhow!("Owner de {} octets, 32 attendus", bytes.len()))?;

        let (payload, encoding) = &snapshot.data;
        if encoding != "base64" {
            bail!("Encodage de données non supporté : {}", encoding);
        }
        let data = STANDARD
            .decode(payload)
            .context("Données de compte base64 invalides")?;

        Ok(Self {
            owner: Pubkey::new_from_array(owner_array),
            data,
            executable: snapshot.executable,
        })
    }

    pub fn from_rpc_json(json: &str) -> Result<Self> {
        let snapshot: RpcAccountSnapshot =
            serde_json::from_str(json).context("Réponse de compte JSON invalide")?;
        Self::from_rpc_snapshot(&snapshot)
    }
}

impl From<Account> for RawAccount {
    fn from(account: Account) -> Self {
        Self {
            owner: account.owner,
            data: account.data,
            executable: account.executable,
        }
    }
}

// --- 3. Enum unifié des comptes décodés ---
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DecodedAccount {
    Mint(MintAccount),
    Position(Position),
}

/// Choisit le décodeur à partir du programme propriétaire du compte.
pub fn decode_account(
    raw: &RawAccount,
    clmm_program_ids: &[Pubkey],
) -> Result<DecodedAccount, DecodeError> {
    match PROGRAM_CACHE.classify(&raw.owner, clmm_program_ids) {
        ProgramKind::ClassicToken | ProgramKind::TokenExtensions => {
            decode_mint(raw).map(DecodedAccount::Mint)
        }
        ProgramKind::RaydiumClmm => decode_position(raw).map(DecodedAccount::Position),
        ProgramKind::Other => Err(DecodeError::UnexpectedOwner { owner: raw.owner }),
    }
}

// src/decoders/spl_token_decoders/extensions.rs

use serde::Serialize;
use solana_sdk::pubkey::Pubkey;
use tracing::{debug, warn};

use crate::decoders::{ByteCursor, DecodeError};

/// En-tête TLV : type (u16) puis longueur (u16).
pub const TLV_HEADER_LEN: usize = 4;

pub mod tags {
    pub const TRANSFER_FEE: u16 = 1;
    pub const TRANSFER_HOOK: u16 = 2;
    pub const METADATA_POINTER: u16 = 3;
    pub const PERMANENT_DELEGATE: u16 = 4;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ExtensionRecord {
    TransferFee { fee_basis_points: u16, max_fee: u64 },
    TransferHook { program_id: Pubkey },
    MetadataPointer { address: Pubkey },
    PermanentDelegate { address: Pubkey },
    /// Extension non reconnue : on la garde opaque plutôt que d'échouer.
    Unknown { type_tag: u16, payload: Vec<u8> },
}

impl ExtensionRecord {
    pub fn type_tag(&self) -> u16 {
        match self {
            ExtensionRecord::TransferFee { .. } => tags::TRANSFER_FEE,
            ExtensionRecord::TransferHook { .. } => tags::TRANSFER_HOOK,
            ExtensionRecord::MetadataPointer { .. } => tags::METADATA_POINTER,
            ExtensionRecord::PermanentDelegate { .. } => tags::PERMANENT_DELEGATE,
            ExtensionRecord::Unknown { type_tag, .. } => *type_tag,
        }
    }

    /// Les frais en pourcentage (100 points de base = 1%).
    pub fn fee_percentage(&self) -> Option<f64> {
        match self {
            ExtensionRecord::TransferFee { fee_basis_points, .. } => {
                Some(*fee_basis_points as f64 / 100.0)
            }
            _ => None,
        }
    }
}

/// Une entrée TLV dont la longueur déclarée dépasse la fin du buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TruncatedTlv {
    pub offset: usize,
    pub type_tag: u16,
    pub declared_length: u16,
    pub available: usize,
}

/// Résultat d'un parcours : ce qui a pu être lu, et pourquoi on s'est arrêté.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionWalk {
    pub records: Vec<ExtensionRecord>,
    pub truncated: Option<TruncatedTlv>,
    /// Octets consommés par les entrées complètes.
    pub consumed: usize,
}

fn read_header(cursor: &mut ByteCursor) -> Result<(u16, u16), DecodeError> {
    Ok((cursor.read_u16()?, cursor.read_u16()?))
}

/// Parcourt la zone d'extensions qui suit les 82 octets du mint.
///
/// Ne peut pas échouer : une longueur déclarée trop grande arrête le parcours
/// et est signalée dans `truncated`, les extensions déjà lues sont conservées.
pub fn walk_extensions(region: &[u8]) -> ExtensionWalk {
    let mut cursor = ByteCursor::new(region);
    let mut walk = ExtensionWalk::default();

    while cursor.remaining() >= TLV_HEADER_LEN {
        let header_offset = cursor.position();
        let Ok((type_tag, length)) = read_header(&mut cursor) else {
            break;
        };

        if length as usize > cursor.remaining() {
            warn!(
                offset = header_offset,
                type_tag,
                declared_length = length,
                available = cursor.remaining(),
                "Extension TLV tronquée, parcours interrompu."
            );
            walk.truncated = Some(TruncatedTlv {
                offset: header_offset,
                type_tag,
                declared_length: length,
                available: cursor.remaining(),
            });
            break;
        }

        let Ok(payload) = cursor.read_bytes(length as usize) else {
            break;
        };
        walk.records.push(decode_extension(type_tag, payload));
        walk.consumed = cursor.position();
    }

    walk
}

fn decode_known(type_tag: u16, payload: &[u8]) -> Result<Option<ExtensionRecord>, DecodeError> {
    let mut cursor = ByteCursor::new(payload);
    let record = match type_tag {
        tags::TRANSFER_FEE => ExtensionRecord::TransferFee {
            fee_basis_points: cursor.read_u16()?,
            max_fee: cursor.read_u64()?,
        },
        tags::TRANSFER_HOOK => ExtensionRecord::TransferHook {
            program_id: cursor.read_pubkey()?,
        },
        tags::METADATA_POINTER => ExtensionRecord::MetadataPointer {
            address: cursor.read_pubkey()?,
        },
        tags::PERMANENT_DELEGATE => ExtensionRecord::PermanentDelegate {
            address: cursor.read_pubkey()?,
        },
        _ => return Ok(None),
    };
    Ok(Some(record))
}

fn decode_extension(type_tag: u16, payload: &[u8]) -> ExtensionRecord {
    match decode_known(type_tag, payload) {
        Ok(Some(record)) => record,
        Ok(None) => {
            debug!(type_tag, payload = %hex::encode(payload), "Extension inconnue conservée telle quelle.");
            ExtensionRecord::Unknown { type_tag, payload: payload.to_vec() }
        }
        Err(e) => {
            // Type connu mais payload trop court : on le garde opaque.
            warn!(type_tag, error = %e, "Payload d'extension invalide, conservé comme inconnu.");
            ExtensionRecord::Unknown { type_tag, payload: payload.to_vec() }
        }
    }
}

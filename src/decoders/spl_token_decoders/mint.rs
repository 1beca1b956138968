// src/decoders/spl_token_decoders/mint.rs

use serde::Serialize;
use solana_sdk::pubkey::Pubkey;

use super::extensions::{walk_extensions, ExtensionRecord, ExtensionWalk, TruncatedTlv};
use crate::decoders::{ByteCursor, DecodeError, RawAccount};

/// Taille du layout canonique d'un mint SPL.
pub const MINT_LEN: usize = 82;

// --- STRUCTURE DE SORTIE PROPRE ---
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MintAccount {
    pub mint_authority: Option<Pubkey>,
    pub supply: u64,
    pub decimals: u8,
    pub is_initialized: bool,
    pub freeze_authority: Option<Pubkey>,
    /// Vient du programme propriétaire, pas des octets du compte.
    pub is_token_extensions: bool,
    pub extensions: Vec<ExtensionRecord>,
    /// Renseigné si la zone d'extensions se termine par une entrée tronquée.
    pub extensions_truncated: Option<TruncatedTlv>,
}

impl MintAccount {
    /// `supply / 10^decimals` en f64.
    ///
    /// Partie entière et fraction sont converties séparément : le résultat est
    /// exact tant que chacune tient dans les 53 bits de mantisse, sinon l'erreur
    /// relative reste de l'ordre de 1e-16. Pour un affichage exact, voir `ui_supply`.
    pub fn actual_supply(&self) -> f64 {
        match 10u64.checked_pow(self.decimals as u32) {
            Some(scale) => {
                (self.supply / scale) as f64 + (self.supply % scale) as f64 / scale as f64
            }
            None => self.supply as f64 / 10f64.powi(self.decimals as i32),
        }
    }

    /// Supply en décimal exact, sans zéros inutiles ("1000", "0.000001").
    pub fn ui_supply(&self) -> String {
        let digits = self.supply.to_string();
        let decimals = self.decimals as usize;
        if decimals == 0 {
            return digits;
        }
        let padded = format!("{:0>width$}", digits, width = decimals + 1);
        let (int_part, frac_part) = padded.split_at(padded.len() - decimals);
        let frac_part = frac_part.trim_end_matches('0');
        if frac_part.is_empty() {
            int_part.to_string()
        } else {
            format!("{int_part}.{frac_part}")
        }
    }

    /// (points de base, frais maximum) si l'extension TransferFee est présente.
    pub fn transfer_fee(&self) -> Option<(u16, u64)> {
        self.extensions.iter().find_map(|ext| match ext {
            ExtensionRecord::TransferFee { fee_basis_points, max_fee } => {
                Some((*fee_basis_points, *max_fee))
            }
            _ => None,
        })
    }

    pub fn has_transfer_hook(&self) -> bool {
        self.extensions
            .iter()
            .any(|ext| matches!(ext, ExtensionRecord::TransferHook { .. }))
    }

    pub fn has_permanent_delegate(&self) -> bool {
        self.extensions
            .iter()
            .any(|ext| matches!(ext, ExtensionRecord::PermanentDelegate { .. }))
    }
}

fn read_optional_pubkey(
    cursor: &mut ByteCursor,
    field: &'static str,
) -> Result<Option<Pubkey>, DecodeError> {
    match cursor.read_u32()? {
        0 => {
            cursor.skip(32)?;
            Ok(None)
        }
        1 => Ok(Some(cursor.read_pubkey()?)),
        value => Err(DecodeError::InvalidDiscriminant { field, value }),
    }
}

/// Décode un compte de mint appartenant au programme SPL Token ou Token-2022.
pub fn decode_mint(raw: &RawAccount) -> Result<MintAccount, DecodeError> {
    let is_token_extensions = if raw.owner == spl_token_2022::id() {
        true
    } else if raw.owner == spl_token::id() {
        false
    } else {
        return Err(DecodeError::UnexpectedOwner { owner: raw.owner });
    };
    decode_mint_data(&raw.data, is_token_extensions)
}

/// Décode les octets bruts d'un mint. Aucune structure partielle n'est renvoyée :
/// la moindre erreur interrompt tout le décodage.
pub fn decode_mint_data(data: &[u8], is_token_extensions: bool) -> Result<MintAccount, DecodeError> {
    if data.len() < MINT_LEN {
        return Err(DecodeError::Truncated {
            offset: 0,
            needed: MINT_LEN,
            available: data.len(),
        });
    }

    let mut cursor = ByteCursor::new(data);
    let mint_authority = read_optional_pubkey(&mut cursor, "mint_authority")?;
    let supply = cursor.read_u64()?;
    let decimals = cursor.read_u8()?;
    let is_initialized = cursor.read_bool()?;
    let freeze_authority = read_optional_pubkey(&mut cursor, "freeze_authority")?;

    // Les octets au-delà de 82 ne sont des extensions que pour Token-2022.
    let walk = if is_token_extensions && cursor.remaining() > 0 {
        walk_extensions(cursor.read_bytes(cursor.remaining())?)
    } else {
        ExtensionWalk::default()
    };

    Ok(MintAccount {
        mint_authority,
        supply,
        decimals,
        is_initialized,
        freeze_authority,
        is_token_extensions,
        extensions: walk.records,
        extensions_truncated: walk.truncated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mint_bytes(
        mint_authority: Option<[u8; 32]>,
        supply: u64,
        decimals: u8,
        freeze_authority: Option<[u8; 32]>,
    ) -> Vec<u8> {
        let mut data = Vec::with_capacity(MINT_LEN);
        push_option(&mut data, mint_authority);
        data.extend_from_slice(&supply.to_le_bytes());
        data.push(decimals);
        data.push(1);
        push_option(&mut data, freeze_authority);
        data
    }

    fn push_option(data: &mut Vec<u8>, key: Option<[u8; 32]>) {
        match key {
            Some(bytes) => {
                data.extend_from_slice(&1u32.to_le_bytes());
                data.extend_from_slice(&bytes);
            }
            None => {
                data.extend_from_slice(&0u32.to_le_bytes());
                data.extend_from_slice(&[0u8; 32]);
            }
        }
    }

    #[test]
    fn every_buffer_shorter_than_the_layout_is_truncated() {
        let full = mint_bytes(Some([3u8; 32]), 42, 6, None);
        assert_eq!(full.len(), MINT_LEN);
        for len in 0..MINT_LEN {
            assert!(
                matches!(decode_mint_data(&full[..len], false), Err(DecodeError::Truncated { .. })),
                "len {len}"
            );
        }
        // Même avec un discriminant invalide, la taille est vérifiée d'abord.
        let mut bad = vec![0u8; 40];
        bad[0] = 7;
        assert!(matches!(decode_mint_data(&bad, false), Err(DecodeError::Truncated { .. })));
    }

    #[test]
    fn authorities_round_trip() {
        let authority: [u8; 32] = core::array::from_fn(|i| i as u8 * 7);
        let freeze: [u8; 32] = core::array::from_fn(|i| 255 - i as u8);
        let mint = decode_mint_data(&mint_bytes(Some(authority), 10, 2, Some(freeze)), false).unwrap();
        assert_eq!(mint.mint_authority, Some(Pubkey::new_from_array(authority)));
        assert_eq!(mint.freeze_authority, Some(Pubkey::new_from_array(freeze)));
        assert!(mint.is_initialized);

        let mint = decode_mint_data(&mint_bytes(None, 10, 2, None), false).unwrap();
        assert_eq!(mint.mint_authority, None);
        assert_eq!(mint.freeze_authority, None);
    }

    #[test]
    fn option_tag_other_than_zero_or_one_is_rejected() {
        let mut data = mint_bytes(None, 1, 0, None);
        data[0] = 2;
        assert_eq!(
            decode_mint_data(&data, false),
            Err(DecodeError::InvalidDiscriminant { field: "mint_authority", value: 2 })
        );

        let mut data = mint_bytes(None, 1, 0, None);
        data[46] = 9;
        assert_eq!(
            decode_mint_data(&data, false),
            Err(DecodeError::InvalidDiscriminant { field: "freeze_authority", value: 9 })
        );
    }

    #[test]
    fn any_nonzero_initialized_byte_is_true() {
        let mut data = mint_bytes(None, 1, 0, None);
        data[45] = 0x80;
        assert!(decode_mint_data(&data, false).unwrap().is_initialized);
        data[45] = 0;
        assert!(!decode_mint_data(&data, false).unwrap().is_initialized);
    }

    #[test]
    fn actual_supply_is_exact_for_whole_units() {
        let mint = decode_mint_data(&mint_bytes(None, 1_000_000_000, 9, None), false).unwrap();
        assert!((mint.actual_supply() - 1.0).abs() < 1e-9);
        assert_eq!(mint.ui_supply(), "1");
    }

    #[test]
    fn ui_supply_formats_fractions() {
        let mut mint = decode_mint_data(&mint_bytes(None, 1, 6, None), false).unwrap();
        assert_eq!(mint.ui_supply(), "0.000001");
        mint.supply = 123_450_000;
        assert_eq!(mint.ui_supply(), "123.45");
        mint.decimals = 0;
        assert_eq!(mint.ui_supply(), "123450000");
        mint.supply = u64::MAX;
        mint.decimals = 30;
        assert_eq!(mint.ui_supply(), "0.000000000018446744073709551615");
        assert!(mint.actual_supply() > 0.0);
    }

    #[test]
    fn classic_mint_ignores_trailing_bytes() {
        let mut data = mint_bytes(None, 5, 0, None);
        data.extend_from_slice(&[1, 0, 10, 0, 0, 0]);
        let mint = decode_mint_data(&data, false).unwrap();
        assert!(mint.extensions.is_empty());
        assert!(!mint.is_token_extensions);
    }

    #[test]
    fn token_2022_mint_walks_extensions() {
        let mut data = mint_bytes(None, 5, 0, None);
        data.extend_from_slice(&1u16.to_le_bytes());
        data.extend_from_slice(&10u16.to_le_bytes());
        data.extend_from_slice(&50u16.to_le_bytes());
        data.extend_from_slice(&900u64.to_le_bytes());
        let raw = RawAccount::new(spl_token_2022::id(), data);
        let mint = decode_mint(&raw).unwrap();
        assert!(mint.is_token_extensions);
        assert_eq!(mint.transfer_fee(), Some((50, 900)));
        assert!(!mint.has_transfer_hook());
        assert_eq!(mint.extensions_truncated, None);
    }

    fn pseudo_random_bytes(state: &mut u64, len: usize) -> Vec<u8> {
        (0..len)
            .map(|_| {
                *state ^= *state << 13;
                *state ^= *state >> 7;
                *state ^= *state << 17;
                (*state >> 56) as u8
            })
            .collect()
    }

    #[test]
    fn arbitrary_bytes_never_panic() {
        let mut state: u64 = 0xD1B5_4A32_D192_ED03;
        for len in [0usize, 1, 45, 81, 82, 83, 85, 86, 120, 255, 1024, 4096] {
            for round in 0..16 {
                let mut data = pseudo_random_bytes(&mut state, len);
                // Une partie des buffers reçoit des tags d'option valides pour
                // atteindre la zone d'extensions.
                if round % 2 == 0 && len >= MINT_LEN {
                    data[0..4].copy_from_slice(&(round as u32 % 4 / 2).to_le_bytes());
                    data[46..50].copy_from_slice(&1u32.to_le_bytes());
                }
                match decode_mint_data(&data, true) {
                    Ok(mint) => {
                        assert!(len >= MINT_LEN);
                        if let Some(truncated) = mint.extensions_truncated {
                            assert!(MINT_LEN + truncated.offset + truncated.available <= len);
                        }
                    }
                    Err(DecodeError::Truncated { .. }) => assert!(len < MINT_LEN),
                    Err(DecodeError::InvalidDiscriminant { .. }) => assert!(len >= MINT_LEN),
                    Err(other) => panic!("unexpected {other:?}"),
                }
            }
        }
    }

    #[test]
    fn foreign_owner_is_rejected() {
        let raw = RawAccount::new(Pubkey::new_unique(), mint_bytes(None, 5, 0, None));
        assert!(matches!(decode_mint(&raw), Err(DecodeError::UnexpectedOwner { .. })));
    }
}

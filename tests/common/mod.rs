#![allow(dead_code)]

use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

pub const CLMM_PROGRAM_ID: &str = "CAMMCzo5YL8w4VFF8KVHrK22GGUsp5VTaW7grrKgrWqK";

pub fn clmm_program_id() -> Pubkey {
    Pubkey::from_str(CLMM_PROGRAM_ID).unwrap()
}

fn push_option(data: &mut Vec<u8>, key: Option<Pubkey>) {
    match key {
        Some(key) => {
            data.extend_from_slice(&1u32.to_le_bytes());
            data.extend_from_slice(key.as_ref());
        }
        None => {
            data.extend_from_slice(&0u32.to_le_bytes());
            data.extend_from_slice(&[0u8; 32]);
        }
    }
}

/// Les 82 octets d'un mint SPL.
pub fn mint_bytes(
    mint_authority: Option<Pubkey>,
    supply: u64,
    decimals: u8,
    freeze_authority: Option<Pubkey>,
) -> Vec<u8> {
    let mut data = Vec::with_capacity(82);
    push_option(&mut data, mint_authority);
    data.extend_from_slice(&supply.to_le_bytes());
    data.push(decimals);
    data.push(1);
    push_option(&mut data, freeze_authority);
    data
}

pub fn tlv(type_tag: u16, payload: &[u8]) -> Vec<u8> {
    let mut out = type_tag.to_le_bytes().to_vec();
    out.extend_from_slice(&(payload.len() as u16).to_le_bytes());
    out.extend_from_slice(payload);
    out
}

/// Un compte de position au layout fixe : discriminateur, pool, owner, ticks, puis
/// liquidité, fee growth (u128 en lo/hi) et tokens dus.
pub fn position_bytes(pool_id: Pubkey, owner: Pubkey, tick_lower: i32, tick_upper: i32, liquidity: u128) -> Vec<u8> {
    let mut data = vec![0x11; 8];
    data.extend_from_slice(pool_id.as_ref());
    data.extend_from_slice(owner.as_ref());
    data.extend_from_slice(&tick_lower.to_le_bytes());
    data.extend_from_slice(&tick_upper.to_le_bytes());
    data.extend_from_slice(&(liquidity as u64).to_le_bytes());
    data.extend_from_slice(&((liquidity >> 64) as u64).to_le_bytes());
    data.extend_from_slice(&[0u8; 32]);
    data.extend_from_slice(&7u64.to_le_bytes());
    data.extend_from_slice(&8u64.to_le_bytes());
    data
}

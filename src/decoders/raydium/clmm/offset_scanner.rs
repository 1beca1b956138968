// src/decoders/raydium/clmm/offset_scanner.rs

use solana_sdk::pubkey::Pubkey;

use crate::decoders::{byte_cursor::PUBKEY_LEN, ByteCursor, DecodeError};
use crate::math::MAX_TICK;

/// Écart maximal jugé plausible entre les deux ticks d'une position.
pub const MAX_TICK_SPAN: i64 = 100_000;
/// Les ticks sont des i32 alignés : on ne teste que les offsets multiples de 4.
pub const SCAN_ALIGNMENT: usize = 4;
/// Rayon (en octets) de la recherche de ticks autour du mint de la NFT.
pub const NFT_ANCHOR_RADIUS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickCandidate {
    pub offset: usize,
    pub tick_lower: i32,
    pub tick_upper: i32,
}

/// `tick_lower < tick_upper`, les deux dans [-MAX_TICK, MAX_TICK],
/// et un écart strictement compris entre 0 et MAX_TICK_SPAN.
pub fn is_valid_tick_pair(tick_lower: i32, tick_upper: i32) -> bool {
    let max = MAX_TICK.unsigned_abs();
    if tick_lower.unsigned_abs() > max || tick_upper.unsigned_abs() > max {
        return false;
    }
    let span = tick_upper as i64 - tick_lower as i64;
    tick_lower < tick_upper && span > 0 && span < MAX_TICK_SPAN
}

/// Lit deux i32 consécutifs à `offset` et les garde s'ils forment une paire valide.
pub fn read_tick_pair_at(data: &[u8], offset: usize) -> Option<TickCandidate> {
    let mut cursor = ByteCursor::at(data, offset).ok()?;
    let tick_lower = cursor.read_i32().ok()?;
    let tick_upper = cursor.read_i32().ok()?;
    is_valid_tick_pair(tick_lower, tick_upper).then_some(TickCandidate {
        offset,
        tick_lower,
        tick_upper,
    })
}

/// Essaie une liste fixe d'offsets, dans l'ordre donné.
pub fn check_offsets(data: &[u8], offsets: &[usize]) -> Result<TickCandidate, DecodeError> {
    offsets
        .iter()
        .find_map(|&offset| read_tick_pair_at(data, offset))
        .ok_or(DecodeError::InvalidTickRange { candidates: offsets.len() })
}

/// Balaye tout le buffer de gauche à droite ; le plus petit offset valide gagne.
///
/// Chaque fenêtre n'est qu'une supposition : une paire trouvée ici doit rester
/// marquée comme heuristique en aval.
pub fn scan_for_tick_pair(data: &[u8]) -> Result<TickCandidate, DecodeError> {
    let mut candidates = 0;
    for offset in (0..data.len()).step_by(SCAN_ALIGNMENT) {
        candidates += 1;
        if let Some(candidate) = read_tick_pair_at(data, offset) {
            return Ok(candidate);
        }
    }
    Err(DecodeError::InvalidTickRange { candidates })
}

/// Offset aligné du premier emplacement où apparaissent les 32 octets de `mint`.
pub fn find_pubkey_aligned(data: &[u8], mint: &Pubkey) -> Option<usize> {
    (0..data.len())
        .step_by(SCAN_ALIGNMENT)
        .find(|&offset| {
            ByteCursor::at(data, offset)
                .and_then(|mut cursor| cursor.read_bytes(PUBKEY_LEN))
                .is_ok_and(|bytes| *bytes == mint.to_bytes()[..])
        })
}

/// Balaye `[anchor - NFT_ANCHOR_RADIUS, anchor + NFT_ANCHOR_RADIUS)`, borné au buffer.
/// Les offsets testés gardent l'alignement de l'ancre.
pub fn scan_near_anchor(data: &[u8], anchor: usize) -> Result<TickCandidate, DecodeError> {
    let start = anchor.saturating_sub(NFT_ANCHOR_RADIUS);
    let end = anchor.saturating_add(NFT_ANCHOR_RADIUS).min(data.len());
    let mut candidates = 0;
    for offset in (start..end).step_by(SCAN_ALIGNMENT) {
        candidates += 1;
        if let Some(candidate) = read_tick_pair_at(data, offset) {
            return Ok(candidate);
        }
    }
    Err(DecodeError::InvalidTickRange { candidates })
}

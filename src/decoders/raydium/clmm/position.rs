// src/decoders/raydium/clmm/position.rs

use serde::Serialize;
use solana_sdk::pubkey::Pubkey;
use tracing::{debug, warn};

use super::offset_scanner::{self, is_valid_tick_pair, TickCandidate};
use crate::decoders::{ByteCursor, DecodeError, RawAccount};

pub const DISCRIMINATOR_LEN: usize = 8;
/// Offset des ticks dans le layout fixe : discriminateur + pool_id + owner.
pub const FIXED_TICK_OFFSET: usize = DISCRIMINATOR_LEN + 32 + 32;
/// Taille minimale du layout fixe.
pub const FIXED_LAYOUT_LEN: usize = FIXED_TICK_OFFSET + 4 + 4 + 16 * 3 + 8 * 2;

/// Taille d'un compte de position Raydium CLMM on-chain.
pub const RAYDIUM_POSITION_ACCOUNT_LEN: usize = 281;

/// Offsets de ticks relevés sur d'anciens comptes Raydium CLMM.
/// Aucune source IDL : à valider sur un vrai compte avant de s'y fier.
pub const RAYDIUM_CANDIDATE_OFFSETS: [usize; 4] = [41, 73, 105, 137];

/// D'où viennent les ticks d'une position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SourceOffset {
    FixedLayout,
    CandidateOffset(usize),
    HeuristicScan(usize),
    /// Ticks trouvés près du mint de la NFT de position.
    NftAnchored { mint_offset: usize, tick_offset: usize },
}

impl SourceOffset {
    pub fn is_heuristic(&self) -> bool {
        !matches!(self, SourceOffset::FixedLayout)
    }

    pub fn tick_offset(&self) -> usize {
        match self {
            SourceOffset::FixedLayout => FIXED_TICK_OFFSET,
            SourceOffset::CandidateOffset(offset) | SourceOffset::HeuristicScan(offset) => *offset,
            SourceOffset::NftAnchored { tick_offset, .. } => *tick_offset,
        }
    }
}

/// Champs qui ne sont connus que lorsque le layout fixe a été validé.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionDetails {
    pub pool_id: Pubkey,
    pub owner: Pubkey,
    pub liquidity: u128,
    pub fee_growth_inside_0: u128,
    pub fee_growth_inside_1: u128,
    pub tokens_owed_0: u64,
    pub tokens_owed_1: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Position {
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub source_offset: SourceOffset,
    /// `None` quand les ticks viennent d'une heuristique : le reste du layout
    /// est alors inconnu et on ne l'invente pas.
    pub details: Option<PositionDetails>,
}

impl Position {
    fn from_candidate(candidate: TickCandidate, source_offset: SourceOffset) -> Self {
        Self {
            tick_lower: candidate.tick_lower,
            tick_upper: candidate.tick_upper,
            source_offset,
            details: None,
        }
    }

    pub fn pool_id(&self) -> Option<&Pubkey> {
        self.details.as_ref().map(|details| &details.pool_id)
    }

    pub fn liquidity(&self) -> Option<u128> {
        self.details.as_ref().map(|details| details.liquidity)
    }

    pub fn tick_span(&self) -> i64 {
        self.tick_upper as i64 - self.tick_lower as i64
    }
}

fn decode_fixed_layout(data: &[u8]) -> Result<Position, DecodeError> {
    let mut cursor = ByteCursor::new(data);
    cursor.skip(DISCRIMINATOR_LEN)?;
    let pool_id = cursor.read_pubkey()?;
    let owner = cursor.read_pubkey()?;
    let tick_lower = cursor.read_i32()?;
    let tick_upper = cursor.read_i32()?;
    let liquidity = cursor.read_u128_split()?;
    let fee_growth_inside_0 = cursor.read_u128_split()?;
    let fee_growth_inside_1 = cursor.read_u128_split()?;
    let tokens_owed_0 = cursor.read_u64()?;
    let tokens_owed_1 = cursor.read_u64()?;

    if !is_valid_tick_pair(tick_lower, tick_upper) {
        return Err(DecodeError::InvalidTickRange { candidates: 1 });
    }

    Ok(Position {
        tick_lower,
        tick_upper,
        source_offset: SourceOffset::FixedLayout,
        details: Some(PositionDetails {
            pool_id,
            owner,
            liquidity,
            fee_growth_inside_0,
            fee_growth_inside_1,
            tokens_owed_0,
            tokens_owed_1,
        }),
    })
}

/// Une stratégie de lecture des ticks. Les stratégies sont essayées dans
/// l'ordre ; la première qui réussit l'emporte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutStrategy {
    FixedLayout,
    CandidateOffsets(Vec<usize>),
    FullScan,
    /// Cherche le mint de la NFT puis des ticks dans son voisinage.
    NftAnchored(Pubkey),
}

impl LayoutStrategy {
    fn attempt(&self, data: &[u8]) -> Result<Position, DecodeError> {
        match self {
            LayoutStrategy::FixedLayout => decode_fixed_layout(data),
            LayoutStrategy::CandidateOffsets(offsets) => offset_scanner::check_offsets(data, offsets)
                .map(|c| Position::from_candidate(c, SourceOffset::CandidateOffset(c.offset))),
            LayoutStrategy::FullScan => offset_scanner::scan_for_tick_pair(data)
                .map(|c| Position::from_candidate(c, SourceOffset::HeuristicScan(c.offset))),
            LayoutStrategy::NftAnchored(mint) => {
                let mint_offset = offset_scanner::find_pubkey_aligned(data, mint)
                    .ok_or(DecodeError::MintNotFound { mint: *mint })?;
                offset_scanner::scan_near_anchor(data, mint_offset).map(|c| {
                    let source = SourceOffset::NftAnchored { mint_offset, tick_offset: c.offset };
                    Position::from_candidate(c, source)
                })
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionDecoder {
    strategies: Vec<LayoutStrategy>,
}

impl Default for PositionDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionDecoder {
    /// Layout fixe, puis balayage complet.
    pub fn new() -> Self {
        Self {
            strategies: vec![LayoutStrategy::FixedLayout, LayoutStrategy::FullScan],
        }
    }

    /// Insère une liste d'offsets à tester entre le layout fixe et le balayage.
    pub fn with_candidate_offsets(offsets: &[usize]) -> Self {
        Self {
            strategies: vec![
                LayoutStrategy::FixedLayout,
                LayoutStrategy::CandidateOffsets(offsets.to_vec()),
                LayoutStrategy::FullScan,
            ],
        }
    }

    /// Seule la recherche ancrée sur le mint : un compte qui ne contient pas
    /// `mint` est rejeté, quel que soit son layout.
    pub fn nft_anchored(mint: Pubkey) -> Self {
        Self {
            strategies: vec![LayoutStrategy::NftAnchored(mint)],
        }
    }

    pub fn with_strategies(strategies: Vec<LayoutStrategy>) -> Self {
        Self { strategies }
    }

    pub fn strategies(&self) -> &[LayoutStrategy] {
        &self.strategies
    }

    pub fn decode(&self, data: &[u8]) -> Result<Position, DecodeError> {
        let mut last_error = DecodeError::InvalidTickRange { candidates: 0 };
        for strategy in &self.strategies {
            match strategy.attempt(data) {
                Ok(position) => {
                    if position.source_offset.is_heuristic() {
                        warn!(
                            source = ?position.source_offset,
                            tick_lower = position.tick_lower,
                            tick_upper = position.tick_upper,
                            "Ticks obtenus par heuristique, à ne pas traiter comme une donnée fiable."
                        );
                    }
                    return Ok(position);
                }
                Err(e) => {
                    debug!(?strategy, error = %e, len = data.len(), "Stratégie de layout rejetée.");
                    last_error = e;
                }
            }
        }
        Err(last_error)
    }
}

/// Décode un compte de position CLMM avec la chaîne de stratégies par défaut.
pub fn decode_position(raw: &RawAccount) -> Result<Position, DecodeError> {
    PositionDecoder::new().decode(&raw.data)
}

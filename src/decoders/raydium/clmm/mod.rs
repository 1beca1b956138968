// 1. Déclarer les sous-modules du CLMM
pub mod offset_scanner;
pub mod position;

// 2. Ré-exporter les éléments publics les plus importants
// Cela permet d'écrire `use crate::decoders::raydium::clmm::Position`
// au lieu de `use crate::decoders::raydium::clmm::position::Position`
pub use offset_scanner::{
    find_pubkey_aligned, is_valid_tick_pair, scan_for_tick_pair, scan_near_anchor, TickCandidate,
    MAX_TICK_SPAN, NFT_ANCHOR_RADIUS,
};
pub use position::{
    decode_position, LayoutStrategy, Position, PositionDecoder, PositionDetails, SourceOffset,
    RAYDIUM_CANDIDATE_OFFSETS, RAYDIUM_POSITION_ACCOUNT_LEN,
};

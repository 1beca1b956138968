// src/analysis/position_range.rs

use tracing::warn;

use super::sourced::Sourced;
use crate::decoders::{DecodeError, Position};
use crate::math::PriceRange;

/// Plage de prix d'une position décodée.
///
/// Sans `fallback`, une erreur de décodage est propagée telle quelle. Avec un
/// `fallback`, l'erreur est remplacée par une plage `Synthetic` qui porte la
/// cause : jamais de valeur inventée présentée comme observée.
pub fn position_range_or_fallback(
    decoded: Result<Position, DecodeError>,
    decimals_a: u8,
    decimals_b: u8,
    fallback: Option<(i32, i32)>,
) -> Result<Sourced<PriceRange>, DecodeError> {
    match (decoded, fallback) {
        (Ok(position), _) => Ok(Sourced::Observed(PriceRange::from_position(
            &position, decimals_a, decimals_b,
        ))),
        (Err(e), Some((tick_lower, tick_upper))) => {
            warn!(error = %e, tick_lower, tick_upper, "Décodage impossible, plage synthétique utilisée.");
            Ok(Sourced::synthetic(
                PriceRange::from_ticks(tick_lower, tick_upper, decimals_a, decimals_b),
                format!("position non décodée : {}", e),
            ))
        }
        (Err(e), None) => Err(e),
    }
}

// src/math/tick_price.rs

use serde::Serialize;
use std::f64::consts::LN_10;

use crate::decoders::{Position, SourceOffset};

/// Chaque tick multiplie le prix par 1.0001.
pub const TICK_BASE: f64 = 1.0001;
pub const MAX_TICK: i32 = 887_272;
pub const MIN_TICK: i32 = -MAX_TICK;

// Bornes de l'exposant pour que `exp` reste fini et strictement positif.
const MAX_EXPONENT: f64 = 709.0;
const MIN_EXPONENT: f64 = -708.0;

fn ln_tick_base() -> f64 {
    (TICK_BASE - 1.0).ln_1p()
}

/// `1.0001^tick * 10^(decimals_a - decimals_b)`, calculé dans le domaine log.
///
/// Le tick est borné à [MIN_TICK, MAX_TICK] et l'exposant final à l'intervalle
/// représentable, donc le résultat est toujours fini et positif. Précision
/// d'environ 15 chiffres significatifs : suffisant pour l'affichage, pas pour
/// un règlement exact.
pub fn tick_to_price(tick: i32, decimals_a: u8, decimals_b: u8) -> f64 {
    let tick = tick.clamp(MIN_TICK, MAX_TICK);
    let decimals_shift = decimals_a as f64 - decimals_b as f64;
    let exponent = tick as f64 * ln_tick_base() + decimals_shift * LN_10;
    exponent.clamp(MIN_EXPONENT, MAX_EXPONENT).exp()
}

/// Inverse de `tick_to_price` : le plus grand tick dont le prix ne dépasse pas `price`.
pub fn price_to_tick(price: f64, decimals_a: u8, decimals_b: u8) -> Option<i32> {
    if !price.is_finite() || price <= 0.0 {
        return None;
    }
    let decimals_shift = decimals_a as f64 - decimals_b as f64;
    let raw = (price.ln() - decimals_shift * LN_10) / ln_tick_base();
    // Tolérance pour les prix issus d'un tick exact qui retombent juste en dessous.
    let tick = (raw + 1e-6).floor();
    Some(tick.clamp(MIN_TICK as f64, MAX_TICK as f64) as i32)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceRange {
    pub lower_price: f64,
    pub upper_price: f64,
    pub tick_lower: i32,
    pub tick_upper: i32,
    /// Provenance des ticks quand la plage vient d'une position décodée.
    pub source: Option<SourceOffset>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum RangeStatus {
    /// Prix sous la borne basse : position entièrement en token B.
    BelowRange,
    /// Prix au-dessus de la borne haute : position entièrement en token A.
    AboveRange,
    /// Liquidité active ; `percent` situe le prix dans la plage (0 à 100).
    InRange { percent: f64 },
}

impl PriceRange {
    pub fn from_ticks(tick_lower: i32, tick_upper: i32, decimals_a: u8, decimals_b: u8) -> Self {
        Self {
            lower_price: tick_to_price(tick_lower, decimals_a, decimals_b),
            upper_price: tick_to_price(tick_upper, decimals_a, decimals_b),
            tick_lower,
            tick_upper,
            source: None,
        }
    }

    pub fn from_position(position: &Position, decimals_a: u8, decimals_b: u8) -> Self {
        Self {
            source: Some(position.source_offset),
            ..Self::from_ticks(position.tick_lower, position.tick_upper, decimals_a, decimals_b)
        }
    }

    pub fn is_heuristic(&self) -> bool {
        self.source.is_some_and(|source| source.is_heuristic())
    }

    pub fn status(&self, current_price: f64) -> RangeStatus {
        if current_price < self.lower_price {
            RangeStatus::BelowRange
        } else if current_price > self.upper_price {
            RangeStatus::AboveRange
        } else {
            let width = self.upper_price - self.lower_price;
            let percent = if width > 0.0 {
                (current_price - self.lower_price) / width * 100.0
            } else {
                0.0
            };
            RangeStatus::InRange { percent }
        }
    }
}

pub mod tick_price;

pub use tick_price::{price_to_tick, tick_to_price, PriceRange, RangeStatus, MAX_TICK, MIN_TICK};

pub mod position_range;
pub mod sourced;
pub mod token_security;

pub use position_range::position_range_or_fallback;
pub use sourced::Sourced;
pub use token_security::{assess_mint, RiskFactor, RiskLevel, SecurityReport};

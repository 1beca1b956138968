// src/lib.rs

// On déclare tous nos modules principaux pour les rendre publics et
// utilisables par nos programmes binaires (dev_runner.rs) et les tests.
pub mod analysis;
pub mod config;
pub mod decoders;
pub mod math;
pub mod monitoring;
pub mod rpc;
pub mod state;

pub use decoders::{decode_account, decode_mint, decode_position, DecodeError, DecodedAccount, RawAccount};
pub use math::tick_to_price;
pub use rpc::{fetch_with_retry, FetchError, RetryConfig};

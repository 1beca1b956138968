pub mod extensions;
pub mod mint;

pub use extensions::{walk_extensions, ExtensionRecord, ExtensionWalk, TruncatedTlv};
pub use mint::{decode_mint, decode_mint_data, MintAccount, MINT_LEN};

pub mod resilient_client;
pub mod retry;

pub use resilient_client::ResilientRpcClient;
pub use retry::{fetch_with_retry, fetch_with_retry_until, FetchError, RetryConfig};

pub mod logging;

pub use logging::{setup_logging, setup_logging_with, LogFormat};

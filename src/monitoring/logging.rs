// DANS : src/monitoring/logging.rs
use anyhow::{anyhow, Result};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

/// Format de sortie des logs, choisi par la variable `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Une ligne JSON par événement, pour l'agrégation.
    #[default]
    Json,
    /// Sortie lisible, pour le banc d'essai en local.
    Pretty,
}

impl LogFormat {
    pub fn from_env() -> Self {
        match std::env::var("LOG_FORMAT") {
            Ok(value) => Self::parse(&value),
            Err(_) => Self::default(),
        }
    }

    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}

pub fn setup_logging() -> Result<()> {
    setup_logging_with(LogFormat::from_env())
}

/// Installe le subscriber global. Échoue si un subscriber est déjà en place.
pub fn setup_logging_with(format: LogFormat) -> Result<()> {
    // RUST_LOG, sinon "info".
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true);

    let installed = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
    installed.map_err(|e| anyhow!("Impossible d'installer le subscriber de logs : {}", e))
}

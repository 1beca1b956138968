// src/rpc/retry.rs

use std::{future::Future, time::Duration};
use thiserror::Error;
use tokio::time::sleep;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("limite de requêtes atteinte (HTTP 429)")]
    RateLimited,

    #[error("ressource introuvable")]
    NotFound,

    #[error("réponse tronquée : {received} octets reçus, {expected} attendus")]
    Truncated { expected: usize, received: usize },

    #[error("erreur de transport : {0}")]
    Transport(String),

    #[error("échec après {attempts} tentatives : {cause}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        cause: Box<FetchError>,
    },

    #[error("fetch annulé")]
    Cancelled,
}

impl FetchError {
    /// Une absence n'est pas transitoire : inutile de réessayer.
    pub fn is_terminal(&self) -> bool {
        matches!(self, FetchError::NotFound | FetchError::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Nombre total d'appels autorisés (au moins 1).
    pub max_retries: u32,
    /// Délai de base du backoff exponentiel après un 429.
    pub base_delay: Duration,
    /// Délai fixe après une autre erreur transitoire.
    pub transient_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay: Duration::from_millis(2000),
            transient_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryConfig {
    /// `base * 2^(attempt - 1)`, saturé.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    fn delay_after(&self, error: &FetchError, attempt: u32) -> Duration {
        match error {
            FetchError::RateLimited => self.backoff_delay(attempt),
            _ => self.transient_delay,
        }
    }
}

/// Exécute `op` jusqu'au succès, avec backoff exponentiel sur les 429.
///
/// `NotFound` est renvoyé immédiatement ; toute autre erreur est réessayée
/// jusqu'à `max_retries` appels, puis remontée dans `RetriesExhausted`.
pub async fn fetch_with_retry<T, F, Fut>(op: F, config: &RetryConfig) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    fetch_with_retry_until(op, config, std::future::pending::<()>()).await
}

/// Comme `fetch_with_retry`, mais abandonne dès que `cancel` se termine.
/// L'attente du backoff est suspendue sur la tâche, jamais bloquante.
pub async fn fetch_with_retry_until<T, F, Fut, C>(
    mut op: F,
    config: &RetryConfig,
    cancel: C,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
    C: Future<Output = ()>,
{
    tokio::pin!(cancel);
    let max_attempts = config.max_retries.max(1);
    let mut attempt = 1;

    loop {
        let outcome = tokio::select! {
            outcome = op() => outcome,
            _ = &mut cancel => return Err(FetchError::Cancelled),
        };

        let error = match outcome {
            Ok(value) => return Ok(value),
            Err(e) if e.is_terminal() => {
                info!(attempt, error = %e, "Erreur terminale, pas de nouvelle tentative.");
                return Err(e);
            }
            Err(e) => e,
        };

        if attempt >= max_attempts {
            warn!(attempts = attempt, error = %error, "Nombre maximal de tentatives atteint.");
            return Err(FetchError::RetriesExhausted {
                attempts: attempt,
                cause: Box::new(error),
            });
        }

        let delay = config.delay_after(&error, attempt);
        warn!(
            attempt,
            max_attempts,
            delay_ms = delay.as_millis() as u64,
            error = %error,
            "Tentative échouée, nouvel essai après attente."
        );

        tokio::select! {
            _ = sleep(delay) => {}
            _ = &mut cancel => return Err(FetchError::Cancelled),
        }
        attempt += 1;
    }
}

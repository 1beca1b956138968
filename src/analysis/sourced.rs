use serde::Serialize;

/// Une valeur réellement observée, ou un remplaçant explicitement marqué.
///
/// Les décodeurs ne produisent jamais de `Synthetic` : c'est une politique de
/// l'appelant (démo, mode hors ligne), et elle doit rester visible en aval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Sourced<T> {
    Observed(T),
    Synthetic { value: T, reason: String },
}

impl<T> Sourced<T> {
    pub fn synthetic(value: T, reason: impl Into<String>) -> Self {
        Sourced::Synthetic { value, reason: reason.into() }
    }

    pub fn value(&self) -> &T {
        match self {
            Sourced::Observed(value) | Sourced::Synthetic { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Sourced::Observed(value) | Sourced::Synthetic { value, .. } => value,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, Sourced::Synthetic { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Sourced::Observed(_) => None,
            Sourced::Synthetic { reason, .. } => Some(reason),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sourced<U> {
        match self {
            Sourced::Observed(value) => Sourced::Observed(f(value)),
            Sourced::Synthetic { value, reason } => Sourced::Synthetic { value: f(value), reason },
        }
    }
}

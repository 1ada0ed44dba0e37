//! Result of a best-effort write.

use crate::store::StoreError;

/// Value produced by a repository write, plus whether the store accepted it.
///
/// `Degraded` means the value only reached the local cache; `cause` is the
/// store failure that was absorbed.
#[derive(Debug)]
pub enum WriteOutcome<T> {
    Persisted(T),
    Degraded { value: T, cause: StoreError },
}

impl<T> WriteOutcome<T> {
    pub fn value(&self) -> &T {
        match self {
            Self::Persisted(value) | Self::Degraded { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Self::Persisted(value) | Self::Degraded { value, .. } => value,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    pub fn cause(&self) -> Option<&StoreError> {
        match self {
            Self::Persisted(_) => None,
            Self::Degraded { cause, .. } => Some(cause),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> WriteOutcome<U> {
        match self {
            Self::Persisted(value) => WriteOutcome::Persisted(f(value)),
            Self::Degraded { value, cause } => WriteOutcome::Degraded {
                value: f(value),
                cause,
            },
        }
    }
}

// Reading<T>: a field value or the typed "unavailable" marker.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Text shown for any unavailable field.
pub const NOT_AVAILABLE: &str = "N/A";

/// A telemetry field: either a value, or `Unavailable` when its source failed or
/// does not exist on this host. Distinct from zero or an empty list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "status", content = "value")]
pub enum Reading<T> {
    Available(T),
    Unavailable,
}

impl<T> Reading<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, Reading::Available(_))
    }

    pub fn as_ref(&self) -> Reading<&T> {
        match self {
            Reading::Available(v) => Reading::Available(v),
            Reading::Unavailable => Reading::Unavailable,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Reading<U> {
        match self {
            Reading::Available(v) => Reading::Available(f(v)),
            Reading::Unavailable => Reading::Unavailable,
        }
    }

    pub fn value(self) -> Option<T> {
        match self {
            Reading::Available(v) => Some(v),
            Reading::Unavailable => None,
        }
    }

    /// Formats the value with `f`, or "N/A".
    pub fn display_or_na<F: FnOnce(&T) -> String>(&self, f: F) -> String {
        match self {
            Reading::Available(v) => f(v),
            Reading::Unavailable => NOT_AVAILABLE.to_string(),
        }
    }
}

impl<T> Default for Reading<T> {
    fn default() -> Self {
        Reading::Unavailable
    }
}

impl<T> From<Option<T>> for Reading<T> {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => Reading::Available(v),
            None => Reading::Unavailable,
        }
    }
}

impl<T, E> From<Result<T, E>> for Reading<T> {
    fn from(v: Result<T, E>) -> Self {
        v.ok().into()
    }
}

impl<T: fmt::Display> fmt::Display for Reading<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Available(v) => v.fmt(f),
            Reading::Unavailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

/// `100 * used / total`, clamped to [0, 100]. Unavailable when `total` is zero
/// or the ratio is not finite.
pub fn percent_of(used: f64, total: f64) -> Reading<f64> {
    if total <= 0.0 {
        return Reading::Unavailable;
    }
    let pct = used / total * 100.0;
    if pct.is_finite() {
        Reading::Available(pct.clamp(0.0, 100.0))
    } else {
        Reading::Unavailable
    }
}

//! Results of operations the editor may not support.

/// Outcome of a call that exists only for API compatibility.
///
/// Operations that have no counterpart in the editor (Fusion, colour
/// grading, render-job queues, page switching) return `NotSupported` with
/// the operation name instead of pretending to succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Capability<T> {
    Available(T),
    NotSupported(&'static str),
}

impl<T> Capability<T> {
    pub fn is_supported(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    /// The value, if the operation is supported.
    pub fn available(self) -> Option<T> {
        match self {
            Self::Available(value) => Some(value),
            Self::NotSupported(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Capability<U> {
        match self {
            Self::Available(value) => Capability::Available(f(value)),
            Self::NotSupported(name) => Capability::NotSupported(name),
        }
    }

    /// Name of the unsupported operation.
    pub fn unsupported_name(&self) -> Option<&'static str> {
        match self {
            Self::Available(_) => None,
            Self::NotSupported(name) => Some(name),
        }
    }
}

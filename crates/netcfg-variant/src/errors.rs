//! Error types for value manipulation and property processing.

use std::collections::TryReserveError;

use thiserror::Error;

use crate::error_map::INVALID_ARGS;
use crate::kind::Kind;

/// Growing a sequence failed because memory could not be reserved.
#[derive(Debug, Error)]
#[error("out of memory growing sequence to {elements} elements")]
pub struct AllocationError {
    /// Element capacity that was requested.
    pub elements: usize,
    /// Allocator failure, absent when the requested size overflowed.
    #[source]
    pub source: Option<TryReserveError>,
}

impl AllocationError {
    pub(crate) fn overflow(elements: usize) -> Self {
        Self {
            elements,
            source: None,
        }
    }
}

/// Errors reported by [`crate::Value`] mutators.
#[derive(Debug, Error)]
pub enum ValueError {
    /// Appending requires a sequence of exactly the appended element kind.
    #[error("cannot append {element} element to a value of signature {found}")]
    NotASequence {
        /// Element kind the caller tried to append.
        element: Kind,
        /// Signature of the value that was targeted, or its kind name when it
        /// has none.
        found: &'static str,
    },
    /// Growing the sequence failed.
    #[error(transparent)]
    Allocation(#[from] AllocationError),
}

/// Hard failures raised while applying a property dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    /// The entry's type differs from the handler's declared type.
    #[error("unexpected type for dict element \"{name}\": expected {expected}, found {found}")]
    TypeMismatch {
        /// Entry name.
        name: String,
        /// Signature declared by the handler.
        expected: String,
        /// Signature carried by the entry.
        found: String,
    },
    /// An array entry's length falls outside the declared bounds.
    #[error("unexpected array length {len} for dict element \"{name}\" (expected {min}..={max})")]
    LengthViolation {
        /// Entry name.
        name: String,
        /// Actual element count.
        len: usize,
        /// Inclusive lower bound.
        min: usize,
        /// Inclusive upper bound.
        max: usize,
    },
}

impl PropertyError {
    /// Symbolic error name reported for every property failure.
    #[must_use]
    pub const fn error_name(&self) -> &'static str {
        INVALID_ARGS
    }

    /// Entry that caused the failure.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::TypeMismatch { name, .. } | Self::LengthViolation { name, .. } => name,
        }
    }
}

//! Error types for the structural model.
//!
//! Only hard failures are errors: mutating committed data, out-of-range
//! indices, coercion of foreign data and number parsing. Lookups that find
//! nothing and operators applied to mismatched kinds are not errors; they
//! produce `None` or [`Value::Absent`](crate::Value::Absent).
//!
//! Factory functions (e.g. [`immutable()`]) are the public way to build
//! errors, mirroring how the evaluator constructs its own errors.

use thiserror::Error;

/// Result of a fallible structural operation.
pub type StructureResult<T> = Result<T, StructureError>;

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StructureErrorKind {
    /// A mutator was called on a committed record or field.
    #[error("immutable")]
    Immutable,
    /// An item index past the end of a record.
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    /// A sub-range that does not fit inside a record.
    #[error("range {lower}..{upper} out of bounds for length {len}")]
    RangeOutOfBounds {
        lower: usize,
        upper: usize,
        len: usize,
    },
    /// Foreign data that cannot be normalized to the requested kind.
    #[error("cannot coerce {found} to {expected}")]
    Coercion {
        expected: &'static str,
        found: String,
    },
    /// Text that does not parse to a finite number or `NaN`.
    #[error("invalid number: {input:?}")]
    ParseNum { input: String },
}

/// Structural error.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct StructureError {
    kind: StructureErrorKind,
}

impl StructureError {
    /// Wrap a kind.
    pub fn from_kind(kind: StructureErrorKind) -> Self {
        StructureError { kind }
    }

    /// The error category.
    pub fn kind(&self) -> &StructureErrorKind {
        &self.kind
    }

    /// Whether this error reports a mutation of committed data.
    pub fn is_immutable(&self) -> bool {
        matches!(self.kind, StructureErrorKind::Immutable)
    }
}

/// Mutation of a committed record or field.
#[cold]
pub fn immutable() -> StructureError {
    StructureError::from_kind(StructureErrorKind::Immutable)
}

/// Item index past the end.
#[cold]
pub fn index_out_of_bounds(index: usize, len: usize) -> StructureError {
    StructureError::from_kind(StructureErrorKind::IndexOutOfBounds { index, len })
}

/// Sub-range that does not fit.
#[cold]
pub fn range_out_of_bounds(lower: usize, upper: usize, len: usize) -> StructureError {
    StructureError::from_kind(StructureErrorKind::RangeOutOfBounds { lower, upper, len })
}

/// Foreign data of the wrong shape.
#[cold]
pub fn coercion_failed(expected: &'static str, found: impl Into<String>) -> StructureError {
    StructureError::from_kind(StructureErrorKind::Coercion {
        expected,
        found: found.into(),
    })
}

/// Unparsable number text.
#[cold]
pub fn parse_num_failed(input: &str) -> StructureError {
    StructureError::from_kind(StructureErrorKind::ParseNum {
        input: input.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn messages() {
        assert_eq!(immutable().to_string(), "immutable");
        assert_eq!(
            index_out_of_bounds(4, 2).to_string(),
            "index 4 out of bounds for length 2"
        );
        assert_eq!(
            range_out_of_bounds(1, 9, 3).to_string(),
            "range 1..9 out of bounds for length 3"
        );
        assert_eq!(
            coercion_failed("record", "string").to_string(),
            "cannot coerce string to record"
        );
        assert_eq!(
            parse_num_failed("Infinity").to_string(),
            "invalid number: \"Infinity\""
        );
    }

    #[test]
    fn kind_matching() {
        assert!(immutable().is_immutable());
        assert!(!index_out_of_bounds(0, 0).is_immutable());
        assert_eq!(
            index_out_of_bounds(3, 1).kind(),
            &StructureErrorKind::IndexOutOfBounds { index: 3, len: 1 }
        );
    }
}

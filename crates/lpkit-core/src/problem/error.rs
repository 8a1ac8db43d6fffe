//! Problem error types.

/// Which index space an operation addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Column,
}

impl Axis {
    pub fn as_str(self) -> &'static str {
        match self {
            Axis::Row => "row",
            Axis::Column => "column",
        }
    }
}

/// Caller errors raised by problem operations.
#[derive(Debug, Clone, PartialEq)]
pub enum ProblemError {
    /// The handle was destroyed before this call.
    UseAfterFree { operation: &'static str },
    /// A 1-based index outside `[1, count]`.
    IndexOutOfRange {
        axis: Axis,
        index: usize,
        count: usize,
    },
    /// Parallel index/value sequences of unequal length.
    LengthMismatch {
        operation: &'static str,
        expected: usize,
        got: usize,
    },
    /// The same entry was given twice in one assignment.
    DuplicateIndex { axis: Axis, owner: usize, index: usize },
}

impl ProblemError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ProblemError::UseAfterFree { .. } => "PROBLEM_DESTROYED",
            ProblemError::IndexOutOfRange { axis: Axis::Row, .. } => "ROW_INDEX_OUT_OF_RANGE",
            ProblemError::IndexOutOfRange {
                axis: Axis::Column, ..
            } => "COLUMN_INDEX_OUT_OF_RANGE",
            ProblemError::LengthMismatch { .. } => "MATRIX_LENGTH_MISMATCH",
            ProblemError::DuplicateIndex { .. } => "MATRIX_DUPLICATE_INDEX",
        }
    }
}

impl std::fmt::Display for ProblemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProblemError::UseAfterFree { operation } => write!(
                f,
                "[{}] {} called on a destroyed problem",
                self.code(),
                operation
            ),
            ProblemError::IndexOutOfRange { axis, index, count } => write!(
                f,
                "[{}] {} index {} out of range (count = {})",
                self.code(),
                axis.as_str(),
                index,
                count
            ),
            ProblemError::LengthMismatch {
                operation,
                expected,
                got,
            } => write!(
                f,
                "[{}] {}: sequence lengths differ (expected {}, got {})",
                self.code(),
                operation,
                expected,
                got
            ),
            ProblemError::DuplicateIndex { axis, owner, index } => {
                let owner_axis = match axis {
                    Axis::Row => Axis::Column,
                    Axis::Column => Axis::Row,
                };
                write!(
                    f,
                    "[{}] {} index {} given more than once for {} {}",
                    self.code(),
                    axis.as_str(),
                    index,
                    owner_axis.as_str(),
                    owner
                )
            }
        }
    }
}

impl std::error::Error for ProblemError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_use_after_free() {
        let err = ProblemError::UseAfterFree { operation: "add_rows" };
        let msg = err.to_string();
        assert!(msg.contains("PROBLEM_DESTROYED"));
        assert!(msg.contains("add_rows"));
    }

    #[test]
    fn test_error_display_index_out_of_range() {
        let err = ProblemError::IndexOutOfRange {
            axis: Axis::Column,
            index: 7,
            count: 3,
        };
        assert_eq!(err.code(), "COLUMN_INDEX_OUT_OF_RANGE");
        assert!(err.to_string().contains("column index 7"));
    }

    #[test]
    fn test_error_display_duplicate() {
        let err = ProblemError::DuplicateIndex {
            axis: Axis::Column,
            owner: 2,
            index: 5,
        };
        let msg = err.to_string();
        assert!(msg.contains("MATRIX_DUPLICATE_INDEX"));
        assert!(msg.contains("column index 5"));
        assert!(msg.contains("row 2"));
    }

    #[test]
    fn test_error_code() {
        assert_eq!(
            ProblemError::LengthMismatch {
                operation: "load_matrix",
                expected: 3,
                got: 2
            }
            .code(),
            "MATRIX_LENGTH_MISMATCH"
        );
        assert_eq!(
            ProblemError::IndexOutOfRange {
                axis: Axis::Row,
                index: 0,
                count: 0
            }
            .code(),
            "ROW_INDEX_OUT_OF_RANGE"
        );
    }
}

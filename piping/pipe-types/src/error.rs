//! Error types for piping operations.
//!
//! Every failure maps onto one of four categories (see [`ErrorCategory`]):
//! geometric degeneracy, invalid selection, non-solvable intersection and
//! dimension inconsistency. The remaining variants carry bookkeeping failures
//! (missing components, bad port indices, catalog rows, kernel errors) and
//! report the category their caller should treat them as.

/// Result type for piping operations.
pub type PipeResult<T> = Result<T, PipeError>;

/// Broad failure class of a [`PipeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorCategory {
    /// Zero-length or exactly-opposed vectors with no applicable fallback.
    GeometricDegeneracy,
    /// Unusable pick, path or component reference. Siblings proceed.
    InvalidSelection,
    /// Parallel or skew centerlines, non-orthogonal header branches.
    NonSolvableIntersection,
    /// Dimensions that cannot describe a physical part.
    DimensionInconsistency,
}

/// Errors that can occur while building, placing or routing components.
///
/// # Example
///
/// ```
/// use pipe_types::{ErrorCategory, PipeError};
///
/// let error = PipeError::degenerate("mating direction has zero length");
/// assert!(error.is_degenerate());
/// assert_eq!(error.category(), ErrorCategory::GeometricDegeneracy);
/// ```
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PipeError {
    /// A vector or construction collapsed and no fallback applies.
    #[error("geometric degeneracy: {0}")]
    GeometricDegeneracy(String),

    /// A pick, path or reference cannot be used.
    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    /// Two centerlines do not meet, or a branch cannot be solved.
    #[error("no solvable intersection: {0}")]
    NonSolvableIntersection(String),

    /// A dimension record field is out of its valid range.
    #[error("inconsistent dimension '{field}': {reason}")]
    DimensionInconsistency {
        /// Name of the offending field.
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A port index is past the end of a component's port list.
    #[error("port {index} out of range for '{id}' ({count} ports)")]
    PortOutOfRange {
        /// Component identifier.
        id: String,
        /// Requested port index.
        index: usize,
        /// Number of ports the component exposes.
        count: usize,
    },

    /// No component with the given ID exists.
    #[error("component '{id}' not found")]
    ComponentNotFound {
        /// The missing component ID.
        id: String,
    },

    /// A component with the given ID already exists.
    #[error("component '{id}' already exists")]
    DuplicateComponent {
        /// The duplicate component ID.
        id: String,
    },

    /// A catalog row could not be read.
    #[error("catalog error at row {row}: {reason}")]
    Catalog {
        /// One-based data row number (0 for header or I/O failures).
        row: usize,
        /// Description of the failure.
        reason: String,
    },

    /// The geometry kernel rejected an operation.
    #[error("geometry kernel failed during {operation}: {message}")]
    Kernel {
        /// Recipe node being realized.
        operation: &'static str,
        /// Kernel-provided message.
        message: String,
    },
}

impl PipeError {
    /// Creates a geometric degeneracy error.
    #[must_use]
    pub fn degenerate(reason: impl Into<String>) -> Self {
        Self::GeometricDegeneracy(reason.into())
    }

    /// Creates an invalid selection error.
    ///
    /// # Example
    ///
    /// ```
    /// use pipe_types::PipeError;
    ///
    /// let error = PipeError::invalid_selection("path has no segments");
    /// assert!(error.to_string().contains("no segments"));
    /// ```
    #[must_use]
    pub fn invalid_selection(reason: impl Into<String>) -> Self {
        Self::InvalidSelection(reason.into())
    }

    /// Creates a non-solvable intersection error.
    #[must_use]
    pub fn no_intersection(reason: impl Into<String>) -> Self {
        Self::NonSolvableIntersection(reason.into())
    }

    /// Creates a dimension inconsistency error for `field`.
    #[must_use]
    pub fn dimension(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DimensionInconsistency {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a component-not-found error.
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::ComponentNotFound { id: id.into() }
    }

    /// Creates a catalog error for data row `row`.
    #[must_use]
    pub fn catalog(row: usize, reason: impl Into<String>) -> Self {
        Self::Catalog {
            row,
            reason: reason.into(),
        }
    }

    /// Creates a kernel error for the named recipe node.
    #[must_use]
    pub fn kernel(operation: &'static str, message: impl std::fmt::Display) -> Self {
        Self::Kernel {
            operation,
            message: message.to_string(),
        }
    }

    /// Returns the failure class of this error.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::GeometricDegeneracy(_) | Self::Kernel { .. } => {
                ErrorCategory::GeometricDegeneracy
            }
            Self::InvalidSelection(_)
            | Self::PortOutOfRange { .. }
            | Self::ComponentNotFound { .. }
            | Self::DuplicateComponent { .. } => ErrorCategory::InvalidSelection,
            Self::NonSolvableIntersection(_) => ErrorCategory::NonSolvableIntersection,
            Self::DimensionInconsistency { .. } | Self::Catalog { .. } => {
                ErrorCategory::DimensionInconsistency
            }
        }
    }

    /// Returns `true` if this is a geometric degeneracy.
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        matches!(self, Self::GeometricDegeneracy(_))
    }

    /// Returns `true` if this is an invalid selection.
    #[must_use]
    pub const fn is_invalid_selection(&self) -> bool {
        matches!(self, Self::InvalidSelection(_))
    }

    /// Returns `true` if this is a non-solvable intersection.
    #[must_use]
    pub const fn is_no_intersection(&self) -> bool {
        matches!(self, Self::NonSolvableIntersection(_))
    }

    /// Returns `true` if this is a dimension inconsistency.
    #[must_use]
    pub const fn is_dimension(&self) -> bool {
        matches!(self, Self::DimensionInconsistency { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(
            PipeError::degenerate("x").category(),
            ErrorCategory::GeometricDegeneracy
        );
        assert_eq!(
            PipeError::not_found("Pipe001").category(),
            ErrorCategory::InvalidSelection
        );
        assert_eq!(
            PipeError::no_intersection("skew").category(),
            ErrorCategory::NonSolvableIntersection
        );
        assert_eq!(
            PipeError::catalog(3, "missing OD").category(),
            ErrorCategory::DimensionInconsistency
        );
    }

    #[test]
    fn test_display() {
        let err = PipeError::PortOutOfRange {
            id: "Tee001".to_string(),
            index: 4,
            count: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("Tee001"));
        assert!(msg.contains("3 ports"));

        let err = PipeError::dimension("thk", "exceeds radius");
        assert!(err.is_dimension());
        assert!(err.to_string().contains("'thk'"));
    }
}

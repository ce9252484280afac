use thiserror::Error;

/// Result type alias using RefractError
pub type Result<T> = std::result::Result<T, RefractError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers and tests can match on
/// without depending on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A participating field could not be read
    Access,
    /// Two roots of unrelated types were passed to an ordering or diff
    TypeMismatch,
    /// A style or builder contract was violated by the caller
    Usage,
}

impl ErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Access => "ERR_ACCESS",
            ErrorKind::TypeMismatch => "ERR_TYPE_MISMATCH",
            ErrorKind::Usage => "ERR_USAGE",
        }
    }
}

// ========== End Error Facility ==========

/// Errors raised by the structural algorithms
///
/// Every error aborts the whole traversal: no partial hash, ordering, diff or
/// rendering is ever returned alongside one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RefractError {
    /// A participating field could not be read (unknown field, value already
    /// mutably borrowed, poisoned or contended lock, dangling index)
    #[error("cannot read field '{field}' of {type_name}: {reason}")]
    Access {
        type_name: String,
        field: String,
        reason: String,
    },

    /// The two values have no ancestor relation, or are of different kinds
    #[error("type mismatch: {left} is not comparable with {right}")]
    TypeMismatch { left: String, right: String },

    /// Style or builder contract violation
    #[error("usage error in {context}: {reason}")]
    Usage { context: String, reason: String },
}

impl RefractError {
    /// Access failure for a known field
    pub fn access(
        type_name: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        RefractError::Access {
            type_name: type_name.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Access failure raised below a field boundary, where the owning type and
    /// field are not yet known. `in_field` fills them in on the way up.
    pub fn unreadable(reason: impl Into<String>) -> Self {
        Self::access("", "", reason)
    }

    pub fn no_such_field(type_name: &str, field: &str) -> Self {
        Self::access(type_name, field, "no such field")
    }

    pub fn type_mismatch(left: impl Into<String>, right: impl Into<String>) -> Self {
        RefractError::TypeMismatch {
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn usage(context: impl Into<String>, reason: impl Into<String>) -> Self {
        RefractError::Usage {
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// Attach the owning type and field to an access error that lacks them.
    /// Errors that already carry a location keep the innermost one.
    pub fn in_field(self, owner: &str, name: &str) -> Self {
        match self {
            RefractError::Access {
                type_name,
                field,
                reason,
            } if type_name.is_empty() => RefractError::Access {
                type_name: owner.to_string(),
                field: if field.is_empty() {
                    name.to_string()
                } else {
                    field
                },
                reason,
            },
            other => other,
        }
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            RefractError::Access { .. } => ErrorKind::Access,
            RefractError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            RefractError::Usage { .. } => ErrorKind::Usage,
        }
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(ErrorKind::Access.code(), "ERR_ACCESS");
        assert_eq!(ErrorKind::TypeMismatch.code(), "ERR_TYPE_MISMATCH");
        assert_eq!(ErrorKind::Usage.code(), "ERR_USAGE");
    }

    #[test]
    fn test_in_field_fills_missing_location() {
        let err = RefractError::unreadable("already mutably borrowed").in_field("Node", "next");
        assert_eq!(
            err,
            RefractError::access("Node", "next", "already mutably borrowed")
        );
    }

    #[test]
    fn test_in_field_keeps_innermost_location() {
        let err = RefractError::access("Inner", "value", "poisoned").in_field("Outer", "inner");
        assert_eq!(err, RefractError::access("Inner", "value", "poisoned"));
    }

    #[test]
    fn test_in_field_leaves_other_kinds_alone() {
        let err = RefractError::usage("JSON_STYLE", "field name required").in_field("A", "b");
        assert_eq!(err.kind(), ErrorKind::Usage);
    }

    #[test]
    fn test_display_names_type_and_field() {
        let err = RefractError::no_such_field("Point", "z");
        assert_eq!(err.to_string(), "cannot read field 'z' of Point: no such field");
    }
}

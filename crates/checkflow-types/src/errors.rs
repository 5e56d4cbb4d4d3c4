//! Error types for the Checkflow layer
//!
//! Two tiers, deliberately kept apart:
//!
//! - [`ContractError`]: contract-validation failures raised before any check
//!   executes. These indicate a suite-definition or invocation bug and
//!   propagate out of `run()` to the caller.
//! - [`CheckFailure`]: a failure raised inside a check body or a
//!   setup/teardown hook. These are always caught by the engine and recorded
//!   as data in the run report; they never escape `run()`.

/// Errors raised during contract validation, before any check executes
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContractError {
    #[error("missing required parameters: {}", .0.join(", "))]
    MissingParameters(Vec<String>),

    #[error("unknown parameters: {}", .0.join(", "))]
    UnknownParameters(Vec<String>),

    #[error("illegal exclusive group: {0}")]
    IllegalGroupDefinition(String),

    #[error("mutually exclusive violation: {0}")]
    MutuallyExclusiveViolation(String),

    #[error("check '{check}' depends on unknown check '{dependency}'")]
    UnknownDependency { check: String, dependency: String },

    #[error("dependency cycle among checks: {}", .0.join(", "))]
    DependencyCycle(Vec<String>),

    #[error("duplicate check name: {0}")]
    DuplicateCheck(String),
}

/// Result type alias for contract operations
pub type ContractResult<T> = Result<T, ContractError>;

/// A failure raised by a check body or a setup/teardown hook.
///
/// Carries the message that ends up in the check's recorded result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct CheckFailure(pub String);

impl CheckFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl From<String> for CheckFailure {
    fn from(message: String) -> Self {
        Self(message)
    }
}

impl From<&str> for CheckFailure {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_error_lists_all_offenders() {
        let err = ContractError::MissingParameters(vec!["host".into(), "port".into()]);
        assert_eq!(err.to_string(), "missing required parameters: host, port");
    }

    #[test]
    fn test_unknown_dependency_display() {
        let err = ContractError::UnknownDependency {
            check: "test_routes".into(),
            dependency: "test_connect".into(),
        };
        assert!(err.to_string().contains("test_routes"));
        assert!(err.to_string().contains("test_connect"));
    }

    #[test]
    fn test_check_failure_from_str() {
        let failure = CheckFailure::from("boom");
        assert_eq!(failure.message(), "boom");
        assert_eq!(failure.to_string(), "boom");
    }
}

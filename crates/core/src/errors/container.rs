use thiserror::Error;

use crate::reflect::TypeKind;

/// Errors returned by container operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContainerError {
    #[error("binding error! Invalid arguments")]
    InvalidBindArguments,

    #[error("{concrete} is not an instance of {contract}")]
    ConcreteDoesNotImplementContract { concrete: String, contract: String },

    #[error("non-supported kind of concrete. Got {kind}")]
    UnsupportedConcreteKind { kind: TypeKind },

    #[error("called record_of with a value that is not a record or a reference to one")]
    ConcreteIsNotARecord,

    #[error("expects {expected}. Got {got}")]
    RecordTypeMismatch { expected: String, got: String },

    #[error("resolving error! Invalid arguments")]
    InvalidResolveArguments,

    #[error("{abstraction} is not bound yet")]
    AbstractNotBound { abstraction: String },

    #[error("type {kind} is not supported")]
    UnsupportedStoredConcreteKind { kind: TypeKind },

    #[error("expects to have {expected} input arguments. Got {got}")]
    InsufficientArguments { expected: usize, got: usize },

    #[error("expects to have at least 1 value returned. Got 0")]
    NoValuesReturned,

    #[error("argument {index} expects {expected}. Got {got}")]
    ArgumentTypeMismatch {
        index: usize,
        expected: String,
        got: String,
    },

    #[error("injecting to {kind} is not supported")]
    InvalidInjectTargetType { kind: TypeKind },

    #[error("field {field} expects {expected}. Got {got}")]
    IncompatibleFieldValue {
        field: String,
        expected: String,
        got: String,
    },

    #[error("injection exceeded the maximum depth of {limit}")]
    InjectionDepthExceeded { limit: usize },

    #[error("resolved value is not {expected}. Got {got}")]
    ResolvedTypeMismatch { expected: String, got: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl ContainerError {
    pub fn concrete_does_not_implement_contract(
        concrete: impl Into<String>,
        contract: impl Into<String>,
    ) -> Self {
        Self::ConcreteDoesNotImplementContract {
            concrete: concrete.into(),
            contract: contract.into(),
        }
    }

    pub fn record_type_mismatch(expected: impl Into<String>, got: impl Into<String>) -> Self {
        Self::RecordTypeMismatch {
            expected: expected.into(),
            got: got.into(),
        }
    }

    pub fn abstract_not_bound(abstraction: impl Into<String>) -> Self {
        Self::AbstractNotBound {
            abstraction: abstraction.into(),
        }
    }

    pub fn insufficient_arguments(expected: usize, got: usize) -> Self {
        Self::InsufficientArguments { expected, got }
    }

    pub fn argument_type_mismatch(
        index: usize,
        expected: impl Into<String>,
        got: impl Into<String>,
    ) -> Self {
        Self::ArgumentTypeMismatch {
            index,
            expected: expected.into(),
            got: got.into(),
        }
    }

    pub fn incompatible_field_value(
        field: impl Into<String>,
        expected: impl Into<String>,
        got: impl Into<String>,
    ) -> Self {
        Self::IncompatibleFieldValue {
            field: field.into(),
            expected: expected.into(),
            got: got.into(),
        }
    }

    pub fn resolved_type_mismatch(expected: impl Into<String>, got: impl Into<String>) -> Self {
        Self::ResolvedTypeMismatch {
            expected: expected.into(),
            got: got.into(),
        }
    }

    /// Create a new configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Check if the error reports a missing binding
    pub fn is_not_bound(&self) -> bool {
        matches!(self, Self::AbstractNotBound { .. })
    }

    /// Check if the error was raised while validating a bind call
    pub fn is_bind_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidBindArguments
                | Self::ConcreteDoesNotImplementContract { .. }
                | Self::UnsupportedConcreteKind { .. }
                | Self::ConcreteIsNotARecord
                | Self::RecordTypeMismatch { .. }
        )
    }
}

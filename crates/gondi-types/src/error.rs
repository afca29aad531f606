//! Error types for the Gondi client
//!
//! Every failure is terminal for the action that raised it. Nothing in this
//! workspace retries on its own.

use crate::B256;
use thiserror::Error;

/// Result type for gondi operations
pub type Result<T> = std::result::Result<T, GondiError>;

/// Coarse classification of a [`GondiError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Rejected locally, before any network call
    Validation,
    /// The signer capability refused or failed
    Signing,
    /// The ledger rejected the call or the call reverted
    Submission,
    /// Included, but the expected events did not appear
    ConfirmationMismatch,
    /// The remote catalog failed
    Catalog,
    /// A payload could not be decoded
    Decode,
    /// Bad or missing configuration
    Config,
}

/// Gondi error types
#[derive(Debug, Clone, Error)]
pub enum GondiError {
    // ========================================================================
    // Validation Errors
    // ========================================================================

    /// Composite id could not be parsed
    #[error("Invalid id {id:?}: {reason}")]
    InvalidCompositeId { id: String, reason: String },

    /// Invalid input
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    /// The catalog could not resolve a collateral address
    #[error("Invalid {subject}: collateral address could not be resolved")]
    UnresolvedCollateral { subject: String },

    /// A batch action was given nothing to do
    #[error("{reason}")]
    EmptyBatch { reason: String },

    /// The selected protocol version has no such action
    #[error("{action} is not supported by MultiSourceLoan {version}")]
    UnsupportedAction { action: String, version: String },

    // ========================================================================
    // Signing Errors
    // ========================================================================

    /// Signer capability rejected the request
    #[error("Signing failed: {reason}")]
    Signing { reason: String },

    // ========================================================================
    // Submission Errors
    // ========================================================================

    /// The ledger rejected the call, or the included call reverted
    #[error("Submission failed: {reason}")]
    Submission {
        tx_hash: Option<B256>,
        reason: String,
        /// Ledger-supplied diagnostics, passed through untouched
        diagnostics: Option<serde_json::Value>,
    },

    // ========================================================================
    // Confirmation Errors
    // ========================================================================

    /// The call was included but its domain effect differs from the request
    #[error("{message}")]
    ConfirmationMismatch {
        tx_hash: B256,
        /// Action-specific description, e.g. "Loan not emitted"
        message: String,
        /// Event(s) the correlator looked for
        expected: String,
        /// Number of matching events found
        found: usize,
    },

    /// A matching event carried arguments of the wrong shape
    #[error("Could not decode {event} event: {reason}")]
    EventDecode { event: String, reason: String },

    // ========================================================================
    // Catalog Errors
    // ========================================================================

    /// Remote catalog request failed
    #[error("Catalog error: {message}")]
    Catalog {
        status: Option<u16>,
        message: String,
    },

    // ========================================================================
    // General Errors
    // ========================================================================

    /// Configuration error
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl GondiError {
    /// Create an invalid composite id error
    pub fn invalid_id(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCompositeId {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an unsupported action error
    pub fn unsupported(action: impl Into<String>, version: impl ToString) -> Self {
        Self::UnsupportedAction {
            action: action.into(),
            version: version.to_string(),
        }
    }

    /// Create a signing error
    pub fn signing(reason: impl Into<String>) -> Self {
        Self::Signing {
            reason: reason.into(),
        }
    }

    /// Create a submission error without a transaction hash
    pub fn submission(reason: impl Into<String>) -> Self {
        Self::Submission {
            tx_hash: None,
            reason: reason.into(),
            diagnostics: None,
        }
    }

    /// Create a catalog error
    pub fn catalog(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Catalog {
            status,
            message: message.into(),
        }
    }

    /// Coarse classification
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidCompositeId { .. }
            | Self::InvalidInput { .. }
            | Self::UnresolvedCollateral { .. }
            | Self::EmptyBatch { .. }
            | Self::UnsupportedAction { .. } => ErrorKind::Validation,
            Self::Signing { .. } => ErrorKind::Signing,
            Self::Submission { .. } => ErrorKind::Submission,
            Self::ConfirmationMismatch { .. } => ErrorKind::ConfirmationMismatch,
            Self::EventDecode { .. } | Self::Serialization(_) => ErrorKind::Decode,
            Self::Catalog { .. } => ErrorKind::Catalog,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Whether a caller-side orchestration layer could reasonably retry.
    ///
    /// Only transport-level catalog failures qualify; everything else is
    /// terminal for the action.
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::Catalog { status: None, .. })
            || matches!(self, Self::Catalog { status: Some(s), .. } if *s >= 500)
    }

    /// Get an error code for API responses and logs
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCompositeId { .. } => "INVALID_COMPOSITE_ID",
            Self::InvalidInput { .. } => "INVALID_INPUT",
            Self::UnresolvedCollateral { .. } => "UNRESOLVED_COLLATERAL",
            Self::EmptyBatch { .. } => "EMPTY_BATCH",
            Self::UnsupportedAction { .. } => "UNSUPPORTED_ACTION",
            Self::Signing { .. } => "SIGNING_FAILED",
            Self::Submission { .. } => "SUBMISSION_FAILED",
            Self::ConfirmationMismatch { .. } => "CONFIRMATION_MISMATCH",
            Self::EventDecode { .. } => "EVENT_DECODE_FAILED",
            Self::Catalog { .. } => "CATALOG_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for GondiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

//! Common error infrastructure for survivor-core.
//!
//! Domain-specific errors (e.g. `DamagePacketError`, `PipelineError`) are
//! defined next to the code that raises them. This module provides the
//! shared classification used across all of them.
//!
//! # Taxonomy
//!
//! - **Construction-time validation** errors are returned as `Err` and fail
//!   fast before any state is mutated.
//! - **Soft data errors** (unknown stat names, unknown tags, missing catalog
//!   ids) never become errors; they are reported as diagnostics and logged.
//! - **Invariant violations** are prevented by clamping at the point of
//!   mutation, so they have no error type at all.

/// Severity level of an error, used for categorization and logging priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - the caller may retry with different input.
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: negative damage, non-finite penetration ratio
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,

    /// Fatal error - the simulation cannot be set up.
    ///
    /// Examples: missing ship definition, invalid configuration
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all survivor-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

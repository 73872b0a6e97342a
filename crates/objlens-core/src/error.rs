//! # Error Types
//!
//! General error handling for object introspection.
//!
//! We use `thiserror` to automatically generate `Error` trait implementations
//! and nice error messages.

use thiserror::Error;

/// Main error type for introspection operations
///
/// Each variant corresponds to a specific way a render can fail while talking
/// to the host debugger or interpreting what the runtime handed back.
///
/// ## Error Categories
///
/// 1. **Host errors**: Evaluation, MemoryRead
/// 2. **Protocol errors**: Protocol (the in-process helper returned something we can't parse)
/// 3. **Lookup errors**: FieldNotFound
/// 4. **Input errors**: InvalidArgument
/// 5. **I/O errors**: Io, Snapshot
#[derive(Error, Debug)]
pub enum InspectError
{
    /// An expression could not be evaluated in the target process
    ///
    /// This happens when:
    /// - The process is running (it must be stopped at a single point)
    /// - The expression is malformed or names an unknown function
    /// - A symbol the expression depends on is not loaded
    /// - The host cancelled the evaluation
    #[error("Evaluation failed for `{expr}`: {reason}")]
    Evaluation
    {
        /// Expression text sent to the host
        expr: String,
        /// Host-provided failure description
        reason: String,
    },

    /// Memory at the given address could not be read
    ///
    /// The address is unmapped, or the process is not stopped.
    #[error("Failed to read memory at 0x{address:016x}: {reason}")]
    MemoryRead
    {
        /// Address of the attempted read
        address: u64,
        /// Host-provided failure description
        reason: String,
    },

    /// The in-process classification helper returned text that does not
    /// follow the expected `|`/`,` delimited grammar
    ///
    /// Never guessed around: a shape we cannot parse fails the render.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// A record has no field with the requested name
    #[error("Field not found: {0}")]
    FieldNotFound(String),

    /// Invalid argument passed to an introspection function
    ///
    /// Examples:
    /// - A diagnostic command received an unparsable address
    /// - A symbol pattern is not a valid regular expression
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A captured process snapshot could not be decoded
    #[error("Invalid snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// I/O error (for snapshot files, command output sinks, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl InspectError
{
    /// Shorthand for an [`InspectError::Evaluation`] failure.
    pub fn evaluation(expr: impl Into<String>, reason: impl Into<String>) -> Self
    {
        Self::Evaluation {
            expr: expr.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for an [`InspectError::MemoryRead`] failure.
    pub fn memory_read(address: u64, reason: impl Into<String>) -> Self
    {
        Self::MemoryRead {
            address,
            reason: reason.into(),
        }
    }
}

/// Convenience type alias for `Result<T, InspectError>`
///
/// ```rust
/// use objlens_core::error::InspectResult;
/// fn foo() -> InspectResult<()>
/// {
///     Ok(())
/// }
/// ```
pub type InspectResult<T> = std::result::Result<T, InspectError>;

//! Error types for the coupled baffle boundary condition.
//!
//! Configuration and coupling-resolution failures are never recovered
//! locally: they propagate to whoever builds the boundary or drives the
//! iteration. Degenerate face geometry is not an error; it is recovered in
//! place and only logged.

use math_fvm::FvmError;
use thiserror::Error;

/// Errors raised while building or updating a baffle boundary condition.
#[derive(Debug, Error)]
pub enum BaffleError {
    /// A required entry is missing or malformed, or a value is out of range.
    #[error("invalid configuration for patch '{patch}': {reason}")]
    Configuration {
        /// Patch being configured
        patch: String,
        /// What was wrong with the configuration
        reason: String,
    },

    /// The neighbour region, patch or field could not be resolved.
    #[error("cannot resolve neighbour field '{field}' for patch '{patch}': {source}")]
    CouplingResolution {
        /// Local patch being updated
        patch: String,
        /// Neighbour field that was requested
        field: String,
        /// Failure reported by the coupling substrate
        #[source]
        source: FvmError,
    },

    /// Any other failure of the finite-volume collaborators.
    #[error("field error: {0}")]
    Field(#[from] FvmError),
}

/// A specialized `Result` type for baffle operations.
pub type Result<T> = std::result::Result<T, BaffleError>;

impl BaffleError {
    /// Returns `true` if this is a configuration error.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, BaffleError::Configuration { .. })
    }

    /// Returns `true` if the neighbour side could not be resolved.
    pub fn is_coupling_error(&self) -> bool {
        matches!(self, BaffleError::CouplingResolution { .. })
    }

    pub(crate) fn configuration(patch: &str, reason: impl ToString) -> Self {
        BaffleError::Configuration {
            patch: patch.to_string(),
            reason: reason.to_string(),
        }
    }
}

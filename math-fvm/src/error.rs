//! Error types for the finite-volume collaborators.
//!
//! Dictionary lookups, region/patch resolution and coupling reads all report
//! through [`FvmError`], following the same `thiserror` pattern as the other
//! crates of the workspace.

use thiserror::Error;

/// Errors raised by meshes, dictionaries and the region database.
#[derive(Debug, Error)]
pub enum FvmError {
    /// A required dictionary entry is absent.
    #[error("missing required entry '{key}'")]
    MissingEntry {
        /// Name of the missing key
        key: String,
    },

    /// A dictionary entry is present but cannot be interpreted.
    #[error("malformed entry '{key}': {reason}")]
    MalformedEntry {
        /// Name of the offending key
        key: String,
        /// Why the entry was rejected
        reason: String,
    },

    /// No region with this name is registered.
    #[error("unknown region '{region}'")]
    UnknownRegion {
        /// Requested region name
        region: String,
    },

    /// The region exists but has no patch with this name.
    #[error("unknown patch '{patch}' on region '{region}'")]
    UnknownPatch {
        /// Region searched
        region: String,
        /// Requested patch name
        patch: String,
    },

    /// The region exists but holds no field with this name.
    #[error("unknown field '{field}' on region '{region}'")]
    UnknownField {
        /// Region searched
        region: String,
        /// Requested field name
        field: String,
    },

    /// The patch carries no link to a neighbouring region.
    #[error("patch '{patch}' is not coupled to any region")]
    NotCoupled {
        /// Patch without a link
        patch: String,
    },

    /// No conductivity was published for the neighbouring patch.
    #[error("no conductivity published for patch '{patch}' on region '{region}'")]
    MissingConductivity {
        /// Region of the patch
        region: String,
        /// Patch without conductivity
        patch: String,
    },

    /// A conductivity value is negative or not finite.
    #[error("invalid conductivity: {value} (must be finite and >= 0)")]
    InvalidConductivity {
        /// The rejected value
        value: f64,
    },

    /// Two per-face quantities that must line up do not.
    #[error("{what} size mismatch: expected {expected}, got {got}")]
    SizeMismatch {
        /// Quantity being checked
        what: String,
        /// Expected length
        expected: usize,
        /// Actual length
        got: usize,
    },

    /// A patch face addresses a cell outside the internal field.
    #[error("face {face} addresses cell {cell}, but the field has {n_cells} cells")]
    CellOutOfRange {
        /// Face index on the patch
        face: usize,
        /// Addressed cell
        cell: usize,
        /// Internal field length
        n_cells: usize,
    },

    /// Reading or writing a dictionary file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A dictionary document is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized `Result` type for finite-volume collaborator operations.
pub type Result<T> = std::result::Result<T, FvmError>;

impl FvmError {
    /// Returns `true` if this error comes from reading a dictionary.
    ///
    /// This includes `MissingEntry`, `MalformedEntry` and `Json` variants.
    pub fn is_dictionary_error(&self) -> bool {
        matches!(
            self,
            FvmError::MissingEntry { .. } | FvmError::MalformedEntry { .. } | FvmError::Json(_)
        )
    }

    /// Returns `true` if this error comes from resolving coupled data.
    ///
    /// This includes unknown regions, patches and fields, unlinked patches
    /// and missing neighbour conductivity.
    pub fn is_coupling_error(&self) -> bool {
        matches!(
            self,
            FvmError::UnknownRegion { .. }
                | FvmError::UnknownPatch { .. }
                | FvmError::UnknownField { .. }
                | FvmError::NotCoupled { .. }
                | FvmError::MissingConductivity { .. }
        )
    }

    pub(crate) fn malformed(key: &str, reason: impl Into<String>) -> Self {
        FvmError::MalformedEntry {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn size_mismatch(what: impl Into<String>, expected: usize, got: usize) -> Self {
        FvmError::SizeMismatch {
            what: what.into(),
            expected,
            got,
        }
    }
}

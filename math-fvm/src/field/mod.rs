//! Patch fields
//!
//! Provides:
//! - [`FieldRef`], the handle a boundary condition keeps to its internal field
//! - [`MixedPatchField`], the mixed (Robin) per-face state and its coefficients
//! - [`FieldMapper`] implementations for carrying patch data across remeshing

mod mapper;
mod mixed;

pub use mapper::*;
pub use mixed::*;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Names the internal field a patch field belongs to.
///
/// The handle never owns cell values; the region database or the solver does.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldRef {
    /// Region the field lives on
    pub region: String,
    /// Field name, e.g. `"V"`
    pub name: String,
}

impl FieldRef {
    pub fn new(region: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.region, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_ref_display() {
        let field = FieldRef::new("solid", "V");
        assert_eq!(field.to_string(), "solid/V");
    }
}

//! Finite-volume building blocks for multi-region coupling
//!
//! This crate provides the collaborators a baffle boundary condition relies on,
//! each kept to the minimum a coupled boundary needs:
//!
//! - **Meshes**: regions, boundary patches with face areas and face-to-cell
//!   distances, and baffle links between patches of different regions
//! - **Patch fields**: the mixed (Robin) per-face state with its matrix
//!   coefficients, and face mappers for remeshing
//! - **Coupling**: a region database answering neighbour-patch queries
//! - **Dictionaries**: JSON configuration with typed lookups
//!
//! # Example
//!
//! ```ignore
//! use math_fvm::coupling::{CouplingSource, RegionDatabase};
//! use math_fvm::mesh::{layered_block, link_baffle, BOTTOM_PATCH, TOP_PATCH};
//!
//! let mut fluid = layered_block("fluid", 3, 4, 1.0, 1.0)?;
//! let mut solid = layered_block("solid", 3, 4, 1.0, 1.0)?;
//! link_baffle(&mut fluid, TOP_PATCH, &mut solid, BOTTOM_PATCH)?;
//!
//! let mut db = RegionDatabase::new();
//! db.add_region(&fluid)?;
//! db.add_region(&solid)?;
//! db.add_field("solid", "V", ndarray::Array1::zeros(12))?;
//! db.set_patch_conductivity("solid", BOTTOM_PATCH, 2.0)?;
//!
//! let data = db.neighbour_patch_data(fluid.require_patch(TOP_PATCH)?, "V")?;
//! ```

pub mod coupling;
pub mod dictionary;
pub mod error;
pub mod field;
pub mod mesh;

pub use coupling::{CouplingSource, NeighbourPatchData, RegionDatabase, ScalarField};
pub use dictionary::Dictionary;
pub use error::{FvmError, Result};
pub use field::{DirectMapper, FieldMapper, FieldRef, MixedPatchField, PatchCoefficients};
pub use mesh::{Patch, PatchLink, RegionMesh};

/// Library version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}

//! Coupled potential baffle boundary condition
//!
//! A mixed (Robin) condition for an electric potential on a patch shared with
//! another region. Each update reads the neighbour's face values and
//! conductivity and sets:
//!
//! - the reference value to the neighbour face value
//! - the value fraction to the local share of the face conductance
//! - the reference gradient to zero
//!
//! # Example
//!
//! ```ignore
//! use math_fvm::{Dictionary, FieldRef, RegionDatabase};
//! use math_fvm_baffle::CoupledPotentialBoundary;
//!
//! let dict = Dictionary::from_json_str(
//!     r#"{"type": "potentialCoupledBaffleMixed", "conductivity": 2.0}"#,
//! )?;
//! let mut bc = CoupledPotentialBoundary::from_dictionary(patch, FieldRef::new("fluid", "V"), &dict)?;
//! let report = bc.update_coefficients(&db)?;
//! bc.evaluate(&cell_values)?;
//! ```

pub mod condition;
pub mod error;
pub mod potential;
pub mod registry;
pub mod weighting;

pub use condition::{PatchCondition, UpdateReport};
pub use error::{BaffleError, Result};
pub use potential::CoupledPotentialBoundary;
pub use registry::{ConditionConstructor, ConditionTable};
pub use weighting::{Degeneracy, FaceWeight, face_weight};

/// Library version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

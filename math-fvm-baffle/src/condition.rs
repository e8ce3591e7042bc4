//! Capability shared by every patch condition the factory can build

use crate::error::Result;
use math_fvm::{CouplingSource, Dictionary, FieldRef, MixedPatchField, Patch};
use ndarray::Array1;
use std::fmt;

/// Outcome of one coefficient update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Number of faces updated
    pub faces: usize,
    /// Faces that fell back to equal weighting because of degenerate geometry
    pub degenerate_faces: Vec<usize>,
}

impl UpdateReport {
    /// Returns `true` if no face needed the equal-weight fallback
    pub fn is_clean(&self) -> bool {
        self.degenerate_faces.is_empty()
    }
}

/// A boundary condition attached to a patch of mesh `'m`.
///
/// The solver drives it once per outer iteration: `update_coefficients`
/// before assembly, then `evaluate` once new cell values are known.
pub trait PatchCondition<'m>: fmt::Debug {
    /// Type tag under which the condition is registered
    fn type_name(&self) -> &'static str;

    /// Patch the condition is attached to
    fn patch(&self) -> &'m Patch;

    /// Internal field the condition belongs to
    fn field(&self) -> &FieldRef;

    /// Current mixed-condition state
    fn mixed(&self) -> &MixedPatchField;

    /// Recompute the blend parameters from the coupled side
    fn update_coefficients(&mut self, coupling: &dyn CouplingSource) -> Result<UpdateReport>;

    /// Evaluate the patch value from the cell values of the internal field
    fn evaluate(&mut self, internal: &Array1<f64>) -> Result<()>;

    /// Write the condition in the schema it is read from
    fn write(&self, dict: &mut Dictionary);

    /// Owned copy bound to another internal field
    fn clone_condition(&self, field: FieldRef) -> Box<dyn PatchCondition<'m> + 'm>;
}

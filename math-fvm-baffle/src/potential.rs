//! Coupled potential baffle condition
//!
//! Couples an electric potential across a baffle between two separately meshed
//! regions. On every update the condition reads the neighbour's face values and
//! conductivity and turns them into mixed-condition parameters:
//!
//! - `refValue`: the neighbour's face value (continuity target)
//! - `valueFraction`: the local share of the face conductance, see
//!   [`face_weight`]
//! - `refGradient`: zero, there is no imposed flux on this path
//!
//! Example boundary entry:
//!
//! ```text
//! {
//!     "type": "potentialCoupledBaffleMixed",
//!     "conductivity": 2.0,
//!     "neighborFieldName": "V"
//! }
//! ```

use crate::condition::{PatchCondition, UpdateReport};
use crate::error::{BaffleError, Result};
use crate::weighting::{FaceWeight, face_weight};
use math_fvm::field::VALUE_KEY;
use math_fvm::{
    CouplingSource, Dictionary, FieldMapper, FieldRef, FvmError, MixedPatchField, Patch,
};
use ndarray::{Array1, Zip};

/// Type tag of the condition
pub const TYPE_NAME: &str = "potentialCoupledBaffleMixed";
/// Dictionary key of the condition type
pub const TYPE_KEY: &str = "type";
/// Dictionary key of the local conductivity
pub const CONDUCTIVITY_KEY: &str = "conductivity";
/// Dictionary key of the neighbour field name
pub const NEIGHBOUR_FIELD_KEY: &str = "neighborFieldName";

/// Mixed condition coupling a potential field across a baffle
#[derive(Debug, Clone, PartialEq)]
pub struct CoupledPotentialBoundary<'m> {
    patch: &'m Patch,
    field: FieldRef,
    neighbour_field_name: String,
    conductivity: f64,
    mixed: MixedPatchField,
}

impl<'m> CoupledPotentialBoundary<'m> {
    /// Defaults with no coupled data yet: zero conductivity, neighbour field
    /// named like the local one, pure fixed value at zero.
    pub fn new(patch: &'m Patch, field: FieldRef) -> Self {
        Self {
            patch,
            neighbour_field_name: field.name.clone(),
            field,
            conductivity: 0.0,
            mixed: MixedPatchField::uniform(patch.size(), 0.0, 0.0, 1.0),
        }
    }

    /// Read the condition from its boundary dictionary
    pub fn from_dictionary(patch: &'m Patch, field: FieldRef, dict: &Dictionary) -> Result<Self> {
        let configuration = |e: FvmError| BaffleError::configuration(&patch.name, e);

        if dict.contains(TYPE_KEY) {
            let type_name = dict.lookup_word(TYPE_KEY).map_err(configuration)?;
            if type_name != TYPE_NAME {
                return Err(BaffleError::configuration(
                    &patch.name,
                    format!("expected type '{TYPE_NAME}', got '{type_name}'"),
                ));
            }
        }

        let conductivity = dict
            .lookup_scalar(CONDUCTIVITY_KEY)
            .map_err(configuration)?;
        if !conductivity.is_finite() || conductivity < 0.0 {
            return Err(BaffleError::configuration(
                &patch.name,
                format!("conductivity must be finite and >= 0, got {conductivity}"),
            ));
        }

        if !dict.contains(NEIGHBOUR_FIELD_KEY) {
            log::debug!(
                "patch '{}': no {NEIGHBOUR_FIELD_KEY}, coupling to '{}'",
                patch.name,
                field.name
            );
        }
        let neighbour_field_name = dict
            .lookup_word_or(NEIGHBOUR_FIELD_KEY, &field.name)
            .map_err(configuration)?;

        let size = patch.size();
        let mixed = match MixedPatchField::read(dict, size).map_err(configuration)? {
            Some(mixed) => mixed,
            None => {
                // Fixed value at the stored value until the first update
                let value = if dict.contains(VALUE_KEY) {
                    dict.lookup_field(VALUE_KEY, size).map_err(configuration)?
                } else {
                    Array1::zeros(size)
                };
                let mut mixed = MixedPatchField::new(size);
                mixed.set_coefficients(value.clone(), Array1::zeros(size), Array1::ones(size))?;
                mixed.set_value(value)?;
                mixed
            }
        };

        Ok(Self {
            patch,
            field,
            neighbour_field_name,
            conductivity,
            mixed,
        })
    }

    /// Map an existing condition onto a new patch.
    ///
    /// Conductivity and neighbour field name are copied; every per-face array
    /// goes through `mapper`, which must produce one entry per face of `patch`.
    pub fn mapped(
        other: &CoupledPotentialBoundary<'_>,
        patch: &'m Patch,
        field: FieldRef,
        mapper: &dyn FieldMapper,
    ) -> Result<Self> {
        if mapper.size() != patch.size() {
            return Err(BaffleError::configuration(
                &patch.name,
                format!(
                    "mapper produces {} faces, patch has {}",
                    mapper.size(),
                    patch.size()
                ),
            ));
        }
        Ok(Self {
            patch,
            field,
            neighbour_field_name: other.neighbour_field_name.clone(),
            conductivity: other.conductivity,
            mixed: other.mixed.map(mapper)?,
        })
    }

    /// Copy bound to another internal field. Nothing is recomputed.
    pub fn rebind(&self, field: FieldRef) -> Self {
        Self {
            field,
            ..self.clone()
        }
    }

    /// Copy the per-face state of `other` into the faces listed in `addressing`
    pub fn rmap(&mut self, other: &CoupledPotentialBoundary<'_>, addressing: &[usize]) -> Result<()> {
        self.mixed.rmap(&other.mixed, addressing)?;
        Ok(())
    }

    /// Local conductivity
    pub fn conductivity(&self) -> f64 {
        self.conductivity
    }

    /// Name of the field matched on the neighbouring region
    pub fn neighbour_field_name(&self) -> &str {
        &self.neighbour_field_name
    }

    pub fn patch(&self) -> &'m Patch {
        self.patch
    }

    pub fn field(&self) -> &FieldRef {
        &self.field
    }

    pub fn mixed(&self) -> &MixedPatchField {
        &self.mixed
    }

    pub fn value_fraction(&self) -> &Array1<f64> {
        self.mixed.value_fraction()
    }

    pub fn ref_value(&self) -> &Array1<f64> {
        self.mixed.ref_value()
    }

    pub fn ref_grad(&self) -> &Array1<f64> {
        self.mixed.ref_grad()
    }

    /// Recompute value fraction, reference value and reference gradient from
    /// the neighbour side.
    ///
    /// Fails without touching the current state if the neighbour data cannot
    /// be resolved. Faces with degenerate geometry get equal weighting and are
    /// listed in the report.
    pub fn update_coefficients(&mut self, coupling: &dyn CouplingSource) -> Result<UpdateReport> {
        let patch = self.patch;
        let unresolved = |source: FvmError| BaffleError::CouplingResolution {
            patch: patch.name.clone(),
            field: self.neighbour_field_name.clone(),
            source,
        };

        let data = coupling
            .neighbour_patch_data(patch, &self.neighbour_field_name)
            .map_err(unresolved)?;

        let n = patch.size();
        for (what, got) in [
            ("neighbour values", data.values.len()),
            ("neighbour conductivity", data.conductivity.len()),
            ("neighbour distances", data.cell_distances.len()),
        ] {
            if got != n {
                return Err(unresolved(FvmError::SizeMismatch {
                    what: what.to_string(),
                    expected: n,
                    got,
                }));
            }
        }
        if patch.cell_distances.len() != n {
            return Err(FvmError::SizeMismatch {
                what: format!("cell distances of '{}'", patch.name),
                expected: n,
                got: patch.cell_distances.len(),
            }
            .into());
        }

        let local = self.conductivity;
        let weights = Zip::from(&patch.cell_distances)
            .and(&data.conductivity)
            .and(&data.cell_distances)
            .map_collect(|&d, &c_nbr, &d_nbr| face_weight(local, d, c_nbr, d_nbr));

        let mut report = UpdateReport {
            faces: n,
            degenerate_faces: Vec::new(),
        };
        for (face, weight) in weights.iter().enumerate() {
            if let FaceWeight::Degenerate(reason) = weight {
                log::warn!(
                    "patch '{}' face {face}: {reason}, falling back to equal weighting",
                    patch.name
                );
                report.degenerate_faces.push(face);
            }
        }

        let value_fraction = weights.mapv(FaceWeight::value);
        self.mixed
            .set_coefficients(data.values, Array1::zeros(n), value_fraction)?;

        log::debug!(
            "patch '{}' coupled to {}/{} field '{}': {} faces, value fraction in [{:.4}, {:.4}]",
            patch.name,
            data.region,
            data.patch,
            self.neighbour_field_name,
            n,
            self.mixed
                .value_fraction()
                .iter()
                .copied()
                .fold(f64::INFINITY, f64::min),
            self.mixed
                .value_fraction()
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max),
        );
        Ok(report)
    }

    /// Evaluate the patch value from the cell values of the internal field
    pub fn evaluate(&mut self, internal: &Array1<f64>) -> Result<()> {
        let patch_internal = self.patch.patch_internal_field(internal)?;
        self.mixed
            .evaluate(&patch_internal, &self.patch.cell_distances)?;
        Ok(())
    }

    /// Normal gradient at the faces given the cell values of the internal field
    pub fn sn_grad(&self, internal: &Array1<f64>) -> Result<Array1<f64>> {
        let patch_internal = self.patch.patch_internal_field(internal)?;
        Ok(self
            .mixed
            .sn_grad(&patch_internal, &self.patch.delta_coeffs())?)
    }

    /// Potential flux through each face, `conductivity * area * snGrad`
    pub fn face_flux(&self, internal: &Array1<f64>) -> Result<Array1<f64>> {
        Ok(self.sn_grad(internal)? * &self.patch.face_areas * self.conductivity)
    }

    /// Write the condition entries
    pub fn write(&self, dict: &mut Dictionary) {
        dict.add(TYPE_KEY, TYPE_NAME);
        dict.add(CONDUCTIVITY_KEY, self.conductivity);
        dict.add(NEIGHBOUR_FIELD_KEY, self.neighbour_field_name.as_str());
        self.mixed.write(dict);
    }

    /// The written entries as a fresh dictionary
    pub fn to_dictionary(&self) -> Dictionary {
        let mut dict = Dictionary::new();
        self.write(&mut dict);
        dict
    }
}

impl<'m> PatchCondition<'m> for CoupledPotentialBoundary<'m> {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn patch(&self) -> &'m Patch {
        self.patch
    }

    fn field(&self) -> &FieldRef {
        &self.field
    }

    fn mixed(&self) -> &MixedPatchField {
        &self.mixed
    }

    fn update_coefficients(&mut self, coupling: &dyn CouplingSource) -> Result<UpdateReport> {
        CoupledPotentialBoundary::update_coefficients(self, coupling)
    }

    fn evaluate(&mut self, internal: &Array1<f64>) -> Result<()> {
        CoupledPotentialBoundary::evaluate(self, internal)
    }

    fn write(&self, dict: &mut Dictionary) {
        CoupledPotentialBoundary::write(self, dict)
    }

    fn clone_condition(&self, field: FieldRef) -> Box<dyn PatchCondition<'m> + 'm> {
        Box::new(self.rebind(field))
    }
}

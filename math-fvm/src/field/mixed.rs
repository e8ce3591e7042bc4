//! Mixed (Robin) patch field
//!
//! Blends a fixed value and a fixed gradient per face:
//!
//! ```text
//! value = f * refValue + (1 - f) * (internal + refGradient * d)
//! ```
//!
//! where `f` is the value fraction and `d` the face-to-cell distance. The
//! coefficient functions split the boundary value and normal gradient into a
//! part proportional to the owner-cell value (internal coefficients) and a
//! constant part (boundary coefficients), which is what matrix assembly needs.

use super::mapper::FieldMapper;
use crate::dictionary::Dictionary;
use crate::error::{FvmError, Result};
use crate::mesh::Patch;
use ndarray::{Array1, Zip};

/// Dictionary key of the reference value
pub const REF_VALUE_KEY: &str = "refValue";
/// Dictionary key of the reference gradient
pub const REF_GRADIENT_KEY: &str = "refGradient";
/// Dictionary key of the value fraction
pub const VALUE_FRACTION_KEY: &str = "valueFraction";
/// Dictionary key of the evaluated patch value
pub const VALUE_KEY: &str = "value";

/// Per-face state of a mixed boundary condition
#[derive(Debug, Clone, PartialEq)]
pub struct MixedPatchField {
    value: Array1<f64>,
    ref_value: Array1<f64>,
    ref_grad: Array1<f64>,
    value_fraction: Array1<f64>,
}

/// Boundary contribution of one patch to a Laplacian system
#[derive(Debug, Clone, PartialEq)]
pub struct PatchCoefficients {
    /// Added to the diagonal entry of each face's owner cell
    pub diagonal: Array1<f64>,
    /// Added to the source of each face's owner cell
    pub source: Array1<f64>,
}

impl MixedPatchField {
    /// All-zero field: zero reference value and gradient, pure fixed gradient
    pub fn new(size: usize) -> Self {
        Self::uniform(size, 0.0, 0.0, 0.0)
    }

    /// Uniform reference value, gradient and fraction. The value starts at the
    /// reference value.
    pub fn uniform(size: usize, ref_value: f64, ref_grad: f64, value_fraction: f64) -> Self {
        Self {
            value: Array1::from_elem(size, ref_value),
            ref_value: Array1::from_elem(size, ref_value),
            ref_grad: Array1::from_elem(size, ref_grad),
            value_fraction: Array1::from_elem(size, value_fraction),
        }
    }

    /// Read the mixed entries of a boundary dictionary.
    ///
    /// Returns `Ok(None)` when the dictionary carries no `refValue`. When it
    /// does, `refGradient` and `valueFraction` are required as well; `value`
    /// is optional and defaults to the reference value.
    pub fn read(dict: &Dictionary, size: usize) -> Result<Option<Self>> {
        if !dict.contains(REF_VALUE_KEY) {
            return Ok(None);
        }
        let ref_value = dict.lookup_field(REF_VALUE_KEY, size)?;
        let ref_grad = dict.lookup_field(REF_GRADIENT_KEY, size)?;
        let value_fraction = dict.lookup_field(VALUE_FRACTION_KEY, size)?;
        check_fraction(&value_fraction)?;
        let value = if dict.contains(VALUE_KEY) {
            dict.lookup_field(VALUE_KEY, size)?
        } else {
            ref_value.clone()
        };
        Ok(Some(Self {
            value,
            ref_value,
            ref_grad,
            value_fraction,
        }))
    }

    /// Write the mixed entries
    pub fn write(&self, dict: &mut Dictionary) {
        dict.add_field(REF_VALUE_KEY, &self.ref_value);
        dict.add_field(REF_GRADIENT_KEY, &self.ref_grad);
        dict.add_field(VALUE_FRACTION_KEY, &self.value_fraction);
        dict.add_field(VALUE_KEY, &self.value);
    }

    pub fn size(&self) -> usize {
        self.value.len()
    }

    /// Last evaluated patch value
    pub fn value(&self) -> &Array1<f64> {
        &self.value
    }

    pub fn ref_value(&self) -> &Array1<f64> {
        &self.ref_value
    }

    pub fn ref_grad(&self) -> &Array1<f64> {
        &self.ref_grad
    }

    pub fn value_fraction(&self) -> &Array1<f64> {
        &self.value_fraction
    }

    /// Replace the three blend parameters at once.
    ///
    /// Nothing is modified unless all arrays match the patch size and every
    /// fraction lies in `[0, 1]`.
    pub fn set_coefficients(
        &mut self,
        ref_value: Array1<f64>,
        ref_grad: Array1<f64>,
        value_fraction: Array1<f64>,
    ) -> Result<()> {
        let n = self.size();
        for (what, field) in [
            (REF_VALUE_KEY, &ref_value),
            (REF_GRADIENT_KEY, &ref_grad),
            (VALUE_FRACTION_KEY, &value_fraction),
        ] {
            if field.len() != n {
                return Err(FvmError::size_mismatch(what, n, field.len()));
            }
        }
        check_fraction(&value_fraction)?;
        self.ref_value = ref_value;
        self.ref_grad = ref_grad;
        self.value_fraction = value_fraction;
        Ok(())
    }

    /// Overwrite the patch value
    pub fn set_value(&mut self, value: Array1<f64>) -> Result<()> {
        if value.len() != self.size() {
            return Err(FvmError::size_mismatch(VALUE_KEY, self.size(), value.len()));
        }
        self.value = value;
        Ok(())
    }

    /// Evaluate the patch value from the owner-cell values
    pub fn evaluate(
        &mut self,
        patch_internal: &Array1<f64>,
        cell_distances: &Array1<f64>,
    ) -> Result<()> {
        self.check_len("patch internal field", patch_internal)?;
        self.check_len("cell distances", cell_distances)?;
        Zip::from(&mut self.value)
            .and(&self.value_fraction)
            .and(&self.ref_value)
            .and(&self.ref_grad)
            .and(patch_internal)
            .and(cell_distances)
            .for_each(|value, &f, &r, &g, &c, &d| {
                *value = f * r + (1.0 - f) * (c + g * d);
            });
        Ok(())
    }

    /// Normal gradient at the faces given the owner-cell values
    pub fn sn_grad(
        &self,
        patch_internal: &Array1<f64>,
        delta_coeffs: &Array1<f64>,
    ) -> Result<Array1<f64>> {
        self.check_len("patch internal field", patch_internal)?;
        self.check_len("delta coefficients", delta_coeffs)?;
        let mut grad = Array1::zeros(self.size());
        Zip::from(&mut grad)
            .and(&self.value_fraction)
            .and(&self.ref_value)
            .and(&self.ref_grad)
            .and(patch_internal)
            .and(delta_coeffs)
            .for_each(|out, &f, &r, &g, &c, &dc| {
                *out = f * (r - c) * dc + (1.0 - f) * g;
            });
        Ok(grad)
    }

    /// Part of the face value proportional to the owner-cell value
    pub fn value_internal_coeffs(&self) -> Array1<f64> {
        self.value_fraction.mapv(|f| 1.0 - f)
    }

    /// Constant part of the face value
    pub fn value_boundary_coeffs(&self, delta_coeffs: &Array1<f64>) -> Result<Array1<f64>> {
        self.check_len("delta coefficients", delta_coeffs)?;
        let mut out = Array1::zeros(self.size());
        Zip::from(&mut out)
            .and(&self.value_fraction)
            .and(&self.ref_value)
            .and(&self.ref_grad)
            .and(delta_coeffs)
            .for_each(|o, &f, &r, &g, &dc| {
                *o = f * r + (1.0 - f) * g / dc;
            });
        Ok(out)
    }

    /// Part of the normal gradient proportional to the owner-cell value
    pub fn gradient_internal_coeffs(&self, delta_coeffs: &Array1<f64>) -> Result<Array1<f64>> {
        self.check_len("delta coefficients", delta_coeffs)?;
        Ok(-(&self.value_fraction * delta_coeffs))
    }

    /// Constant part of the normal gradient
    pub fn gradient_boundary_coeffs(&self, delta_coeffs: &Array1<f64>) -> Result<Array1<f64>> {
        self.check_len("delta coefficients", delta_coeffs)?;
        let mut out = Array1::zeros(self.size());
        Zip::from(&mut out)
            .and(&self.value_fraction)
            .and(&self.ref_value)
            .and(&self.ref_grad)
            .and(delta_coeffs)
            .for_each(|o, &f, &r, &g, &dc| {
                *o = f * dc * r + (1.0 - f) * g;
            });
        Ok(out)
    }

    /// Boundary contribution to `-div(gamma grad(phi)) = 0` on the owner cells.
    ///
    /// The face flux `gamma * area * snGrad` splits into a diagonal term
    /// `-gamma * area * gradientInternalCoeffs` and a source term
    /// `gamma * area * gradientBoundaryCoeffs`.
    pub fn laplacian_coeffs(&self, patch: &Patch, gamma: f64) -> Result<PatchCoefficients> {
        self.check_len("patch faces", &patch.face_areas)?;
        let delta = patch.delta_coeffs();
        let gamma_area = &patch.face_areas * gamma;
        let diagonal = -(&gamma_area * &self.gradient_internal_coeffs(&delta)?);
        let source = &gamma_area * &self.gradient_boundary_coeffs(&delta)?;
        Ok(PatchCoefficients { diagonal, source })
    }

    /// Carry every per-face array over to a new patch
    pub fn map(&self, mapper: &dyn FieldMapper) -> Result<Self> {
        Ok(Self {
            value: mapper.map(&self.value)?,
            ref_value: mapper.map(&self.ref_value)?,
            ref_grad: mapper.map(&self.ref_grad)?,
            value_fraction: mapper.map(&self.value_fraction)?,
        })
    }

    /// Copy the faces of `other` into the faces listed by `addressing`:
    /// face `i` of `other` goes to face `addressing[i]` of `self`.
    pub fn rmap(&mut self, other: &MixedPatchField, addressing: &[usize]) -> Result<()> {
        if addressing.len() != other.size() {
            return Err(FvmError::size_mismatch(
                "reverse addressing",
                other.size(),
                addressing.len(),
            ));
        }
        if let Some(&to) = addressing.iter().find(|&&to| to >= self.size()) {
            return Err(FvmError::malformed(
                "addressing",
                format!("target face {to} out of range for {} faces", self.size()),
            ));
        }
        for (from, &to) in addressing.iter().enumerate() {
            self.value[to] = other.value[from];
            self.ref_value[to] = other.ref_value[from];
            self.ref_grad[to] = other.ref_grad[from];
            self.value_fraction[to] = other.value_fraction[from];
        }
        Ok(())
    }

    fn check_len(&self, what: &str, field: &Array1<f64>) -> Result<()> {
        if field.len() != self.size() {
            return Err(FvmError::size_mismatch(what, self.size(), field.len()));
        }
        Ok(())
    }
}

fn check_fraction(value_fraction: &Array1<f64>) -> Result<()> {
    if let Some((face, f)) = value_fraction
        .iter()
        .enumerate()
        .find(|&(_, f)| !(0.0..=1.0).contains(f))
    {
        return Err(FvmError::malformed(
            VALUE_FRACTION_KEY,
            format!("face {face} has fraction {f}, expected a value in [0, 1]"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::DirectMapper;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn blended() -> MixedPatchField {
        let mut field = MixedPatchField::new(3);
        field
            .set_coefficients(
                array![10.0, 20.0, 30.0],
                array![0.0, 0.0, 2.0],
                array![1.0, 0.5, 0.0],
            )
            .unwrap();
        field
    }

    #[test]
    fn test_evaluate_blend() {
        let mut field = blended();
        let internal = array![0.0, 10.0, 5.0];
        let distances = array![0.5, 0.5, 0.5];
        field.evaluate(&internal, &distances).unwrap();

        // Dirichlet face
        assert_relative_eq!(field.value()[0], 10.0);
        // Half way between the cell and the reference
        assert_relative_eq!(field.value()[1], 15.0);
        // Neumann face: cell value plus gradient times distance
        assert_relative_eq!(field.value()[2], 6.0);
    }

    #[test]
    fn test_sn_grad_matches_coefficients() {
        let field = blended();
        let internal = array![1.0, 2.0, 3.0];
        let delta = array![2.0, 4.0, 8.0];

        let grad = field.sn_grad(&internal, &delta).unwrap();
        let gic = field.gradient_internal_coeffs(&delta).unwrap();
        let gbc = field.gradient_boundary_coeffs(&delta).unwrap();
        for i in 0..3 {
            assert_relative_eq!(grad[i], gic[i] * internal[i] + gbc[i], epsilon = 1e-12);
        }
        assert_relative_eq!(grad[0], (10.0 - 1.0) * 2.0);
        assert_relative_eq!(grad[2], 2.0);
    }

    #[test]
    fn test_value_coeffs_reproduce_evaluate() {
        let mut field = blended();
        let internal = array![4.0, -2.0, 7.0];
        let distances = array![0.25, 0.5, 0.125];
        let delta = distances.mapv(|d: f64| 1.0 / d);
        field.evaluate(&internal, &distances).unwrap();

        let vic = field.value_internal_coeffs();
        let vbc = field.value_boundary_coeffs(&delta).unwrap();
        for i in 0..3 {
            assert_relative_eq!(field.value()[i], vic[i] * internal[i] + vbc[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_set_coefficients_is_atomic() {
        let mut field = blended();
        let before = field.clone();

        let err = field
            .set_coefficients(array![1.0, 1.0, 1.0], array![0.0, 0.0, 0.0], array![0.5, 1.5, 0.5])
            .unwrap_err();
        assert!(err.is_dictionary_error());
        assert!(field
            .set_coefficients(array![1.0], array![0.0], array![0.5])
            .is_err());
        assert_eq!(field, before);
    }

    #[test]
    fn test_laplacian_coeffs() {
        let patch = Patch::new("top", 0, vec![0, 1], array![2.0, 1.0], array![0.5, 0.5]).unwrap();
        let mut field = MixedPatchField::new(2);
        field
            .set_coefficients(array![3.0, 3.0], array![0.0, 1.0], array![1.0, 0.0])
            .unwrap();

        let coeffs = field.laplacian_coeffs(&patch, 4.0).unwrap();
        // Fixed-value face: gamma * A / d on the diagonal, times the value on the source
        assert_relative_eq!(coeffs.diagonal[0], 4.0 * 2.0 * 2.0);
        assert_relative_eq!(coeffs.source[0], 4.0 * 2.0 * 2.0 * 3.0);
        // Fixed-gradient face: only the imposed flux
        assert_relative_eq!(coeffs.diagonal[1], 0.0);
        assert_relative_eq!(coeffs.source[1], 4.0 * 1.0 * 1.0);
    }

    #[test]
    fn test_read_write_round_trip() {
        let field = blended();
        let mut dict = Dictionary::new();
        field.write(&mut dict);

        let back = MixedPatchField::read(&dict, 3).unwrap().unwrap();
        assert_eq!(back, field);
        assert!(MixedPatchField::read(&Dictionary::new(), 3).unwrap().is_none());
    }

    #[test]
    fn test_read_rejects_bad_fraction() {
        let dict = Dictionary::from_json_str(
            r#"{"refValue": 1.0, "refGradient": 0.0, "valueFraction": [0.5, -0.1]}"#,
        )
        .unwrap();
        assert!(MixedPatchField::read(&dict, 2).is_err());
    }

    #[test]
    fn test_map_and_rmap() {
        let field = blended();
        let mapped = field.map(&DirectMapper::new(vec![2, 1])).unwrap();
        assert_eq!(mapped.size(), 2);
        assert_eq!(mapped.ref_value(), &array![30.0, 20.0]);
        assert_eq!(mapped.value_fraction(), &array![0.0, 0.5]);

        let mut target = MixedPatchField::new(3);
        target.rmap(&mapped, &[0, 2]).unwrap();
        assert_eq!(target.ref_value(), &array![30.0, 0.0, 20.0]);
        assert_eq!(target.ref_grad(), &array![2.0, 0.0, 0.0]);
        assert!(target.rmap(&mapped, &[0, 3]).is_err());
        assert!(target.rmap(&mapped, &[0]).is_err());
    }
}

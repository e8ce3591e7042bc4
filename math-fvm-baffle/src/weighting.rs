//! Conductance weighting across a baffle face
//!
//! Each side of the interface contributes a face conductance
//! `K = conductivity / distance`, where `distance` is the face-to-cell
//! distance on that side. The value fraction of the local side is
//!
//! ```text
//! f = K_local / (K_local + K_neighbour)
//!   = (c_local * d_neighbour) / (c_local * d_neighbour + c_neighbour * d_local)
//! ```
//!
//! so an insulating neighbour (`c_neighbour -> 0`) pins the face to the
//! neighbour value (`f -> 1`) and a far better conducting neighbour leaves a
//! pure gradient condition (`f -> 0`). The second form never divides by a
//! distance.

use std::fmt;

/// Fraction used when a face has no usable weighting
pub const EQUAL_WEIGHT: f64 = 0.5;

/// Why a face fell back to [`EQUAL_WEIGHT`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degeneracy {
    /// Zero, negative or non-finite face-to-cell distance on either side
    ZeroDistance,
    /// Both face conductances are zero
    NoConductance,
    /// A conductivity is negative or NaN, or both sides are unbounded
    InvalidConductivity,
}

impl fmt::Display for Degeneracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Degeneracy::ZeroDistance => write!(f, "zero face-to-cell distance"),
            Degeneracy::NoConductance => write!(f, "no conductance on either side"),
            Degeneracy::InvalidConductivity => write!(f, "invalid conductivity"),
        }
    }
}

/// Value fraction of one face
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FaceWeight {
    /// Regular blend in `[0, 1]`
    Blend(f64),
    /// Degenerate face, recovered with equal weighting
    Degenerate(Degeneracy),
}

impl FaceWeight {
    /// The value fraction to apply
    pub fn value(self) -> f64 {
        match self {
            FaceWeight::Blend(f) => f,
            FaceWeight::Degenerate(_) => EQUAL_WEIGHT,
        }
    }

    pub fn is_degenerate(self) -> bool {
        matches!(self, FaceWeight::Degenerate(_))
    }
}

fn usable_distance(d: f64) -> bool {
    d.is_finite() && d > 0.0
}

fn usable_conductivity(c: f64) -> bool {
    !c.is_nan() && c >= 0.0
}

/// Local value fraction of a face shared by two conductive sides
pub fn face_weight(
    local_conductivity: f64,
    local_distance: f64,
    neighbour_conductivity: f64,
    neighbour_distance: f64,
) -> FaceWeight {
    if !usable_distance(local_distance) || !usable_distance(neighbour_distance) {
        return FaceWeight::Degenerate(Degeneracy::ZeroDistance);
    }
    if !usable_conductivity(local_conductivity) || !usable_conductivity(neighbour_conductivity) {
        return FaceWeight::Degenerate(Degeneracy::InvalidConductivity);
    }

    let local = local_conductivity * neighbour_distance;
    let neighbour = neighbour_conductivity * local_distance;

    if local == 0.0 && neighbour == 0.0 {
        return FaceWeight::Degenerate(Degeneracy::NoConductance);
    }
    if local == 0.0 {
        return FaceWeight::Blend(0.0);
    }
    if neighbour == 0.0 {
        return FaceWeight::Blend(1.0);
    }

    let f = 1.0 / (1.0 + neighbour / local);
    if f.is_nan() {
        FaceWeight::Degenerate(Degeneracy::InvalidConductivity)
    } else {
        FaceWeight::Blend(f.clamp(0.0, 1.0))
    }
}

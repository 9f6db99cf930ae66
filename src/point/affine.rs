//! Affine points: `(x, y)` pairs plus an infinity flag.

use subtle::Choice;

use crate::curve::Curve;
use crate::field::FieldElement;

/// A point in affine coordinates, or the point at infinity.
///
/// Affine points are the "resting" representation used for SEC1 encoding
/// and as the output of [`super::projective::ProjectivePoint::make_affine`];
/// all arithmetic happens in [`super::projective::ProjectivePoint`].
#[derive(Clone, Debug)]
pub struct AffinePoint {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
    pub(crate) infinity: Choice,
}

impl AffinePoint {
    /// Construct from coordinates known to already be on the curve.
    ///
    /// Callers that have not already validated the point should go through
    /// [`super::projective::ProjectivePoint::set_affine`] instead, which
    /// performs the on-curve check.
    pub(crate) fn new_unchecked(x: FieldElement, y: FieldElement) -> Self {
        AffinePoint {
            x,
            y,
            infinity: Choice::from(0),
        }
    }

    /// The point at infinity.
    pub fn identity(curve: &Curve) -> Self {
        let m = curve.modulus();
        AffinePoint {
            x: m.zero(),
            y: m.zero(),
            infinity: Choice::from(1),
        }
    }

    /// `true` iff this is the point at infinity.
    pub fn is_identity(&self) -> Choice {
        self.infinity
    }

    /// `x`-coordinate. Meaningless (but defined, as `0`) at infinity.
    pub fn x(&self) -> &FieldElement {
        &self.x
    }

    /// `y`-coordinate. Meaningless (but defined, as `0`) at infinity.
    pub fn y(&self) -> &FieldElement {
        &self.y
    }
}

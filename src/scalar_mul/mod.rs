//! Scalar multiplication: variable-time double-scalar (wNAF) and
//! constant-time single-scalar paths.

pub mod constant_time;
pub mod wnaf;

use crypto_bigint::BoxedUint;

use crate::curve::Curve;
use crate::error::{Error, Result};
use crate::point::affine::AffinePoint;
use crate::point::projective::ProjectivePoint;

/// Unified scalar-multiplication dispatcher, matching the three supported
/// call shapes:
///
/// - `gs` only: `mul_generator_ct(gs)`.
/// - `point` and `ps` only: `mul_single_ct(ps, point)`.
/// - all three: `mul_double_nonct(gs, ps, point)` (non-constant-time; use
///   only when neither scalar is secret, e.g. signature verification).
pub fn mul(
    curve: &Curve,
    gs: Option<&BoxedUint>,
    point: Option<&AffinePoint>,
    ps: Option<&BoxedUint>,
) -> Result<ProjectivePoint> {
    match (gs, point, ps) {
        (Some(g_scalar), None, None) => constant_time::mul_generator_ct(curve, g_scalar),
        (None, Some(p), Some(p_scalar)) => constant_time::mul_single_ct(curve, p_scalar, p),
        (Some(g_scalar), Some(p), Some(p_scalar)) => {
            wnaf::mul_double_nonct(curve, Some(g_scalar), Some(p_scalar), Some(p))
        }
        _ => Err(Error::NotImplemented),
    }
}

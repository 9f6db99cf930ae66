//! Constant-time single-scalar multiplication.
//!
//! Fixed double-and-always-add schedule over a bit count derived from the
//! curve's group order, independent of the scalar's value. Callers with a
//! secret scalar (the ECDSA driver) are responsible for pre-masking it to
//! exactly this many bits — see [`crate::ecdsa::mask_nonce`] — so the loop
//! bound itself never depends on the scalar.
//!
//! The schedule does not branch on bits of `m`: every iteration computes
//! both the doubled and the doubled-plus-added candidate and selects
//! between them with [`subtle::ConditionallySelectable`]. The known
//! limitation is that [`ProjectivePoint::add`]'s own infinity/doubling
//! special-casing is not itself branch-free; closing that gap would
//! require a unified (complete) addition formula, which this engine does
//! not implement.

use crypto_bigint::BoxedUint;
use subtle::ConditionallySelectable;

use crate::curve::Curve;
use crate::error::{Error, Result};
use crate::point::affine::AffinePoint;
use crate::point::projective::ProjectivePoint;

/// Number of iterations the fixed schedule runs for: `bit_length(n) + 1`
/// when the curve's order is known, else one more than the field's bit
/// length.
pub fn schedule_bit_count(curve: &Curve) -> u32 {
    match curve.order() {
        Some(n) => n.bits() + 1,
        None => curve.modulus().bit_length() + 1,
    }
}

/// `mul_generator_ct(m)`: `m*G` with a schedule independent of `m`.
pub fn mul_generator_ct(curve: &Curve, m: &BoxedUint) -> Result<ProjectivePoint> {
    let generator = curve.generator().ok_or(Error::UndefinedGenerator)?;
    mul_single_ct(curve, m, generator)
}

/// `mul_single_ct(m, P)`: `m*P` with a schedule independent of `m`.
///
/// `m` must fit in [`schedule_bit_count`] bits; any higher bits are
/// silently dropped rather than widening the loop.
pub fn mul_single_ct(curve: &Curve, m: &BoxedUint, point: &AffinePoint) -> Result<ProjectivePoint> {
    let bit_count = schedule_bit_count(curve);
    let precision = m.bits_precision().max(bit_count);
    let m = m.clone().widen(precision);
    let base = ProjectivePoint::from_affine(point, curve);

    let mut r = ProjectivePoint::identity(curve);
    for i in (0..bit_count).rev() {
        r = r.double();
        let added = r.add(&base)?;
        let bit = m.bit(i);
        r = ProjectivePoint::conditional_select(&r, &added, bit);
    }

    Ok(r)
}

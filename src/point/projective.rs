//! Points on a short-Weierstrass curve in Jacobian projective coordinates.
//!
//! `(X, Y, Z)` represents the affine point `(X/Z^2, Y/Z^3)`; `Z == 0` is the
//! sentinel for the point at infinity. The formulas
//! below (`add-2007-bl`, `dbl-2009-l` in the Explicit-Formulas Database
//! naming) are the general short-Weierstrass Jacobian doubling/addition
//! laws valid for an arbitrary curve coefficient `a`, matching this crate's
//! runtime (rather than `a = -3`-specialized) curve model.

use alloc::vec::Vec;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

use crate::curve::Curve;
use crate::error::{Error, Result};
use crate::field::FieldElement;
use crate::point::affine::AffinePoint;

/// A point on a [`Curve`] in Jacobian projective coordinates.
#[derive(Clone)]
pub struct ProjectivePoint {
    pub(crate) curve: Curve,
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
    pub(crate) z: FieldElement,
    /// Cached `Z == 1` flag, so mixed-coordinate addition can skip
    /// squaring a known-one `Z`.
    pub(crate) z_is_one: Choice,
}

impl ProjectivePoint {
    /// The curve this point is defined over.
    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    /// The point at infinity on `curve`.
    pub fn identity(curve: &Curve) -> Self {
        let m = curve.modulus();
        ProjectivePoint {
            curve: curve.clone(),
            x: m.zero(),
            y: m.one(),
            z: m.zero(),
            z_is_one: Choice::from(0),
        }
    }

    /// `P.Z == 0`.
    pub fn is_at_infinity(&self) -> Choice {
        self.z.is_zero()
    }

    /// `P.Z <- 0`.
    pub fn set_to_infinity(&mut self) {
        let m = self.curve.modulus();
        self.z = m.zero();
        self.z_is_one = Choice::from(0);
    }

    /// Lift an [`AffinePoint`] to Jacobian form (`Z = 1`), without
    /// revalidating that it is on the curve.
    pub fn from_affine(point: &AffinePoint, curve: &Curve) -> Self {
        let m = curve.modulus();
        ProjectivePoint {
            curve: curve.clone(),
            x: point.x.clone(),
            y: point.y.clone(),
            z: ConditionallySelectable::conditional_select(&m.one(), &m.zero(), point.infinity),
            z_is_one: !point.infinity,
        }
    }

    /// `set_affine(x, y)`: stores `(x, y, 1)`, rejecting points that are
    /// not on the curve.
    pub fn set_affine(curve: &Curve, x: FieldElement, y: FieldElement) -> Result<Self> {
        let point = AffinePoint::new_unchecked(x, y);
        let projective = Self::from_affine(&point, curve);
        if !bool::from(projective.is_on_curve()) {
            return Err(Error::PointIsNotOnCurve);
        }
        Ok(projective)
    }

    /// `get_affine(&mut x, &mut y)`: fails with
    /// [`Error::PointAtInfinity`] for the identity.
    pub fn get_affine(&self) -> Result<(FieldElement, FieldElement)> {
        let affine = self.make_affine();
        if bool::from(affine.is_identity()) {
            return Err(Error::PointAtInfinity);
        }
        Ok((affine.x, affine.y))
    }

    /// `set_compressed(x, y_bit)`: recovers `y` as the square root of
    /// `x^3 + ax + b` whose least-significant bit equals `y_bit`.
    pub fn set_compressed(curve: &Curve, x: FieldElement, y_bit: Choice) -> Result<Self> {
        let m = curve.modulus();
        let rhs = curve_rhs(curve, &x);
        let candidate = m.sqrt(&rhs);
        if !bool::from(candidate.is_some()) {
            return Err(Error::InvalidEncoding);
        }
        let candidate = candidate.unwrap();
        let negated = m.neg(&candidate);
        // p is odd, so negation always flips the low bit; pick whichever
        // root's parity matches the requested y_bit.
        let use_negated = candidate.is_odd() ^ y_bit;
        let y = FieldElement::conditional_select(&candidate, &negated, use_negated);
        Self::set_affine(curve, x, y)
    }

    /// `set_Jprojective_coordinates(x, y, z)`, validated on-curve.
    pub fn set_jprojective(curve: &Curve, x: FieldElement, y: FieldElement, z: FieldElement) -> Result<Self> {
        let z_is_one = z.ct_eq(&curve.modulus().one());
        let point = ProjectivePoint {
            curve: curve.clone(),
            x,
            y,
            z,
            z_is_one,
        };
        if !bool::from(point.is_on_curve()) {
            return Err(Error::PointIsNotOnCurve);
        }
        Ok(point)
    }

    /// `get_Jprojective_coordinates()`.
    pub fn get_jprojective(&self) -> (FieldElement, FieldElement, FieldElement) {
        (self.x.clone(), self.y.clone(), self.z.clone())
    }

    /// `is_on_curve()`: the affine equation holds; infinity is on the
    /// curve.
    pub fn is_on_curve(&self) -> Choice {
        let infinity = self.is_at_infinity();
        let m = self.curve.modulus();

        // Compare Y^2 to (X^3 + a*X*Z^4 + b*Z^6) directly in Jacobian
        // coordinates, avoiding an inversion.
        let z2 = m.square(&self.z);
        let z4 = m.square(&z2);
        let z6 = m.mul(&z4, &z2);
        let x2 = m.square(&self.x);
        let x3 = m.mul(&x2, &self.x);
        let ax_z4 = m.mul(&m.mul(&self.curve.a().clone(), &self.x), &z4);
        let b_z6 = m.mul(&self.curve.b().clone(), &z6);
        let rhs = m.add(&m.add(&x3, &ax_z4), &b_z6);
        let lhs = m.square(&self.y);
        let on_curve = lhs.ct_eq(&rhs);

        infinity | on_curve
    }

    /// `invert()`: `P <- -P`, i.e. `Y <- -Y mod p`.
    pub fn invert(&self) -> Self {
        let m = self.curve.modulus();
        ProjectivePoint {
            curve: self.curve.clone(),
            x: self.x.clone(),
            y: m.neg(&self.y),
            z: self.z.clone(),
            z_is_one: self.z_is_one,
        }
    }

    /// `dbl()`: `R <- 2P`, using the general-`a` Jacobian doubling law
    /// (`dbl-2009-l`). The identity doubles to the identity.
    pub fn double(&self) -> Self {
        if bool::from(self.is_at_infinity()) {
            return self.clone();
        }
        if bool::from(self.y.is_zero()) {
            // A point of order 2: 2P = O.
            return ProjectivePoint::identity(&self.curve);
        }

        let m = self.curve.modulus();
        let a = m.square(&self.x); // A = X1^2
        let b = m.square(&self.y); // B = Y1^2
        let c = m.square(&b); // C = B^2
        let xb = m.add(&self.x, &b);
        let xb2 = m.square(&xb);
        let d = m.add(
            &m.sub(&xb2, &m.add(&a, &c)),
            &m.sub(&xb2, &m.add(&a, &c)),
        ); // D = 2*((X1+B)^2 - A - C)
        let z2 = m.square(&self.z);
        let z4 = m.square(&z2);
        let a_z4 = m.mul(self.curve.a(), &z4);
        let three_a = m.add(&m.add(&a, &a), &a);
        let e = m.add(&three_a, &a_z4); // E = 3A + a*Z1^4
        let f = m.square(&e); // F = E^2
        let two_d = m.add(&d, &d);
        let x3 = m.sub(&f, &two_d);
        let d_minus_x3 = m.sub(&d, &x3);
        let eight_c = {
            let two_c = m.add(&c, &c);
            let four_c = m.add(&two_c, &two_c);
            m.add(&four_c, &four_c)
        };
        let y3 = m.sub(&m.mul(&e, &d_minus_x3), &eight_c);
        let yz = m.mul(&self.y, &self.z);
        let z3 = m.add(&yz, &yz);

        ProjectivePoint {
            curve: self.curve.clone(),
            x: x3,
            y: y3,
            z: z3,
            z_is_one: Choice::from(0),
        }
    }

    /// `add(A, B)`: `R <- A + B`, using the `a`-independent general
    /// Jacobian addition law (`add-2007-bl`). Dispatches to [`Self::double`]
    /// when `A == B`; returns the identity when `A == -B`; handles either
    /// operand at infinity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompatibleObjects`] if `self` and `other` do not
    /// share the same owning curve.
    pub fn add(&self, other: &Self) -> Result<Self> {
        if !Curve::ptr_eq(&self.curve, &other.curve) {
            return Err(Error::IncompatibleObjects);
        }

        if bool::from(self.is_at_infinity()) {
            return Ok(other.clone());
        }
        if bool::from(other.is_at_infinity()) {
            return Ok(self.clone());
        }

        let m = self.curve.modulus();
        let z1z1 = m.square(&self.z);
        let z2z2 = m.square(&other.z);
        let u1 = m.mul(&self.x, &z2z2);
        let u2 = m.mul(&other.x, &z1z1);
        let s1 = m.mul(&m.mul(&self.y, &other.z), &z2z2);
        let s2 = m.mul(&m.mul(&other.y, &self.z), &z1z1);

        let h = m.sub(&u2, &u1);
        let r = m.sub(&s2, &s1);
        let r = m.add(&r, &r);

        let same_x = h.is_zero();
        let same_y = r.is_zero();

        if bool::from(same_x) {
            if bool::from(same_y) {
                return Ok(self.double());
            }
            return Ok(ProjectivePoint::identity(&self.curve));
        }

        let i = m.square(&m.add(&h, &h));
        let j = m.mul(&h, &i);
        let v = m.mul(&u1, &i);
        let r2 = m.square(&r);
        let x3 = m.sub(&m.sub(&r2, &j), &m.add(&v, &v));
        let two_s1j = m.add(&m.mul(&s1, &j), &m.mul(&s1, &j));
        let y3 = m.sub(&m.mul(&r, &m.sub(&v, &x3)), &two_s1j);
        let z1z2 = m.add(&self.z, &other.z);
        let z1z2_sq = m.square(&z1z2);
        let z3 = m.mul(&m.sub(&z1z2_sq, &m.add(&z1z1, &z2z2)), &h);

        Ok(ProjectivePoint {
            curve: self.curve.clone(),
            x: x3,
            y: y3,
            z: z3,
            z_is_one: Choice::from(0),
        })
    }

    /// `cmp(A, B)`: equal as affine points, infinity counting as equal to
    /// itself. Errors on curve mismatch.
    pub fn cmp(&self, other: &Self) -> Result<bool> {
        if !Curve::ptr_eq(&self.curve, &other.curve) {
            return Err(Error::IncompatibleObjects);
        }

        let a_inf = self.is_at_infinity();
        let b_inf = other.is_at_infinity();
        if bool::from(a_inf) || bool::from(b_inf) {
            return Ok(bool::from(a_inf) && bool::from(b_inf));
        }

        // Cross-multiply to avoid an inversion: (X1*Z2^2, Y1*Z2^3) ==
        // (X2*Z1^2, Y2*Z1^3).
        let m = self.curve.modulus();
        let z1z1 = m.square(&self.z);
        let z2z2 = m.square(&other.z);
        let lhs_x = m.mul(&self.x, &z2z2);
        let rhs_x = m.mul(&other.x, &z1z1);
        let lhs_y = m.mul(&self.y, &m.mul(&z2z2, &other.z));
        let rhs_y = m.mul(&other.y, &m.mul(&z1z1, &self.z));

        Ok(bool::from(lhs_x.ct_eq(&rhs_x)) && bool::from(lhs_y.ct_eq(&rhs_y)))
    }

    /// `make_affine()`: normalizes so `Z = 1` (or stays the identity).
    /// Uses exactly one field inversion.
    pub fn make_affine(&self) -> AffinePoint {
        if bool::from(self.is_at_infinity()) {
            return AffinePoint::identity(&self.curve);
        }
        let m = self.curve.modulus();
        let z_inv = m.invert_vartime(&self.z).expect("non-infinity point has invertible Z");
        let z_inv2 = m.square(&z_inv);
        let z_inv3 = m.mul(&z_inv2, &z_inv);
        let x = m.mul(&self.x, &z_inv2);
        let y = m.mul(&self.y, &z_inv3);
        AffinePoint::new_unchecked(x, y)
    }

    /// `points_make_affine(V[])`: batched normalization of `points` using
    /// the Montgomery trick, performing exactly one field inversion
    /// regardless of `points.len()`.
    ///
    /// Points at infinity are passed through unchanged.
    pub fn points_make_affine(curve: &Curve, points: &[ProjectivePoint]) -> Result<Vec<AffinePoint>> {
        let m = curve.modulus();
        let n = points.len();
        if n == 0 {
            return Ok(Vec::new());
        }

        // Running products of Z_i, skipping (treating as 1) any point at
        // infinity so a single inversion still covers the whole batch.
        let mut prefix = Vec::with_capacity(n);
        let mut acc = m.one();
        for p in points {
            let z = FieldElement::conditional_select(&p.z, &m.one(), p.is_at_infinity());
            prefix.push(acc.clone());
            acc = m.mul(&acc, &z);
        }

        let mut acc_inv = m
            .invert_vartime(&acc)
            .ok_or(Error::PointAtInfinity)?;

        let mut out = alloc::vec![AffinePoint::identity(curve); n];
        for i in (0..n).rev() {
            let p = &points[i];
            if bool::from(p.is_at_infinity()) {
                out[i] = AffinePoint::identity(curve);
                continue;
            }
            let z_inv = m.mul(&acc_inv, &prefix[i]);
            acc_inv = m.mul(&acc_inv, &p.z);
            let z_inv2 = m.square(&z_inv);
            let z_inv3 = m.mul(&z_inv2, &z_inv);
            out[i] = AffinePoint::new_unchecked(m.mul(&p.x, &z_inv2), m.mul(&p.y, &z_inv3));
        }

        Ok(out)
    }

    /// Optional Z-coordinate blinding: replace `(X, Y, Z)` with
    /// `(λ²X, λ³Y, λZ)` for a random nonzero `λ`, an equivalent Jacobian
    /// representative with a fresh `Z`. Pure no-op on the represented
    /// affine point.
    pub fn blind(&self, rng: &mut impl rand_core::CryptoRng) -> Result<Self> {
        let m = self.curve.modulus();
        let lambda = crate::field::random_nonzero_element(m, rng)?;
        let l2 = m.square(&lambda);
        let l3 = m.mul(&l2, &lambda);
        Ok(ProjectivePoint {
            curve: self.curve.clone(),
            x: m.mul(&self.x, &l2),
            y: m.mul(&self.y, &l3),
            z: m.mul(&self.z, &lambda),
            z_is_one: Choice::from(0),
        })
    }
}

impl ConditionallySelectable for ProjectivePoint {
    /// Branch-free selection used by the fixed-schedule constant-time
    /// multipliers in [`crate::scalar_mul::constant_time`]; assumes `a` and
    /// `b` share the same owning curve.
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        ProjectivePoint {
            curve: a.curve.clone(),
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
            z: FieldElement::conditional_select(&a.z, &b.z, choice),
            z_is_one: Choice::conditional_select(&a.z_is_one, &b.z_is_one, choice),
        }
    }
}

/// `x^3 + ax + b mod p`, used by [`ProjectivePoint::set_compressed`] and
/// (indirectly, via [`ProjectivePoint::is_on_curve`]) curve validation.
fn curve_rhs(curve: &Curve, x: &FieldElement) -> FieldElement {
    let m = curve.modulus();
    let x2 = m.square(x);
    let x3 = m.mul(&x2, x);
    let ax = m.mul(curve.a(), x);
    m.add(&m.add(&x3, &ax), curve.b())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::CurveParams;

    // y^2 = x^3 + 2x + 3 mod 97; (3, 6) is on it (27 + 6 + 3 = 36 = 6^2).
    fn toy_curve() -> Curve {
        CurveParams::new(&[97], &[2], &[3]).unwrap()
    }

    fn point(curve: &Curve, x: u32, y: u32) -> ProjectivePoint {
        let m = curve.modulus();
        let x = m.element_from_be_bytes(&x.to_be_bytes()).unwrap();
        let y = m.element_from_be_bytes(&y.to_be_bytes()).unwrap();
        ProjectivePoint::set_affine(curve, x, y).unwrap()
    }

    #[test]
    fn set_affine_rejects_off_curve_point() {
        let curve = toy_curve();
        let m = curve.modulus();
        let x = m.element_from_be_bytes(&3u32.to_be_bytes()).unwrap();
        let y = m.element_from_be_bytes(&7u32.to_be_bytes()).unwrap();
        assert!(ProjectivePoint::set_affine(&curve, x, y).is_err());
    }

    #[test]
    fn identity_is_at_infinity() {
        let curve = toy_curve();
        let identity = ProjectivePoint::identity(&curve);
        assert!(bool::from(identity.is_at_infinity()));
        assert!(bool::from(identity.is_on_curve()));
    }

    #[test]
    fn double_matches_triple_addition_minus_self() {
        let curve = toy_curve();
        let p = point(&curve, 3, 6);
        let doubled = p.double();
        let added = p.add(&p).unwrap();
        assert!(doubled.cmp(&added).unwrap());
    }

    #[test]
    fn add_identity_is_no_op() {
        let curve = toy_curve();
        let p = point(&curve, 3, 6);
        let identity = ProjectivePoint::identity(&curve);
        let sum = p.add(&identity).unwrap();
        assert!(sum.cmp(&p).unwrap());
    }

    #[test]
    fn point_plus_negation_is_identity() {
        let curve = toy_curve();
        let p = point(&curve, 3, 6);
        let sum = p.add(&p.invert()).unwrap();
        assert!(bool::from(sum.is_at_infinity()));
    }

    #[test]
    fn make_affine_round_trips_through_jacobian() {
        let curve = toy_curve();
        let p = point(&curve, 3, 6);
        let doubled = p.double();
        let affine = doubled.make_affine();
        let back = ProjectivePoint::from_affine(&affine, &curve);
        assert!(back.cmp(&doubled).unwrap());
    }

    #[test]
    fn cmp_rejects_points_on_different_curves() {
        let curve_a = toy_curve();
        let curve_b = CurveParams::new(&[97], &[2], &[3]).unwrap();
        let p = point(&curve_a, 3, 6);
        let q = point(&curve_b, 3, 6);
        assert!(p.add(&q).is_err());
        assert!(p.cmp(&q).is_err());
    }

    #[test]
    fn points_make_affine_matches_individual_normalization() {
        let curve = toy_curve();
        let p = point(&curve, 3, 6);
        let doubled = p.double();
        let batch = ProjectivePoint::points_make_affine(&curve, &[p.clone(), doubled.clone()]).unwrap();
        assert!(bool::from(batch[0].x.ct_eq(&p.make_affine().x)));
        assert!(bool::from(batch[1].x.ct_eq(&doubled.make_affine().x)));
    }
}

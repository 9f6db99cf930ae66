//! The curve (group) object.

use alloc::sync::Arc;
use alloc::vec::Vec;
use crypto_bigint::BoxedUint;
use subtle::Choice;

use crate::error::{Error, Result};
use crate::field::{FieldElement, Modulus};
use crate::point::affine::AffinePoint;
use crate::point::projective::ProjectivePoint;
use crate::scalar_mul;

/// SEC1 default point-encoding form recorded on a curve, used when a caller
/// asks to encode a point without naming a form explicitly.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Sec1Form {
    /// `0x02`/`0x03` lead byte, x-coordinate plus y-bit.
    Compressed,
    /// `0x04` lead byte, x and y in full.
    Uncompressed,
    /// `0x06`/`0x07` lead byte, x and y in full plus a redundant y-bit.
    Hybrid,
}

/// A short-Weierstrass curve `y^2 = x^3 + ax + b` over `GF(p)`, together
/// with its generator, order, cofactor, and presentation metadata.
///
/// Mirrors the original library's `EC_GROUP`: logically immutable once
/// constructed (see [`Curve::new`]/[`Curve::set_generator`]), shareable
/// across threads via [`Arc`], and the sole owner of the field modulus
/// every [`AffinePoint`]/[`ProjectivePoint`] it produces is implicitly
/// defined over.
pub struct CurveParams {
    pub(crate) modulus: Modulus,
    pub(crate) a: FieldElement,
    pub(crate) b: FieldElement,
    pub(crate) generator: Option<AffinePoint>,
    pub(crate) order: Option<BoxedUint>,
    pub(crate) cofactor: BoxedUint,
    pub(crate) nid: Option<u64>,
    pub(crate) seed: Option<Vec<u8>>,
    pub(crate) form: Sec1Form,
}

/// A shared handle to a [`CurveParams`]; this is the type points and
/// signatures actually carry around, matching the original library's
/// "curve owns its generator and seed, points reference their owning
/// curve" lifecycle.
pub type Curve = Arc<CurveParams>;

impl CurveParams {
    /// Construct a curve from its field and equation coefficients,
    /// without a generator.
    ///
    /// Validates `p >= 1`` (via [`Modulus`] construction), `0 <= a, b < p`,
    /// and that the discriminant `4a^3 + 27b^2 mod p` is non-zero.
    pub fn new(p: &[u8], a: &[u8], b: &[u8]) -> Result<Curve> {
        let modulus = Modulus::from_be_bytes(p)?;
        let a = modulus.element_from_be_bytes(a)?;
        let b = modulus.element_from_be_bytes(b)?;

        let params = CurveParams {
            modulus,
            a,
            b,
            generator: None,
            order: None,
            cofactor: BoxedUint::zero(),
            nid: None,
            seed: None,
            form: Sec1Form::Uncompressed,
        };

        if !bool::from(params.discriminant_is_nonzero()) {
            return Err(Error::DiscriminantIsZero);
        }

        Ok(Arc::new(params))
    }

    fn discriminant_is_nonzero(&self) -> Choice {
        // 4a^3 + 27b^2 mod p != 0
        let m = &self.modulus;
        let a2 = m.square(&self.a);
        let a3 = m.mul(&a2, &self.a);
        let four = FieldElement::from_uint(BoxedUint::from(4u32).widen(m.bit_length()));
        let twenty_seven = FieldElement::from_uint(BoxedUint::from(27u32).widen(m.bit_length()));
        let lhs = m.mul(&four, &a3);
        let b2 = m.square(&self.b);
        let rhs = m.mul(&twenty_seven, &b2);
        let disc = m.add(&lhs, &rhs);
        !disc.is_zero()
    }

    /// Field modulus.
    pub fn modulus(&self) -> &Modulus {
        &self.modulus
    }

    /// Curve coefficient `a`.
    pub fn a(&self) -> &FieldElement {
        &self.a
    }

    /// Curve coefficient `b`.
    pub fn b(&self) -> &FieldElement {
        &self.b
    }

    /// Group order `n`, if set.
    pub fn order(&self) -> Option<&BoxedUint> {
        self.order.as_ref()
    }

    /// Cofactor `h`. `0` means "unknown".
    pub fn cofactor(&self) -> &BoxedUint {
        &self.cofactor
    }

    /// Opaque curve-name tag.
    pub fn nid(&self) -> Option<u64> {
        self.nid
    }

    /// Seed bytes, preserved verbatim from construction.
    pub fn seed(&self) -> Option<&[u8]> {
        self.seed.as_deref()
    }

    /// Default SEC1 encoding form.
    pub fn default_form(&self) -> Sec1Form {
        self.form
    }

    /// Generator point, if set.
    pub fn generator(&self) -> Option<&AffinePoint> {
        self.generator.as_ref()
    }
}

/// Curve-construction/generator-setting operations that need `Arc` access
/// to stamp points with their owning curve; kept as free functions rather
/// than `&mut self` methods because a [`Curve`] is shared (`Arc`) and
/// logically immutable once published.
impl CurveParams {
    /// Set the curve's generator, order, and (optionally) cofactor.
    ///
    /// Implements `set_generator` contract verbatim, including
    /// the cofactor-inference branching grounded in LibreSSL's
    /// `ec_set_cofactor` (`original_source/.../ec_lib.c`):
    ///
    /// - a caller-supplied non-zero cofactor is accepted if positive;
    /// - otherwise, if `bit_length(n) <= (bit_length(p)+1)/2 + 3`, the
    ///   cofactor is left at `0` ("unknown");
    /// - otherwise `h = floor((p + 1 + n/2) / n)`, rejected if its bit
    ///   length exceeds `bit_length(p) + 1`.
    pub fn with_generator(
        curve: Curve,
        generator: AffinePoint,
        order: BoxedUint,
        cofactor: Option<BoxedUint>,
    ) -> Result<Curve> {
        let p_bits = curve.modulus.bit_length();
        let n_bits = order.bits();

        if order <= BoxedUint::one().widen(order.bits_precision()) {
            return Err(Error::InvalidGroupOrder);
        }
        if n_bits > p_bits + 1 {
            return Err(Error::InvalidGroupOrder);
        }
        if !bool::from(ProjectivePoint::from_affine(&generator, &curve).is_on_curve()) {
            return Err(Error::PointIsNotOnCurve);
        }

        let resolved_cofactor =
            resolve_cofactor(curve.modulus.as_uint(), p_bits, &order, cofactor)?;

        let mut params = (*curve).clone_params();
        params.generator = Some(generator);
        params.order = Some(order);
        params.cofactor = resolved_cofactor;
        Ok(Arc::new(params))
    }

    /// Attach an opaque curve-name tag. Round-trips unknown tags verbatim.
    pub fn with_nid(curve: Curve, nid: u64) -> Curve {
        let mut params = (*curve).clone_params();
        params.nid = Some(nid);
        Arc::new(params)
    }

    /// Attach a verbatim seed byte string.
    pub fn with_seed(curve: Curve, seed: Vec<u8>) -> Curve {
        let mut params = (*curve).clone_params();
        params.seed = Some(seed);
        Arc::new(params)
    }

    /// Set the default SEC1 encoding form.
    pub fn with_form(curve: Curve, form: Sec1Form) -> Curve {
        let mut params = (*curve).clone_params();
        params.form = form;
        Arc::new(params)
    }

    /// Idempotent clone: a second `with_*` applied to an already-equal
    /// destination is a no-op observed through [`CurveParams::cmp`].
    ///
    /// This resolves the open question of `EC_GROUP_copy`
    /// re-invoking method-level copy twice: rather than a mutate-in-place
    /// copy, curves here are persistent values (`with_*` returns a new
    /// `Arc`), so copying is simply cloning the `Arc`, which is trivially
    /// idempotent and requires no separate "copy" step.
    fn clone_params(&self) -> CurveParams {
        CurveParams {
            modulus: self.modulus.clone(),
            a: self.a.clone(),
            b: self.b.clone(),
            generator: self.generator.clone(),
            order: self.order.clone(),
            cofactor: self.cofactor.clone(),
            nid: self.nid,
            seed: self.seed.clone(),
            form: self.form,
        }
    }

    /// Validate discriminant, generator-on-curve, and `n * G = O`.
    pub fn check(curve: &Curve) -> Result<()> {
        if !bool::from(curve.discriminant_is_nonzero()) {
            return Err(Error::DiscriminantIsZero);
        }
        let generator = curve.generator.as_ref().ok_or(Error::UndefinedGenerator)?;
        let g = ProjectivePoint::from_affine(generator, curve);
        if !bool::from(g.is_on_curve()) {
            return Err(Error::PointIsNotOnCurve);
        }
        let order = curve.order.as_ref().ok_or(Error::UndefinedOrder)?;
        let ng = scalar_mul::wnaf::mul_double_nonct(curve, Some(order), None, None)?;
        if !bool::from(ng.is_at_infinity()) {
            return Err(Error::InvalidGroupOrder);
        }
        Ok(())
    }

    /// Parameter-wise comparison: field type
    /// (implicit — this crate only models one), NIDs if both present,
    /// then `(p, a, b)`, then generators via point `cmp`, then `(n, h)`.
    ///
    /// Returns `Ok(true)` if equal, `Ok(false)` if distinct, `Err` if the
    /// comparison could not be completed (e.g. missing generator/order).
    pub fn cmp(a: &Curve, b: &Curve) -> Result<bool> {
        if let (Some(nid_a), Some(nid_b)) = (a.nid, b.nid) {
            if nid_a != nid_b {
                return Ok(false);
            }
        }
        if a.modulus.as_uint() != b.modulus.as_uint() {
            return Ok(false);
        }
        if !bool::from(a.a.ct_eq(&b.a)) || !bool::from(a.b.ct_eq(&b.b)) {
            return Ok(false);
        }

        let (ga, gb) = (
            a.generator.as_ref().ok_or(Error::UndefinedGenerator)?,
            b.generator.as_ref().ok_or(Error::UndefinedGenerator)?,
        );
        let pa = ProjectivePoint::from_affine(ga, a);
        let pb = ProjectivePoint::from_affine(gb, b);
        if !pa.cmp(&pb)? {
            return Ok(false);
        }

        let (na, nb) = (
            a.order.as_ref().ok_or(Error::UndefinedOrder)?,
            b.order.as_ref().ok_or(Error::UndefinedOrder)?,
        );
        if na != nb || &a.cofactor != &b.cofactor {
            return Ok(false);
        }

        Ok(true)
    }
}

fn resolve_cofactor(
    p: &BoxedUint,
    p_bits: u32,
    order: &BoxedUint,
    cofactor: Option<BoxedUint>,
) -> Result<BoxedUint> {
    if let Some(h) = cofactor {
        if !bool::from(h.is_zero()) {
            // BoxedUint is non-negative by construction; "negative" inputs
            // are rejected upstream by callers that parse a signed value.
            return Ok(h);
        }
    }

    let n_bits = order.bits();
    if n_bits <= (p_bits + 1) / 2 + 3 {
        return Ok(BoxedUint::zero().widen(order.bits_precision()));
    }

    // h = floor((p + 1 + n/2) / n)
    let numerator_bits = p_bits.max(n_bits) + 2;
    let half_n = order.clone().shr_vartime(1).widen(numerator_bits);
    let one = BoxedUint::one().widen(numerator_bits);
    let numerator = half_n
        .wrapping_add(&one)
        .wrapping_add(&p.clone().widen(numerator_bits));
    let h = numerator.wrapping_div(&order.clone().widen(numerator_bits));

    if h.bits() > p_bits + 1 {
        return Err(Error::InvalidGroupOrder);
    }
    Ok(h)
}

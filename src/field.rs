//! Field arithmetic adapter.
//!
//! Wraps [`crypto_bigint::BoxedUint`] with a runtime field modulus `p` and
//! supplies the modular operations the rest of this crate is built on:
//! add, subtract, negate, multiply, square, invert (constant- and
//! variable-time), square root (for compressed-point decoding), and
//! big-endian byte encode/decode. Unlike a compile-time-curve crate, `p`
//! is not known until a [`crate::curve::CurveParams`] is constructed, so
//! there is no Montgomery-form specialization here — every element is
//! kept as a canonical residue in `[0, p)`.

use alloc::vec::Vec;
use crypto_bigint::{BoxedUint, NonZero, Odd};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, ConstantTimeGreater, CtOption};

use crate::error::{Error, Result};

/// A prime field modulus `p`, plus the bit width used to size every element
/// derived from it.
#[derive(Clone, Debug)]
pub struct Modulus {
    p: Odd<BoxedUint>,
    bits: u32,
}

impl Modulus {
    /// Construct a field modulus from a big-endian byte string.
    ///
    /// Fails with [`Error::InvalidField`] if `p` is even, zero, or smaller
    /// than 3 (the smallest odd prime for which `y^2 = x^3 + ax + b` is
    /// meaningful).
    pub fn from_be_bytes(bytes: &[u8]) -> Result<Self> {
        let value = BoxedUint::from_be_slice(bytes, bytes.len() as u32 * 8)
            .map_err(|_| Error::InvalidField)?;
        Self::from_uint(value)
    }

    /// Construct a field modulus from an already-parsed [`BoxedUint`].
    pub fn from_uint(value: BoxedUint) -> Result<Self> {
        if bool::from(value.is_even()) {
            return Err(Error::InvalidField);
        }
        let bits = value.bits();
        if bits < 2 {
            return Err(Error::InvalidField);
        }
        let p = Odd::new(value).into_option().ok_or(Error::InvalidField)?;
        Ok(Self { p, bits })
    }

    /// The modulus as a plain [`BoxedUint`].
    pub fn as_uint(&self) -> &BoxedUint {
        self.p.as_ref()
    }

    /// `ceil(log2(p))`, used for Hasse-bound and wNAF-window sizing.
    pub fn bit_length(&self) -> u32 {
        self.bits
    }

    /// Number of bytes needed to hold a big-endian encoding of an element:
    /// `ceil(bit_length / 8)`.
    pub fn byte_length(&self) -> usize {
        self.bits.div_ceil(8) as usize
    }

    /// Reduce an arbitrary-width [`BoxedUint`] modulo `p`.
    ///
    /// `value` and `p` may differ in precision in either direction — a
    /// `mul`/`square` feeds this a double-width `widening_mul` product,
    /// while e.g. a short digest reduced mod the group order is narrower
    /// than `p` — so both are widened up to their common maximum before the
    /// `rem` (the same `max`-then-`widen` idiom `ecdsa::in_range` and
    /// `ecdsa::mask_nonce` use), then the remainder is resized back down to
    /// `p`'s own width.
    ///
    /// Exposed crate-wide since the ECDSA driver reuses this to treat the
    /// group order `n` as its own [`Modulus`] for scalar arithmetic.
    pub(crate) fn reduce(&self, value: BoxedUint) -> FieldElement {
        let precision = value.bits_precision().max(self.p.as_ref().bits_precision());
        let value = value.widen(precision);
        let wide_modulus = self.p.get().clone().widen(precision);
        let reduced = value.rem_vartime(NonZero::new(wide_modulus).unwrap());
        FieldElement(reduced.resize(self.p.bits()))
    }

    /// `lhs + rhs mod p`.
    pub fn add(&self, lhs: &FieldElement, rhs: &FieldElement) -> FieldElement {
        let sum = lhs.0.clone().wrapping_add(&rhs.0);
        self.reduce(sum)
    }

    /// `lhs - rhs mod p`.
    pub fn sub(&self, lhs: &FieldElement, rhs: &FieldElement) -> FieldElement {
        match lhs.0.checked_sub(&rhs.0).into_option() {
            Some(diff) => FieldElement(diff),
            None => {
                let shifted = lhs.0.clone().wrapping_add(self.p.as_ref());
                FieldElement(shifted.wrapping_sub(&rhs.0))
            }
        }
    }

    /// `-value mod p`.
    pub fn neg(&self, value: &FieldElement) -> FieldElement {
        if bool::from(value.is_zero()) {
            value.clone()
        } else {
            self.sub(&FieldElement(self.p.as_ref().clone()), value)
        }
    }

    /// `lhs * rhs mod p`.
    pub fn mul(&self, lhs: &FieldElement, rhs: &FieldElement) -> FieldElement {
        let product = lhs.0.clone().widening_mul(&rhs.0);
        self.reduce(product)
    }

    /// `value^2 mod p`.
    pub fn square(&self, value: &FieldElement) -> FieldElement {
        self.mul(value, value)
    }

    /// Constant-time modular inverse. Returns `None` (as a false `CtOption`)
    /// iff `value` is zero mod `p`.
    ///
    /// This is the operation the blinded ECDSA `s` computation
    /// and the constant-time scalar multipliers depend on to
    /// avoid leaking secret bit patterns through inversion timing.
    pub fn invert(&self, value: &FieldElement) -> CtOption<FieldElement> {
        let (inv, is_some) = value.0.inv_odd_mod(&self.p);
        CtOption::new(FieldElement(inv), is_some)
    }

    /// Variable-time modular inverse, for use only on non-secret values
    /// (e.g. the wNAF verification path, which is explicitly non-constant
    /// time).
    pub fn invert_vartime(&self, value: &FieldElement) -> Option<FieldElement> {
        let opt = self.invert(value);
        bool::from(opt.is_some()).then(|| opt.unwrap())
    }

    /// Square root of `value` mod `p`, if one exists.
    ///
    /// The original library delegates this to the big-integer layer
    /// (`BN_mod_sqrt`); a runtime-arbitrary field must supply it itself.
    /// Implemented via the Tonelli-Shanks algorithm, specialized to the
    /// common `p ≡ 3 (mod 4)` case used by most named curves (a direct
    /// `value^((p+1)/4)` exponentiation) with a general fallback.
    pub fn sqrt(&self, value: &FieldElement) -> CtOption<FieldElement> {
        if bool::from(value.is_zero()) {
            return CtOption::new(value.clone(), Choice::from(1));
        }

        let p = self.p.as_ref();
        let three = BoxedUint::from(3u32).widen(p.bits());
        if bool::from((p.clone() & BoxedUint::from(3u32).widen(p.bits())).ct_eq(&three)) {
            // p ≡ 3 (mod 4): sqrt = value^((p+1)/4) mod p.
            let exponent = p
                .clone()
                .wrapping_add(&BoxedUint::one().widen(p.bits()))
                .shr_vartime(2);
            let candidate = self.pow_vartime(value, &exponent);
            let check = self.square(&candidate);
            CtOption::new(candidate, check.ct_eq(value))
        } else {
            self.tonelli_shanks(value)
        }
    }

    fn tonelli_shanks(&self, value: &FieldElement) -> CtOption<FieldElement> {
        // General Tonelli-Shanks for p ≡ 1 (mod 4). Not on the hot path for
        // the curves this crate targets, but required for correctness over
        // an arbitrary runtime prime.
        let p = self.p.as_ref().clone();
        let one = BoxedUint::one().widen(p.bits());
        let mut q = p.clone().wrapping_sub(&one);
        let mut s: u32 = 0;
        while bool::from(q.is_even()) {
            q = q.shr_vartime(1);
            s += 1;
        }

        let mut z = FieldElement(BoxedUint::from(2u32).widen(p.bits()));
        while self.is_quadratic_residue(&z) {
            z = self.add(&z, &FieldElement(one.clone()));
        }

        let mut m = s;
        let mut c = self.pow_vartime(&z, &q);
        let mut t = self.pow_vartime(value, &q);
        let q_plus_one_half = q.wrapping_add(&one).shr_vartime(1);
        let mut r = self.pow_vartime(value, &q_plus_one_half);

        loop {
            if bool::from(t.is_zero()) {
                return CtOption::new(FieldElement(BoxedUint::zero().widen(p.bits())), Choice::from(1));
            }
            if self.is_one(&t) {
                return CtOption::new(r, Choice::from(1));
            }

            let mut i = 0u32;
            let mut t2i = t.clone();
            while !self.is_one(&t2i) {
                t2i = self.square(&t2i);
                i += 1;
                if i == m {
                    return CtOption::new(r, Choice::from(0));
                }
            }

            let exp = BoxedUint::one()
                .widen(p.bits())
                .shl_vartime((m - i - 1) as usize);
            let b = self.pow_vartime(&c, &exp);
            m = i;
            c = self.square(&b);
            t = self.mul(&t, &c);
            r = self.mul(&r, &b);
        }
    }

    fn is_quadratic_residue(&self, value: &FieldElement) -> bool {
        let p = self.p.as_ref();
        let exponent = p
            .clone()
            .wrapping_sub(&BoxedUint::one().widen(p.bits()))
            .shr_vartime(1);
        self.is_one(&self.pow_vartime(value, &exponent))
    }

    fn is_one(&self, value: &FieldElement) -> bool {
        let one = FieldElement(BoxedUint::one().widen(self.p.bits()));
        bool::from(value.0.ct_eq(&one.0))
    }

    /// Variable-time modular exponentiation, used only by [`Self::sqrt`]
    /// (never on secret-dependent exponents).
    fn pow_vartime(&self, base: &FieldElement, exponent: &BoxedUint) -> FieldElement {
        let mut result = FieldElement(BoxedUint::one().widen(self.p.bits()));
        let mut base = base.clone();
        for i in 0..exponent.bits_precision() {
            if exponent.bit(i).into() {
                result = self.mul(&result, &base);
            }
            base = self.square(&base);
        }
        result
    }

    /// Decode a big-endian byte string into a field element, rejecting
    /// values `>= p`.
    pub fn element_from_be_bytes(&self, bytes: &[u8]) -> Result<FieldElement> {
        let value = BoxedUint::from_be_slice(bytes, self.p.bits()).map_err(|_| Error::InvalidEncoding)?;
        if bool::from(value.ct_gt(self.p.as_ref())) || bool::from(value.ct_eq(self.p.as_ref())) {
            return Err(Error::InvalidEncoding);
        }
        Ok(FieldElement(value))
    }

    /// Encode a field element as fixed-width big-endian bytes
    /// (`byte_length()` bytes).
    pub fn element_to_be_bytes(&self, value: &FieldElement) -> Vec<u8> {
        let full = value.0.to_be_bytes();
        full.as_ref()[full.as_ref().len() - self.byte_length()..].to_vec()
    }

    /// The additive identity.
    pub fn zero(&self) -> FieldElement {
        FieldElement(BoxedUint::zero().widen(self.p.bits()))
    }

    /// The multiplicative identity.
    pub fn one(&self) -> FieldElement {
        FieldElement(BoxedUint::one().widen(self.p.bits()))
    }
}

/// An element of a prime field, represented as a canonical residue in
/// `[0, p)`.
///
/// A `FieldElement` has no operations of its own: every arithmetic
/// operation is a method on the owning [`Modulus`], mirroring the original
/// library's `BN_mod_*(r, a, b, p, ctx)` shape where the modulus is always
/// explicit.
#[derive(Clone, Debug)]
pub struct FieldElement(pub(crate) BoxedUint);

impl FieldElement {
    pub(crate) fn from_uint(value: BoxedUint) -> Self {
        FieldElement(value)
    }

    pub(crate) fn as_uint(&self) -> &BoxedUint {
        &self.0
    }

    /// Constant-time zero test.
    pub fn is_zero(&self) -> Choice {
        self.0.is_zero()
    }

    /// Constant-time equality.
    pub fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }

    /// Least-significant bit, used for SEC1 y-bit recovery.
    pub fn is_odd(&self) -> Choice {
        self.0.bit(0)
    }
}

impl zeroize::Zeroize for FieldElement {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl ConditionallySelectable for FieldElement {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        FieldElement(BoxedUint::conditional_select(&a.0, &b.0, choice))
    }
}

/// Optional coordinate/Z blinding hook.
///
/// Multiplies a Jacobian representative's `(X, Y, Z)` by `(λ², λ³, λ)` for a
/// random nonzero `λ`, yielding an equivalent point with a freshly
/// randomized `Z`. A no-op by default; callers that want side-channel
/// hardening invoke it explicitly before a secret-dependent scalar
/// multiplication loop, as documented on
/// [`crate::point::projective::ProjectivePoint::blind`].
pub fn random_nonzero_element(
    modulus: &Modulus,
    rng: &mut impl rand_core::CryptoRng,
) -> Result<FieldElement> {
    for _ in 0..1024 {
        let candidate = BoxedUint::random(rng, modulus.p.bits());
        let reduced = modulus.reduce(candidate);
        if !bool::from(reduced.is_zero()) {
            return Ok(reduced);
        }
    }
    Err(Error::RandomNumberGenerationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    // GF(97), a field small enough to hand-check every result.
    fn gf97() -> Modulus {
        Modulus::from_uint(BoxedUint::from(97u32)).unwrap()
    }

    fn elem(m: &Modulus, v: u32) -> FieldElement {
        m.element_from_be_bytes(&v.to_be_bytes()).unwrap()
    }

    #[test]
    fn add_wraps_mod_p() {
        let m = gf97();
        let sum = m.add(&elem(&m, 90), &elem(&m, 10));
        assert_eq!(m.element_to_be_bytes(&sum), alloc::vec![3u8]);
    }

    #[test]
    fn sub_wraps_mod_p() {
        let m = gf97();
        let diff = m.sub(&elem(&m, 5), &elem(&m, 10));
        assert_eq!(m.element_to_be_bytes(&diff), alloc::vec![92u8]);
    }

    #[test]
    fn neg_of_zero_is_zero() {
        let m = gf97();
        assert!(bool::from(m.neg(&m.zero()).is_zero()));
    }

    #[test]
    fn mul_and_invert_round_trip() {
        let m = gf97();
        let a = elem(&m, 41);
        let inv = m.invert(&a).unwrap();
        let product = m.mul(&a, &inv);
        assert!(bool::from(product.ct_eq(&m.one())));
    }

    #[test]
    fn invert_of_zero_fails() {
        let m = gf97();
        assert!(!bool::from(m.invert(&m.zero()).is_some()));
    }

    #[test]
    fn sqrt_of_square_round_trips() {
        let m = gf97();
        let a = elem(&m, 12);
        let squared = m.square(&a);
        let root = m.sqrt(&squared).unwrap();
        let check = m.square(&root);
        assert!(bool::from(check.ct_eq(&squared)));
    }

    #[test]
    fn sqrt_of_non_residue_fails() {
        // 97 ≡ 1 (mod 4): find a value whose Euler criterion is -1.
        let m = gf97();
        let non_residue = (2..97u32)
            .map(|v| elem(&m, v))
            .find(|v| !bool::from(m.sqrt(v).is_some()));
        assert!(non_residue.is_some(), "expected at least one non-residue mod 97");
    }

    #[test]
    fn element_from_be_bytes_rejects_value_equal_to_modulus() {
        let m = gf97();
        assert!(m.element_from_be_bytes(&97u32.to_be_bytes()).is_err());
    }

    #[test]
    fn byte_length_matches_bit_length() {
        let m = gf97();
        assert_eq!(m.byte_length(), 1);
        assert_eq!(m.bit_length(), 7);
    }

    #[test]
    fn from_uint_rejects_even_modulus() {
        assert_eq!(Modulus::from_uint(BoxedUint::from(96u32)).unwrap_err(), Error::InvalidField);
    }
}

//! Error domain for this crate.
//!
//! Named kinds only, matching the error domain this crate's design is
//! grounded on (`EC_R_*`/`ECDSA_R_*` reason codes in the LibreSSL `ec` and
//! `ecdsa` modules) rather than raw integer codes.

use core::fmt;

/// Result alias used throughout this crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Named error kinds produced by this crate's curve, point, and ECDSA
/// operations.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// The field modulus `p` is invalid (zero, negative, or otherwise
    /// malformed).
    InvalidField,
    /// The claimed group order `n` is invalid: not `> 1`, or exceeds the
    /// Hasse bound relative to the field cardinality.
    InvalidGroupOrder,
    /// The cofactor could not be determined and was left as `0`.
    ///
    /// Returned only by APIs that require a known cofactor; curve
    /// construction itself treats an unknown cofactor as success.
    UnknownCofactor,
    /// The curve has no generator set.
    UndefinedGenerator,
    /// The curve has no order set.
    UndefinedOrder,
    /// The curve discriminant `4a^3 + 27b^2` is zero mod `p`.
    DiscriminantIsZero,
    /// An operation that requires an affine point was given the point at
    /// infinity.
    PointAtInfinity,
    /// A point does not satisfy the curve equation.
    PointIsNotOnCurve,
    /// Two objects (points, curves) passed to the same operation do not
    /// share the same owning curve.
    IncompatibleObjects,
    /// A signature failed validation.
    BadSignature,
    /// The random number generator failed to produce output.
    RandomNumberGenerationFailed,
    /// Caller-supplied `(k, r)` setup values could not produce a valid
    /// signature and must be regenerated by the caller.
    NeedNewSetupValues,
    /// The signing retry budget was exhausted; the curve's parameters are
    /// almost certainly broken.
    WrongCurveParameters,
    /// The destination buffer is smaller than the required encoded length.
    ///
    /// Never constructed by this crate today: [`crate::sec1::point2oct`]
    /// returns a freshly allocated `Vec<u8>` rather than writing into a
    /// caller-supplied buffer, so there is no buffer-length negotiation
    /// step that could come up short. Kept as a named variant so the error
    /// domain still names every failure mode a caller-supplied-buffer
    /// `point2oct` (should one be added later) would need, matching this
    /// enum's general stance of mirroring the original reason-code
    /// taxonomy rather than only the subset this crate's current API
    /// surface can trigger.
    BufferTooSmall,
    /// An octet string does not decode to a valid point encoding.
    InvalidEncoding,
    /// The requested operation is not implemented.
    NotImplemented,
    /// Memory for an internal temporary could not be allocated.
    AllocationFailure,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::InvalidField => "invalid field",
            Error::InvalidGroupOrder => "invalid group order",
            Error::UnknownCofactor => "unknown cofactor",
            Error::UndefinedGenerator => "undefined generator",
            Error::UndefinedOrder => "undefined order",
            Error::DiscriminantIsZero => "discriminant is zero",
            Error::PointAtInfinity => "point at infinity",
            Error::PointIsNotOnCurve => "point is not on curve",
            Error::IncompatibleObjects => "incompatible objects",
            Error::BadSignature => "bad signature",
            Error::RandomNumberGenerationFailed => "random number generation failed",
            Error::NeedNewSetupValues => "need new setup values",
            Error::WrongCurveParameters => "wrong curve parameters",
            Error::BufferTooSmall => "buffer too small",
            Error::InvalidEncoding => "invalid encoding",
            Error::NotImplemented => "not implemented",
            Error::AllocationFailure => "allocation failure",
        };
        f.write_str(msg)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

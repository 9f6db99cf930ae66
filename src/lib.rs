#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(
    clippy::unwrap_used,
    missing_docs,
    rust_2018_idioms,
    unused_lifetimes,
    unused_qualifications
)]

//! Runtime-configurable short-Weierstrass elliptic curve group over `GF(p)`.
//!
//! Unlike the per-curve crates in this workspace, which bake `p`, `a`, `b`,
//! and the generator in as compile-time constants, [`curve::CurveParams`]
//! takes them as runtime values — the same group implementation serves any
//! curve, at the cost of the Montgomery-form and `a = -3` specializations
//! those crates rely on for speed.
//!
//! ## Module map
//!
//! - [`field`]: the field-arithmetic adapter (`Modulus`/`FieldElement`).
//! - [`curve`]: the curve (group) object and its SEC1 presentation metadata.
//! - [`point`]: affine and Jacobian-projective point representations.
//! - [`scalar_mul`]: wNAF double-scalar and fixed-schedule single-scalar
//!   multiplication.
//! - [`sec1`]: point octet-string encoding and decoding.
//! - [`ecdsa`]: signing and verification built on the above.
//!
//! ## `alloc`
//!
//! This crate is `no_std` but requires `alloc` (enabled by default); every
//! type here is built on [`crypto_bigint::BoxedUint`], which is itself
//! heap-allocated to support an arbitrary runtime field width.

#[macro_use]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod curve;
pub mod ecdsa;
pub mod error;
pub mod field;
pub mod point;
pub mod scalar_mul;
pub mod sec1;

pub use crate::curve::{Curve, CurveParams, Sec1Form};
pub use crate::ecdsa::Signature;
pub use crate::error::{Error, Result};
pub use crate::field::{FieldElement, Modulus};
pub use crate::point::affine::AffinePoint;
pub use crate::point::projective::ProjectivePoint;

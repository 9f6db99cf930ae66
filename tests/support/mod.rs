//! Shared NIST P-256 parameters, used across integration tests as a concrete
//! instantiation of this crate's runtime-configurable curve.

use ecgroup::curve::CurveParams;
use ecgroup::point::affine::AffinePoint;
use ecgroup::{Curve, ProjectivePoint};
use hex_literal::hex;

pub const P: [u8; 32] =
    hex!("FFFFFFFF00000001000000000000000000000000FFFFFFFFFFFFFFFFFFFFFFFF");
pub const A: [u8; 32] =
    hex!("FFFFFFFF00000001000000000000000000000000FFFFFFFFFFFFFFFFFFFFFFFC");
pub const B: [u8; 32] =
    hex!("5AC635D8AA3A93E7B3EBBD55769886BC651D06B0CC53B0F63BCE3C3E27D2604B");
pub const GX: [u8; 32] =
    hex!("6B17D1F2E12C4247F8BCE6E563A440F277037D812DEB33A0F4A13945D898C296");
pub const GY: [u8; 32] =
    hex!("4FE342E2FE1A7F9B8EE7EB4A7C0F9E162BCE33576B315ECECBB6406837BF51F5");
pub const N: [u8; 32] =
    hex!("FFFFFFFF00000000FFFFFFFFFFFFFFFFBCE6FAADA7179E84F3B9CAC2FC632551");

pub const UNCOMPRESSED_BASEPOINT: &[u8] = &hex!(
    "04 6B17D1F2E12C4247F8BCE6E563A440F277037D812DEB33A0F4A13945D898C296
        4FE342E2FE1A7F9B8EE7EB4A7C0F9E162BCE33576B315ECECBB6406837BF51F5"
);
pub const COMPRESSED_BASEPOINT: &[u8] =
    &hex!("03 6B17D1F2E12C4247F8BCE6E563A440F277037D812DEB33A0F4A13945D898C296");

/// Builds NIST P-256 as a runtime [`Curve`], the same way a caller with its
/// own curve constants (not one of this workspace's built-in curves) would.
pub fn p256() -> Curve {
    let curve = CurveParams::new(&P, &A, &B).expect("valid curve parameters");
    let generator = generator_point(&curve);
    let order = crypto_bigint::BoxedUint::from_be_slice(&N, 256).unwrap();
    CurveParams::with_generator(curve, generator, order, None).expect("valid generator")
}

fn generator_point(curve: &Curve) -> AffinePoint {
    let modulus = curve.modulus();
    let gx = modulus.element_from_be_bytes(&GX).unwrap();
    let gy = modulus.element_from_be_bytes(&GY).unwrap();
    ProjectivePoint::set_affine(curve, gx, gy)
        .expect("basepoint is on curve")
        .make_affine()
}

/// Deterministic splitmix64-based RNG for reproducible test vectors. Not
/// actually cryptographically secure; the [`rand_core::CryptoRng`] marker is
/// implemented purely to satisfy this crate's signing API in tests.
pub struct DeterministicRng(pub u64);

impl rand_core::RngCore for DeterministicRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E3779B97F4A7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        let mut chunks = dst.chunks_exact_mut(8);
        for chunk in &mut chunks {
            chunk.copy_from_slice(&self.next_u64().to_le_bytes());
        }
        let rem = chunks.into_remainder();
        if !rem.is_empty() {
            let bytes = self.next_u64().to_le_bytes();
            rem.copy_from_slice(&bytes[..rem.len()]);
        }
    }
}

impl rand_core::CryptoRng for DeterministicRng {}

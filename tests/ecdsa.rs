//! ECDSA sign/verify tests.

mod support;

use crypto_bigint::BoxedUint;
use ecgroup::ecdsa::{sign, sign_setup, sign_with_setup, verify};
use ecgroup::field::{random_nonzero_element, Modulus};
use ecgroup::scalar_mul::constant_time;
use ecgroup::point::affine::AffinePoint;
use support::{p256, DeterministicRng};

fn private_key(curve: &ecgroup::Curve, rng: &mut DeterministicRng) -> BoxedUint {
    let n = Modulus::from_uint(curve.order().unwrap().clone()).unwrap();
    let elem = random_nonzero_element(&n, rng).unwrap();
    let bytes = n.element_to_be_bytes(&elem);
    BoxedUint::from_be_slice(&bytes, n.bit_length()).unwrap()
}

fn public_key(curve: &ecgroup::Curve, private: &BoxedUint) -> AffinePoint {
    constant_time::mul_generator_ct(curve, private)
        .unwrap()
        .make_affine()
}

#[test]
fn sign_then_verify_round_trips() {
    let curve = p256();
    let mut rng = DeterministicRng(1);
    let private = private_key(&curve, &mut rng);
    let public = public_key(&curve, &private);

    let digest = [0x42u8; 32];
    let sig = sign(&curve, &digest, &private, &mut rng).unwrap();

    assert!(verify(&curve, &digest, &sig, &public).unwrap());
}

#[test]
fn tampered_digest_fails_verification() {
    let curve = p256();
    let mut rng = DeterministicRng(2);
    let private = private_key(&curve, &mut rng);
    let public = public_key(&curve, &private);

    let digest = [0x11u8; 32];
    let sig = sign(&curve, &digest, &private, &mut rng).unwrap();

    let mut other_digest = digest;
    other_digest[0] ^= 0xff;
    assert!(!verify(&curve, &other_digest, &sig, &public).unwrap());
}

#[test]
fn wrong_public_key_fails_verification() {
    let curve = p256();
    let mut rng = DeterministicRng(3);
    let private = private_key(&curve, &mut rng);
    let other_private = private_key(&curve, &mut rng);
    let other_public = public_key(&curve, &other_private);

    let digest = [0x22u8; 32];
    let sig = sign(&curve, &digest, &private, &mut rng).unwrap();

    assert!(!verify(&curve, &digest, &sig, &other_public).unwrap());
}

#[test]
fn sign_with_setup_matches_combined_sign() {
    let curve = p256();
    let mut rng = DeterministicRng(4);
    let private = private_key(&curve, &mut rng);
    let public = public_key(&curve, &private);
    let digest = [0x33u8; 32];

    let (kinv, r) = loop {
        if let Some(setup) = sign_setup(&curve, &mut rng).unwrap() {
            break setup;
        }
    };
    let sig = sign_with_setup(&curve, &digest, &private, &kinv, &r, &mut rng).unwrap();

    assert!(verify(&curve, &digest, &sig, &public).unwrap());
}

#[test]
fn out_of_range_signature_components_are_rejected() {
    let curve = p256();
    let mut rng = DeterministicRng(5);
    let private = private_key(&curve, &mut rng);
    let public = public_key(&curve, &private);
    let digest = [0x44u8; 32];

    let mut sig = sign(&curve, &digest, &private, &mut rng).unwrap();
    let order = curve.order().unwrap().clone();
    sig.set(order, sig.s().clone());
    assert!(!verify(&curve, &digest, &sig, &public).unwrap());
}

#[cfg(feature = "der")]
#[test]
fn der_verify_rejects_trailing_garbage() {
    use der::Encode;
    use ecgroup::ecdsa::verify_der;

    let curve = p256();
    let mut rng = DeterministicRng(6);
    let private = private_key(&curve, &mut rng);
    let public = public_key(&curve, &private);
    let digest = [0x55u8; 32];
    let sig = sign(&curve, &digest, &private, &mut rng).unwrap();

    let mut der_bytes = to_der(&sig);
    assert!(verify_der(&curve, &digest, &der_bytes, &public).unwrap());

    der_bytes.push(0x00);
    assert_eq!(
        verify_der(&curve, &digest, &der_bytes, &public).unwrap_err(),
        ecgroup::error::Error::BadSignature
    );

    fn minimal_be_bytes(full: &[u8]) -> Vec<u8> {
        let mut start = 0;
        while start + 1 < full.len() && full[start] == 0 && full[start + 1] < 0x80 {
            start += 1;
        }
        full[start..].to_vec()
    }

    fn to_der(sig: &ecgroup::ecdsa::Signature) -> Vec<u8> {
        use der::asn1::UintRef;
        #[derive(der::Sequence)]
        struct RawSignature<'a> {
            r: UintRef<'a>,
            s: UintRef<'a>,
        }
        let r_full = sig.r().to_be_bytes();
        let s_full = sig.s().to_be_bytes();
        let r_bytes = minimal_be_bytes(r_full.as_ref());
        let s_bytes = minimal_be_bytes(s_full.as_ref());
        let raw = RawSignature {
            r: UintRef::new(&r_bytes).unwrap(),
            s: UintRef::new(&s_bytes).unwrap(),
        };
        raw.to_der().unwrap()
    }
}

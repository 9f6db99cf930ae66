//! Affine point tests.

mod support;

use ecgroup::ProjectivePoint;
use support::p256;

#[test]
fn generator_is_not_identity() {
    let curve = p256();
    let generator = ProjectivePoint::from_affine(curve.generator().unwrap(), &curve);
    assert!(!bool::from(generator.is_at_infinity()));
}

#[test]
fn identity_make_affine_reports_identity() {
    let curve = p256();
    let identity = ProjectivePoint::identity(&curve);
    let affine = identity.make_affine();
    assert!(bool::from(affine.is_identity()));
}

#[test]
fn get_affine_on_identity_errors() {
    let curve = p256();
    let identity = ProjectivePoint::identity(&curve);
    assert!(identity.get_affine().is_err());
}

#[test]
fn get_affine_on_generator_matches_known_coordinates() {
    let curve = p256();
    let generator = ProjectivePoint::from_affine(curve.generator().unwrap(), &curve);
    let (x, y) = generator.get_affine().unwrap();
    let expected_x = curve.modulus().element_from_be_bytes(&support::GX).unwrap();
    let expected_y = curve.modulus().element_from_be_bytes(&support::GY).unwrap();
    assert!(bool::from(x.ct_eq(&expected_x)));
    assert!(bool::from(y.ct_eq(&expected_y)));
}

//! Jacobian projective arithmetic tests.

mod support;

use ecgroup::curve::CurveParams;
use ecgroup::point::projective::ProjectivePoint;
use ecgroup::scalar_mul::wnaf::mul_double_nonct;
use crypto_bigint::BoxedUint;
use support::p256;

fn generator(curve: &ecgroup::Curve) -> ProjectivePoint {
    ProjectivePoint::from_affine(curve.generator().unwrap(), curve)
}

#[test]
fn double_matches_self_addition() {
    let curve = p256();
    let g = generator(&curve);
    let doubled = g.double();
    let added = g.add(&g).unwrap();
    assert!(doubled.cmp(&added).unwrap());
}

#[test]
fn addition_is_commutative() {
    let curve = p256();
    let g = generator(&curve);
    let two_g = g.double();
    let a = g.add(&two_g).unwrap();
    let b = two_g.add(&g).unwrap();
    assert!(a.cmp(&b).unwrap());
}

#[test]
fn addition_is_associative() {
    let curve = p256();
    let g = generator(&curve);
    let two_g = g.double();
    let three_g = two_g.add(&g).unwrap();

    let lhs = two_g.add(&g).unwrap().add(&three_g).unwrap();
    let rhs = two_g.add(&g.add(&three_g).unwrap()).unwrap();
    assert!(lhs.cmp(&rhs).unwrap());
}

#[test]
fn identity_is_additive_identity() {
    let curve = p256();
    let g = generator(&curve);
    let identity = ProjectivePoint::identity(&curve);
    assert!(g.add(&identity).unwrap().cmp(&g).unwrap());
    assert!(identity.add(&g).unwrap().cmp(&g).unwrap());
}

#[test]
fn point_plus_its_negation_is_identity() {
    let curve = p256();
    let g = generator(&curve);
    let sum = g.add(&g.invert()).unwrap();
    assert!(bool::from(sum.is_at_infinity()));
}

#[test]
fn order_times_generator_is_identity() {
    let curve = p256();
    let n = curve.order().unwrap();
    let ng = mul_double_nonct(&curve, Some(n), None, None).unwrap();
    assert!(bool::from(ng.is_at_infinity()));
}

#[test]
fn wnaf_double_mul_matches_repeated_addition() {
    let curve = p256();
    let five = BoxedUint::from(5u32).widen(curve.modulus().bit_length());
    let via_wnaf = mul_double_nonct(&curve, Some(&five), None, None).unwrap();

    let base = generator(&curve);
    let mut via_addition = base.clone();
    for _ in 0..4 {
        via_addition = via_addition.add(&base).unwrap();
    }

    assert!(via_wnaf.cmp(&via_addition).unwrap());
}

#[test]
fn batch_normalize_matches_individual_normalization() {
    let curve = p256();
    let g = generator(&curve);
    let two_g = g.double();
    let three_g = two_g.add(&g).unwrap();
    let points = [g.clone(), two_g.clone(), three_g.clone()];

    let batch = ProjectivePoint::points_make_affine(&curve, &points).unwrap();
    for (batched, individual) in batch.iter().zip([g, two_g, three_g]) {
        let individual = individual.make_affine();
        assert!(bool::from(batched.x().ct_eq(individual.x())));
        assert!(bool::from(batched.y().ct_eq(individual.y())));
    }
}

#[test]
fn incompatible_curves_reject_addition() {
    let curve_a = p256();
    let curve_b = CurveParams::new(&support::P, &support::A, &support::B).unwrap();
    let a = generator(&curve_a);
    let b = ProjectivePoint::identity(&curve_b);
    assert!(a.add(&b).is_err());
}

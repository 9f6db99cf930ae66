//! Variable-time double-scalar multiplication: `r = m*G + n*P`.
//!
//! Grounded in `original_source/.../ec_mult.c`'s `ec_window_bits`,
//! `ec_compute_wNAF`, `ec_compute_odd_multiples`, `ec_normalize_rows`, and
//! `ec_wNAF_mul`, translated to owned `Vec`s and `Result` propagation in
//! place of `calloc`'d arrays and `goto err`. Not constant-time: callers
//! must never feed a secret scalar through this path (signature
//! verification is the only consumer in this crate).

use alloc::vec::Vec;
use crypto_bigint::BoxedUint;

use crate::curve::Curve;
use crate::error::{Error, Result};
use crate::point::affine::AffinePoint;
use crate::point::projective::ProjectivePoint;

/// `r = m*G + n*P`, where `G` is the curve's generator. Either scalar may
/// be omitted (`None`) to drop its term; `n` and `p` must be supplied
/// together.
pub fn mul_double_nonct(
    curve: &Curve,
    m: Option<&BoxedUint>,
    n: Option<&BoxedUint>,
    p: Option<&AffinePoint>,
) -> Result<ProjectivePoint> {
    if n.is_some() != p.is_some() {
        return Err(Error::NotImplemented);
    }

    let mut terms = Vec::new();
    if let Some(m) = m {
        if !bool::from(m.is_zero()) {
            let g = curve.generator().ok_or(Error::UndefinedGenerator)?;
            terms.push(Term::new(curve, g.clone(), m.clone()));
        }
    }
    if let (Some(n), Some(p)) = (n, p) {
        if !bool::from(n.is_zero()) {
            terms.push(Term::new(curve, p.clone(), n.clone()));
        }
    }

    if terms.is_empty() {
        return Ok(ProjectivePoint::identity(curve));
    }

    // Batch-normalize every term's odd-multiples table in a single pass
    // (one field inversion total), then hand each term back its own
    // affine slice.
    let mut all_points = Vec::new();
    let mut offsets = Vec::with_capacity(terms.len());
    for term in &terms {
        offsets.push(all_points.len());
        all_points.extend(term.table.iter().cloned());
    }
    let affine_all = ProjectivePoint::points_make_affine(curve, &all_points)?;
    let mut tables = Vec::with_capacity(terms.len());
    for (i, term) in terms.iter().enumerate() {
        let start = offsets[i];
        let end = start + term.table.len();
        tables.push(affine_all[start..end].to_vec());
    }

    let max_len = terms.iter().map(|t| t.digits.len()).max().unwrap_or(0);

    let mut r = ProjectivePoint::identity(curve);
    let mut r_is_infinity = true;
    let mut r_is_inverted = false;

    for k in (0..max_len).rev() {
        if !r_is_infinity {
            r = r.double();
        }

        for (i, term) in terms.iter().enumerate() {
            if k >= term.digits.len() {
                continue;
            }
            let digit = term.digits[k];
            if digit == 0 {
                continue;
            }

            let is_neg = digit < 0;
            if is_neg != r_is_inverted {
                if !r_is_infinity {
                    r = r.invert();
                }
                r_is_inverted = !r_is_inverted;
            }

            let idx = (digit.unsigned_abs() as usize - 1) / 2;
            let addend = ProjectivePoint::from_affine(&tables[i][idx], curve);
            if r_is_infinity {
                r = addend;
                r_is_infinity = false;
            } else {
                r = r.add(&addend)?;
            }
        }
    }

    if r_is_inverted {
        r = r.invert();
    }

    Ok(r)
}

struct Term {
    digits: Vec<i32>,
    table: Vec<ProjectivePoint>,
}

impl Term {
    fn new(curve: &Curve, base: AffinePoint, scalar: BoxedUint) -> Self {
        let w = window_bits(scalar.bits());
        let digits = compute_wnaf(&scalar, w);
        let table = odd_multiples_table(curve, &base, w);
        Term { digits, table }
    }
}

/// `ec_window_bits`: select wNAF width from the scalar's bit length.
fn window_bits(bit_len: u32) -> u32 {
    if bit_len >= 2000 {
        6
    } else if bit_len >= 800 {
        5
    } else if bit_len >= 300 {
        4
    } else if bit_len >= 70 {
        3
    } else if bit_len >= 20 {
        2
    } else {
        1
    }
}

/// `ec_compute_wNAF`: signed-digit representation with at most one nonzero
/// digit in any `w+1` consecutive positions.
fn compute_wnaf(scalar: &BoxedUint, w: u32) -> Vec<i32> {
    let bit = 1i64 << w;
    let next_bit = bit << 1;
    let precision = scalar.bits_precision();
    let mut c = scalar.clone();
    let mut digits = Vec::new();

    while !bool::from(c.is_zero()) {
        let mut digit = 0i64;
        if bool::from(c.bit(0)) {
            let window_val = low_bits(&c, w + 1);
            digit = if window_val >= bit {
                window_val - next_bit
            } else {
                window_val
            };
            c = if digit >= 0 {
                c.wrapping_sub(&BoxedUint::from(digit as u64).widen(precision))
            } else {
                c.wrapping_add(&BoxedUint::from((-digit) as u64).widen(precision))
            };
        }
        digits.push(digit as i32);
        c = c.shr_vartime(1);
    }

    digits
}

fn low_bits(c: &BoxedUint, nbits: u32) -> i64 {
    let mut val = 0i64;
    for i in 0..nbits {
        if bool::from(c.bit(i)) {
            val |= 1i64 << i;
        }
    }
    val
}

/// `ec_compute_odd_multiples`: `{B, 3B, 5B, ..., (2L-1)B}` with `L = 2^(w-1)`.
fn odd_multiples_table(curve: &Curve, base: &AffinePoint, w: u32) -> Vec<ProjectivePoint> {
    let l = 1usize << (w - 1);
    let b = ProjectivePoint::from_affine(base, curve);
    let d = b.double();
    let mut table = Vec::with_capacity(l);
    table.push(b);
    for i in 1..l {
        let next = table[i - 1]
            .add(&d)
            .expect("odd-multiples table points share one curve");
        table.push(next);
    }
    table
}

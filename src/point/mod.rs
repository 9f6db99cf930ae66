//! Point representations: affine `(x, y)` and Jacobian projective `(X, Y, Z)`.

pub mod affine;
pub mod projective;

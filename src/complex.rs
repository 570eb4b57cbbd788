use num::complex::Complex;

/// The arithmetic primitive of the whole renderer: two `f64` fields,
/// `Copy`, no heap. The iterator mutates it in place through the
/// compound-assignment operators (`z *= z; z += c;`).
pub type C<T> = Complex<T>;

pub fn c(re: f64, im: f64) -> C<f64> {
    Complex::new(re, im)
}

pub fn cr(re: f64) -> C<f64> {
    c(re, 0.0)
}

pub fn ci(im: f64) -> C<f64> {
    c(0.0, im)
}

/// Squared magnitude, compared against a squared escape threshold so the
/// inner loop never takes a square root.
#[inline]
pub fn squared_magnitude(z: &C<f64>) -> f64 {
    z.norm_sqr()
}

use image::{Rgb, RgbImage};

use crate::error::RenderError;
use crate::solver::{Escape, EscapeState};

/// Color with channels in `[0, 255]`, kept as floats until the final
/// [`flatten`].
pub type Color = [f64; 3];

/// Interior points carry no gradient information and are painted flat.
pub const RESET: Color = [0.0, 0.0, 0.0];

#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    (1.0 - t) * a + t * b
}

/// Truncate a channel value to a byte: floor, then clamp. Never rounds.
#[inline]
pub fn flatten(x: f64) -> u8 {
    x.floor().clamp(0.0, 255.0) as u8
}

pub fn to_rgb(color: Color) -> Rgb<u8> {
    Rgb([flatten(color[0]), flatten(color[1]), flatten(color[2])])
}

fn mix(a: Color, b: Color, t: f64) -> Color {
    [lerp(a[0], b[0], t), lerp(a[1], b[1], t), lerp(a[2], b[2], t)]
}

/// Two-anchor linear gradient: `left` at iteration 0, `right` at the cap.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Gradient {
    pub left: Color,
    pub right: Color,
}

impl Gradient {
    pub fn new(left: Color, right: Color) -> Self {
        Self { left, right }
    }

    /// Color at `t` in `[0, 1]`; `t` outside that range is clamped.
    pub fn at(&self, t: f64) -> Color {
        mix(self.left, self.right, t.clamp(0.0, 1.0))
    }

    /// Direct linear pick of index `x` out of `n`.
    pub fn pick(&self, x: f64, n: f64) -> Color {
        self.at(x / n)
    }

    /// Colors at `floor(x)` and `floor(x) + 1`, blended by the fractional
    /// part of `x`.
    pub fn interp(&self, x: f64, n: f64) -> Color {
        let base = x.floor();
        let lo = self.at(base / n);
        let hi = self.at((base + 1.0) / n);
        mix(lo, hi, x - base)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Integer escape count, direct pick.
    Linear,
    /// Normalized escape count, blended between neighbouring indices.
    #[default]
    Smooth,
}

pub trait Painter {
    fn escape_color(&self, escape: Escape) -> Rgb<u8>;

    fn paint(&self, state: &EscapeState) -> Result<RgbImage, RenderError> {
        let too_large = || RenderError::TooLarge {
            width: state.width(),
            height: state.height(),
        };
        let width: u32 = state.width().try_into().map_err(|_| too_large())?;
        let height: u32 = state.height().try_into().map_err(|_| too_large())?;

        let mut img = RgbImage::new(width, height);
        for (pixel, cell) in img.pixels_mut().zip(state.cells()) {
            *pixel = self.escape_color(cell.escape);
        }
        Ok(img)
    }
}

#[derive(Copy, Clone, Debug)]
pub struct GradientPainter {
    gradient: Gradient,
    mode: ColorMode,
    max_iterations: u32,
}

impl GradientPainter {
    pub fn new(gradient: Gradient, mode: ColorMode, max_iterations: u32) -> Self {
        Self {
            gradient,
            mode,
            max_iterations,
        }
    }

    /// Unflattened color, for callers that want the float channels.
    pub fn color(&self, escape: Escape) -> Color {
        if escape.is_interior() {
            return RESET;
        }
        let n = self.max_iterations as f64;
        match self.mode {
            ColorMode::Linear => self
                .gradient
                .pick(escape.iterations(self.max_iterations) as f64, n),
            ColorMode::Smooth => self
                .gradient
                .interp(escape.smoothed(self.max_iterations), n),
        }
    }
}

impl Painter for GradientPainter {
    fn escape_color(&self, escape: Escape) -> Rgb<u8> {
        to_rgb(self.color(escape))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::complex::c;
    use crate::coord::Viewport;
    use crate::functions::ZSquared;
    use crate::solver::{EscapeSolver, Solver};

    const BLUE: Gradient = Gradient {
        left: [0.0, 24.0, 104.0],
        right: [163.0, 255.0, 252.0],
    };

    fn escaped(count: u32, magnitude_sqr: f64) -> Escape {
        Escape::Escaped {
            count,
            magnitude_sqr,
        }
    }

    #[test]
    fn test_gradient_endpoints_exact() {
        assert_eq!(BLUE.at(0.0), BLUE.left);
        assert_eq!(BLUE.at(1.0), BLUE.right);
        assert_eq!(BLUE.pick(0.0, 255.0), BLUE.left);
        assert_eq!(BLUE.pick(255.0, 255.0), BLUE.right);
    }

    #[test]
    fn test_gradient_clamps_parameter() {
        assert_eq!(BLUE.at(-0.5), BLUE.left);
        assert_eq!(BLUE.at(1.5), BLUE.right);
    }

    #[test]
    fn test_interp_on_integer_matches_pick() {
        for x in [0.0, 1.0, 17.0, 128.0] {
            let a = BLUE.interp(x, 255.0);
            let b = BLUE.pick(x, 255.0);
            for ch in 0..3 {
                assert!((a[ch] - b[ch]).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_interp_is_continuous_across_integers() {
        let n = 255.0;
        let step = |ch: usize| (BLUE.right[ch] - BLUE.left[ch]).abs() / n;
        let mut x = 0.0;
        while x < 250.0 {
            let a = BLUE.interp(x, n);
            let b = BLUE.interp(x + 1.0, n);
            let just_below = BLUE.interp(x.floor() + 1.0 - 1e-9, n);
            let at = BLUE.interp(x.floor() + 1.0, n);
            for ch in 0..3 {
                assert!((a[ch] - b[ch]).abs() <= step(ch) + 1e-9);
                assert!((just_below[ch] - at[ch]).abs() < 1e-6);
            }
            x += 0.37;
        }
    }

    #[test]
    fn test_flatten_truncates() {
        assert_eq!(flatten(0.0), 0);
        assert_eq!(flatten(189.999), 189);
        assert_eq!(flatten(255.0), 255);
        assert_eq!(flatten(300.0), 255);
        assert_eq!(flatten(-3.0), 0);
        assert_eq!(to_rgb([1.9, 2.1, 254.99]), Rgb([1, 2, 254]));
    }

    #[test]
    fn test_interior_is_reset_color() {
        for mode in [ColorMode::Linear, ColorMode::Smooth] {
            let painter = GradientPainter::new(BLUE, mode, 255);
            assert_eq!(painter.color(Escape::Interior), RESET);
            assert_eq!(painter.escape_color(Escape::Interior), Rgb([0, 0, 0]));
        }
    }

    #[test]
    fn test_linear_mode_uses_integer_count() {
        let painter = GradientPainter::new(BLUE, ColorMode::Linear, 255);
        assert_eq!(painter.color(escaped(0, 100.0)), BLUE.left);
        assert_eq!(painter.color(escaped(51, 5.0)), BLUE.at(0.2));
    }

    #[test]
    fn test_smooth_mode_uses_normalized_count() {
        let painter = GradientPainter::new(BLUE, ColorMode::Smooth, 255);
        // |z| = 2: smoothed count is exactly count + 1
        let got = painter.color(escaped(9, 4.0));
        let want = BLUE.pick(10.0, 255.0);
        for ch in 0..3 {
            assert!((got[ch] - want[ch]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_paint_interior_pixels_black() {
        let vb = Viewport::new(c(-0.5, 0.0), 1.0, 16, 8).viewbox();
        let state = EscapeSolver::<ZSquared>::default().solve(EscapeState::from(&vb));
        let painter = GradientPainter::new(BLUE, ColorMode::Smooth, 255);
        let img = painter.paint(&state).unwrap();
        assert_eq!(img.dimensions(), (16, 8));
        for y in 0..8 {
            for x in 0..16 {
                let escape = state.escape(x, y);
                let px = *img.get_pixel(x as u32, y as u32);
                if escape.is_interior() {
                    assert_eq!(px, Rgb([0, 0, 0]));
                } else {
                    assert_eq!(px, painter.escape_color(escape));
                }
            }
        }
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_paint_rejects_oversized_state() {
        let wide = u32::MAX as usize + 1;
        let vb = Viewport::new(c(0.0, 0.0), 1.0, wide, 0).viewbox();
        let state = EscapeState::from(&vb);
        let painter = GradientPainter::new(BLUE, ColorMode::Linear, 255);
        match painter.paint(&state) {
            Err(RenderError::TooLarge { width, height }) => assert_eq!((width, height), (wide, 0)),
            other => panic!("expected TooLarge, got {:?}", other),
        }
    }
}

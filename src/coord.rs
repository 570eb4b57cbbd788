use num::{traits::NumOps, Num, One};
use tracing::debug;

use crate::complex::*;

trait Two {
    fn two() -> Self;
}

impl<T> Two for T
where
    T: One + NumOps,
{
    fn two() -> Self {
        T::one() + T::one()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Axis<T> {
    pub min: T,
    pub max: T,
}

impl<T> Axis<T>
where
    T: Num + Copy,
{
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    pub fn length(&self) -> T {
        self.max - self.min
    }

    pub fn center(&self) -> T {
        (self.max + self.min) / T::two()
    }
}

/// A rectangle on the complex plane: `x` is the real axis, `y` the
/// imaginary one.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame<T> {
    pub x: Axis<T>,
    pub y: Axis<T>,
}

impl<T> Frame<T>
where
    T: Num + Copy,
{
    pub fn new(x: Axis<T>, y: Axis<T>) -> Self {
        Self { x, y }
    }

    pub fn from_nums(x1: T, x2: T, y1: T, y2: T) -> Self {
        Self::new(Axis::new(x1, x2), Axis::new(y1, y2))
    }

    pub fn from_box(center_x: T, center_y: T, width: T, height: T) -> Self {
        let x1 = center_x - (width / T::two());
        let x2 = center_x + (width / T::two());
        let y1 = center_y - (height / T::two());
        let y2 = center_y + (height / T::two());
        Self::from_nums(x1, x2, y1, y2)
    }

    pub fn aspect_ratio(&self) -> T {
        self.x.length() / self.y.length()
    }
}

impl Frame<f64> {
    pub fn topleft(&self) -> C<f64> {
        c(self.x.min, self.y.min)
    }

    pub fn bottomright(&self) -> C<f64> {
        c(self.x.max, self.y.max)
    }
}

/// The caller-facing description of a view: where to look, how close, and
/// at what pixel resolution. At zoom 1 the view is exactly one plane unit
/// tall whatever the resolution; the width follows the aspect ratio.
///
/// Zoom must be positive and both dimensions non-zero. Nothing here checks
/// that; see [`crate::config::RenderConfig::validate`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    pub center: C<f64>,
    pub zoom: f64,
    pub width: usize,
    pub height: usize,
}

impl Viewport {
    pub fn new(center: C<f64>, zoom: f64, width: usize, height: usize) -> Self {
        Self {
            center,
            zoom,
            width,
            height,
        }
    }

    pub fn frame(&self) -> Frame<f64> {
        let half_height = 0.5 / self.zoom;
        let half_width = half_height * (self.width as f64 / self.height as f64);
        Frame::from_box(
            self.center.re,
            self.center.im,
            half_width * 2.0,
            half_height * 2.0,
        )
    }

    pub fn viewbox(&self) -> Viewbox {
        let frame = self.frame();
        let topleft = frame.topleft();
        let bottomright = frame.bottomright();
        let inc_re = (topleft.re - bottomright.re).abs() / self.width as f64;
        let inc_im = (topleft.im - bottomright.im).abs() / self.height as f64;

        debug!(
            width = self.width,
            height = self.height,
            center = %self.center,
            zoom = self.zoom,
            span_re = frame.x.length(),
            span_im = frame.y.length(),
            topleft = %topleft,
            bottomright = %bottomright,
            inc_re,
            inc_im,
            "mapped viewport"
        );

        Viewbox {
            frame,
            topleft,
            inc_re,
            inc_im,
            width: self.width,
            height: self.height,
        }
    }
}

/// The pixel grid laid over a [`Frame`]. Pixel `(0, 0)` is the top-left
/// corner; moving right adds `inc_re`, moving down adds `inc_im`.
#[derive(Clone, Debug, PartialEq)]
pub struct Viewbox {
    pub frame: Frame<f64>,
    pub topleft: C<f64>,
    pub inc_re: f64,
    pub inc_im: f64,
    pub width: usize,
    pub height: usize,
}

pub struct ViewboxIter {
    x: usize,
    y: usize,
    width: usize,
    height: usize,
}

impl ViewboxIter {
    fn incr(&mut self) -> (usize, usize) {
        let current = (self.x, self.y);
        if self.x + 1 < self.width {
            self.x += 1;
        } else {
            self.x = 0;
            self.y += 1;
        }
        current
    }
}

impl Iterator for ViewboxIter {
    type Item = (usize, usize);
    fn next(&mut self) -> Option<(usize, usize)> {
        if self.width == 0 || self.y >= self.height {
            return None;
        }
        Some(self.incr())
    }
}

impl IntoIterator for &Viewbox {
    type Item = (usize, usize);
    type IntoIter = ViewboxIter;
    fn into_iter(self) -> ViewboxIter {
        ViewboxIter {
            x: 0,
            y: 0,
            width: self.width,
            height: self.height,
        }
    }
}

impl Viewbox {
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn point(&self, x: usize, y: usize) -> C<f64> {
        c(
            self.topleft.re + x as f64 * self.inc_re,
            self.topleft.im + y as f64 * self.inc_im,
        )
    }

    /// Plane coordinates of every pixel, row-major from the top-left.
    pub fn generate_complex_coordinates(&self) -> Vec<C<f64>> {
        self.into_iter().map(|(x, y)| self.point(x, y)).collect()
    }
}

use std::marker::PhantomData;

use crate::complex::*;
use crate::functions::Recurrence;
use crate::solver::{Escape, EscapeState, Solver, MAX_ITERATIONS, THRESHOLD};

/// How a pixel's plane coordinate seeds the recurrence.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Mode {
    /// `z` starts at `z0` (normally the origin), `c` is the pixel.
    Mandelbrot { z0: C<f64> },
    /// `z` starts at the pixel, `c` is fixed for the whole image.
    Julia { c: C<f64> },
}

impl Mode {
    pub fn mandelbrot() -> Self {
        Mode::Mandelbrot { z0: c(0.0, 0.0) }
    }

    pub fn julia(seed: C<f64>) -> Self {
        Mode::Julia { c: seed }
    }

    /// Initial `(z, c)` for the pixel at `point`.
    #[inline]
    pub fn seed(&self, point: C<f64>) -> (C<f64>, C<f64>) {
        match *self {
            Mode::Mandelbrot { z0 } => (z0, point),
            Mode::Julia { c } => (point, c),
        }
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::mandelbrot()
    }
}

/// Escape-time iteration of the recurrence `F`.
#[derive(Debug)]
pub struct EscapeSolver<F> {
    pub mode: Mode,
    pub threshold: f64,
    pub max_iterations: u32,
    function: PhantomData<F>,
}

impl<F> Clone for EscapeSolver<F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F> Copy for EscapeSolver<F> {}

impl<F> Default for EscapeSolver<F> {
    fn default() -> Self {
        Self::new(Mode::default(), THRESHOLD, MAX_ITERATIONS)
    }
}

impl<F> EscapeSolver<F> {
    pub fn new(mode: Mode, threshold: f64, max_iterations: u32) -> Self {
        Self {
            mode,
            threshold,
            max_iterations,
            function: PhantomData,
        }
    }
}

impl<F> EscapeSolver<F>
where
    F: Recurrence,
{
    /// Run `z <- F(z, c)` until `|z|^2 >= threshold` or `max_iterations`
    /// steps have been taken. The test comes before each step, so a `z`
    /// that starts outside escapes with count 0.
    #[inline]
    pub fn iterate(&self, mut z: C<f64>, c: C<f64>) -> Escape {
        for count in 0..self.max_iterations {
            let magnitude_sqr = squared_magnitude(&z);
            if magnitude_sqr >= self.threshold {
                return Escape::Escaped {
                    count,
                    magnitude_sqr,
                };
            }
            F::step(&mut z, c);
        }
        Escape::Interior
    }

    pub fn escape(&self, point: C<f64>) -> Escape {
        let (z, c) = self.mode.seed(point);
        self.iterate(z, c)
    }
}

impl<F> Solver<EscapeState> for EscapeSolver<F>
where
    F: Recurrence,
{
    fn solve(&self, mut state: EscapeState) -> EscapeState {
        for cell in state.cells_mut() {
            cell.escape = self.escape(cell.point);
        }
        state
    }
}

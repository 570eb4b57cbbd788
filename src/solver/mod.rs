use std::f64::consts::LN_2;

use crate::complex::C;
use crate::coord::Viewbox;
use crate::threads::{Join, Split, WorkerPool};

pub mod escape;

pub use escape::{EscapeSolver, Mode};

/// Iteration cap. 255 keeps a raw count representable in one channel byte.
pub const MAX_ITERATIONS: u32 = 255;
/// Squared-magnitude breakout, i.e. `|z| >= 2`.
pub const THRESHOLD: f64 = 4.0;

pub trait Solver<T> {
    fn solve(&self, state: T) -> T;

    fn threaded(self, n: usize) -> WorkerPool<T, T>
    where
        Self: Clone + Send + 'static,
        T: Split + Join + Send + 'static,
    {
        WorkerPool::with(n, || {
            let solver = self.clone();
            move |state| solver.solve(state)
        })
    }
}

/// Outcome of iterating one pixel.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Escape {
    /// Reached the iteration cap without escaping.
    Interior,
    /// `|z|^2` reached the threshold after `count` steps.
    Escaped { count: u32, magnitude_sqr: f64 },
}

impl Escape {
    pub fn is_interior(&self) -> bool {
        matches!(self, Escape::Interior)
    }

    /// Integer escape count; interior points report `cap`.
    pub fn iterations(&self, cap: u32) -> u32 {
        match *self {
            Escape::Interior => cap,
            Escape::Escaped { count, .. } => count,
        }
    }

    /// Normalized iteration count, `count + 1 - log2(log2(|z|))`, clamped
    /// into `[0, cap]`.
    ///
    /// The correction is only meaningful for `|z| > 1`; when it comes out
    /// non-finite (a threshold below 1, or `|z|^2` overflowed) the integer
    /// count is returned instead.
    pub fn smoothed(&self, cap: u32) -> f64 {
        match *self {
            Escape::Interior => cap as f64,
            Escape::Escaped {
                count,
                magnitude_sqr,
            } => {
                let nu = (magnitude_sqr.sqrt().ln() / LN_2).ln() / LN_2;
                let v = count as f64 + 1.0 - nu;
                if v.is_finite() {
                    v.clamp(0.0, cap as f64)
                } else {
                    count as f64
                }
            }
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EscapeCell {
    pub point: C<f64>,
    pub escape: Escape,
}

/// Row-major grid of pixel coordinates and their escape results. Built
/// unsolved from a [`Viewbox`] (every cell `Interior`), filled in by a
/// [`Solver`].
#[derive(Clone, Debug, PartialEq)]
pub struct EscapeState {
    width: usize,
    height: usize,
    cells: Vec<EscapeCell>,
}

impl From<&Viewbox> for EscapeState {
    fn from(v: &Viewbox) -> Self {
        let cells = v
            .generate_complex_coordinates()
            .into_iter()
            .map(|point| EscapeCell {
                point,
                escape: Escape::Interior,
            })
            .collect();
        Self {
            width: v.width,
            height: v.height,
            cells,
        }
    }
}

impl EscapeState {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn escape(&self, x: usize, y: usize) -> Escape {
        self.cells[y * self.width + x].escape
    }

    pub fn cells(&self) -> &[EscapeCell] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [EscapeCell] {
        &mut self.cells
    }
}

/// Splits into bands of whole rows, so each part is itself a valid grid.
impl Split for EscapeState {
    fn split_to_vec(self, n: usize) -> Vec<Self> {
        let Self {
            width,
            height,
            mut cells,
        } = self;
        let n = n.clamp(1, height.max(1));
        let size = height / n;
        let size_xtra = height % n;

        let mut parts = Vec::with_capacity(n);
        for i in (0..n).rev() {
            let rows = if i < size_xtra { size + 1 } else { size };
            let band = cells.split_off(cells.len() - rows * width);
            parts.push(Self {
                width,
                height: rows,
                cells: band,
            });
        }
        parts.reverse();
        parts
    }
}

impl Join for EscapeState {
    fn join_vec(parts: Vec<Self>) -> Self {
        let width = parts.first().map(|p| p.width).unwrap_or(0);
        let height = parts.iter().map(|p| p.height).sum();
        let cells: Vec<EscapeCell> =
            Vec::join_vec(parts.into_iter().map(|p| p.cells).collect::<Vec<_>>());
        Self {
            width,
            height,
            cells,
        }
    }
}

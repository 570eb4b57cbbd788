use crate::complex::*;
use crate::coord::Viewport;
use crate::error::ConfigError;
use crate::functions::FunctionKind;
use crate::painter::{ColorMode, Gradient};
use crate::ppm::DEFAULT_COMMENT;
use crate::presets::{Colormap, Resolution};
use crate::solver::{Mode, MAX_ITERATIONS, THRESHOLD};

pub const DEFAULT_RE: f64 = -0.7;
pub const DEFAULT_IM: f64 = 0.0;
pub const DEFAULT_ZOOM: f64 = 0.5;

/// Everything one render needs, already resolved to values. Rendering
/// does not validate it; call [`RenderConfig::validate`] on untrusted
/// input first.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    pub width: usize,
    pub height: usize,
    pub center: C<f64>,
    pub zoom: f64,
    pub gradient: Gradient,
    pub color_mode: ColorMode,
    pub function: FunctionKind,
    pub mode: Mode,
    pub threshold: f64,
    pub max_iterations: u32,
    /// `0` and `1` both mean the sequential loop.
    pub threads: usize,
    pub comment: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        let res = Resolution::default();
        Self {
            width: res.width,
            height: res.height,
            center: c(DEFAULT_RE, DEFAULT_IM),
            zoom: DEFAULT_ZOOM,
            gradient: Colormap::default().gradient(),
            color_mode: ColorMode::default(),
            function: FunctionKind::default(),
            mode: Mode::default(),
            threshold: THRESHOLD,
            max_iterations: MAX_ITERATIONS,
            threads: 0,
            comment: DEFAULT_COMMENT.to_string(),
        }
    }
}

impl RenderConfig {
    pub fn size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn resolution(self, res: Resolution) -> Self {
        self.size(res.width, res.height)
    }

    pub fn center(mut self, center: C<f64>) -> Self {
        self.center = center;
        self
    }

    pub fn zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn colormap(mut self, map: &Colormap) -> Self {
        self.gradient = map.gradient();
        self
    }

    /// Select a recurrence by registry name; see [`FunctionKind::lookup`].
    pub fn function_named(mut self, name: Option<&str>) -> Self {
        self.function = FunctionKind::lookup(name);
        self
    }

    pub fn julia(mut self, seed: C<f64>) -> Self {
        self.mode = Mode::julia(seed);
        self
    }

    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.center, self.zoom, self.width, self.height)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fits = |n: usize| n > 0 && u32::try_from(n).is_ok();
        if !(fits(self.width) && fits(self.height)) {
            return Err(ConfigError::Dimensions {
                width: self.width,
                height: self.height,
            });
        }
        if !(self.zoom.is_finite() && self.zoom > 0.0) {
            return Err(ConfigError::Zoom(self.zoom));
        }
        if !(self.center.re.is_finite() && self.center.im.is_finite()) {
            return Err(ConfigError::NotFinite { what: "center" });
        }
        let seed = match self.mode {
            Mode::Mandelbrot { z0 } => z0,
            Mode::Julia { c } => c,
        };
        if !(seed.re.is_finite() && seed.im.is_finite()) {
            return Err(ConfigError::NotFinite { what: "seed" });
        }
        if !(self.threshold.is_finite() && self.threshold > 0.0) {
            return Err(ConfigError::Threshold(self.threshold));
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::Iterations);
        }
        Ok(())
    }
}

#![allow(clippy::new_without_default)]
//! Escape-time fractal rendering (Mandelbrot and Julia sets) to binary PPM.
//!
//! The pipeline is: [`RenderConfig`] → [`coord::Viewbox`] → solved
//! [`solver::EscapeState`] → painted [`image::RgbImage`] → [`ppm::PpmWriter`].
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use image::RgbImage;
use tracing::{debug, info};

use crate::functions::{FunctionKind, Recurrence, ZCubed, ZSquared};
use crate::painter::{GradientPainter, Painter};
use crate::ppm::PpmWriter;
use crate::solver::{EscapeSolver, EscapeState, Solver};
use crate::threads::Call;

pub mod complex;
pub mod config;
pub mod coord;
pub mod error;
pub mod functions;
pub mod painter;
pub mod ppm;
pub mod presets;
pub mod solver;
pub mod threads;

pub use config::RenderConfig;
pub use error::{ConfigError, RenderError};

/// Iterate every pixel of the configured view.
#[tracing::instrument(skip_all, fields(width = config.width, height = config.height, function = %config.function))]
pub fn solve(config: &RenderConfig) -> Result<EscapeState, RenderError> {
    let initial = EscapeState::from(&config.viewport().viewbox());
    match config.function {
        FunctionKind::ZSquared => solve_with::<ZSquared>(config, initial),
        FunctionKind::ZCubed => solve_with::<ZCubed>(config, initial),
    }
}

fn solve_with<F>(config: &RenderConfig, state: EscapeState) -> Result<EscapeState, RenderError>
where
    F: Recurrence,
{
    let solver = EscapeSolver::<F>::new(config.mode, config.threshold, config.max_iterations);
    if config.threads > 1 {
        debug!(threads = config.threads, "solving on worker pool");
        Ok(solver.threaded(config.threads).call(state)?)
    } else {
        debug!("solving sequentially");
        Ok(solver.solve(state))
    }
}

pub fn render_image(config: &RenderConfig) -> Result<RgbImage, RenderError> {
    let state = solve(config)?;
    let painter = GradientPainter::new(config.gradient, config.color_mode, config.max_iterations);
    painter.paint(&state)
}

/// Render and stream the PPM into `out`, returning it flushed.
pub fn render_to_writer<W: Write>(config: &RenderConfig, out: W) -> Result<W, RenderError> {
    let mut writer = PpmWriter::new(out, config.width, config.height, &config.comment)?;
    let img = render_image(config)?;
    writer.write_image(&img)?;
    writer.finish()
}

/// Render to a file at `path`, replacing it. The file is closed before this
/// returns, on success and on error alike.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn render_to_file<P: AsRef<Path>>(config: &RenderConfig, path: P) -> Result<(), RenderError> {
    let path = path.as_ref();
    let start = Instant::now();
    let file = File::create(path).map_err(|source| RenderError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    render_to_writer(config, BufWriter::new(file))?;
    info!(
        width = config.width,
        height = config.height,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "wrote image"
    );
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::complex::c;
    use crate::threads::JoinError;

    fn small() -> RenderConfig {
        RenderConfig::default().size(100, 100)
    }

    #[test]
    fn test_render_is_deterministic() {
        let a = render_to_writer(&small(), Vec::new()).unwrap();
        let b = render_to_writer(&small(), Vec::new()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), b"P6\n#fractox escape-time render\n100 100\n255\n".len() + 30000);
    }

    #[test]
    fn test_thread_count_does_not_change_output() {
        let single = render_to_writer(&small(), Vec::new()).unwrap();
        for threads in [2, 3, 8] {
            let multi = render_to_writer(&small().threads(threads), Vec::new()).unwrap();
            assert_eq!(single, multi, "threads = {}", threads);
        }
    }

    #[test]
    fn test_four_by_two() {
        let cfg = RenderConfig::default()
            .size(4, 2)
            .center(c(-0.5, 0.0))
            .zoom(1.0);
        let out = render_to_writer(&cfg, Vec::new()).unwrap();
        let header = b"P6\n#fractox escape-time render\n4 2\n255\n";
        assert_eq!(&out[..header.len()], &header[..]);
        assert_eq!(out.len() - header.len(), 24);
        // last pixel sits on the origin, which never escapes
        assert_eq!(&out[out.len() - 3..], &[0, 0, 0]);
    }

    #[test]
    fn test_cubic_and_julia_differ() {
        let base = RenderConfig::default().size(32, 24);
        let square = render_image(&base).unwrap();
        let cubic = render_image(&base.clone().function_named(Some("z^3+c"))).unwrap();
        let julia = render_image(&base.julia(c(-0.8, 0.156))).unwrap();
        assert_ne!(square, cubic);
        assert_ne!(square, julia);
    }

    #[test]
    fn test_lost_worker_is_a_render_error() {
        let err = RenderError::from(JoinError::WorkerLost);
        assert!(matches!(err, RenderError::Worker(JoinError::WorkerLost)));
        assert_eq!(
            err.to_string(),
            "render worker failed: worker panicked or exited before returning its part"
        );
    }
}

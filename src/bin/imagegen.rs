use std::path::PathBuf;
use std::process;

use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

use fractox::complex::{c, C};
use fractox::functions::FunctionKind;
use fractox::painter::ColorMode;
use fractox::presets::{Colormap, Resolution, COLORMAPS, RESOLUTIONS};
use fractox::solver::Mode;
use fractox::{ConfigError, RenderConfig};

/// Parse `"re,im"` into a complex number.
fn parse_complex(s: &str) -> Result<C<f64>, String> {
    let (re, im) = s
        .split_once(',')
        .ok_or_else(|| format!("expected RE,IM, got '{}'", s))?;
    let re: f64 = re.trim().parse().map_err(|e| format!("bad real part: {}", e))?;
    let im: f64 = im.trim().parse().map_err(|e| format!("bad imaginary part: {}", e))?;
    Ok(c(re, im))
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "fractox-imagegen",
    about = "Render escape-time fractals (Mandelbrot and Julia sets) to binary PPM"
)]
struct Opt {
    /// Named output resolution (see --list)
    #[structopt(short, long, default_value = "480p")]
    size: String,

    /// Explicit width, overrides --size
    #[structopt(long)]
    width: Option<usize>,

    /// Explicit height, overrides --size
    #[structopt(long)]
    height: Option<usize>,

    /// Real part of the view center
    #[structopt(short = "x", long, default_value = "-0.7", allow_hyphen_values = true)]
    real: f64,

    /// Imaginary part of the view center
    #[structopt(short = "y", long, default_value = "0.0", allow_hyphen_values = true)]
    imag: f64,

    /// Magnification; 1.0 shows one plane unit vertically
    #[structopt(short, long, default_value = "0.5")]
    zoom: f64,

    /// Colormap name (see --list)
    #[structopt(short, long, default_value = "b&w")]
    colors: String,

    /// Iteration function (see --list)
    #[structopt(short, long)]
    function: Option<String>,

    /// Render a Julia set with this constant, as RE,IM
    #[structopt(long, allow_hyphen_values = true, parse(try_from_str = parse_complex))]
    julia: Option<C<f64>>,

    /// Starting z for Mandelbrot renders, as RE,IM
    #[structopt(long = "seed-z", allow_hyphen_values = true, parse(try_from_str = parse_complex))]
    seed_z: Option<C<f64>>,

    /// Squared-magnitude escape threshold
    #[structopt(long, default_value = "4.0")]
    threshold: f64,

    /// Iteration cap
    #[structopt(short, long, default_value = "255")]
    iterations: u32,

    /// Color by integer escape count instead of the smoothed count
    #[structopt(long)]
    linear: bool,

    /// Worker threads [default: physical cores]
    #[structopt(short, long)]
    threads: Option<usize>,

    /// Output file [default: ./mandelbrot.ppm or ./julia.ppm]
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,

    /// List resolutions, colormaps and functions, then exit
    #[structopt(long)]
    list: bool,

    /// Debug logging (RUST_LOG takes precedence)
    #[structopt(short, long)]
    verbose: bool,
}

impl Opt {
    fn config(&self) -> Result<RenderConfig, ConfigError> {
        let res = Resolution::find(&self.size)?;
        let colormap = Colormap::find(&self.colors)?;
        let function = match &self.function {
            Some(name) => {
                FunctionKind::find(name).ok_or_else(|| ConfigError::UnknownFunction(name.clone()))?
            }
            None => FunctionKind::default(),
        };
        let mode = match (self.julia, self.seed_z) {
            (Some(seed), _) => Mode::julia(seed),
            (None, Some(z0)) => Mode::Mandelbrot { z0 },
            (None, None) => Mode::mandelbrot(),
        };

        let config = RenderConfig {
            width: self.width.unwrap_or(res.width),
            height: self.height.unwrap_or(res.height),
            center: c(self.real, self.imag),
            zoom: self.zoom,
            gradient: colormap.gradient(),
            color_mode: if self.linear {
                ColorMode::Linear
            } else {
                ColorMode::Smooth
            },
            function,
            mode,
            threshold: self.threshold,
            max_iterations: self.iterations,
            threads: self.threads.unwrap_or_else(num_cpus::get_physical),
            ..RenderConfig::default()
        };
        config.validate()?;
        Ok(config)
    }

    fn output(&self) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None if self.julia.is_some() => PathBuf::from("./julia.ppm"),
            None => PathBuf::from("./mandelbrot.ppm"),
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn print_presets() {
    println!("Resolutions:");
    for r in RESOLUTIONS {
        println!("  {: <10} {}x{}", r.name, r.width, r.height);
    }
    println!("\nColormaps:");
    for m in COLORMAPS {
        println!("  {: <10} {:?} -> {:?}", m.name, m.left, m.right);
    }
    println!("\nFunctions:");
    for name in FunctionKind::names() {
        println!("  {}", name);
    }
}

fn main() {
    let opt = Opt::from_args();
    init_logging(opt.verbose);

    if opt.list {
        print_presets();
        return;
    }

    let config = match opt.config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = fractox::render_to_file(&config, opt.output()) {
        eprintln!("Render failure: {}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_complex() {
        assert_eq!(parse_complex("-0.8,0.156"), Ok(c(-0.8, 0.156)));
        assert_eq!(parse_complex(" 1 , -2 "), Ok(c(1.0, -2.0)));
        assert!(parse_complex("1;2").is_err());
        assert!(parse_complex("a,2").is_err());
    }

    #[test]
    fn test_defaults_resolve() {
        let opt = Opt::from_iter(["fractox-imagegen", "--threads", "1"]);
        let config = opt.config().unwrap();
        assert_eq!((config.width, config.height), (640, 480));
        assert_eq!(config.center, c(-0.7, 0.0));
        assert_eq!(config.threads, 1);
        assert_eq!(opt.output(), PathBuf::from("./mandelbrot.ppm"));
    }

    #[test]
    fn test_julia_flags() {
        let opt = Opt::from_iter([
            "fractox-imagegen",
            "-s",
            "twitter",
            "-x",
            "-0.25",
            "--julia",
            "-0.8,0.156",
            "-f",
            "z^3+c",
            "-c",
            "blue",
            "--linear",
        ]);
        let config = opt.config().unwrap();
        assert_eq!((config.width, config.height), (1024, 576));
        assert_eq!(config.center.re, -0.25);
        assert_eq!(config.mode, Mode::julia(c(-0.8, 0.156)));
        assert_eq!(config.function, FunctionKind::ZCubed);
        assert_eq!(config.color_mode, ColorMode::Linear);
        assert_eq!(opt.output(), PathBuf::from("./julia.ppm"));
    }

    #[test]
    fn test_rejects_unknowns_and_bad_zoom() {
        let bad = |args: &[&str]| {
            let mut argv = vec!["fractox-imagegen"];
            argv.extend_from_slice(args);
            Opt::from_iter(argv).config().unwrap_err()
        };
        assert_eq!(bad(&["-s", "3k"]), ConfigError::UnknownResolution("3k".into()));
        assert_eq!(bad(&["-c", "green"]), ConfigError::UnknownColormap("green".into()));
        assert_eq!(bad(&["-f", "sin"]), ConfigError::UnknownFunction("sin".into()));
        assert_eq!(bad(&["-z", "0"]), ConfigError::Zoom(0.0));
    }
}

use std::path::PathBuf;

use clap::Parser;
use log::info;
use panoview::convert;
use panoview::{Error, Interpolation, Real, ViewConfig};

/// Render a pinhole view out of an equirectangular panorama.
#[derive(Debug, Parser)]
#[command(author, version, about, allow_negative_numbers = true)]
struct Args {
    /// Equirectangular panorama (any format `image` can decode).
    input: PathBuf,

    /// Where to write the rendered view.
    #[arg(short, long, default_value = "view.png")]
    output: PathBuf,

    /// JSON view config; command-line values override it.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    width: Option<usize>,

    #[arg(long)]
    height: Option<usize>,

    /// Horizontal field of view in degrees, in (0, 180).
    #[arg(long)]
    hfov: Option<Real>,

    /// Degrees to the right of the panorama centre.
    #[arg(long)]
    pan: Option<Real>,

    /// Degrees above the horizon.
    #[arg(long)]
    tilt: Option<Real>,

    /// Degrees of clockwise rotation around the optical axis.
    #[arg(long)]
    spin: Option<Real>,

    /// Nearest-neighbour instead of bilinear sampling.
    #[arg(long)]
    nearest: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn view_config(&self) -> Result<ViewConfig, Error> {
        let mut cfg = match &self.config {
            Some(path) => ViewConfig::load_json(path)?,
            None => ViewConfig::default(),
        };
        if let Some(w) = self.width {
            cfg.width = w;
        }
        if let Some(h) = self.height {
            cfg.height = h;
        }
        if let Some(hfov) = self.hfov {
            cfg.hfov_deg = hfov;
        }
        if self.width.is_some() || self.height.is_some() || self.hfov.is_some() {
            cfg.intrinsic = None;
        }
        if let Some(pan) = self.pan {
            cfg.pan_deg = pan;
        }
        if let Some(tilt) = self.tilt {
            cfg.tilt_deg = tilt;
        }
        if let Some(spin) = self.spin {
            cfg.spin_deg = spin;
        }
        if self.nearest {
            cfg.remap.interpolation = Interpolation::Nearest;
        }
        Ok(cfg)
    }
}

#[cfg(not(feature = "tracing"))]
fn init_logging(verbosity: u8) {
    let _ = panoview::core::init_with_verbosity(verbosity);
}

#[cfg(feature = "tracing")]
fn init_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let default_level = panoview::core::level_from_verbosity(verbosity).to_string();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.to_lowercase()));
    let _ = tracing_log::LogTracer::init();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn main() -> std::process::ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);
    match try_main(&args) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::ExitCode::FAILURE
        }
    }
}

fn try_main(args: &Args) -> Result<(), Error> {
    let cfg = args.view_config()?;
    let mut session = cfg.build_session()?;

    let pano = image::open(&args.input)?;
    let source = convert::buffer_from_dynamic(&pano);
    info!(
        "loaded {} ({}x{}, {} channel(s))",
        args.input.display(),
        source.width,
        source.height,
        source.channels
    );
    session.set_source(&source.view())?;

    let view = session.render()?;
    convert::to_dynamic_image(view)?.save(&args.output)?;
    info!(
        "wrote {} ({}x{})",
        args.output.display(),
        view.width,
        view.height
    );
    Ok(())
}

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use image::{ImageBuffer, Luma};

use spinemap::backbone_format::{load_backbone, write_backbone_tsv};
use spinemap::frame::Frame;
use spinemap::model_points::load_model_points;
use spinemap::pose::PoseInfo;
use spinemap::restack::RestackedFrame;
use spinemap::spine::Spine;

/// Command line arguments structure.
#[derive(Parser, Debug)]
#[command(author, version, about = "CLI for backbone-based straightening and neuron placement.")]
struct Args {
    /// Log debug details of every pipeline stage
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Straighten a frame along its backbone and write the result as a 16-bit PNG.
    Straighten {
        /// Source frame (any format the `image` crate can read)
        frame: PathBuf,

        /// Backbone file (.tsv or .json)
        backbone: PathBuf,

        /// Output image filename
        output: PathBuf,
    },

    /// Place model points (neurons) on the backbone and print them as
    /// `name row col radius` rows.
    Interpose {
        /// Backbone file (.tsv or .json)
        backbone: PathBuf,

        /// Neuron JSON file with straightened-model positions
        neurons: PathBuf,

        /// Pose as ZOOM[,SHIFT[,ANGLE]]; a negative zoom reverses the body direction
        #[arg(long, allow_hyphen_values = true, default_value = "1")]
        pose: PoseInfo,

        /// Optionally report how many placed points fall inside this frame
        #[arg(long)]
        frame: Option<PathBuf>,
    },

    /// Print a backbone file reversed, as TSV.
    Reverse {
        /// Backbone file (.tsv or .json)
        backbone: PathBuf,
    },
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if let Err(err) = run(args.command) {
        log::error!("{:#}", err);
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Straighten {
            frame,
            backbone,
            output,
        } => straighten(&frame, &backbone, &output),
        Command::Interpose {
            backbone,
            neurons,
            pose,
            frame,
        } => interpose(&backbone, &neurons, &pose, frame.as_deref()),
        Command::Reverse { backbone } => reverse(&backbone),
    }
}

fn load_spine(backbone: &Path) -> Result<Spine> {
    let bb = load_backbone(backbone)
        .with_context(|| format!("Could not load backbone {}", backbone.display()))?;
    Spine::from_backbone(&bb)
        .with_context(|| format!("Could not trace backbone {}", backbone.display()))
}

fn straighten(frame: &Path, backbone: &Path, output: &Path) -> Result<()> {
    let frame = read_frame(frame)?;
    let spine = load_spine(backbone)?;

    let restacked = spine.straighten(&frame);
    if restacked.height == 0 {
        bail!("backbone has no positive edge distance, nothing to straighten");
    }
    save_restacked(&restacked, output)
}

fn interpose(
    backbone: &Path,
    neurons: &Path,
    pose: &PoseInfo,
    frame: Option<&Path>,
) -> Result<()> {
    let spine = load_spine(backbone)?;
    let points = load_model_points(neurons)
        .with_context(|| format!("Could not load neurons {}", neurons.display()))?;

    let placed = spine.place(&points, pose);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for p in &placed {
        writeln!(out, "{}\t{:.3}\t{:.3}\t{:.3}", p.name, p.row(), p.col(), p.radius)?;
    }

    if let Some(frame) = frame {
        let frame = read_frame(frame)?;
        let inside = placed
            .iter()
            .filter(|p| {
                p.row() >= 0.0
                    && p.col() >= 0.0
                    && p.row() < frame.height as f64
                    && p.col() < frame.width as f64
            })
            .count();
        log::info!("{} of {} placed points lie inside the frame", inside, placed.len());
    }
    Ok(())
}

fn reverse(backbone: &Path) -> Result<()> {
    let bb = load_backbone(backbone)
        .with_context(|| format!("Could not load backbone {}", backbone.display()))?;
    let stdout = io::stdout();
    write_backbone_tsv(stdout.lock(), &bb.reversed())?;
    Ok(())
}

/// Reads an image file as 16-bit luminance.
pub fn read_frame(filename: &Path) -> Result<Frame> {
    log::info!("Reading image file: {}", filename.display());
    let img = image::open(filename)
        .with_context(|| format!("Could not load image {}", filename.display()))?
        .to_luma16();
    let (width, height) = img.dimensions();
    let data = img.into_raw().into_iter().map(f32::from).collect();
    Ok(Frame::new(data, width as usize, height as usize)?)
}

/// Writes the straightened frame as a 16-bit grayscale image, clamping
/// intensities into the `u16` range.
pub fn save_restacked(restacked: &RestackedFrame, filename: &Path) -> Result<()> {
    log::info!("Writing image {}", filename.display());
    let pixels: Vec<u16> = restacked
        .data
        .iter()
        .map(|&v| v.clamp(0, u16::MAX as i32) as u16)
        .collect();
    let img: ImageBuffer<Luma<u16>, Vec<u16>> =
        ImageBuffer::from_raw(restacked.width as u32, restacked.height as u32, pixels)
            .context("Restacked buffer does not match its dimensions")?;
    img.save(filename)
        .with_context(|| format!("Could not write image {}", filename.display()))?;
    Ok(())
}

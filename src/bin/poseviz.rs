use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(name = "poseviz", version)]
struct Cli {
    /// Log per-frame progress (overridden by RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Overlay keypoint skeletons onto a video (requires `ffmpeg` and `ffprobe` on PATH).
    Render(RenderArgs),
    /// Count detections per keypoint record and write them as TSV.
    Stats(StatsArgs),
    /// Compare two statistics files produced by `stats`.
    Compare(CompareArgs),
    /// Stitch the segments left in a directory into one MP4.
    Stitch(StitchArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    /// 18-joint COCO body layout.
    Coco18,
    /// 25-joint BODY_25 body layout.
    Body25,
}

impl From<FormatArg> for poseviz::SkeletonFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Coco18 => Self::Coco18,
            FormatArg::Body25 => Self::Body25,
        }
    }
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Source video.
    video: PathBuf,
    /// Keypoint directory or zip archive.
    keypoints: PathBuf,
    /// Output MP4 path.
    output: PathBuf,

    /// Also save every rendered frame as a PNG in this directory.
    #[arg(long)]
    images: Option<PathBuf>,

    /// Body layout of the keypoint records.
    #[arg(long, value_enum, default_value = "coco18")]
    format: FormatArg,

    /// Directory that holds each run's segment subdirectory.
    #[arg(long)]
    temp: Option<PathBuf>,

    /// Frames per segment; 0 writes a single segment.
    #[arg(long, default_value_t = 100)]
    max_frames_per_chunk: usize,

    /// Draw skeletons on black instead of the video picture.
    #[arg(long, default_value_t = false)]
    no_background: bool,

    /// First frame to render.
    #[arg(long, default_value_t = 0)]
    start: u64,

    /// Frame to stop before.
    #[arg(long)]
    stop: Option<u64>,

    /// Render every N-th frame.
    #[arg(long, default_value_t = 1)]
    step: u64,

    /// Keep segment files after stitching.
    #[arg(long, default_value_t = false)]
    keep_segments: bool,

    /// Render frames whose keypoint record cannot be parsed without skeletons instead of
    /// stopping.
    #[arg(long, default_value_t = false)]
    skip_bad_keypoints: bool,
}

#[derive(Parser, Debug)]
struct StatsArgs {
    /// Keypoint directory or zip archive.
    keypoints: PathBuf,
    /// Output TSV path (default: next to the input, with a `.tsv` extension).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct CompareArgs {
    /// Baseline statistics file.
    small: PathBuf,
    /// Statistics file to compare against the baseline.
    large: PathBuf,
}

#[derive(Parser, Debug)]
struct StitchArgs {
    /// Directory holding the segment files.
    segments: PathBuf,
    /// Output MP4 path.
    output: PathBuf,
    /// Keep segment files after stitching.
    #[arg(long, default_value_t = false)]
    keep_segments: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Stats(args) => cmd_stats(args),
        Command::Compare(args) => cmd_compare(args),
        Command::Stitch(args) => cmd_stitch(args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "poseviz=debug"
    } else {
        "poseviz=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // Ignore an already-installed subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let opts = poseviz::OverlayOpts {
        format: args.format.into(),
        max_frames_per_chunk: (args.max_frames_per_chunk > 0).then_some(args.max_frames_per_chunk),
        no_background: args.no_background,
        temp_dir: args.temp,
        images_dir: args.images,
        selection: poseviz::FrameSelection {
            start: args.start,
            stop: args.stop,
            step: args.step,
        },
        keypoint_policy: if args.skip_bad_keypoints {
            poseviz::KeypointErrorPolicy::RenderBare
        } else {
            poseviz::KeypointErrorPolicy::Abort
        },
        cleanup: !args.keep_segments,
        overwrite: true,
    };

    let report = poseviz::render_overlay(&args.video, &args.keypoints, &args.output, &opts)?;
    match &report.output {
        Some(out) => eprintln!(
            "wrote {} ({} frames, {} segments{})",
            out.display(),
            report.frames_written,
            report.segments.len(),
            if report.stopped_early {
                ", video ended early"
            } else {
                ""
            }
        ),
        None => eprintln!("no frames rendered"),
    }
    Ok(())
}

fn cmd_stats(args: StatsArgs) -> anyhow::Result<()> {
    let mut source = poseviz::KeypointSource::open(&args.keypoints)?;
    let rows = poseviz::collect_counts(&mut source)?;
    let out = args
        .out
        .unwrap_or_else(|| args.keypoints.with_extension("tsv"));
    poseviz::stats::summary::write_tsv(&out, &rows)
        .with_context(|| format!("write statistics '{}'", out.display()))?;
    eprintln!("wrote {} ({} records)", out.display(), rows.len());
    Ok(())
}

fn cmd_compare(args: CompareArgs) -> anyhow::Result<()> {
    let small = poseviz::stats::summary::read_tsv(&args.small)?;
    let large = poseviz::stats::summary::read_tsv(&args.large)?;
    print!("{}", poseviz::compare(&small, &large));
    Ok(())
}

fn cmd_stitch(args: StitchArgs) -> anyhow::Result<()> {
    poseviz::validate_output_path(&args.output)?;
    let report = poseviz::stitch_segments(
        &args.segments,
        &args.output,
        !args.keep_segments,
        &mut poseviz::FfmpegConcat,
    )?;
    match report.output {
        Some(out) => eprintln!(
            "wrote {} from {} segments",
            out.display(),
            report.segments.len()
        ),
        None => eprintln!("no segments found in {}", args.segments.display()),
    }
    Ok(())
}

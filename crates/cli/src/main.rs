use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use facetracker_core::detection::domain::detection_source::DetectionSource;
use facetracker_core::detection::infrastructure::json_lines_detection_source::JsonLinesDetectionSource;
use facetracker_core::detection::infrastructure::throttled_detection_source::ThrottledDetectionSource;
use facetracker_core::overlay::domain::overlay_reconciler::OverlayReconciler;
use facetracker_core::overlay::infrastructure::json_lines_surface::JsonLinesSurface;
use facetracker_core::pipeline::infrastructure::sequential_overlay_executor::SequentialOverlayExecutor;
use facetracker_core::pipeline::infrastructure::threaded_overlay_executor::ThreadedOverlayExecutor;
use facetracker_core::pipeline::overlay_executor::{ExecutorConfig, OverlayExecutor};
use facetracker_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use facetracker_core::pipeline::track_faces_use_case::TrackFacesUseCase;
use facetracker_core::shared::overlay_config::OverlayConfig;

/// Replays recorded face detections through the overlay reconciler and
/// prints the resulting drawing commands.
#[derive(Parser)]
#[command(name = "facetracker")]
struct Cli {
    /// Detection frames as JSON Lines ("-" reads stdin).
    input: PathBuf,

    /// Write drawing commands here instead of stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// JSON overlay config; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Display width in points.
    #[arg(long)]
    view_width: Option<f64>,

    /// Drop frames closer together than this many seconds.
    #[arg(long)]
    min_interval: Option<f64>,

    /// Marker move animation length in seconds.
    #[arg(long)]
    move_duration: Option<f64>,

    /// Run detection on a worker thread, reconcile on the main thread.
    #[arg(long)]
    threaded: bool,

    /// Leave markers on screen when the stream ends.
    #[arg(long)]
    keep_markers: bool,

    /// Log progress every N frames.
    #[arg(long, default_value = "30")]
    log_every: usize,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = build_config(&cli)?;
    log::debug!("Overlay config: {config:?}");

    let source = open_source(&cli.input, config.min_frame_interval)?;
    let executor: Box<dyn OverlayExecutor> = if cli.threaded {
        Box::new(ThreadedOverlayExecutor::new())
    } else {
        Box::new(SequentialOverlayExecutor::new())
    };

    let mut use_case = TrackFacesUseCase::new(
        source,
        OverlayReconciler::from_config(&config),
        executor,
        Box::new(StdoutPipelineLogger::new(cli.log_every)),
        ExecutorConfig::new(config.view_width),
    )
    .clear_on_finish(!cli.keep_markers);

    let mut surface = JsonLinesSurface::new(open_output(cli.output.as_deref())?);
    let summary = use_case.execute(&mut surface)?;
    let written = surface.finish()?;

    if let Some(output) = &cli.output {
        log::info!(
            "Wrote {} drawing commands for {} frames to {}",
            written,
            summary.frames_seen(),
            output.display()
        );
    }
    Ok(())
}

fn build_config(cli: &Cli) -> Result<OverlayConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => OverlayConfig::load(path)?,
        None => OverlayConfig::default(),
    };
    if let Some(w) = cli.view_width {
        config.view_width = w;
    }
    if let Some(interval) = cli.min_interval {
        config.min_frame_interval = interval;
    }
    if let Some(duration) = cli.move_duration {
        config.move_duration = duration;
    }
    config.validate()?;
    Ok(config)
}

fn open_source(
    input: &Path,
    min_interval: f64,
) -> Result<Box<dyn DetectionSource>, Box<dyn std::error::Error>> {
    let base: Box<dyn DetectionSource> = if input == Path::new("-") {
        Box::new(JsonLinesDetectionSource::new(Box::new(BufReader::new(
            io::stdin(),
        ))))
    } else {
        if !input.exists() {
            return Err(format!("Input file not found: {}", input.display()).into());
        }
        Box::new(JsonLinesDetectionSource::open(input)?)
    };

    if min_interval > 0.0 {
        Ok(Box::new(ThrottledDetectionSource::new(base, min_interval)?))
    } else {
        Ok(base)
    }
}

fn open_output(output: Option<&Path>) -> Result<Box<dyn Write>, Box<dyn std::error::Error>> {
    match output {
        Some(path) => Ok(Box::new(BufWriter::new(File::create(path)?))),
        None => Ok(Box::new(io::stdout().lock())),
    }
}

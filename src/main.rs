//! Command line front end for the grayscale lab operations.
//!
//! ```text
//! imageops-lab edges photo.jpg scan.png --output-dir out/
//! imageops-lab generate --reference lena128.bmp --output-dir Tests_for_lab_6 --seed 7
//! imageops-lab benchmark --dir Tests_for_lab_6 --format json
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use imageops_lab::{
    load_batch, render_table, run_benchmark, standard_catalog, to_json, Error, FsCodec,
    ImageCodec, NoiseBatch, RobertsCross, REFERENCE_LABEL,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "imageops-lab",
    about = "Roberts Cross edges, synthetic noise and filter MSE benchmarks for grayscale images",
    long_about = None
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Detect edges with the Roberts Cross operator
    Edges {
        /// Images to process; each is converted to grayscale first
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Directory receiving `<stem>_roberts.png` files
        #[arg(short, long)]
        output_dir: PathBuf,
    },

    /// Write the reference and the eight noisy test images as 0.bmp .. 8.bmp
    Generate {
        /// 128x128 reference image
        #[arg(short, long)]
        reference: PathBuf,

        #[arg(short, long)]
        output_dir: PathBuf,

        /// Random seed; a fresh seed is drawn and logged when omitted
        #[arg(long, env = "IMAGEOPS_LAB_SEED")]
        seed: Option<u64>,
    },

    /// Score every catalog filter against 0.bmp for each of 0.bmp .. 8.bmp
    Benchmark {
        /// Directory holding the generated test images
        #[arg(short, long)]
        dir: PathBuf,

        #[arg(long, value_enum, default_value_t = ReportFormat::Table)]
        format: ReportFormat,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Table,
    Json,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let result = match args.command {
        Command::Edges { inputs, output_dir } => detect_edges(&FsCodec, &inputs, &output_dir),
        Command::Generate {
            reference,
            output_dir,
            seed,
        } => generate(&FsCodec, &reference, &output_dir, seed),
        Command::Benchmark { dir, format } => benchmark(&FsCodec, &dir, format),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            ExitCode::FAILURE
        }
    }
}

fn ensure_dir(dir: &Path) -> Result<(), Error> {
    std::fs::create_dir_all(dir)
        .map_err(|e| Error::Codec(format!("cannot create {}: {}", dir.display(), e)))
}

/// Processes every input independently; a failing file is logged and skipped.
fn detect_edges(codec: &impl ImageCodec, inputs: &[PathBuf], output_dir: &Path) -> Result<(), Error> {
    ensure_dir(output_dir)?;

    let mut failures = 0usize;
    for input in inputs {
        let outcome = codec
            .load_gray(input)
            .and_then(|gray| gray.roberts_cross())
            .and_then(|edges| {
                let stem = input
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "image".to_string());
                let target = output_dir.join(format!("{}_roberts.png", stem));
                codec.save_gray(&edges, &target).map(|()| target)
            });

        match outcome {
            Ok(target) => tracing::info!(input = %input.display(), output = %target.display(), "edge detection completed"),
            Err(err) => {
                failures += 1;
                tracing::error!(input = %input.display(), error = %err, "edge detection failed");
            }
        }
    }

    if failures == inputs.len() {
        return Err(Error::InvalidInput(format!(
            "none of the {} input images could be processed",
            inputs.len()
        )));
    }
    Ok(())
}

fn generate(
    codec: &impl ImageCodec,
    reference: &Path,
    output_dir: &Path,
    seed: Option<u64>,
) -> Result<(), Error> {
    let seed = seed.unwrap_or_else(rand::random);
    let reference = codec.load_gray(reference)?;
    ensure_dir(output_dir)?;

    let batch = NoiseBatch::standard();
    let samples = batch.generate(&reference, seed)?;

    for sample in &samples {
        let path = output_dir.join(format!("{}.bmp", sample.label));
        codec.save_gray(&sample.image, &path)?;
        let description = batch
            .entries()
            .iter()
            .find(|entry| entry.label == sample.label)
            .map_or_else(|| "Reference".to_string(), |entry| entry.describe());
        tracing::info!(path = %path.display(), %description, "saved");
    }

    tracing::info!(count = samples.len(), seed, dir = %output_dir.display(), "generated test images");
    Ok(())
}

fn benchmark(codec: &impl ImageCodec, dir: &Path, format: ReportFormat) -> Result<(), Error> {
    let reference_path = dir.join(format!("{}.bmp", REFERENCE_LABEL));
    let reference = codec.load_gray(&reference_path)?;

    let labels: Vec<String> = std::iter::once(REFERENCE_LABEL.to_string())
        .chain(NoiseBatch::standard().entries().iter().map(|e| e.label.clone()))
        .collect();
    let samples = load_batch(codec, dir, &labels);

    let report = run_benchmark(&reference, &samples, &standard_catalog())?;
    match format {
        ReportFormat::Table => print!("{}", render_table(&report)),
        ReportFormat::Json => println!("{}", to_json(&report)?),
    }
    Ok(())
}

use clap::{Parser, Subcommand};
use qr_reader::tools::{binarize, binary_stats, grayscale_stats, load_gray, payload_text};
use qr_reader::{DecodeResult, Decoder, DecoderConfig};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "qrtool", version, about = "QR code reader CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode every QR code in an image
    Decode {
        #[arg(long)]
        image: PathBuf,
    },
    /// Print image stats and finder-pattern candidates without decoding
    Locate {
        #[arg(long)]
        image: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let decoder = Decoder::new(DecoderConfig::from_env());

    match cli.command {
        Command::Decode { image } => decode_cmd(&decoder, &image),
        Command::Locate { image } => locate_cmd(&decoder, &image),
    }
}

fn decode_cmd(decoder: &Decoder, path: &Path) -> ExitCode {
    let image = match load_gray(path) {
        Ok(image) => image,
        Err(err) => {
            eprintln!("{}: {}", path.display(), err);
            return ExitCode::FAILURE;
        }
    };

    let start = Instant::now();
    let results = decoder.decode(&image);
    let elapsed = start.elapsed();

    println!(
        "Image: {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    println!(
        "Found {} candidates in {:.2} ms",
        results.len(),
        elapsed.as_secs_f64() * 1000.0
    );
    for (i, result) in results.iter().enumerate() {
        print_result(i, result);
    }
    ExitCode::SUCCESS
}

fn print_result(index: usize, result: &DecodeResult) {
    match result {
        Ok(symbol) => {
            println!(
                "  QR {}: version={}, error_correction={:?}, mask={:?}, mirrored={}",
                index,
                symbol.version.number(),
                symbol.ec_level,
                symbol.mask,
                symbol.mirrored
            );
            if let Some(eci) = symbol.eci {
                println!("    eci={}", eci);
            }
            if let Some(sa) = symbol.structured_append {
                println!("    structured_append={}/{}", sa.index + 1, sa.total);
            }
            println!("    content={}", payload_text(&symbol.payload));
        }
        Err(err) => println!("  QR {}: failed: {}", index, err),
    }
}

fn locate_cmd(decoder: &Decoder, path: &Path) -> ExitCode {
    let image = match load_gray(path) {
        Ok(image) => image,
        Err(err) => {
            eprintln!("{}: {}", path.display(), err);
            return ExitCode::FAILURE;
        }
    };

    let gray = grayscale_stats(&image);
    let binary = binary_stats(&binarize(&image, decoder.config()));
    println!(
        "Image: {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    println!("Gray: min={} max={} avg={}", gray.min, gray.max, gray.avg);
    println!(
        "Binary: black={} / {} ({:.3})",
        binary.black_pixels, binary.total_pixels, binary.black_ratio
    );

    let candidates = decoder.locate(&image);
    println!("Found {} candidates", candidates.len());
    for (i, c) in candidates.iter().enumerate() {
        println!(
            "  {}: tl=({:.1}, {:.1}) tr=({:.1}, {:.1}) bl=({:.1}, {:.1}) module={:.2} residual={:.2}",
            i,
            c.top_left.center.x,
            c.top_left.center.y,
            c.top_right.center.x,
            c.top_right.center.y,
            c.bottom_left.center.x,
            c.bottom_left.center.y,
            c.module_size,
            c.residual
        );
    }
    ExitCode::SUCCESS
}

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use posterize::{posterize, ImageBuffer, Method, PaletteGenerator, Transfer, Trivial};

#[derive(Parser)]
#[command(name = "posterize")]
#[command(about = "Posterize an image to a small color palette and report the RMSE")]
struct Cli {
    /// Requested palette size
    #[arg(short = 'n', long = "colors", default_value_t = 16)]
    colors: usize,

    /// Sample the color bounding box uniformly instead of fitting a palette
    #[arg(short, long)]
    trivial: bool,

    /// Palette fitting method used without --trivial
    #[arg(short, long, value_enum, default_value_t = Method::Kmeans)]
    method: Method,

    /// Transfer curve between file bytes and color components
    #[arg(long, value_enum, default_value_t = Transfer::Linear)]
    transfer: Transfer,

    /// Input image (.ppm, or anything the image crate decodes)
    #[arg(short, long, default_value = "in.ppm")]
    input: PathBuf,

    /// Output image (.tga writes Targa, anything else PPM)
    #[arg(short, long, default_value = "out.ppm")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "posterize=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let input = ImageBuffer::open(&cli.input, cli.transfer)
        .with_context(|| format!("can't read {}", cli.input.display()))?;
    info!(width = input.width(), height = input.height(), "loaded {}", cli.input.display());

    let generator: Box<dyn PaletteGenerator> = if cli.trivial {
        Box::new(Trivial)
    } else {
        cli.method.generator()
    };
    let result = posterize(&input, generator.as_ref(), cli.colors);
    println!("Posterization RMSE {}", result.rmse);

    result.image.save(&cli.output, cli.transfer)
        .with_context(|| format!("can't write {}", cli.output.display()))?;
    info!("wrote {}", cli.output.display());

    Ok(())
}

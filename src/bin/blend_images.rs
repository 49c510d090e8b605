use std::path::PathBuf;

use clap::Parser;
use photo_editor::operation::ALPHA_RANGE;
use photo_editor::{image_io, transforms, EditorError};

/// Alpha-blend two images. The second is resized to the first.
#[derive(Parser, Debug)]
#[command(name = "blend_images")]
struct Args {
    first: PathBuf,

    second: PathBuf,

    /// Weight of the second image, 0 to 1.
    #[arg(short, long, default_value_t = 0.5)]
    alpha: f64,

    #[arg(short, long, default_value = "manual_blend.jpg", value_name = "FILE")]
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    if !ALPHA_RANGE.contains(&args.alpha) {
        return Err(EditorError::invalid(format!("alpha {} outside 0..=1", args.alpha)).into());
    }

    let first = image_io::decode(&args.first)?;
    let second = image_io::decode(&args.second)?;

    let blended = transforms::blend(&first, &second, args.alpha);
    let written = image_io::encode(&blended, &args.output)?;
    println!("Blended image saved as {}", written.display());
    Ok(())
}

use std::path::PathBuf;

use clap::Parser;
use photo_editor::image_io;
use photo_editor::logo::{self, LogoStyle};

/// Draw the three-ring logo onto a white canvas.
#[derive(Parser, Debug)]
#[command(name = "draw_logo")]
struct Args {
    /// Ring style: cutout or arcs.
    #[arg(short, long, default_value_t = LogoStyle::Cutout)]
    style: LogoStyle,

    /// Output path. Defaults to logo_<style>.jpg.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(args.style.default_output()));

    let img = logo::draw_logo(args.style);
    let written = image_io::encode(&img, &output)?;
    println!("Created {} logo at: {}", args.style, written.display());
    Ok(())
}

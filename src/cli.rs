use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "shapebridge")]
#[command(version)]
#[command(about = "Load a font and shape text with HarfBuzz", long_about = None)]
#[command(after_help = "\
FEATURES:
    `liga` or `+liga` enables a feature, `-liga` disables it and
    `ss01=2` sets an explicit value. Tags must be exactly 4 characters.

CONFIG:
    Defaults for point size, features and face index are read from
    $XDG_CONFIG_HOME/shapebridge/config.toml when present.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Shape text and print one line per glyph
    Shape(ShapeArgs),
    /// Print the HarfBuzz runtime and compiled versions
    Version,
}

#[derive(Args)]
pub struct ShapeArgs {
    /// Font file to load
    pub font: PathBuf,

    /// Text to shape
    pub text: String,

    /// OpenType feature, may be repeated
    #[arg(short, long = "feature", allow_hyphen_values = true)]
    pub features: Vec<String>,

    /// First character to shape
    #[arg(long, default_value_t = 0)]
    pub start: usize,

    /// Number of characters to shape (default: rest of the text)
    #[arg(long)]
    pub length: Option<usize>,

    /// Point size used for pixel columns
    #[arg(long)]
    pub size: Option<f64>,

    /// Face inside a font collection
    #[arg(long)]
    pub face_index: Option<u32>,
}

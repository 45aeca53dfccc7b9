pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod font;
pub mod handle;
pub mod host;
pub mod loader;
pub mod observer;
pub mod shaper;
pub mod tables;
pub mod tag;

pub use engine::{Engine, HarfBuzz};
pub use error::{ErrorKind, FontError};
pub use font::Font;
pub use loader::FontLoader;
pub use observer::{FontOrigin, LifecycleObserver, LogObserver, ReleaseReason};
pub use shaper::{Feature, GlyphRecord, DEFAULT_UNITS_PER_EM};
pub use tag::Tag;

use log::info;

use crate::cli::{Cli, Command, ShapeArgs};
use crate::config::Config;

/// Version string reported by the linked HarfBuzz library.
pub fn runtime_version() -> String {
    HarfBuzz::new().runtime_version()
}

/// The HarfBuzz binding this crate was built against.
pub fn compiled_version() -> String {
    HarfBuzz::new().compiled_version()
}

pub fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Version => {
            println!("shapebridge {}", env!("CARGO_PKG_VERSION"));
            println!("harfbuzz runtime:  {}", runtime_version());
            println!("harfbuzz compiled: {}", compiled_version());
            Ok(())
        }
        Command::Shape(args) => shape_command(args, &Config::load()),
    }
}

fn shape_command(args: ShapeArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let face_index = args.face_index.unwrap_or(config.loader.face_index);
    let point_size = args.size.unwrap_or(config.shaping.point_size);

    let feature_strings = if args.features.is_empty() {
        &config.shaping.features
    } else {
        &args.features
    };
    let features = feature_strings
        .iter()
        .map(|s| s.parse::<Feature>())
        .collect::<Result<Vec<_>, _>>()?;

    let font = FontLoader::new().load_path(&args.font, face_index)?;
    info!(
        "Loaded {} (face {}), {} units per em",
        args.font.display(),
        face_index,
        font.units_per_em()?
    );

    let length = args.length.unwrap_or(usize::MAX);
    let glyphs = font.shape(&args.text, &features, args.start, length)?;

    println!(
        "{:>6} {:>7} {:>8} {:>8} {:>8} {:>8} {:>10}",
        "glyph", "cluster", "x_adv", "y_adv", "x_off", "y_off", "x_adv_px"
    );
    for glyph in &glyphs {
        println!(
            "{:>6} {:>7} {:>8} {:>8} {:>8} {:>8} {:>10.3}",
            glyph.glyph_id,
            glyph.cluster,
            glyph.x_advance,
            glyph.y_advance,
            glyph.x_offset,
            glyph.y_offset,
            glyph.x_advance_px(point_size),
        );
    }
    Ok(())
}

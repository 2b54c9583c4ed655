//! glyph-ocr - read bitmap-font text from screenshots
//!
//! Runs the glyph recognizer against a region of a saved screenshot, either
//! printing the text found there or the boxes of searched strings.

use anyhow::{anyhow, Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use glyph_ocr::capture::{self, CapturedFrame};
use glyph_ocr::config::{self, AppConfig};
use glyph_ocr::{extract_text, find_text, Color, FontRegistry, FontStyle, Rectangle};

/// Bitmap-font text recognition by glyph template matching
#[derive(Parser, Debug)]
#[command(name = "glyph-ocr", version)]
#[command(about = "Read or locate pixel-font text in a screenshot region")]
struct Args {
    /// Configuration file (defaults to the per-user config location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory with one sub-directory of glyph bitmaps per font style
    #[arg(long, global = true)]
    fonts: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print all text found in the region, in reading order, without spaces
    Extract {
        #[command(flatten)]
        region: RegionArgs,

        /// Characters to leave out of matching
        #[arg(long, default_value = "")]
        exclude: String,
    },
    /// Print the bounding box of every occurrence of the given strings
    Find {
        #[command(flatten)]
        region: RegionArgs,

        /// Print boxes as JSON
        #[arg(long)]
        json: bool,

        /// Case-sensitive strings to search for
        #[arg(required = true)]
        text: Vec<String>,
    },
}

#[derive(ClapArgs, Debug)]
struct RegionArgs {
    /// Screenshot to read from
    #[arg(short, long)]
    image: PathBuf,

    /// Region as left,top,width,height (whole image if omitted)
    #[arg(short, long)]
    region: Option<Rectangle>,

    /// Font style of the text
    #[arg(short, long, value_enum)]
    font: Option<FontStyle>,

    /// Text color: palette name or #rrggbb (repeatable)
    #[arg(short, long = "color", required = true)]
    colors: Vec<Color>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = config::load_or_default(args.config.as_deref())?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let fonts_root = args.fonts.clone().unwrap_or_else(|| config.fonts.root.clone());
    let registry = FontRegistry::load(&fonts_root)
        .with_context(|| format!("Failed to load fonts from {:?}", fonts_root))?;

    match args.command {
        Command::Extract { region, exclude } => {
            let (frame, style) = open_region(&region, &config)?;
            let font = font_for(&registry, style)?;
            let text = extract_text(&frame, font, &region.colors, &exclude);
            println!("{}", text);
        }
        Command::Find { region, json, text } => {
            let (frame, style) = open_region(&region, &config)?;
            let font = font_for(&registry, style)?;
            let found = find_text(text, &frame, font, &region.colors);
            info!("Found {} match(es)", found.len());

            if json {
                println!("{}", serde_json::to_string_pretty(&found)?);
            } else {
                for rect in &found {
                    println!("{}", rect);
                }
            }
        }
    }

    Ok(())
}

/// Load the screenshot and cut out the requested region
fn open_region(args: &RegionArgs, config: &AppConfig) -> Result<(CapturedFrame, FontStyle)> {
    let screenshot = capture::load_screenshot(&args.image)?;
    let style = args.font.unwrap_or(config.fonts.default_style);

    let frame = match &args.region {
        Some(rect) => screenshot.crop(rect).ok_or_else(|| {
            anyhow!(
                "Region {} lies outside {:?} ({})",
                rect,
                args.image,
                screenshot.bounds
            )
        })?,
        None => screenshot,
    };

    Ok((frame, style))
}

fn font_for(registry: &FontRegistry, style: FontStyle) -> Result<&glyph_ocr::Font> {
    registry.get(style).ok_or_else(|| {
        anyhow!(
            "Font style {:?} not loaded (available: {:?})",
            style,
            registry.styles()
        )
    })
}

//! # Etiqueta CLI
//!
//! Command-line interface for price sticker rendering.
//!
//! ## Usage
//!
//! ```bash
//! # Render the stock sticker
//! etiqueta render --png sticker.png
//!
//! # Render a template with a real font
//! etiqueta render sticker.json --png sticker.png --font Meiryo=/fonts/meiryo.ttc
//!
//! # Print the element bounding boxes as JSON
//! etiqueta layout sticker.json
//!
//! # Write the stock template to start editing from
//! etiqueta init sticker.json
//! ```

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use etiqueta::{Document, EtiquetaError, FontBook, render, template};

/// Etiqueta - Price sticker renderer
#[derive(Parser, Debug)]
#[command(name = "etiqueta")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a template to PNG
    Render {
        /// Template file (omit for the stock sticker)
        template: Option<PathBuf>,

        /// Output PNG file
        #[arg(long, value_name = "FILE")]
        png: PathBuf,

        /// Register a font family, as NAME=PATH (repeatable)
        #[arg(long = "font", value_name = "NAME=PATH")]
        fonts: Vec<String>,
    },

    /// Print element bounding boxes as JSON
    Layout {
        /// Template file (omit for the stock sticker)
        template: Option<PathBuf>,

        /// Register a font family, as NAME=PATH (repeatable)
        #[arg(long = "font", value_name = "NAME=PATH")]
        fonts: Vec<String>,
    },

    /// Write the stock sticker as a template
    Init {
        /// Output template file
        file: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), EtiquetaError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render { template, png, fonts } => {
            let doc = load_document(template.as_deref())?;
            let fonts = font_book(&fonts)?;
            template::export_png(&doc, &fonts, &png)?;
            println!("Saved to {}", png.display());
        }
        Commands::Layout { template, fonts } => {
            let doc = load_document(template.as_deref())?;
            let fonts = font_book(&fonts)?;
            let rendered = render::render(&doc, &fonts);

            let boxes: serde_json::Map<String, serde_json::Value> = rendered
                .boxes
                .iter()
                .map(|(key, r)| (key.to_string(), serde_json::json!([r.x1, r.y1, r.x2, r.y2])))
                .collect();
            let json = serde_json::to_string_pretty(&boxes)
                .map_err(|e| EtiquetaError::Persistence(format!("Failed to encode layout: {}", e)))?;
            println!("{}", json);
        }
        Commands::Init { file } => {
            template::save(&Document::default_scene(), &file)?;
            println!("Wrote {}", file.display());
        }
    }

    Ok(())
}

fn load_document(path: Option<&Path>) -> Result<Document, EtiquetaError> {
    match path {
        Some(path) => template::load(path),
        None => Ok(Document::default_scene()),
    }
}

/// Build a font book from `NAME=PATH` arguments
fn font_book(specs: &[String]) -> Result<FontBook, EtiquetaError> {
    let mut book = FontBook::new();
    for spec in specs {
        let (name, path) = spec
            .split_once('=')
            .ok_or_else(|| EtiquetaError::Font(format!("Expected NAME=PATH, got '{}'", spec)))?;
        book.register_file(name.trim(), Path::new(path.trim()))?;
    }
    Ok(book)
}

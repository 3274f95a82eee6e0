//! CLI tool for building PowerPoint decks from code and markdown.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use prez_core::{MarkdownParser, PresentationBuilder, SlideDeck};
use prez_pptx::{PptxDeck, PptxReader};
use std::path::{Path, PathBuf};

/// Build PowerPoint presentations from markdown.
#[derive(Parser, Debug)]
#[command(name = "prez")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory for generated presentations
    #[arg(short, long, global = true, default_value = "outputs")]
    output_dir: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the demo presentation
    Demo,

    /// Create a presentation with a single title slide
    Create {
        /// Presentation name, also used as the file name
        name: String,
    },

    /// Build a presentation from a markdown deck
    Markdown {
        /// Markdown deck (.md)
        file: PathBuf,

        /// Output name without extension (default: markdown file stem)
        output: Option<String>,
    },

    /// Print the template parsed from a markdown deck as JSON
    Parse {
        /// Markdown deck (.md)
        file: PathBuf,
    },

    /// List the slides of an existing .pptx file
    Inspect {
        /// PowerPoint file (.pptx)
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    println!("Prez - Presentation Builder");
    println!("===========================");

    let result = match &args.command {
        Command::Demo => create_demo(&args.output_dir),
        Command::Create { name } => create_presentation(&args.output_dir, name),
        Command::Markdown { file, output } => create_from_markdown(&args.output_dir, file, output.as_deref()),
        Command::Parse { file } => print_template(file),
        Command::Inspect { file } => inspect(file),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
    }

    Ok(())
}

/// Build the demo presentation.
fn create_demo(output_dir: &Path) -> Result<()> {
    println!("Creating demo presentation...");

    let mut builder = PresentationBuilder::new(PptxDeck::new());
    builder.add_title_slide("Demo Presentation", "Built with Prez")?;
    builder.add_content_slide(
        "Key Features",
        &[
            "Rust-powered presentation generation".to_string(),
            "Native PPTX output".to_string(),
            "Template-based slide creation".to_string(),
            "Markdown decks with YAML front matter".to_string(),
        ],
    )?;
    builder.add_content_slide(
        "Getting Started",
        &[
            "Build with 'cargo build --release'".to_string(),
            "Run the demo with 'prez demo'".to_string(),
            "Write a deck in markdown".to_string(),
            "Convert it with 'prez markdown deck.md'".to_string(),
        ],
    )?;

    let output_path = output_dir.join("demo.pptx");
    save(&builder, &output_path)?;

    println!("Demo presentation created: {}", output_path.display());
    println!("Slides created: {}", builder.get_slide_count());
    Ok(())
}

/// Create a presentation with a single title slide.
fn create_presentation(output_dir: &Path, name: &str) -> Result<()> {
    println!("Creating presentation: {}", name);

    let mut builder = PresentationBuilder::new(PptxDeck::new());
    builder.add_title_slide(name, "Created with Prez")?;

    let output_path = output_dir.join(format!("{}.pptx", name));
    save(&builder, &output_path)?;

    println!("Presentation created: {}", output_path.display());
    Ok(())
}

/// Build a presentation from a markdown deck.
fn create_from_markdown(output_dir: &Path, markdown_path: &Path, output_name: Option<&str>) -> Result<()> {
    if !markdown_path.exists() {
        println!("Error: Markdown file not found: {}", markdown_path.display());
        return Ok(());
    }

    println!("Creating presentation from markdown: {}", markdown_path.display());

    // Parse and build fully before anything is written.
    let builder = PresentationBuilder::from_markdown(PptxDeck::new(), markdown_path)
        .with_context(|| format!("Failed to build {}", markdown_path.display()))?;

    let stem = output_name.map(str::to_string).unwrap_or_else(|| {
        markdown_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output")
            .to_string()
    });
    let output_path = output_dir.join(format!("{}.pptx", stem));
    save(&builder, &output_path)?;

    println!("Presentation created: {}", output_path.display());
    println!("Slides created: {}", builder.get_slide_count());
    println!("Slide titles:");
    for (i, title) in builder.get_slide_titles().iter().enumerate() {
        println!("   {}. {}", i + 1, title);
    }
    Ok(())
}

/// Print the parsed template of a markdown deck.
fn print_template(markdown_path: &Path) -> Result<()> {
    let template = MarkdownParser::new()
        .parse_file(markdown_path)
        .with_context(|| format!("Failed to parse {}", markdown_path.display()))?;

    println!("{}", template.to_json()?);
    Ok(())
}

/// List the slides of a .pptx file.
fn inspect(path: &Path) -> Result<()> {
    let slides = PptxReader::new()
        .read_path(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    println!("{}: {} slides", path.display(), slides.len());
    for slide in &slides {
        println!("{}. {}", slide.number, slide.title.as_deref().unwrap_or(prez_core::NO_TITLE));
        for text in &slide.texts {
            for line in text.lines() {
                println!("     {}", line);
            }
        }
        if slide.pictures > 0 {
            println!("     [{} picture(s)]", slide.pictures);
        }
    }
    Ok(())
}

/// Save a built presentation.
fn save<D: SlideDeck>(builder: &PresentationBuilder<D>, output_path: &Path) -> Result<()> {
    log::debug!("Writing {}", output_path.display());
    builder
        .save(output_path)
        .with_context(|| format!("Failed to write {}", output_path.display()))
}

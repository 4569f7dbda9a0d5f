//! docrank CLI - persona-driven PDF section ranking

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use docrank::render::to_json;
use docrank::{
    build_outline, collect_pdfs, read_file_with_options, Embedder, JsonFormat, ParseOptions,
    PersonaInput, RankOptions, Ranker,
};

/// Name of the analysis file written to the output directory.
const OUTPUT_FILE: &str = "challenge1b_output.json";

#[derive(Parser)]
#[command(name = "docrank")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Rank PDF sections against a persona and task", long_about = None)]
struct Cli {
    #[command(flatten)]
    rank: RankArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank every PDF section in the input directory (default)
    Rank(RankArgs),

    /// Reconstruct the outline of a single PDF
    Outline {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show version information
    Version,
}

#[derive(Args, Clone)]
struct RankArgs {
    /// Directory containing the PDFs and persona.json
    #[arg(long, env = "INPUT_DIR", default_value = "test_data/input")]
    input_dir: PathBuf,

    /// Directory for the analysis output
    #[arg(long, env = "OUTPUT_DIR", default_value = "test_data/output")]
    output_dir: PathBuf,

    /// Local sentence-transformer model directory
    #[arg(long, env = "MODEL_PATH", default_value = "src/models/all-MiniLM-L6-v2")]
    model: PathBuf,

    /// Persona file (defaults to <INPUT_DIR>/persona.json)
    #[arg(long, value_name = "FILE")]
    persona: Option<PathBuf>,

    /// Number of top sections that get a refined snippet
    #[arg(long, default_value_t = 10)]
    top_k: usize,

    /// Skip unreadable PDFs instead of aborting
    #[arg(long)]
    lenient: bool,

    /// Output compact JSON
    #[arg(long)]
    compact: bool,
}

impl RankArgs {
    fn persona_path(&self) -> PathBuf {
        self.persona
            .clone()
            .unwrap_or_else(|| self.input_dir.join("persona.json"))
    }

    fn output_path(&self) -> PathBuf {
        self.output_dir.join(OUTPUT_FILE)
    }

    fn options(&self) -> RankOptions {
        let options = RankOptions::new().with_top_k(self.top_k);
        if self.lenient {
            options.lenient()
        } else {
            options
        }
    }
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Rank(args)) => cmd_rank(&args),
        Some(Commands::Outline {
            input,
            output,
            compact,
        }) => cmd_outline(&input, output.as_deref(), compact),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => cmd_rank(&cli.rank),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_rank(args: &RankArgs) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();

    let pb = ProgressBar::new(4);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    // Persona problems are fatal before any document is touched
    pb.set_message("Reading persona...");
    let input = PersonaInput::from_path(args.persona_path())?;
    let paths = collect_pdfs(&args.input_dir)?;
    pb.inc(1);

    pb.set_message("Loading model...");
    let embedder = load_embedder(&args.model)?;
    pb.inc(1);

    pb.set_message(format!("Ranking {} documents...", paths.len()));
    let output = Ranker::with_options(embedder.as_ref(), args.options()).rank_paths(&paths, &input)?;
    pb.inc(1);

    pb.set_message("Writing output...");
    fs::create_dir_all(&args.output_dir)?;
    let json = to_json(&output, json_format(args.compact))?;
    let output_path = args.output_path();
    fs::write(&output_path, json)?;
    pb.inc(1);

    pb.finish_with_message("Done!");

    println!(
        "\n{} {} sections from {} documents",
        "Ranked".green().bold(),
        output.extracted_section.len(),
        output.metadata.input_documents.len()
    );
    println!("{} {}", "Saved to".green(), output_path.display());

    let elapsed = start.elapsed().as_secs_f64();
    log::info!("Total execution time: {:.2} seconds", elapsed);
    println!("Total execution time: {:.2} seconds.", elapsed);

    Ok(())
}

#[cfg(feature = "candle")]
fn load_embedder(model: &Path) -> docrank::Result<Box<dyn Embedder>> {
    Ok(Box::new(docrank::MiniLmEmbedder::load(model)?))
}

#[cfg(not(feature = "candle"))]
fn load_embedder(model: &Path) -> docrank::Result<Box<dyn Embedder>> {
    Err(docrank::Error::Embedding(format!(
        "cannot load {}: docrank was built without the `candle` feature",
        model.display()
    )))
}

fn cmd_outline(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Lenient so a single bad page still yields an outline
    let options = ParseOptions::new().lenient();
    let doc = read_file_with_options(input, &options)?;
    let outline = build_outline(&doc);

    let json = to_json(&outline, json_format(compact))?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "docrank".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Persona-driven PDF section ranking tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/docrank".dimmed());
    println!("License: MIT");
}

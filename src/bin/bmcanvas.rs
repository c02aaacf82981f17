//! bmcanvas CLI: inspect the block catalog, attach documents, export canvases.
//!
//! Usage:
//!   bmcanvas catalog [--config path]
//!   bmcanvas attach <file> [--concept text] [--state path]
//!   bmcanvas export --state path [--projection full|items|selections] [--out dir]
//!   bmcanvas import <markdown> --state path

use bmcanvas::{
    default_config_path, AiServices, CanvasConfig, CanvasSession, FileUpload, IngestOutcome,
    Projection, SessionFile,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "bmcanvas",
    version,
    about = "Business Model Canvas engine"
)]
struct Cli {
    /// Path to the YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the canvas blocks
    Catalog,
    /// Read a local document into the business concept
    Attach {
        /// Document to attach (.txt, .md, .doc, .docx, .pdf)
        file: PathBuf,
        /// Business concept text
        #[arg(long)]
        concept: Option<String>,
        /// Session file to update instead of printing the concept
        #[arg(long)]
        state: Option<PathBuf>,
    },
    /// Render a saved session as markdown
    Export {
        /// Session file (.json, .yaml or .yml)
        #[arg(long)]
        state: PathBuf,
        #[arg(long, value_enum, default_value_t = ProjectionArg::Full)]
        projection: ProjectionArg,
        /// Directory to write the export into (stdout if omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Append the items of an exported canvas to a session
    Import {
        /// Markdown export to read
        markdown: PathBuf,
        /// Session file to update (created if missing)
        #[arg(long)]
        state: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ProjectionArg {
    Full,
    Items,
    Selections,
}

impl From<ProjectionArg> for Projection {
    fn from(arg: ProjectionArg) -> Self {
        match arg {
            ProjectionArg::Full => Projection::Full,
            ProjectionArg::Items => Projection::ItemsOnly,
            ProjectionArg::Selections => Projection::SelectionsOnly,
        }
    }
}

fn load_config(path: Option<PathBuf>) -> Result<CanvasConfig, String> {
    let path = path.unwrap_or_else(default_config_path);
    CanvasConfig::load(&path)
        .map_err(|e| format!("Failed to load config '{}': {}", path.display(), e))
}

/// Open a saved session, or a fresh one if the file does not exist yet.
fn open_session(config: &CanvasConfig, state: Option<&Path>) -> Result<CanvasSession, String> {
    let services = AiServices::unconfigured();
    match state.filter(|path| path.exists()) {
        Some(path) => {
            let file = SessionFile::load(path)
                .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
            CanvasSession::from_file(file, config.block_catalog(), services, config.gate())
                .map_err(|e| format!("Invalid session '{}': {}", path.display(), e))
        }
        None => Ok(CanvasSession::from_config(config, services)),
    }
}

fn save_session(session: &CanvasSession, path: &Path) -> Result<(), String> {
    session
        .to_file()
        .save(path)
        .map_err(|e| format!("Failed to write '{}': {}", path.display(), e))
}

fn cmd_catalog(config: &CanvasConfig) -> i32 {
    let catalog = config.block_catalog();
    println!("{:<24}  {:<24}  {}", "ID", "TITLE", "DESCRIPTION");
    println!("{}", "-".repeat(72));
    for block in catalog.iter() {
        println!("{:<24}  {:<24}  {}", block.id, block.title, block.description);
    }
    0
}

async fn cmd_attach(
    config: &CanvasConfig,
    file: &Path,
    concept: Option<String>,
    state: Option<&Path>,
) -> Result<(), String> {
    let session = open_session(config, state)?;
    if let Some(concept) = concept {
        session.set_concept(concept);
    }
    match session.attach_file(FileUpload::from_path(file)).await {
        IngestOutcome::Ready(doc) => info!(name = %doc.name, "document attached"),
        IngestOutcome::Failed(e) => return Err(e.user_message().to_string()),
        IngestOutcome::Superseded(_) => return Err("attachment was superseded".to_string()),
    }
    match state {
        Some(path) => {
            save_session(&session, path)?;
            println!("Attached '{}' to {}", file.display(), path.display());
        }
        None => println!("{}", session.full_concept()),
    }
    Ok(())
}

fn cmd_export(
    config: &CanvasConfig,
    state: &Path,
    projection: Projection,
    out: Option<&Path>,
) -> Result<(), String> {
    if !state.exists() {
        return Err(format!("session file '{}' not found", state.display()));
    }
    let session = open_session(config, Some(state))?;
    let artifact = session.export(projection);
    match out {
        Some(dir) => {
            let path = artifact
                .write_to_dir(dir)
                .map_err(|e| format!("Failed to write export: {}", e))?;
            println!("Wrote {}", path.display());
        }
        None => print!("{}", artifact.content),
    }
    Ok(())
}

fn cmd_import(config: &CanvasConfig, markdown: &Path, state: &Path) -> Result<(), String> {
    let text = std::fs::read_to_string(markdown)
        .map_err(|e| format!("Failed to read '{}': {}", markdown.display(), e))?;
    let session = open_session(config, Some(state))?;
    let added = session.import_items(&text);
    save_session(&session, state)?;
    println!("Imported {} item(s) into {}", added, state.display());
    Ok(())
}

fn exit_code(result: Result<(), String>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bmcanvas=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = match load_config(cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let code = match cli.command {
        Commands::Catalog => cmd_catalog(&config),
        Commands::Attach {
            file,
            concept,
            state,
        } => exit_code(cmd_attach(&config, &file, concept, state.as_deref()).await),
        Commands::Export {
            state,
            projection,
            out,
        } => exit_code(cmd_export(&config, &state, projection.into(), out.as_deref())),
        Commands::Import { markdown, state } => {
            exit_code(cmd_import(&config, &markdown, &state))
        }
    };
    std::process::exit(code);
}

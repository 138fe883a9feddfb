//! ThoughtSpace CLI - ingest files into the three-pillar knowledge base
//!
//! Notes live for the duration of one invocation (persistence is limited to
//! settings); `ingest` and `chat` build their note collection from the files
//! passed on the command line.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use thoughtspace_lib::pipeline::UploadStatus;
use thoughtspace_lib::{NotesStore, Pillar, SettingsStore, UploadQueue};

#[derive(Parser)]
#[command(name = "thoughtspace")]
#[command(version, about = "ThoughtSpace knowledge base CLI", long_about = None)]
struct Cli {
    /// Settings file path (default: per-user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify files and place them on the canvas
    Ingest {
        /// Files to ingest (.txt, .md, .pdf, .png, .jpg, .jpeg, .webp, .gif)
        files: Vec<PathBuf>,
        /// Print committed notes as JSON
        #[arg(long)]
        json: bool,
    },
    /// Ask the assistant about your notes
    Chat {
        /// The question or request
        message: String,
        /// Files to ingest as context before answering
        #[arg(long, short)]
        context: Vec<PathBuf>,
    },
    /// Configuration settings
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Store the OpenAI API key
    SetKey { key: String },
    /// Store the model identifier
    SetModel { model: String },
    /// Show current configuration
    Show,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(SettingsStore::default_path);
    let settings = SettingsStore::load(config_path);

    let result = match cli.command {
        Commands::Ingest { files, json } => run_ingest(files, json, &settings).await,
        Commands::Chat { message, context } => run_chat(message, context, &settings).await,
        Commands::Config { cmd } => run_config(cmd, settings),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn ingest_into(
    files: Vec<PathBuf>,
    store: &mut NotesStore,
    settings: &SettingsStore,
) -> Result<UploadQueue, String> {
    let mut queue = UploadQueue::new();
    let accepted = queue.add_files(files);
    if accepted == 0 {
        return Err("No accepted files (.txt, .md, .pdf, .png, .jpg, .jpeg, .webp, .gif)".to_string());
    }

    if settings.has_api_key() {
        println!("[Ingest] AI categorization enabled ({})", settings.get_model());
    } else {
        println!("[Ingest] No API key configured, using keyword categorization");
    }

    let outcome = queue.process_pending(store, settings).await;
    println!("[Ingest] {} processed, {} failed", outcome.processed, outcome.failed);
    Ok(queue)
}

async fn run_ingest(files: Vec<PathBuf>, json: bool, settings: &SettingsStore) -> Result<(), String> {
    let mut store = NotesStore::new();
    let queue = ingest_into(files, &mut store, settings).await?;

    for item in queue.items() {
        let name = item.path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        match &item.status {
            UploadStatus::Done => {
                let r = item.result.as_ref().expect("done item has a result");
                println!(
                    "  {} -> {} {} / {} {}",
                    name,
                    r.pillar.emoji(),
                    r.pillar.as_str(),
                    r.category,
                    if r.tags.is_empty() { String::new() } else { format!("[{}]", r.tags.join(", ")) }
                );
            }
            UploadStatus::Error(e) => println!("  {} -> error: {}", name, e),
            status => println!("  {} -> {:?}", name, status),
        }
    }

    if json {
        let out = serde_json::to_string_pretty(store.all())
            .map_err(|e| format!("Failed to serialize notes: {}", e))?;
        println!("{}", out);
        return Ok(());
    }

    // Aggregate summary, skipping empty cells
    println!("\nCategories:");
    for pillar in Pillar::ALL {
        let total: usize = store
            .categories()
            .iter()
            .filter(|c| c.pillar == pillar)
            .map(|c| c.note_count)
            .sum();
        println!("  {} {} ({} notes)", pillar.emoji(), pillar.display_name(), total);
        for aggregate in store.categories().iter().filter(|c| c.pillar == pillar && c.note_count > 0) {
            println!(
                "    {} - {} at ({:.0}, {:.0})",
                aggregate.name, aggregate.note_count, aggregate.position.x, aggregate.position.y
            );
        }
    }

    Ok(())
}

async fn run_chat(
    message: String,
    context: Vec<PathBuf>,
    settings: &SettingsStore,
) -> Result<(), String> {
    let mut store = NotesStore::new();
    if !context.is_empty() {
        ingest_into(context, &mut store, settings).await?;
    }

    let answer = thoughtspace_lib::chat::respond(&message, store.all(), &[], settings).await?;
    println!("{}", answer);
    Ok(())
}

fn run_config(cmd: ConfigCommands, mut settings: SettingsStore) -> Result<(), String> {
    match cmd {
        ConfigCommands::SetKey { key } => {
            settings.set_api_key(key)?;
            println!("API key saved");
        }
        ConfigCommands::SetModel { model } => {
            settings.set_model(model.clone())?;
            println!("Model set to {}", model);
        }
        ConfigCommands::Show => {
            println!("model: {}", settings.get_model());
            match settings.masked_api_key() {
                Some(masked) => println!("api key: {}", masked),
                None => println!("api key: (not set - offline mode)"),
            }
        }
    }
    Ok(())
}

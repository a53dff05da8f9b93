use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use textcloud_core::config::{self, ANALYSIS_ADDR, FILE_STORAGE_ADDR, MAX_UPLOAD_BYTES};
use textcloud_core::constants::{
    DEFAULT_ANALYSIS_ADDR, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_STORAGE_ADDR,
};
use textcloud_core::{
    AnalysisClient, FileStorage, RouteBudgets, StorageClient, TextAnalysis, UNKNOWN_FILENAME,
};
use tokio::io::AsyncWriteExt;

#[derive(Parser)]
#[command(name = "textcloud")]
#[command(about = "Textcloud command-line client")]
struct Cli {
    /// Storage service address
    #[arg(long, env = FILE_STORAGE_ADDR, default_value = DEFAULT_STORAGE_ADDR)]
    storage_addr: String,
    /// Analysis service address
    #[arg(long, env = ANALYSIS_ADDR, default_value = DEFAULT_ANALYSIS_ADDR)]
    analysis_addr: String,
    /// Largest file accepted in either direction, in bytes
    #[arg(long, env = MAX_UPLOAD_BYTES, default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    max_upload_bytes: usize,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Upload a file and print its id
    Upload {
        /// File to upload
        path: PathBuf,
    },
    /// Download a stored file
    Download {
        /// File id returned by upload
        id: String,
        /// Where to write the file (stdout if omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Print paragraph, word and character counts as JSON
    Analyze {
        /// File id returned by upload
        id: String,
    },
    /// Render a word cloud PNG
    Wordcloud {
        /// File id returned by upload
        id: String,
        /// Where to write the PNG
        #[arg(long, short)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let budgets = RouteBudgets::default();
    let storage_addr = config::endpoint(
        FILE_STORAGE_ADDR,
        Some(cli.storage_addr.clone()),
        DEFAULT_STORAGE_ADDR,
    )?;
    let analysis_addr =
        config::endpoint(ANALYSIS_ADDR, Some(cli.analysis_addr.clone()), DEFAULT_ANALYSIS_ADDR)?;

    match cli.command {
        Commands::Upload { path } => {
            let storage = StorageClient::connect_lazy(&storage_addr, cli.max_upload_bytes)?;
            let content = tokio::fs::read(&path).await?;
            let id = storage
                .store(&upload_name(&path), content, budgets.upload)
                .await?;
            println!("{}", id);
        }
        Commands::Download { id, output } => {
            let storage = StorageClient::connect_lazy(&storage_addr, cli.max_upload_bytes)?;
            let file = storage.get(&id, budgets.download).await?;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, &file.content).await?;
                    eprintln!("Saved '{}' to {}", file.filename, path.display());
                }
                None => {
                    let mut stdout = tokio::io::stdout();
                    stdout.write_all(&file.content).await?;
                    stdout.flush().await?;
                }
            }
        }
        Commands::Analyze { id } => {
            let analysis = AnalysisClient::connect_lazy(&analysis_addr, cli.max_upload_bytes)?;
            let result = analysis.analyze_file(&id, budgets.analyze).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Wordcloud { id, output } => {
            let analysis = AnalysisClient::connect_lazy(&analysis_addr, cli.max_upload_bytes)?;
            let image = analysis
                .generate_word_cloud(&id, budgets.word_cloud)
                .await?;
            tokio::fs::write(&output, &image.bytes).await?;
            eprintln!("Word cloud written to {}", output.display());
        }
    }

    Ok(())
}

/// The name stored alongside an upload: the final path component.
fn upload_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| UNKNOWN_FILENAME.to_string())
}

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use trivia_api::db::queries::categories::{get_all_categories, import_categories};
use trivia_api::db::queries::questions::{get_all_questions, import_questions};
use trivia_api::db::{self, Category, Question};
use trivia_api::telemetry::init_tracing;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Database path
    db_path: PathBuf,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import categories.csv and questions.csv from a directory
    Import { path: PathBuf },
    /// Export the catalog as CSV files into a directory
    Export { path: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let url = format!("sqlite:{}", cli.db_path.display());
    let pool = db::establish_connection(&url, true)
        .await
        .context("Cannot connect to DB")?;
    db::run_migrations(&pool).await?;

    match cli.command {
        Commands::Export { path } => {
            let categories = get_all_categories(&pool).await?;
            let questions = get_all_questions(&pool).await?;
            std::fs::create_dir_all(&path)?;
            write_to(&path.join("categories.csv"), &categories)?;
            write_to(&path.join("questions.csv"), &questions)?;
            tracing::info!(
                "Exported {} categories and {} questions",
                categories.len(),
                questions.len()
            );
        }
        Commands::Import { path } => {
            let categories: Vec<Category> = read_from(&path.join("categories.csv"))?;
            let questions: Vec<Question> = read_from(&path.join("questions.csv"))?;
            let (n_categories, n_questions) = (categories.len(), questions.len());
            import_categories(&pool, categories).await?;
            import_questions(&pool, questions).await?;
            tracing::info!("Imported {n_categories} categories and {n_questions} questions");
        }
    }
    Ok(())
}

fn write_to(path: &Path, data: &[impl Serialize]) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Cannot create {}", path.display()))?;
    let mut wtr = csv::Writer::from_writer(file);
    for line in data {
        wtr.serialize(line)?;
    }
    wtr.flush()?;
    Ok(())
}

fn read_from<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let file =
        std::fs::File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let mut rdr = csv::Reader::from_reader(file);
    let mut out = Vec::new();
    for record in rdr.deserialize() {
        out.push(record?);
    }
    Ok(out)
}

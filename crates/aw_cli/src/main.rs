use aw_core::format::{reading_time_label, DateFormat};
use aw_core::logging::{init_logging, parse_level};
use aw_core::{Article, Document, Error, MemoryDocument, Result, SiteConfig};
use aw_web::page::{show_reading_time, stagger_cards, SEARCH_INPUT_ID, SEARCH_RESULTS_ID};
use aw_web::render::article_card;
use aw_web::{HttpSearchClient, Page, SearchOutcome};
use clap::Parser;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Articles website page tools", long_about = None)]
pub struct Cli {
    /// Backend serving /api/search (defaults to $AW_BACKEND_URL or http://localhost:8000)
    #[arg(long)]
    backend_url: Option<String>,
    /// JSON file with site settings; flags override it
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    locale: Option<String>,
    #[arg(long, default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run one search (no debounce) and print the rendered results
    Search { query: String },
    /// Render article cards from a JSON array (file or stdin)
    Card { file: Option<PathBuf> },
    /// Estimate reading time of plain text (file or stdin)
    ReadingTime { file: Option<PathBuf> },
    /// Run the page-load affordances on an HTML page and print the body
    Page { file: Option<PathBuf> },
}

fn read_input(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn load_config(cli: &Cli) -> Result<SiteConfig> {
    let mut config = match &cli.config {
        Some(path) => SiteConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => SiteConfig::from_env()?,
    };
    if let Some(url) = &cli.backend_url {
        config = config.with_url(url)?;
    }
    if let Some(locale) = &cli.locale {
        config = config.with_locale(locale);
    }
    config.validate()?;
    Ok(config)
}

fn blank_search_page() -> MemoryDocument {
    MemoryDocument::with_elements([
        aw_core::Element::new("input").with_id(SEARCH_INPUT_ID),
        aw_core::Element::new("div")
            .with_id(SEARCH_RESULTS_ID)
            .with_class("hidden"),
    ])
}

async fn run_search(config: &SiteConfig, query: &str) -> Result<()> {
    let client = Arc::new(HttpSearchClient::new(&config.backend_url)?);
    let document = Arc::new(RwLock::new(blank_search_page()));
    let page = Page::load(Arc::clone(&document), client, config).await;
    let search = page
        .search()
        .ok_or_else(|| Error::Config("search box missing from page".to_string()))?;

    info!("🔎 Searching {} for {:?}", config.backend_url, query);
    let outcome = search.dispatcher().dispatch(query).await;
    match outcome {
        SearchOutcome::Cleared => println!("Query too short (minimum {} characters)", config.min_query_len),
        SearchOutcome::Failed => return Err(Error::Search(format!("no usable response for {:?}", query))),
        _ => println!("{}", document.read().await.inner_html(search.dispatcher().results())),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(parse_level(&cli.log_level));
    let config = load_config(&cli)?;

    match &cli.command {
        Commands::Search { query } => run_search(&config, query).await?,
        Commands::Card { file } => {
            let dates = DateFormat::new(&config.locale)?;
            let articles: Vec<Article> = serde_json::from_str(&read_input(file.as_ref())?)?;
            info!("🃏 Rendering {} article cards", articles.len());
            for article in &articles {
                println!("{}", article_card(article, &dates));
            }
        }
        Commands::ReadingTime { file } => {
            let text = read_input(file.as_ref())?;
            let minutes = aw_core::format::reading_time_minutes(&text, config.words_per_minute);
            println!("{}", reading_time_label(minutes));
        }
        Commands::Page { file } => {
            let mut document = MemoryDocument::from_html(&read_input(file.as_ref())?);
            if show_reading_time(&mut document, config.words_per_minute).is_none() {
                info!("No .article-content/#reading-time pair on this page");
            }
            let cards = stagger_cards(&mut document, config.stagger_step);
            info!("✨ Staggered {} article cards", cards);
            println!("{}", document.to_html());
        }
    }

    Ok(())
}

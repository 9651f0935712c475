//! CLI parsing and orchestration. Parses args, runs one adapter operation,
//! prints the result as JSON. Maps errors to exit codes.

use crate::config;
use crate::locale::WebtoonsConfig;
use crate::model::Cursor;
use crate::scraper::{ListingKind, ScrapeError, WebtoonsScraper};
use clap::{Parser, Subcommand};
use serde::Serialize;
use thiserror::Error;

/// CLI error carrying exit code and message.
#[derive(Debug, Error)]
pub enum CliRunError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Scrape(#[from] ScrapeError),

    #[error("{0}")]
    Output(String),
}

impl CliRunError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliRunError::InvalidInput(_) => 1,
            CliRunError::Scrape(_) => 2,
            CliRunError::Output(_) => 3,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "wtscrape")]
#[command(about = "Scrape Webtoons series, chapters, and discover listings as JSON")]
#[command(
    after_help = "Config file keys (locale, canvas, user_agent, request_delay_secs, timeout_secs, retry_count, retry_backoff_secs) are documented in the README. CLI flags override config."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Site locale (en, fr, es, de, zh-hant, th, id). Overrides config; default en.
    #[arg(long, global = true)]
    pub locale: Option<String>,

    /// Include the canvas (self-published) catalog in search and discover.
    #[arg(long, global = true)]
    pub canvas: bool,

    /// HTTP User-Agent (overrides config).
    #[arg(long, global = true)]
    pub user_agent: Option<String>,

    /// Delay between requests in seconds (overrides config; default 1).
    #[arg(long, global = true)]
    pub delay: Option<u64>,

    /// Request timeout in seconds (overrides config; default 30).
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Print verbose error chain.
    #[arg(long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch one series' detail page.
    Detail {
        /// Series id: site-relative path, e.g. "fantasy/tower/list?title_no=95".
        id: String,
    },
    /// Fetch the chapter list of one series.
    Chapters { series_id: String },
    /// Fetch the page image URLs of one chapter.
    Pages {
        series_id: String,
        chapter_id: String,
    },
    /// Fetch one page of a discover listing (popular, today, ongoing,
    /// completed, canvas_recommended, canvas_popular).
    Listing {
        section: String,
        /// Last page already fetched; omit to start from the beginning.
        #[arg(long)]
        page: Option<u32>,
        /// Stop after this many pages.
        #[arg(long)]
        max_pages: Option<u32>,
    },
    /// Search by keyword and/or genre tag id.
    Search {
        #[arg(long)]
        keyword: Option<String>,
        #[arg(long)]
        genre: Option<String>,
        #[arg(long)]
        page: Option<u32>,
    },
    /// List the genre filter tags for the current locale.
    Genres,
    /// List the discover sections available for the current locale.
    Sections,
    /// List supported site locales.
    Locales,
}

#[derive(Debug, Serialize)]
struct SectionInfo {
    id: &'static str,
    title: &'static str,
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliRunError> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| CliRunError::Output(format!("Failed to serialize output: {}", e)))?;
    println!("{}", out);
    Ok(())
}

/// Entry point for the CLI. Returns Ok(()) on success; Err with exit code and message on failure.
pub fn run(args: &Args) -> Result<(), CliRunError> {
    if let Command::Locales = args.command {
        return print_json(&WebtoonsConfig::supported_locales());
    }

    let config = config::load_config().map_err(CliRunError::InvalidInput)?;

    const DEFAULT_LOCALE: &str = "en";
    let locale = args
        .locale
        .clone()
        .or_else(|| config.as_ref().and_then(|c| c.locale.clone()))
        .unwrap_or_else(|| DEFAULT_LOCALE.to_string());
    let site = WebtoonsConfig::for_locale(&locale).ok_or_else(|| {
        CliRunError::InvalidInput(format!(
            "Unsupported locale: {}. Supported: {}.",
            locale,
            WebtoonsConfig::supported_locales().join(", ")
        ))
    })?;
    let canvas = args.canvas || config.as_ref().and_then(|c| c.canvas).unwrap_or(false);

    const DEFAULT_DELAY_SECS: u64 = 1;
    const DEFAULT_TIMEOUT_SECS: u64 = 30;
    const DEFAULT_RETRY_COUNT: u32 = 3;
    let delay_secs = args
        .delay
        .or_else(|| config.as_ref().and_then(|c| c.request_delay_secs))
        .unwrap_or(DEFAULT_DELAY_SECS);
    let timeout_secs = args
        .timeout
        .or_else(|| config.as_ref().and_then(|c| c.timeout_secs))
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    let retry_count = config
        .as_ref()
        .and_then(|c| c.retry_count)
        .unwrap_or(DEFAULT_RETRY_COUNT)
        .max(1);
    let retry_backoff_secs = config
        .as_ref()
        .and_then(|c| c.retry_backoff_secs.clone())
        .unwrap_or_else(|| vec![1, 2]);
    let user_agent = args
        .user_agent
        .clone()
        .or_else(|| config.as_ref().and_then(|c| c.user_agent.clone()));

    let mut builder = WebtoonsScraper::client_builder(&site)
        .delay_secs(delay_secs)
        .timeout_secs(timeout_secs)
        .retry_count(retry_count)
        .retry_backoff_secs(retry_backoff_secs);
    if let Some(ua) = user_agent {
        builder = builder.user_agent(ua);
    }
    let mut client = builder
        .build()
        .map_err(|e| CliRunError::InvalidInput(format!("Failed to create HTTP client: {}", e)))?;
    let mut scraper = WebtoonsScraper::new(&mut client, site, canvas);

    match &args.command {
        Command::Detail { id } => print_json(&scraper.get_series_detail(id)?),
        Command::Chapters { series_id } => print_json(&scraper.get_chapters(series_id)?),
        Command::Pages {
            series_id,
            chapter_id,
        } => print_json(&scraper.get_chapter_pages(series_id, chapter_id)?),
        Command::Listing {
            section,
            page,
            max_pages,
        } => {
            let kind: ListingKind = section.parse()?;
            let cursor = page.map(|p| Cursor::new(p, *max_pages));
            print_json(&scraper.get_listing(kind, cursor)?)
        }
        Command::Search {
            keyword,
            genre,
            page,
        } => {
            let cursor = page.map(|p| Cursor::new(p, None));
            print_json(&scraper.search(keyword.as_deref(), genre.as_deref(), cursor)?)
        }
        Command::Genres => print_json(&scraper.get_genre_tags(canvas)?),
        Command::Sections => {
            let sections: Vec<SectionInfo> = scraper
                .discover_sections()
                .into_iter()
                .map(|kind| SectionInfo {
                    id: kind.id(),
                    title: kind.title(),
                })
                .collect();
            print_json(&sections)
        }
        Command::Locales => print_json(&WebtoonsConfig::supported_locales()),
    }
}

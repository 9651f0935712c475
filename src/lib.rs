//! wtscrape: CLI scraper for the Webtoons catalog, outputting JSON.

pub mod cli;
pub mod config;
pub mod dates;
pub mod locale;
pub mod model;
pub mod scraper;

// Re-exports for CLI and consumers.
pub use locale::WebtoonsConfig;
pub use model::{
    Chapter, ChapterPages, Cursor, GenreTag, PagedListing, SeriesDetail, SeriesSummary,
};
pub use scraper::{
    ListingKind, PoliteClient, PoliteClientBuilder, ScrapeError, WebtoonsScraper,
    CANVAS_TAG_PREFIX,
};

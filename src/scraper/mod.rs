//! Scraping layer: polite HTTP client, shared error type, selector table,
//! and the Webtoons adapter itself.

mod client;
mod error;
pub mod selectors;
pub mod webtoons;

pub use client::{PoliteClient, PoliteClientBuilder};
pub use error::ScrapeError;
pub use webtoons::{WebtoonsScraper, CANVAS_TAG_PREFIX};

use std::fmt;
use std::str::FromStr;

use scraper::Selector;

/// Discover sections the adapter can serve. Daily sections come from the
/// originals schedule page; the canvas pair only exists when the host
/// enables the alternate catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingKind {
    Popular,
    Today,
    Ongoing,
    Completed,
    CanvasRecommended,
    CanvasPopular,
}

impl ListingKind {
    pub fn id(&self) -> &'static str {
        match self {
            ListingKind::Popular => "popular",
            ListingKind::Today => "today",
            ListingKind::Ongoing => "ongoing",
            ListingKind::Completed => "completed",
            ListingKind::CanvasRecommended => "canvas_recommended",
            ListingKind::CanvasPopular => "canvas_popular",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ListingKind::Popular => "New & Trending",
            ListingKind::Today => "Today's Titles",
            ListingKind::Ongoing => "Ongoing Series",
            ListingKind::Completed => "Completed Series",
            ListingKind::CanvasRecommended => "Canvas Recommended",
            ListingKind::CanvasPopular => "Canvas Popular",
        }
    }
}

impl fmt::Display for ListingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ListingKind {
    type Err = ScrapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "popular" => Ok(ListingKind::Popular),
            "today" => Ok(ListingKind::Today),
            "ongoing" => Ok(ListingKind::Ongoing),
            "completed" => Ok(ListingKind::Completed),
            "canvas_recommended" => Ok(ListingKind::CanvasRecommended),
            "canvas_popular" => Ok(ListingKind::CanvasPopular),
            other => Err(ScrapeError::UnsupportedSection {
                id: other.to_string(),
            }),
        }
    }
}

/// Parse a CSS selector, mapping the parser's error into ours.
pub(crate) fn parse_selector(selector: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(selector).map_err(|e| ScrapeError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// Append query parameters to a URL in call order, using `?` or `&` as
/// appropriate. Values are passed through verbatim; the site's ids and the
/// parameters we send need no percent-encoding.
pub fn append_query(url: &str, params: &[(&str, String)]) -> String {
    let mut out = String::from(url);
    for (name, value) in params {
        out.push(if out.contains('?') { '&' } else { '?' });
        out.push_str(name);
        out.push('=');
        out.push_str(value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_query_starts_and_continues_correctly() {
        let url = append_query(
            "https://www.webtoons.com/en/search",
            &[
                ("keyword", "tower".to_string()),
                ("page", "2".to_string()),
            ],
        );
        assert_eq!(url, "https://www.webtoons.com/en/search?keyword=tower&page=2");

        let url = append_query(
            "https://www.webtoons.com/en/fantasy/tower/list?title_no=95",
            &[("page", "3".to_string())],
        );
        assert_eq!(
            url,
            "https://www.webtoons.com/en/fantasy/tower/list?title_no=95&page=3"
        );
    }

    #[test]
    fn listing_kind_ids_round_trip() -> Result<(), ScrapeError> {
        for kind in [
            ListingKind::Popular,
            ListingKind::Today,
            ListingKind::Ongoing,
            ListingKind::Completed,
            ListingKind::CanvasRecommended,
            ListingKind::CanvasPopular,
        ] {
            assert_eq!(kind.id().parse::<ListingKind>()?, kind);
        }
        Ok(())
    }

    #[test]
    fn unknown_section_id_is_an_error() {
        let err = "trending".parse::<ListingKind>().unwrap_err();
        assert!(matches!(err, ScrapeError::UnsupportedSection { id } if id == "trending"));
    }

    #[test]
    fn selector_constants_all_parse() {
        let today = selectors::today_cards("MONDAY");
        let ongoing_row = selectors::ongoing_row_cards(3);
        for selector in [
            selectors::DETAIL_INFO,
            selectors::DETAIL_ASIDE,
            selectors::CHAPTER_ROWS,
            selectors::CHAPTER_TITLE,
            selectors::CHAPTER_DATE,
            selectors::CHAPTER_IMAGES,
            selectors::BANNER_TILES,
            selectors::DAILY_COLUMNS,
            selectors::COMPLETED_CARDS,
            selectors::CANVAS_RECOMMENDED_TILES,
            selectors::CANVAS_POPULAR_CARDS,
            selectors::SEARCH_CARDS,
            selectors::SEARCH_CANVAS_CARDS,
            selectors::GENRE_RESULT_CARDS,
            selectors::GENRE_TAGS,
            selectors::CANVAS_GENRE_TAGS,
            today.as_str(),
            ongoing_row.as_str(),
        ] {
            assert!(parse_selector(selector).is_ok(), "bad selector: {selector}");
        }
    }
}

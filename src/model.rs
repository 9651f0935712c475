//! Canonical data model for scraped Webtoons content.
//!
//! All aggregators produce these shapes; the CLI serializes them as-is.
//! Wire names are camelCase to match what host applications expect.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One series as it appears in a listing (discover section, search, genre page).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    /// Site-relative path, unique. The adapter's base-URL prefix is stripped;
    /// hrefs without that prefix are kept verbatim.
    pub id: String,
    pub title: String,
    #[serde(rename = "thumbnailUrl")]
    pub thumbnail_url: String,
    /// Marks alternate-catalog results (fixed "Canvas" tag).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
}

/// Full series detail page snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesDetail {
    pub id: String,
    pub title: String,
    #[serde(rename = "thumbnailUrl")]
    pub thumbnail_url: String,
    pub author: String,
    pub synopsis: String,
    pub status: String,
    #[serde(rename = "genreTags")]
    pub genre_tags: Vec<GenreTag>,
}

/// One chapter row from the mobile episode list.
///
/// Rows are emitted in document order; the source does not guarantee any
/// particular order, so callers sort if they need one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    /// Site-relative path, unique within the series.
    pub id: String,
    #[serde(rename = "seriesId")]
    pub series_id: String,
    pub title: String,
    /// Parsed from the "#N" episode label; 0.0 when the label is absent.
    pub number: f32,
    #[serde(rename = "publishDate")]
    pub publish_date: Option<NaiveDate>,
}

/// Image URLs for one chapter, in reading order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterPages {
    #[serde(rename = "chapterId")]
    pub chapter_id: String,
    #[serde(rename = "seriesId")]
    pub series_id: String,
    pub pages: Vec<String>,
}

/// A genre filter tag. Alternate-catalog tags carry the `CANVAS$$` id prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreTag {
    pub id: String,
    pub label: String,
}

/// Opaque pagination state passed between successive listing calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub page: u32,
    #[serde(rename = "maxPages", skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<u32>,
}

impl Cursor {
    pub fn new(page: u32, max_pages: Option<u32>) -> Self {
        Self { page, max_pages }
    }

    /// The page the next request should fetch, or None when advancing would
    /// pass `max_pages` (hard stop: no request is issued in that case).
    /// A page counter at u32::MAX also stops rather than wrapping.
    pub fn next_page(&self) -> Option<u32> {
        let next = self.page.checked_add(1)?;
        match self.max_pages {
            Some(max) if next > max => None,
            _ => Some(next),
        }
    }

    /// Cursor to hand back after fetching `page`.
    pub fn advanced_to(&self, page: u32) -> Self {
        Self {
            page,
            max_pages: self.max_pages,
        }
    }
}

/// One page of listing results plus the cursor for the next call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedListing<T> {
    pub items: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<Cursor>,
}

impl<T> PagedListing<T> {
    /// Empty page that echoes the caller's cursor back unmodified.
    pub fn empty(cursor: Option<Cursor>) -> Self {
        Self {
            items: Vec::new(),
            cursor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_advances_within_max_pages() {
        let cursor = Cursor::new(0, Some(2));
        assert_eq!(cursor.next_page(), Some(1));
        let cursor = cursor.advanced_to(1);
        assert_eq!(cursor.next_page(), Some(2));
        assert_eq!(cursor.max_pages, Some(2));
    }

    #[test]
    fn cursor_hard_stops_past_max_pages() {
        let cursor = Cursor::new(2, Some(2));
        assert_eq!(cursor.next_page(), None);
    }

    #[test]
    fn cursor_without_max_pages_never_stops() {
        let cursor = Cursor::new(9999, None);
        assert_eq!(cursor.next_page(), Some(10000));
    }

    #[test]
    fn cursor_at_counter_limit_stops_instead_of_wrapping() {
        let cursor = Cursor::new(u32::MAX, None);
        assert_eq!(cursor.next_page(), None);
        let cursor = Cursor::new(u32::MAX, Some(u32::MAX));
        assert_eq!(cursor.next_page(), None);
    }

    #[test]
    fn summary_serializes_camel_case() -> Result<(), serde_json::Error> {
        let summary = SeriesSummary {
            id: "canvas/fantasy/some-title/list?title_no=1".to_string(),
            title: "Some Title".to_string(),
            thumbnail_url: "https://example.com/thumb.jpg".to_string(),
            subtitle: Some("Canvas".to_string()),
        };
        let json = serde_json::to_string(&summary)?;
        assert!(json.contains("\"thumbnailUrl\":"));
        assert!(json.contains("\"subtitle\":\"Canvas\""));
        let summary = SeriesSummary {
            subtitle: None,
            ..summary
        };
        let json = serde_json::to_string(&summary)?;
        assert!(!json.contains("subtitle"));
        Ok(())
    }

    #[test]
    fn chapter_round_trips_through_json() -> Result<(), serde_json::Error> {
        let chapter = Chapter {
            id: "en/fantasy/tower/episode-5/viewer?title_no=1&episode_no=5".to_string(),
            series_id: "en/fantasy/tower/list?title_no=1".to_string(),
            title: "Episode 5".to_string(),
            number: 5.0,
            publish_date: NaiveDate::from_ymd_opt(2024, 3, 1),
        };
        let json = serde_json::to_string(&chapter)?;
        assert!(json.contains("\"seriesId\":"));
        assert!(json.contains("\"publishDate\":\"2024-03-01\""));
        let back: Chapter = serde_json::from_str(&json)?;
        assert_eq!(back.id, chapter.id);
        assert_eq!(back.number, chapter.number);
        assert_eq!(back.publish_date, chapter.publish_date);
        Ok(())
    }
}

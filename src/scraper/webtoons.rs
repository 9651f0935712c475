//! Webtoons adapter: extraction rules, page aggregators, and the fetch
//! surface exposed to hosts.
//!
//! Extraction rules are total over the document: a selector that matches
//! nothing yields an empty string or sequence, never an error. The only
//! failures surfaced from this module are transport errors and bad
//! selector/pattern literals.

use crate::dates::parse_site_date;
use crate::locale::WebtoonsConfig;
use crate::model::{
    Chapter, ChapterPages, Cursor, GenreTag, PagedListing, SeriesDetail, SeriesSummary,
};
use crate::scraper::error::ScrapeError;
use crate::scraper::selectors as sel;
use crate::scraper::{append_query, parse_selector, ListingKind, PoliteClient};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// Id prefix marking a genre tag as belonging to the canvas catalog.
pub const CANVAS_TAG_PREFIX: &str = "CANVAS$$";
/// Series ids in the canvas catalog start with this path segment.
const CANVAS_ID_PREFIX: &str = "canvas";
/// Subtitle attached to canvas-catalog summaries.
const CANVAS_SUBTITLE: &str = "Canvas";

const TODAY_CAP: usize = 10;
const ONGOING_CAP: usize = 14;
const COMPLETED_CAP: usize = 10;

/// Episode-specific query suffix on banner links.
const EPISODE_QUERY_PATTERN: &str = "&episode_no=[^&]*";
/// Trailing viewer path segment on banner links.
const VIEWER_SEGMENT_PATTERN: &str = r"/viewer\?";
/// Thumbnail URL inside a style attribute.
const STYLE_URL_PATTERN: &str = r"url\((.*?)\)";

fn parse_pattern(pattern: &str) -> Result<Regex, ScrapeError> {
    Regex::new(pattern).map_err(|e| ScrapeError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

/// Strip the adapter's own base-URL prefix from a href to form an id.
/// Hrefs without the prefix (foreign or malformed links) are kept verbatim.
fn strip_base_url(href: &str, base_url: &str) -> String {
    match href.strip_prefix(base_url).and_then(|rest| rest.strip_prefix('/')) {
        Some(rest) => rest.to_string(),
        None => href.to_string(),
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

fn scoped_text(scope: Option<ElementRef<'_>>, selector: &Selector) -> String {
    scope
        .and_then(|el| el.select(selector).next())
        .map(element_text)
        .unwrap_or_default()
}

/// Selectors shared by every summary-card extraction.
struct CardSelectors {
    title: Selector,
    image: Selector,
}

impl CardSelectors {
    fn new() -> Result<Self, ScrapeError> {
        Ok(Self {
            title: parse_selector(sel::CARD_TITLE)?,
            image: parse_selector(sel::CARD_IMAGE)?,
        })
    }
}

/// Project one `<a>` card into a summary. Returns None when the card has no
/// title sub-element: promotional tiles share the card class but carry no
/// `p.subj`, and must be skipped.
fn summary_from_card(
    card: &ElementRef<'_>,
    selectors: &CardSelectors,
    base_url: &str,
    subtitle: Option<&str>,
) -> Option<SeriesSummary> {
    let title = card.select(&selectors.title).next()?;
    Some(SeriesSummary {
        id: strip_base_url(card.value().attr("href").unwrap_or(""), base_url),
        title: element_text(title),
        thumbnail_url: card
            .select(&selectors.image)
            .next()
            .and_then(|img| img.value().attr("src"))
            .map(str::to_string)
            .unwrap_or_default(),
        subtitle: subtitle.map(str::to_string),
    })
}

/// Extract a series detail page. Canvas ids branch to the alternate
/// thumbnail/title selector pair.
pub fn parse_details(doc: &Html, id: &str) -> Result<SeriesDetail, ScrapeError> {
    let info_sel = parse_selector(sel::DETAIL_INFO)?;
    let aside_sel = parse_selector(sel::DETAIL_ASIDE)?;
    let author_sel = parse_selector(sel::DETAIL_AUTHOR)?;
    let synopsis_sel = parse_selector(sel::DETAIL_SYNOPSIS)?;
    let genre_sel = parse_selector(sel::DETAIL_GENRE)?;

    let info = doc.select(&info_sel).next();
    let aside = doc.select(&aside_sel).next();

    let is_canvas = id.starts_with(CANVAS_ID_PREFIX);
    let title_sel = parse_selector(if is_canvas {
        sel::DETAIL_TITLE_CANVAS
    } else {
        sel::DETAIL_TITLE
    })?;
    let thumbnail_url = if is_canvas {
        parse_canvas_thumbnail(doc)?
    } else {
        parse_thumbnail(doc)?
    };

    let genre_tags = info
        .map(|el| {
            el.select(&genre_sel)
                .map(|genre| {
                    let label = element_text(genre);
                    GenreTag {
                        id: label.clone(),
                        label,
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(SeriesDetail {
        id: id.to_string(),
        title: scoped_text(info, &title_sel).trim().to_string(),
        thumbnail_url,
        author: scoped_text(info, &author_sel).trim().to_string(),
        synopsis: scoped_text(aside, &synopsis_sel),
        status: parse_status(aside)?,
        genre_tags,
    })
}

/// Publication status from the aside block: the day_info text with its
/// status-bubble span text removed (first occurrence only).
fn parse_status(aside: Option<ElementRef<'_>>) -> Result<String, ScrapeError> {
    let status_sel = parse_selector(sel::DETAIL_STATUS)?;
    let bubble_sel = parse_selector(sel::DETAIL_STATUS_BUBBLE)?;
    let Some(status) = aside.and_then(|el| el.select(&status_sel).next()) else {
        return Ok(String::new());
    };
    let text = element_text(status);
    let bubble: String = status.select(&bubble_sel).map(element_text).collect();
    if bubble.is_empty() {
        Ok(text)
    } else {
        Ok(text.replacen(&bubble, "", 1))
    }
}

/// Thumbnail from the detail body's inline background style.
fn parse_thumbnail(doc: &Html) -> Result<String, ScrapeError> {
    let body_sel = parse_selector(sel::DETAIL_THUMBNAIL)?;
    let url_pattern = parse_pattern(STYLE_URL_PATTERN)?;
    let style = doc
        .select(&body_sel)
        .next()
        .and_then(|el| el.value().attr("style"))
        .unwrap_or("");
    Ok(url_pattern
        .captures(style)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default())
}

/// Canvas detail pages use a plain `<img>` instead of a styled banner.
fn parse_canvas_thumbnail(doc: &Html) -> Result<String, ScrapeError> {
    let img_sel = parse_selector(sel::DETAIL_THUMBNAIL_CANVAS)?;
    Ok(doc
        .select(&img_sel)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(str::to_string)
        .unwrap_or_default())
}

struct ChapterSelectors {
    link: Selector,
    title: Selector,
    number: Selector,
    date: Selector,
}

impl ChapterSelectors {
    fn new() -> Result<Self, ScrapeError> {
        Ok(Self {
            link: parse_selector(sel::CHAPTER_LINK)?,
            title: parse_selector(sel::CHAPTER_TITLE)?,
            number: parse_selector(sel::CHAPTER_NUMBER)?,
            date: parse_selector(sel::CHAPTER_DATE)?,
        })
    }
}

/// Chapter rows from the mobile episode list, in document order.
/// No sorting is applied; the page's order is whatever the site emits.
pub fn parse_chapter_list(
    doc: &Html,
    series_id: &str,
    config: &WebtoonsConfig,
) -> Result<Vec<Chapter>, ScrapeError> {
    let row_sel = parse_selector(sel::CHAPTER_ROWS)?;
    let selectors = ChapterSelectors::new()?;
    Ok(doc
        .select(&row_sel)
        .map(|row| chapter_from_row(&row, series_id, config, &selectors))
        .collect())
}

fn chapter_from_row(
    row: &ElementRef<'_>,
    series_id: &str,
    config: &WebtoonsConfig,
    selectors: &ChapterSelectors,
) -> Chapter {
    let href = row
        .select(&selectors.link)
        .next()
        .and_then(|a| a.value().attr("href"))
        .unwrap_or("");
    let number_text = scoped_text(Some(*row), &selectors.number);
    // Episode label is "#N"; drop the marker before parsing.
    let mut number_chars = number_text.chars();
    number_chars.next();
    let number = number_chars.as_str().trim().parse().unwrap_or(0.0);
    let date_text = scoped_text(Some(*row), &selectors.date);
    Chapter {
        id: strip_base_url(href, &config.mobile_url),
        series_id: series_id.to_string(),
        title: scoped_text(Some(*row), &selectors.title),
        number,
        publish_date: parse_site_date(date_text.trim(), &config.date_format, &config.language),
    }
}

/// Image URLs for one chapter, in reading order.
pub fn parse_chapter_pages(
    doc: &Html,
    series_id: &str,
    chapter_id: &str,
) -> Result<ChapterPages, ScrapeError> {
    let img_sel = parse_selector(sel::CHAPTER_IMAGES)?;
    Ok(ChapterPages {
        chapter_id: chapter_id.to_string(),
        series_id: series_id.to_string(),
        pages: doc
            .select(&img_sel)
            .map(|img| img.value().attr("data-url").unwrap_or("").to_string())
            .collect(),
    })
}

/// Promotional banner tiles. Episode-viewer links are rewritten back to the
/// canonical series listing (drop the episode query, then viewer -> list);
/// tiles whose rewritten link is not a listing are dropped.
pub fn parse_carousel(doc: &Html, config: &WebtoonsConfig) -> Result<Vec<SeriesSummary>, ScrapeError> {
    let tile_sel = parse_selector(sel::BANNER_TILES)?;
    let cards = CardSelectors::new()?;
    let episode_pattern = parse_pattern(EPISODE_QUERY_PATTERN)?;
    let viewer_pattern = parse_pattern(VIEWER_SEGMENT_PATTERN)?;

    let mut items = Vec::new();
    for tile in doc.select(&tile_sel) {
        let href = tile.value().attr("href").unwrap_or("");
        let href = episode_pattern.replace(href, "");
        let href = viewer_pattern.replace(&href, "/list?");
        if !href.contains("/list?") {
            continue;
        }
        if let Some(summary) = summary_from_card(&tile, &cards, &config.base_url, None) {
            items.push(SeriesSummary {
                id: strip_base_url(&href, &config.base_url),
                ..summary
            });
        }
    }
    Ok(items)
}

/// Cards from the schedule column matching `day` (uppercase English
/// weekday). Capped at 10 unless all titles are requested.
pub fn parse_today_titles(
    doc: &Html,
    day: &str,
    all_titles: bool,
    config: &WebtoonsConfig,
) -> Result<Vec<SeriesSummary>, ScrapeError> {
    let card_sel = parse_selector(&sel::today_cards(day))?;
    let cards = CardSelectors::new()?;
    let mut items = Vec::new();
    for card in doc.select(&card_sel) {
        if !all_titles && items.len() >= TODAY_CAP {
            break;
        }
        if let Some(summary) = summary_from_card(&card, &cards, &config.base_url, None) {
            items.push(summary);
        }
    }
    Ok(items)
}

/// Position-major traversal of the daily-schedule grid: row 1 of every
/// column, then row 2, and so on up to the longest column. This spreads
/// results across weekdays instead of exhausting one day first, and the
/// order is part of the adapter's contract. Capped at 14 unless all titles
/// are requested.
pub fn parse_ongoing_titles(
    doc: &Html,
    all_titles: bool,
    config: &WebtoonsConfig,
) -> Result<Vec<SeriesSummary>, ScrapeError> {
    let column_sel = parse_selector(sel::DAILY_COLUMNS)?;
    let row_count_sel = parse_selector("li")?;
    let cards = CardSelectors::new()?;

    let mut max_rows = 0;
    for column in doc.select(&column_sel) {
        max_rows = max_rows.max(column.select(&row_count_sel).count());
    }

    let mut items = Vec::new();
    'rows: for row in 1..=max_rows {
        let row_sel = parse_selector(&sel::ongoing_row_cards(row))?;
        for card in doc.select(&row_sel) {
            if !all_titles && items.len() >= ONGOING_CAP {
                break 'rows;
            }
            if let Some(summary) = summary_from_card(&card, &cards, &config.base_url, None) {
                items.push(summary);
            }
        }
    }
    Ok(items)
}

/// The flat completed-series list next to the schedule grid. Capped at 10
/// unless all titles are requested.
pub fn parse_completed_titles(
    doc: &Html,
    all_titles: bool,
    config: &WebtoonsConfig,
) -> Result<Vec<SeriesSummary>, ScrapeError> {
    let card_sel = parse_selector(sel::COMPLETED_CARDS)?;
    let cards = CardSelectors::new()?;
    let mut items = Vec::new();
    for card in doc.select(&card_sel) {
        if !all_titles && items.len() >= COMPLETED_CAP {
            break;
        }
        if let Some(summary) = summary_from_card(&card, &cards, &config.base_url, None) {
            items.push(summary);
        }
    }
    Ok(items)
}

/// Recommended canvas tiles: the card link sits inside the tile rather than
/// being the tile itself.
pub fn parse_canvas_recommended(
    doc: &Html,
    config: &WebtoonsConfig,
) -> Result<Vec<SeriesSummary>, ScrapeError> {
    let tile_sel = parse_selector(sel::CANVAS_RECOMMENDED_TILES)?;
    let link_sel = parse_selector(sel::CARD_LINK)?;
    let cards = CardSelectors::new()?;

    let mut items = Vec::new();
    for tile in doc.select(&tile_sel) {
        let Some(title) = tile.select(&cards.title).next() else {
            continue;
        };
        let href = tile
            .select(&link_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
            .unwrap_or("");
        items.push(SeriesSummary {
            id: strip_base_url(href, &config.base_url),
            title: element_text(title),
            thumbnail_url: tile
                .select(&cards.image)
                .next()
                .and_then(|img| img.value().attr("src"))
                .map(str::to_string)
                .unwrap_or_default(),
            subtitle: Some(CANVAS_SUBTITLE.to_string()),
        });
    }
    Ok(items)
}

pub fn parse_canvas_popular(
    doc: &Html,
    config: &WebtoonsConfig,
) -> Result<Vec<SeriesSummary>, ScrapeError> {
    let card_sel = parse_selector(sel::CANVAS_POPULAR_CARDS)?;
    let cards = CardSelectors::new()?;
    Ok(doc
        .select(&card_sel)
        .filter_map(|card| summary_from_card(&card, &cards, &config.base_url, Some(CANVAS_SUBTITLE)))
        .collect())
}

/// Search result cards: primary catalog first, then (when enabled) canvas
/// results appended after, never interleaved.
pub fn parse_search_results(
    doc: &Html,
    include_canvas: bool,
    config: &WebtoonsConfig,
) -> Result<Vec<SeriesSummary>, ScrapeError> {
    let primary_sel = parse_selector(sel::SEARCH_CARDS)?;
    let canvas_sel = parse_selector(sel::SEARCH_CANVAS_CARDS)?;
    let cards = CardSelectors::new()?;

    let mut items: Vec<SeriesSummary> = doc
        .select(&primary_sel)
        .filter_map(|card| summary_from_card(&card, &cards, &config.base_url, None))
        .collect();
    if include_canvas {
        items.extend(
            doc.select(&canvas_sel)
                .filter_map(|card| {
                    summary_from_card(&card, &cards, &config.base_url, Some(CANVAS_SUBTITLE))
                }),
        );
    }
    Ok(items)
}

pub fn parse_genre_results(
    doc: &Html,
    config: &WebtoonsConfig,
) -> Result<Vec<SeriesSummary>, ScrapeError> {
    let card_sel = parse_selector(sel::GENRE_RESULT_CARDS)?;
    let cards = CardSelectors::new()?;
    Ok(doc
        .select(&card_sel)
        .filter_map(|card| summary_from_card(&card, &cards, &config.base_url, None))
        .collect())
}

/// Primary-catalog genre tags. Missing `data-genre` degrades to an empty id.
pub fn parse_genre_tags(doc: &Html) -> Result<Vec<GenreTag>, ScrapeError> {
    let tag_sel = parse_selector(sel::GENRE_TAGS)?;
    let label_sel = parse_selector(sel::GENRE_TAG_LABEL)?;
    Ok(doc
        .select(&tag_sel)
        .map(|tag| GenreTag {
            id: tag.value().attr("data-genre").unwrap_or("").to_string(),
            label: scoped_text(Some(tag), &label_sel).trim().to_string(),
        })
        .collect())
}

/// Canvas genre tags: only nodes carrying a `data-genre` other than the ALL
/// sentinel; ids are prefixed to mark the catalog.
pub fn parse_canvas_genre_tags(doc: &Html) -> Result<Vec<GenreTag>, ScrapeError> {
    let tag_sel = parse_selector(sel::CANVAS_GENRE_TAGS)?;
    let label_sel = parse_selector(sel::GENRE_TAG_LABEL)?;
    Ok(doc
        .select(&tag_sel)
        .filter_map(|tag| {
            let genre = tag.value().attr("data-genre")?;
            if genre == "ALL" {
                return None;
            }
            Some(GenreTag {
                id: format!("{}{}", CANVAS_TAG_PREFIX, genre),
                label: format!("Canvas - {}", scoped_text(Some(tag), &label_sel).trim()),
            })
        })
        .collect())
}

/// Current weekday as the device-local, uppercase English name used in
/// the schedule column class.
fn weekday_token() -> String {
    chrono::Local::now().format("%A").to_string().to_uppercase()
}

/// Webtoons scraper for one locale. Holds a reference to the shared polite
/// client; the canvas toggle is owned by the host and passed explicitly.
pub struct WebtoonsScraper<'a> {
    client: &'a mut PoliteClient,
    config: WebtoonsConfig,
    canvas_enabled: bool,
}

impl<'a> WebtoonsScraper<'a> {
    pub fn new(client: &'a mut PoliteClient, config: WebtoonsConfig, canvas_enabled: bool) -> Self {
        Self {
            client,
            config,
            canvas_enabled,
        }
    }

    pub fn config(&self) -> &WebtoonsConfig {
        &self.config
    }

    /// Build a client carrying the adapter's default headers (age gate and
    /// locale cookies, base referer) for this locale.
    pub fn client_builder(config: &WebtoonsConfig) -> crate::scraper::PoliteClientBuilder {
        PoliteClient::builder()
            .default_header("referer", format!("{}/", config.base_url))
            .default_header(
                "cookie",
                format!("ageGatePass=true; locale={}", config.locale),
            )
    }

    fn fetch_document(&mut self, url: &str, headers: &[(&str, &str)]) -> Result<Html, ScrapeError> {
        let response =
            self.client
                .get_with_retry(url, headers)
                .map_err(|e| ScrapeError::Network {
                    url: url.to_string(),
                    source: e,
                })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text().map_err(|e| ScrapeError::BodyRead { source: e })?;
        Ok(Html::parse_document(&body))
    }

    /// Pagination envelope: advance the cursor, hard-stop without a request
    /// when past max_pages, otherwise fetch with the page parameter appended
    /// and hand back the advanced cursor.
    fn paged_listing(
        &mut self,
        url: String,
        mut params: Vec<(&'static str, String)>,
        cursor: Cursor,
        parse: impl FnOnce(&Html, &WebtoonsConfig) -> Result<Vec<SeriesSummary>, ScrapeError>,
    ) -> Result<PagedListing<SeriesSummary>, ScrapeError> {
        let Some(next) = cursor.next_page() else {
            return Ok(PagedListing::empty(Some(cursor)));
        };
        params.push(("page", next.to_string()));
        let url = append_query(&url, &params);
        let doc = self.fetch_document(&url, &[])?;
        let items = parse(&doc, &self.config)?;
        Ok(PagedListing {
            items,
            cursor: Some(cursor.advanced_to(next)),
        })
    }

    pub fn get_series_detail(&mut self, id: &str) -> Result<SeriesDetail, ScrapeError> {
        let url = format!("{}/{}", self.config.base_url, id);
        let doc = self.fetch_document(&url, &[])?;
        parse_details(&doc, id)
    }

    /// Chapter list comes from the mobile site and needs the mobile referer.
    pub fn get_chapters(&mut self, series_id: &str) -> Result<Vec<Chapter>, ScrapeError> {
        let url = format!("{}/{}", self.config.mobile_url, series_id);
        let referer = self.config.mobile_url.clone();
        let doc = self.fetch_document(&url, &[("referer", referer.as_str())])?;
        parse_chapter_list(&doc, series_id, &self.config)
    }

    pub fn get_chapter_pages(
        &mut self,
        series_id: &str,
        chapter_id: &str,
    ) -> Result<ChapterPages, ScrapeError> {
        let url = format!("{}/{}", self.config.base_url, chapter_id);
        let doc = self.fetch_document(&url, &[])?;
        parse_chapter_pages(&doc, series_id, chapter_id)
    }

    /// Fetch one page of a discover listing. "All titles" mode for the
    /// daily listings kicks in once the caller is past the first page.
    pub fn get_listing(
        &mut self,
        kind: ListingKind,
        cursor: Option<Cursor>,
    ) -> Result<PagedListing<SeriesSummary>, ScrapeError> {
        let all_titles = cursor.map_or(false, |c| c.page > 0);
        match kind {
            ListingKind::Popular => self.paged_listing(
                format!("{}/popular", self.config.base_url),
                Vec::new(),
                cursor.unwrap_or(Cursor::new(0, Some(1))),
                parse_carousel,
            ),
            ListingKind::Today => {
                let day = weekday_token();
                self.paged_listing(
                    format!("{}/originals", self.config.base_url),
                    Vec::new(),
                    cursor.unwrap_or(Cursor::new(0, Some(2))),
                    move |doc, config| parse_today_titles(doc, &day, all_titles, config),
                )
            }
            ListingKind::Ongoing => self.paged_listing(
                format!("{}/originals", self.config.base_url),
                Vec::new(),
                cursor.unwrap_or(Cursor::new(0, Some(2))),
                move |doc, config| parse_ongoing_titles(doc, all_titles, config),
            ),
            ListingKind::Completed => self.paged_listing(
                format!("{}/originals", self.config.base_url),
                Vec::new(),
                cursor.unwrap_or(Cursor::new(0, Some(2))),
                move |doc, config| parse_completed_titles(doc, all_titles, config),
            ),
            ListingKind::CanvasRecommended => {
                let url = format!("{}/canvas", self.config.base_url);
                let doc = self.fetch_document(&url, &[])?;
                Ok(PagedListing {
                    items: parse_canvas_recommended(&doc, &self.config)?,
                    cursor: None,
                })
            }
            ListingKind::CanvasPopular => self.canvas_popular(None, cursor),
        }
    }

    fn canvas_popular(
        &mut self,
        genre: Option<&str>,
        cursor: Option<Cursor>,
    ) -> Result<PagedListing<SeriesSummary>, ScrapeError> {
        let params = vec![
            ("genreTab", genre.unwrap_or("ALL").to_string()),
            ("sortOrder", "READ_COUNT".to_string()),
        ];
        self.paged_listing(
            format!("{}/canvas/list", self.config.base_url),
            params,
            cursor.unwrap_or(Cursor::new(0, None)),
            parse_canvas_popular,
        )
    }

    /// Search by keyword and/or genre. A canvas-prefixed genre id routes to
    /// the canvas-popular listing with the prefix stripped; other genres go
    /// to the genre page; no keyword and no genre yields an empty listing.
    pub fn search(
        &mut self,
        keyword: Option<&str>,
        genre_id: Option<&str>,
        cursor: Option<Cursor>,
    ) -> Result<PagedListing<SeriesSummary>, ScrapeError> {
        let genre = genre_id.unwrap_or("ALL");
        if genre != "ALL" {
            if let Some(canvas_genre) = genre.strip_prefix(CANVAS_TAG_PREFIX) {
                let canvas_genre = canvas_genre.to_string();
                return self.canvas_popular(Some(&canvas_genre), cursor);
            }
            return self.titles_by_genre(genre);
        }
        match keyword {
            Some(keyword) if !keyword.is_empty() => self.titles_by_keyword(keyword, cursor),
            _ => Ok(PagedListing::empty(cursor)),
        }
    }

    fn titles_by_genre(&mut self, genre: &str) -> Result<PagedListing<SeriesSummary>, ScrapeError> {
        let url = append_query(
            &format!("{}/genres/{}", self.config.base_url, genre),
            &[("sortOrder", "READ_COUNT".to_string())],
        );
        let doc = self.fetch_document(&url, &[])?;
        Ok(PagedListing {
            items: parse_genre_results(&doc, &self.config)?,
            cursor: None,
        })
    }

    fn titles_by_keyword(
        &mut self,
        keyword: &str,
        cursor: Option<Cursor>,
    ) -> Result<PagedListing<SeriesSummary>, ScrapeError> {
        let mut params = vec![("keyword", keyword.to_string())];
        if !self.canvas_enabled {
            params.push(("searchType", "WEBTOON".to_string()));
        }
        let include_canvas = self.canvas_enabled;
        self.paged_listing(
            format!("{}/search", self.config.base_url),
            params,
            cursor.unwrap_or(Cursor::new(0, None)),
            move |doc, config| parse_search_results(doc, include_canvas, config),
        )
    }

    /// Genre filter tags: the ALL sentinel first, then the primary catalog,
    /// then (optionally) the canvas catalog.
    pub fn get_genre_tags(&mut self, include_canvas: bool) -> Result<Vec<GenreTag>, ScrapeError> {
        let mut tags = vec![GenreTag {
            id: "ALL".to_string(),
            label: "All".to_string(),
        }];
        let url = format!("{}/genres", self.config.base_url);
        let doc = self.fetch_document(&url, &[])?;
        tags.extend(parse_genre_tags(&doc)?);
        if include_canvas {
            let url = format!("{}/canvas", self.config.base_url);
            let doc = self.fetch_document(&url, &[])?;
            tags.extend(parse_canvas_genre_tags(&doc)?);
        }
        Ok(tags)
    }

    /// Discover sections the host should register for this locale, in
    /// display order.
    pub fn discover_sections(&self) -> Vec<ListingKind> {
        let mut kinds = Vec::new();
        if self.config.has_trending {
            kinds.push(ListingKind::Popular);
        }
        kinds.extend([
            ListingKind::Today,
            ListingKind::Ongoing,
            ListingKind::Completed,
        ]);
        if self.canvas_enabled {
            kinds.extend([ListingKind::CanvasRecommended, ListingKind::CanvasPopular]);
        }
        kinds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> WebtoonsConfig {
        WebtoonsConfig::for_locale("en").unwrap()
    }

    const BASE: &str = "https://www.webtoons.com/en";

    #[test]
    fn detail_page_primary_catalog() -> Result<(), ScrapeError> {
        let html = format!(
            r#"<div id="content"><div class="cont_box">
            <div class="detail_header"><div class="info">
                <h1> Tower of Trials </h1>
                <div class="author_area"> SIU </div>
                <span class="genre">Fantasy</span><span class="genre">Action</span>
            </div></div>
            <div class="detail_body" style="background:url({BASE}/thumb/95.jpg) no-repeat"></div>
            </div></div>
            <div id="_asideDetail">
                <p class="summary">A boy climbs a tower.</p>
                <p class="day_info"><span>UP</span>EVERY MONDAY</p>
            </div>"#
        );
        let doc = Html::parse_document(&html);
        let detail = parse_details(&doc, "en/fantasy/tower/list?title_no=95")?;
        assert_eq!(detail.title, "Tower of Trials");
        assert_eq!(detail.author, "SIU");
        assert_eq!(detail.thumbnail_url, format!("{BASE}/thumb/95.jpg"));
        assert_eq!(detail.synopsis, "A boy climbs a tower.");
        assert_eq!(detail.status, "EVERY MONDAY");
        assert_eq!(
            detail.genre_tags,
            vec![
                GenreTag {
                    id: "Fantasy".to_string(),
                    label: "Fantasy".to_string()
                },
                GenreTag {
                    id: "Action".to_string(),
                    label: "Action".to_string()
                },
            ]
        );
        Ok(())
    }

    #[test]
    fn detail_page_canvas_catalog_uses_alternate_selectors() -> Result<(), ScrapeError> {
        let html = r#"<div id="content"><div class="cont_box">
            <div class="detail_header"><div class="info">
                <h1>Wrong Title</h1>
                <h3>Indie Gem</h3>
                <div class="author_area">someone</div>
            </div></div>
            <span class="thmb"><img src="https://img.example/canvas.jpg"/></span>
            <div class="detail_body" style="background:url(https://img.example/wrong.jpg)"></div>
            </div></div>
            <div id="_asideDetail"><p class="summary">Self-published.</p></div>"#;
        let doc = Html::parse_document(html);
        let detail = parse_details(&doc, "canvas/slice-of-life/indie-gem/list?title_no=1")?;
        assert_eq!(detail.title, "Indie Gem");
        assert_eq!(detail.thumbnail_url, "https://img.example/canvas.jpg");
        Ok(())
    }

    #[test]
    fn detail_page_missing_nodes_degrade_to_empty() -> Result<(), ScrapeError> {
        let doc = Html::parse_document("<html><body></body></html>");
        let detail = parse_details(&doc, "en/fantasy/gone/list?title_no=0")?;
        assert_eq!(detail.title, "");
        assert_eq!(detail.author, "");
        assert_eq!(detail.synopsis, "");
        assert_eq!(detail.status, "");
        assert_eq!(detail.thumbnail_url, "");
        assert!(detail.genre_tags.is_empty());
        Ok(())
    }

    fn chapter_row(number: u32, date: &str) -> String {
        format!(
            r#"<li id="episode_{number}">
              <a href="https://m.webtoons.com/en/fantasy/tower/episode-{number}/viewer?title_no=95&episode_no={number}">
                <div class="row">
                  <div class="num">#{number}</div>
                  <div class="info">
                    <p class="sub_title"><span class="ellipsis">Episode {number}</span></p>
                    <div class="sub_info"><span class="date">{date}</span></div>
                  </div>
                </div>
              </a>
            </li>"#
        )
    }

    #[test]
    fn chapter_list_document_order_and_fields() -> Result<(), ScrapeError> {
        let html = format!(
            r#"<ul id="_episodeList">{}{}<li id="banner_1"><a href="x">ad</a></li></ul>"#,
            chapter_row(3, "Aug 27, 2024"),
            chapter_row(2, "Aug 20, 2024"),
        );
        let doc = Html::parse_document(&html);
        let series_id = "en/fantasy/tower/list?title_no=95";
        let chapters = parse_chapter_list(&doc, series_id, &config())?;
        assert_eq!(chapters.len(), 2);
        // Document order, no sorting: the page lists newest first here.
        assert_eq!(chapters[0].number, 3.0);
        assert_eq!(chapters[1].number, 2.0);
        assert_eq!(
            chapters[0].id,
            "en/fantasy/tower/episode-3/viewer?title_no=95&episode_no=3"
        );
        assert_eq!(chapters[0].series_id, series_id);
        assert_eq!(chapters[0].title, "Episode 3");
        assert_eq!(
            chapters[0].publish_date,
            chrono::NaiveDate::from_ymd_opt(2024, 8, 27)
        );
        Ok(())
    }

    #[test]
    fn chapter_row_without_number_parses_to_zero() -> Result<(), ScrapeError> {
        let html = r#"<ul id="_episodeList"><li id="episode_x">
            <a href="https://m.webtoons.com/en/fantasy/tower/episode-x/viewer?title_no=95">
            <div class="row"><div class="num"></div><div class="info">
            <p class="sub_title"><span class="ellipsis">Special</span></p>
            <div class="sub_info"><span class="date">not a date</span></div>
            </div></div></a></li></ul>"#;
        let doc = Html::parse_document(html);
        let chapters = parse_chapter_list(&doc, "en/x", &config())?;
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].number, 0.0);
        assert_eq!(chapters[0].publish_date, None);
        Ok(())
    }

    #[test]
    fn chapter_pages_keep_order_and_empty_defaults() -> Result<(), ScrapeError> {
        let html = r#"<div id="_imageList">
            <img data-url="https://img.example/1.jpg"/>
            <img data-url="https://img.example/2.jpg"/>
            <img src="https://img.example/no-data-url.jpg"/>
        </div>"#;
        let doc = Html::parse_document(html);
        let pages = parse_chapter_pages(&doc, "en/series", "en/series/episode-1/viewer")?;
        assert_eq!(
            pages.pages,
            vec![
                "https://img.example/1.jpg".to_string(),
                "https://img.example/2.jpg".to_string(),
                String::new(),
            ]
        );
        assert_eq!(pages.chapter_id, "en/series/episode-1/viewer");
        assert_eq!(pages.series_id, "en/series");
        Ok(())
    }

    fn daily_card(base: &str, slug: &str, title: &str) -> String {
        format!(
            r#"<li><a class="daily_card_item" href="{base}/{slug}/list?title_no=1">
               <p class="subj">{title}</p><img src="https://img.example/{title}.jpg"/></a></li>"#
        )
    }

    #[test]
    fn today_caps_at_ten_unless_all_requested() -> Result<(), ScrapeError> {
        let cards: String = (0..12)
            .map(|i| daily_card(BASE, &format!("s{i}"), &format!("T{i}")))
            .collect();
        let html = format!(
            r#"<div id="dailyList">
               <div class="daily_section _list_MONDAY"><ul>{cards}</ul></div>
               <div class="daily_section _list_TUESDAY"><ul>{}</ul></div>
               </div>"#,
            daily_card(BASE, "other-day", "Other"),
        );
        let doc = Html::parse_document(&html);
        let capped = parse_today_titles(&doc, "MONDAY", false, &config())?;
        assert_eq!(capped.len(), 10);
        let all = parse_today_titles(&doc, "MONDAY", true, &config())?;
        assert_eq!(all.len(), 12);
        // Only the matching day's column is read.
        assert!(all.iter().all(|s| s.title != "Other"));
        Ok(())
    }

    #[test]
    fn today_skips_cards_without_title() -> Result<(), ScrapeError> {
        let html = format!(
            r#"<div id="dailyList"><div class="daily_section _list_MONDAY"><ul>
               <li><a class="daily_card_item" href="{BASE}/promo"><img src="promo.jpg"/></a></li>
               {}
               </ul></div></div>"#,
            daily_card(BASE, "real", "Real"),
        );
        let doc = Html::parse_document(&html);
        let items = parse_today_titles(&doc, "MONDAY", true, &config())?;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Real");
        Ok(())
    }

    #[test]
    fn ongoing_traverses_position_major_across_columns() -> Result<(), ScrapeError> {
        // Columns of uneven length: traversal is row 1 of every column,
        // then row 2, and so on.
        let column = |cards: &[&str]| {
            let lis: String = cards
                .iter()
                .map(|t| daily_card(BASE, &t.to_lowercase(), t))
                .collect();
            format!(r#"<div class="daily_section"><ul>{lis}</ul></div>"#)
        };
        let html = format!(
            r#"<div id="dailyList">{}{}{}</div>"#,
            column(&["A1", "A2", "A3"]),
            column(&["B1"]),
            column(&["C1", "C2"]),
        );
        let doc = Html::parse_document(&html);
        let items = parse_ongoing_titles(&doc, true, &config())?;
        let titles: Vec<&str> = items.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["A1", "B1", "C1", "A2", "C2", "A3"]);
        Ok(())
    }

    #[test]
    fn ongoing_caps_at_fourteen_unless_all_requested() -> Result<(), ScrapeError> {
        let column = |prefix: &str, count: usize| {
            let lis: String = (0..count)
                .map(|i| daily_card(BASE, &format!("{prefix}{i}"), &format!("{prefix}{i}")))
                .collect();
            format!(r#"<div class="daily_section"><ul>{lis}</ul></div>"#)
        };
        let html = format!(
            r#"<div id="dailyList">{}{}</div>"#,
            column("X", 8),
            column("Y", 8),
        );
        let doc = Html::parse_document(&html);
        let capped = parse_ongoing_titles(&doc, false, &config())?;
        assert_eq!(capped.len(), 14);
        // Two cards per row: the cap lands at the end of row 7.
        assert_eq!(capped.last().unwrap().title, "Y6");
        let all = parse_ongoing_titles(&doc, true, &config())?;
        assert_eq!(all.len(), 16);
        Ok(())
    }

    #[test]
    fn completed_reads_flat_list_with_cap() -> Result<(), ScrapeError> {
        let cards: String = (0..11)
            .map(|i| {
                format!(
                    r#"<li><a href="{BASE}/done{i}/list?title_no={i}">
                       <p class="subj">Done{i}</p><img src="d{i}.jpg"/></a></li>"#
                )
            })
            .collect();
        let html = format!(r#"<div class="daily_lst comp"><ul>{cards}</ul></div>"#);
        let doc = Html::parse_document(&html);
        assert_eq!(parse_completed_titles(&doc, false, &config())?.len(), 10);
        assert_eq!(parse_completed_titles(&doc, true, &config())?.len(), 11);
        Ok(())
    }

    #[test]
    fn carousel_rewrites_viewer_links_and_drops_non_listings() -> Result<(), ScrapeError> {
        let html = format!(
            r#"<div id="content"><div class="NE=a:tnt"><ul>
            <li><a href="{BASE}/fantasy/tower/viewer?title_no=95&episode_no=600">
                <p class="subj">Tower</p><img src="tower.jpg"/></a></li>
            <li><a href="{BASE}/event/some-notice">
                <p class="subj">Notice</p><img src="notice.jpg"/></a></li>
            <li><a href="{BASE}/romance/spring/list?title_no=7">
                <p class="subj">Spring</p><img src="spring.jpg"/></a></li>
            </ul></div></div>"#
        );
        let doc = Html::parse_document(&html);
        let items = parse_carousel(&doc, &config())?;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "fantasy/tower/list?title_no=95");
        assert_eq!(items[0].title, "Tower");
        assert_eq!(items[1].id, "romance/spring/list?title_no=7");
        Ok(())
    }

    #[test]
    fn canvas_recommended_tags_subtitle() -> Result<(), ScrapeError> {
        let html = format!(
            r#"<div id="recommendArea"><ul>
            <li class="rolling-item"><a href="{BASE}/canvas/fantasy/gem/list?title_no=3">
                <p class="subj">Gem</p><img src="gem.jpg"/></a></li>
            <li class="rolling-item"><a href="{BASE}/canvas/ad"><img src="ad.jpg"/></a></li>
            </ul></div>"#
        );
        let doc = Html::parse_document(&html);
        let items = parse_canvas_recommended(&doc, &config())?;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "canvas/fantasy/gem/list?title_no=3");
        assert_eq!(items[0].subtitle.as_deref(), Some("Canvas"));
        Ok(())
    }

    #[test]
    fn search_merges_primary_then_canvas_in_order() -> Result<(), ScrapeError> {
        let html = format!(
            r#"<div id="content"><div class="card_wrap search"><ul>
            <li><a class="card_item" href="{BASE}/fantasy/alpha/list?title_no=1">
                <p class="subj">Alpha</p><img src="a.jpg"/></a></li>
            <li><a class="card_item" href="{BASE}/fantasy/beta/list?title_no=2">
                <p class="subj">Beta</p><img src="b.jpg"/></a></li>
            <li><a class="challenge_item" href="{BASE}/canvas/gamma/list?title_no=3">
                <p class="subj">Gamma</p><img src="g.jpg"/></a></li>
            </ul></div></div>"#
        );
        let doc = Html::parse_document(&html);

        let with_canvas = parse_search_results(&doc, true, &config())?;
        let titles: Vec<&str> = with_canvas.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha", "Beta", "Gamma"]);
        assert_eq!(with_canvas[2].subtitle.as_deref(), Some("Canvas"));
        assert_eq!(with_canvas[0].subtitle, None);

        let without_canvas = parse_search_results(&doc, false, &config())?;
        assert_eq!(without_canvas.len(), 2);
        Ok(())
    }

    #[test]
    fn genre_tags_keep_site_vocabulary() -> Result<(), ScrapeError> {
        let html = r#"<div id="content"><ul class="_genre">
            <li data-genre="FANTASY"><a> Fantasy </a></li>
            <li data-genre="ACTION"><a>Action</a></li>
        </ul></div>"#;
        let doc = Html::parse_document(html);
        let tags = parse_genre_tags(&doc)?;
        assert_eq!(
            tags,
            vec![
                GenreTag {
                    id: "FANTASY".to_string(),
                    label: "Fantasy".to_string()
                },
                GenreTag {
                    id: "ACTION".to_string(),
                    label: "Action".to_string()
                },
            ]
        );
        Ok(())
    }

    #[test]
    fn canvas_genre_tags_prefixed_and_all_sentinel_excluded() -> Result<(), ScrapeError> {
        let html = r#"<div id="content"><ul class="challenge">
            <li data-genre="ALL"><a>All</a></li>
            <li data-genre="DRAMA"><a>Drama</a></li>
            <li><a>Not a genre</a></li>
        </ul></div>"#;
        let doc = Html::parse_document(html);
        let tags = parse_canvas_genre_tags(&doc)?;
        assert_eq!(
            tags,
            vec![GenreTag {
                id: "CANVAS$$DRAMA".to_string(),
                label: "Canvas - Drama".to_string()
            }]
        );
        Ok(())
    }

    #[test]
    fn foreign_hrefs_keep_raw_id() -> Result<(), ScrapeError> {
        let html = r#"<div id="content"><div class="card_wrap"><ul class="card_lst">
            <li><a href="https://other.example/foreign/path">
                <p class="subj">Foreign</p><img src="f.jpg"/></a></li>
        </ul></div></div>"#;
        let doc = Html::parse_document(html);
        let items = parse_genre_results(&doc, &config())?;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "https://other.example/foreign/path");
        Ok(())
    }

    #[test]
    fn summary_id_round_trips_to_canonical_url() {
        let href = format!("{BASE}/fantasy/tower/list?title_no=95");
        let id = strip_base_url(&href, BASE);
        assert_eq!(id, "fantasy/tower/list?title_no=95");
        assert_eq!(format!("{BASE}/{id}"), href);
    }

    #[test]
    fn exhausted_cursor_short_circuits_without_a_request() -> Result<(), ScrapeError> {
        // No request is issued for a cursor at max_pages, so the listing
        // resolves even with nothing to talk to.
        let mut client = PoliteClient::builder().delay_secs(0).build().unwrap();
        let mut scraper = WebtoonsScraper::new(&mut client, config(), false);
        let cursor = Cursor::new(2, Some(2));
        for kind in [
            ListingKind::Popular,
            ListingKind::Today,
            ListingKind::Ongoing,
            ListingKind::Completed,
            ListingKind::CanvasPopular,
        ] {
            let listing = scraper.get_listing(kind, Some(cursor))?;
            assert!(listing.items.is_empty());
            assert_eq!(listing.cursor, Some(cursor));
        }
        Ok(())
    }

    #[test]
    fn weekday_token_is_an_uppercase_english_day() {
        let day = weekday_token();
        assert!([
            "MONDAY",
            "TUESDAY",
            "WEDNESDAY",
            "THURSDAY",
            "FRIDAY",
            "SATURDAY",
            "SUNDAY",
        ]
        .contains(&day.as_str()));
    }
}

//! CSS selector paths, one named constant per extracted record field.
//!
//! When the site's markup changes, this table is the only place to edit.

// Series detail page.
pub const DETAIL_INFO: &str = "#content > div.cont_box > div.detail_header > div.info";
pub const DETAIL_ASIDE: &str = "#_asideDetail";
pub const DETAIL_TITLE: &str = "h1";
pub const DETAIL_TITLE_CANVAS: &str = "h3";
pub const DETAIL_AUTHOR: &str = ".author_area";
pub const DETAIL_SYNOPSIS: &str = "p.summary";
pub const DETAIL_STATUS: &str = "p.day_info";
pub const DETAIL_STATUS_BUBBLE: &str = "span";
pub const DETAIL_GENRE: &str = ".genre";
pub const DETAIL_THUMBNAIL: &str = "#content > div.cont_box > div.detail_body";
pub const DETAIL_THUMBNAIL_CANVAS: &str = "#content > div.cont_box span.thmb > img";

// Chapter list (mobile episode page).
pub const CHAPTER_ROWS: &str = "ul#_episodeList > li[id*=episode]";
pub const CHAPTER_LINK: &str = "a";
pub const CHAPTER_TITLE: &str = "a > div.row > div.info > p.sub_title > span.ellipsis";
pub const CHAPTER_NUMBER: &str = "a > div.row > div.num";
pub const CHAPTER_DATE: &str = "a > div.row > div.info > div.sub_info > span.date";

// Chapter viewer page.
pub const CHAPTER_IMAGES: &str = "div#_imageList img";

// Summary cards (shared across listings).
pub const CARD_TITLE: &str = "p.subj";
pub const CARD_IMAGE: &str = "img";
pub const CARD_LINK: &str = "a";

// Discover listings.
pub const BANNER_TILES: &str = r"div#content div.NE\=a\:tnt li a";
pub const DAILY_COLUMNS: &str = "div#dailyList > div";
pub const COMPLETED_CARDS: &str = "div.daily_lst.comp li a";
pub const CANVAS_RECOMMENDED_TILES: &str = "#recommendArea li.rolling-item";
pub const CANVAS_POPULAR_CARDS: &str = "div.challenge_lst li a";

// Search and genre pages.
pub const SEARCH_CARDS: &str = "#content > div.card_wrap.search li a.card_item";
pub const SEARCH_CANVAS_CARDS: &str = "#content > div.card_wrap.search li a.challenge_item";
pub const GENRE_RESULT_CARDS: &str = "#content > div.card_wrap ul.card_lst li a";
pub const GENRE_TAGS: &str = "#content ul._genre li";
pub const GENRE_TAG_LABEL: &str = "a";
pub const CANVAS_GENRE_TAGS: &str = "#content ul.challenge li";

/// Daily-schedule column for one weekday; `{}` is the uppercase English
/// weekday name.
pub fn today_cards(day: &str) -> String {
    format!("div#dailyList div.daily_section._list_{day} li a.daily_card_item")
}

/// Cards at one row position across every schedule column.
pub fn ongoing_row_cards(row: usize) -> String {
    format!("div#dailyList > div li:nth-child({row}) a.daily_card_item")
}

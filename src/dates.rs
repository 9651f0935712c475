//! Locale-aware parsing of the dates printed next to each episode row.
//!
//! Formats use the site's original tokens (`D`, `DD`, `MM`, `MMM`, `YYYY`,
//! and the numeric short date `l`). Month names are resolved through small
//! per-language tables; anything unparseable degrades to None rather than
//! an error, matching how the rest of the extraction layer treats missing
//! or malformed markup.

use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Day,
    MonthNum,
    MonthName,
    Year,
}

/// Parse a site date string against a per-locale format.
pub fn parse_site_date(raw: &str, format: &str, language: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if format == "l" {
        return parse_numeric_ymd(raw);
    }

    let tokens = format_tokens(format);
    let separators: Vec<char> = format
        .chars()
        .filter(|c| !matches!(c, 'D' | 'M' | 'Y'))
        .collect();
    let words: Vec<&str> = raw
        .split(|c: char| c.is_whitespace() || c == ',' || separators.contains(&c))
        .filter(|w| !w.is_empty())
        .collect();
    if words.len() != tokens.len() {
        return None;
    }

    let mut day: Option<u32> = None;
    let mut month: Option<u32> = None;
    let mut year: Option<i32> = None;
    for (token, word) in tokens.iter().zip(words.iter()) {
        match token {
            Token::Day => day = word.parse().ok(),
            Token::MonthNum => month = word.parse().ok(),
            Token::MonthName => month = month_from_name(word, language),
            Token::Year => year = word.parse().ok(),
        }
    }

    NaiveDate::from_ymd_opt(year?, month?, day?)
}

/// Numeric short date, year first (e.g. "2024/3/1").
fn parse_numeric_ymd(raw: &str) -> Option<NaiveDate> {
    let mut parts = raw
        .split(|c: char| !c.is_ascii_digit())
        .filter(|p| !p.is_empty());
    let year: i32 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    let day: u32 = parts.next()?.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn format_tokens(format: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = format.chars().peekable();
    while let Some(c) = chars.next() {
        if !matches!(c, 'D' | 'M' | 'Y') {
            continue;
        }
        let mut run = 1;
        while chars.peek() == Some(&c) {
            chars.next();
            run += 1;
        }
        tokens.push(match (c, run) {
            ('D', _) => Token::Day,
            ('M', n) if n >= 3 => Token::MonthName,
            ('M', _) => Token::MonthNum,
            ('Y', _) => Token::Year,
            _ => unreachable!(),
        });
    }
    tokens
}

/// Abbreviated month names per language, normalized (lowercase, no dots).
/// The id entries follow the site's custom Jan..Des abbreviations.
fn month_table(language: &str) -> Option<&'static [&'static str; 12]> {
    match language {
        "en" => Some(&[
            "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
        ]),
        "fr" => Some(&[
            "janv", "févr", "mars", "avr", "mai", "juin", "juil", "août", "sept", "oct", "nov",
            "déc",
        ]),
        "es" => Some(&[
            "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sep", "oct", "nov", "dic",
        ]),
        "th" => Some(&[
            "มค", "กพ", "มีค", "เมย", "พค", "มิย", "กค", "สค", "กย", "ตค", "พย", "ธค",
        ]),
        "id" => Some(&[
            "jan", "feb", "mar", "apr", "mei", "jun", "jul", "agu", "sep", "okt", "nov", "des",
        ]),
        _ => None,
    }
}

/// Resolve a month name to 1..=12. Accepts abbreviated or full names;
/// matching is prefix-based in either direction so "janvier" matches
/// "janv" and "fév" matches "févr".
fn month_from_name(word: &str, language: &str) -> Option<u32> {
    let table = month_table(language)?;
    let normalized: String = word.to_lowercase().replace('.', "");
    if normalized.is_empty() {
        return None;
    }
    for (index, entry) in table.iter().enumerate() {
        let matches = normalized == *entry
            || normalized.starts_with(entry)
            || (normalized.chars().count() >= 3 && entry.starts_with(normalized.as_str()));
        if matches {
            return Some(index as u32 + 1);
        }
    }
    None
}

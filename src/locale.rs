//! Per-locale adapter configuration.
//!
//! One parametrized configuration record replaces the site's per-language
//! variants; supported locales come from a static table.

pub const WEBTOONS_BASE: &str = "https://www.webtoons.com";
pub const WEBTOONS_MOBILE_BASE: &str = "https://m.webtoons.com";

/// Static entry for one supported site locale.
struct LocaleEntry {
    locale: &'static str,
    date_format: &'static str,
    /// Language used for month-name lookup when parsing dates. Usually the
    /// locale itself; zh-hant maps to zh-tw.
    language: &'static str,
    has_trending: bool,
}

const LOCALES: &[LocaleEntry] = &[
    LocaleEntry {
        locale: "en",
        date_format: "MMM D, YYYY",
        language: "en",
        has_trending: true,
    },
    LocaleEntry {
        locale: "fr",
        date_format: "D MMM YYYY",
        language: "fr",
        has_trending: true,
    },
    LocaleEntry {
        locale: "es",
        date_format: "DD-MMM-YYYY",
        language: "es",
        has_trending: false,
    },
    LocaleEntry {
        locale: "de",
        date_format: "DD.MM.YYYY",
        language: "de",
        has_trending: false,
    },
    LocaleEntry {
        locale: "zh-hant",
        date_format: "l",
        language: "zh-tw",
        has_trending: true,
    },
    LocaleEntry {
        locale: "th",
        date_format: "D MMM YYYY",
        language: "th",
        has_trending: true,
    },
    LocaleEntry {
        locale: "id",
        date_format: "YYYY MMM D",
        language: "id",
        has_trending: true,
    },
];

/// Configuration for one locale-specific Webtoons adapter instance.
#[derive(Debug, Clone)]
pub struct WebtoonsConfig {
    pub locale: String,
    pub date_format: String,
    pub language: String,
    pub base_url: String,
    pub mobile_url: String,
    pub has_trending: bool,
}

impl WebtoonsConfig {
    /// Look up a supported locale. Returns None for locales the site does
    /// not serve.
    pub fn for_locale(locale: &str) -> Option<Self> {
        LOCALES.iter().find(|e| e.locale == locale).map(|e| Self {
            locale: e.locale.to_string(),
            date_format: e.date_format.to_string(),
            language: e.language.to_string(),
            base_url: format!("{}/{}", WEBTOONS_BASE, e.locale),
            mobile_url: format!("{}/{}", WEBTOONS_MOBILE_BASE, e.locale),
            has_trending: e.has_trending,
        })
    }

    /// All supported locale codes, in table order.
    pub fn supported_locales() -> Vec<&'static str> {
        LOCALES.iter().map(|e| e.locale).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_locale_builds_site_urls() {
        let config = WebtoonsConfig::for_locale("fr").unwrap();
        assert_eq!(config.base_url, "https://www.webtoons.com/fr");
        assert_eq!(config.mobile_url, "https://m.webtoons.com/fr");
        assert_eq!(config.date_format, "D MMM YYYY");
        assert!(config.has_trending);
    }

    #[test]
    fn zh_hant_uses_zh_tw_language() {
        let config = WebtoonsConfig::for_locale("zh-hant").unwrap();
        assert_eq!(config.language, "zh-tw");
        assert_eq!(config.date_format, "l");
    }

    #[test]
    fn trending_flag_differs_per_locale() {
        assert!(!WebtoonsConfig::for_locale("es").unwrap().has_trending);
        assert!(!WebtoonsConfig::for_locale("de").unwrap().has_trending);
        assert!(WebtoonsConfig::for_locale("en").unwrap().has_trending);
    }

    #[test]
    fn unknown_locale_is_none() {
        assert!(WebtoonsConfig::for_locale("pt").is_none());
    }

    #[test]
    fn supported_locales_lists_table_order() {
        let locales = WebtoonsConfig::supported_locales();
        assert_eq!(locales.first(), Some(&"en"));
        assert_eq!(locales.len(), 7);
    }
}

use super::Catalog;

/// Completion statistics of one target language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LanguageStats {
    /// Translatable entries.
    pub total: usize,
    /// Entries whose localization is complete.
    pub translated: usize,
    /// `total - translated`.
    pub untranslated: usize,
    /// Entries marked `shouldTranslate: false`.
    pub skipped_dont_translate: usize,
}

impl LanguageStats {
    /// Share of translated entries, rounded to one decimal. An empty language is 100%.
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        (self.translated as f64 / self.total as f64 * 1000.0).round() / 10.0
    }
}

/// Computes completion statistics of `language`.
///
/// Counts the same entries the diff extractor considers: entries with an empty
/// key and localizations made only of variations are ignored, and
/// `shouldTranslate: false` entries are reported separately instead of in `total`.
pub fn language_stats(catalog: &Catalog, language: &str) -> LanguageStats {
    let mut stats = LanguageStats::default();

    for (key, entry) in catalog.entries() {
        if key.is_empty() {
            continue;
        }
        if !entry.should_translate {
            stats.skipped_dont_translate += 1;
            continue;
        }

        match entry.localization(language) {
            Some(localization) if localization.is_variation_only() => {}
            Some(localization) => {
                stats.total += 1;
                if localization.is_complete() {
                    stats.translated += 1;
                }
            }
            None => stats.total += 1,
        }
    }

    stats.untranslated = stats.total - stats.translated;
    stats
}

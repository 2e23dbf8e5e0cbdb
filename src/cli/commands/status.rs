//! Status command: per-language completion of a catalog.

use anyhow::{Context, Result};
use std::path::Path;

use crate::catalog::{Catalog, LanguageStats, language_stats};
use crate::cli::discovery::resolve_catalog;
use crate::engine::ProgressStore;
use crate::translation::{CapabilityLookup, DeepLCapabilities, display_language};
use crate::ui::Style;

/// `Name (code): P% translated (N remaining[, M don't translate])[ supports formality]`
pub fn describe_language(code: &str, stats: &LanguageStats, supports_formality: bool) -> String {
    let mut line = format!(
        "{}: {:.1}% translated ({} remaining",
        display_language(code),
        stats.percentage(),
        stats.untranslated
    );
    if stats.skipped_dont_translate > 0 {
        line.push_str(&format!(", {} don't translate", stats.skipped_dont_translate));
    }
    line.push(')');
    if supports_formality {
        line.push_str(" [supports formality]");
    }
    line
}

/// Statistics of every target language, most untranslated first.
pub fn ranked_languages(catalog: &Catalog, languages: &[String]) -> Vec<(String, LanguageStats)> {
    let mut ranked: Vec<_> = languages
        .iter()
        .map(|code| (code.clone(), language_stats(catalog, code)))
        .collect();
    ranked.sort_by(|(_, a), (_, b)| b.untranslated.cmp(&a.untranslated));
    ranked
}

/// Prints completion statistics of every language in the catalog to stdout.
pub fn print_status(catalog: Option<&Path>) -> Result<()> {
    let path = resolve_catalog(catalog, Path::new("."))?;
    let catalog = Catalog::load(&path)
        .with_context(|| format!("Failed to load catalog: {}", path.display()))?;
    let capabilities = DeepLCapabilities;

    println!(
        "{} {}",
        Style::header("Catalog"),
        Style::secondary(path.display())
    );
    println!(
        "  {}  {}",
        Style::label("source"),
        display_language(catalog.source_language())
    );
    println!();

    let languages = catalog.target_languages();
    if languages.is_empty() {
        println!("{}", Style::secondary("No target languages in this catalog"));
        return Ok(());
    }

    for (code, stats) in ranked_languages(&catalog, &languages) {
        let mut line = describe_language(&code, &stats, capabilities.supports_formality(&code));
        if !capabilities.is_supported(&code) {
            line.push_str(&format!(" {}", Style::warning("[not supported by DeepL]")));
        }

        let progress = ProgressStore::for_catalog(&path, &code).summary();
        if progress.count > 0 {
            line.push_str(&format!(
                " {}",
                Style::hint(format!("[{} saved, resumable]", progress.count))
            ));
        }
        println!("  {line}");
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_language() {
        let stats = LanguageStats {
            total: 20,
            translated: 17,
            untranslated: 3,
            skipped_dont_translate: 0,
        };
        assert_eq!(
            describe_language("de", &stats, true),
            "German (de): 85.0% translated (3 remaining) [supports formality]"
        );
    }

    #[test]
    fn test_describe_language_with_dont_translate() {
        let stats = LanguageStats {
            total: 3,
            translated: 1,
            untranslated: 2,
            skipped_dont_translate: 4,
        };
        assert_eq!(
            describe_language("ko", &stats, false),
            "Korean (ko): 33.3% translated (2 remaining, 4 don't translate)"
        );
    }

    #[test]
    fn test_ranked_languages_most_untranslated_first() {
        let catalog = Catalog::parse(
            r#"{
  "sourceLanguage" : "en",
  "strings" : {
    "A" : { "localizations" : {
      "de" : { "stringUnit" : { "state" : "translated", "value" : "A" } }
    } },
    "B" : { "localizations" : {
      "fr" : { "stringUnit" : { "state" : "translated", "value" : "B" } }
    } }
  }
}"#,
        )
        .unwrap();

        let ranked = ranked_languages(&catalog, &catalog.target_languages());
        let codes: Vec<_> = ranked.iter().map(|(code, _)| code.as_str()).collect();
        assert_eq!(codes, vec!["de", "fr"]);

        let mut catalog_languages = catalog.target_languages();
        catalog_languages.push("ja".to_string());
        let ranked = ranked_languages(&catalog, &catalog_languages);
        assert_eq!(ranked[0].0, "ja");
        assert_eq!(ranked[0].1.untranslated, 2);
    }
}

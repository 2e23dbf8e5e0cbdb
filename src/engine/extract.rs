use super::progress::TranslatedStrings;
use crate::catalog::Catalog;

/// Keys up to this many characters double as context when there is no comment.
pub const MAX_CONTEXT_KEY_CHARS: usize = 50;

/// An entry that still needs translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationUnit {
    pub key: String,
    /// Never empty: falls back to the key.
    pub source_text: String,
    pub context: Option<String>,
}

/// Returns every entry of `catalog` that still needs a `target_language`
/// translation, in catalog order.
///
/// Entries already in `already_translated` are skipped so that a resumed run
/// never sends them again. Entries with an empty key and localizations made
/// only of plural/device variations are never extracted.
pub fn extract_untranslated(
    catalog: &Catalog,
    source_language: &str,
    target_language: &str,
    already_translated: &TranslatedStrings,
) -> Vec<TranslationUnit> {
    let mut untranslated = Vec::new();

    for (key, entry) in catalog.entries() {
        if key.is_empty() || !entry.should_translate || already_translated.contains_key(key) {
            continue;
        }

        let needs_translation = entry.localizations.is_empty()
            || entry.localization(target_language).is_none_or(|target| {
                !target.is_variation_only() && !target.is_complete()
            });
        if !needs_translation {
            continue;
        }

        let source_text = entry
            .localization(source_language)
            .and_then(|source| source.value())
            .filter(|value| !value.is_empty())
            .unwrap_or(key)
            .to_string();

        let context = entry.comment().map(str::to_string).or_else(|| {
            (key.chars().count() <= MAX_CONTEXT_KEY_CHARS).then(|| key.to_string())
        });

        untranslated.push(TranslationUnit {
            key: key.to_string(),
            source_text,
            context,
        });
    }

    untranslated
}

//! Which catalog languages the provider can translate, and how.

use std::collections::HashMap;

/// Provider codes and formality support of one catalog language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageCapability {
    /// Code sent as `source_lang`.
    pub source_code: String,
    /// Code sent as `target_lang`.
    pub target_code: String,
    /// The provider accepts a `formality` option for this target.
    pub supports_formality: bool,
}

impl LanguageCapability {
    pub fn new(
        source_code: impl Into<String>,
        target_code: impl Into<String>,
        supports_formality: bool,
    ) -> Self {
        Self {
            source_code: source_code.into(),
            target_code: target_code.into(),
            supports_formality,
        }
    }
}

/// Lookup from a catalog language code to provider capabilities.
pub trait CapabilityLookup {
    /// Capabilities for exactly `code`, without any fallback.
    fn lookup_exact(&self, code: &str) -> Option<LanguageCapability>;

    /// Capabilities for `code`, falling back to ever shorter subtags
    /// (`zh-Hant-TW` → `zh-Hant` → `zh`).
    fn lookup(&self, code: &str) -> Option<LanguageCapability> {
        let mut candidate = code;
        loop {
            if let Some(capability) = self.lookup_exact(candidate) {
                return Some(capability);
            }
            let (parent, _) = candidate.rsplit_once(['-', '_'])?;
            candidate = parent;
        }
    }

    fn is_supported(&self, code: &str) -> bool {
        self.lookup(code).is_some()
    }

    fn supports_formality(&self, code: &str) -> bool {
        self.lookup(code).is_some_and(|c| c.supports_formality)
    }

    /// Splits `codes` into (supported, unsupported), keeping order.
    fn partition(&self, codes: &[String]) -> (Vec<String>, Vec<String>) {
        codes.iter().cloned().partition(|code| self.is_supported(code))
    }
}

/// Target codes for which DeepL accepts a formality option.
const FORMALITY_SUPPORTED: &[&str] = &[
    "DE", "FR", "IT", "ES", "NL", "PL", "PT-BR", "PT-PT", "JA", "RU",
];

/// Apple language code → (DeepL source, DeepL target).
const DEEPL_MAPPINGS: &[(&str, &str, &str)] = &[
    ("ar", "AR", "AR"),
    ("bg", "BG", "BG"),
    ("cs", "CS", "CS"),
    ("da", "DA", "DA"),
    ("de", "DE", "DE"),
    ("el", "EL", "EL"),
    ("en", "EN", "EN"),
    ("en-US", "EN", "EN-US"),
    ("en-GB", "EN", "EN-GB"),
    ("en-AU", "EN", "EN-GB"), // no AU variant
    ("en-CA", "EN", "EN-US"), // no CA variant
    ("es", "ES", "ES"),
    ("es-ES", "ES", "ES"),
    ("es-MX", "ES", "ES"),
    ("et", "ET", "ET"),
    ("fi", "FI", "FI"),
    ("fr", "FR", "FR"),
    ("fr-CA", "FR", "FR"),
    ("hu", "HU", "HU"),
    ("id", "ID", "ID"),
    ("it", "IT", "IT"),
    ("ja", "JA", "JA"),
    ("ko", "KO", "KO"),
    ("lt", "LT", "LT"),
    ("lv", "LV", "LV"),
    ("nb", "NB", "NB"),
    ("nl", "NL", "NL"),
    ("pl", "PL", "PL"),
    ("pt", "PT", "PT-PT"),
    ("pt-BR", "PT", "PT-BR"),
    ("pt-PT", "PT", "PT-PT"),
    ("ro", "RO", "RO"),
    ("ru", "RU", "RU"),
    ("sk", "SK", "SK"),
    ("sl", "SL", "SL"),
    ("sv", "SV", "SV"),
    ("tr", "TR", "TR"),
    ("uk", "UK", "UK"),
    ("zh", "ZH", "ZH"),
    ("zh-Hans", "ZH", "ZH"),
    ("zh-Hant", "ZH", "ZH-HANT"),
    ("zh-HK", "ZH", "ZH-HANT"),
];

/// The built-in DeepL capability table.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeepLCapabilities;

impl DeepLCapabilities {
    /// All mapped catalog codes, in table order.
    pub fn codes(self) -> impl Iterator<Item = &'static str> {
        DEEPL_MAPPINGS.iter().map(|(code, _, _)| *code)
    }
}

impl CapabilityLookup for DeepLCapabilities {
    fn lookup_exact(&self, code: &str) -> Option<LanguageCapability> {
        DEEPL_MAPPINGS
            .iter()
            .find(|(apple, _, _)| *apple == code)
            .map(|(_, source, target)| {
                LanguageCapability::new(*source, *target, FORMALITY_SUPPORTED.contains(target))
            })
    }
}

/// An in-memory capability table.
#[derive(Debug, Clone, Default)]
pub struct CapabilityTable {
    entries: HashMap<String, LanguageCapability>,
}

impl<K: Into<String>> FromIterator<(K, LanguageCapability)> for CapabilityTable {
    fn from_iter<I: IntoIterator<Item = (K, LanguageCapability)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(code, capability)| (code.into(), capability))
                .collect(),
        }
    }
}

impl CapabilityLookup for CapabilityTable {
    fn lookup_exact(&self, code: &str) -> Option<LanguageCapability> {
        self.entries.get(code).cloned()
    }
}

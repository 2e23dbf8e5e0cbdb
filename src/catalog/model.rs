use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::fs;
use std::path::Path;

use super::CatalogError;
use super::format::{self, Layout};

/// Translation state of a single localization.
///
/// States Xcode may add in the future are kept verbatim in [`Other`](Self::Other).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum LocalizationState {
    #[default]
    New,
    Translated,
    NeedsReview,
    Other(String),
}

impl LocalizationState {
    pub fn as_str(&self) -> &str {
        match self {
            Self::New => "new",
            Self::Translated => "translated",
            Self::NeedsReview => "needs_review",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for LocalizationState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "new" => Self::New,
            "translated" => Self::Translated,
            "needs_review" => Self::NeedsReview,
            _ => Self::Other(s),
        }
    }
}

impl fmt::Display for LocalizationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `stringUnit` of a localization: a value and its state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StringUnit {
    #[serde(default)]
    pub state: LocalizationState,
    #[serde(default)]
    pub value: String,
}

impl StringUnit {
    pub fn new(state: LocalizationState, value: impl Into<String>) -> Self {
        Self {
            state,
            value: value.into(),
        }
    }
}

/// One language of an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Localization {
    #[serde(default)]
    pub string_unit: Option<StringUnit>,
    /// Plural or device variations. Carried through untouched.
    #[serde(default)]
    pub variations: Option<Value>,
}

impl Localization {
    /// `true` iff the state is `translated` and the value is not blank.
    pub fn is_complete(&self) -> bool {
        self.string_unit.as_ref().is_some_and(|unit| {
            unit.state == LocalizationState::Translated && !unit.value.trim().is_empty()
        })
    }

    /// Localizations made only of variations are never translated here.
    pub const fn is_variation_only(&self) -> bool {
        self.string_unit.is_none() && self.variations.is_some()
    }

    pub fn value(&self) -> Option<&str> {
        self.string_unit.as_ref().map(|unit| unit.value.as_str())
    }
}

const fn default_should_translate() -> bool {
    true
}

/// A translatable entry of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    #[serde(default = "default_should_translate")]
    pub should_translate: bool,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub localizations: BTreeMap<String, Localization>,
}

impl Default for Entry {
    fn default() -> Self {
        Self {
            should_translate: true,
            comment: None,
            localizations: BTreeMap::new(),
        }
    }
}

impl Entry {
    pub fn localization(&self, language: &str) -> Option<&Localization> {
        self.localizations.get(language)
    }

    /// The comment, if present and not blank.
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref().filter(|c| !c.trim().is_empty())
    }
}

/// An Xcode string catalog.
///
/// The raw JSON document is kept alongside the typed view of its entries so
/// that every member the engine does not model is written back unchanged.
#[derive(Debug, Clone)]
pub struct Catalog {
    document: Map<String, Value>,
    source_language: String,
    entries: Vec<(String, Entry)>,
    /// Position of each key in `entries`.
    index: HashMap<String, usize>,
    layout: Layout,
}

impl Catalog {
    /// Reads and parses a catalog file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parses catalog JSON.
    pub fn parse(text: &str) -> Result<Self, CatalogError> {
        let document: Map<String, Value> = serde_json::from_str(text)?;

        let source_language = document
            .get("sourceLanguage")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| CatalogError::Invalid("missing `sourceLanguage`".to_string()))?
            .to_string();

        let entries: Vec<(String, Entry)> = match document.get("strings") {
            None => Vec::new(),
            Some(Value::Object(strings)) => strings
                .iter()
                .map(|(key, value)| {
                    Entry::deserialize(value)
                        .map(|entry| (key.clone(), entry))
                        .map_err(|e| CatalogError::Invalid(format!("entry `{key}`: {e}")))
                })
                .collect::<Result<_, _>>()?,
            Some(_) => {
                return Err(CatalogError::Invalid(
                    "`strings` is not an object".to_string(),
                ));
            }
        };

        let index = entries
            .iter()
            .enumerate()
            .map(|(position, (key, _))| (key.clone(), position))
            .collect();

        Ok(Self {
            document,
            source_language,
            entries,
            index,
            layout: Layout::detect(text),
        })
    }

    pub fn source_language(&self) -> &str {
        &self.source_language
    }

    /// Entries in file order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    /// Keys in file order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn entry(&self, key: &str) -> Option<&Entry> {
        self.index.get(key).map(|&position| &self.entries[position].1)
    }

    /// Every language that appears in the catalog except the source language, sorted.
    pub fn target_languages(&self) -> Vec<String> {
        self.entries
            .iter()
            .flat_map(|(_, entry)| entry.localizations.keys())
            .filter(|lang| **lang != self.source_language)
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Sets the `stringUnit` of `key` in `language`, creating the entry,
    /// its `localizations` and the localization when missing.
    ///
    /// Existing members keep their position; new ones are appended.
    pub fn set_string_unit(
        &mut self,
        key: &str,
        language: &str,
        unit: &StringUnit,
    ) -> Result<(), CatalogError> {
        let strings = object_member(&mut self.document, "strings", "catalog")?;
        let entry_value = strings
            .entry(key)
            .or_insert_with(|| Value::Object(Map::new()));
        let Value::Object(entry) = &mut *entry_value else {
            return Err(CatalogError::Invalid(format!("entry `{key}` is not an object")));
        };

        let localizations = object_member(entry, "localizations", key)?;
        let localization = object_member(localizations, language, key)?;
        let string_unit = object_member(localization, "stringUnit", key)?;
        string_unit.insert(
            "state".to_string(),
            Value::String(unit.state.as_str().to_string()),
        );
        string_unit.insert("value".to_string(), Value::String(unit.value.clone()));

        let typed = Entry::deserialize(&*entry_value)
            .map_err(|e| CatalogError::Invalid(format!("entry `{key}`: {e}")))?;
        match self.index.get(key) {
            Some(&position) => self.entries[position].1 = typed,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), typed));
            }
        }

        Ok(())
    }

    /// Serializes the catalog with the layout it was read with.
    pub fn to_json_string(&self) -> Result<String, CatalogError> {
        Ok(format::to_string(
            &Value::Object(self.document.clone()),
            &self.layout,
        )?)
    }
}

/// Returns `map[name]` as an object, inserting an empty one when absent.
fn object_member<'a>(
    map: &'a mut Map<String, Value>,
    name: &str,
    owner: &str,
) -> Result<&'a mut Map<String, Value>, CatalogError> {
    match map
        .entry(name)
        .or_insert_with(|| Value::Object(Map::new()))
    {
        Value::Object(object) => Ok(object),
        _ => Err(CatalogError::Invalid(format!(
            "`{name}` in `{owner}` is not an object"
        ))),
    }
}

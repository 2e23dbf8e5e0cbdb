use std::fs;
use std::path::Path;

use super::progress::TranslatedStrings;
use crate::catalog::{Catalog, CatalogError, LocalizationState, StringUnit};
use crate::fs::atomic_write;

/// Applies `translations` to the `target_language` localizations of a copy of `catalog`.
///
/// Blank translations are written with state `new` so that the next run picks
/// them up again.
pub fn merge(
    catalog: &Catalog,
    target_language: &str,
    translations: &TranslatedStrings,
) -> Result<Catalog, CatalogError> {
    let mut merged = catalog.clone();
    for (key, text) in translations {
        let state = if text.trim().is_empty() {
            LocalizationState::New
        } else {
            LocalizationState::Translated
        };
        merged.set_string_unit(key, target_language, &StringUnit::new(state, text.as_str()))?;
    }
    Ok(merged)
}

/// Writes `catalog` to `path` atomically, then re-reads and re-parses the file.
pub fn write_catalog(path: &Path, catalog: &Catalog) -> Result<(), CatalogError> {
    let contents = catalog.to_json_string()?;
    atomic_write(path, &contents).map_err(|source| CatalogError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    let written = fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Catalog::parse(&written).map_err(|e| CatalogError::Validation {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    crate::debug!("Wrote and validated {}", path.display());
    Ok(())
}

use anyhow::{Context, Result, bail};
use inquire::Select;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use crate::ui::Style;

/// File name Xcode gives the default string catalog.
pub const CATALOG_FILE_NAME: &str = "Localizable.xcstrings";

/// Finds every `Localizable.xcstrings` below `root`, sorted.
pub fn find_catalogs(root: &Path) -> Result<Vec<PathBuf>> {
    let pattern = root.join("**").join(CATALOG_FILE_NAME);
    let pattern = pattern
        .to_str()
        .context("Search path is not valid UTF-8")?;

    let mut found: Vec<PathBuf> = glob::glob(pattern)
        .context("Invalid catalog search pattern")?
        .filter_map(Result::ok)
        .filter(|path| !is_hidden_or_build_output(path.strip_prefix(root).unwrap_or(path)))
        .collect();
    found.sort();
    Ok(found)
}

fn is_hidden_or_build_output(relative: &Path) -> bool {
    relative.components().any(|c| {
        let name = c.as_os_str().to_string_lossy();
        (name.starts_with('.') && name != ".") || name == "DerivedData" || name == "build"
    })
}

/// Returns `explicit` if it exists, otherwise searches `root`.
///
/// With several candidates the user picks one; without a terminal that is an error.
pub fn resolve_catalog(explicit: Option<&Path>, root: &Path) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if !path.is_file() {
            bail!("Catalog not found: {}", path.display());
        }
        return Ok(path.to_path_buf());
    }

    let mut found = find_catalogs(root)?;
    match found.len() {
        0 => bail!(
            "No {CATALOG_FILE_NAME} files found\n\n\
             Please provide the path:\n  \
             xctr path/to/{CATALOG_FILE_NAME}"
        ),
        1 => {
            let path = found.remove(0);
            crate::info!("Found catalog: {}", Style::value(path.display()));
            Ok(path)
        }
        _ if !std::io::stdin().is_terminal() => bail!(
            "Multiple {CATALOG_FILE_NAME} files found:\n  - {}\n\n\
             Please provide the path explicitly",
            found
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join("\n  - ")
        ),
        _ => {
            let options: Vec<String> = found.iter().map(|p| p.display().to_string()).collect();
            let choice = Select::new("Multiple catalogs found. Choose file:", options).prompt()?;
            Ok(PathBuf::from(choice))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "{}").unwrap();
    }

    #[test]
    fn test_find_catalogs_recursively() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "App/Resources/Localizable.xcstrings");
        touch(temp_dir.path(), "Widget/Localizable.xcstrings");
        touch(temp_dir.path(), "App/InfoPlist.xcstrings");

        let found = find_catalogs(temp_dir.path()).unwrap();
        assert_eq!(
            found,
            vec![
                temp_dir.path().join("App/Resources/Localizable.xcstrings"),
                temp_dir.path().join("Widget/Localizable.xcstrings"),
            ]
        );
    }

    #[test]
    fn test_find_catalogs_skips_build_output() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "App/Localizable.xcstrings");
        touch(temp_dir.path(), "build/App/Localizable.xcstrings");

        let found = find_catalogs(temp_dir.path()).unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_resolve_single_catalog() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "App/Localizable.xcstrings");

        let path = resolve_catalog(None, temp_dir.path()).unwrap();
        assert!(path.ends_with("App/Localizable.xcstrings"));
    }

    #[test]
    fn test_resolve_explicit_missing_path() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("Missing.xcstrings");

        let err = resolve_catalog(Some(&missing), temp_dir.path()).unwrap_err();
        assert!(err.to_string().contains("Catalog not found"));
    }

    #[test]
    fn test_resolve_nothing_found() {
        let temp_dir = TempDir::new().unwrap();
        let err = resolve_catalog(None, temp_dir.path()).unwrap_err();
        assert!(err.to_string().contains("No Localizable.xcstrings files found"));
    }
}

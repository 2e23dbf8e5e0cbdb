#![allow(clippy::unwrap_used)]
//! End-to-end tests of the translation job against an in-memory provider.
//!
//! These cover the full pipeline: extraction, batching, progress files,
//! merging, the final catalog write, and resuming an interrupted run.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

use xctr_cli::catalog::{Catalog, LocalizationState};
use xctr_cli::engine::{
    CancelToken, FixedPolicy, JobOutcome, ProgressStore, RecoveryAction, RetryPolicy, Scheduler,
    TranslatedStrings, TranslationJob,
};
use xctr_cli::translation::{
    DeepLCapabilities, ProviderFailure, ProviderOptions, TranslationProvider,
};

/// Looks texts up in a dictionary, falling back to upper-casing.
///
/// Cancels `cancel_after` once that many calls have been answered.
#[derive(Default)]
struct DictionaryProvider {
    dictionary: HashMap<String, String>,
    calls: Mutex<Vec<usize>>,
    cancel_after: Option<(usize, CancelToken)>,
}

impl DictionaryProvider {
    fn with(pairs: &[(&str, &str)]) -> Self {
        Self {
            dictionary: pairs
                .iter()
                .map(|(from, to)| ((*from).to_string(), (*to).to_string()))
                .collect(),
            ..Self::default()
        }
    }

    fn call_sizes(&self) -> Vec<usize> {
        self.calls.lock().unwrap().clone()
    }
}

impl TranslationProvider for DictionaryProvider {
    async fn translate(
        &self,
        texts: &[String],
        _source_language: &str,
        _target_language: &str,
        _options: &ProviderOptions,
    ) -> Result<Vec<String>, ProviderFailure> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(texts.len());
        if let Some((after, token)) = &self.cancel_after
            && calls.len() >= *after
        {
            token.cancel();
        }
        Ok(texts
            .iter()
            .map(|t| {
                self.dictionary
                    .get(t)
                    .cloned()
                    .unwrap_or_else(|| t.to_uppercase())
            })
            .collect())
    }
}

fn write_catalog_file(dir: &TempDir, text: &str) -> PathBuf {
    let path = dir.path().join("Localizable.xcstrings");
    fs::write(&path, text).unwrap();
    path
}

fn numbered_catalog(count: usize) -> String {
    let strings: serde_json::Map<String, serde_json::Value> = (0..count)
        .map(|i| (format!("key {i:03}"), serde_json::json!({})))
        .collect();
    let mut text = serde_json::to_string_pretty(&serde_json::json!({
        "sourceLanguage": "en",
        "strings": strings,
        "version": "1.0",
    }))
    .unwrap();
    text.push('\n');
    text
}

async fn run_job(
    path: &Path,
    provider: &DictionaryProvider,
    batch_size: usize,
    cancel: CancelToken,
) -> JobOutcome {
    let catalog = Catalog::load(path).unwrap();
    let job = TranslationJob {
        catalog_path: path,
        catalog: &catalog,
        target_language: "de",
        batch_size,
        formality: None,
        retry: RetryPolicy::default(),
    };
    let mut prompt = FixedPolicy(RecoveryAction::Skip);
    let mut scheduler = Scheduler {
        provider,
        capabilities: &DeepLCapabilities,
        prompt: &mut prompt,
        observer: &(),
        cancel,
    };
    job.run(&mut scheduler).await.unwrap()
}

#[tokio::test]
async fn test_translations_are_merged_into_catalog() {
    let dir = TempDir::new().unwrap();
    let path = write_catalog_file(
        &dir,
        r#"{
  "sourceLanguage" : "en",
  "strings" : {
    "Hello" : {
      "localizations" : {
        "de" : {
          "stringUnit" : {
            "state" : "new",
            "value" : ""
          }
        }
      }
    },
    "Blank" : {

    }
  },
  "version" : "1.0"
}
"#,
    );
    let provider = DictionaryProvider::with(&[("Hello", "Hallo"), ("Blank", "  ")]);

    let outcome = run_job(&path, &provider, 20, CancelToken::new()).await;

    let JobOutcome::Completed(summary) = outcome else {
        panic!("expected a completed run");
    };
    assert_eq!(summary.translated, 1);
    assert_eq!(summary.skipped_empty, 1);
    assert!(summary.skipped_batches.is_empty());

    let catalog = Catalog::load(&path).unwrap();
    let hello = catalog.entry("Hello").unwrap().localization("de").unwrap();
    assert!(hello.is_complete());
    assert_eq!(hello.value(), Some("Hallo"));

    let blank = catalog.entry("Blank").unwrap().localization("de").unwrap();
    let unit = blank.string_unit.as_ref().unwrap();
    assert_eq!(unit.state, LocalizationState::New);
    assert!(!blank.is_complete());

    assert!(!ProgressStore::for_catalog(&path, "de").has_progress());
}

#[tokio::test]
async fn test_batches_follow_batch_size() {
    let dir = TempDir::new().unwrap();
    let path = write_catalog_file(&dir, &numbered_catalog(101));
    let provider = DictionaryProvider::default();

    let outcome = run_job(&path, &provider, 50, CancelToken::new()).await;

    assert!(matches!(outcome, JobOutcome::Completed(ref s) if s.translated == 101));
    assert_eq!(provider.call_sizes(), vec![50, 50, 1]);

    let catalog = Catalog::load(&path).unwrap();
    let last = catalog.entry("key 100").unwrap().localization("de").unwrap();
    assert_eq!(last.value(), Some("KEY 100"));
}

#[tokio::test]
async fn test_cancelled_run_resumes_where_it_stopped() {
    let dir = TempDir::new().unwrap();
    let path = write_catalog_file(&dir, &numbered_catalog(25));
    let original = fs::read_to_string(&path).unwrap();

    let cancel = CancelToken::new();
    let first = DictionaryProvider {
        cancel_after: Some((1, cancel.clone())),
        ..DictionaryProvider::default()
    };
    let outcome = run_job(&path, &first, 10, cancel).await;

    let JobOutcome::Cancelled {
        saved,
        progress_path,
        ..
    } = outcome
    else {
        panic!("expected a cancelled run");
    };
    assert_eq!(saved, 10);
    assert!(progress_path.exists());
    assert_eq!(first.call_sizes(), vec![10]);
    assert_eq!(fs::read_to_string(&path).unwrap(), original);

    let second = DictionaryProvider::default();
    let outcome = run_job(&path, &second, 10, CancelToken::new()).await;

    let JobOutcome::Completed(summary) = outcome else {
        panic!("expected a completed run");
    };
    assert_eq!(summary.translated, 15);
    assert_eq!(second.call_sizes(), vec![10, 5]);
    assert!(!progress_path.exists());

    let catalog = Catalog::load(&path).unwrap();
    for i in 0..25 {
        let key = format!("key {i:03}");
        let localization = catalog.entry(&key).unwrap().localization("de").unwrap();
        assert!(localization.is_complete(), "{key} should be translated");
    }
}

#[tokio::test]
async fn test_saved_progress_is_merged_when_nothing_is_outstanding() {
    let dir = TempDir::new().unwrap();
    let path = write_catalog_file(&dir, &numbered_catalog(2));

    let store = ProgressStore::for_catalog(&path, "de");
    let saved: TranslatedStrings = [
        ("key 000".to_string(), "null".to_string()),
        ("key 001".to_string(), "eins".to_string()),
    ]
    .into_iter()
    .collect();
    store.save(&saved).unwrap();

    let provider = DictionaryProvider::default();
    let outcome = run_job(&path, &provider, 20, CancelToken::new()).await;

    assert!(matches!(outcome, JobOutcome::Completed(ref s) if s.translated == 0));
    assert!(provider.call_sizes().is_empty());
    assert!(!store.has_progress());

    let catalog = Catalog::load(&path).unwrap();
    let one = catalog.entry("key 001").unwrap().localization("de").unwrap();
    assert_eq!(one.value(), Some("eins"));
}

#[tokio::test]
async fn test_completed_catalog_is_left_untouched() {
    let dir = TempDir::new().unwrap();
    let text = r#"{
  "sourceLanguage" : "en",
  "strings" : {
    "Hello" : {
      "localizations" : {
        "de" : {
          "stringUnit" : {
            "state" : "translated",
            "value" : "Hallo"
          }
        }
      }
    }
  },
  "version" : "1.0"
}
"#;
    let path = write_catalog_file(&dir, text);
    let provider = DictionaryProvider::default();

    let outcome = run_job(&path, &provider, 20, CancelToken::new()).await;

    assert!(matches!(outcome, JobOutcome::Completed(ref s) if s.translated == 0));
    assert!(provider.call_sizes().is_empty());
    assert_eq!(fs::read_to_string(&path).unwrap(), text);
}

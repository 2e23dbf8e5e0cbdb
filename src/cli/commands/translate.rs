//! Translate command: the interactive front end of a translation run.

use anyhow::{Context, Result, bail};
use inquire::{Confirm, InquireError, Select};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use super::status::{describe_language, ranked_languages};
use crate::catalog::Catalog;
use crate::cli::OnError;
use crate::cli::discovery::resolve_catalog;
use crate::config::{ConfigManager, ResolveOptions, ResolvedConfig, resolve_config};
use crate::engine::{
    CancelToken, EngineError, FixedPolicy, JobOutcome, ProgressStore, RecoveryAction,
    RecoveryPrompt, RetryPolicy, Scheduler, TranslationJob, TranslationSummary,
};
use crate::fs::create_backup;
use crate::translation::{
    CapabilityLookup, DeepLCapabilities, DeepLClient, Formality, ProviderFailure,
    display_language, language_name,
};
use crate::ui::{BatchProgress, InteractiveRecovery, Spinner, Style, is_prompt_cancelled};

pub struct TranslateOptions {
    pub catalog: Option<PathBuf>,
    pub to: Option<String>,
    pub formality: Option<String>,
    pub batch_size: Option<usize>,
    pub free_api: bool,
    pub api_key: Option<String>,
    pub fresh: bool,
    pub on_error: OnError,
}

/// A finished run and where its backup lives.
#[derive(Debug)]
pub struct TranslationReport {
    pub summary: TranslationSummary,
    pub backup_path: PathBuf,
}

#[derive(Debug)]
pub enum TranslateOutcome {
    Completed(TranslationReport),
    /// The user quit. Saved progress is kept for the next run.
    Cancelled,
}

pub async fn run_translate(options: TranslateOptions) -> Result<TranslateOutcome> {
    match translate(options).await {
        Err(e)
            if e.downcast_ref::<InquireError>()
                .is_some_and(is_prompt_cancelled) =>
        {
            eprintln!();
            crate::warn!("{}", Style::warning("Cancelled"));
            Ok(TranslateOutcome::Cancelled)
        }
        other => other,
    }
}

async fn translate(options: TranslateOptions) -> Result<TranslateOutcome> {
    let interactive = std::io::stdin().is_terminal();
    let config = load_config(&options)?;

    let client = DeepLClient::new(config.endpoint.clone(), config.api_key.clone());
    validate_api_key(&client).await?;

    let catalog_path = resolve_catalog(options.catalog.as_deref(), Path::new("."))?;
    let catalog = Catalog::load(&catalog_path)
        .with_context(|| format!("Failed to load catalog: {}", catalog_path.display()))?;

    let capabilities = DeepLCapabilities;
    let target_language = select_target_language(
        &catalog,
        &capabilities,
        options.to.as_deref(),
        interactive,
    )?;
    let formality = select_formality(
        &capabilities,
        &target_language,
        config.formality,
        interactive,
    )?;

    let backup_path = create_backup(&catalog_path)?;
    crate::info!("Backup created: {}", Style::secondary(backup_path.display()));

    let retry = RetryPolicy::default();
    let job = TranslationJob {
        catalog_path: &catalog_path,
        catalog: &catalog,
        target_language: &target_language,
        batch_size: config.batch_size,
        formality,
        retry,
    };

    let store = job.progress_store();
    offer_resume(&store, options.fresh, interactive)?;

    let outstanding = job.outstanding(&store).len();
    let progress = if outstanding == 0 {
        BatchProgress::hidden()
    } else {
        BatchProgress::new(outstanding)
    };
    let mut prompt: Box<dyn RecoveryPrompt> = match (options.on_error, interactive) {
        (OnError::Ask, true) => Box::new(InteractiveRecovery::new(
            progress.clone(),
            retry.rate_limit_delay,
        )),
        (OnError::Ask | OnError::Skip, _) => Box::new(FixedPolicy(RecoveryAction::Skip)),
        (OnError::Retry, _) => Box::new(FixedPolicy(RecoveryAction::Retry)),
        (OnError::Abort, _) => Box::new(FixedPolicy(RecoveryAction::Abort)),
    };

    let cancel = CancelToken::new();
    let signal = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                crate::warn!(
                    "\n{} Stopping after the current batch...",
                    Style::warning("Interrupted.")
                );
                cancel.cancel();
            }
        })
    };

    let mut scheduler = Scheduler {
        provider: &client,
        capabilities: &capabilities,
        prompt: prompt.as_mut(),
        observer: &progress,
        cancel,
    };
    let result = job.run(&mut scheduler).await;
    signal.abort();
    progress.finish();

    match result.map_err(explain_engine_error)? {
        JobOutcome::Completed(summary) => {
            print_summary(&summary, &backup_path);
            Ok(TranslateOutcome::Completed(TranslationReport {
                summary,
                backup_path,
            }))
        }
        JobOutcome::Cancelled {
            saved,
            progress_path,
            ..
        } => {
            crate::warn!(
                "{} {saved} translations saved to {}\n\
                 Run xctr again to continue where you left off.",
                Style::warning("Translation cancelled."),
                progress_path.display()
            );
            Ok(TranslateOutcome::Cancelled)
        }
    }
}

fn load_config(options: &TranslateOptions) -> Result<ResolvedConfig> {
    let manager = ConfigManager::new()?;
    let file = manager.load_or_default()?;
    resolve_config(
        &ResolveOptions {
            api_key: options.api_key.clone(),
            free_api: options.free_api,
            batch_size: options.batch_size,
            formality: options.formality.clone(),
        },
        &file,
    )
}

async fn validate_api_key(client: &DeepLClient) -> Result<()> {
    let spinner = Spinner::new("Validating DeepL API key...");
    let usage = client.usage().await;
    spinner.stop();

    match usage {
        Ok(usage) => {
            crate::info!(
                "{} DeepL API key validated ({} of {} characters used)",
                Style::success("✓"),
                usage.character_count,
                usage.character_limit
            );
            Ok(())
        }
        Err(ProviderFailure::Unauthorized) => bail!(
            "Invalid DeepL API key\n\n\
             Get one at: https://www.deepl.com/pro#developer"
        ),
        Err(failure) => bail!("DeepL API connection failed: {failure}"),
    }
}

/// Picks the target language from `--to` or, interactively, from the catalog's languages.
fn select_target_language<C: CapabilityLookup>(
    catalog: &Catalog,
    capabilities: &C,
    requested: Option<&str>,
    interactive: bool,
) -> Result<String> {
    let available = catalog.target_languages();
    let (supported, unsupported) = capabilities.partition(&available);

    if !unsupported.is_empty() {
        crate::warn!(
            "{} Languages not supported by DeepL: {}",
            Style::warning("Warning:"),
            unsupported
                .iter()
                .map(|code| display_language(code))
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    if supported.is_empty() {
        bail!("No DeepL-supported languages found in the catalog");
    }

    if let Some(code) = requested {
        if !available.iter().any(|l| l == code) {
            bail!(
                "Language '{code}' not found in catalog\n\n\
                 Available: {}",
                available.join(", ")
            );
        }
        if !supported.iter().any(|l| l == code) {
            bail!("Language '{code}' is not supported by DeepL");
        }
        return Ok(code.to_string());
    }

    if !interactive {
        bail!(
            "Missing target language\n\n\
             Please provide it via:\n  \
             - CLI option: xctr --to <lang>\n\n\
             Available: {}",
            supported.join(", ")
        );
    }

    let ranked = ranked_languages(catalog, &supported);
    let labels: Vec<String> = ranked
        .iter()
        .map(|(code, stats)| describe_language(code, stats, capabilities.supports_formality(code)))
        .collect();
    let choice = Select::new("Choose target language:", labels.clone()).prompt()?;
    let index = labels.iter().position(|l| *l == choice).unwrap_or(0);
    Ok(ranked[index].0.clone())
}

/// Explicit formality wins; formality-capable targets ask; everything else sends none.
fn select_formality<C: CapabilityLookup>(
    capabilities: &C,
    target_language: &str,
    configured: Option<Formality>,
    interactive: bool,
) -> Result<Option<Formality>> {
    if configured.is_some() {
        return Ok(configured);
    }
    if !interactive || !capabilities.supports_formality(target_language) {
        return Ok(None);
    }

    let labels: Vec<&str> = Formality::ALL.iter().map(|f| f.label()).collect();
    let choice = Select::new(
        &format!(
            "{} supports formality options. Choose style:",
            language_name(target_language)
        ),
        labels,
    )
    .prompt()?;

    Ok(Formality::ALL
        .into_iter()
        .find(|f| f.label() == choice)
        .filter(|f| *f != Formality::Default))
}

/// Keeps or discards saved progress from an earlier run.
fn offer_resume(store: &ProgressStore, fresh: bool, interactive: bool) -> Result<()> {
    if !store.has_progress() {
        return Ok(());
    }

    let summary = store.summary();
    if fresh {
        crate::info!("Discarding {} saved translations (--fresh)", summary.count);
        return store
            .cleanup()
            .with_context(|| format!("Failed to remove {}", store.path().display()));
    }

    let when = summary
        .last_updated
        .map(|t| format!(", last updated {}", t.format("%Y-%m-%d %H:%M")))
        .unwrap_or_default();
    crate::status!(
        "Found existing progress: {} strings translated{when}",
        Style::value(summary.count)
    );

    if !interactive {
        return Ok(());
    }

    let resume = Confirm::new("Continue from where you left off?")
        .with_default(true)
        .prompt()?;
    if !resume {
        store
            .cleanup()
            .with_context(|| format!("Failed to remove {}", store.path().display()))?;
    }
    Ok(())
}

fn explain_engine_error(error: EngineError) -> anyhow::Error {
    match error {
        EngineError::Unauthorized => anyhow::anyhow!(
            "Invalid DeepL API key\n\n\
             Saved progress is kept; fix the key and run xctr again."
        ),
        EngineError::QuotaExceeded => anyhow::anyhow!(
            "DeepL quota exceeded\n\n\
             Upgrade your plan or wait for the reset; saved progress is kept."
        ),
        EngineError::Aborted { batch } => anyhow::anyhow!(
            "Translation aborted by user at batch {batch}\n\n\
             Saved progress is kept; run xctr again to continue."
        ),
        other => anyhow::Error::new(other),
    }
}

fn print_summary(summary: &TranslationSummary, backup_path: &Path) {
    crate::status!("{}", Style::success("Translation completed!"));
    crate::status!(
        "Translated {} strings for {}",
        Style::value(summary.translated),
        display_language(&summary.target_language)
    );
    if summary.skipped_empty > 0 {
        crate::status!(
            "{} strings came back empty and stay untranslated",
            Style::value(summary.skipped_empty)
        );
    }
    if !summary.skipped_batches.is_empty() {
        crate::warn!(
            "{} Skipped batches: {}. Run xctr again to retry them.",
            Style::warning("Warning:"),
            summary
                .skipped_batches
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    crate::status!("Backup saved: {}", Style::secondary(backup_path.display()));
    crate::status!(
        "{}",
        Style::hint("You can delete the backup after verifying the results")
    );
}

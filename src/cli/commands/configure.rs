//! Configure command handler for editing default settings.

use anyhow::Result;
use inquire::validator::Validation;
use inquire::{Confirm, CustomType, Select, Text};

use crate::config::{ConfigFile, ConfigManager, DEFAULT_API_KEY_ENV, DEFAULT_BATCH_SIZE, XctrConfig};
use crate::engine::{MAX_BATCH_SIZE, MIN_BATCH_SIZE};
use crate::translation::Formality;
use crate::ui::{Style, handle_prompt_cancellation};

/// Label for "no default formality" in the formality menu.
const ASK_EACH_TIME: &str = "(ask each time)";

/// Runs the configure command.
///
/// With `show`, prints the current settings. Otherwise asks for each default
/// and saves the result.
pub fn run_configure(show: bool) -> Result<()> {
    if show {
        let manager = ConfigManager::new()?;
        let config = manager.load_or_default()?;
        print_config(&config, &manager);
        return Ok(());
    }
    handle_prompt_cancellation(run_configure_inner)
}

fn run_configure_inner() -> Result<()> {
    let manager = ConfigManager::new()?;
    let mut config = manager.load_or_default()?;

    print_config(&config, &manager);

    let current = &config.xctr;
    let api_key_env = Text::new("Environment variable holding the API key:")
        .with_default(current.api_key_env())
        .prompt()?;

    let free_api = Confirm::new("Always use the DeepL Free API host?")
        .with_default(current.free_api.unwrap_or(false))
        .with_help_message("Keys ending in :fx use the Free host automatically")
        .prompt()?;

    let batch_size = CustomType::<usize>::new("Strings per API call:")
        .with_default(current.batch_size.unwrap_or(DEFAULT_BATCH_SIZE))
        .with_validator(|size: &usize| {
            Ok(if (MIN_BATCH_SIZE..=MAX_BATCH_SIZE).contains(size) {
                Validation::Valid
            } else {
                Validation::Invalid(
                    format!("Must be between {MIN_BATCH_SIZE} and {MAX_BATCH_SIZE}").into(),
                )
            })
        })
        .prompt()?;

    let formality = select_formality(current.formality.as_deref())?;

    config.xctr = XctrConfig {
        api_key: current.api_key.clone(),
        api_key_env: (api_key_env != DEFAULT_API_KEY_ENV).then_some(api_key_env),
        free_api: free_api.then_some(true),
        endpoint: current.endpoint.clone(),
        batch_size: (batch_size != DEFAULT_BATCH_SIZE).then_some(batch_size),
        formality,
    };

    manager.save(&config)?;

    println!();
    println!(
        "{} Configuration saved to {}",
        Style::success("✓"),
        Style::secondary(manager.config_path().display())
    );

    Ok(())
}

fn select_formality(current: Option<&str>) -> Result<Option<String>> {
    let mut options = vec![ASK_EACH_TIME];
    options.extend(Formality::ALL.iter().map(|f| f.as_str()));

    let default_index = current
        .and_then(|c| options.iter().position(|o| *o == c))
        .unwrap_or(0);

    let selection = Select::new("Default formality:", options)
        .with_starting_cursor(default_index)
        .prompt()?;

    Ok((selection != ASK_EACH_TIME).then(|| selection.to_string()))
}

fn print_config(config: &ConfigFile, manager: &ConfigManager) {
    let not_set = || Style::secondary("(not set)");
    let xctr = &config.xctr;

    println!(
        "{} {}",
        Style::header("Configuration"),
        Style::secondary(manager.config_path().display())
    );
    println!(
        "  {}     {}",
        Style::label("api_key"),
        if xctr.api_key.is_some() {
            Style::value("(set in config file)")
        } else {
            not_set()
        }
    );
    println!(
        "  {} {}",
        Style::label("api_key_env"),
        Style::value(xctr.api_key_env())
    );
    println!(
        "  {}    {}",
        Style::label("free_api"),
        xctr.free_api
            .map_or_else(|| Style::secondary("(from key suffix)"), Style::value)
    );
    println!(
        "  {}    {}",
        Style::label("endpoint"),
        xctr.endpoint.as_deref().map_or_else(not_set, Style::value)
    );
    println!(
        "  {}  {}",
        Style::label("batch_size"),
        Style::value(xctr.batch_size.unwrap_or(DEFAULT_BATCH_SIZE))
    );
    println!(
        "  {}   {}",
        Style::label("formality"),
        xctr.formality.as_deref().map_or_else(not_set, Style::value)
    );
    println!();
}

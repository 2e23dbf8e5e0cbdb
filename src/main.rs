use anyhow::Result;
use clap::Parser;

use xctr_cli::cli::commands::translate::{TranslateOptions, TranslateOutcome};
use xctr_cli::cli::commands::{configure, languages, status, translate};
use xctr_cli::cli::{Args, Command};
use xctr_cli::output::{self, OutputConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    output::init(OutputConfig {
        quiet: args.quiet,
        verbose: args.verbose,
        no_color: args.no_color || std::env::var("NO_COLOR").is_ok(),
    });

    match args.command {
        Some(Command::Status { catalog }) => {
            status::print_status(catalog.as_deref())?;
        }
        Some(Command::Languages) => {
            languages::print_languages();
        }
        Some(Command::Configure { show }) => {
            configure::run_configure(show)?;
        }
        None => {
            let options = TranslateOptions {
                catalog: args.catalog,
                to: args.to,
                formality: args.formality,
                batch_size: args.batch_size,
                free_api: args.free_api,
                api_key: args.api_key,
                fresh: args.fresh,
                on_error: args.on_error,
            };
            if let TranslateOutcome::Cancelled = translate::run_translate(options).await? {
                output::flush_stderr();
                std::process::exit(exitcode::TEMPFAIL);
            }
        }
    }

    Ok(())
}

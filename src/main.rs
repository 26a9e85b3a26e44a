use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

use mdtl_cli::cli::commands::extract::{self, ExtractOptions};
use mdtl_cli::cli::commands::{providers, translate};
use mdtl_cli::cli::{Args, Command};
use mdtl_cli::config::ResolveOptions;
use mdtl_cli::error::ConfigurationError;
use mdtl_cli::output::{self, OutputConfig};
use mdtl_cli::translation::print_languages;
use mdtl_cli::ui::Style;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    output::init(OutputConfig {
        quiet: args.quiet,
        no_color: args.no_color || OutputConfig::default().no_color,
    });
    init_logging(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", Style::error("Error:"));
            ExitCode::from(exit_code(&e))
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "off" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn exit_code(error: &anyhow::Error) -> u8 {
    let code = if error.downcast_ref::<ConfigurationError>().is_some() {
        exitcode::CONFIG
    } else if error.downcast_ref::<std::io::Error>().is_some() {
        exitcode::IOERR
    } else {
        exitcode::SOFTWARE
    };
    u8::try_from(code).unwrap_or(1)
}

async fn run(args: Args) -> Result<()> {
    match args.command {
        Some(Command::Languages) => {
            print_languages();
        }
        Some(Command::Providers { provider }) => {
            providers::print_providers(provider.as_deref())?;
        }
        Some(Command::Extract {
            file,
            tagged,
            markdown,
        }) => {
            let options = ExtractOptions {
                file: file.as_deref(),
                tagged,
                markdown: markdown.apply(extract::configured_markdown_options()?),
            };
            extract::run_extract(&options)?;
        }
        None => {
            let options = translate::TranslateOptions {
                files: args.files,
                resolve: ResolveOptions {
                    provider: args.provider,
                    model: args.model,
                    from: args.from,
                    to: args.to,
                    multi: args.multi,
                },
                no_cache: args.no_cache,
                write: args.write,
                output_dir: args.output_dir,
                overrides: translate::OptionOverrides {
                    raw: args.raw,
                    context: args.context,
                    markdown: args.markdown,
                    remove_chars: args.remove_chars,
                    retry_count: args.retry_count,
                    retry_timeout: args.retry_timeout,
                    concurrency: args.concurrency,
                },
            };
            translate::run_translate(options).await?;
        }
    }

    Ok(())
}

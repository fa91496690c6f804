//! formsmith CLI entrypoint
//! Parses command-line arguments and dispatches to the template registry.
#![deny(unsafe_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

// External imports (alphabetized)
use anyhow::Context;
use clap::{CommandFactory, Parser};
use tracing::{Level, debug, info};
use tracing_subscriber::EnvFilter;

use formsmith::application::{Dispatcher, RunMode, parse_param};
use formsmith::core::Config;
use formsmith::templates::{Registry, RenderContext, TemplateOptions};

/// Exit status for malformed invocations, matching clap's own usage errors
const USAGE_EXIT_CODE: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "formsmith")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// List available templates
    #[arg(long)]
    list: bool,

    /// Generate a single template by name
    #[arg(long, value_name = "NAME")]
    template: Option<String>,

    /// Generate every registered template
    #[arg(long)]
    all: bool,

    /// Output directory (defaults to the configured output_dir)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,

    /// Draw static placeholder cells instead of fillable form fields
    #[arg(long)]
    no_fillable: bool,

    /// Named template parameter, repeatable (e.g. --param title="Renewal Form")
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
    params: Vec<(String, String)>,

    /// Configuration file (TOML)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Asset directory containing logos/
    #[arg(long, value_name = "DIR")]
    assets: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mode = match RunMode::from_flags(cli.list, cli.template.clone(), cli.all) {
        Ok(mode) => mode,
        Err(e) => {
            eprintln!("error: {e}\n");
            eprintln!("{}", Cli::command().render_usage());
            return ExitCode::from(USAGE_EXIT_CODE);
        }
    };

    init_tracing(&cli);

    match run(cli, mode) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize logging on stderr; `RUST_LOG` wins over the verbosity flags
fn init_tracing(cli: &Cli) {
    let level = if cli.quiet {
        Level::ERROR
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli, mode: RunMode) -> anyhow::Result<ExitCode> {
    let registry = Registry::discover();
    debug!(templates = ?registry.names(), "Registry built");

    if !mode.generates() {
        print_list(&registry);
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(output) = cli.output {
        config.paths.output_dir = output;
    }
    if let Some(assets) = cli.assets {
        config.paths.assets_dir = assets;
    }

    let options = TemplateOptions {
        fillable: !cli.no_fillable,
        params: cli.params.into_iter().collect::<BTreeMap<_, _>>(),
    };
    let ctx = RenderContext::new(&config, &options);

    info!(
        mode = %mode,
        output_dir = %config.paths.output_dir.display(),
        fillable = options.fillable,
        "Starting formsmith"
    );

    let dispatcher = Dispatcher::new(&registry, &config.paths.output_dir);
    let report = dispatcher.run(&mode, &ctx).with_context(|| {
        format!(
            "Failed to create output directory {}",
            config.paths.output_dir.display()
        )
    })?;

    let output = report.render(cli.quiet);
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(ExitCode::from(report.exit_code() as u8))
}

fn print_list(registry: &Registry) {
    let names = registry.names();
    if names.is_empty() {
        println!("No templates found.");
        return;
    }
    println!("Available templates:");
    for name in names {
        println!("  {name}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_params_parse_into_pairs() {
        let cli = Cli::parse_from([
            "formsmith",
            "--all",
            "--param",
            "title=Renewal Form",
            "--param",
            "year=2026",
        ]);
        assert_eq!(
            cli.params,
            vec![
                ("title".to_string(), "Renewal Form".to_string()),
                ("year".to_string(), "2026".to_string()),
            ]
        );
    }

    #[test]
    fn test_malformed_param_is_rejected() {
        assert!(Cli::try_parse_from(["formsmith", "--all", "--param", "oops"]).is_err());
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["formsmith", "--all", "-v", "-q"]).is_err());
    }
}

mod cli;

use clap::Parser;
use cli::{Args, Settings};
use depgraph_sbom::adapters::outbound::console::StderrProgressReporter;
use depgraph_sbom::adapters::outbound::filesystem::FileSystemReader;
use depgraph_sbom::adapters::outbound::network::{
    CachingDependencyRepository, ClientConfig, DepsDevClient,
};
use depgraph_sbom::application::dto::{GraphRequest, OutputFormat};
use depgraph_sbom::application::factories::{FormatterFactory, PresenterFactory, PresenterType};
use depgraph_sbom::application::use_cases::ResolveGraphUseCase;
use depgraph_sbom::config::{discover_config, load_config_from_path, ConfigFile};
use depgraph_sbom::graph_resolution::services::GraphBuilderOptions;
use depgraph_sbom::shared::error::ExitCode;
use depgraph_sbom::shared::Result;
use std::env;
use std::io::IsTerminal;
use std::process;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() {
                ExitCode::InvalidArguments
            } else {
                ExitCode::Success
            };
            let _ = e.print();
            process::exit(code.as_i32());
        }
    };

    init_tracing();

    match run(args).await {
        Ok(code) => process::exit(code.as_i32()),
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            // Display error chain
            for cause in e.chain().skip(1) {
                eprintln!("\nCaused by: {}", cause);
            }

            eprintln!();
            process::exit(ExitCode::ApplicationError.as_i32());
        }
    }
}

/// Diagnostics go to stderr; `DEPGRAPH_LOG` filters, `DEPGRAPH_LOG_FORMAT=json` switches layout
fn init_tracing() {
    let filter = EnvFilter::try_from_env("DEPGRAPH_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let format = env::var("DEPGRAPH_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn load_config(args: &Args) -> Result<Option<ConfigFile>> {
    match &args.config {
        Some(path) => load_config_from_path(path).map(Some),
        None => discover_config(&env::current_dir()?),
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    let config = load_config(&args)?;
    let settings = Settings::merge(args, config)?;

    // Create adapters (Dependency Injection)
    let client = DepsDevClient::new(ClientConfig {
        base_url: settings.base_url.clone(),
        timeout: settings.timeout,
        max_concurrency: settings.concurrency,
        ..ClientConfig::default()
    })?;
    let use_case = ResolveGraphUseCase::new(
        FileSystemReader::new(),
        CachingDependencyRepository::new(client),
        StderrProgressReporter::new(),
    );

    let request = GraphRequest::new(settings.input.clone(), settings.coordinates.clone())
        .with_exclusions(settings.exclude.clone())
        .with_overrides(settings.overrides.clone())
        .with_options(GraphBuilderOptions {
            concurrency: settings.concurrency,
            continue_on_error: settings.continue_on_error,
        });

    let response = use_case.execute(request).await?;

    eprintln!("{}", FormatterFactory::progress_message(settings.format));
    let formatter = FormatterFactory::create(settings.format, use_color(&settings));
    let output = formatter.format(&response.graph)?;

    let presenter = PresenterFactory::create(PresenterType::from_output(settings.output));
    presenter.present(&output)?;

    if response.is_partial() {
        Ok(ExitCode::PartialGraph)
    } else {
        Ok(ExitCode::Success)
    }
}

fn use_color(settings: &Settings) -> bool {
    settings.format == OutputFormat::Tree
        && !settings.no_color
        && settings.output.is_none()
        && env::var_os("NO_COLOR").is_none()
        && std::io::stdout().is_terminal()
}

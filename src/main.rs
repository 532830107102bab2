use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use hepref::config::{find_config_file, get_config, load_config, Config};
use hepref::ui::Console;
use hepref::utils::HttpClient;
use hepref::{aux_path_for, Reconciler, SourceRegistry};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// hepref - fetch missing BibTeX entries for a LaTeX document from INSPIRE-HEP and NASA ADS
#[derive(Parser, Debug)]
#[command(name = "hepref")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Fetch missing BibTeX entries from INSPIRE-HEP and NASA ADS", long_about = None)]
struct Cli {
    /// Input TeX file; its .aux file must exist (compile the document first)
    #[arg(short = 't', long, required_unless_present = "print_config")]
    texfile: Option<PathBuf>,

    /// BibTeX file to check and append to
    #[arg(short = 'b', long, required_unless_present = "print_config")]
    bibfile: Option<PathBuf>,

    /// Enable verbose logging (-v for debug, -vv for trace)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error log output
    #[arg(long, short)]
    quiet: bool,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Maximum number of keys fetched at once
    #[arg(long)]
    max_concurrent: Option<usize>,

    /// List missing keys without fetching or writing anything
    #[arg(long)]
    dry_run: bool,

    /// Output format
    #[arg(long, short, value_enum, default_value_t = OutputFormat::Plain)]
    output: OutputFormat,

    /// Disable coloured output
    #[arg(long)]
    no_color: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// One status line per event
    Plain,
    /// The run report as JSON
    Json,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let console = if cli.no_color {
        Console::new(false)
    } else {
        Console::detect()
    };

    match run(cli, console).await {
        Ok(code) => code,
        Err(err) => {
            console.error(&format!("{:#}", err));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, console: Console) -> Result<ExitCode> {
    let config_path = cli.config.clone().or_else(find_config_file);
    let mut config = match &config_path {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config file {}", path.display()))?,
        None => get_config().context("failed to read HEPREF_* environment")?,
    };
    if let Some(timeout) = cli.timeout {
        config.http.timeout_secs = timeout;
    }
    if let Some(max_concurrent) = cli.max_concurrent {
        config.concurrency.max_concurrent_requests = max_concurrent;
    }

    init_tracing(&cli, &config);
    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(ExitCode::SUCCESS);
    }

    let (Some(texfile), Some(bibfile)) = (cli.texfile, cli.bibfile) else {
        bail!("both --texfile and --bibfile are required");
    };
    let aux_path = aux_path_for(&texfile);
    tracing::info!(
        "TeX file: {}, BibTeX file: {}",
        texfile.display(),
        bibfile.display()
    );

    let client = Arc::new(HttpClient::from_config(&config.http)?);
    let registry = SourceRegistry::new(client, &config.providers);
    let reconciler =
        Reconciler::new(registry).with_max_concurrent(config.concurrency.max_concurrent_requests);

    let plan = reconciler.plan(&aux_path, &bibfile).await?;
    let plain = cli.output == OutputFormat::Plain;

    if plain {
        console.plan(&plan);
    }

    if cli.dry_run {
        if !plain {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let outcomes = reconciler
        .execute(&plan, |outcome| {
            if plain {
                console.outcome(outcome);
            }
        })
        .await;
    let report = plan.into_report(outcomes);

    if plain {
        if !report.missing.is_empty() {
            console.summary(&report);
        }
    } else {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(ExitCode::SUCCESS)
}

fn init_tracing(cli: &Cli, config: &Config) {
    let level = if cli.quiet {
        "error".to_string()
    } else {
        match cli.verbose {
            0 => config.logging.level.clone(),
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("hepref={}", level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

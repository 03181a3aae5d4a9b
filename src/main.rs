use anyhow::Context;
use esq::cli::{Cli, Commands, ConfigAction, SearchArgs};
use esq::config::Settings;
use esq::error::{EsqError, Result};
use esq::pipeline;
use esq::search::ElasticClient;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Initialize logging
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Config { action }) => {
            cmd_config(cli.config, cli.search, action).context("config command failed")?;
        }
        None => {
            cmd_search(cli.config, cli.search).context("search failed")?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "esq=debug" } else { "esq=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // stdout carries results
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings(config_path: Option<PathBuf>, search: SearchArgs) -> Result<Settings> {
    let mut settings = Settings::load_or_default(config_path.as_deref())?;
    settings.apply_env_overrides()?;
    search.apply_to(&mut settings);
    Ok(settings)
}

fn cmd_search(config_path: Option<PathBuf>, search: SearchArgs) -> Result<()> {
    let settings = load_settings(config_path, search)?;
    let client = ElasticClient::new(&settings.elastic, &settings.auth)?;
    pipeline::run(&settings, &client)
}

fn cmd_config(
    config_path: Option<PathBuf>,
    search: SearchArgs,
    action: ConfigAction,
) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let settings = load_settings(config_path, search)?;
            print!("{}", toml::to_string_pretty(&settings.redacted())?);
        }
        ConfigAction::Init { force } => {
            let path = match config_path {
                Some(path) => path,
                None => Settings::default_path()?,
            };

            if path.exists() && !force {
                println!("Configuration file already exists at: {}", path.display());
                println!("Use --force to overwrite");
                return Ok(());
            }

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| EsqError::Io {
                    source: e,
                    context: format!("Failed to create config directory: {:?}", parent),
                })?;
            }

            Settings::default().save(&path)?;
            println!("✓ Configuration initialized at: {}", path.display());
        }
        ConfigAction::Path => {
            println!("{}", Settings::default_path()?.display());
        }
    }

    Ok(())
}

//! Tolka - Pivot-Routing Neural Text Translation
//!
//! Command line entry point. Loads configuration, builds the translation
//! service with the HTTP model provider, and dispatches subcommands.

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn, Level};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tolka::cli::{Args, Commands};
use tolka::config::Config;
use tolka::service::TranslationService;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Setup logging to both console and file
    setup_logging(args.verbose)?;

    // Load configuration
    let config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            // Try to load tolka.toml from current directory first
            if std::path::Path::new("tolka.toml").exists() {
                info!("Found tolka.toml in current directory, loading...");
                Config::from_file("tolka.toml")?
            } else {
                Config::default()
            }
        }
    };

    let service = TranslationService::from_config(config);

    match args.command {
        Commands::InitConfig { path } => {
            let config = Config::default();
            config.save_to_file(&path)?;
            println!("Wrote default configuration to {}", path.display());
        }
        Commands::Translate {
            text,
            source,
            target,
            json,
        } => {
            match service.translate(&text, &source, &target).await {
                Ok(outcome) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&outcome)?);
                    } else {
                        println!("{}", outcome.translated_text);
                        info!(
                            "{} ({}) in {}ms{}",
                            outcome.translation_path,
                            outcome.translation_type,
                            outcome.response_time_ms,
                            if outcome.cached { ", cached" } else { "" }
                        );
                    }
                }
                Err(e) if e.is_client_correctable() => {
                    eprintln!("Error: {}", e);
                    eprintln!("Run 'tolka languages --available' to see working language pairs.");
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Error: {}. Please try again later.", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Batch {
            input,
            source,
            target,
            output,
        } => {
            let content = std::fs::read_to_string(&input)?;
            let texts: Vec<String> = content
                .lines()
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .collect();

            info!("Translating {} texts from {}", texts.len(), input.display());

            let bar = ProgressBar::new(texts.len() as u64);
            bar.set_style(
                ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
                    .expect("valid progress template"),
            );

            // Batches above the service limit are processed in chunks so
            // arbitrarily large files still work from the CLI
            let chunk_size = 10;
            let mut translated_lines = Vec::with_capacity(texts.len());
            let mut failed = 0usize;

            for chunk in texts.chunks(chunk_size) {
                let outcome = service.translate_batch(chunk, &source, &target).await?;
                for item in outcome.items {
                    match item.translated {
                        Some(text) => translated_lines.push(text),
                        None => {
                            warn!(
                                "Failed to translate '{}': {}",
                                item.original,
                                item.error.unwrap_or_default()
                            );
                            // Keep the original line on failure
                            translated_lines.push(item.original);
                            failed += 1;
                        }
                    }
                    bar.inc(1);
                }
            }
            bar.finish_with_message("done");

            let result = translated_lines.join("\n");
            match output {
                Some(path) => {
                    std::fs::write(&path, result)?;
                    println!("Wrote {} translations to {}", translated_lines.len(), path.display());
                }
                None => println!("{}", result),
            }

            if failed > 0 {
                warn!("{} of {} texts failed to translate", failed, texts.len());
            }
        }
        Commands::Languages {
            available,
            unavailable,
        } => {
            let languages = if available {
                service.available_languages()
            } else if unavailable {
                service.unavailable_languages()
            } else {
                service.supported_languages().clone()
            };

            println!("{:<6} {:<20}", "Code", "Name");
            println!("{}", "-".repeat(26));
            for (code, name) in &languages {
                println!("{:<6} {:<20}", code, name);
            }
            println!("\n{} languages", languages.len());
        }
        Commands::Route { source, target } => {
            let info = service.path_info(&source, &target)?;
            println!("Path:        {}", info.path);
            println!("Type:        {}", info.kind);
            println!("Description: {}", info.description);
            println!("Available:   {}", if info.available { "yes" } else { "no" });
        }
        Commands::Status => {
            let status = service.status();
            println!("Supported languages: {}", status.supported_languages);
            println!("Available languages: {}", status.available_languages);
            println!("Loaded models:       {}", status.loaded_models);
            println!("Cached results:      {}", status.cached_results);

            println!("\n{:<10} {:<40} {:<10}", "Pair", "Model", "Status");
            println!("{}", "-".repeat(62));
            for route in &status.routes {
                println!(
                    "{:<10} {:<40} {:<10}",
                    route.pair,
                    route.model,
                    format!("{:?}", route.status).to_lowercase()
                );
            }
        }
    }

    Ok(())
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let tolka_dir = std::env::current_dir()?.join(".tolka");
    let log_dir = tolka_dir.join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "tolka.log");
    let (non_blocking_file, _guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(_guard);

    // Determine log level
    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    // Create console layer
    let console_layer = fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false);

    // Create file layer
    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false); // No ANSI colors in file

    // Setup layered subscriber
    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer);

    // Initialize the subscriber
    subscriber
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

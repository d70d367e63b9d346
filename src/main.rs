//! Boss address service.
//!
//! This binary runs the HTTP service and the offline `parse` and `check`
//! commands.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use boss_address::{
    address::AddressParser,
    catalog::{CatalogRegistry, InMemoryCatalog},
    config::{CheckConfig, Cli, Command, ParseConfig, ServeConfig},
    server::{create_router, ErrorResponse, RouterConfig},
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Serve(config) => run_serve(config).await,
        Command::Parse(config) => run_parse(config),
        Command::Check(config) => run_check(config),
    }
}

// =============================================================================
// Serve Command
// =============================================================================

async fn run_serve(config: ServeConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Boss address service v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  Catalog: {}", config.catalog.display());
    info!("  API version: {}", config.api_version);
    info!("  Cache: {} channels", config.cache_channels);

    let catalog = match InMemoryCatalog::from_path(&config.catalog) {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("Failed to load catalog {}: {}", config.catalog.display(), e);
            return ExitCode::FAILURE;
        }
    };
    info!(
        "  Loaded {} collection(s), {} experiment(s), {} channel(s)",
        catalog.collection_count(),
        catalog.experiment_count(),
        catalog.channel_count()
    );

    let registry = CatalogRegistry::with_capacity(catalog, config.cache_channels);
    let parser = AddressParser::new(config.parser_config());
    let router = create_router(registry, parser, build_router_config(&config));

    let addr = config.bind_address();

    info!("");
    info!("  Server listening on: http://{}", addr);
    info!("    curl http://{}/health", addr);
    info!(
        "    curl http://{}/{}/tile/<collection>/<experiment>/<channel>/xy/512/0/0/0/0/",
        addr, config.api_version
    );
    info!("");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "boss_address=debug,tower_http=debug"
    } else {
        "boss_address=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Build RouterConfig from the application ServeConfig.
fn build_router_config(config: &ServeConfig) -> RouterConfig {
    let mut router_config = RouterConfig::new().with_cache_max_age(config.cache_max_age);

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    router_config.with_tracing(!config.no_tracing)
}

// =============================================================================
// Parse Command
// =============================================================================

fn run_parse(config: ParseConfig) -> ExitCode {
    if config.verbose {
        init_logging(true);
    }

    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let catalog = match InMemoryCatalog::from_path(&config.catalog) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Error: failed to load catalog: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let parser = AddressParser::new(config.parser_config());
    let json = match parser.parse(&config.path, &catalog) {
        Ok(address) => serde_json::to_string_pretty(&address),
        Err(e) => {
            let body = ErrorResponse::new(e.kind(), e.to_string());
            if let Ok(json) = serde_json::to_string_pretty(&body) {
                println!("{}", json);
            }
            return ExitCode::FAILURE;
        }
    };

    match json {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// Check Command
// =============================================================================

fn run_check(config: CheckConfig) -> ExitCode {
    if config.verbose {
        init_logging(true);
    }

    println!("Boss Catalog Check");
    println!("══════════════════");
    println!();

    if let Err(e) = config.validate() {
        println!("✗ {}", e);
        return ExitCode::FAILURE;
    }

    let catalog = match InMemoryCatalog::from_path(&config.catalog) {
        Ok(catalog) => {
            println!("✓ Catalog: {}", config.catalog.display());
            catalog
        }
        Err(e) => {
            println!("✗ Catalog: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("  Coordinate frames: {}", catalog.coord_frame_count());
    println!("  Collections:       {}", catalog.collection_count());
    println!("  Experiments:       {}", catalog.experiment_count());
    println!("  Channels:          {}", catalog.channel_count());

    if config.list_channels {
        println!();
        println!("Channels:");
        println!("─────────");

        let paths = catalog.channel_paths();
        if paths.is_empty() {
            println!("  (no channels found)");
        } else {
            for path in &paths {
                println!("  {}", path);
            }
        }
    }

    println!();
    println!("══════════════════");
    println!("✓ All checks passed!");

    ExitCode::SUCCESS
}

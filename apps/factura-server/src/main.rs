use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};

use factura_server::config::{AppConfig, AuthConfig};
use factura_server::{app, shutdown};

/// Factura - invoicing server with ticket verification
#[derive(Parser)]
#[command(name = "factura-server")]
#[command(about = "Factura - invoicing server with ticket verification")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override for the HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print effective configuration (JSON) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration and exit
    Check,
    /// Rotate the daily seller account and exit
    RotateSeller,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Layered config:
    // 1) defaults -> 2) YAML (if provided) -> 3) env (FACTURA__*) -> 4) CLI overrides
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(cli.port);

    init_tracing(&config, cli.verbose);

    if cli.print_config {
        println!("Effective configuration:\n{}", config.to_pretty_json()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(&config),
        Commands::RotateSeller => rotate_seller(config).await,
    }
}

fn init_tracing(config: &AppConfig, verbose: u8) {
    let level = match verbose {
        0 => config.logging.level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn check_config(config: &AppConfig) -> Result<()> {
    // Load already validated the layering; show the result.
    println!("Configuration is valid");
    println!("{}", config.to_pretty_json()?);
    Ok(())
}

async fn run_server(config: AppConfig) -> Result<()> {
    tracing::info!("Factura server starting");
    if config.auth.secret == AuthConfig::DEFAULT_SECRET {
        tracing::warn!("auth.secret is the built-in default; set FACTURA__AUTH__SECRET");
    }

    let db = app::connect_database(&config.database.dsn).await?;
    app::run_migrations(&db).await?;

    // First-run seeding: admin + today's seller, passwords parked for
    // one-time disclosure.
    let seeded = app::credential_service(&db)
        .seed(Utc::now().date_naive())
        .await?;
    if seeded {
        tracing::info!("seeded default accounts; fetch passwords via /api/admin/seller-credentials");
    }

    let router = app::build_router(&db, &config);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown::wait_for_shutdown())
        .await?;

    Ok(())
}

/// Daily seller rotation, meant to be run from cron. The generated
/// password is not printed; an administrator retrieves it once through
/// the API.
async fn rotate_seller(config: AppConfig) -> Result<()> {
    let db = app::connect_database(&config.database.dsn).await?;
    app::run_migrations(&db).await?;

    let username = app::credential_service(&db)
        .rotate_seller(Utc::now().date_naive())
        .await?;
    println!("Rotated seller account: {username}");
    Ok(())
}

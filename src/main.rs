use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scout_cookies::auth::TokenSigner;
use scout_cookies::cli::{Cli, Commands, DbCommands, QrCommands, ScoutCommands};
use scout_cookies::config::{Config, LogFormat};
use scout_cookies::payments::StripeClient;
use scout_cookies::{cli, create_app, db, startup, AppState};

fn init_tracing(format: LogFormat) {
    let filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    let (text, json) = match format {
        LogFormat::Text => (Some(tracing_subscriber::fmt::layer()), None),
        LogFormat::Json => (None, Some(tracing_subscriber::fmt::layer().json())),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(text)
        .with(json)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // qr commands work offline and need no configuration
    if let Some(Commands::Qr(command)) = &cli.command {
        init_tracing(LogFormat::Text);
        return match command {
            QrCommands::Encode {
                cookie_type,
                quantity,
                price,
            } => cli::handle_qr_encode(cookie_type, *quantity, price.clone()).map(|_| ()),
            QrCommands::Decode { data } => cli::handle_qr_decode(data),
        };
    }

    let config = Config::from_env()?;
    init_tracing(config.log_format);

    match cli.command {
        Some(Commands::Serve) | None => serve(config).await,
        Some(Commands::Db(DbCommands::Init)) => cli::handle_db_init(&config).await,
        Some(Commands::Scout(ScoutCommands::Create {
            email,
            name,
            password,
        })) => {
            let pool = db::create_pool(&config).await?;
            db::ensure_schema(&pool).await?;
            cli::handle_scout_create(&pool, &email, &name, &password)
                .await
                .map(|_| ())
        }
        Some(Commands::Config) => {
            cli::handle_config_validate(&config)?;
            let pool = db::create_pool(&config).await?;
            let report = startup::validate_environment(&config, &pool).await?;
            report.print();
            if !report.is_valid() {
                anyhow::bail!("Startup validation failed");
            }
            Ok(())
        }
        Some(Commands::Qr(_)) => Ok(()),
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    startup::validate_env_vars(&config)?;

    let pool = db::create_pool(&config).await?;
    db::ensure_schema(&pool).await?;

    if config.seed_demo_scout && db::seed_demo_scout(&pool).await? {
        tracing::info!("Demo scout available for login");
    }

    let stripe = StripeClient::new(
        config.stripe_api_base.clone(),
        config.stripe_secret_key.clone(),
    );
    tracing::info!("Stripe client initialized with base URL: {}", config.stripe_api_base);

    let tokens = TokenSigner::new(&config.jwt_secret, config.token_ttl_hours);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));

    let app = create_app(AppState {
        db: pool,
        config: Arc::new(config),
        tokens,
        payments: Arc::new(stripe),
    });

    tracing::info!("listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

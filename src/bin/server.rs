use clap::Parser;
use dotenv::dotenv;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::env;
use std::sync::Arc;
use tracing::{error, info};
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use wimarc::config::ServerConfig;
use wimarc::db::{schema, seed};
use wimarc::web::create_axum_router;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Listen address override (otherwise LISTEN_ADDR or 0.0.0.0:4000)
    #[arg(short, long)]
    listen: Option<String>,

    /// Load demo stations, users and a week of generated readings
    #[arg(long)]
    seed_demo: bool,
}

fn init_logging() {
    // JSON to a daily-rolling file, human-readable to stdout.
    let file_appender = rolling::daily("logs", "server.log");
    let file_layer = fmt::layer().with_writer(file_appender).with_ansi(false).json();

    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sea_orm=warn,sqlx::query=warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    init_logging();
    dotenv().ok();

    let mut server_config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("failed to load server configuration: {e}");
            return Err(e.into());
        }
    };
    if let Some(listen) = args.listen {
        server_config.listen_addr = listen;
    }
    let server_config = Arc::new(server_config);

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let mut opt = ConnectOptions::new(database_url);
    opt.max_connections(10);
    let db: DatabaseConnection = Database::connect(opt)
        .await
        .expect("failed to create database connection");

    schema::init_schema(&db).await?;
    seed::ensure_admin_user(&db, &server_config).await?;
    if args.seed_demo {
        seed::seed_demo_data(&db).await?;
    }

    let app = create_axum_router(db, server_config.clone());

    let listener = tokio::net::TcpListener::bind(&server_config.listen_addr).await?;
    info!("wimarc API listening on {}", server_config.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install ctrl-c handler");
    info!("shutdown signal received");
}

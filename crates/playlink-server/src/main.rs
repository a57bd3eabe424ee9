mod cleanup;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use playlink_api::AppStateInner;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "playlink=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let db_path = std::env::var("PLAYLINK_DB_PATH").unwrap_or_else(|_| "playlink.db".into());
    let host = std::env::var("PLAYLINK_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("PLAYLINK_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;
    let code_ttl_secs: i64 = std::env::var("PLAYLINK_CODE_TTL_SECS")
        .unwrap_or_else(|_| "900".into())
        .parse()?;
    let public_dir = std::env::var("PLAYLINK_PUBLIC_DIR").unwrap_or_else(|_| "public".into());

    // Init database
    let db = playlink_db::Database::open(&PathBuf::from(&db_path))?;

    // Shared state
    let state = Arc::new(AppStateInner { db, code_ttl_secs });

    // Sweep expired link codes in the background
    tokio::spawn(cleanup::run_cleanup_loop(state.clone(), 60, code_ttl_secs));

    let app = Router::new()
        .merge(playlink_api::router(state))
        .nest_service("/public", ServeDir::new(public_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Playlink server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

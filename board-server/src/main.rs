use std::sync::Arc;

use tokio::signal;
use tracing::{error, info};

use board_persistence::connection::connect_and_migrate;
use board_persistence::repositories::{
    InvitationRepository, PlayerRepository, ScoreRepository, TeamRepository,
};
use board_server::analytics::{AnalyticsEmitter, LogSnagClient, NoopAnalytics};
use board_server::auth::{
    AuthCallback, AuthService, DevIdentityProvider, IdentityProvider, SupabaseIdentityProvider,
};
use board_server::{config::Config, create_routes};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Wordle Teams server...");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize database connection and run migrations
    let db = match connect_and_migrate(&config.database_url).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database and run migrations: {}", e);
            std::process::exit(1);
        }
    };
    let player_repository = Arc::new(PlayerRepository::new(db.clone()));
    let score_repository = Arc::new(ScoreRepository::new(db.clone()));
    let team_repository = Arc::new(TeamRepository::new(db.clone()));
    let invitation_repository = Arc::new(InvitationRepository::new(db));

    let (identity_provider, auth_service): (Arc<dyn IdentityProvider>, Arc<AuthService>) =
        if config.auth_dev_mode {
            info!("Starting in development authentication mode - JWT validation disabled");
            (
                Arc::new(DevIdentityProvider),
                Arc::new(AuthService::new_dev_mode()),
            )
        } else {
            (
                Arc::new(SupabaseIdentityProvider::new(
                    config.supabase_url.clone(),
                    config.supabase_anon_key.clone(),
                )),
                Arc::new(AuthService::new(config.supabase_jwt_secret.clone())),
            )
        };

    let analytics: Arc<dyn AnalyticsEmitter> = match &config.logsnag_token {
        Some(token) => Arc::new(LogSnagClient::new(
            token.clone(),
            config.logsnag_project.clone(),
            config.environment.clone(),
        )),
        None => {
            info!("LOGSNAG_TOKEN not set, signup analytics disabled");
            Arc::new(NoopAnalytics)
        }
    };

    let auth_callback = Arc::new(AuthCallback::new(
        identity_provider,
        invitation_repository,
        analytics,
    ));

    let routes = create_routes(
        config.site_url.clone(),
        auth_callback,
        auth_service,
        player_repository,
        score_repository,
        team_repository,
    );

    info!("Server starting on {}:{}", config.host, config.port);

    let host = match config.host.parse::<std::net::IpAddr>() {
        Ok(host) => host,
        Err(e) => {
            error!("Invalid HOST '{}': {}", config.host, e);
            std::process::exit(1);
        }
    };

    let bind = warp::serve(routes)
        .try_bind_with_graceful_shutdown((host, config.port), shutdown_signal());
    let (addr, server) = match bind {
        Ok(bound) => bound,
        Err(e) => {
            error!("Failed to bind {}:{}: {}", config.host, config.port, e);
            std::process::exit(1);
        }
    };

    info!(
        "Server started successfully on {}. Press Ctrl+C to stop.",
        addr
    );
    server.await;
    info!("Server shutdown complete.");
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }
}

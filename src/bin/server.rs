use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use warp::Filter;

use rusty_gate::auth::password::PasswordHasher;
use rusty_gate::auth::session::SessionManager;
use rusty_gate::auth::token::TokenIssuer;
use rusty_gate::config::AuthConfig;
use rusty_gate::handlers::auth::{auth_routes, handle_rejection};
use rusty_gate::storage::{MemoryUserStore, SharedUserStore};

#[tokio::main]
async fn main() {
    // Initialize env
    let dotenv_result = dotenvy::dotenv();

    // Initialize logging
    env_logger::init();

    match dotenv_result {
        Ok(_) => info!("Environment variables loaded from .env file"),
        Err(e) => warn!("Failed to load .env file: {}", e),
    };

    // Load config from .env
    let config = match AuthConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!("Configuration: host={}, port={}", config.host, config.port);

    // Wire the session manager from its collaborators (explicit injection,
    // no ambient singletons)
    let store: SharedUserStore = Arc::new(MemoryUserStore::new());
    let issuer = TokenIssuer::new(
        &config.access_token_secret,
        config.access_token_ttl,
        &config.refresh_token_secret,
        config.refresh_token_ttl,
    );
    let sessions = Arc::new(SessionManager::new(
        store,
        PasswordHasher::new(),
        issuer,
        config.cookie_max_age,
    ));

    // Create health check route
    let health_route = warp::path("health").map(|| "OK");

    // Combine routes
    let routes = auth_routes(sessions).or(health_route).recover(handle_rejection);

    // Build the server address
    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Failed to parse server address: {}", e);
            std::process::exit(1);
        }
    };

    // Start the server
    info!("Starting Rusty Gate auth server on {}", addr);

    warp::serve(routes).run(addr).await;
}

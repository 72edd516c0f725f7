//! ombrelle API server.
//!
//! Multi-tenant workspace backend built with axum: tenant directory,
//! role-based memberships, invitation lifecycle, Keycloak-delegated
//! authentication, transactional invitation email.

mod config;
mod health;
mod logging;
mod openapi;

use axum::{middleware, routing::get, Extension, Router};
use config::Config;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use ombrelle_api_items::{items_router, ItemsState};
use ombrelle_api_tenants::{public_invitations_router, tenants_router, TenantsState};
use ombrelle_api_users::{auth_user_middleware, users_router, UsersState};
use ombrelle_auth::{jwt_auth_middleware, JwksClient, JwtVerifier, ValidationConfig};
use ombrelle_mail::{EmailSender, MailjetConfig, MailjetSender};

#[tokio::main]
async fn main() {
    // Fail-fast configuration: missing required values stop the process
    // before anything is half-initialized.
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    logging::init_logging(&config.rust_log);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.host,
        port = config.port,
        env = %config.app_env,
        "Starting ombrelle API"
    );

    match config.validate_security_config() {
        Ok(warnings) => {
            for warning in &warnings {
                tracing::warn!(target: "security", "{}", warning);
            }
        }
        Err(errors) => {
            for error in &errors {
                tracing::error!(target: "security", "{}", error);
            }
            eprintln!(
                "FATAL: {} insecure setting(s) detected in production mode.",
                errors.len()
            );
            std::process::exit(1);
        }
    }

    let pool = match ombrelle_db::connect(&config.database_url).await {
        Ok(pool) => {
            info!("Database connection established");
            pool
        }
        Err(e) => {
            eprintln!("Failed to connect to database: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = ombrelle_db::run_migrations(&pool).await {
        eprintln!("FATAL: Database migration failed: {e}");
        std::process::exit(1);
    }

    // Mail collaborator: invitation creation depends on it synchronously.
    let email_sender: Arc<dyn EmailSender> = match MailjetSender::new(MailjetConfig {
        api_key: config.mail.api_key.clone(),
        secret_key: config.mail.secret_key.clone(),
        sender_email: config.mail.sender_email.clone(),
        sender_name: config.mail.sender_name.clone(),
    }) {
        Ok(sender) => Arc::new(sender),
        Err(e) => {
            eprintln!("FATAL: Mail configuration invalid: {e}");
            std::process::exit(1);
        }
    };

    // Token verification: static realm key when configured, JWKS with
    // caching otherwise.
    let validation = ValidationConfig::default().issuer(config.keycloak.issuer_url.clone());
    let verifier = if let Some(ref pem) = config.keycloak.public_key_pem {
        JwtVerifier::with_static_key(pem.as_bytes().to_vec(), validation)
    } else {
        let jwks = match JwksClient::new(config.keycloak.jwks_url.clone()) {
            Ok(client) => client,
            Err(e) => {
                eprintln!("FATAL: Keycloak JWKS client: {e}");
                std::process::exit(1);
            }
        };
        JwtVerifier::with_jwks(jwks, validation)
    };
    let verifier = Arc::new(verifier);

    let tenants_state = TenantsState::new(
        pool.clone(),
        email_sender,
        config.invitation_base_url.clone(),
    );
    let users_state = UsersState::new(pool.clone());
    let items_state = ItemsState::new(pool.clone());

    // Tenant and item routes share the /tenants path namespace.
    let tenant_routes = tenants_router(tenants_state.clone()).merge(items_router(items_state));

    // Protected routes: bearer token verification, then claims→local
    // user resolution.
    let protected = Router::new()
        .nest("/tenants", tenant_routes)
        .nest("/users", users_router(users_state))
        .layer(middleware::from_fn_with_state(
            pool.clone(),
            auth_user_middleware,
        ))
        .layer(middleware::from_fn(jwt_auth_middleware))
        .layer(Extension(verifier));

    // Public routes: health, API docs, invitation lookup + acceptance
    // (invitees have no account yet).
    let app = Router::new()
        .route("/health", get(health::health_handler))
        .with_state(pool.clone())
        .merge(openapi::openapi_routes())
        .nest("/invitations", public_invitations_router(tenants_state))
        .merge(protected)
        .layer(tower_http::limit::RequestBodyLimitLayer::new(1_048_576))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(build_cors_layer(&config.cors_origins));

    let addr: SocketAddr = match config.bind_addr().parse() {
        Ok(a) => a,
        Err(e) => {
            tracing::error!("Invalid bind address '{}': {e}", config.bind_addr());
            std::process::exit(1);
        }
    };

    info!(%addr, "Server listening");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind to address {addr}: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }

    info!("Server shutdown complete");
}

/// Build the CORS layer from configured origins.
///
/// Wildcard (development) allows anything; explicit origins enable
/// credentials and restrict methods/headers.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, ORIGIN};
    use axum::http::Method;

    let is_wildcard = origins.len() == 1 && origins[0] == "*";

    let mut layer = CorsLayer::new().max_age(Duration::from_secs(3600));

    if is_wildcard {
        layer = layer
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    } else {
        let allowed: Vec<axum::http::HeaderValue> =
            origins.iter().filter_map(|o| o.parse().ok()).collect();
        layer = layer
            .allow_origin(allowed)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT, ORIGIN])
            .allow_credentials(true);
    }

    layer
}

/// Graceful shutdown on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

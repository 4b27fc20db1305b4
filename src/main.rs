// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{env, net::SocketAddr, process, sync::Arc};

use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use user_auth_server::{
    api::router,
    auth::{InMemoryCredentials, RoleSet, SystemClock, TokenService},
    config::{
        SigningConfiguration, DEFAULT_HOST, DEFAULT_LOG_FILTER, DEFAULT_PORT, HOST_ENV,
        LOGIN_PASSWORD_ENV, LOGIN_ROLES_ENV, LOGIN_USERNAME_ENV, LOG_FORMAT_ENV, PORT_ENV,
    },
    state::AppState,
};

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let json = env::var(LOG_FORMAT_ENV).is_ok_and(|format| format.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Single account accepted by `/login`, if one is configured.
fn configured_credentials() -> InMemoryCredentials {
    let credentials = InMemoryCredentials::new();

    let (Ok(username), Ok(password)) = (env::var(LOGIN_USERNAME_ENV), env::var(LOGIN_PASSWORD_ENV))
    else {
        warn!("No login account configured; /login will reject every attempt");
        return credentials;
    };

    let roles: RoleSet = env::var(LOGIN_ROLES_ENV)
        .unwrap_or_else(|_| "USER".to_string())
        .split(',')
        .map(str::trim)
        .filter(|role| !role.is_empty())
        .collect();

    info!(username = %username, roles = roles.len(), "Login account configured");
    credentials.with_account(username, password, roles)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutting down");
}

#[tokio::main]
async fn main() {
    init_tracing();

    // Signing configuration is mandatory; a bad one must stop startup.
    let signing = match SigningConfiguration::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid signing configuration");
            process::exit(1);
        }
    };
    info!(
        issuer = %signing.issuer(),
        audience = %signing.audience(),
        expiration_ms = signing.expiration_millis(),
        "Signing configuration loaded"
    );

    let tokens = TokenService::new(signing, Arc::new(SystemClock));
    let state = AppState::new(tokens, configured_credentials());
    let app = router(state);

    let host = env::var(HOST_ENV).unwrap_or_else(|_| DEFAULT_HOST.to_string());
    let port: u16 = env::var(PORT_ENV)
        .ok()
        .and_then(|port| port.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let addr: SocketAddr = match format!("{host}:{port}").parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!(error = %e, host = %host, port, "Failed to parse bind address");
            process::exit(1);
        }
    };

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, %addr, "Failed to bind");
            process::exit(1);
        }
    };

    info!("User auth server listening on http://{addr} (docs at /docs)");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "Server failed");
        process::exit(1);
    }
}

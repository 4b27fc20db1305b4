// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::header::AUTHORIZATION,
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    api::{
        health::{HealthResponse, ReadyResponse},
        users::UserMeResponse,
    },
    auth::{middleware::authorize, LoginRequest},
    state::AppState,
};

pub mod health;
pub mod login;
pub mod users;

pub fn router(state: AppState) -> Router {
    // Everything under /api sees a per-request security context.
    let api_routes = Router::new()
        .route("/users/me", get(users::get_current_user))
        .route_layer(middleware::from_fn_with_state(state.clone(), authorize));

    let app = Router::new()
        .route("/login", post(login::login))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .nest("/api", api_routes)
        .with_state(state);

    app.merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(cors()),
        )
}

/// Any origin, method and request header. Browsers only see the login
/// token if `Authorization` is listed as exposed.
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([AUTHORIZATION])
}

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        login::login,
        users::get_current_user,
        health::health,
        health::liveness
    ),
    components(
        schemas(
            LoginRequest,
            UserMeResponse,
            ReadyResponse,
            HealthResponse
        )
    ),
    modifiers(&BearerSecurity),
    tags(
        (name = "Authentication", description = "Token issuing"),
        (name = "Users", description = "Current user"),
        (name = "Health", description = "Liveness and health probes")
    )
)]
struct ApiDoc;

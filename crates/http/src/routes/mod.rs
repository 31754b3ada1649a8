//! API route definitions

use crate::{AppState, middleware::auth::bearer_auth_middleware, types::ErrorResponse};
use axum::Router;
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa_axum::{router::OpenApiRouter, routes};

pub mod account;
pub mod auth;
pub mod card;
pub mod health;

#[derive(OpenApi)]
#[openapi(
    info(title = "Bankfront API"),
    components(schemas(ErrorResponse)),
    modifiers(&BearerSecurity),
    tags(
        (name = "auth", description = "Proxied authentication endpoints"),
        (name = "account", description = "Account endpoints"),
        (name = "card", description = "Card endpoints"),
        (name = "health", description = "Service health"),
    ),
)]
struct ApiDoc;

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

/// Build the API router and its OpenAPI document
///
/// Routes under `/api/account` and `/api/card` sit behind bearer
/// authentication; the auth proxy routes and `/health` are public.
pub fn router(app_state: AppState) -> (Router, utoipa::openapi::OpenApi) {
    let protected = OpenApiRouter::new()
        .merge(account::router())
        .merge(card::router())
        .route_layer(axum::middleware::from_fn_with_state(
            app_state.clone(),
            bearer_auth_middleware,
        ));

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(health::health_check))
        .merge(auth::router())
        .merge(protected)
        .split_for_parts();

    (router.with_state(app_state), api)
}

use axum::{
    Router,
    http::{
        HeaderName, Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    AppState,
    middleware::{auth_middleware, log_errors, rate_limit},
    routes,
};

/// Answers browser preflights for the storefront, admin and cashier panels.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            CONTENT_TYPE,
        ])
}

pub fn create_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route(
            "/auth/login",
            post(routes::auth::login).layer(middleware::from_fn_with_state(
                state.clone(),
                rate_limit,
            )),
        )
        .route(
            "/auth/session",
            get(routes::auth::check_session).layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        );

    let payment_routes = Router::new()
        .route("/payments/status", post(routes::payment::payment_status))
        .route("/payments/pix", post(routes::payment::create_pix))
        .route("/checkout/session", post(routes::checkout::create_session));

    let api = Router::new()
        .route("/health", get(routes::health))
        .merge(auth_routes)
        .merge(payment_routes);

    let base = state.config.api_base_uri.clone();
    let router = if base.is_empty() {
        api
    } else {
        Router::new().nest(&base, api)
    };

    router
        .layer(middleware::from_fn(log_errors))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

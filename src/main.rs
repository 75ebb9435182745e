use std::net::{IpAddr, Ipv6Addr, SocketAddr};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uniform_checkout::{AppState, config::Config, router::create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    for (name, value) in [
        ("ADMIN_PASSWORD", &config.admin_password),
        ("CAIXA_PASSWORD", &config.caixa_password),
        ("MERCADO_PAGO_ACCESS_TOKEN", &config.mercado_pago_access_token),
        ("STRIPE_SECRET_KEY", &config.stripe_secret_key),
        ("CHECKOUT_RETURN_URL", &config.checkout_return_url),
    ] {
        if value.is_none() {
            tracing::warn!("{} not set, dependent routes will answer 500", name);
        }
    }

    let addr = SocketAddr::new(
        config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid SERVER_HOST, falling back to dual-stack default");
            IpAddr::V6(Ipv6Addr::UNSPECIFIED)
        }),
        config.server_port,
    );

    let state = AppState::new(config).expect("Failed to build HTTP clients");
    let app = create_router(state);

    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Failed to start server");
}

//! Minimal service gated by the rate limiting middleware.
//!
//! Run with: cargo run -p rategate-http --example server
//!
//! Then hammer it: for i in $(seq 1 10); do curl -i 127.0.0.1:3000/; done

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{Router, routing::get};

use rategate_core::{Quota, SlidingWindowLimiter};
use rategate_http::{RateLimitState, rate_limit};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,rategate_core=debug,rategate_http=debug".into()),
        )
        .init();

    let quota = Quota::new(5, Duration::from_secs(10)).expect("static quota is valid");
    let limiter = Arc::new(SlidingWindowLimiter::new(quota));

    // Periodic sweep keeps idle clients from accumulating even when the
    // opportunistic per-shard sweep sees no traffic.
    let sweeper = Arc::clone(&limiter);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            let evicted = sweeper.sweep();
            tracing::info!(evicted, tracked = sweeper.tracked_clients(), "sweep complete");
        }
    });

    let app = Router::new()
        .route("/", get(|| async { "hello\n" }))
        .layer(axum::middleware::from_fn_with_state(
            RateLimitState::new(limiter),
            rate_limit,
        ));

    let addr: SocketAddr = "127.0.0.1:3000".parse().expect("static address is valid");
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("bind listener");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("server run");
}

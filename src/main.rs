mod cache;
mod config;
mod routes;
mod services;
mod state;
mod store;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = config::AppConfig::from_env().expect("backend config required");
    let port = config.port;

    let client = store::HostedClient::new(&config).expect("backend client init failed");
    let state = state::AppState::from_client(client, &config);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, bucket = %config.image_bucket, "oasis-admin listening");
    axum::serve(listener, app).await.expect("server failed");
}

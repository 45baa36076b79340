use mock_server::ServerConfig;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let addr = ServerConfig::from_env().addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "food service listening");
    mock_server::run(listener).await
}

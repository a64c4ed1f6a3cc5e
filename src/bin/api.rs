use financial_agent_tools::{api::start_server, config::Config, tools::create_default_registry};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let config = Config::from_env()?;

    if config.hf_api_token.is_empty() {
        eprintln!("⚠️  HF_API_TOKEN not set in .env — text_to_image will be unavailable");
        eprintln!("📌 See .env.example for setup instructions");
    }

    info!("🚀 Financial Agent Tools - API Server");
    info!("📍 Port: {}", config.port);

    let registry = Arc::new(create_default_registry(&config));

    info!("✅ Registry initialized with {} tools", registry.list().len());
    info!("📡 Starting API server...");

    start_server(registry, config.port).await?;

    Ok(())
}

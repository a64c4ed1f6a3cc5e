use financial_agent_tools::{
    config::Config,
    models::ToolInput,
    tools::{create_default_registry, Tool},
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    dotenv::dotenv().ok();

    let config = Config::from_env()?;
    let registry = create_default_registry(&config);

    let ticker = std::env::args().nth(1).unwrap_or_else(|| "AAPL".to_string());

    info!(%ticker, "Fetching income statement");

    let tool = registry
        .get("get_income_statement")
        .expect("default registry is missing get_income_statement");

    let input = ToolInput {
        tool_name: tool.name().to_string(),
        parameters: serde_json::json!({ "ticker": ticker }),
    };

    match tool.execute(&input).await {
        Ok(output) => {
            println!("\n=== INCOME STATEMENT: {} ===", ticker);
            println!("{}", serde_json::to_string_pretty(&output.data)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("Tool invocation failed: {}", e);
            Err(Box::new(e) as Box<dyn std::error::Error>)
        }
    }
}

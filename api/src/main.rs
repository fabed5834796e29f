use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mcp_client_api::client::McpClient;
use mcp_client_api::config::Settings;
use mcp_client_api::web::{self, AppState};

#[derive(Parser)]
#[command(name = "mcp-client-api")]
#[command(about = "REST API for chatting with an LLM that can call tools on a remote MCP server")]
struct Cli {
    /// Address to bind the HTTP server to
    #[arg(long, env = "API_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, env = "API_PORT", default_value_t = 5000)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let settings = Settings::from_env();
    if let Err(e) = settings.validate() {
        tracing::error!("{}", e);
        std::process::exit(1);
    }

    let client = Arc::new(McpClient::from_settings(&settings));
    let state = AppState::new(client);

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port).parse()?;
    tracing::info!("starting MCP client API on {}", addr);
    tracing::info!("MCP server endpoint: {}", settings.mcp_endpoint);
    tracing::info!("model: {}", settings.model_name);

    web::serve(state, addr).await
}

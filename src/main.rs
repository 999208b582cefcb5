use mcp_mixmaster::client::AiError;
use mcp_mixmaster::config::Config;
use mcp_mixmaster::server::MixMasterMcpServer;
use rmcp::transport::sse_server::{SseServer, SseServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".to_string().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::debug!("Loaded configuration: {:?}", config);

    // Validate the API key before accepting work
    tracing::info!("Validating Gemini API key...");
    let client = config.client();
    match client.validate_key().await {
        Ok(()) => tracing::info!("API key accepted"),
        Err(e) if e.is_invalid_credential() => {
            tracing::error!("API key rejected: {}", e);
            tracing::error!("{}", AiError::InvalidCredential.user_message(config.language));
            tracing::error!("Please verify:");
            tracing::error!("  - GEMINI_API_KEY is a valid key");
            tracing::error!("  - GEMINI_BASE_URL is correct: {}", config.base_url);
            std::process::exit(1);
        }
        Err(e) => {
            tracing::warn!("API key check failed: {}", e);
            tracing::warn!("The server will continue, but calls may fail until the API is reachable.");
        }
    }

    let server = MixMasterMcpServer::new(config.build_session()?);

    // Create server configuration and start SSE server
    let sse_config = SseServerConfig {
        bind: config.bind_addr.parse()?,
        sse_path: "/sse".to_string(),
        post_path: "/message".to_string(),
        ct: tokio_util::sync::CancellationToken::new(),
        sse_keep_alive: None,
    };

    tracing::info!("MixMaster MCP Server listening on {}", sse_config.bind);

    let sse_server = SseServer::serve_with_config(sse_config).await?;

    // Every connection shares the same session
    let ct = sse_server.with_service(move || server.clone());

    tracing::info!("MixMaster MCP Server started successfully");

    // Wait for Ctrl+C
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down...");
    ct.cancel();

    Ok(())
}

use keyword_strategist::mock::{parse_port, router, MockMode, MockState};
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::new("keyword_strategist=info,mock_llm_server=info"))
        .with_target(false)
        .init();

    let port = parse_port(std::env::var("MOCK_LLM_PORT").ok().as_deref()).map_err(anyhow::Error::msg)?;

    let mode = match std::env::var("MOCK_LLM_MODE") {
        Ok(raw) => raw.parse::<MockMode>().map_err(anyhow::Error::msg)?,
        Err(_) => MockMode::Ok,
    };

    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("Mock LLM server listening on http://{addr} (mode {mode:?})");
    tracing::info!("Point the CLI at it with --base-url http://localhost:{port}");

    axum::serve(listener, router(MockState::new(mode))).await?;

    Ok(())
}

use campusgate_gateway::config::GatewayConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    campusgate_observability::init();

    let config = GatewayConfig::from_env();
    let bind_addr = config.bind_addr.clone();
    let app = campusgate_gateway::app::build_app(config)?;

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

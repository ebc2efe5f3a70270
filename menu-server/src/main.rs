use menu_server::{Config, Server, ServerState, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    config.validate()?;
    setup_environment(&config);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        database = %config.database_path,
        "Menu server starting..."
    );

    let state = ServerState::initialize(config.clone()).await?;
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}

use mesa_server::{print_banner, Config, Server, ServerState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Environment (dotenv, work dir, logging)
    dotenv::dotenv().ok();
    let config = Config::from_env();
    config.ensure_work_dir_structure()?;

    let logs_dir = config.logs_dir();
    let log_dir = if config.is_production() {
        logs_dir.to_str()
    } else {
        None
    };
    mesa_server::init_logger_with_file(Some(config.log_level.as_str()), log_dir);

    print_banner();
    tracing::info!("Mesa server starting...");

    // 2. Initialize server state (database, sessions)
    let state = ServerState::initialize(&config).await?;

    // 3. Run the HTTP server
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}

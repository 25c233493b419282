//! `memochat serve`: Start the web host.

use memochat_config::AppConfig;

pub async fn run(
    host_override: Option<String>,
    port_override: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(host) = host_override {
        config.gateway.host = host;
    }
    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("🧠 memochat");
    println!("   Listening: http://{}:{}", config.gateway.host, config.gateway.port);
    println!("   Model default: {}", config.connection.model);
    println!(
        "   Sessions: up to {}, idle timeout {} min",
        config.gateway.max_sessions, config.gateway.session_ttl_minutes
    );

    memochat_gateway::start(config).await?;

    Ok(())
}

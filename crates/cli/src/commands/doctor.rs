//! `memochat doctor`: Diagnose configuration and provider health.

use memochat_config::AppConfig;
use memochat_core::Connector;
use memochat_providers::OpenAiConnector;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 memochat doctor");
    println!("==================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_path();
    if config_path.exists() {
        println!("  ✅ Config file found: {}", config_path.display());
    } else {
        println!("  ⚠️  No config file: run `memochat onboard` (defaults in use)");
        issues += 1;
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  Fix the config file and re-run doctor.");
            return Ok(());
        }
    };

    println!("     base_url:       {}", config.connection.base_url);
    println!("     model:          {}", config.connection.model);
    println!("     history_window: {}", config.conversation.history_window);
    match config.conversation.temperature {
        Some(t) => println!("     temperature:    {t}"),
        None => println!("     temperature:    (endpoint default)"),
    }
    println!(
        "     gateway:        {}:{}",
        config.gateway.host, config.gateway.port
    );

    match config.connection.to_params() {
        Some(params) => {
            println!("  ✅ API key configured");
            match OpenAiConnector::new().connect(&params) {
                Ok(provider) => match provider.health_check().await {
                    Ok(true) => println!("  ✅ Provider reachable ({})", params.base_url),
                    Ok(false) => {
                        println!("  ❌ Provider answered with an error: check the API key and base URL");
                        issues += 1;
                    }
                    Err(e) => {
                        println!("  ❌ Provider unreachable: {e}");
                        issues += 1;
                    }
                },
                Err(e) => {
                    println!("  ❌ {e}");
                    issues += 1;
                }
            }
        }
        None => {
            println!("  ⚠️  No API key: set MEMOCHAT_API_KEY or add api_key to config.toml");
            println!("     (the web connect form still works without one)");
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}

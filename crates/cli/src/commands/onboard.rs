//! `memochat onboard`: Write a starter config file.

use memochat_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = AppConfig::config_path();

    println!("🧠 memochat onboarding");
    println!("======================\n");

    if AppConfig::write_default(&config_path)? {
        println!("✅ Created config.toml at: {}", config_path.display());
        println!("\n📝 Next steps:");
        println!("   1. Add your API key under [connection] (or set MEMOCHAT_API_KEY)");
        println!("   2. Run `memochat doctor` to check the connection");
        println!("   3. Run `memochat serve` and open the printed address");
    } else {
        println!("⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.");
    }

    Ok(())
}

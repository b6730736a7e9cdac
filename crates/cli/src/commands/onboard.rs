//! `mailpilot onboard`: first-time setup.

use mailpilot_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = AppConfig::config_path();

    println!("📬 MailPilot: First-Time Setup");
    println!("==============================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
        return Ok(());
    }

    AppConfig::default().save_to(&config_path)?;
    println!("✅ Created config.toml at: {}", config_path.display());
    println!("\n📝 Next steps:");
    println!("   1. Add your LLM API key (api_key) or set MAILPILOT_API_KEY");
    println!("   2. Add a Gmail access token ([gmail] access_token) or set MAILPILOT_GMAIL_TOKEN");
    println!("   3. Run: mailpilot chat   (or `mailpilot chat --offline` to try it first)\n");

    println!("🎉 Setup complete!\n");
    Ok(())
}

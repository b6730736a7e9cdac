//! `mailpilot config`: configuration management commands.

use mailpilot_config::AppConfig;

pub async fn validate() -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Validating configuration...");

    match AppConfig::load() {
        Ok(config) => {
            println!("   ✅ Config parsed successfully");

            let mut warnings = Vec::new();
            if !config.has_api_key() {
                warnings.push("No API key set (set MAILPILOT_API_KEY or OPENAI_API_KEY env var)");
            }
            if config.gmail.access_token.is_none() {
                warnings.push("No Gmail access token (set MAILPILOT_GMAIL_TOKEN); only --offline chat will work");
            }

            if warnings.is_empty() {
                println!("   ✅ All checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("   ⚠️  {w}");
                }
            }

            println!();
            println!("   Provider:        {}", config.default_provider);
            println!("   Model:           {}", config.effective_model());
            println!("   History:         {} turns", config.agent.max_history_length);
            println!("   Tool iterations: {}", config.agent.max_tool_iterations);
            println!("   Gmail user:      {}", config.gmail.user_id);
        }
        Err(e) => {
            println!("   ❌ Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let toml_str = toml::to_string_pretty(&config.redacted())?;
    println!("{toml_str}");
    Ok(())
}

pub async fn path() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", AppConfig::config_path().display());
    Ok(())
}

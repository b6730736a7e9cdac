//! `mailpilot doctor`: diagnose configuration and connectivity.

use mailpilot_config::AppConfig;
use mailpilot_core::mail::MailService;
use mailpilot_mail::{GmailClient, InMemoryMailbox};
use mailpilot_tools::{MailTool, ToolDispatcher};
use std::sync::Arc;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 MailPilot Doctor: System Diagnostics");
    println!("=======================================\n");

    let mut issues = 0;

    let dispatcher = ToolDispatcher::new(Arc::new(InMemoryMailbox::new()));
    let supported = dispatcher.supported_tools();
    if supported.len() == MailTool::ALL.len() {
        println!("  ✅ {} email tools registered", supported.len());
    } else {
        println!("  ❌ Tool catalog and dispatcher disagree");
        issues += 1;
    }

    let config_path = AppConfig::config_path();
    if !config_path.exists() {
        println!("  ⚠️  No config file, using defaults (run `mailpilot onboard`)");
        issues += 1;
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  {} issue(s) found. See above for details.", issues + 1);
            return Ok(());
        }
    };

    if config.has_api_key() {
        println!("  ✅ API key configured");
    } else {
        println!("  ⚠️  No API key configured: set MAILPILOT_API_KEY or add api_key to config.toml");
        issues += 1;
    }

    let provider = mailpilot_providers::build_from_config(&config);
    match provider.health_check().await {
        Ok(true) => println!("  ✅ Provider '{}' reachable", provider.name()),
        Ok(false) => {
            println!("  ⚠️  Provider '{}' responded but is not healthy", provider.name());
            issues += 1;
        }
        Err(e) => {
            println!("  ❌ Provider '{}' unreachable: {e}", provider.name());
            issues += 1;
        }
    }

    match GmailClient::from_config(&config.gmail) {
        Ok(gmail) => match gmail.unread_count().await {
            Ok(count) => println!("  ✅ Gmail reachable ({count} unread in inbox)"),
            Err(e) => {
                println!("  ❌ Gmail check failed: {e}");
                issues += 1;
            }
        },
        Err(_) => {
            println!("  ⚠️  No Gmail access token: set MAILPILOT_GMAIL_TOKEN (or use `chat --offline`)");
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

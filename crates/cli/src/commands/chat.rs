//! `mailpilot chat`: interactive or single-message chat mode.

use std::io::Write;
use std::sync::Arc;

use mailpilot_agent::{AgentLoop, RunOptions};
use mailpilot_config::AppConfig;
use mailpilot_core::event::{DomainEvent, EventBus};
use mailpilot_core::mail::MailService;
use mailpilot_mail::{GmailClient, InMemoryMailbox};
use mailpilot_tools::ToolDispatcher;
use tokio::io::{self, AsyncBufReadExt, BufReader};

pub async fn run(message: Option<String>, reset: bool, offline: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Check for API key early, give a clear error
    if !config.has_api_key() && config.default_provider != "ollama" {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    MAILPILOT_API_KEY    = 'sk-...'");
        eprintln!("    OPENAI_API_KEY       = 'sk-...'         (for OpenAI direct)");
        eprintln!("    OPENROUTER_API_KEY   = 'sk-or-v1-...'");
        eprintln!();
        eprintln!("  Or add `api_key` to your config file:");
        eprintln!("    {}", AppConfig::config_path().display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let mail = mail_service(&config, offline)?;
    let backend = mail.name().to_string();
    let provider = mailpilot_providers::build_from_config(&config);
    let tools = Arc::new(ToolDispatcher::new(mail));
    let event_bus = Arc::new(EventBus::default());
    let agent = AgentLoop::from_config(&config, provider, tools, event_bus.clone());
    tracing::info!(mailbox = %backend, model = agent.model(), "Chat session started");

    if let Some(msg) = message {
        // Single message mode
        eprint!("  Thinking...");
        let result = agent.run(&msg, RunOptions { reset, ..RunOptions::default() }).await;
        eprint!("\r              \r");
        println!("{}", result?.response);
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║         MailPilot: Interactive Mode          ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Provider:  {}", config.default_provider);
    println!("  Model:     {}", agent.model());
    println!("  Mailbox:   {backend}");
    println!();
    println!("  Type your message and press Enter.");
    println!("  /reset clears the conversation, /history shows its size.");
    println!("  Type 'exit' or Ctrl+C to quit.");
    println!();

    spawn_tool_trace(&event_bus);

    let mut lines = BufReader::new(io::stdin()).lines();
    let mut first = true;

    prompt()?;
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            prompt()?;
            continue;
        }

        match line {
            "exit" | "quit" | "/exit" | "/quit" | ":q" => break,
            "/reset" => {
                agent.reset().await;
                println!("  Conversation cleared.\n");
            }
            "/history" => {
                println!("  {} message(s) in this conversation.\n", agent.history_len().await);
            }
            text => {
                let options = RunOptions {
                    reset: reset && first,
                    ..RunOptions::default()
                };
                first = false;

                eprint!("  ...");
                match agent.run(text, options).await {
                    Ok(result) => {
                        eprint!("\r     \r");
                        println!();
                        for line in result.response.lines() {
                            println!("  Assistant > {line}");
                        }
                        println!();
                    }
                    Err(e) => {
                        // History is kept, so the user can simply retry
                        eprint!("\r     \r");
                        eprintln!("  [Error] {e}");
                        println!();
                    }
                }
            }
        }
        prompt()?;
    }

    println!();
    println!("  Goodbye!");
    println!();
    Ok(())
}

/// The mailbox the tools act on: Gmail, or the sample mailbox when offline.
fn mail_service(config: &AppConfig, offline: bool) -> Result<Arc<dyn MailService>, Box<dyn std::error::Error>> {
    if offline {
        return Ok(Arc::new(InMemoryMailbox::demo()));
    }

    match GmailClient::from_config(&config.gmail) {
        Ok(client) => Ok(Arc::new(client)),
        Err(e) => {
            eprintln!();
            eprintln!("  ERROR: {e}");
            eprintln!();
            eprintln!("  Provide a Gmail OAuth access token with MAILPILOT_GMAIL_TOKEN,");
            eprintln!("  or set [gmail] access_token in {}", AppConfig::config_path().display());
            eprintln!("  To try MailPilot without Gmail, run: mailpilot chat --offline");
            eprintln!();
            Err(e.into())
        }
    }
}

/// Print a one-line trace for every tool the agent executes.
fn spawn_tool_trace(event_bus: &EventBus) {
    let mut rx = event_bus.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = rx.recv().await {
            if let DomainEvent::ToolExecuted {
                tool_name,
                success,
                duration_ms,
                ..
            } = event.as_ref()
            {
                let mark = if *success { "✓" } else { "✗" };
                eprintln!("\r  [{mark}] {tool_name} ({duration_ms} ms)");
            }
        }
    });
}

fn prompt() -> std::io::Result<()> {
    print!("  You > ");
    std::io::stdout().flush()
}

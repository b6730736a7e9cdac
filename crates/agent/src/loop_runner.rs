//! The agent reasoning loop implementation.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use mailpilot_config::AppConfig;
use mailpilot_core::event::{DomainEvent, EventBus};
use mailpilot_core::message::{Message, Role};
use mailpilot_core::provider::{Provider, ProviderRequest, ToolChoice, ToolDefinition};
use mailpilot_tools::{ToolDispatcher, definitions};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::session::ConversationStore;

/// Returned when the model answers with no text and no tool calls.
pub const EMPTY_RESPONSE_FALLBACK: &str = "I've completed the request but have nothing further to add.";

/// Returned when a run stops at the tool iteration bound.
pub const ITERATION_LIMIT_MESSAGE: &str =
    "I've reached the maximum number of tool call iterations. Please provide further guidance.";

/// Per-call overrides. Unset fields fall back to the loop's configuration.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Clear the conversation before handling this message
    pub reset: bool,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

/// The outcome of one user message.
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    /// The final assistant text shown to the user
    pub response: String,

    /// Number of tool calls executed during the run
    pub tool_calls: usize,

    /// Total tokens reported for the last completion, if any
    pub tokens_used: Option<u32>,
}

/// The core agent loop that orchestrates LLM calls and tool execution.
pub struct AgentLoop {
    /// The LLM provider to use
    provider: Arc<dyn Provider>,

    /// The model to use
    model: String,

    /// Temperature setting
    temperature: f32,

    /// Default max tokens per response
    max_tokens: Option<u32>,

    /// System prompt prepended to every request
    system_prompt: String,

    /// Executes the email tools
    tools: Arc<ToolDispatcher>,

    /// History bound in turns
    max_history: usize,

    /// Maximum tool call rounds per run
    max_iterations: u32,

    /// Event bus for domain events
    event_bus: Arc<EventBus>,

    /// The loop's own session; held for the whole of a run
    session: Mutex<ConversationStore>,
}

impl AgentLoop {
    /// Create a new agent loop.
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        temperature: f32,
        tools: Arc<ToolDispatcher>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
            max_tokens: None,
            system_prompt: mailpilot_config::DEFAULT_SYSTEM_PROMPT.into(),
            tools,
            max_history: 20,
            max_iterations: 10,
            event_bus,
            session: Mutex::new(ConversationStore::new()),
        }
    }

    /// Create a loop with model, sampling and agent settings taken from config.
    pub fn from_config(
        config: &AppConfig,
        provider: Arc<dyn Provider>,
        tools: Arc<ToolDispatcher>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self::new(
            provider,
            config.effective_model(),
            config.default_temperature,
            tools,
            event_bus,
        )
        .with_max_tokens(config.default_max_tokens)
        .with_system_prompt(config.agent.system_prompt.clone())
        .with_max_history(config.agent.max_history_length)
        .with_max_iterations(config.agent.max_tool_iterations)
    }

    /// Set the maximum number of tool call iterations.
    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max;
        self
    }

    /// Set the default max tokens per LLM response.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Set the history bound, in turns.
    pub fn with_max_history(mut self, turns: usize) -> Self {
        self.max_history = turns;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Handle one user message on the loop's own session.
    ///
    /// Concurrent calls are serialized: each waits for the session lock and
    /// holds it until its run completes.
    pub async fn run(&self, user_text: &str, options: RunOptions) -> mailpilot_core::Result<RunResult> {
        let mut session = self.session.lock().await;
        self.run_in(&mut session, user_text, options).await
    }

    /// Clear the loop's own session.
    pub async fn reset(&self) {
        let mut session = self.session.lock().await;
        self.reset_store(&mut session);
    }

    /// Number of messages in the loop's own session.
    pub async fn history_len(&self) -> usize {
        self.session.lock().await.len()
    }

    /// An owned copy of the loop's own session history.
    pub async fn history(&self) -> Vec<Message> {
        self.session.lock().await.snapshot()
    }

    /// Handle one user message against a caller-supplied session.
    ///
    /// Completion errors are returned as-is; whatever was appended to the
    /// store before the failure stays there.
    pub async fn run_in(
        &self,
        store: &mut ConversationStore,
        user_text: &str,
        options: RunOptions,
    ) -> mailpilot_core::Result<RunResult> {
        if options.reset {
            self.reset_store(store);
        }

        store.append(Message::user(user_text));
        let dropped = store.trim(self.max_history);
        if dropped > 0 {
            debug!(conversation_id = %store.id(), dropped, "Trimmed conversation history");
        }

        info!(
            conversation_id = %store.id(),
            messages = store.len(),
            "Processing user message"
        );

        let temperature = options.temperature.unwrap_or(self.temperature);
        let max_tokens = options.max_tokens.or(self.max_tokens);
        let tool_definitions = definitions();

        let mut executed = 0usize;
        let mut rounds = 0u32;

        loop {
            debug!(
                conversation_id = %store.id(),
                iteration = rounds + 1,
                "Agent loop iteration"
            );

            let request = self.build_request(store, temperature, max_tokens, &tool_definitions);
            let response = self.provider.complete(request).await?;

            let tokens_used = response.usage.map(|u| u.total_tokens);
            if let Some(tokens) = tokens_used {
                self.event_bus.publish(DomainEvent::ResponseGenerated {
                    conversation_id: store.id().to_string(),
                    model: response.model.clone(),
                    tokens_used: tokens,
                    timestamp: Utc::now(),
                });
            }

            let message = response.message;
            if message.tool_calls.is_empty() {
                // No tool calls, this is the final answer
                let text = if message.content.trim().is_empty() {
                    EMPTY_RESPONSE_FALLBACK.to_string()
                } else {
                    message.content
                };
                store.append(Message::assistant(text.clone()));

                info!(
                    conversation_id = %store.id(),
                    tool_calls = executed,
                    tokens = ?tokens_used,
                    "Run complete"
                );
                return Ok(RunResult {
                    response: text,
                    tool_calls: executed,
                    tokens_used,
                });
            }

            rounds += 1;
            debug!(tool_count = message.tool_calls.len(), "Executing tool calls");

            let calls = message.tool_calls.clone();
            store.append(Message::assistant_with_tool_calls(message.content, message.tool_calls));

            for call in &calls {
                let start = Instant::now();
                let result = self.tools.execute(&call.name, &call.arguments).await;
                let duration_ms = start.elapsed().as_millis() as u64;

                self.event_bus.publish(DomainEvent::ToolExecuted {
                    tool_name: call.name.clone(),
                    success: result.success,
                    duration_ms,
                    timestamp: Utc::now(),
                });

                store.append(Message::tool_result(&call.id, result.output));
                executed += 1;
            }

            if rounds >= self.max_iterations {
                warn!(
                    conversation_id = %store.id(),
                    iterations = rounds,
                    "Max tool iterations reached, stopping"
                );
                self.event_bus.publish(DomainEvent::IterationLimitReached {
                    conversation_id: store.id().to_string(),
                    iterations: rounds,
                    timestamp: Utc::now(),
                });
                store.append(Message::assistant(ITERATION_LIMIT_MESSAGE));
                return Ok(RunResult {
                    response: ITERATION_LIMIT_MESSAGE.to_string(),
                    tool_calls: executed,
                    tokens_used,
                });
            }
        }
    }

    fn reset_store(&self, store: &mut ConversationStore) {
        let old_id = store.id().to_string();
        store.reset();
        info!(conversation_id = %old_id, "Conversation reset");
        self.event_bus.publish(DomainEvent::ConversationReset {
            conversation_id: old_id,
            timestamp: Utc::now(),
        });
    }

    /// System prompt plus history. Tool results whose originating call was
    /// trimmed away are left out of the request (not the store).
    fn build_request(
        &self,
        store: &ConversationStore,
        temperature: f32,
        max_tokens: Option<u32>,
        tools: &[ToolDefinition],
    ) -> ProviderRequest {
        let history = store.messages();
        let first = history
            .iter()
            .position(|m| m.role != Role::Tool)
            .unwrap_or(history.len());

        let mut messages = Vec::with_capacity(history.len() - first + 1);
        messages.push(Message::system(&self.system_prompt));
        messages.extend_from_slice(&history[first..]);

        ProviderRequest {
            model: self.model.clone(),
            messages,
            temperature,
            max_tokens,
            tools: tools.to_vec(),
            tool_choice: ToolChoice::Auto,
        }
    }
}

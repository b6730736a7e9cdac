//! The agent loop: turns one user message into completions and tool calls.
//!
//! 1. **Append** the user message to the conversation store and trim it
//! 2. **Send** system prompt + history + tool catalog to the provider
//! 3. **If tool calls**: execute each via the dispatcher, append the
//!    results, loop back to step 2
//! 4. **If text**: append it as the final answer and return
//!
//! The loop stops early once the tool iteration bound is reached.

pub mod loop_runner;
pub mod session;

#[cfg(test)]
mod test_helpers;

pub use loop_runner::{AgentLoop, EMPTY_RESPONSE_FALLBACK, ITERATION_LIMIT_MESSAGE, RunOptions, RunResult};
pub use session::ConversationStore;

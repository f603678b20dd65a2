//! LLM Agent - tool-calling loop over the dataset
//!
//! System prompt + user query go to the model. Whenever the model asks for a
//! tool, the tool runs locally and its JSON result is appended; the first
//! plain-text reply is the answer.

use std::sync::Arc;

use serde_json::Value;

use super::client::{AgentError, ChatMessage, LlmClient, LlmSettings, Role};
use super::tools;
use super::SYSTEM_PROMPT;
use crate::constants::MAX_AGENT_ROUNDS;
use crate::logic::dataset::Dataset;

pub struct LlmAgent {
    client: LlmClient,
    dataset: Arc<Dataset>,
    tools: Vec<Value>,
    max_rounds: usize,
}

impl LlmAgent {
    pub fn new(settings: LlmSettings, dataset: Arc<Dataset>) -> Result<Self, AgentError> {
        Ok(Self {
            client: LlmClient::new(settings)?,
            dataset,
            tools: tools::definitions(),
            max_rounds: MAX_AGENT_ROUNDS,
        })
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    pub fn with_max_rounds(mut self, rounds: usize) -> Self {
        self.max_rounds = rounds.max(1);
        self
    }

    /// Answer a query. Failures become an explanatory message, never an error.
    pub async fn ask(&self, query: &str) -> String {
        match self.run(query).await {
            Ok(answer) => answer,
            Err(e) => {
                log::error!("LLM agent failed: {}", e);
                format!("AI Error: {}. (Check backend logs)", e)
            }
        }
    }

    pub async fn run(&self, query: &str) -> Result<String, AgentError> {
        let mut messages = vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(query)];

        for round in 0..self.max_rounds {
            let reply = self.client.complete(&messages, &self.tools).await?;

            let calls = match reply.tool_calls.as_deref() {
                Some(calls) if !calls.is_empty() => calls.to_vec(),
                _ => {
                    return reply
                        .content
                        .filter(|text| !text.trim().is_empty())
                        .ok_or(AgentError::EmptyResponse);
                }
            };

            log::debug!("Agent round {}: {} tool call(s)", round + 1, calls.len());
            messages.push(ChatMessage {
                role: Role::Assistant,
                ..reply
            });

            for call in calls {
                let result = tools::execute(&self.dataset, &call.function.name, &call.function.arguments);
                messages.push(ChatMessage::tool_result(call.id, result.to_string()));
            }
        }

        Err(AgentError::TooManyRounds(self.max_rounds))
    }
}

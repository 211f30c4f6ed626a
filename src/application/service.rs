//! Analysis service: wires the engine, gateway, reasoning client, and
//! conversation store behind the operations the HTTP layer exposes.
//!
//! Each analysis run opens its own gateway session; the reasoning client
//! and the conversation store are shared for the process lifetime. Apart
//! from gateway session establishment, every operation returns a structured
//! result rather than an error.

use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::adapters::gateway::HttpToolGateway;
use crate::adapters::reasoning::{FailoverReasoningClient, GeminiBackend, GeminiConfig};
use crate::config::AppConfig;
use crate::domain::analysis::{
    prompts, report, scenarios, AnalysisEngine, AnalysisMode, AnalysisOutcome, AnalysisState,
    EngineConfig,
};
use crate::domain::conversation::{ConversationStore, Role, DEFAULT_CONTEXT_WINDOW};
use crate::domain::foundation::ConversationId;
use crate::ports::{CompletionClient, GatewayError, GenerationOptions, ReasoningError, ToolGateway};

/// Reply used when small-talk handling itself fails.
const SMALL_TALK_FALLBACK: &str = "Hello! I am a travel assistant: I can analyze rental \
     locations, plan trips and routes, and search for places and hotels. Tell me what you need.";

/// Kind of reply a chat turn produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    /// Answered directly, no tools involved.
    SmallTalk,
    /// Full analysis pipeline ran.
    Analysis,
    /// The engine stopped to ask the user a question.
    FollowUp,
}

/// Structured result of one chat turn.
#[derive(Debug)]
pub struct ChatOutcome {
    pub response: String,
    pub conversation_id: ConversationId,
    pub message_type: MessageType,
    pub requires_action: bool,
    pub suggestions: Vec<String>,
    pub tools_used: Vec<String>,
}

/// What the service can do, for the capabilities endpoint.
#[derive(Debug, Serialize)]
pub struct Capabilities {
    pub scenarios: Vec<String>,
    pub tools: Vec<String>,
    pub example_queries: Vec<String>,
}

/// Component reachability, for the health endpoint.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub reasoning_available: bool,
    pub gateway_available: bool,
    pub gateway_tools: usize,
    pub status: &'static str,
}

/// The service behind the HTTP layer.
pub struct AnalysisService {
    reasoning: Arc<FailoverReasoningClient>,
    gateway_config: crate::config::GatewayConfig,
    engine_config: EngineConfig,
    conversations: Arc<ConversationStore>,
}

impl AnalysisService {
    /// Builds the service from application configuration.
    ///
    /// # Errors
    ///
    /// Returns `ReasoningError` if the reasoning backend cannot be
    /// constructed.
    pub fn new(config: &AppConfig) -> Result<Self, ReasoningError> {
        let gemini = GeminiBackend::new(
            GeminiConfig::new(config.reasoning.api_key().unwrap_or_default())
                .with_base_url(&config.reasoning.base_url)
                .with_timeout(config.reasoning.timeout()),
        )?;

        let reasoning = FailoverReasoningClient::new(
            Arc::new(gemini),
            config.reasoning.models_list(),
        )
        .with_base_delay(config.reasoning.base_delay())
        .with_max_retries(config.reasoning.max_retries);

        Ok(Self {
            reasoning: Arc::new(reasoning),
            gateway_config: config.gateway.clone(),
            engine_config: EngineConfig {
                max_iterations: config.analysis.max_iterations,
                plan_first: config.analysis.plan_first,
            },
            conversations: Arc::new(ConversationStore::with_capacity(
                config.analysis.conversation_capacity,
            )),
        })
    }

    /// Runs one single-shot analysis.
    ///
    /// # Errors
    ///
    /// Fails only when the gateway session cannot be established or the
    /// gateway violates the protocol; all other failures degrade into the
    /// returned state.
    pub async fn analyze(
        &self,
        query: &str,
        context: serde_json::Value,
        preferences: &str,
        constraints: serde_json::Value,
    ) -> Result<AnalysisState, GatewayError> {
        let analysis_type = scenarios::classify_analysis_type(query);
        info!(query, analysis_type, "starting analysis run");

        let state = AnalysisState::new(query, analysis_type)
            .with_context(context)
            .with_preferences(preferences)
            .with_constraints(constraints);

        let gateway = HttpToolGateway::connect(&self.gateway_config).await?;
        let engine =
            AnalysisEngine::new(&gateway, self.reasoning.as_ref(), self.engine_config.clone());
        let outcome = engine.run(state, AnalysisMode::SingleShot).await?;

        Ok(match outcome {
            AnalysisOutcome::Responded(state) | AnalysisOutcome::Aborted(state) => state,
            AnalysisOutcome::AwaitingUser { state, .. } => state,
        })
    }

    /// Processes one chat turn, maintaining session context.
    ///
    /// # Errors
    ///
    /// Fails only when an analytical turn cannot establish its gateway
    /// session.
    pub async fn chat(
        &self,
        message: &str,
        conversation_id: Option<ConversationId>,
    ) -> Result<ChatOutcome, GatewayError> {
        let id = conversation_id.unwrap_or_else(|| self.conversations.create());
        self.conversations.append(id, Role::User, message);

        if is_small_talk(message) {
            let context = self.conversations.windowed_context(id, DEFAULT_CONTEXT_WINDOW);
            let response = match self
                .reasoning
                .complete(&prompts::chat_prompt(&context, message), &GenerationOptions::default())
                .await
            {
                Ok(text) => text,
                Err(err) => {
                    warn!(error = %err, "small-talk completion failed; using canned reply");
                    SMALL_TALK_FALLBACK.to_string()
                }
            };
            self.conversations.append(id, Role::Assistant, &response);
            return Ok(ChatOutcome {
                response,
                conversation_id: id,
                message_type: MessageType::SmallTalk,
                requires_action: false,
                suggestions: Vec::new(),
                tools_used: Vec::new(),
            });
        }

        let analysis_type = scenarios::classify_analysis_type(message);
        let state = AnalysisState::new(message, analysis_type);

        let gateway = HttpToolGateway::connect(&self.gateway_config).await?;
        let engine =
            AnalysisEngine::new(&gateway, self.reasoning.as_ref(), self.engine_config.clone());
        let outcome = engine.run(state, AnalysisMode::Chat).await?;

        let outcome = match outcome {
            AnalysisOutcome::Responded(state) => {
                let response = state
                    .final_response
                    .clone()
                    .unwrap_or_else(|| report::fallback_report(&state));
                ChatOutcome {
                    response,
                    conversation_id: id,
                    message_type: MessageType::Analysis,
                    requires_action: true,
                    suggestions: Vec::new(),
                    tools_used: state.tools_used(),
                }
            }
            AnalysisOutcome::AwaitingUser {
                state,
                question,
                suggestions,
            } => ChatOutcome {
                response: question,
                conversation_id: id,
                message_type: MessageType::FollowUp,
                requires_action: true,
                suggestions,
                tools_used: state.tools_used(),
            },
            AnalysisOutcome::Aborted(state) => ChatOutcome {
                response: report::fallback_report(&state),
                conversation_id: id,
                message_type: MessageType::Analysis,
                requires_action: false,
                suggestions: Vec::new(),
                tools_used: state.tools_used(),
            },
        };

        self.conversations.append(id, Role::Assistant, &outcome.response);
        Ok(outcome)
    }

    /// Describes supported scenarios and the live tool catalog. A gateway
    /// failure degrades to an empty tool list.
    pub async fn capabilities(&self) -> Capabilities {
        let tools = match HttpToolGateway::connect(&self.gateway_config).await {
            Ok(gateway) => gateway
                .tools()
                .iter()
                .map(|tool| tool.name.clone())
                .collect(),
            Err(err) => {
                warn!(error = %err, "gateway unreachable while listing capabilities");
                Vec::new()
            }
        };

        Capabilities {
            scenarios: scenarios::SCENARIOS
                .iter()
                .map(|s| s.key.to_string())
                .collect(),
            tools,
            example_queries: scenarios::EXAMPLE_QUERIES
                .iter()
                .map(|q| q.to_string())
                .collect(),
        }
    }

    /// Probes the reasoning backend and the gateway.
    pub async fn health(&self) -> HealthStatus {
        let reasoning_available = self
            .reasoning
            .complete(
                "Reply with a single word: ok",
                &GenerationOptions::default().with_max_output_tokens(8),
            )
            .await
            .is_ok();

        let (gateway_available, gateway_tools) =
            match HttpToolGateway::connect(&self.gateway_config).await {
                Ok(gateway) => (true, gateway.tools().len()),
                Err(_) => (false, 0),
            };

        let status = match (reasoning_available, gateway_available) {
            (true, true) => "healthy",
            (true, false) => "degraded",
            _ => "unhealthy",
        };

        HealthStatus {
            reasoning_available,
            gateway_available,
            gateway_tools,
            status,
        }
    }
}

/// Heuristic for messages answerable without tools: greetings, thanks, and
/// questions about the assistant itself.
fn is_small_talk(message: &str) -> bool {
    let lowered = message.trim().to_lowercase();
    const PREFIXES: &[&str] = &["你好", "hello", "hi ", "hi!", "谢谢", "thank", "再见", "bye"];
    const FRAGMENTS: &[&str] = &["你是", "什么是", "如何使用", "who are you", "what can you do", "how do i use"];

    if lowered == "hi" {
        return true;
    }
    PREFIXES.iter().any(|p| lowered.starts_with(p))
        || FRAGMENTS.iter().any(|f| lowered.contains(f))
}

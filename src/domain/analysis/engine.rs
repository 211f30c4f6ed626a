//! Analysis engine: the bounded reasoning/tool-call orchestration loop.
//!
//! The loop alternates between asking the reasoning engine for the next
//! action and executing that action against the tool gateway, folding
//! results into the run state until a terminal decision or the iteration
//! bound is reached.
//!
//! # Degradation
//!
//! The loop absorbs everything it can into a complete-but-degraded outcome:
//! failed tool calls are recorded and the loop continues; reasoning-engine
//! exhaustion and an exhausted iteration bound both force a best-effort
//! final response from whatever data exists. Only gateway protocol
//! violations propagate as errors.

use tracing::{debug, info, warn};

use crate::domain::foundation::truncate;
use crate::ports::{CompletionClient, GatewayError, GenerationOptions, ToolGateway};

use super::decision::Decision;
use super::prompts;
use super::report;
use super::state::{AnalysisState, CategoryRegistry, ToolCallRecord};

/// Tuning for one engine instance.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Upper bound on decision consultations per run.
    pub max_iterations: u32,
    /// Whether to request a high-level plan before iterating.
    pub plan_first: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_iterations: 15,
            plan_first: true,
        }
    }
}

/// How the engine treats follow-up questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisMode {
    /// One-shot request; follow-up questions degrade to a response from
    /// whatever data exists, because nobody can answer them.
    SingleShot,
    /// Conversational turn; the loop may stop to ask the user.
    Chat,
}

/// Terminal outcome of one engine run.
#[derive(Debug)]
pub enum AnalysisOutcome {
    /// The loop produced a final synthesized response.
    Responded(AnalysisState),
    /// The loop stopped to ask the user a follow-up question (chat mode).
    AwaitingUser {
        state: AnalysisState,
        question: String,
        suggestions: Vec<String>,
    },
    /// The loop stopped without an answer.
    Aborted(AnalysisState),
}

/// The orchestration loop over one gateway session.
pub struct AnalysisEngine<'a> {
    gateway: &'a dyn ToolGateway,
    reasoning: &'a dyn CompletionClient,
    config: EngineConfig,
}

impl<'a> AnalysisEngine<'a> {
    /// Creates an engine over an open gateway session and a reasoning
    /// client.
    pub fn new(
        gateway: &'a dyn ToolGateway,
        reasoning: &'a dyn CompletionClient,
        config: EngineConfig,
    ) -> Self {
        Self {
            gateway,
            reasoning,
            config,
        }
    }

    /// Runs the loop to a terminal outcome.
    ///
    /// # Errors
    ///
    /// Only gateway protocol violations propagate; every other failure is
    /// absorbed into a degraded outcome.
    pub async fn run(
        &self,
        mut state: AnalysisState,
        mode: AnalysisMode,
    ) -> Result<AnalysisOutcome, GatewayError> {
        let registry = CategoryRegistry::from_catalog(self.gateway.tools());
        let catalog = self.gateway.describe_tools();

        if self.config.plan_first {
            self.plan(&state, &catalog).await;
        }

        let mut iteration: u32 = 0;
        while iteration < self.config.max_iterations {
            iteration += 1;

            let prompt = prompts::decision_prompt(&state, &catalog);
            let response = match self
                .reasoning
                .complete(&prompt, &GenerationOptions::default())
                .await
            {
                Ok(text) => text,
                Err(err) => {
                    warn!(
                        iteration,
                        error = %err,
                        "reasoning engine exhausted; producing best-effort response"
                    );
                    self.finalize(&mut state).await;
                    return Ok(AnalysisOutcome::Responded(state));
                }
            };

            debug!(iteration, decision = %truncate(&response, 200), "reasoning decision");

            match Decision::parse(&response) {
                Decision::CallTool {
                    tool_name,
                    arguments,
                    reason,
                } => {
                    let result = self.gateway.call_tool(&tool_name, arguments.clone()).await?;
                    let record =
                        ToolCallRecord::new(iteration, &tool_name, arguments, result, reason);
                    if record.success {
                        info!(tool = %record.tool_name, iteration, "tool call succeeded");
                    } else {
                        warn!(
                            tool = %record.tool_name,
                            iteration,
                            error = record.error.as_deref().unwrap_or(""),
                            "tool call failed; continuing"
                        );
                    }
                    let category = registry.category_for(&record.tool_name);
                    state.record_call(record, category);
                }
                Decision::GenerateResponse { reason } => {
                    debug!(%reason, iteration, "reasoning engine chose to respond");
                    self.finalize(&mut state).await;
                    return Ok(AnalysisOutcome::Responded(state));
                }
                Decision::AskUser {
                    question,
                    suggestions,
                } => match mode {
                    AnalysisMode::Chat => {
                        info!(%question, iteration, "surfacing follow-up question to the user");
                        return Ok(AnalysisOutcome::AwaitingUser {
                            state,
                            question,
                            suggestions,
                        });
                    }
                    AnalysisMode::SingleShot => {
                        debug!(
                            %question,
                            iteration,
                            "follow-up question in single-shot mode; responding with existing data"
                        );
                        self.finalize(&mut state).await;
                        return Ok(AnalysisOutcome::Responded(state));
                    }
                },
                Decision::NeedMoreInfo { description } => {
                    warn!(%description, iteration, "reasoning engine lacks information; aborting");
                    return Ok(AnalysisOutcome::Aborted(state));
                }
                Decision::Unparseable => {
                    warn!(
                        iteration,
                        response = %truncate(&response, 200),
                        "unparseable reasoning decision; aborting"
                    );
                    return Ok(AnalysisOutcome::Aborted(state));
                }
            }
        }

        warn!(
            max_iterations = self.config.max_iterations,
            "iteration bound reached; producing best-effort response"
        );
        self.finalize(&mut state).await;
        Ok(AnalysisOutcome::Responded(state))
    }

    /// Optional planning consult; the plan is logged for observability and
    /// does not gate any behavior.
    async fn plan(&self, state: &AnalysisState, catalog: &str) {
        let prompt = prompts::planning_prompt(state, catalog);
        match self
            .reasoning
            .complete(&prompt, &GenerationOptions::default())
            .await
        {
            Ok(plan) => debug!(plan = %truncate(&plan, 500), "analysis plan"),
            Err(err) => warn!(error = %err, "planning consult failed; continuing without a plan"),
        }
    }

    /// Sets the final response: a reasoning synthesis over the collected
    /// data, or the static fallback report when that consult fails.
    async fn finalize(&self, state: &mut AnalysisState) {
        let prompt = report::response_prompt(state);
        let options = GenerationOptions::default().with_temperature(0.1);
        let response = match self.reasoning.complete(&prompt, &options).await {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "report synthesis failed; using fallback report");
                report::fallback_report(state)
            }
        };
        state.final_response = Some(response);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::gateway::MockToolGateway;
    use crate::adapters::reasoning::{
        FailoverReasoningClient, MockReasoningBackend, MockReasoningError,
    };
    use crate::domain::analysis::state::DataCategory;
    use std::sync::Arc;
    use std::time::Duration;

    const CALL_GEO: &str =
        "CALL_TOOL\ntool: maps_geo\narguments: {\"address\": \"X\"}\nreason: locate";
    const GENERATE: &str = "GENERATE_RESPONSE\nreason: enough data";

    fn config() -> EngineConfig {
        EngineConfig {
            max_iterations: 5,
            plan_first: false,
        }
    }

    fn reasoning_over(backend: &MockReasoningBackend) -> FailoverReasoningClient {
        FailoverReasoningClient::new(Arc::new(backend.clone()), vec!["model-a".to_string()])
            .with_base_delay(Duration::from_millis(5))
            .with_max_retries(0)
    }

    fn responded(outcome: AnalysisOutcome) -> AnalysisState {
        match outcome {
            AnalysisOutcome::Responded(state) => state,
            other => panic!("expected Responded, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn call_then_generate_collects_and_responds() {
        let gateway = MockToolGateway::new()
            .with_tool("maps_geo", "Geocode an address")
            .with_result(serde_json::json!({"content": [{"type": "text", "text": "{}"}]}));
        let backend = MockReasoningBackend::new()
            .with_response(CALL_GEO)
            .with_response(GENERATE)
            .with_response("Final report");
        let reasoning = reasoning_over(&backend);
        let engine = AnalysisEngine::new(&gateway, &reasoning, config());

        let state = responded(
            engine
                .run(AnalysisState::new("test", "general"), AnalysisMode::SingleShot)
                .await
                .unwrap(),
        );

        assert_eq!(state.tool_calls.len(), 1);
        assert_eq!(
            state.collected_data.get(&DataCategory::Coordinates).map(Vec::len),
            Some(1)
        );
        assert_eq!(state.final_response.as_deref(), Some("Final report"));
        // Two decision consults plus the synthesis consult.
        assert_eq!(backend.call_count(), 3);
    }

    #[tokio::test]
    async fn always_call_tool_terminates_at_bound() {
        let gateway = MockToolGateway::new().with_tool("maps_geo", "Geocode");
        let backend = MockReasoningBackend::new().with_default_response(CALL_GEO);
        let reasoning = reasoning_over(&backend);
        let engine = AnalysisEngine::new(&gateway, &reasoning, config());

        let state = responded(
            engine
                .run(AnalysisState::new("test", "general"), AnalysisMode::SingleShot)
                .await
                .unwrap(),
        );

        assert!(state.final_response.is_some());
        assert_eq!(state.tool_calls.len(), 5);
        // max_iterations decisions plus one synthesis consult.
        assert_eq!(backend.call_count(), 6);
    }

    #[tokio::test]
    async fn failed_tool_call_does_not_stop_the_loop() {
        let gateway = MockToolGateway::new()
            .with_tool("maps_geo", "Geocode")
            .with_failure("status 500");
        let backend = MockReasoningBackend::new()
            .with_response(CALL_GEO)
            .with_response(GENERATE)
            .with_response("report");
        let reasoning = reasoning_over(&backend);
        let engine = AnalysisEngine::new(&gateway, &reasoning, config());

        let state = responded(
            engine
                .run(AnalysisState::new("test", "general"), AnalysisMode::SingleShot)
                .await
                .unwrap(),
        );

        assert_eq!(state.tool_calls.len(), 1);
        assert!(!state.tool_calls[0].success);
        assert!(state.collected_data.is_empty());
        // The loop went on to a second decision after the failure.
        assert_eq!(backend.call_count(), 3);
        assert!(state.final_response.is_some());
    }

    #[tokio::test]
    async fn ask_user_surfaces_in_chat_mode() {
        let gateway = MockToolGateway::new();
        let backend = MockReasoningBackend::new()
            .with_response("ASK_USER\nquestion: Which city?\nsuggestions: Beijing, Shanghai");
        let reasoning = reasoning_over(&backend);
        let engine = AnalysisEngine::new(&gateway, &reasoning, config());

        let outcome = engine
            .run(AnalysisState::new("test", "general"), AnalysisMode::Chat)
            .await
            .unwrap();

        match outcome {
            AnalysisOutcome::AwaitingUser {
                question,
                suggestions,
                ..
            } => {
                assert_eq!(question, "Which city?");
                assert_eq!(suggestions, vec!["Beijing", "Shanghai"]);
            }
            other => panic!("expected AwaitingUser, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn ask_user_forces_response_in_single_shot_mode() {
        let gateway = MockToolGateway::new();
        let backend = MockReasoningBackend::new()
            .with_response("ASK_USER\nquestion: Which city?")
            .with_response("best effort report");
        let reasoning = reasoning_over(&backend);
        let engine = AnalysisEngine::new(&gateway, &reasoning, config());

        let state = responded(
            engine
                .run(AnalysisState::new("test", "general"), AnalysisMode::SingleShot)
                .await
                .unwrap(),
        );

        assert_eq!(state.final_response.as_deref(), Some("best effort report"));
    }

    #[tokio::test]
    async fn unparseable_decision_aborts_without_response() {
        let gateway = MockToolGateway::new();
        let backend = MockReasoningBackend::new().with_response("some prose with no marker");
        let reasoning = reasoning_over(&backend);
        let engine = AnalysisEngine::new(&gateway, &reasoning, config());

        let outcome = engine
            .run(AnalysisState::new("test", "general"), AnalysisMode::SingleShot)
            .await
            .unwrap();

        match outcome {
            AnalysisOutcome::Aborted(state) => assert!(state.final_response.is_none()),
            other => panic!("expected Aborted, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn need_more_info_aborts() {
        let gateway = MockToolGateway::new();
        let backend =
            MockReasoningBackend::new().with_response("NEED_MORE_INFO\n需要的信息: 出发城市");
        let reasoning = reasoning_over(&backend);
        let engine = AnalysisEngine::new(&gateway, &reasoning, config());

        let outcome = engine
            .run(AnalysisState::new("test", "general"), AnalysisMode::SingleShot)
            .await
            .unwrap();

        assert!(matches!(outcome, AnalysisOutcome::Aborted(_)));
    }

    #[tokio::test]
    async fn reasoning_exhaustion_degrades_to_fallback_report() {
        let gateway = MockToolGateway::new();
        let backend =
            MockReasoningBackend::new().with_default_error(MockReasoningError::Unavailable);
        let reasoning = reasoning_over(&backend);
        let engine = AnalysisEngine::new(&gateway, &reasoning, config());

        let state = responded(
            engine
                .run(AnalysisState::new("test", "general"), AnalysisMode::SingleShot)
                .await
                .unwrap(),
        );

        let response = state.final_response.expect("degraded response must exist");
        assert!(response.contains("incomplete"));
    }

    #[tokio::test]
    async fn gateway_protocol_violation_propagates() {
        let gateway = MockToolGateway::new()
            .with_tool("maps_geo", "Geocode")
            .with_protocol_error("id mismatch");
        let backend = MockReasoningBackend::new().with_response(CALL_GEO);
        let reasoning = reasoning_over(&backend);
        let engine = AnalysisEngine::new(&gateway, &reasoning, config());

        let result = engine
            .run(AnalysisState::new("test", "general"), AnalysisMode::SingleShot)
            .await;

        assert!(matches!(result, Err(GatewayError::Protocol { .. })));
    }

    #[tokio::test]
    async fn planning_consult_failure_is_tolerated() {
        let gateway = MockToolGateway::new();
        let backend = MockReasoningBackend::new()
            .with_error(MockReasoningError::Unavailable)
            .with_response(GENERATE)
            .with_response("report");
        let reasoning = reasoning_over(&backend);
        let engine = AnalysisEngine::new(
            &gateway,
            &reasoning,
            EngineConfig {
                max_iterations: 5,
                plan_first: true,
            },
        );

        let state = responded(
            engine
                .run(AnalysisState::new("test", "general"), AnalysisMode::SingleShot)
                .await
                .unwrap(),
        );

        assert_eq!(state.final_response.as_deref(), Some("report"));
    }

    #[tokio::test]
    async fn iteration_numbers_are_monotonic_and_bounded() {
        let gateway = MockToolGateway::new().with_tool("maps_geo", "Geocode");
        let backend = MockReasoningBackend::new().with_default_response(CALL_GEO);
        let reasoning = reasoning_over(&backend);
        let engine = AnalysisEngine::new(&gateway, &reasoning, config());

        let state = responded(
            engine
                .run(AnalysisState::new("test", "general"), AnalysisMode::SingleShot)
                .await
                .unwrap(),
        );

        let iterations: Vec<u32> = state.tool_calls.iter().map(|c| c.iteration).collect();
        for pair in iterations.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
        assert!(iterations.iter().all(|&i| i >= 1 && i <= 5));
    }
}

//! HTTP handlers for the analysis API.
//!
//! Handlers never panic; analysis failures map to structured error bodies.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::{error, info};

use crate::application::AnalysisService;
use crate::domain::analysis::report;
use crate::domain::foundation::{ConversationId, Timestamp};

use super::dto::{
    AnalyzeMetadata, AnalyzeRequest, AnalyzeResponse, CapabilitiesResponse, ChatRequest,
    ChatResponse, ErrorResponse, ExamplesResponse, HealthResponse, UsageExample,
};

/// Application state for the analysis endpoints.
#[derive(Clone)]
pub struct AppState {
    /// The analysis service (shared).
    pub service: Arc<AnalysisService>,
}

/// Run a single-shot analysis.
///
/// POST /api/analyze
pub async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> impl IntoResponse {
    info!(query = %request.query, "processing analysis request");

    match state
        .service
        .analyze(
            &request.query,
            request.context,
            &request.preferences,
            request.constraints,
        )
        .await
    {
        Ok(analysis) => {
            let response = analysis
                .final_response
                .clone()
                .unwrap_or_else(|| report::fallback_report(&analysis));
            (
                StatusCode::OK,
                Json(AnalyzeResponse {
                    success: analysis.final_response.is_some(),
                    response,
                    analysis_type: analysis.analysis_type.clone(),
                    tools_used: analysis.tools_used(),
                    metadata: AnalyzeMetadata {
                        query: analysis.query.clone(),
                        tool_calls: analysis.tool_calls.len(),
                        successful_calls: analysis.successful_calls(),
                        data_categories: analysis.collected_data.len(),
                    },
                }),
            )
                .into_response()
        }
        Err(err) => {
            error!(error = %err, "analysis run failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(err.to_string())),
            )
                .into_response()
        }
    }
}

/// Process one chat turn.
///
/// POST /api/chat
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> impl IntoResponse {
    info!(message = %request.message, "processing chat message");

    let conversation_id = match request.conversation_id.as_deref() {
        Some(raw) => match raw.parse::<ConversationId>() {
            Ok(id) => Some(id),
            Err(_) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::new("invalid conversation_id format")),
                )
                    .into_response();
            }
        },
        None => None,
    };

    match state.service.chat(&request.message, conversation_id).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(ChatResponse {
                success: true,
                response: outcome.response,
                conversation_id: outcome.conversation_id.to_string(),
                message_type: outcome.message_type,
                requires_action: outcome.requires_action,
                suggestions: outcome.suggestions,
                tools_used: outcome.tools_used,
            }),
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, "chat turn failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(err.to_string())),
            )
                .into_response()
        }
    }
}

/// Describe supported scenarios and the live tool catalog.
///
/// GET /api/capabilities
pub async fn capabilities(State(state): State<AppState>) -> impl IntoResponse {
    let capabilities = state.service.capabilities().await;
    Json(CapabilitiesResponse {
        supported_scenarios: capabilities.scenarios,
        available_tools: capabilities.tools,
        example_queries: capabilities.example_queries,
    })
}

/// Static usage examples.
///
/// GET /api/examples
pub async fn examples() -> impl IntoResponse {
    Json(ExamplesResponse {
        usage_examples: vec![
            UsageExample {
                category: "rental_housing",
                query: "我在北京海淀区和朝阳区都有工作，想找一个通勤方便的房子，预算5000-8000元",
                expected_analysis: vec!["geocoding", "transit routes", "nearby amenities"],
            },
            UsageExample {
                category: "travel_planning",
                query: "我想去成都玩3天，喜欢美食和历史文化，预算3000元",
                expected_analysis: vec!["sights", "food", "lodging", "itinerary"],
            },
            UsageExample {
                category: "route_planning",
                query: "从上海到杭州最经济的出行方式是什么？",
                expected_analysis: vec!["transit comparison", "cost", "duration"],
            },
            UsageExample {
                category: "accommodation",
                query: "下周要去深圳出差，需要住在会展中心附近的商务酒店",
                expected_analysis: vec!["hotel search", "location analysis"],
            },
        ],
    })
}

/// Component health probe.
///
/// GET /api/health
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let health = state.service.health().await;
    Json(HealthResponse {
        status: health.status.to_string(),
        reasoning_available: health.reasoning_available,
        gateway_available: health.gateway_available,
        gateway_tools: health.gateway_tools,
        timestamp: Timestamp::now().to_rfc3339(),
    })
}

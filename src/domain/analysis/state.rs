//! Analysis run state: tool-call records and accumulated data.
//!
//! One `AnalysisState` is owned by one orchestration run. Tool calls are
//! append-only, collected data is grouped by category, and the state becomes
//! terminal once a final response is set.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::ports::ToolDescriptor;

/// Category a tool result is filed under in the collected data.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DataCategory {
    /// Geocoding results.
    Coordinates,
    /// Routing/direction results.
    Routes,
    /// Nearby place search results.
    NearbyPois,
    /// Keyword search results.
    SearchResults,
    /// Anything from a tool with no known category.
    #[serde(rename = "other_data")]
    Other,
}

impl DataCategory {
    /// String form used in prompts and summaries.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataCategory::Coordinates => "coordinates",
            DataCategory::Routes => "routes",
            DataCategory::NearbyPois => "nearby_pois",
            DataCategory::SearchResults => "search_results",
            DataCategory::Other => "other_data",
        }
    }
}

impl fmt::Display for DataCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tool-name to category map, built once per gateway session from the
/// loaded catalog. Names absent from the catalog fall back to
/// [`DataCategory::Other`] at lookup.
#[derive(Debug, Clone, Default)]
pub struct CategoryRegistry {
    categories: HashMap<String, DataCategory>,
}

impl CategoryRegistry {
    /// Builds the registry from the tool catalog, applying the tool naming
    /// conventions once at session start.
    pub fn from_catalog(tools: &[ToolDescriptor]) -> Self {
        let categories = tools
            .iter()
            .map(|tool| (tool.name.clone(), Self::classify(&tool.name)))
            .collect();
        Self { categories }
    }

    fn classify(name: &str) -> DataCategory {
        if name.contains("geo") {
            DataCategory::Coordinates
        } else if name.contains("direction") {
            DataCategory::Routes
        } else if name.contains("around_search") {
            DataCategory::NearbyPois
        } else if name.contains("text_search") {
            DataCategory::SearchResults
        } else {
            DataCategory::Other
        }
    }

    /// Category for a tool name; unknown names fall back to `Other`.
    pub fn category_for(&self, tool_name: &str) -> DataCategory {
        self.categories
            .get(tool_name)
            .copied()
            .unwrap_or(DataCategory::Other)
    }
}

/// Record of one tool invocation within a run. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRecord {
    /// Loop iteration that issued the call (1-based).
    pub iteration: u32,
    /// Name of the invoked tool.
    pub tool_name: String,
    /// Arguments sent to the tool.
    pub arguments: serde_json::Value,
    /// Raw result, present for completed calls (including failed ones).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    /// Failure description, absent for successful calls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Why the reasoning engine chose this call.
    pub reason: String,
    /// Derived: true exactly when `error` is absent.
    pub success: bool,
}

impl ToolCallRecord {
    /// Records a completed call. A result carrying an `"error"` key is a
    /// failed call; success is derived, never set independently.
    pub fn new(
        iteration: u32,
        tool_name: impl Into<String>,
        arguments: serde_json::Value,
        result: serde_json::Value,
        reason: impl Into<String>,
    ) -> Self {
        let error = result.get("error").map(|e| match e.as_str() {
            Some(message) => message.to_string(),
            None => e.to_string(),
        });
        let success = error.is_none();
        Self {
            iteration,
            tool_name: tool_name.into(),
            arguments,
            result: Some(result),
            error,
            reason: reason.into(),
            success,
        }
    }
}

/// Accumulated state of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisState {
    /// The user's request.
    pub query: String,
    /// Classified analysis type ("route_planning", "general", ...).
    pub analysis_type: String,
    /// Optional caller-supplied context.
    #[serde(default)]
    pub context: serde_json::Value,
    /// Free-text user preferences.
    #[serde(default)]
    pub preferences: String,
    /// Structured constraints (budget, time, ...).
    #[serde(default)]
    pub constraints: serde_json::Value,
    /// Every tool call made, in call order.
    pub tool_calls: Vec<ToolCallRecord>,
    /// Successful results grouped by category, in arrival order.
    pub collected_data: BTreeMap<DataCategory, Vec<serde_json::Value>>,
    /// The synthesized answer; the state is terminal once set.
    pub final_response: Option<String>,
}

impl AnalysisState {
    /// Creates a fresh run state for a query.
    pub fn new(query: impl Into<String>, analysis_type: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            analysis_type: analysis_type.into(),
            context: serde_json::Value::Null,
            preferences: String::new(),
            constraints: serde_json::Value::Null,
            tool_calls: Vec::new(),
            collected_data: BTreeMap::new(),
            final_response: None,
        }
    }

    /// Attaches caller-supplied context.
    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context = context;
        self
    }

    /// Attaches user preferences.
    pub fn with_preferences(mut self, preferences: impl Into<String>) -> Self {
        self.preferences = preferences.into();
        self
    }

    /// Attaches structured constraints.
    pub fn with_constraints(mut self, constraints: serde_json::Value) -> Self {
        self.constraints = constraints;
        self
    }

    /// Appends a call record, folding a successful result into the
    /// collected data under the given category. Failed calls are recorded
    /// but contribute no data.
    pub fn record_call(&mut self, record: ToolCallRecord, category: DataCategory) {
        if record.success {
            if let Some(result) = &record.result {
                self.collected_data
                    .entry(category)
                    .or_default()
                    .push(result.clone());
            }
        }
        self.tool_calls.push(record);
    }

    /// Number of successful tool calls so far.
    pub fn successful_calls(&self) -> usize {
        self.tool_calls.iter().filter(|c| c.success).count()
    }

    /// True once a final response has been set.
    pub fn is_terminal(&self) -> bool {
        self.final_response.is_some()
    }

    /// Names of all tools invoked, in call order.
    pub fn tools_used(&self) -> Vec<String> {
        self.tool_calls.iter().map(|c| c.tool_name.clone()).collect()
    }

    /// Current status description used in the decision prompt.
    pub fn status_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("user query: {}", self.query));
        parts.push(format!("analysis type: {}", self.analysis_type));

        if self.tool_calls.is_empty() {
            parts.push("no tool calls executed yet".to_string());
        } else {
            parts.push(format!(
                "tool calls executed: {} ({} successful)",
                self.tool_calls.len(),
                self.successful_calls()
            ));
            let mut by_tool: BTreeMap<&str, usize> = BTreeMap::new();
            for call in &self.tool_calls {
                *by_tool.entry(call.tool_name.as_str()).or_default() += 1;
            }
            for (name, count) in by_tool {
                parts.push(format!("  - {name}: {count} call(s)"));
            }
        }

        if self.collected_data.is_empty() {
            parts.push("no data collected yet".to_string());
        } else {
            parts.push("collected data:".to_string());
            for (category, items) in &self.collected_data {
                parts.push(format!("  - {}: {} record(s)", category, items.len()));
            }
        }

        parts.join("\n")
    }

    /// Compact history of past calls used in the decision prompt.
    pub fn call_history(&self) -> String {
        if self.tool_calls.is_empty() {
            return "none".to_string();
        }

        let mut lines = Vec::new();
        for (index, call) in self.tool_calls.iter().enumerate() {
            let status = if call.success { "success" } else { "failed" };
            lines.push(format!("{}. {} - {}", index + 1, call.tool_name, status));
            if !call.reason.is_empty() {
                lines.push(format!("   reason: {}", call.reason));
            }
            if let Some(error) = &call.error {
                lines.push(format!("   error: {}", error));
            }
        }
        lines.join("\n")
    }
}

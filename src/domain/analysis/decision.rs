//! Decision parsing: classifies free-form reasoning output into typed
//! actions.
//!
//! The reasoning engine answers the decision prompt in a line-oriented
//! grammar. Classification is a case-sensitive marker search over the full
//! text with fixed precedence; anything that matches no marker (or a tool
//! call with no tool name) is `Unparseable`, which the loop treats as a
//! terminal outcome rather than an error.
//!
//! Field labels are accepted in both the Chinese and English forms the
//! grammar defines, e.g. `工具名称:` / `tool:`.

use serde::Serialize;

/// One classified action from a reasoning response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Decision {
    /// Invoke one gateway tool.
    CallTool {
        tool_name: String,
        /// Always a JSON object, even for malformed input (permissive
        /// decoding wraps free text as `{"query": ...}`).
        arguments: serde_json::Value,
        reason: String,
    },
    /// Enough data collected; synthesize the final answer.
    GenerateResponse { reason: String },
    /// Ask the user a follow-up question before continuing.
    AskUser {
        question: String,
        suggestions: Vec<String>,
    },
    /// Information is missing that no tool can provide.
    NeedMoreInfo { description: String },
    /// The response matched no known action grammar.
    Unparseable,
}

impl Decision {
    /// Classifies a reasoning response. Never fails; unrecognized input
    /// yields [`Decision::Unparseable`].
    pub fn parse(text: &str) -> Decision {
        if text.contains("CALL_TOOL") {
            return Self::parse_call_tool(text);
        }
        if text.contains("GENERATE_ANALYSIS")
            || text.contains("GENERATE_RESPONSE")
            || text.contains("GENERATE_FINAL_RESPONSE")
        {
            return Decision::GenerateResponse {
                reason: labeled_field(text, &["原因:", "reason:"]).unwrap_or_default(),
            };
        }
        if text.contains("ASK_USER") {
            return Self::parse_ask_user(text);
        }
        if text.contains("NEED_MORE_INFO") {
            return Decision::NeedMoreInfo {
                description: labeled_field(text, &["需要的信息:"]).unwrap_or_default(),
            };
        }
        Decision::Unparseable
    }

    fn parse_call_tool(text: &str) -> Decision {
        let tool_name = labeled_field(text, &["工具名称:", "tool:"]);
        let arguments = labeled_field(text, &["参数:", "arguments:"])
            .map(|raw| parse_arguments(&raw))
            .unwrap_or_else(|| serde_json::json!({}));
        let reason = labeled_field(text, &["原因:", "reason:"]).unwrap_or_default();

        match tool_name {
            // A tool call without a name must not reach the gateway.
            Some(name) if !name.is_empty() => Decision::CallTool {
                tool_name: name,
                arguments,
                reason,
            },
            _ => Decision::Unparseable,
        }
    }

    fn parse_ask_user(text: &str) -> Decision {
        let question = labeled_field(text, &["问题:", "question:"]).unwrap_or_default();
        let suggestions = labeled_field(text, &["建议:", "suggestions:"])
            .map(|raw| split_list(&raw))
            .unwrap_or_default();
        Decision::AskUser {
            question,
            suggestions,
        }
    }
}

/// Returns the remainder of the first line prefixed by any of `labels`,
/// trimmed of surrounding whitespace.
fn labeled_field(text: &str, labels: &[&str]) -> Option<String> {
    for line in text.lines() {
        let line = line.trim();
        for label in labels {
            if let Some(rest) = line.strip_prefix(label) {
                return Some(rest.trim().to_string());
            }
        }
    }
    None
}

/// Permissive argument decoding: text that looks like a JSON object is
/// parsed as one; anything else (including malformed JSON) is wrapped as a
/// single `query` field so arguments are always a well-formed mapping.
fn parse_arguments(raw: &str) -> serde_json::Value {
    let trimmed = raw.trim();
    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        if let Ok(serde_json::Value::Object(map)) = serde_json::from_str(trimmed) {
            return serde_json::Value::Object(map);
        }
    }
    serde_json::json!({ "query": trimmed })
}

/// Splits a one-line suggestion list on common separators.
fn split_list(raw: &str) -> Vec<String> {
    raw.split([',', '、', ';'])
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

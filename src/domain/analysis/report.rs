//! Final report synthesis from collected analysis data.
//!
//! Builds the response prompt sent to the reasoning engine once the loop
//! decides to answer, and the static fallback report used when that last
//! consult fails. Both are explicit about incomplete data rather than
//! projecting certainty.

use crate::domain::foundation::truncate;

use super::state::AnalysisState;

/// Cap on digest items per data category, to bound prompt growth.
const MAX_ITEMS_PER_CATEGORY: usize = 3;

/// Cap on characters per digest item.
const MAX_ITEM_CHARS: usize = 300;

/// Compact digest of the collected data for the response prompt.
pub fn data_digest(state: &AnalysisState) -> String {
    if state.collected_data.is_empty() {
        return "no data was collected".to_string();
    }

    let mut sections = Vec::new();
    for (category, items) in &state.collected_data {
        let mut section = format!("=== {} ({} record(s)) ===", category, items.len());
        for (index, item) in items.iter().take(MAX_ITEMS_PER_CATEGORY).enumerate() {
            section.push_str(&format!("\n{}. {}", index + 1, item_summary(item)));
        }
        if items.len() > MAX_ITEMS_PER_CATEGORY {
            section.push_str(&format!(
                "\n... and {} more record(s)",
                items.len() - MAX_ITEMS_PER_CATEGORY
            ));
        }
        sections.push(section);
    }
    sections.join("\n\n")
}

/// Summarizes one raw tool result.
fn item_summary(item: &serde_json::Value) -> String {
    // Gateway tool results wrap their payload as
    // {"content": [{"type": "text", "text": ...}]}.
    if let Some(text) = item
        .get("content")
        .and_then(|c| c.get(0))
        .and_then(|block| block.get("text"))
        .and_then(|t| t.as_str())
    {
        return truncate(text, MAX_ITEM_CHARS);
    }
    truncate(&item.to_string(), MAX_ITEM_CHARS)
}

/// Prompt asking the reasoning engine for the final report, templated by
/// analysis type.
pub fn response_prompt(state: &AnalysisState) -> String {
    let base = format!(
        "User request: \"{query}\"\n\
         Analysis type: {analysis_type}\n\
         User preferences: {preferences}\n\
         Constraints: {constraints}\n\
         \n\
         Collected data:\n\
         {digest}\n",
        query = state.query,
        analysis_type = state.analysis_type,
        preferences = state.preferences,
        constraints = state.constraints,
        digest = data_digest(state),
    );

    let template = match state.analysis_type.as_str() {
        "route_planning" => {
            "Write a route planning report based strictly on the data above:\n\
             - recommended options with mode, total duration, distance, and cost\n\
             - a short comparison of the options\n\
             - concrete steps to follow (tickets, transfers)\n\
             - caveats (service hours, live traffic)\n"
        }
        "rental_housing" => {
            "Write a rental location report based strictly on the data above:\n\
             - at least two candidate areas with reasons\n\
             - commute analysis to each work location (route, time, cost)\n\
             - nearby amenities from the place data\n\
             - practical next steps and caveats\n"
        }
        "travel_planning" => {
            "Write a trip planning report based strictly on the data above:\n\
             - a day-by-day itinerary with sights, food, and lodging\n\
             - transport between stops\n\
             - a rough budget breakdown\n\
             - practical preparation notes\n"
        }
        _ => {
            "Write a clear, practical report based strictly on the data above:\n\
             - what the data says about the user's request\n\
             - concrete recommendations with specifics (places, times, costs)\n\
             - actionable next steps\n\
             - caveats\n"
        }
    };

    format!(
        "{base}\n{template}\n\
         Use only the collected data. Where the data is missing or a tool\n\
         call failed, say so explicitly instead of inventing specifics."
    )
}

/// Static degraded report used when the reasoning engine cannot produce the
/// final synthesis. States explicitly that the analysis is incomplete.
pub fn fallback_report(state: &AnalysisState) -> String {
    let mut lines = Vec::new();
    lines.push(format!("## {} report", state.analysis_type));
    lines.push(String::new());
    lines.push(format!("Request: {}", state.query));
    lines.push(String::new());

    if state.collected_data.is_empty() {
        lines.push("No data could be collected.".to_string());
    } else {
        lines.push("Data collected so far:".to_string());
        for (category, items) in &state.collected_data {
            lines.push(format!("- {}: {} record(s)", category, items.len()));
        }
    }

    let failed = state.tool_calls.len() - state.successful_calls();
    if failed > 0 {
        lines.push(format!("{failed} tool call(s) failed during the analysis."));
    }

    lines.push(String::new());
    lines.push(
        "This analysis is incomplete: the reasoning engine could not produce \
         a full report from the collected data. Please retry, or narrow the \
         request."
            .to_string(),
    );

    lines.join("\n")
}

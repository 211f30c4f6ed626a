//! Prompt construction for the orchestration loop.
//!
//! The decision prompt must ask for answers in exactly the grammar
//! [`Decision::parse`](super::Decision::parse) understands; changes here and
//! in the parser go together.

use super::state::AnalysisState;

/// Prompt asking for a high-level analysis plan (logged, not load-bearing).
pub fn planning_prompt(state: &AnalysisState, tool_catalog: &str) -> String {
    format!(
        "You are a travel analysis assistant working against live map tools.\n\
         \n\
         User request: \"{query}\"\n\
         Analysis type: {analysis_type}\n\
         User preferences: {preferences}\n\
         Constraints: {constraints}\n\
         \n\
         Available tools:\n\
         {tools}\n\
         \n\
         Lay out a short plan: which information to collect, which tools to\n\
         call in which order, and what each step is for.",
        query = state.query,
        analysis_type = state.analysis_type,
        preferences = state.preferences,
        constraints = state.constraints,
        tools = tool_catalog,
    )
}

/// Prompt asking for the next action, in the decision grammar.
pub fn decision_prompt(state: &AnalysisState, tool_catalog: &str) -> String {
    format!(
        "Current analysis state:\n\
         {status}\n\
         \n\
         Executed tool calls:\n\
         {history}\n\
         \n\
         Available tools:\n\
         {tools}\n\
         \n\
         Based on the state above and the user's request: \"{query}\"\n\
         \n\
         Decide the next action and answer in exactly one of these forms:\n\
         \n\
         1. To call a tool:\n\
         CALL_TOOL\n\
         tool: <tool name>\n\
         arguments: {{\"param\": \"value\"}}\n\
         reason: <why this call is needed>\n\
         \n\
         2. If enough information has been collected:\n\
         GENERATE_RESPONSE\n\
         reason: <why the answer can be produced now>\n\
         \n\
         3. To ask the user a follow-up question:\n\
         ASK_USER\n\
         question: <the question>\n\
         suggestions: <comma-separated options>\n\
         \n\
         4. If information is missing that no tool can provide:\n\
         NEED_MORE_INFO\n\
         需要的信息: <what is missing>",
        status = state.status_summary(),
        history = state.call_history(),
        tools = tool_catalog,
        query = state.query,
    )
}

/// Prompt for small-talk chat turns that need no tools.
pub fn chat_prompt(context: &str, message: &str) -> String {
    format!(
        "Conversation so far:\n\
         {context}\n\
         \n\
         User message: {message}\n\
         \n\
         You are a travel assistant. Reply briefly and helpfully. If the user\n\
         asks what you can do, mention: rental location analysis, trip\n\
         planning, route planning, place search, and accommodation\n\
         recommendations.",
    )
}

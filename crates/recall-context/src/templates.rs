/// Instruction for the first summary of a thread
pub const SUMMARY_CREATE_PROMPT: &str = "Create a summary of the conversation above as bullet points, \
following the flow of the conversation:";

/// Instruction for folding new messages into an existing summary. `{summary}` is replaced.
pub const SUMMARY_EXTEND_PROMPT: &str = "This is a summary of the conversation so far: {summary}\n\n\
Extend the summary by taking into account the new messages above:";

pub fn summarization_instruction(previous_summary: Option<&str>) -> String {
    match previous_summary {
        Some(summary) if !summary.trim().is_empty() => {
            SUMMARY_EXTEND_PROMPT.replace("{summary}", summary)
        }
        _ => SUMMARY_CREATE_PROMPT.to_string(),
    }
}

//! Strips crew execution logs from a raw crew reply.

/// Case-insensitive substrings marking a crew execution-log line.
const LOG_MARKERS: &[&str] = &[
    "agent:",
    "task:",
    "crew:",
    "executing",
    "delegating",
    "final answer:",
];

/// Keep only the lines a customer should see.
///
/// Lines carrying a log marker, blank lines, and lines starting with `[` or
/// `##` are dropped; kept lines are trimmed. If nothing survives, the raw
/// reply is returned verbatim so the caller never gets an empty answer.
pub fn clean_response(raw: &str) -> String {
    let kept: Vec<&str> = raw
        .lines()
        .filter(|line| {
            let lower = line.to_lowercase();
            !LOG_MARKERS.iter().any(|m| lower.contains(m))
        })
        .map(str::trim)
        // Prefix check runs on the trimmed line so a second pass is a no-op.
        .filter(|line| !line.is_empty() && !line.starts_with('[') && !line.starts_with("##"))
        .collect();

    if kept.is_empty() {
        raw.to_string()
    } else {
        kept.join("\n")
    }
}

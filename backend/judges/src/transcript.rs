use crewcheck_core::{ChatMessage, Role};

const AGENT_MARKER: &str = "AGENT:";
const CUSTOMER_MARKER: &str = "CUSTOMER:";
const SYSTEM_MARKER: &str = "SYSTEM:";

/// A conversation rendered for evaluation:
/// `CUSTOMER: …` / `AGENT: …` / `SYSTEM: …` blocks separated by blank lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    text: String,
    lower: String,
}

impl Transcript {
    pub fn from_messages(messages: &[ChatMessage]) -> Self {
        let text = messages
            .iter()
            .map(|m| {
                let label = match m.role {
                    Role::User => "CUSTOMER",
                    Role::Assistant => "AGENT",
                    Role::System => "SYSTEM",
                };
                format!("{label}: {}", m.content)
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        Self::from_text(text)
    }

    /// Wrap already-rendered transcript text.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let lower = text.to_lowercase();
        Self { text, lower }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Case-insensitive substring test.
    pub fn mentions(&self, needle: &str) -> bool {
        self.lower.contains(&needle.to_lowercase())
    }

    /// Case-sensitive substring test.
    pub fn contains_exact(&self, needle: &str) -> bool {
        self.text.contains(needle)
    }

    /// Text following each `AGENT: ` marker, up to the next `CUSTOMER:` or
    /// `SYSTEM:` block, or the end.
    pub fn agent_spans(&self) -> Vec<&str> {
        let marker = "AGENT: ";
        let mut spans = Vec::new();
        let mut pos = 0;
        while let Some(found) = self.text[pos..].find(marker) {
            let start = pos + found + marker.len();
            let rest = &self.text[start..];
            let end = [CUSTOMER_MARKER, SYSTEM_MARKER]
                .iter()
                .filter_map(|m| rest.find(m))
                .min()
                .map(|i| start + i)
                .unwrap_or(self.text.len());
            if end > start {
                spans.push(&self.text[start..end]);
            }
            pos = end;
            if pos >= self.text.len() {
                break;
            }
        }
        spans
    }

    /// Number of `AGENT:` turns.
    pub fn agent_turns(&self) -> usize {
        self.text.matches(AGENT_MARKER).count()
    }

    /// Number of `AGENT:` turns that start before the first case-insensitive
    /// occurrence of `keyword`, or `None` if the keyword never appears.
    ///
    /// `keyword` must be ASCII. The search runs on an ASCII-lowercased copy so
    /// byte offsets line up with the original text.
    pub fn agent_turns_before(&self, keyword: &str) -> Option<usize> {
        let cut = self
            .text
            .to_ascii_lowercase()
            .find(&keyword.to_ascii_lowercase())?;
        Some(self.text[..cut].matches(AGENT_MARKER).count())
    }
}

//! Seams to the collaborators around the pipeline: document text extraction,
//! a language-model completion service and a presentation file writer.
//!
//! Only the interfaces and the handling of their untrusted output live here.
//! Credentials and endpoints travel in [`ModelConfig`]; nothing is read from
//! the process environment.

use crate::annotate::IconMap;
use crate::deck::Slide;
use crate::error::{Error, Result};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub api_url: String,
    pub model: String,
    pub api_key: Option<String>,
    /// Source text beyond this many characters is cut before prompting.
    pub max_input_chars: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_url: "https://openrouter.ai/api/v1".to_string(),
            model: "google/gemini-2.5-flash-lite".to_string(),
            api_key: None,
            max_input_chars: 10_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    /// Ask the service for a bare JSON object reply.
    pub json_response: bool,
}

pub trait TextExtractor {
    fn extract_text(&self, document: &[u8]) -> anyhow::Result<String>;
}

pub trait CompletionClient {
    fn complete(&self, config: &ModelConfig, request: &CompletionRequest) -> anyhow::Result<String>;
}

/// Turns slide primitives into a downloadable file.
pub trait PresentationWriter {
    fn write(&mut self, slides: &[Slide]) -> anyhow::Result<Vec<u8>>;
}

const TRUNCATION_MARKER: &str = "... (truncated)";

pub fn build_flowchart_prompt(source_text: &str, config: &ModelConfig) -> CompletionRequest {
    let (excerpt, truncated) = match source_text.char_indices().nth(config.max_input_chars) {
        Some((cut, _)) => (&source_text[..cut], true),
        None => (source_text, false),
    };
    let marker = if truncated { TRUNCATION_MARKER } else { "" };
    let prompt = format!(
        "Create a flowchart that captures the main process, method or framework described \
in the text below.\n\n\
Text:\n{excerpt} {marker}\n\n\
Rules for the flowchart:\n\
- Start with `flowchart TD` or `flowchart LR`\n\
- Define each node once as `Id[Label]` on its own line\n\
- Write each connection as `Id --> Id` on its own line\n\
- Keep it focused on the main steps\n\n\
Reply with a JSON object of the form \
{{\"mermaid\": \"flowchart TD\\n  A[Start]\\n  A --> B\", \"summary\": \"two or three sentences\"}}"
    );
    CompletionRequest {
        system: "You turn documents into concise flowcharts.".to_string(),
        prompt,
        json_response: true,
    }
}

pub fn build_icon_prompt(flowchart: &str) -> CompletionRequest {
    let prompt = format!(
        "Suggest one emoji for every node of this flowchart.\n\n```\n{flowchart}\n```\n\n\
Reply with a JSON object mapping node ids to emojis, for example \
{{\"A\": \"🚀\", \"B\": \"📊\"}}"
    );
    CompletionRequest {
        system: "You suggest emojis that illustrate flowchart nodes.".to_string(),
        prompt,
        json_response: true,
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FlowchartDraft {
    pub mermaid: String,
    #[serde(default)]
    pub summary: String,
}

impl FlowchartDraft {
    /// Reads `{"mermaid": ..., "summary": ...}` from a model reply, with or
    /// without a surrounding Markdown code fence.
    pub fn from_completion(content: &str) -> Result<Self> {
        serde_json::from_str(strip_code_fence(content))
            .map_err(|err| Error::InvalidCompletion(err.to_string()))
    }
}

pub fn icons_from_completion(content: &str) -> Result<IconMap> {
    IconMap::from_json(strip_code_fence(content))
}

pub fn request_draft(
    client: &dyn CompletionClient,
    config: &ModelConfig,
    source_text: &str,
) -> anyhow::Result<FlowchartDraft> {
    let reply = client.complete(config, &build_flowchart_prompt(source_text, config))?;
    Ok(FlowchartDraft::from_completion(&reply)?)
}

pub fn request_icons(
    client: &dyn CompletionClient,
    config: &ModelConfig,
    flowchart: &str,
) -> anyhow::Result<IconMap> {
    let reply = client.complete(config, &build_icon_prompt(flowchart))?;
    Ok(icons_from_completion(&reply)?)
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Single-line replies keep everything after the opening fence.
    let body = rest.split_once('\n').map_or(rest, |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedClient(&'static str);

    impl CompletionClient for CannedClient {
        fn complete(&self, _config: &ModelConfig, _request: &CompletionRequest) -> anyhow::Result<String> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn prompt_truncates_long_input() {
        let config = ModelConfig {
            max_input_chars: 5,
            ..ModelConfig::default()
        };
        let request = build_flowchart_prompt("abcdefghij", &config);
        assert!(request.prompt.contains("abcde ... (truncated)"));
        assert!(!request.prompt.contains("abcdef"));

        let request = build_flowchart_prompt("abc", &config);
        assert!(!request.prompt.contains(TRUNCATION_MARKER));
        assert!(request.json_response);
    }

    #[test]
    fn draft_parses_fenced_json() {
        let reply = "```json\n{\"mermaid\": \"flowchart TD\\nA-->B\", \"summary\": \"Two steps.\"}\n```";
        let draft = FlowchartDraft::from_completion(reply).unwrap();
        assert_eq!(draft.mermaid, "flowchart TD\nA-->B");
        assert_eq!(draft.summary, "Two steps.");
    }

    #[test]
    fn draft_rejects_missing_mermaid() {
        assert!(matches!(
            FlowchartDraft::from_completion("{\"summary\": \"nothing\"}"),
            Err(Error::InvalidCompletion(_))
        ));
        assert!(FlowchartDraft::from_completion("not json").is_err());
    }

    #[test]
    fn icons_come_back_through_the_client() {
        let client = CannedClient("{\"A\": \"📊\", \"B\": \"🧹\"}");
        let icons = request_icons(&client, &ModelConfig::default(), "flowchart TD\nA-->B").unwrap();
        assert_eq!(icons.icon("A"), Some("📊"));
        assert_eq!(icons.len(), 2);

        let client = CannedClient("[1, 2]");
        assert!(request_icons(&client, &ModelConfig::default(), "").is_err());
    }

    #[test]
    fn strip_code_fence_passes_plain_text() {
        assert_eq!(strip_code_fence("  {\"a\": 1} "), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
    }

    #[test]
    fn single_line_fenced_reply_keeps_its_body() {
        assert_eq!(strip_code_fence("```{\"a\": 1}```"), "{\"a\": 1}");
        let draft =
            FlowchartDraft::from_completion("```{\"mermaid\": \"flowchart LR\\nA-->B\"}```").unwrap();
        assert_eq!(draft.mermaid, "flowchart LR\nA-->B");
        assert_eq!(draft.summary, "");
    }
}

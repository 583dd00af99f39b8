//! Deterministic offline model
//!
//! `RecallModel` never leaves the process. Statements are acknowledged;
//! questions are answered by quoting the line of context (system
//! instruction, earlier turns or tool results) that shares the most keywords
//! with the question. When nothing matches and a `load_memory` tool is on
//! offer, the model asks for it once before giving up.

use crate::error::ModelResult;
use crate::model::Model;
use crate::types::{Content, LlmRequest, LlmResponse, Role};
use async_trait::async_trait;
use std::collections::HashSet;
use tracing::debug;

const LOAD_MEMORY_TOOL: &str = "load_memory";

const INTERROGATIVES: &[&str] = &[
    "what", "who", "whom", "whose", "where", "when", "why", "which", "how", "did", "do", "does",
    "is", "are", "was", "were",
];

const STOPWORDS: &[&str] = &[
    "the", "and", "are", "was", "were", "what", "who", "whom", "whose", "where", "when", "why",
    "which", "how", "did", "does", "you", "your", "yours", "for", "about", "that", "this", "with",
    "have", "has", "had", "can", "could", "would", "should", "will", "from", "into", "our",
    "their", "them", "they", "his", "her", "its", "mine", "any", "all", "tell",
];

/// Offline model that answers from whatever context it is given
#[derive(Debug, Clone)]
pub struct RecallModel {
    name: String,
}

impl RecallModel {
    /// Create a recall model reporting the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn respond(&self, request: &LlmRequest) -> LlmResponse {
        let Some(message) = request.last_user_text() else {
            return LlmResponse::default();
        };

        if !is_question(&message) {
            return LlmResponse::text(format!("Got it, I'll keep that in mind: {}", message.trim()));
        }

        let keywords = keywords(&message);
        let best = context_lines(request, &message)
            .into_iter()
            .map(|line| (score(&keywords, &line), line))
            .filter(|(score, _)| *score > 0)
            .fold(None::<(usize, String)>, |best, candidate| match best {
                Some(current) if current.0 >= candidate.0 => Some(current),
                _ => Some(candidate),
            });

        if let Some((score, line)) = best {
            debug!(model = %self.name, score, "Recalled matching context line");
            return LlmResponse::text(format!("You told me earlier: {}", strip_author(&line)));
        }

        let offers_load_memory = request.tools.iter().any(|t| t.name == LOAD_MEMORY_TOOL);
        if offers_load_memory && !already_loaded(request) {
            return LlmResponse::function_call(
                LOAD_MEMORY_TOOL,
                serde_json::json!({ "query": message.trim() }),
            );
        }

        LlmResponse::text("I don't know that yet.")
    }
}

#[async_trait]
impl Model for RecallModel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate_content(&self, request: LlmRequest) -> ModelResult<LlmResponse> {
        Ok(self.respond(&request))
    }
}

fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
}

fn keywords(text: &str) -> HashSet<String> {
    words(text)
        .filter(|w| w.chars().count() >= 3 && !STOPWORDS.contains(&w.as_str()))
        .collect()
}

fn score(keywords: &HashSet<String>, line: &str) -> usize {
    let line_words: HashSet<String> = words(line).collect();
    keywords.intersection(&line_words).count()
}

fn is_question(text: &str) -> bool {
    let text = text.trim();
    let starts_interrogative = words(text)
        .next()
        .map(|w| INTERROGATIVES.contains(&w.as_str()))
        .unwrap_or(false);

    starts_interrogative && text.ends_with('?')
}

fn strip_author(line: &str) -> &str {
    match line.split_once(": ") {
        Some((head, tail)) if !head.is_empty() && !head.contains(char::is_whitespace) => tail,
        _ => line,
    }
}

fn already_loaded(request: &LlmRequest) -> bool {
    request
        .contents
        .iter()
        .any(|c| c.function_responses().iter().any(|r| r.name == LOAD_MEMORY_TOOL))
}

fn context_lines(request: &LlmRequest, message: &str) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(instruction) = &request.system_instruction {
        lines.extend(instruction.lines().map(str::to_string));
    }

    for content in &request.contents {
        collect_content_lines(content, &mut lines);
    }

    lines
        .into_iter()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty() && strip_author(l) != message.trim())
        .collect()
}

fn collect_content_lines(content: &Content, lines: &mut Vec<String>) {
    for part in &content.parts {
        if let Some(text) = &part.text {
            let prefix = match content.role {
                Role::User => "user: ",
                Role::Model => "model: ",
            };
            lines.extend(text.lines().map(|l| format!("{prefix}{l}")));
        }
        if let Some(response) = &part.function_response {
            collect_json_strings(&response.response, lines);
        }
    }
}

fn collect_json_strings(value: &serde_json::Value, lines: &mut Vec<String>) {
    match value {
        serde_json::Value::String(s) => lines.extend(s.lines().map(str::to_string)),
        serde_json::Value::Array(items) => {
            for item in items {
                collect_json_strings(item, lines);
            }
        }
        serde_json::Value::Object(map) => {
            for item in map.values() {
                collect_json_strings(item, lines);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FunctionDeclaration, Part};
    use serde_json::json;

    fn model() -> RecallModel {
        RecallModel::new("recall")
    }

    #[tokio::test]
    async fn test_acknowledges_statements() {
        let request = LlmRequest::new("recall")
            .with_contents(vec![Content::user("My favorite color is blue-green.")]);

        let response = model().generate_content(request).await.unwrap();
        let text = response.text_content().unwrap();
        assert!(text.contains("blue-green"));
    }

    #[tokio::test]
    async fn test_answers_from_system_instruction() {
        let request = LlmRequest::new("recall")
            .with_system_instruction(
                "Answer user questions in simple words.\n\
                 <PAST_CONVERSATIONS>\n\
                 user: My favorite color is blue-green. Can you write a Haiku about it?\n\
                 </PAST_CONVERSATIONS>",
            )
            .with_contents(vec![Content::user("What is my favorite color?")]);

        let response = model().generate_content(request).await.unwrap();
        assert_eq!(
            response.text_content().as_deref(),
            Some("You told me earlier: My favorite color is blue-green. Can you write a Haiku about it?")
        );
    }

    #[tokio::test]
    async fn test_answers_from_earlier_turns() {
        let request = LlmRequest::new("recall").with_contents(vec![
            Content::user("I gifted a new toy to my nephew on his 1st birthday!"),
            Content::model("Got it."),
            Content::user("What did I gift my nephew?"),
        ]);

        let response = model().generate_content(request).await.unwrap();
        assert!(response.text_content().unwrap().contains("toy"));
    }

    #[tokio::test]
    async fn test_requests_load_memory_once() {
        let declaration = FunctionDeclaration {
            name: "load_memory".to_string(),
            description: "Loads memory".to_string(),
            parameters: json!({}),
        };

        let request = LlmRequest::new("recall")
            .with_tools(vec![declaration.clone()])
            .with_contents(vec![Content::user("What is my favorite color?")]);
        let response = model().generate_content(request).await.unwrap();
        let call = response.content.as_ref().unwrap().function_calls()[0].clone();
        assert_eq!(call.name, "load_memory");
        assert_eq!(call.args["query"], "What is my favorite color?");

        let followup = LlmRequest::new("recall")
            .with_tools(vec![declaration])
            .with_contents(vec![
                Content::user("What is my favorite color?"),
                Content::new(Role::Model, vec![Part::function_call("load_memory", call.args)]),
                Content::new(
                    Role::User,
                    vec![Part::function_response(
                        "load_memory",
                        json!({"memories": [{"author": "user", "text": "My favorite color is teal."}]}),
                    )],
                ),
            ]);
        let response = model().generate_content(followup).await.unwrap();
        assert!(response.text_content().unwrap().contains("teal"));
    }

    #[tokio::test]
    async fn test_unknown_answer_without_tools() {
        let request = LlmRequest::new("recall")
            .with_contents(vec![Content::user("What is my favorite color?")]);

        let response = model().generate_content(request).await.unwrap();
        assert_eq!(response.text_content().as_deref(), Some("I don't know that yet."));
    }

    #[test]
    fn test_question_detection() {
        assert!(is_question("What did I gift my nephew?"));
        assert!(!is_question("My favorite color is blue-green. Can you write a Haiku about it?"));
        assert!(!is_question("What a day."));
    }
}

//! Conversation content and model request/response types

use serde::{Deserialize, Serialize};

/// Who produced a piece of content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The human side of the conversation (also carries tool results)
    User,
    /// The model side of the conversation
    Model,
}

impl Role {
    /// Wire name of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A function call requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Name of the tool to invoke
    pub name: String,

    /// JSON arguments for the tool
    #[serde(default)]
    pub args: serde_json::Value,
}

/// Result of executing a [`FunctionCall`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    /// Name of the tool that produced this response
    pub name: String,

    /// JSON payload returned by the tool
    pub response: serde_json::Value,
}

/// One piece of a [`Content`]; any field may be absent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Part {
    /// Plain text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Function call issued by the model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,

    /// Function result fed back to the model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_response: Option<FunctionResponse>,
}

impl Part {
    /// Create a text part
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Create a function call part
    pub fn function_call(name: impl Into<String>, args: serde_json::Value) -> Self {
        Self {
            function_call: Some(FunctionCall {
                name: name.into(),
                args,
            }),
            ..Default::default()
        }
    }

    /// Create a function response part
    pub fn function_response(name: impl Into<String>, response: serde_json::Value) -> Self {
        Self {
            function_response: Some(FunctionResponse {
                name: name.into(),
                response,
            }),
            ..Default::default()
        }
    }
}

/// A role plus an ordered list of parts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// Producer of the content
    pub role: Role,

    /// Parts in order
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// Create content from a role and parts
    pub fn new(role: Role, parts: Vec<Part>) -> Self {
        Self { role, parts }
    }

    /// Single-part user text
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, vec![Part::text(text)])
    }

    /// Single-part model text
    pub fn model(text: impl Into<String>) -> Self {
        Self::new(Role::Model, vec![Part::text(text)])
    }

    /// Text of the first part, if it has any
    pub fn first_text(&self) -> Option<&str> {
        self.parts.first().and_then(|p| p.text.as_deref())
    }

    /// All text parts joined with newlines
    pub fn text(&self) -> Option<String> {
        let texts: Vec<&str> = self
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();

        if texts.is_empty() {
            None
        } else {
            Some(texts.join("\n"))
        }
    }

    /// Function calls carried by this content
    pub fn function_calls(&self) -> Vec<&FunctionCall> {
        self.parts
            .iter()
            .filter_map(|p| p.function_call.as_ref())
            .collect()
    }

    /// Function responses carried by this content
    pub fn function_responses(&self) -> Vec<&FunctionResponse> {
        self.parts
            .iter()
            .filter_map(|p| p.function_response.as_ref())
            .collect()
    }

    /// True when there are no parts
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// Schema of a tool the model may call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDeclaration {
    /// Tool name
    pub name: String,

    /// What the tool does, shown to the model
    pub description: String,

    /// JSON schema of the arguments
    pub parameters: serde_json::Value,
}

/// A request to a model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LlmRequest {
    /// Model identifier
    pub model: String,

    /// System instruction, if any
    pub system_instruction: Option<String>,

    /// Conversation so far, oldest first
    pub contents: Vec<Content>,

    /// Tools the model may call
    pub tools: Vec<FunctionDeclaration>,
}

impl LlmRequest {
    /// Create an empty request for a model
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Set the system instruction
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// Set the conversation contents
    pub fn with_contents(mut self, contents: Vec<Content>) -> Self {
        self.contents = contents;
        self
    }

    /// Set the tool declarations
    pub fn with_tools(mut self, tools: Vec<FunctionDeclaration>) -> Self {
        self.tools = tools;
        self
    }

    /// Append text to the system instruction, separated by a blank line
    pub fn append_instructions(&mut self, text: &str) {
        match self.system_instruction.as_mut() {
            Some(existing) if !existing.is_empty() => {
                existing.push_str("\n\n");
                existing.push_str(text);
            }
            _ => self.system_instruction = Some(text.to_string()),
        }
    }

    /// Text of the most recent user content that carries text
    pub fn last_user_text(&self) -> Option<String> {
        self.contents
            .iter()
            .rev()
            .filter(|c| c.role == Role::User)
            .find_map(|c| c.text())
    }
}

/// A model's answer to an [`LlmRequest`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LlmResponse {
    /// Generated content; absent when the model produced nothing
    pub content: Option<Content>,

    /// Whether more output follows this chunk
    #[serde(default)]
    pub partial: bool,
}

impl LlmResponse {
    /// Final response carrying model text
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: Some(Content::model(text)),
            partial: false,
        }
    }

    /// Final response carrying a single function call
    pub fn function_call(name: impl Into<String>, args: serde_json::Value) -> Self {
        Self {
            content: Some(Content::new(
                Role::Model,
                vec![Part::function_call(name, args)],
            )),
            partial: false,
        }
    }

    /// Mark the response as a partial chunk
    pub fn into_partial(mut self) -> Self {
        self.partial = true;
        self
    }

    /// Text of the generated content
    pub fn text_content(&self) -> Option<String> {
        self.content.as_ref().and_then(|c| c.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_content_text_helpers() {
        let content = Content::new(
            Role::Model,
            vec![
                Part::text("first"),
                Part::function_call("load_memory", json!({"query": "color"})),
                Part::text("second"),
            ],
        );

        assert_eq!(content.first_text(), Some("first"));
        assert_eq!(content.text().as_deref(), Some("first\nsecond"));
        assert_eq!(content.function_calls().len(), 1);
        assert!(content.function_responses().is_empty());
    }

    #[test]
    fn test_first_text_missing_when_first_part_has_none() {
        let content = Content::new(
            Role::User,
            vec![Part::function_response("load_memory", json!({}))],
        );

        assert_eq!(content.first_text(), None);
        assert_eq!(content.text(), None);
    }

    #[test]
    fn test_append_instructions() {
        let mut request = LlmRequest::new("m");
        request.append_instructions("one");
        assert_eq!(request.system_instruction.as_deref(), Some("one"));

        request.append_instructions("two");
        assert_eq!(request.system_instruction.as_deref(), Some("one\n\ntwo"));
    }

    #[test]
    fn test_last_user_text_skips_tool_results() {
        let request = LlmRequest::new("m").with_contents(vec![
            Content::user("What is my favorite color?"),
            Content::new(
                Role::Model,
                vec![Part::function_call("load_memory", json!({"query": "color"}))],
            ),
            Content::new(
                Role::User,
                vec![Part::function_response("load_memory", json!({"memories": []}))],
            ),
        ]);

        assert_eq!(
            request.last_user_text().as_deref(),
            Some("What is my favorite color?")
        );
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_value(Content::user("hi")).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["parts"][0]["text"], "hi");
        assert!(json["parts"][0].get("function_call").is_none());
    }
}

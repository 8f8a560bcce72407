//! Generative-text collaborator: course outlines, free-form answers and lesson rewrites.
//!
//! Every call is attempted once. Failures are logged and turned into the fallback
//! value for that call; nothing here ever fails a request.

use crate::authoring::CourseOutline;
use crate::config::Config;
use anyhow::{anyhow, Context};
use serde_json::{json, Value};

pub const FALLBACK_REPLY: &str = "I'm sorry, I'm having trouble connecting to my brain right now.";

#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub parts: Vec<String>,
    pub temperature: Option<f64>,
    pub json_schema: Option<Value>,
}

pub trait CompletionBackend {
    fn complete(&self, req: &Completion) -> anyhow::Result<String>;
}

/// Used when no API key is configured.
#[derive(Debug, Clone, Default)]
pub struct DisabledBackend;

impl CompletionBackend for DisabledBackend {
    fn complete(&self, _req: &Completion) -> anyhow::Result<String> {
        Err(anyhow!("AI backend is not configured"))
    }
}

/// REST `generateContent` client.
pub struct GeminiBackend {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiBackend {
    pub fn new(endpoint: &str, model: &str, api_key: &str) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn request_body(req: &Completion) -> Value {
        let parts: Vec<Value> = req.parts.iter().map(|p| json!({ "text": p })).collect();
        let mut generation = serde_json::Map::new();
        if let Some(t) = req.temperature {
            generation.insert("temperature".into(), json!(t));
        }
        if let Some(schema) = &req.json_schema {
            generation.insert("responseMimeType".into(), json!("application/json"));
            generation.insert("responseSchema".into(), schema.clone());
        }
        json!({
            "contents": [{ "role": "user", "parts": parts }],
            "generationConfig": Value::Object(generation),
        })
    }
}

impl CompletionBackend for GeminiBackend {
    fn complete(&self, req: &Completion) -> anyhow::Result<String> {
        let url = format!("{}/models/{}:generateContent", self.endpoint, self.model);
        let resp: Value = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&Self::request_body(req))
            .send()
            .context("AI request failed")?
            .error_for_status()
            .context("AI request rejected")?
            .json()
            .context("AI response is not JSON")?;
        response_text(&resp).ok_or_else(|| anyhow!("AI response has no text"))
    }
}

fn response_text(resp: &Value) -> Option<String> {
    let parts = resp
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
        .collect();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn outline_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "description": { "type": "STRING" },
            "modules": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "lessons": { "type": "ARRAY", "items": { "type": "STRING" } }
                    }
                }
            }
        },
        "required": ["title", "description", "modules"]
    })
}

pub struct Assistant {
    backend: Box<dyn CompletionBackend>,
}

impl Assistant {
    pub fn new(backend: Box<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    pub fn from_config(cfg: &Config) -> Self {
        match &cfg.ai_api_key {
            Some(key) => Self::new(Box::new(GeminiBackend::new(
                &cfg.ai_endpoint,
                &cfg.ai_model,
                key,
            ))),
            None => {
                tracing::info!("no AI key configured; assistant answers with fallbacks");
                Self::new(Box::new(DisabledBackend))
            }
        }
    }

    /// `None` when the backend fails or returns something that is not an outline.
    pub fn outline(&self, topic: &str) -> Option<CourseOutline> {
        let req = Completion {
            parts: vec![format!(
                "Create a professional course outline for the topic: \"{topic}\". Provide a title, description, and list of modules."
            )],
            temperature: None,
            json_schema: Some(outline_schema()),
        };
        let text = match self.backend.complete(&req) {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!(error = %e, "outline generation failed");
                return None;
            }
        };
        match serde_json::from_str::<CourseOutline>(&text) {
            Ok(o) => Some(o),
            Err(e) => {
                tracing::warn!(error = %e, "outline response is not a course outline");
                None
            }
        }
    }

    pub fn ask(&self, message: &str, context: Option<&str>) -> String {
        let req = Completion {
            parts: vec![
                format!(
                    "You are an expert learning assistant for an LMS. Context: {}",
                    context.filter(|c| !c.trim().is_empty()).unwrap_or("General learning")
                ),
                message.to_string(),
            ],
            temperature: Some(0.7),
            json_schema: None,
        };
        match self.backend.complete(&req) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "assistant request failed");
                FALLBACK_REPLY.to_string()
            }
        }
    }

    /// Rewritten text for a selected lesson span, or `None` if the assistant could not help.
    pub fn rewrite(&self, selection: &str) -> Option<String> {
        let prompt = format!(
            "As an expert educator, rewrite and improve the following educational content to be more engaging and clear. Keep the same meaning but make it professional: \"{selection}\""
        );
        let reply = self.ask(&prompt, None);
        if reply == FALLBACK_REPLY || reply.trim().is_empty() {
            None
        } else {
            Some(reply)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Scripted {
        reply: anyhow::Result<String>,
        seen: RefCell<Vec<Completion>>,
    }

    impl Scripted {
        fn ok(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl CompletionBackend for std::rc::Rc<Scripted> {
        fn complete(&self, req: &Completion) -> anyhow::Result<String> {
            self.seen.borrow_mut().push(req.clone());
            match &self.reply {
                Ok(t) => Ok(t.clone()),
                Err(e) => Err(anyhow!("{e}")),
            }
        }
    }

    #[test]
    fn disabled_backend_yields_fallbacks() {
        let a = Assistant::new(Box::new(DisabledBackend));
        assert_eq!(a.ask("hi", None), FALLBACK_REPLY);
        assert!(a.outline("Rust").is_none());
        assert!(a.rewrite("some text").is_none());
    }

    #[test]
    fn outline_parses_structured_reply() {
        let backend = std::rc::Rc::new(Scripted::ok(
            r#"{"title":"Rust","description":"Systems","modules":[{"title":"Basics","lessons":["Ownership"]}]}"#,
        ));
        let a = Assistant::new(Box::new(backend.clone()));
        let o = a.outline("Rust").expect("outline");
        assert_eq!(o.modules[0].lessons, vec!["Ownership".to_string()]);
        let seen = backend.seen.borrow();
        assert!(seen[0].json_schema.is_some());
        assert!(seen[0].parts[0].contains("\"Rust\""));
    }

    #[test]
    fn malformed_outline_is_absent() {
        let backend = std::rc::Rc::new(Scripted::ok("Sure! Here is an outline..."));
        let a = Assistant::new(Box::new(backend));
        assert!(a.outline("Rust").is_none());
    }

    #[test]
    fn ask_sends_context_and_temperature() {
        let backend = std::rc::Rc::new(Scripted::ok("Borrowing means..."));
        let a = Assistant::new(Box::new(backend.clone()));
        assert_eq!(a.ask("What is borrowing?", Some("Rust course")), "Borrowing means...");
        let seen = backend.seen.borrow();
        assert_eq!(seen[0].temperature, Some(0.7));
        assert!(seen[0].parts[0].ends_with("Context: Rust course"));
    }

    #[test]
    fn reads_text_from_generate_content_response() {
        let resp = json!({
            "candidates": [{ "content": { "parts": [{ "text": "Hello" }, { "text": " there" }] } }]
        });
        assert_eq!(response_text(&resp).as_deref(), Some("Hello there"));
        assert_eq!(response_text(&json!({ "candidates": [] })), None);
    }

    #[test]
    fn request_body_marks_json_mode() {
        let body = GeminiBackend::request_body(&Completion {
            parts: vec!["p".into()],
            temperature: None,
            json_schema: Some(outline_schema()),
        });
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            json!("application/json")
        );
        assert_eq!(body["contents"][0]["parts"][0]["text"], json!("p"));
    }
}

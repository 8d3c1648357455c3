//! Shared test helpers: scripted backend and fake transcriber.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use colloquy::audio::Transcriber;
use colloquy::error::ColloquyError;
use colloquy::provider::ChatBackend;
use colloquy::types::*;

/// A backend that replays queued completions and records every request.
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<ChatCompletion>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a plain text reply.
    pub fn queue_text(&self, text: &str) {
        self.queue(Message::assistant(text));
    }

    /// Queue a reply requesting one tool call.
    pub fn queue_tool_call(&self, id: &str, name: &str, args: serde_json::Value) {
        self.queue(Message::assistant_tool_calls(vec![ToolCall::new(
            id,
            name,
            args.to_string(),
        )]));
    }

    pub fn queue(&self, message: Message) {
        self.replies.lock().unwrap().push_back(completion(message));
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion, ColloquyError> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self.replies.lock().unwrap().pop_front();
        Ok(reply.unwrap_or_else(|| completion(Message::assistant("Mock response"))))
    }
}

/// A completion record wrapping one message, 10 prompt + 5 completion tokens.
pub fn completion(message: Message) -> ChatCompletion {
    let finish_reason = if message.has_tool_calls() {
        "tool_calls"
    } else {
        "stop"
    };
    serde_json::from_value(json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": "gpt-4o-mini",
        "choices": [{"index": 0, "message": message, "finish_reason": finish_reason}],
        "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
    }))
    .unwrap()
}

/// Completion body as the HTTP API would send it.
pub fn completion_body(text: &str) -> serde_json::Value {
    serde_json::to_value(completion(Message::assistant(text))).unwrap()
}

/// Returns a fixed transcript and remembers what it was given.
pub struct FakeTranscriber {
    transcript: String,
    seen: Mutex<Vec<(usize, String)>>,
}

impl FakeTranscriber {
    pub fn new(transcript: &str) -> Self {
        Self {
            transcript: transcript.to_string(),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// `(byte count, mime type)` per call.
    pub fn seen(&self) -> Vec<(usize, String)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transcriber for FakeTranscriber {
    async fn transcribe(&self, audio: &[u8], mime_type: &str) -> Result<String, ColloquyError> {
        self.seen
            .lock()
            .unwrap()
            .push((audio.len(), mime_type.to_string()));
        Ok(self.transcript.clone())
    }
}

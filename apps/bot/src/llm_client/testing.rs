//! Scripted completion service for deterministic tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm_client::{Completion, CompletionRequest, CompletionService, LlmError};

/// Pops scripted replies in FIFO order. When the script runs dry it answers
/// "mock response". Every call is counted and the last request kept.
pub struct ScriptedCompletion {
    script: Mutex<VecDeque<Result<String, u16>>>,
    calls: AtomicUsize,
    last_request: Mutex<Option<CompletionRequest>>,
}

impl ScriptedCompletion {
    pub fn replying(texts: &[&str]) -> Self {
        Self::from_script(texts.iter().map(|t| Ok(t.to_string())).collect())
    }

    /// Every call fails with an HTTP 500 from the provider.
    pub fn failing() -> Self {
        Self::from_script(VecDeque::from(vec![Err(500); 16]))
    }

    fn from_script(script: VecDeque<Result<String, u16>>) -> Self {
        Self {
            script: Mutex::new(script),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionService for ScriptedCompletion {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());

        let next = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("mock response".to_string()));

        match next {
            Ok(generated_text) => Ok(Completion { generated_text }),
            Err(status) => Err(LlmError::Api {
                status,
                message: "scripted failure".to_string(),
            }),
        }
    }
}

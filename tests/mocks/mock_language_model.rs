use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use trip_planner::client::LanguageModel;
use trip_planner::error::{ApiError, ApiResult};

/// Mock language model for testing.
///
/// Replies with a fixed text (or fails) and records every prompt it receives.
#[allow(dead_code)]
#[derive(Clone)]
pub struct MockLanguageModel {
    reply: Arc<Mutex<String>>,
    failing: Arc<Mutex<bool>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl MockLanguageModel {
    /// Create a model that always answers `reply` followed by TERMINATE.
    pub fn new(reply: &str) -> Self {
        Self {
            reply: Arc::new(Mutex::new(reply.to_string())),
            failing: Arc::new(Mutex::new(false)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a model whose every call fails.
    pub fn failing() -> Self {
        let model = Self::new("");
        model.set_failing(true);
        model
    }

    pub fn set_reply(&self, reply: &str) {
        *self.reply.lock().unwrap() = reply.to_string();
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    /// Number of completions requested.
    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    /// Every prompt received, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for MockLanguageModel {
    async fn complete(&self, _system: &str, prompt: &str) -> ApiResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        if *self.failing.lock().unwrap() {
            return Err(ApiError::HttpError("Connection failed".to_string()));
        }
        Ok(format!("{}\nTERMINATE", self.reply.lock().unwrap()))
    }
}

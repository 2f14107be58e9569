//! Scripted model client for tests.
//!
//! Answers are served in the order they were queued; once the queue is
//! empty the default answer is used. Every request is recorded so tests can
//! assert whether (and with what) the model was called.

use std::collections::VecDeque;
use std::sync::Mutex;

use super::{ModelClient, ModelError, ModelFuture};
use crate::request::ModelRequest;

#[derive(Debug, Clone)]
enum Scripted {
    Text(String),
    Fail(String),
}

/// A fake model that never touches the network.
#[derive(Debug)]
pub struct FakeModelClient {
    queue: Mutex<VecDeque<Scripted>>,
    default: Scripted,
    requests: Mutex<Vec<ModelRequest>>,
}

impl Default for FakeModelClient {
    fn default() -> Self {
        Self::with_text("")
    }
}

impl FakeModelClient {
    /// Always answer with `text`.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            default: Scripted::Text(text.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always fail with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            default: Scripted::Fail(message.into()),
            ..Self::with_text("")
        }
    }

    /// Queue a one-off answer ahead of the default.
    pub fn push_text(&self, text: impl Into<String>) {
        self.lock_queue().push_back(Scripted::Text(text.into()));
    }

    /// Queue a one-off failure ahead of the default.
    pub fn push_failure(&self, message: impl Into<String>) {
        self.lock_queue().push_back(Scripted::Fail(message.into()));
    }

    /// Number of times [`ModelClient::invoke`] was called.
    pub fn calls(&self) -> usize {
        self.lock_requests().len()
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<ModelRequest> {
        self.lock_requests().clone()
    }

    fn lock_queue(&self) -> std::sync::MutexGuard<'_, VecDeque<Scripted>> {
        self.queue.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_requests(&self) -> std::sync::MutexGuard<'_, Vec<ModelRequest>> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ModelClient for FakeModelClient {
    fn invoke<'a>(&'a self, request: &'a ModelRequest) -> ModelFuture<'a> {
        self.lock_requests().push(request.clone());
        let next = self
            .lock_queue()
            .pop_front()
            .unwrap_or_else(|| self.default.clone());
        Box::pin(async move {
            match next {
                Scripted::Text(text) => Ok(text),
                Scripted::Fail(message) => Err(ModelError::Injected(message)),
            }
        })
    }

    fn model_name(&self) -> &str {
        "fake"
    }
}

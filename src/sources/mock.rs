//! Mock source for testing purposes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::models::{BibRecord, CiteKey, ProviderClass};
use crate::sources::{Source, SourceError};

/// Canned outcome for one key.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Record(String),
    Ambiguous(u64),
    NotFound,
    Transport(String),
}

/// A mock source for testing that returns predefined responses.
///
/// Keys without a configured response resolve to a minimal `@misc` record.
#[derive(Debug)]
pub struct MockSource {
    class: ProviderClass,
    responses: Mutex<HashMap<String, MockResponse>>,
    delays: Mutex<HashMap<String, Duration>>,
    calls: Mutex<Vec<CiteKey>>,
}

impl MockSource {
    /// Create a new mock source serving `class`.
    pub fn new(class: ProviderClass) -> Self {
        Self {
            class,
            responses: Mutex::new(HashMap::new()),
            delays: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Set the response returned for `key`.
    pub fn set_response(&self, key: &str, response: MockResponse) {
        lock(&self.responses).insert(key.to_string(), response);
    }

    /// Delay the response for `key`, to control completion order.
    pub fn set_delay(&self, key: &str, delay: Duration) {
        lock(&self.delays).insert(key.to_string(), delay);
    }

    /// Keys fetched so far, in call order.
    pub fn calls(&self) -> Vec<CiteKey> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl Source for MockSource {
    fn id(&self) -> &str {
        "mock"
    }

    fn name(&self) -> &str {
        "Mock Source"
    }

    fn class(&self) -> ProviderClass {
        self.class
    }

    async fn fetch(&self, key: &CiteKey) -> Result<BibRecord, SourceError> {
        lock(&self.calls).push(key.clone());

        let delay = lock(&self.delays).get(key.as_str()).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let response = lock(&self.responses).get(key.as_str()).cloned();
        match response {
            Some(MockResponse::Record(text)) => Ok(BibRecord::new(text)),
            Some(MockResponse::Ambiguous(count)) => Err(SourceError::Ambiguous {
                key: key.to_string(),
                count,
            }),
            Some(MockResponse::NotFound) => Err(SourceError::NotFound {
                key: key.to_string(),
                detail: "mock has no record".to_string(),
            }),
            Some(MockResponse::Transport(message)) => Err(SourceError::Transport(message)),
            None => Ok(BibRecord::new(make_record(key.as_str()))),
        }
    }
}

/// Helper function to create a minimal BibTeX record for testing.
pub fn make_record(key: &str) -> String {
    format!("@misc{{{},\n    title = \"{{Mock record}}\"\n}}\n", key)
}

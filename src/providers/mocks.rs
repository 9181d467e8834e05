use super::{HeaderSet, HttpResponse, HttpTransport, TransportError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Clone, Debug)]
enum Scripted {
    Respond(HttpResponse),
    Fail(String),
}

/// A request observed by [`MockTransport`].
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub url: String,
    pub authorization: Option<String>,
}

/// Scripted transport. Each URL owns a queue of outcomes consumed in order;
/// the last outcome repeats once the queue is down to one. Unscripted URLs
/// answer 404.
pub struct MockTransport {
    pub name: String,
    script: Mutex<HashMap<String, VecDeque<Scripted>>>,
    delays: HashMap<String, Duration>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            script: Mutex::new(HashMap::new()),
            delays: HashMap::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_response(self, url: &str, response: HttpResponse) -> Self {
        self.push(url, Scripted::Respond(response));
        self
    }

    pub fn with_json(self, url: &str, body: Value) -> Self {
        self.with_response(url, HttpResponse::new(200, body.to_string()))
    }

    pub fn with_status(self, url: &str, status: u16) -> Self {
        self.with_response(url, HttpResponse::new(status, ""))
    }

    pub fn with_network_error(self, url: &str, message: &str) -> Self {
        self.push(url, Scripted::Fail(message.to_string()));
        self
    }

    /// Every request to `url` sleeps this long before answering.
    pub fn with_delay(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn request_count(&self, url: &str) -> usize {
        self.requests().iter().filter(|r| r.url == url).count()
    }

    fn push(&self, url: &str, outcome: Scripted) {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(url.to_string())
            .or_default()
            .push_back(outcome);
    }

    fn next_outcome(&self, url: &str) -> Option<Scripted> {
        let mut script = self.script.lock().unwrap_or_else(|e| e.into_inner());
        let queue = script.get_mut(url)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    fn transport_name(&self) -> &str {
        &self.name
    }

    async fn get(&self, url: &str, headers: &HeaderSet) -> Result<HttpResponse, TransportError> {
        let authorization = headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("authorization"))
            .map(|(_, value)| value.clone());

        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(RecordedRequest {
                url: url.to_string(),
                authorization,
            });

        if let Some(delay) = self.delays.get(url) {
            tokio::time::sleep(*delay).await;
        }

        match self.next_outcome(url) {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::Fail(message)) => Err(TransportError::Network(message)),
            None => Ok(HttpResponse::new(404, r#"{"message":"Not Found"}"#)),
        }
    }
}

//! conto-mock
//!
//! A scripted [`HttpTransport`] plus deterministic JSON fixtures, for tests
//! and CI-safe examples. Routes are keyed by method and path; each route
//! holds a queue of outcomes where the last one repeats, so a single scripted
//! response serves any number of calls.

#![warn(missing_docs)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use conto_core::{ApiRequest, HttpTransport, Method, RawResponse};
use conto_types::ContoError;

pub mod fixtures;

/// One scripted outcome for a route.
#[derive(Debug, Clone)]
pub enum ScriptedOutcome {
    /// Return this response.
    Respond(RawResponse),
    /// Fail as if no response was received.
    Fail(ContoError),
}

/// Deterministic transport for tests and examples.
pub struct MockTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<ScriptedOutcome>>>,
    log: Mutex<Vec<ApiRequest>>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    /// Create a transport with no routes; unmatched requests get a 404.
    #[must_use]
    pub fn new() -> Self {
        Self {
            routes: Mutex::new(HashMap::new()),
            log: Mutex::new(Vec::new()),
        }
    }

    /// Script an outcome for `(method, path)`. Paths match on the request
    /// URL with its query string removed, by suffix, so registrations work
    /// with any base URL. Repeated calls queue outcomes; the final queued
    /// outcome repeats forever.
    pub fn script(&self, method: Method, path: &str, outcome: ScriptedOutcome) -> &Self {
        self.routes
            .lock()
            .expect("route mutex poisoned")
            .entry((method, path.to_string()))
            .or_default()
            .push_back(outcome);
        self
    }

    /// Script a JSON response.
    pub fn respond_json(
        &self,
        method: Method,
        path: &str,
        status: u16,
        body: &serde_json::Value,
    ) -> &Self {
        self.script(
            method,
            path,
            ScriptedOutcome::Respond(RawResponse {
                status,
                headers: vec![("Content-Type".to_string(), "application/json".to_string())],
                body: serde_json::to_vec(body).unwrap_or_default(),
            }),
        )
    }

    /// Script a transport failure.
    pub fn fail(&self, method: Method, path: &str, msg: &str) -> &Self {
        self.script(
            method,
            path,
            ScriptedOutcome::Fail(ContoError::transport(path, msg)),
        )
    }

    /// Script the token endpoint with the standard fixture.
    pub fn with_token_endpoint(&self) -> &Self {
        self.respond_json(Method::Post, "/token/new/", 200, &fixtures::token())
    }

    /// Every request seen so far, in order.
    ///
    /// # Panics
    /// Panics if the log mutex is poisoned.
    #[must_use]
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.log.lock().expect("log mutex poisoned").clone()
    }

    /// Number of requests whose path matched `path`.
    #[must_use]
    pub fn hits(&self, method: Method, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|req| req.method == method && Self::path_of(&req.url).ends_with(path))
            .count()
    }

    fn path_of(url: &str) -> &str {
        url.split('?').next().unwrap_or(url)
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute(&self, req: &ApiRequest) -> Result<RawResponse, ContoError> {
        self.log
            .lock()
            .expect("log mutex poisoned")
            .push(req.clone());

        let path = Self::path_of(&req.url);
        let mut routes = self.routes.lock().expect("route mutex poisoned");
        let outcome = routes
            .iter_mut()
            .find(|((method, route), _)| *method == req.method && path.ends_with(route.as_str()))
            .and_then(|(_, queue)| {
                if queue.len() > 1 {
                    queue.pop_front()
                } else {
                    queue.front().cloned()
                }
            });

        match outcome {
            Some(ScriptedOutcome::Respond(resp)) => Ok(resp),
            Some(ScriptedOutcome::Fail(err)) => Err(err),
            None => Ok(RawResponse {
                status: 404,
                headers: Vec::new(),
                body: format!("{{\"detail\": \"no route for {path}\"}}").into_bytes(),
            }),
        }
    }
}

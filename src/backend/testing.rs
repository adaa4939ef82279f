//! In-process transport double for unit tests.

use crate::backend::transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Mutex;

type Responder = dyn Fn(&HttpRequest) -> Result<HttpResponse> + Send + Sync;

/// Answers every request through a closure and records what was sent.
pub struct ScriptedTransport {
    responder: Box<Responder>,
    sent: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&HttpRequest) -> Result<HttpResponse> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.sent.lock().unwrap().clone()
    }

    /// `METHOD url` for every request, in send order.
    pub fn calls(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| format!("{} {}", r.method, r.url))
            .collect()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.sent.lock().unwrap().push(request.clone());
        (self.responder)(&request)
    }
}

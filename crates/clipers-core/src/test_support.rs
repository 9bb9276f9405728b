//! Fakes shared by unit tests across the crate.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::api::{ApiClient, ApiError, ApiRequest, ApiResponse, RequestBody, Transport};
use crate::auth::MemoryTokenStore;
use crate::config::ApiConfig;

pub const TEST_BASE: &str = "https://host/api";

type Handler = Box<dyn Fn(&ApiRequest) -> Result<ApiResponse, ApiError> + Send + Sync>;

/// Transport answering from a closure and recording every request.
///
/// Each send yields to the scheduler first, so concurrent requests
/// interleave the way they would over a real connection.
pub struct FakeTransport {
    handler: Handler,
    requests: Mutex<Vec<ApiRequest>>,
    delay: Option<Duration>,
}

impl FakeTransport {
    pub fn new(
        handler: impl Fn(&ApiRequest) -> Result<ApiResponse, ApiError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Answer requests in order from a fixed script.
    pub fn scripted(responses: Vec<Result<ApiResponse, ApiError>>) -> Self {
        let script = Mutex::new(VecDeque::from(responses));
        Self::new(move |_| {
            script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::Network("script exhausted".to_string())))
        })
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        tokio::task::yield_now().await;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.requests.lock().unwrap().push(request.clone());

        // Simulate the body going out in four ticks per file
        if let (RequestBody::Multipart(form), Some(progress)) = (&request.body, &request.progress) {
            for file in form.files() {
                let len = file.data.len() as u64;
                let tick = (len / 4).max(1);
                let mut sent = 0;
                while sent < len {
                    let step = tick.min(len - sent);
                    progress.advance(step);
                    sent += step;
                }
            }
        }

        (self.handler)(&request)
    }
}

/// Counts invocations of the auth-expired hook.
#[derive(Clone, Default)]
pub struct HookCounter(Arc<AtomicUsize>);

impl HookCounter {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    pub fn hook(&self) -> impl Fn() + Send + Sync + 'static {
        let counter = Arc::clone(&self.0);
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Client over a fake transport with the given tokens pre-stored.
pub fn client_with(
    transport: FakeTransport,
    tokens: MemoryTokenStore,
) -> (ApiClient, Arc<FakeTransport>, Arc<MemoryTokenStore>, HookCounter) {
    let transport = Arc::new(transport);
    let tokens = Arc::new(tokens);
    let hook = HookCounter::default();
    let client = ApiClient::with_transport(
        ApiConfig::new(TEST_BASE),
        tokens.clone(),
        transport.clone(),
    )
    .on_auth_expired(hook.hook());
    (client, transport, tokens, hook)
}

pub fn ok_json(value: serde_json::Value) -> Result<ApiResponse, ApiError> {
    Ok(ApiResponse::json_ok(&value))
}

pub fn status(code: u16, body: &str) -> Result<ApiResponse, ApiError> {
    Ok(ApiResponse::new(code, body.to_string()))
}

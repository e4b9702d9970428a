//! Test doubles for the injected provider.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::sync::Semaphore;

use crate::error::ProviderError;
use crate::injected::{
    ETH_ACCOUNTS, ETH_CHAIN_ID, ETH_REQUEST_ACCOUNTS, InjectedProvider, ProviderEvent,
    ProviderEventHandler, ProviderFlags, RequestArguments,
};

type SharedHandler = Arc<dyn Fn(Value) + Send + Sync>;

/// Scriptable provider that records every request and attached handler.
#[derive(Default)]
pub(crate) struct MockProvider {
    flags: Mutex<ProviderFlags>,
    responses: Mutex<HashMap<String, Result<Value, ProviderError>>>,
    requests: Mutex<Vec<RequestArguments>>,
    handlers: Mutex<Vec<(ProviderEvent, SharedHandler)>>,
    /// When set, each request waits for a permit before answering.
    gate: Mutex<Option<Arc<Semaphore>>>,
}

impl MockProvider {
    pub(crate) fn with_flags(flags: ProviderFlags) -> Arc<Self> {
        let provider = Self::default();
        *provider.flags.lock() = flags;
        Arc::new(provider)
    }

    pub(crate) fn metamask() -> Arc<Self> {
        Self::with_flags(ProviderFlags::metamask())
    }

    pub(crate) fn set_flags(&self, flags: ProviderFlags) {
        *self.flags.lock() = flags;
    }

    pub(crate) fn respond(&self, method: &str, response: Result<Value, ProviderError>) {
        self.responses.lock().insert(method.to_string(), response);
    }

    /// Answer both account methods with the given list.
    pub(crate) fn set_accounts(&self, accounts: &[&str]) {
        self.respond(ETH_REQUEST_ACCOUNTS, Ok(json!(accounts)));
        self.respond(ETH_ACCOUNTS, Ok(json!(accounts)));
    }

    pub(crate) fn set_chain(&self, chain_id_hex: &str) {
        self.respond(ETH_CHAIN_ID, Ok(json!(chain_id_hex)));
    }

    /// Keep every later request pending until released.
    pub(crate) fn hold_requests(&self) {
        *self.gate.lock() = Some(Arc::new(Semaphore::new(0)));
    }

    /// Let `count` held requests answer, in arrival order.
    pub(crate) fn release_requests(&self, count: usize) {
        if let Some(gate) = self.gate.lock().as_ref() {
            gate.add_permits(count);
        }
    }

    pub(crate) fn request_count(&self, method: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|args| args.method == method)
            .count()
    }

    pub(crate) fn handler_count(&self, event: ProviderEvent) -> usize {
        self.handlers.lock().iter().filter(|(e, _)| *e == event).count()
    }

    /// Invoke every handler attached for `event`, as the extension would.
    pub(crate) fn emit(&self, event: ProviderEvent, payload: Value) {
        let targets: Vec<SharedHandler> = self
            .handlers
            .lock()
            .iter()
            .filter(|(e, _)| *e == event)
            .map(|(_, handler)| Arc::clone(handler))
            .collect();
        for handler in targets {
            handler(payload.clone());
        }
    }
}

#[async_trait]
impl InjectedProvider for MockProvider {
    fn flags(&self) -> ProviderFlags {
        self.flags.lock().clone()
    }

    async fn request(&self, args: RequestArguments) -> Result<Value, ProviderError> {
        let response = self.responses.lock().get(&args.method).cloned();
        self.requests.lock().push(args.clone());

        // The real call always suspends while the extension answers.
        let gate = self.gate.lock().clone();
        match gate {
            Some(gate) => {
                if let Ok(permit) = gate.acquire().await {
                    permit.forget();
                }
            }
            None => tokio::task::yield_now().await,
        }

        response.unwrap_or_else(|| {
            Err(ProviderError::new(
                ProviderError::UNSUPPORTED_METHOD,
                format!("unsupported method {}", args.method),
            ))
        })
    }

    fn on(&self, event: ProviderEvent, handler: ProviderEventHandler) {
        self.handlers.lock().push((event, Arc::from(handler)));
    }
}

/// Install a test subscriber once; later calls are no-ops.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

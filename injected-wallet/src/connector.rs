//! Wallet session state machine.
//!
//! A [`WalletConnector`] drives the injected provider's request/event API
//! and republishes normalized [`WalletEvent`]s to its own listeners.
//!
//! # States
//!
//! ```text
//! Disconnected ──connect()──▶ Connected
//!      ▲                          │
//!      └── disconnect() / wallet reports no accounts
//! ```
//!
//! A pending connect is only a pending future, never a stored state.
//! Wallet event handlers are attached on the first successful connect and
//! stay attached for the connector's lifetime; they read the session at
//! dispatch time and do nothing while disconnected.

use std::fmt;
use std::sync::{Arc, Weak};

use alloy::primitives::Address;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::api::WalletApi;
use crate::config::ConnectorConfig;
use crate::detect::ProviderDetector;
use crate::error::{Result, WalletError};
use crate::events::{WalletEvent, WalletEventKind};
use crate::injected::{
    ETH_CHAIN_ID, InjectedProvider, InjectedScope, ProviderEvent, RequestArguments,
};
use crate::listeners::{Listener, ListenersMap};
use crate::payload::{first_account, parse_chain_id};

/// Mutable session state.
#[derive(Debug, Default)]
struct Session {
    connected: bool,
    /// Monotonic: set on the first successful connect, never cleared.
    events_wired: bool,
    address: Option<Address>,
    chain_id: Option<u64>,
}

impl Session {
    fn clear(&mut self) {
        self.connected = false;
        self.address = None;
        self.chain_id = None;
    }
}

struct Inner {
    detector: ProviderDetector,
    config: ConnectorConfig,
    session: Mutex<Session>,
    listeners: ListenersMap,
}

/// A wallet session over an injected provider.
///
/// Cloning yields another handle to the same session.
#[derive(Clone)]
pub struct WalletConnector {
    inner: Arc<Inner>,
}

impl fmt::Debug for WalletConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletConnector")
            .field("name", &self.inner.name())
            .field("session", &*self.inner.session.lock())
            .field("listeners", &self.inner.listeners)
            .finish_non_exhaustive()
    }
}

impl WalletConnector {
    /// Create a disconnected connector with the default configuration.
    #[must_use]
    pub fn new(scope: Arc<dyn InjectedScope>) -> Self {
        Self::with_config(scope, ConnectorConfig::default())
    }

    /// Create a disconnected connector with a custom configuration.
    #[must_use]
    pub fn with_config(scope: Arc<dyn InjectedScope>, config: ConnectorConfig) -> Self {
        Self::from_detector(ProviderDetector::new(scope), config)
    }

    /// Create a disconnected connector sharing an existing detector.
    #[must_use]
    pub fn from_detector(detector: ProviderDetector, config: ConnectorConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                detector,
                config,
                session: Mutex::new(Session::default()),
                listeners: ListenersMap::new(),
            }),
        }
    }

    /// The detector this connector resolves providers through.
    #[must_use]
    pub fn detector(&self) -> &ProviderDetector {
        &self.inner.detector
    }

    /// The connector configuration.
    #[must_use]
    pub fn config(&self) -> &ConnectorConfig {
        &self.inner.config
    }

    /// Whether several wallet extensions compete for the page.
    #[must_use]
    pub fn is_multi_api_state(&self) -> bool {
        self.inner.detector.is_multi_provider_state()
    }

    /// Cached address, or `None` if it must be re-read.
    fn cached_address(&self) -> Result<Option<Address>> {
        let session = self.inner.session.lock();
        if !session.connected {
            return Err(WalletError::not_connected(self.inner.name()));
        }
        Ok(session.address)
    }

    /// Cached chain id, or `None` if it must be re-read.
    fn cached_chain_id(&self) -> Result<Option<u64>> {
        let session = self.inner.session.lock();
        if !session.connected {
            return Err(WalletError::not_connected(self.inner.name()));
        }
        Ok(session.chain_id)
    }

    fn connected_provider(&self) -> Result<Arc<dyn InjectedProvider>> {
        if !self.is_connected() {
            return Err(WalletError::not_connected(self.inner.name()));
        }
        self.inner
            .detector
            .provider()
            .ok_or_else(|| WalletError::no_wallet(self.inner.name()))
    }
}

#[async_trait]
impl WalletApi for WalletConnector {
    fn name(&self) -> String {
        self.inner.name().to_string()
    }

    fn has_wallet(&self) -> bool {
        self.inner.detector.has_injected_provider()
    }

    async fn connect(&self) -> Result<()> {
        if self.is_connected() {
            return Ok(());
        }

        let inner = &self.inner;
        let Some(provider) = inner.detector.provider() else {
            return Err(WalletError::no_wallet(inner.name()));
        };

        let method = inner.config.connect_method.as_str();
        debug!(wallet = inner.name(), method, "requesting accounts");
        let payload = provider.request(RequestArguments::new(method)).await?;
        let address = first_account(&payload)
            .map_err(|reason| WalletError::invalid_response(inner.name(), method, reason))?
            .ok_or_else(|| {
                WalletError::invalid_response(inner.name(), method, "wallet returned no accounts")
            })?;

        let (transitioned, wire, address) = {
            let mut session = inner.session.lock();
            let transitioned = !session.connected;
            session.connected = true;
            // A racing connect or an accountsChanged may already have set it.
            let address = *session.address.get_or_insert(address);
            let wire = !session.events_wired;
            session.events_wired = true;
            (transitioned, wire, address)
        };

        if transitioned {
            info!(wallet = inner.name(), %address, "wallet connected");
            inner.listeners.fire_event(&WalletEvent::Connected);
        }
        if wire {
            Inner::wire_events(inner, provider.as_ref());
        }
        Ok(())
    }

    async fn disconnect(&self) {
        self.inner.disconnect();
    }

    async fn address(&self) -> Result<Address> {
        if let Some(address) = self.cached_address()? {
            return Ok(address);
        }

        let provider = self.connected_provider()?;
        let method = self.inner.config.refresh_method.as_str();
        let payload = provider.request(RequestArguments::new(method)).await?;
        let address = first_account(&payload)
            .map_err(|reason| WalletError::invalid_response(self.inner.name(), method, reason))?
            .ok_or_else(|| {
                WalletError::invalid_response(
                    self.inner.name(),
                    method,
                    "wallet returned no accounts",
                )
            })?;

        let mut session = self.inner.session.lock();
        if !session.connected {
            return Ok(address);
        }
        // An accountsChanged delivered while the request was pending wins.
        Ok(*session.address.get_or_insert(address))
    }

    async fn chain_id(&self) -> Result<u64> {
        if let Some(chain_id) = self.cached_chain_id()? {
            return Ok(chain_id);
        }

        let provider = self.connected_provider()?;
        let payload = provider.request(RequestArguments::new(ETH_CHAIN_ID)).await?;
        let chain_id = parse_chain_id(&payload)
            .map_err(|reason| WalletError::invalid_response(self.inner.name(), ETH_CHAIN_ID, reason))?;

        let mut session = self.inner.session.lock();
        if !session.connected {
            return Ok(chain_id);
        }
        // A chainChanged delivered while the request was pending wins.
        Ok(*session.chain_id.get_or_insert(chain_id))
    }

    fn is_connected(&self) -> bool {
        self.inner.session.lock().connected
    }

    fn raw_provider(&self) -> Result<Arc<dyn InjectedProvider>> {
        self.connected_provider()
    }

    fn add_listener(&self, kind: WalletEventKind, listener: Listener) {
        self.inner.listeners.add_listener(kind, listener);
    }

    fn remove_listener(&self, listener: &Listener) {
        self.inner.listeners.remove_listener(listener);
    }
}

/// Outcome of an `accountsChanged` notification.
enum AccountChange {
    Unchanged,
    Changed(Address),
    RemoteDisconnect,
}

impl Inner {
    /// Resolved at call time; extensions can come and go.
    fn name(&self) -> &'static str {
        self.detector.resolve_api_name()
    }

    fn disconnect(&self) {
        let was_connected = {
            let mut session = self.session.lock();
            let was_connected = session.connected;
            session.clear();
            was_connected
        };
        info!(wallet = self.name(), was_connected, "wallet disconnected");
        self.listeners.fire_event(&WalletEvent::Disconnected);
    }

    fn wire_events(this: &Arc<Self>, provider: &dyn InjectedProvider) {
        let weak = Arc::downgrade(this);
        provider.on(
            ProviderEvent::AccountsChanged,
            Box::new(move |payload| dispatch(&weak, |inner| inner.on_accounts_changed(&payload))),
        );

        let weak = Arc::downgrade(this);
        provider.on(
            ProviderEvent::ChainChanged,
            Box::new(move |payload| dispatch(&weak, |inner| inner.on_chain_changed(&payload))),
        );
        debug!(wallet = this.name(), "wallet event handlers attached");
    }

    fn on_accounts_changed(&self, payload: &Value) {
        if !self.session.lock().connected {
            debug!(event = %ProviderEvent::AccountsChanged, "ignored while disconnected");
            return;
        }

        // A missing list means the wallet exposes no accounts.
        let account = if payload.is_null() {
            None
        } else {
            match first_account(payload) {
                Ok(account) => account,
                Err(reason) => {
                    warn!(wallet = self.name(), %reason, "unreadable accountsChanged payload");
                    return;
                }
            }
        };

        let change = {
            let mut session = self.session.lock();
            if !session.connected {
                return;
            }
            match account {
                None => AccountChange::RemoteDisconnect,
                Some(address) if session.address == Some(address) => AccountChange::Unchanged,
                Some(address) => {
                    session.address = Some(address);
                    AccountChange::Changed(address)
                }
            }
        };

        match change {
            AccountChange::Unchanged => {
                debug!(wallet = self.name(), "account unchanged, event suppressed");
            }
            AccountChange::Changed(address) => {
                info!(wallet = self.name(), %address, "wallet account changed");
                self.listeners
                    .fire_event(&WalletEvent::AccountChanged(address));
            }
            AccountChange::RemoteDisconnect => {
                info!(wallet = self.name(), "wallet reported no accounts");
                self.disconnect();
            }
        }
    }

    fn on_chain_changed(&self, payload: &Value) {
        if !self.session.lock().connected {
            debug!(event = %ProviderEvent::ChainChanged, "ignored while disconnected");
            return;
        }

        let chain_id = match parse_chain_id(payload) {
            Ok(chain_id) => chain_id,
            Err(reason) => {
                warn!(wallet = self.name(), %reason, "unreadable chainChanged payload");
                return;
            }
        };

        {
            let mut session = self.session.lock();
            if !session.connected {
                return;
            }
            session.chain_id = Some(chain_id);
        }

        info!(wallet = self.name(), chain_id, "wallet network changed");
        self.listeners
            .fire_event(&WalletEvent::NetworkChanged(chain_id));
    }
}

/// Run a handler body if the connector is still alive.
fn dispatch(weak: &Weak<Inner>, f: impl FnOnce(&Inner)) {
    if let Some(inner) = weak.upgrade() {
        f(&inner);
    }
}

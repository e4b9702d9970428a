//! MetaMask-compatible API provider.
//!
//! This is the object a payment client registers for "browser wallet"
//! support. Any extension that injects an EIP-1193 `ethereum` object is
//! served through it; Trust Wallet and others answer under their own
//! resolved name.

use std::fmt;
use std::sync::Arc;

use crate::api::{WalletApi, WalletApiProvider};
use crate::config::ConnectorConfig;
use crate::connector::WalletConnector;
use crate::detect::ProviderDetector;
use crate::error::WalletError;
use crate::injected::InjectedScope;

/// Factory for [`WalletConnector`] sessions over one injected scope.
#[derive(Clone)]
pub struct MetamaskApiProvider {
    detector: ProviderDetector,
    config: ConnectorConfig,
}

impl fmt::Debug for MetamaskApiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetamaskApiProvider")
            .field("detector", &self.detector)
            .field("config", &self.config)
            .finish()
    }
}

impl MetamaskApiProvider {
    /// Create a provider with the default configuration.
    #[must_use]
    pub fn new(scope: Arc<dyn InjectedScope>) -> Self {
        Self::with_config(scope, ConnectorConfig::default())
    }

    /// Create a provider with a custom configuration.
    #[must_use]
    pub fn with_config(scope: Arc<dyn InjectedScope>, config: ConnectorConfig) -> Self {
        Self {
            detector: ProviderDetector::new(scope),
            config,
        }
    }

    /// The underlying detector.
    #[must_use]
    pub const fn detector(&self) -> &ProviderDetector {
        &self.detector
    }

    /// Create a new, disconnected connector.
    #[must_use]
    pub fn connector(&self) -> WalletConnector {
        WalletConnector::from_detector(self.detector.clone(), self.config.clone())
    }

    /// Whether `error` means no wallet is installed, so the client can
    /// suggest installing one.
    #[must_use]
    pub const fn is_no_wallet_error(error: &WalletError) -> bool {
        error.is_no_wallet()
    }
}

impl WalletApiProvider for MetamaskApiProvider {
    fn name(&self) -> &str {
        &self.config.api_name
    }

    fn has_wallet(&self) -> bool {
        self.detector.has_injected_provider()
    }

    fn is_multi_api_state(&self) -> bool {
        self.detector.is_multi_provider_state()
    }

    fn make_api(&self) -> Box<dyn WalletApi> {
        Box::new(self.connector())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::events::{WalletEvent, WalletEventKind};
    use crate::injected::{InjectedProvider, InjectedWindow, ProviderFlags};
    use crate::listeners::listener;
    use crate::testing::{MockProvider, init_tracing};
    use parking_lot::Mutex;

    const VALID: &str = "0x14186C8215985f33845722730c6382443Bf9EC65";

    fn scope_with(provider: &Arc<MockProvider>) -> Arc<InjectedWindow> {
        let injected: Arc<dyn InjectedProvider> = Arc::<MockProvider>::clone(provider);
        Arc::new(InjectedWindow::with_ethereum(injected))
    }

    #[test]
    fn test_has_wallet_follows_scope() {
        let window = scope_with(&MockProvider::metamask());
        let scope: Arc<dyn InjectedScope> = Arc::<InjectedWindow>::clone(&window);
        let api_provider = MetamaskApiProvider::new(scope);
        assert!(api_provider.has_wallet());

        window.set_ethereum(None);
        assert!(!api_provider.has_wallet());
    }

    #[test]
    fn test_name_is_fixed() {
        let window = scope_with(&MockProvider::with_flags(ProviderFlags::trust_wallet()));
        let api_provider = MetamaskApiProvider::new(window);
        assert_eq!(api_provider.name(), "Metamask");
        assert_eq!(api_provider.make_api().name(), "Trust Wallet");

        let renamed = MetamaskApiProvider::with_config(
            Arc::new(InjectedWindow::new()),
            ConnectorConfig::new().api_name("Browser Wallet"),
        );
        assert_eq!(renamed.name(), "Browser Wallet");
    }

    #[test]
    fn test_multi_api_state() {
        let provider = MockProvider::with_flags(
            ProviderFlags::metamask()
                .with_providers(vec![ProviderFlags::metamask(), ProviderFlags::trust_wallet()]),
        );
        let api_provider = MetamaskApiProvider::new(scope_with(&provider));
        assert!(api_provider.is_multi_api_state());
        assert!(api_provider.connector().is_multi_api_state());

        provider.set_flags(ProviderFlags::metamask());
        assert!(!api_provider.is_multi_api_state());
    }

    #[tokio::test]
    async fn test_no_wallet_error_predicate() {
        init_tracing();
        let api_provider = MetamaskApiProvider::new(Arc::new(InjectedWindow::new()));
        let api = api_provider.make_api();

        let err = api.connect().await.unwrap_err();
        assert!(MetamaskApiProvider::is_no_wallet_error(&err));

        let rejected = WalletError::from(ProviderError::user_rejected());
        assert!(!MetamaskApiProvider::is_no_wallet_error(&rejected));
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        init_tracing();
        let provider = MockProvider::metamask();
        provider.set_accounts(&[VALID]);
        let api_provider = MetamaskApiProvider::new(scope_with(&provider));

        let first = api_provider.make_api();
        let second = api_provider.make_api();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        second.add_listener(
            WalletEventKind::Connected,
            listener(move |event: &WalletEvent| sink.lock().push(*event)),
        );

        first.connect().await.unwrap();
        assert!(first.is_connected());
        assert!(!second.is_connected());
        assert!(events.lock().is_empty());

        assert_eq!(first.address_string().await.unwrap(), VALID);
        assert!(second.address().await.unwrap_err().is_not_connected());
    }
}

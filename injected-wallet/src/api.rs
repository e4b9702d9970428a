//! Provider-agnostic wallet interface consumed by payment clients.
//!
//! A payment client holds a [`WalletApiProvider`] per supported wallet and
//! asks it for a [`WalletApi`] session once the user picks one.

use std::sync::Arc;

use alloy::primitives::Address;
use async_trait::async_trait;

use crate::error::Result;
use crate::events::WalletEventKind;
use crate::injected::InjectedProvider;
use crate::listeners::Listener;

/// A wallet session.
#[async_trait]
pub trait WalletApi: Send + Sync {
    /// Human-readable name of the wallet currently answering.
    fn name(&self) -> String;

    /// Whether a wallet is available to connect to.
    fn has_wallet(&self) -> bool;

    /// Establish a session. Resolves immediately if already connected.
    ///
    /// # Errors
    ///
    /// Fails when no wallet is present, when the wallet rejects the
    /// request, or when its answer cannot be interpreted.
    async fn connect(&self) -> Result<()>;

    /// End the session. Always succeeds and always notifies listeners.
    async fn disconnect(&self);

    /// The active account.
    ///
    /// # Errors
    ///
    /// Fails when not connected, or when a refresh request fails.
    async fn address(&self) -> Result<Address>;

    /// The active chain id.
    ///
    /// # Errors
    ///
    /// Fails when not connected, or when the chain id request fails.
    async fn chain_id(&self) -> Result<u64>;

    /// Whether a session is active.
    fn is_connected(&self) -> bool;

    /// The injected provider, for raw calls outside this interface.
    ///
    /// # Errors
    ///
    /// Fails when not connected or when the provider has gone away.
    fn raw_provider(&self) -> Result<Arc<dyn InjectedProvider>>;

    /// Register a listener for an event kind.
    fn add_listener(&self, kind: WalletEventKind, listener: Listener);

    /// Remove every registration of a listener.
    fn remove_listener(&self, listener: &Listener);

    /// The active account as an EIP-55 checksummed string.
    ///
    /// # Errors
    ///
    /// Same as [`address`](Self::address).
    async fn address_string(&self) -> Result<String> {
        Ok(self.address().await?.to_checksum(None))
    }
}

/// Entry point a payment client uses for one kind of wallet.
pub trait WalletApiProvider: Send + Sync {
    /// Fixed name of this API.
    fn name(&self) -> &str;

    /// Whether the wallet is available.
    fn has_wallet(&self) -> bool;

    /// Whether several wallets compete and the choice is ambiguous.
    fn is_multi_api_state(&self) -> bool;

    /// Create a new, disconnected session.
    fn make_api(&self) -> Box<dyn WalletApi>;
}

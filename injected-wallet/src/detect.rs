//! Detection of the injected wallet implementation.
//!
//! Wallet extensions are not mutually exclusive installs. Several of them
//! may patch the same global, and naive flag checks silently pick whichever
//! patched last. [`ProviderDetector`] surfaces that ambiguity instead of
//! hiding it. Every query reads the scope afresh.

use std::fmt;
use std::sync::Arc;

use crate::injected::{InjectedProvider, InjectedScope, ProviderFlags};

/// Name reported for MetaMask and for unidentified providers.
pub const METAMASK_NAME: &str = "Metamask";
/// Name reported for Trust Wallet.
pub const TRUST_WALLET_NAME: &str = "Trust Wallet";

/// Stateless queries against an [`InjectedScope`].
#[derive(Clone)]
pub struct ProviderDetector {
    scope: Arc<dyn InjectedScope>,
}

impl fmt::Debug for ProviderDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderDetector")
            .field("flags", &self.flags())
            .finish_non_exhaustive()
    }
}

impl ProviderDetector {
    /// Create a detector over the given scope.
    #[must_use]
    pub fn new(scope: Arc<dyn InjectedScope>) -> Self {
        Self { scope }
    }

    /// The currently injected provider.
    #[must_use]
    pub fn provider(&self) -> Option<Arc<dyn InjectedProvider>> {
        self.scope.ethereum()
    }

    /// Flags of the currently injected provider.
    #[must_use]
    pub fn flags(&self) -> Option<ProviderFlags> {
        self.provider().map(|provider| provider.flags())
    }

    /// Whether a wallet object is injected at all.
    #[must_use]
    pub fn has_injected_provider(&self) -> bool {
        self.provider().is_some()
    }

    /// Whether the injected provider advertises the MetaMask flag.
    #[must_use]
    pub fn is_from_metamask(&self) -> bool {
        self.flags().is_some_and(|flags| flags.is_meta_mask)
    }

    /// Whether the injected provider advertises either Trust Wallet flag.
    #[must_use]
    pub fn is_from_trust_wallet(&self) -> bool {
        self.flags().is_some_and(|flags| flags.is_trust_any())
    }

    /// Human-readable name of the active wallet.
    ///
    /// MetaMask wins when both MetaMask and Trust Wallet flags are set, and
    /// is also the fallback for unidentified providers.
    #[must_use]
    pub fn resolve_api_name(&self) -> &'static str {
        match self.flags() {
            Some(flags) if flags.is_meta_mask => METAMASK_NAME,
            Some(flags) if flags.is_trust_any() => TRUST_WALLET_NAME,
            _ => METAMASK_NAME,
        }
    }

    /// Whether more than one wallet extension is competing for the scope.
    ///
    /// Without any injected provider this is always `false`.
    #[must_use]
    pub fn is_multi_provider_state(&self) -> bool {
        let Some(flags) = self.flags() else {
            return false;
        };

        // MetaMask owns `ethereum` while Trust Wallet sits on its own global.
        if flags.is_meta_mask && self.scope.has_trust_wallet_global() {
            return true;
        }

        if flags.providers_len() > 1 {
            return true;
        }

        // EIP-5749
        self.scope.evm_providers_count() > 1
    }
}

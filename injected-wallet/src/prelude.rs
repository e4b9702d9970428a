//! Prelude module for convenient imports.

pub use crate::api::{WalletApi, WalletApiProvider};
pub use crate::config::{AccountsMethod, ConnectorConfig};
pub use crate::connector::WalletConnector;
pub use crate::detect::{METAMASK_NAME, ProviderDetector, TRUST_WALLET_NAME};
pub use crate::error::{ProviderError, Result, WalletError};
pub use crate::events::{WalletEvent, WalletEventKind};
pub use crate::injected::{
    InjectedProvider, InjectedScope, InjectedWindow, ProviderEvent, ProviderEventHandler,
    ProviderFlags, RequestArguments,
};
pub use crate::listeners::{Listener, listener};
pub use crate::metamask::MetamaskApiProvider;

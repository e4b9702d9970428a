#![cfg_attr(docsrs, feature(doc_cfg))]
//! Provider-agnostic connector for browser-injected EIP-1193 wallets.
//!
//! Wallet extensions such as MetaMask or Trust Wallet inject an `ethereum`
//! object into the page. This crate turns that object into a stable
//! [`WalletApi`] session for a payment client.
//!
//! # Architecture
//!
//! ```text
//! InjectedScope (browser globals, injected by the host)
//!   └── ProviderDetector   → presence, wallet name, multi-extension check
//!         └── WalletConnector
//!               ├── connect() / disconnect()
//!               ├── address() / chain_id()      (cached per session)
//!               └── listeners                   (wallet-* events)
//! MetamaskApiProvider → make_api() → Box<dyn WalletApi>
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use injected_wallet::prelude::*;
//!
//! let api_provider = MetamaskApiProvider::new(scope);
//! if api_provider.is_multi_api_state() {
//!     // ask the user to disable the extra wallet extensions
//! }
//!
//! let wallet = api_provider.make_api();
//! wallet.add_listener(
//!     WalletEventKind::AccountChanged,
//!     listener(|event| println!("{event:?}")),
//! );
//! wallet.connect().await?;
//! let address = wallet.address_string().await?;
//! ```

pub mod api;
pub mod config;
pub mod connector;
pub mod detect;
pub mod error;
pub mod events;
pub mod injected;
pub mod listeners;
pub mod metamask;
pub mod payload;
pub mod prelude;

#[cfg(test)]
mod testing;

pub use api::{WalletApi, WalletApiProvider};
pub use config::{AccountsMethod, ConnectorConfig};
pub use connector::WalletConnector;
pub use detect::ProviderDetector;
pub use error::{ProviderError, Result, WalletError};
pub use events::{WalletEvent, WalletEventKind};
pub use injected::{InjectedProvider, InjectedScope, InjectedWindow, ProviderFlags};
pub use listeners::{Listener, ListenersMap, listener};
pub use metamask::MetamaskApiProvider;

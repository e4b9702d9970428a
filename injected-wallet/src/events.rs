//! Normalized wallet events.
//!
//! Whatever wallet answers, listeners only ever see these four events.

use std::fmt;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

/// The kind of a [`WalletEvent`], used as the registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WalletEventKind {
    /// `wallet-connected`
    #[serde(rename = "wallet-connected")]
    Connected,
    /// `wallet-disconnected`
    #[serde(rename = "wallet-disconnected")]
    Disconnected,
    /// `wallet-account-changed`
    #[serde(rename = "wallet-account-changed")]
    AccountChanged,
    /// `wallet-network-changed`
    #[serde(rename = "wallet-network-changed")]
    NetworkChanged,
}

impl WalletEventKind {
    /// All event kinds.
    pub const ALL: [Self; 4] = [
        Self::Connected,
        Self::Disconnected,
        Self::AccountChanged,
        Self::NetworkChanged,
    ];

    /// The event name exposed to payment clients.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connected => "wallet-connected",
            Self::Disconnected => "wallet-disconnected",
            Self::AccountChanged => "wallet-account-changed",
            Self::NetworkChanged => "wallet-network-changed",
        }
    }
}

impl fmt::Display for WalletEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event emitted by a wallet connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum WalletEvent {
    /// A session was established.
    #[serde(rename = "wallet-connected")]
    Connected,
    /// The session ended, locally or because the wallet dropped all accounts.
    #[serde(rename = "wallet-disconnected")]
    Disconnected,
    /// The active account changed. Carries the new address.
    #[serde(rename = "wallet-account-changed")]
    AccountChanged(Address),
    /// The active network changed. Carries the new chain id.
    #[serde(rename = "wallet-network-changed")]
    NetworkChanged(u64),
}

impl WalletEvent {
    /// The kind of this event.
    #[must_use]
    pub const fn kind(&self) -> WalletEventKind {
        match self {
            Self::Connected => WalletEventKind::Connected,
            Self::Disconnected => WalletEventKind::Disconnected,
            Self::AccountChanged(_) => WalletEventKind::AccountChanged,
            Self::NetworkChanged(_) => WalletEventKind::NetworkChanged,
        }
    }

    /// The address payload of an account change.
    #[must_use]
    pub const fn address(&self) -> Option<Address> {
        match self {
            Self::AccountChanged(address) => Some(*address),
            _ => None,
        }
    }

    /// The chain id payload of a network change.
    #[must_use]
    pub const fn chain_id(&self) -> Option<u64> {
        match self {
            Self::NetworkChanged(chain_id) => Some(*chain_id),
            _ => None,
        }
    }
}

//! # Session State
//!
//! Connection and sign-in state owned by the runtime and read by every
//! module before it talks to the node.

use std::sync::Arc;

use tracing::debug;

use crate::entities::Address;
use crate::state::StateCell;

/// Snapshot of the wallet session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Whether the node connection is up.
    pub connected: bool,
    /// Whether a wallet is signed in.
    pub signed_in: bool,
    /// Address of the signed-in wallet.
    pub address: Option<Address>,
}

/// Read access to the session, implemented by the runtime's handle and by
/// test fixtures.
pub trait SessionView: Send + Sync {
    /// Current session snapshot.
    fn session(&self) -> SessionState;
}

/// Shared, versioned session state.
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    cell: Arc<StateCell<SessionState>>,
}

impl SessionHandle {
    /// Create a disconnected, signed-out session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a connected session signed in as `address`.
    pub fn signed_in(address: Address) -> Self {
        let handle = Self::new();
        handle.set_connected(true);
        handle.sign_in(address);
        handle
    }

    /// Record a connection change.
    pub fn set_connected(&self, connected: bool) {
        debug!(connected, "Session connection changed");
        self.cell.mutate(|s| s.connected = connected);
    }

    /// Sign in as `address`.
    pub fn sign_in(&self, address: Address) {
        debug!(address = %address, "Session signed in");
        self.cell.mutate(|s| {
            s.signed_in = true;
            s.address = Some(address);
        });
    }

    /// Sign out, forgetting the address.
    pub fn sign_out(&self) {
        debug!("Session signed out");
        self.cell.mutate(|s| {
            s.signed_in = false;
            s.address = None;
        });
    }

    /// Version of the last session write.
    pub fn version(&self) -> u64 {
        self.cell.version()
    }
}

impl SessionView for SessionHandle {
    fn session(&self) -> SessionState {
        self.cell.snapshot().value
    }
}

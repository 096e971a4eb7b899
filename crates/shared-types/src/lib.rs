//! # Shared Types Crate
//!
//! Domain entities and state primitives shared by every wallet module.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: records exchanged with the node and exposed
//!   to the view layer are defined here once.
//! - **Single Writer**: module state lives in a [`StateCell`]; every write goes
//!   through one mutation closure that bumps the version.
//! - **Latest Request Wins**: fetches hold a [`FetchTicket`]; results are only
//!   committed while the ticket is still the newest for its key.

pub mod entities;
pub mod errors;
pub mod session;
pub mod state;

pub use entities::*;
pub use errors::*;
pub use session::{SessionHandle, SessionState, SessionView};
pub use state::{FetchGenerations, FetchOutcome, FetchTicket, SkipReason, StateCell, Versioned};

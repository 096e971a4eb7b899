//! # Versioned State Container
//!
//! Module state is held in a [`StateCell`]. Every write runs inside the cell's
//! write lock and bumps a monotonically increasing version, so readers can
//! detect change and writers can compare-and-swap.
//!
//! Overlapping fetches are ordered with [`FetchGenerations`]: raising the
//! loading flag issues a [`FetchTicket`], and a result may only be committed
//! while its ticket is still the newest one issued for the same key.

use std::collections::HashMap;
use std::hash::Hash;

use parking_lot::RwLock;

use crate::errors::StateError;

/// A value tagged with the version of the write that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned<T> {
    /// Version of the last write (0 = never written).
    pub version: u64,
    /// The state value.
    pub value: T,
}

/// Single-writer state container with versioned writes.
///
/// Locks are never held across an `.await`; callers snapshot, await, then
/// commit through [`StateCell::mutate_if`] or [`StateCell::compare_and_swap`].
#[derive(Debug)]
pub struct StateCell<T> {
    inner: RwLock<Versioned<T>>,
}

impl<T> StateCell<T> {
    /// Create a cell at version 0.
    pub fn new(value: T) -> Self {
        Self {
            inner: RwLock::new(Versioned { version: 0, value }),
        }
    }

    /// Current version.
    pub fn version(&self) -> u64 {
        self.inner.read().version
    }

    /// Read through a closure without cloning.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.read().value)
    }

    /// Clone the current value together with its version.
    pub fn snapshot(&self) -> Versioned<T>
    where
        T: Clone,
    {
        self.inner.read().clone()
    }

    /// Apply a write unconditionally. Returns the closure's result.
    pub fn mutate<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.inner.write();
        let out = f(&mut guard.value);
        guard.version += 1;
        out
    }

    /// Apply a write only if `guard` holds on the current value.
    ///
    /// The check and the write happen under the same lock.
    pub fn mutate_if<R>(
        &self,
        guard: impl FnOnce(&T) -> bool,
        f: impl FnOnce(&mut T) -> R,
    ) -> Option<R> {
        let mut state = self.inner.write();
        if !guard(&state.value) {
            return None;
        }
        let out = f(&mut state.value);
        state.version += 1;
        Some(out)
    }

    /// Apply a write only if the version is still `expected`.
    pub fn compare_and_swap<R>(
        &self,
        expected: u64,
        f: impl FnOnce(&mut T) -> R,
    ) -> Result<R, StateError> {
        let mut state = self.inner.write();
        if state.version != expected {
            return Err(StateError::StaleVersion {
                expected,
                actual: state.version,
            });
        }
        let out = f(&mut state.value);
        state.version += 1;
        Ok(out)
    }

    /// Swap in a new value, returning the old one.
    pub fn replace(&self, value: T) -> T {
        self.mutate(|current| std::mem::replace(current, value))
    }
}

impl<T: Default> Default for StateCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Proof that a fetch was started, used to decide whether its result is
/// still wanted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchTicket {
    generation: u64,
}

impl FetchTicket {
    /// Generation number of this ticket.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Issues fetch tickets and tracks the newest one per key.
///
/// Tickets come from one counter shared by all keys, so a ticket is never
/// reissued even after [`FetchGenerations::invalidate_all`].
#[derive(Debug, Clone)]
pub struct FetchGenerations<K> {
    counter: u64,
    latest: HashMap<K, u64>,
}

impl<K: Eq + Hash> FetchGenerations<K> {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self {
            counter: 0,
            latest: HashMap::new(),
        }
    }

    /// Issue a new ticket for `key`, superseding any earlier one.
    pub fn issue(&mut self, key: K) -> FetchTicket {
        self.counter += 1;
        self.latest.insert(key, self.counter);
        FetchTicket {
            generation: self.counter,
        }
    }

    /// Whether `ticket` is still the newest issued for `key`.
    pub fn is_current(&self, key: &K, ticket: &FetchTicket) -> bool {
        self.latest.get(key) == Some(&ticket.generation)
    }

    /// Whether any fetch is still tracked for `key`.
    pub fn in_flight(&self, key: &K) -> bool {
        self.latest.contains_key(key)
    }

    /// Retire the ticket for `key` if it is `ticket`.
    pub fn complete(&mut self, key: &K, ticket: &FetchTicket) {
        if self.is_current(key, ticket) {
            self.latest.remove(key);
        }
    }

    /// Supersede every outstanding ticket.
    pub fn invalidate_all(&mut self) {
        self.latest.clear();
    }
}

impl<K: Eq + Hash> Default for FetchGenerations<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Why a fetch returned without talking to the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The connection to the node is down.
    NotConnected,
}

/// Result of a fetch action as seen by the caller.
///
/// Failures are already recorded in state and notified; the outcome only
/// tells the caller what happened.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T, E> {
    /// Data was fetched and committed.
    Loaded(T),
    /// Nothing was fetched.
    Skipped(SkipReason),
    /// A newer fetch (or a session reset) made this result obsolete.
    Superseded,
    /// The fetch failed; the error is stored in state.
    Failed(E),
}

impl<T, E> FetchOutcome<T, E> {
    /// Whether data was committed.
    pub fn is_loaded(&self) -> bool {
        matches!(self, FetchOutcome::Loaded(_))
    }

    /// Whether the fetch failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, FetchOutcome::Failed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutate_bumps_version() {
        let cell = StateCell::new(0u32);
        assert_eq!(cell.version(), 0);
        cell.mutate(|v| *v += 5);
        assert_eq!(cell.snapshot(), Versioned { version: 1, value: 5 });
    }

    #[test]
    fn test_mutate_if_rejected_keeps_version() {
        let cell = StateCell::new(1u32);
        let applied = cell.mutate_if(|v| *v == 2, |v| *v = 3);
        assert!(applied.is_none());
        assert_eq!(cell.version(), 0);
        assert_eq!(cell.read(|v| *v), 1);
    }

    #[test]
    fn test_compare_and_swap() {
        let cell = StateCell::new(String::from("a"));
        let seen = cell.version();
        cell.compare_and_swap(seen, |v| v.push('b')).unwrap();

        let err = cell.compare_and_swap(seen, |v| v.push('c')).unwrap_err();
        assert_eq!(err, StateError::StaleVersion { expected: 0, actual: 1 });
        assert_eq!(cell.read(|v| v.clone()), "ab");
    }

    #[test]
    fn test_replace_returns_previous() {
        let cell = StateCell::new(vec![1, 2]);
        let old = cell.replace(vec![]);
        assert_eq!(old, vec![1, 2]);
        assert_eq!(cell.version(), 1);
    }

    #[test]
    fn test_latest_ticket_wins() {
        let mut gens = FetchGenerations::new();
        let first = gens.issue("p1");
        let second = gens.issue("p1");
        assert!(!gens.is_current(&"p1", &first));
        assert!(gens.is_current(&"p1", &second));
    }

    #[test]
    fn test_tickets_are_per_key() {
        let mut gens = FetchGenerations::new();
        let a = gens.issue("a");
        let b = gens.issue("b");
        assert!(gens.is_current(&"a", &a));
        assert!(gens.is_current(&"b", &b));
    }

    #[test]
    fn test_invalidate_all_supersedes_everything() {
        let mut gens = FetchGenerations::new();
        let a = gens.issue(());
        gens.invalidate_all();
        assert!(!gens.is_current(&(), &a));
        let b = gens.issue(());
        assert_ne!(a, b);
        assert!(gens.is_current(&(), &b));
    }

    #[test]
    fn test_complete_only_retires_matching_ticket() {
        let mut gens = FetchGenerations::new();
        let old = gens.issue(());
        let new = gens.issue(());
        gens.complete(&(), &old);
        assert!(gens.in_flight(&()));
        gens.complete(&(), &new);
        assert!(!gens.in_flight(&()));
    }

    proptest::proptest! {
        #[test]
        fn prop_only_last_ticket_is_current(keys in proptest::collection::vec(0u8..4, 1..40)) {
            let mut gens = FetchGenerations::new();
            let issued: Vec<(u8, FetchTicket)> = keys.iter().map(|k| (*k, gens.issue(*k))).collect();
            for (i, (key, ticket)) in issued.iter().enumerate() {
                let newer_exists = issued[i + 1..].iter().any(|(k, _)| k == key);
                proptest::prop_assert_eq!(gens.is_current(key, ticket), !newer_exists);
            }
        }
    }
}

//! A settle-once handle pair.
//!
//! [`deferred`] returns a [`Deferred`] (the observable side, placed in a
//! sequence) and a [`Resolver`] (the producing side, handed to whatever does
//! the work). Both halves are consumed by use, so a computation settles at
//! most once and is observed at most once.
//!
//! ```
//! use splice_core::{deferred, Settle};
//!
//! let (handle, resolver) = deferred::<u32, String>();
//! resolver.resolve(42);
//! handle.on_settle(Box::new(|v| assert_eq!(v, 42)), Box::new(|_| unreachable!()));
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::settle::{OnFulfilled, OnRejected, Settle};

enum State<T, E> {
    /// Nobody has settled or observed yet.
    Waiting,
    /// Observers registered, outcome not yet produced.
    Observed {
        on_fulfilled: OnFulfilled<T>,
        on_rejected: OnRejected<E>,
    },
    /// Outcome produced before anyone observed it.
    Settled(Result<T, E>),
    /// Outcome delivered.
    Delivered,
}

struct Slot<T, E> {
    state: Mutex<State<T, E>>,
}

/// Observable half of a settle-once pair.
pub struct Deferred<T, E> {
    slot: Arc<Slot<T, E>>,
}

/// Producing half of a settle-once pair.
///
/// Dropping a resolver without settling leaves its [`Deferred`] pending
/// forever; observers are dropped uncalled.
pub struct Resolver<T, E> {
    slot: Arc<Slot<T, E>>,
}

/// Create a connected [`Deferred`] / [`Resolver`] pair.
pub fn deferred<T, E>() -> (Deferred<T, E>, Resolver<T, E>) {
    let slot = Arc::new(Slot {
        state: Mutex::new(State::Waiting),
    });
    (
        Deferred {
            slot: Arc::clone(&slot),
        },
        Resolver { slot },
    )
}

impl<T, E> Deferred<T, E> {
    /// Whether the resolver has already produced an outcome.
    pub fn is_settled(&self) -> bool {
        matches!(
            *self.slot.state.lock(),
            State::Settled(_) | State::Delivered
        )
    }
}

impl<T, E> Settle<T, E> for Deferred<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    fn on_settle(self, on_fulfilled: OnFulfilled<T>, on_rejected: OnRejected<E>) {
        let ready = {
            let mut state = self.slot.state.lock();
            match std::mem::replace(&mut *state, State::Delivered) {
                State::Waiting => {
                    *state = State::Observed {
                        on_fulfilled,
                        on_rejected,
                    };
                    return;
                }
                State::Settled(outcome) => outcome,
                // A Deferred is consumed by observation, so no second
                // registration can reach here.
                other @ (State::Observed { .. } | State::Delivered) => {
                    *state = other;
                    return;
                }
            }
        };
        deliver(ready, on_fulfilled, on_rejected);
    }
}

impl<T, E> Resolver<T, E> {
    /// Fulfill the computation with `value`.
    pub fn resolve(self, value: T) {
        self.settle(Ok(value));
    }

    /// Reject the computation with `reason`.
    pub fn reject(self, reason: E) {
        self.settle(Err(reason));
    }

    /// Settle with an already-computed outcome.
    pub fn settle(self, outcome: Result<T, E>) {
        let observers = {
            let mut state = self.slot.state.lock();
            match std::mem::replace(&mut *state, State::Delivered) {
                State::Waiting => {
                    *state = State::Settled(outcome);
                    return;
                }
                State::Observed {
                    on_fulfilled,
                    on_rejected,
                } => (on_fulfilled, on_rejected),
                other @ (State::Settled(_) | State::Delivered) => {
                    *state = other;
                    return;
                }
            }
        };
        // Observers run outside the lock.
        deliver(outcome, observers.0, observers.1);
    }
}

fn deliver<T, E>(outcome: Result<T, E>, on_fulfilled: OnFulfilled<T>, on_rejected: OnRejected<E>) {
    match outcome {
        Ok(value) => on_fulfilled(value),
        Err(reason) => on_rejected(reason),
    }
}

impl<T, E> fmt::Debug for Deferred<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("settled", &self.is_settled())
            .finish()
    }
}

impl<T, E> fmt::Debug for Resolver<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observe(
        handle: Deferred<u32, &'static str>,
    ) -> Arc<Mutex<Option<Result<u32, &'static str>>>> {
        let seen = Arc::new(Mutex::new(None));
        let ok_sink = Arc::clone(&seen);
        let err_sink = Arc::clone(&seen);
        handle.on_settle(
            Box::new(move |v| *ok_sink.lock() = Some(Ok(v))),
            Box::new(move |e| *err_sink.lock() = Some(Err(e))),
        );
        seen
    }

    #[test]
    fn test_resolve_after_observe() {
        let (handle, resolver) = deferred();
        let seen = observe(handle);
        assert!(seen.lock().is_none());

        resolver.resolve(5);
        assert_eq!(*seen.lock(), Some(Ok(5)));
    }

    #[test]
    fn test_settled_before_observe_still_delivers() {
        let (handle, resolver) = deferred();
        resolver.reject("early");
        assert!(handle.is_settled());

        let seen = observe(handle);
        assert_eq!(*seen.lock(), Some(Err("early")));
    }

    #[test]
    fn test_is_settled_tracks_resolver() {
        let (handle, resolver) = deferred::<u32, &'static str>();
        assert!(!handle.is_settled());
        resolver.settle(Ok(1));
        assert!(handle.is_settled());
    }

    #[test]
    fn test_dropped_resolver_never_settles() {
        let (handle, resolver) = deferred::<u32, &'static str>();
        let seen = observe(handle);
        drop(resolver);
        assert!(seen.lock().is_none());
    }

    #[test]
    fn test_resolve_from_another_thread() {
        let (handle, resolver) = deferred();
        let seen = observe(handle);

        std::thread::spawn(move || resolver.resolve(99))
            .join()
            .unwrap();

        assert_eq!(*seen.lock(), Some(Ok(99)));
    }
}

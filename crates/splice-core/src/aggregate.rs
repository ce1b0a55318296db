//! Aggregation of pending computations into one ordered outcome.
//!
//! [`aggregate`] registers one pair of observers per pending computation and
//! reports, through a single continuation, either the first rejection seen in
//! real time or every resolved value in slot order. Resolved values are
//! written into a pre-sized buffer addressed by slot index, so completion
//! order never leaks into the output.
//!
//! The continuation sits behind a one-shot latch shared by all observers of
//! one call: whichever observer takes it first is the only one that runs it.
//! Everything arriving afterwards is absorbed.

use std::sync::Arc;

use parking_lot::Mutex;
use splice_types::Rejection;
use tracing::{debug, trace};

use crate::settle::Settle;

/// Continuation receiving an aggregation outcome.
pub type OnDone<T, E> = Box<dyn FnOnce(Result<Vec<T>, Rejection<E>>) + Send + 'static>;

struct Aggregation<T, E> {
    /// Indexed by slot; entry `i` is written only by computation `i`.
    results: Vec<Option<T>>,
    settled: usize,
    /// The latch: `Some` until the continuation has been claimed.
    on_done: Option<OnDone<T, E>>,
}

/// Wait for every handle in `pending` and report once through `on_done`.
///
/// `pending` must be non-empty; callers short-circuit the empty case
/// themselves (an empty list never completes).
///
/// `on_done` runs at most once: with `Ok(values)` in slot order once every
/// computation has fulfilled, or with the first [`Rejection`] observed.
/// Observers may fire on any thread and in any order.
pub fn aggregate<T, E, P, F>(pending: Vec<P>, on_done: F)
where
    T: Send + 'static,
    E: Send + 'static,
    P: Settle<T, E>,
    F: FnOnce(Result<Vec<T>, Rejection<E>>) + Send + 'static,
{
    debug_assert!(
        !pending.is_empty(),
        "aggregate requires at least one pending computation"
    );

    let total = pending.len();
    let state = Arc::new(Mutex::new(Aggregation {
        results: std::iter::repeat_with(|| None).take(total).collect(),
        settled: 0,
        on_done: Some(Box::new(on_done) as OnDone<T, E>),
    }));

    debug!(pending = total, "registering settle observers");

    for (slot, handle) in pending.into_iter().enumerate() {
        let on_value = Arc::clone(&state);
        let on_reason = Arc::clone(&state);
        handle.on_settle(
            Box::new(move |value| fulfill(&on_value, slot, value)),
            Box::new(move |reason| reject(&on_reason, slot, reason)),
        );
    }
}

fn fulfill<T, E>(state: &Mutex<Aggregation<T, E>>, slot: usize, value: T) {
    let (on_done, results) = {
        let mut guard = state.lock();
        if guard.on_done.is_none() {
            trace!(slot, "fulfillment after completion absorbed");
            return;
        }
        guard.results[slot] = Some(value);
        guard.settled += 1;
        if guard.settled < guard.results.len() {
            return;
        }
        let results = std::mem::take(&mut guard.results);
        (guard.on_done.take(), results)
    };

    let values: Vec<T> = results.into_iter().flatten().collect();
    debug!(resolved = values.len(), "all pending computations fulfilled");
    if let Some(on_done) = on_done {
        on_done(Ok(values));
    }
}

fn reject<T, E>(state: &Mutex<Aggregation<T, E>>, slot: usize, reason: E) {
    // Released before the continuation runs, in case it settles more handles.
    let claimed = {
        let mut guard = state.lock();
        let claimed = guard.on_done.take();
        if claimed.is_some() {
            guard.results.clear();
        }
        claimed
    };

    match claimed {
        Some(on_done) => {
            debug!(slot, "first rejection wins");
            on_done(Err(Rejection::new(slot, reason)));
        }
        None => trace!(slot, "rejection after completion absorbed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deferred::{deferred, Deferred, Resolver};
    use crate::settle::{boxed, OnFulfilled, OnRejected};

    type Outcome = Result<Vec<u32>, Rejection<&'static str>>;

    fn record() -> (Arc<Mutex<Vec<Outcome>>>, impl FnOnce(Outcome) + Send + 'static) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        (calls, move |outcome: Outcome| sink.lock().push(outcome))
    }

    fn pairs(n: usize) -> (Vec<Deferred<u32, &'static str>>, Vec<Resolver<u32, &'static str>>) {
        (0..n).map(|_| deferred()).unzip()
    }

    #[test]
    fn test_results_follow_slot_order_not_completion_order() {
        let (handles, mut resolvers) = pairs(3);
        let (calls, on_done) = record();
        aggregate(handles, on_done);

        let third = resolvers.pop().unwrap();
        let second = resolvers.pop().unwrap();
        let first = resolvers.pop().unwrap();
        third.resolve(30);
        first.resolve(10);
        assert!(calls.lock().is_empty());
        second.resolve(20);

        assert_eq!(*calls.lock(), vec![Ok(vec![10, 20, 30])]);
    }

    #[test]
    fn test_first_rejection_wins_and_later_ones_are_absorbed() {
        let (handles, mut resolvers) = pairs(3);
        let (calls, on_done) = record();
        aggregate(handles, on_done);

        let c = resolvers.pop().unwrap();
        let b = resolvers.pop().unwrap();
        let a = resolvers.pop().unwrap();
        b.reject("Y");
        a.reject("X");
        c.resolve(3);

        let calls = calls.lock();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], Err(Rejection::new(1, "Y")));
    }

    #[test]
    fn test_fulfillment_after_rejection_does_not_complete() {
        let (handles, mut resolvers) = pairs(2);
        let (calls, on_done) = record();
        aggregate(handles, on_done);

        let second = resolvers.pop().unwrap();
        let first = resolvers.pop().unwrap();
        first.resolve(1);
        second.reject("late");

        assert_eq!(calls.lock().len(), 1);
        assert!(calls.lock()[0].is_err());
    }

    #[test]
    fn test_presettled_handles_complete_during_registration() {
        let (handles, resolvers) = pairs(2);
        for (i, resolver) in resolvers.into_iter().enumerate() {
            resolver.resolve(i as u32 + 1);
        }
        let (calls, on_done) = record();
        aggregate(handles, on_done);

        assert_eq!(*calls.lock(), vec![Ok(vec![1, 2])]);
    }

    #[test]
    fn test_mixed_handle_kinds() {
        let immediate = |on_fulfilled: OnFulfilled<u32>, _: OnRejected<&'static str>| {
            on_fulfilled(1);
        };
        let (later, resolver) = deferred::<u32, &'static str>();
        let (calls, on_done) = record();

        aggregate(vec![boxed(immediate), boxed(later)], on_done);
        assert!(calls.lock().is_empty());

        resolver.resolve(2);
        assert_eq!(*calls.lock(), vec![Ok(vec![1, 2])]);
    }

    #[test]
    fn test_continuation_may_settle_more_handles() {
        let (handles, mut resolvers) = pairs(1);
        let (other, other_resolver) = deferred::<u32, &'static str>();
        let (calls, on_done) = record();

        aggregate(handles, move |outcome| {
            // Re-entering another aggregation from inside the continuation.
            aggregate(vec![other], on_done);
            other_resolver.resolve(outcome.map(|v| v[0]).unwrap_or(0) + 1);
        });
        resolvers.pop().unwrap().resolve(41);

        assert_eq!(*calls.lock(), vec![Ok(vec![42])]);
    }
}

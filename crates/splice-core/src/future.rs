//! Future-based splicing.
//!
//! The same contract as [`replace_pending_values`](crate::replace_pending_values)
//! (positional output, first rejection wins, a single outcome), expressed as
//! `async fn`s instead of continuations.
//!
//! - [`splice_all`] drives pending *futures* concurrently on the caller's task.
//! - [`replace_pending`] awaits pending [`Settle`] handles.
//! - [`settled`] turns one [`Settle`] handle into a future.

use std::future::Future;
use std::sync::Arc;

use futures::channel::oneshot;
use futures::stream::{FuturesUnordered, StreamExt};
use parking_lot::Mutex;
use splice_types::{Item, Rejection, SpliceConfig};
use tracing::{debug, warn};

use crate::rewrite::{locate, replace_pending_values_with, splice, Extracted};
use crate::settle::Settle;

/// Await every pending future of `sequence`, keeping positions.
///
/// Pending futures run concurrently within the calling task; nothing is
/// spawned. Resolves without suspending when nothing is pending. Returns as
/// soon as any future fails; the remaining futures are dropped.
pub async fn splice_all<T, E, F>(sequence: Vec<Item<T, F>>) -> Result<Vec<T>, Rejection<E>>
where
    F: Future<Output = Result<T, E>>,
{
    let Extracted {
        layout,
        holes,
        pending,
    } = Extracted::from_sequence(sequence);

    if pending.is_empty() {
        debug!(items = layout.len(), "no pending futures, sequence returned as is");
        return Ok(layout.into_iter().flatten().collect());
    }

    debug!(items = layout.len(), pending = pending.len(), "awaiting pending futures");

    let mut results: Vec<Option<T>> = std::iter::repeat_with(|| None)
        .take(pending.len())
        .collect();
    let mut in_flight: FuturesUnordered<_> = pending
        .into_iter()
        .enumerate()
        .map(|(slot, fut)| async move { (slot, fut.await) })
        .collect();

    while let Some((slot, outcome)) = in_flight.next().await {
        match outcome {
            Ok(value) => results[slot] = Some(value),
            Err(reason) => {
                let rejection = locate(Rejection::new(slot, reason), &holes);
                debug!(
                    slot,
                    position = rejection.position,
                    "pending future failed"
                );
                return Err(rejection);
            }
        }
    }

    let resolved: Vec<T> = results.into_iter().flatten().collect();
    Ok(splice(layout, &holes, resolved))
}

/// Await every pending [`Settle`] handle of `sequence`, keeping positions.
///
/// Awaiting form of [`replace_pending_values`](crate::replace_pending_values).
/// If a handle is abandoned without ever settling, the returned future never
/// completes, matching the continuation form.
pub async fn replace_pending<T, E, P>(sequence: Vec<Item<T, P>>) -> Result<Vec<T>, Rejection<E>>
where
    T: Send + 'static,
    E: Send + 'static,
    P: Settle<T, E>,
{
    replace_pending_with(&SpliceConfig::from_env(), sequence).await
}

/// [`replace_pending`] with an explicit configuration.
pub async fn replace_pending_with<T, E, P>(
    config: &SpliceConfig,
    sequence: Vec<Item<T, P>>,
) -> Result<Vec<T>, Rejection<E>>
where
    T: Send + 'static,
    E: Send + 'static,
    P: Settle<T, E>,
{
    let (tx, rx) = oneshot::channel();
    replace_pending_values_with(config, sequence, move |outcome| {
        let _ = tx.send(outcome);
    });
    match rx.await {
        Ok(outcome) => outcome,
        Err(oneshot::Canceled) => abandoned().await,
    }
}

/// A future resolving with the outcome of a single [`Settle`] handle.
///
/// Never completes if the handle is abandoned without settling.
pub async fn settled<T, E, P>(handle: P) -> Result<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
    P: Settle<T, E>,
{
    let (tx, rx) = oneshot::channel::<Result<T, E>>();
    // Exactly one of the observers fires; both hold the sender.
    let tx = Arc::new(Mutex::new(Some(tx)));
    let on_reason = Arc::clone(&tx);
    handle.on_settle(
        Box::new(move |value| {
            if let Some(tx) = tx.lock().take() {
                let _ = tx.send(Ok(value));
            }
        }),
        Box::new(move |reason| {
            if let Some(tx) = on_reason.lock().take() {
                let _ = tx.send(Err(reason));
            }
        }),
    );
    match rx.await {
        Ok(outcome) => outcome,
        Err(oneshot::Canceled) => abandoned().await,
    }
}

async fn abandoned<R>() -> R {
    warn!("pending computation dropped without settling; waiting forever");
    futures::future::pending().await
}

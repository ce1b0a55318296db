//! Replacing pending items of a sequence with their resolved values.
//!
//! [`replace_pending_values`] is the entry point of the crate. It takes
//! ownership of the input sequence, extracts the pending handles in order of
//! appearance, waits for all of them through [`aggregate`], and hands the
//! caller a fully-resolved sequence with every value at the position its
//! handle occupied.
//!
//! # Example
//!
//! ```
//! use splice_core::{deferred, replace_pending_values, Item};
//!
//! let (first, resolve_first) = deferred::<i32, String>();
//! let (second, resolve_second) = deferred::<i32, String>();
//! let sequence = vec![
//!     Item::Ready(1),
//!     Item::Pending(first),
//!     Item::Ready(7),
//!     Item::Pending(second),
//! ];
//!
//! replace_pending_values(sequence, |outcome| {
//!     assert_eq!(outcome.unwrap(), vec![1, 42, 7, 99]);
//! });
//! resolve_second.resolve(99);
//! resolve_first.resolve(42);
//! ```

use std::time::Instant;

use splice_types::{count_pending, Item, Rejection, SpliceConfig};
use tracing::debug;

use crate::aggregate::aggregate;
use crate::settle::Settle;

/// An input sequence split into ready values and pending handles.
pub(crate) struct Extracted<T, P> {
    /// One entry per input item; `None` marks a hole left by a pending item.
    pub(crate) layout: Vec<Option<T>>,
    /// Input position of each pending item, indexed by slot.
    pub(crate) holes: Vec<usize>,
    /// Pending handles, indexed by slot.
    pub(crate) pending: Vec<P>,
}

impl<T, P> Extracted<T, P> {
    pub(crate) fn from_sequence(sequence: Vec<Item<T, P>>) -> Self {
        let pending_count = count_pending(&sequence);
        let mut layout = Vec::with_capacity(sequence.len());
        let mut holes = Vec::with_capacity(pending_count);
        let mut pending = Vec::with_capacity(pending_count);

        for (position, item) in sequence.into_iter().enumerate() {
            match item {
                Item::Ready(value) => layout.push(Some(value)),
                Item::Pending(handle) => {
                    layout.push(None);
                    holes.push(position);
                    pending.push(handle);
                }
            }
        }

        Self {
            layout,
            holes,
            pending,
        }
    }
}

/// Fill every hole of `layout` with `resolved`, consumed front to back.
///
/// `resolved` is in slot order, which is the order the holes appear in.
pub(crate) fn splice<T>(mut layout: Vec<Option<T>>, holes: &[usize], resolved: Vec<T>) -> Vec<T> {
    debug_assert_eq!(holes.len(), resolved.len());
    for (&position, value) in holes.iter().zip(resolved) {
        layout[position] = Some(value);
    }
    layout.into_iter().flatten().collect()
}

/// Map a slot-relative rejection back onto the input sequence.
pub(crate) fn locate<E>(rejection: Rejection<E>, holes: &[usize]) -> Rejection<E> {
    let position = holes.get(rejection.slot).copied().unwrap_or(rejection.slot);
    rejection.at_position(position)
}

/// Replace every pending item of `sequence` with its resolved value.
///
/// `on_done` is invoked exactly once, provided every pending computation
/// eventually settles:
/// - synchronously with the unchanged values if nothing is pending;
/// - with the first [`Rejection`] observed, carrying the input position of
///   the computation that rejected;
/// - otherwise with the spliced sequence, same length and order as the input.
///
/// Configuration is read from the environment, see [`SpliceConfig`].
pub fn replace_pending_values<T, E, P, F>(sequence: Vec<Item<T, P>>, on_done: F)
where
    T: Send + 'static,
    E: Send + 'static,
    P: Settle<T, E>,
    F: FnOnce(Result<Vec<T>, Rejection<E>>) + Send + 'static,
{
    replace_pending_values_with(&SpliceConfig::from_env(), sequence, on_done)
}

/// [`replace_pending_values`] with an explicit configuration.
pub fn replace_pending_values_with<T, E, P, F>(
    config: &SpliceConfig,
    sequence: Vec<Item<T, P>>,
    on_done: F,
) where
    T: Send + 'static,
    E: Send + 'static,
    P: Settle<T, E>,
    F: FnOnce(Result<Vec<T>, Rejection<E>>) + Send + 'static,
{
    let started = Instant::now();
    let timing = config.timing;
    let Extracted {
        layout,
        holes,
        pending,
    } = Extracted::from_sequence(sequence);
    let items = layout.len();

    if pending.is_empty() {
        debug!(items, "no pending computations, sequence returned as is");
        on_done(Ok(layout.into_iter().flatten().collect()));
        return;
    }

    debug!(items, pending = pending.len(), "aggregating pending computations");

    aggregate(pending, move |outcome| match outcome {
        Err(rejection) => {
            let rejection = locate(rejection, &holes);
            debug!(
                slot = rejection.slot,
                position = rejection.position,
                "pending computation rejected, sequence left unspliced"
            );
            if timing {
                eprintln!(
                    "[timing] stage=splice outcome=rejected items={} pending={} elapsed_ms={}",
                    items,
                    holes.len(),
                    started.elapsed().as_millis()
                );
            }
            on_done(Err(rejection));
        }
        Ok(resolved) => {
            let spliced = splice(layout, &holes, resolved);
            if timing {
                eprintln!(
                    "[timing] stage=splice outcome=spliced items={} pending={} elapsed_ms={}",
                    items,
                    holes.len(),
                    started.elapsed().as_millis()
                );
            }
            on_done(Ok(spliced));
        }
    });
}

//! The pending-computation interface.
//!
//! A pending computation is anything that can be told "call this on success,
//! that on failure" and will then call exactly one of them exactly once.
//! The splicing machinery never creates or drives computations itself; it
//! only registers observers through [`Settle::on_settle`].

/// Observer invoked with the resolved value.
pub type OnFulfilled<T> = Box<dyn FnOnce(T) + Send + 'static>;

/// Observer invoked with the rejection reason.
pub type OnRejected<E> = Box<dyn FnOnce(E) + Send + 'static>;

/// A boxed settle handle, for sequences mixing different handle kinds.
pub type BoxSettle<T, E> = Box<dyn FnOnce(OnFulfilled<T>, OnRejected<E>) + Send + 'static>;

/// A handle to a computation that settles exactly once.
///
/// Implementations must invoke exactly one of the two observers, exactly
/// once, at some point after (or during) registration. Consuming `self`
/// makes double registration impossible.
pub trait Settle<T, E>: Send + 'static {
    fn on_settle(self, on_fulfilled: OnFulfilled<T>, on_rejected: OnRejected<E>);
}

impl<T, E, F> Settle<T, E> for F
where
    F: FnOnce(OnFulfilled<T>, OnRejected<E>) + Send + 'static,
{
    fn on_settle(self, on_fulfilled: OnFulfilled<T>, on_rejected: OnRejected<E>) {
        self(on_fulfilled, on_rejected)
    }
}

/// Box any settle handle so handles of different types share one sequence.
pub fn boxed<T, E, P>(handle: P) -> BoxSettle<T, E>
where
    T: 'static,
    E: 'static,
    P: Settle<T, E>,
{
    Box::new(move |on_fulfilled, on_rejected| handle.on_settle(on_fulfilled, on_rejected))
}

//! Replacing pending computations in a sequence with their resolved values.
//!
//! Given a `Vec<Item<T, P>>` mixing ready values and pending handles, this
//! crate produces a `Vec<T>` in which every pending handle has been replaced
//! by the value it resolved to, at the same position, or reports the first
//! rejection observed.
//!
//! # Example
//!
//! ```ignore
//! use splice_core::{deferred, replace_pending, Item};
//!
//! let (price, resolver) = deferred::<u64, String>();
//! tokio::spawn(async move { resolver.resolve(fetch_price().await) });
//!
//! let row = replace_pending(vec![Item::Ready(1), Item::Pending(price)]).await?;
//! ```
//!
//! The crate never creates or schedules computations; it only observes the
//! handles it is given, through the [`Settle`] trait.

pub mod aggregate;
pub mod deferred;
pub mod future;
pub mod rewrite;
pub mod settle;

// Re-export main types
pub use aggregate::{aggregate, OnDone};
pub use deferred::{deferred, Deferred, Resolver};
pub use future::{replace_pending, replace_pending_with, settled, splice_all};
pub use rewrite::{replace_pending_values, replace_pending_values_with};
pub use settle::{boxed, BoxSettle, OnFulfilled, OnRejected, Settle};
pub use splice_types::{is_pending, Item, Rejection, SpliceConfig};

//! pending-splice
//!
//! Replace the pending computations of a sequence with the values they
//! resolve to, keeping every value at its original position, or report the
//! first rejection.
//!
//! - [`replace_pending_values`] - continuation form, the entry point
//! - [`replace_pending`] / [`splice_all`] - awaiting forms
//! - [`deferred`] - a settle-once handle pair to put in sequences
//!
//! The command-line front end lives in [`args`] and [`runner`].

pub mod args;
pub mod runner;

pub use splice_core::{
    aggregate, boxed, deferred, is_pending, replace_pending, replace_pending_values,
    replace_pending_values_with, replace_pending_with, settled, splice_all, BoxSettle, Deferred,
    Item, OnFulfilled, OnRejected, Rejection, Resolver, Settle, SpliceConfig,
};

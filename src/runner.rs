//! Drives a command-line sequence through the splicer.
//!
//! Every pending item gets a [`Deferred`] handle whose [`Resolver`] is moved
//! into a tokio task that settles it after the item's delay. The splicer
//! itself only observes those handles.
//!
//! [`Resolver`]: splice_core::Resolver

use std::time::Duration;

use serde_json::Value;
use splice_core::{deferred, replace_pending_with, Deferred, Item, Rejection, SpliceConfig};
use tracing::debug;

use crate::args::ItemSpec;

/// Item type used by the CLI: JSON values, string rejection reasons.
pub type CliItem = Item<Value, Deferred<Value, String>>;

/// Turn command-line specs into a sequence, scheduling every pending item.
///
/// Must be called from within a tokio runtime.
pub fn schedule(specs: Vec<ItemSpec>) -> Vec<CliItem> {
    specs
        .into_iter()
        .enumerate()
        .map(|(position, spec)| match spec {
            ItemSpec::Ready(value) => Item::Ready(value),
            ItemSpec::Resolve { value, delay } => {
                Item::Pending(settle_after(position, Ok(value), delay))
            }
            ItemSpec::Reject { reason, delay } => {
                Item::Pending(settle_after(position, Err(reason), delay))
            }
        })
        .collect()
}

fn settle_after(
    position: usize,
    outcome: Result<Value, String>,
    delay: Duration,
) -> Deferred<Value, String> {
    let (handle, resolver) = deferred();
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        debug!(
            position,
            ok = outcome.is_ok(),
            delay_ms = delay.as_millis() as u64,
            "settling pending item"
        );
        resolver.settle(outcome);
    });
    handle
}

/// Schedule `specs` and wait for the spliced sequence.
pub async fn run(
    config: &SpliceConfig,
    specs: Vec<ItemSpec>,
) -> Result<Vec<Value>, Rejection<String>> {
    let pending = specs.iter().filter(|spec| spec.is_pending()).count();
    debug!(items = specs.len(), pending, "running sequence");
    replace_pending_with(config, schedule(specs)).await
}

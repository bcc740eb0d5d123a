//! Index-preserving concurrent fan-out/fan-in

use futures::stream::{FuturesUnordered, StreamExt};
use std::future::Future;

/// Run one future per input concurrently; collect results by input index
///
/// Results land in a fixed-size slot array keyed by the original index, so
/// output order matches input order whatever the completion order.
/// The first error is returned and the remaining futures are dropped.
pub async fn fan_out_indexed<I, T, E, F, Fut>(inputs: I, f: F) -> Result<Vec<T>, E>
where
    I: IntoIterator,
    F: Fn(I::Item) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut pending: FuturesUnordered<_> = inputs
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let fut = f(item);
            async move { (index, fut.await) }
        })
        .collect();

    let mut slots: Vec<Option<T>> = std::iter::repeat_with(|| None).take(pending.len()).collect();

    while let Some((index, result)) = pending.next().await {
        slots[index] = Some(result?);
    }

    Ok(slots.into_iter().flatten().collect())
}

//! Bounded polling

use crate::clock::Clock;
use std::future::Future;
use std::time::Duration;

/// Re-run `probe` every `interval` until it yields a value or `ceiling` is reached
///
/// Each attempt waits one `interval` first, and no attempt is started if its
/// wait would push the total past `ceiling`. The total wait is therefore a
/// multiple of `interval` and never exceeds `ceiling`. A zero interval makes
/// exactly one attempt.
///
/// Errors from `probe` end the loop and are returned.
pub async fn retry_until<T, F, Fut>(
    clock: &dyn Clock,
    interval: Duration,
    ceiling: Duration,
    mut probe: F,
) -> anyhow::Result<Option<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<Option<T>>>,
{
    let mut waited = Duration::ZERO;

    while waited + interval <= ceiling {
        clock.sleep(interval).await;
        waited += interval;

        if let Some(value) = probe().await? {
            return Ok(Some(value));
        }

        if interval.is_zero() {
            break;
        }
    }

    Ok(None)
}

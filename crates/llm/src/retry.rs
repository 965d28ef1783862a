use outfitter_common::Result;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Run `attempt` up to `max_retries` times with exponential backoff
/// (1s, 2s, 4s, ...) between failures.
pub(crate) async fn with_retry<T, F, Fut>(
    operation: &str,
    max_retries: u32,
    mut attempt: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_retries = max_retries.max(1);
    let mut tries = 1;

    loop {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(e) if tries >= max_retries => return Err(e),
            Err(e) => {
                let delay = Duration::from_secs(2u64.pow(tries - 1));
                warn!(
                    "{} failed (attempt {}/{}): {}. Retrying in {:?}...",
                    operation, tries, max_retries, e, delay
                );
                tokio::time::sleep(delay).await;
                tries += 1;
            }
        }
    }
}

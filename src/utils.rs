use std::{
    future::Future,
    time::{Duration, Instant},
};

/// Await `future` and report how long it took.
///
/// The elapsed time is logged at `info` under `label` and returned with the
/// output.
pub async fn measure_runtime<F>(label: &str, future: F) -> (F::Output, Duration)
where
    F: Future,
{
    let started = Instant::now();
    let output = future.await;
    let elapsed = started.elapsed();

    tracing::info!(
        task = %label,
        elapsed_ms = elapsed.as_millis() as u64,
        "Task finished"
    );

    (output, elapsed)
}

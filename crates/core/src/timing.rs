//! Call-site timing instrumentation.

use std::time::Instant;

/// Await `fut` and emit its wall-clock duration at debug level.
///
/// Carries no behaviour beyond the measurement: the output of `fut` is
/// returned untouched.
pub async fn timed<F: Future>(label: &'static str, fut: F) -> F::Output {
    let start = Instant::now();
    let output = fut.await;
    tracing::debug!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        "{label} finished"
    );
    output
}

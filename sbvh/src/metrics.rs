use std::time::{Duration, Instant};

pub(crate) fn measure<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let tt = Instant::now();
    let val = f();

    (val, tt.elapsed())
}

/// Measures `f` and, when the `metrics` feature is enabled, logs how long it
/// took.
pub(crate) fn measure_phase<T>(label: &str, f: impl FnOnce() -> T) -> T {
    let (val, tt) = measure(f);

    trace(label, tt);

    val
}

#[cfg(feature = "metrics")]
fn trace(label: &str, tt: Duration) {
    log::trace!("{label}: {}", humantime::format_duration(tt));
}

#[cfg(not(feature = "metrics"))]
fn trace(_: &str, _: Duration) {
    //
}
